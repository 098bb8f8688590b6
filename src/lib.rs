//! # seqsite
//!
//! 多序列比对的位点容器与比对层面的算法。
//!
//! 比对被看作 `行 = 序列`、`列 = 位点` 的状态编码矩阵，数据只按列存储一份，
//! 序列视图按需投影。本 crate 提供：
//!
//! - **容器**：按位置 / 名称访问，增删改行与列，所有修改先校验后提交
//! - **位点过滤**：去 gap 列、完整位点、gap 比例阈值、终止密码子
//! - **选取与抽样**：按下标选列、按原始位置选列、有放回抽样与自助抽样、合并
//! - **比对算法**：Needleman-Wunsch（线性 / 仿射 gap）、相似度矩阵、共有序列、
//!   与参考比对比较的 CS / SPS 分数
//!
//! ## 快速示例
//!
//! ```rust
//! use seqsite::prelude::*;
//!
//! let mut aln = VectorSiteContainer::new(Alphabet::Dna);
//! aln.add_sequence(Sequence::from_text("s1", "AC-GT-", Alphabet::Dna)?, true)?;
//! aln.add_sequence(Sequence::from_text("s2", "ACTGA-", Alphabet::Dna)?, true)?;
//!
//! let removed = sites::remove_gap_only_sites(&mut aln)?;
//! assert_eq!(removed, 1);
//! assert_eq!(aln.sequence_by_name("s2")?.to_text(), "ACTGA");
//!
//! let d = align::similarity(&aln.sequence(0)?, &aln.sequence(1)?, true, GapPolicy::CountAll, false)?;
//! assert!((d - 0.4).abs() < 1e-12);
//! # Ok::<(), seqsite::error::SeqError>(())
//! ```
//!
//! ## 模块说明
//!
//! - [`util`] — 字母表与遗传密码
//! - [`seq`] — 序列、位点及其共享的统计工具
//! - [`container`] — 比对容器与能力 trait
//! - [`sites`] — 位点过滤、选取、抽样、合并
//! - [`align`] — 双序列比对与比对统计
//! - [`io`] — FASTA 与二进制快照

pub mod align;
pub mod container;
pub mod error;
pub mod io;
pub mod seq;
pub mod sites;
pub mod util;

pub mod prelude {
    pub use crate::align::{self, GapPolicy};
    pub use crate::container::{
        MutableSequenceContainer, MutableSiteContainer, SequenceContainer, SiteContainer, VectorSiteContainer,
    };
    pub use crate::error::{Result, SeqError};
    pub use crate::seq::{Sequence, Site, SymbolList};
    pub use crate::sites;
    pub use crate::util::alphabet::Alphabet;
    pub use crate::util::genetic_code::GeneticCode;
}
