//! 比对位点容器。
//!
//! 容器逻辑上是一个 `行 = 序列`、`列 = 位点` 的状态矩阵。数据只以位点（列）
//! 的形式存储一份，序列（行）按需从列投影出来，因此两种视图不可能不一致。
//!
//! 能力按 trait 拆分：
//! - [`SequenceContainer`] — 按位置 / 名称访问序列
//! - [`SiteContainer`] — 按位置访问位点
//! - [`MutableSiteContainer`] — 增删改位点（列）
//! - [`MutableSequenceContainer`] — 增删改序列（行）

pub mod vector;
pub mod view;

pub use vector::VectorSiteContainer;
pub use view::{SequenceView, SiteIter};

use crate::error::Result;
use crate::seq::{Sequence, Site};
use crate::util::alphabet::Alphabet;

pub trait SequenceContainer {
    fn alphabet(&self) -> Alphabet;

    fn num_sequences(&self) -> usize;

    fn sequence_names(&self) -> Vec<String>;

    /// 名称对应的行号；同名多行时返回第一行
    fn sequence_position(&self, name: &str) -> Result<usize>;

    fn has_sequence(&self, name: &str) -> bool {
        self.sequence_position(name).is_ok()
    }

    /// 物化一条序列（快照，修改它不会影响容器）
    fn sequence(&self, pos: usize) -> Result<Sequence>;

    fn sequence_by_name(&self, name: &str) -> Result<Sequence> {
        let pos = self.sequence_position(name)?;
        self.sequence(pos)
    }

    fn sequence_comments(&self, pos: usize) -> Result<&[String]>;

    fn general_comments(&self) -> &[String];
}

pub trait SiteContainer: SequenceContainer {
    fn num_sites(&self) -> usize;

    fn site(&self, pos: usize) -> Result<&Site>;

    /// 读取单个单元格 `(row, col)`
    fn state(&self, row: usize, col: usize) -> Result<i32> {
        self.site(col)?.get(row)
    }

    fn site_positions(&self) -> Vec<i32> {
        self.iter_sites().map(Site::position).collect()
    }

    fn iter_sites(&self) -> SiteIter<'_, Self> {
        SiteIter::new(self)
    }

    /// 共享字母表与总注释、但不含任何数据的新容器
    fn create_empty_container(&self) -> VectorSiteContainer {
        let mut out = VectorSiteContainer::new(self.alphabet());
        out.set_general_comments(self.general_comments().to_vec());
        out
    }
}

pub trait MutableSiteContainer: SiteContainer {
    /// 替换第 `pos` 列
    fn set_site(&mut self, pos: usize, site: Site, check_position: bool) -> Result<()>;

    /// 追加一列；空容器的第一列会按其长度生成占位序列
    fn add_site(&mut self, site: Site, check_position: bool) -> Result<()>;

    /// 追加一列，并以 `position` 覆盖其坐标
    fn add_site_at_coordinate(&mut self, mut site: Site, position: i32, check_position: bool) -> Result<()> {
        site.set_position(position);
        self.add_site(site, check_position)
    }

    /// 在第 `pos` 列之前插入，后续列右移
    fn insert_site(&mut self, site: Site, pos: usize, check_position: bool) -> Result<()>;

    fn remove_site(&mut self, pos: usize) -> Result<Site>;

    /// 删除 `[pos, pos + len)` 区间的列
    fn delete_sites(&mut self, pos: usize, len: usize) -> Result<()>;

    fn delete_site(&mut self, pos: usize) -> Result<()> {
        self.delete_sites(pos, 1)
    }

    /// 坐标重置为 `位置 + 1`
    fn reindex_sites(&mut self);

    fn set_site_positions(&mut self, positions: &[i32]) -> Result<()>;

    fn set_site_position(&mut self, pos: usize, position: i32) -> Result<()>;
}

pub trait MutableSequenceContainer: SequenceContainer {
    fn set_sequence(&mut self, pos: usize, seq: Sequence, check_name: bool) -> Result<()>;

    fn set_sequence_by_name(&mut self, name: &str, seq: Sequence, check_name: bool) -> Result<()> {
        let pos = self.sequence_position(name)?;
        self.set_sequence(pos, seq, check_name)
    }

    /// 追加一行；无位点时由该序列的长度确定列数
    fn add_sequence(&mut self, seq: Sequence, check_name: bool) -> Result<()>;

    /// 在第 `pos` 行之前插入
    fn insert_sequence(&mut self, seq: Sequence, pos: usize, check_name: bool) -> Result<()>;

    /// 取出一行并立即压缩行号
    fn remove_sequence(&mut self, pos: usize) -> Result<Sequence>;

    fn remove_sequence_by_name(&mut self, name: &str) -> Result<Sequence> {
        let pos = self.sequence_position(name)?;
        self.remove_sequence(pos)
    }

    fn set_sequences_names(&mut self, names: Vec<String>, check_names: bool) -> Result<()>;

    fn set_sequence_comments(&mut self, pos: usize, comments: Vec<String>) -> Result<()>;

    /// 写入单个单元格，直接作用于位点矩阵
    fn set_state(&mut self, row: usize, col: usize, state: i32) -> Result<()>;

    fn set_general_comments(&mut self, comments: Vec<String>);

    /// 清空所有序列与位点，保留字母表与总注释
    fn clear(&mut self);
}
