//! 位点（列）层面的过滤、选取、抽样与合并。
//!
//! 返回新容器的函数不修改输入；带 `&mut` 的函数原地修改。

pub mod filter;
pub mod merge;
pub mod positions;
pub mod select;

pub use filter::{
    change_gaps_to_unknown, change_unresolved_to_gaps, complete_sites, remove_gap_only_sites,
    remove_gap_or_unresolved_only_sites, remove_gap_sites, remove_sites_with_stop_codon,
    sites_without_gaps, without_gap_only_sites, without_gap_or_unresolved_only_sites,
};
pub use merge::merge;
pub use positions::{alignment_positions, sequence_positions, SequencePositions};
pub use select::{bootstrap_sites, sample_sites, sample_sites_with_indices, selected_positions, selected_sites};

use crate::container::{MutableSequenceContainer, SequenceContainer, SiteContainer, VectorSiteContainer};
use crate::error::Result;

/// 与 `src` 相同行（名称、注释）、相同字母表与总注释、但没有位点的新容器
pub(crate) fn empty_with_rows<C: SiteContainer + ?Sized>(src: &C) -> Result<VectorSiteContainer> {
    let mut out = VectorSiteContainer::with_size(src.num_sequences(), src.alphabet());
    // 源容器可能含有未经检查的重名
    out.set_sequences_names(src.sequence_names(), false)?;
    for i in 0..src.num_sequences() {
        out.set_sequence_comments(i, src.sequence_comments(i)?.to_vec())?;
    }
    out.set_general_comments(src.general_comments().to_vec());
    Ok(out)
}
