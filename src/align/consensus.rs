use crate::container::SiteContainer;
use crate::error::{Result, SeqError};
use crate::seq::{tools, Sequence};

/// 逐列取出现次数最多的状态作为共有序列。
///
/// - `ignore_gap`：gap 不参与候选；某列没有候选时输出 gap
/// - `resolve_unknown`：简并/未知状态按 1/n 分摊到兼容的确定状态
///
/// 计数按状态编码升序遍历、严格大于才替换，因此平局时编码最小的状态胜出。
pub fn consensus<C: SiteContainer + ?Sized>(
    src: &C,
    name: &str,
    ignore_gap: bool,
    resolve_unknown: bool,
) -> Result<Sequence> {
    if src.num_sequences() == 0 {
        return Err(SeqError::Empty("cannot build a consensus of an alignment without sequences".into()));
    }
    let alphabet = src.alphabet();
    let gap = alphabet.gap_code();
    let states = src
        .iter_sites()
        .map(|site| {
            let mut best = gap;
            let mut best_count = 0.0;
            for (&state, &count) in &tools::state_counts(site, resolve_unknown) {
                if ignore_gap && alphabet.is_gap(state) {
                    continue;
                }
                if count > best_count {
                    best = state;
                    best_count = count;
                }
            }
            best
        })
        .collect();
    Ok(Sequence::from_parts(name.to_string(), states, Vec::new(), alphabet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::VectorSiteContainer;
    use crate::seq::SymbolList;
    use crate::util::alphabet::Alphabet;

    fn dna(rows: &[&str]) -> VectorSiteContainer {
        VectorSiteContainer::from_sequences(
            rows.iter()
                .enumerate()
                .map(|(i, t)| Sequence::from_text(format!("s{i}"), t, Alphabet::Dna).unwrap()),
            Alphabet::Dna,
        )
        .unwrap()
    }

    #[test]
    fn majority_per_column() {
        let c = dna(&["AC", "AC", "AG", "TG"]);
        let cons = consensus(&c, "cons", false, false).unwrap();
        assert_eq!(cons.name(), "cons");
        // 第二列 C/G 平局，编码较小的 C 胜出
        assert_eq!(cons.to_text(), "AC");
    }

    #[test]
    fn gap_handling() {
        let c = dna(&["--A", "--A", "-TC"]);
        assert_eq!(consensus(&c, "c", false, false).unwrap().to_text(), "--A");
        // 全 gap 列没有候选，输出 gap
        assert_eq!(consensus(&c, "c", true, false).unwrap().to_text(), "-TA");
    }

    #[test]
    fn unresolved_states_are_spread() {
        // R = A/G，Y = C/T
        let c = dna(&["R", "R", "G", "C"]);
        assert_eq!(consensus(&c, "c", false, false).unwrap().to_text(), "R");
        // 展开后 A=1, G=2, C=1
        assert_eq!(consensus(&c, "c", false, true).unwrap().to_text(), "G");
    }

    #[test]
    fn empty_alignment() {
        let c = VectorSiteContainer::new(Alphabet::Dna);
        assert!(matches!(consensus(&c, "c", true, true), Err(SeqError::Empty(_))));
        let rows_only = VectorSiteContainer::with_size(2, Alphabet::Dna);
        assert_eq!(consensus(&rows_only, "c", true, true).unwrap().len(), 0);
    }
}
