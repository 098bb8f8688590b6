use std::collections::HashMap;

use log::debug;

use crate::container::{MutableSequenceContainer, MutableSiteContainer, SequenceContainer, SiteContainer};
use crate::error::{check_alphabet, Result, SeqError};
use crate::seq::{Site, SymbolList};

/// 把 `src` 的所有列追加到 `dst` 之后。
///
/// 两者行名顺序不一致时，先按 `dst` 的行序重排 `src` 的行（`dst` 中每个名称都必须
/// 在 `src` 中存在）。同名行按出现次序配对：`dst` 中第 k 个同名行取 `src` 中第 k 个
/// 同名行，`src` 的同名行不够时重复使用第一个。`leave_position_as_is` 为 false 时，
/// 追加列的坐标加上 `dst` 原有的列数。
///
/// 所有校验在修改之前完成，失败时 `dst` 不变。
pub fn merge<D, S>(dst: &mut D, src: &S, leave_position_as_is: bool) -> Result<()>
where
    D: MutableSiteContainer + MutableSequenceContainer + ?Sized,
    S: SiteContainer + ?Sized,
{
    check_alphabet(dst.alphabet(), src.alphabet())?;

    // 空的目标直接接收源的全部行
    if dst.num_sequences() == 0 && dst.num_sites() == 0 {
        for site in src.iter_sites() {
            dst.add_site(site.clone(), false)?;
        }
        if src.num_sites() > 0 {
            dst.set_sequences_names(src.sequence_names(), false)?;
        }
        return Ok(());
    }

    let dst_names = dst.sequence_names();
    let src_names = src.sequence_names();
    let order: Vec<usize> = if dst_names == src_names {
        (0..dst_names.len()).collect()
    } else {
        row_order(&dst_names, &src_names)?
    };

    let offset = if leave_position_as_is { 0 } else { dst.num_sites() as i32 };
    let alphabet = dst.alphabet();
    let appended: Vec<Site> = src
        .iter_sites()
        .map(|site| {
            let states = order.iter().map(|&r| site.states()[r]).collect();
            Site::from_parts(states, alphabet, site.position() + offset)
        })
        .collect();

    let n = appended.len();
    for site in appended {
        dst.add_site(site, false)?;
    }
    debug!("merged {} sites, alignment now has {} sites", n, dst.num_sites());
    Ok(())
}

/// `dst` 每一行对应的 `src` 行号
fn row_order(dst_names: &[String], src_names: &[String]) -> Result<Vec<usize>> {
    let mut occurrences: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, name) in src_names.iter().enumerate() {
        occurrences.entry(name.as_str()).or_default().push(i);
    }
    let mut seen: HashMap<&str, usize> = HashMap::new();
    dst_names
        .iter()
        .map(|name| {
            let k = seen.entry(name.as_str()).or_insert(0);
            let rows = occurrences.get(name.as_str()).map(Vec::as_slice).unwrap_or_default();
            let row = rows.get(*k).or_else(|| rows.first()).copied();
            *k += 1;
            row.ok_or_else(|| SeqError::SequenceNotFound(name.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::VectorSiteContainer;
    use crate::seq::Sequence;
    use crate::util::alphabet::Alphabet;

    fn dna(rows: &[(&str, &str)]) -> VectorSiteContainer {
        VectorSiteContainer::from_sequences(
            rows.iter().map(|(n, t)| Sequence::from_text(*n, t, Alphabet::Dna).unwrap()),
            Alphabet::Dna,
        )
        .unwrap()
    }

    fn text(c: &VectorSiteContainer, name: &str) -> String {
        c.sequence_by_name(name).unwrap().to_text()
    }

    #[test]
    fn same_order_appends_with_offset() {
        let mut dst = dna(&[("a", "AC"), ("b", "GT")]);
        let src = dna(&[("a", "TTT"), ("b", "CCC")]);
        merge(&mut dst, &src, false).unwrap();
        assert_eq!(text(&dst, "a"), "ACTTT");
        assert_eq!(text(&dst, "b"), "GTCCC");
        assert_eq!(dst.site_positions(), vec![1, 2, 3, 4, 5]);

        let mut kept = dna(&[("a", "AC"), ("b", "GT")]);
        merge(&mut kept, &src, true).unwrap();
        assert_eq!(kept.site_positions(), vec![1, 2, 1, 2, 3]);
    }

    #[test]
    fn source_rows_are_reordered() {
        let mut dst = dna(&[("a", "AC"), ("b", "GT")]);
        let src = dna(&[("x", "NN"), ("b", "CC"), ("a", "TT")]);
        merge(&mut dst, &src, false).unwrap();
        assert_eq!(text(&dst, "a"), "ACTT");
        assert_eq!(text(&dst, "b"), "GTCC");
        assert_eq!(dst.num_sequences(), 2);
    }

    #[test]
    fn missing_name_fails_without_partial_append() {
        let mut dst = dna(&[("a", "AC"), ("c", "GT")]);
        let before = dst.clone();
        let src = dna(&[("a", "TT"), ("b", "CC")]);
        assert!(matches!(merge(&mut dst, &src, false), Err(SeqError::SequenceNotFound(ref n)) if n == "c"));
        assert_eq!(dst, before);
    }

    fn with_duplicates(rows: &[(&str, &str)]) -> VectorSiteContainer {
        let mut c = VectorSiteContainer::new(Alphabet::Dna);
        for (n, t) in rows {
            c.add_sequence(Sequence::from_text(*n, t, Alphabet::Dna).unwrap(), false).unwrap();
        }
        c
    }

    #[test]
    fn duplicate_names_pair_by_occurrence() {
        let mut dst = with_duplicates(&[("a", "A"), ("b", "C"), ("a", "G")]);
        let src = with_duplicates(&[("b", "TT"), ("a", "CC"), ("a", "GG")]);
        merge(&mut dst, &src, false).unwrap();
        assert_eq!(dst.sequence(0).unwrap().to_text(), "ACC");
        assert_eq!(dst.sequence(1).unwrap().to_text(), "CTT");
        assert_eq!(dst.sequence(2).unwrap().to_text(), "GGG");

        // src 同名行不够时重复第一个，多余的 src 同名行不参与
        let mut short = with_duplicates(&[("a", "A"), ("a", "G")]);
        let one = with_duplicates(&[("a", "TT"), ("b", "CC")]);
        merge(&mut short, &one, false).unwrap();
        assert_eq!(short.sequence(0).unwrap().to_text(), "ATT");
        assert_eq!(short.sequence(1).unwrap().to_text(), "GTT");

        let mut single = with_duplicates(&[("a", "A")]);
        let extra = with_duplicates(&[("a", "TT"), ("a", "CC")]);
        merge(&mut single, &extra, false).unwrap();
        assert_eq!(single.num_sequences(), 1);
        assert_eq!(single.sequence(0).unwrap().to_text(), "ATT");
    }

    #[test]
    fn merge_into_empty_takes_source_rows() {
        let mut dst = VectorSiteContainer::new(Alphabet::Dna);
        let src = dna(&[("a", "TT"), ("b", "CC")]);
        merge(&mut dst, &src, false).unwrap();
        assert_eq!(dst.sequence_names(), vec!["a", "b"]);
        assert_eq!(text(&dst, "b"), "CC");

        let prot = VectorSiteContainer::from_sequences(
            vec![Sequence::from_text("a", "WW", Alphabet::Protein).unwrap()],
            Alphabet::Protein,
        )
        .unwrap();
        assert!(matches!(merge(&mut dst, &prot, false), Err(SeqError::AlphabetMismatch { .. })));
    }
}
