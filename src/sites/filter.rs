use log::debug;

use crate::container::{
    MutableSequenceContainer, MutableSiteContainer, SequenceContainer, SiteContainer, VectorSiteContainer,
};
use crate::error::{Result, SeqError};
use crate::seq::{tools, Site, SymbolList};
use crate::sites::empty_with_rows;
use crate::util::genetic_code::GeneticCode;

/// 复制满足 `keep` 的位点到新容器
fn filter_into<C, F>(src: &C, keep: F) -> Result<VectorSiteContainer>
where
    C: SiteContainer + ?Sized,
    F: Fn(&Site) -> bool,
{
    let mut out = empty_with_rows(src)?;
    for site in src.iter_sites().filter(|&s| keep(s)) {
        out.add_site(site.clone(), false)?;
    }
    Ok(out)
}

/// 原地删除满足 `hit` 的位点。
///
/// 从右往左扫描，把连续命中的列合并为一次区间删除，避免逐列删除的 O(n^2)。
fn delete_matching<C, F>(c: &mut C, hit: F) -> Result<usize>
where
    C: MutableSiteContainer + ?Sized,
    F: Fn(&Site) -> bool,
{
    let flags: Vec<bool> = c.iter_sites().map(|s| hit(s)).collect();
    let mut removed = 0usize;
    let mut j = flags.len();
    while j > 0 {
        if !flags[j - 1] {
            j -= 1;
            continue;
        }
        let end = j;
        while j > 0 && flags[j - 1] {
            j -= 1;
        }
        c.delete_sites(j, end - j)?;
        removed += end - j;
    }
    Ok(removed)
}

/// 只保留不含 gap 的位点
pub fn sites_without_gaps<C: SiteContainer + ?Sized>(src: &C) -> Result<VectorSiteContainer> {
    filter_into(src, |s| !tools::has_gap(s))
}

/// 只保留完整位点（无 gap、无简并/未知）
pub fn complete_sites<C: SiteContainer + ?Sized>(src: &C) -> Result<VectorSiteContainer> {
    filter_into(src, |s| tools::is_complete(s))
}

pub fn without_gap_only_sites<C: SiteContainer + ?Sized>(src: &C) -> Result<VectorSiteContainer> {
    filter_into(src, |s| !tools::is_gap_only(s))
}

pub fn without_gap_or_unresolved_only_sites<C: SiteContainer + ?Sized>(src: &C) -> Result<VectorSiteContainer> {
    filter_into(src, |s| !tools::is_gap_or_unresolved_only(s))
}

/// 原地删除全 gap 位点，返回删除的列数
pub fn remove_gap_only_sites<C: MutableSiteContainer + ?Sized>(c: &mut C) -> Result<usize> {
    let removed = delete_matching(c, |s| tools::is_gap_only(s))?;
    debug!("removed {} gap-only sites, {} left", removed, c.num_sites());
    Ok(removed)
}

pub fn remove_gap_or_unresolved_only_sites<C: MutableSiteContainer + ?Sized>(c: &mut C) -> Result<usize> {
    let removed = delete_matching(c, |s| tools::is_gap_or_unresolved_only(s))?;
    debug!("removed {} gap-or-unresolved-only sites, {} left", removed, c.num_sites());
    Ok(removed)
}

/// 删除 gap 比例严格大于 `max_freq_gaps` 的位点
pub fn remove_gap_sites<C: MutableSiteContainer + ?Sized>(c: &mut C, max_freq_gaps: f64) -> Result<usize> {
    if !(0.0..=1.0).contains(&max_freq_gaps) {
        return Err(SeqError::InvalidArgument(format!(
            "gap frequency threshold {max_freq_gaps} not in [0, 1]"
        )));
    }
    let n = c.num_sequences();
    if n == 0 {
        return Ok(0);
    }
    let removed = delete_matching(c, |s| tools::gap_count(s) as f64 / n as f64 > max_freq_gaps)?;
    debug!("removed {} sites with gap frequency > {}", removed, max_freq_gaps);
    Ok(removed)
}

/// 删除含终止密码子的位点，仅适用于密码子字母表
pub fn remove_sites_with_stop_codon<C: MutableSiteContainer + ?Sized>(
    c: &mut C,
    code: &GeneticCode,
) -> Result<usize> {
    code.check_alphabet(c.alphabet())?;
    let removed = delete_matching(c, |s| s.states().iter().any(|&x| code.is_stop(x)))?;
    debug!("removed {} sites with {} stop codons", removed, code.name());
    Ok(removed)
}

/// gap 全部替换为 unknown
pub fn change_gaps_to_unknown<C>(c: &mut C) -> Result<()>
where
    C: MutableSiteContainer + MutableSequenceContainer + ?Sized,
{
    let a = c.alphabet();
    replace_states(c, |s| if a.is_gap(s) { Some(a.unknown_code()) } else { None })
}

/// 简并码与 unknown 全部替换为 gap
pub fn change_unresolved_to_gaps<C>(c: &mut C) -> Result<()>
where
    C: MutableSiteContainer + MutableSequenceContainer + ?Sized,
{
    let a = c.alphabet();
    replace_states(c, |s| if a.is_unresolved(s) { Some(a.gap_code()) } else { None })
}

fn replace_states<C, F>(c: &mut C, f: F) -> Result<()>
where
    C: MutableSiteContainer + MutableSequenceContainer + ?Sized,
    F: Fn(i32) -> Option<i32>,
{
    let mut edits = Vec::new();
    for (j, site) in c.iter_sites().enumerate() {
        for (i, &s) in site.states().iter().enumerate() {
            if let Some(new) = f(s) {
                edits.push((i, j, new));
            }
        }
    }
    for (i, j, s) in edits {
        c.set_state(i, j, s)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::Sequence;
    use crate::util::alphabet::Alphabet;

    fn container(alphabet: Alphabet, rows: &[(&str, &str)]) -> VectorSiteContainer {
        VectorSiteContainer::from_sequences(
            rows.iter().map(|(n, t)| Sequence::from_text(*n, t, alphabet).unwrap()),
            alphabet,
        )
        .unwrap()
    }

    fn dna(rows: &[(&str, &str)]) -> VectorSiteContainer {
        container(Alphabet::Dna, rows)
    }

    fn text(c: &VectorSiteContainer, name: &str) -> String {
        c.sequence_by_name(name).unwrap().to_text()
    }

    #[test]
    fn gap_free_and_complete_copies() {
        let c = dna(&[("a", "AC-GNT"), ("b", "ACTGAT")]);
        let nogap = sites_without_gaps(&c).unwrap();
        assert_eq!(text(&nogap, "a"), "ACGNT");
        assert_eq!(nogap.site_positions(), vec![1, 2, 4, 5, 6]);
        let complete = complete_sites(&c).unwrap();
        assert_eq!(text(&complete, "a"), "ACGT");
        assert_eq!(text(&complete, "b"), "ACGT");
        // 输入未被修改
        assert_eq!(c.num_sites(), 6);
    }

    #[test]
    fn gap_only_runs_are_removed_in_place() {
        let mut c = dna(&[("a", "--A---C--"), ("b", "--G---T--")]);
        let removed = remove_gap_only_sites(&mut c).unwrap();
        assert_eq!(removed, 7);
        assert_eq!(text(&c, "a"), "AC");
        assert_eq!(text(&c, "b"), "GT");
        assert_eq!(c.site_positions(), vec![3, 7]);
    }

    #[test]
    fn gap_or_unresolved_is_broader_than_gap_only() {
        let c = dna(&[("a", "A-N-R"), ("b", "C-N-A")]);
        let gap_only = without_gap_only_sites(&c).unwrap();
        assert_eq!(text(&gap_only, "a"), "ANR");
        let gou = without_gap_or_unresolved_only_sites(&c).unwrap();
        assert_eq!(text(&gou, "a"), "AR");

        let mut inplace = c.clone();
        assert_eq!(remove_gap_or_unresolved_only_sites(&mut inplace).unwrap(), 3);
        assert_eq!(inplace, gou);
    }

    #[test]
    fn gap_frequency_threshold() {
        let mut c = dna(&[("a", "A--A"), ("b", "A-CA"), ("c", "AGC-"), ("d", "ATCA")]);
        // 比例：0, 0.5, 0.25, 0.25
        let removed = remove_gap_sites(&mut c, 0.3).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(text(&c, "c"), "AC-");
        assert!(remove_gap_sites(&mut c, 1.5).is_err());
        assert_eq!(remove_gap_sites(&mut c, 0.0).unwrap(), 2);
        assert_eq!(text(&c, "a"), "A");
    }

    #[test]
    fn stop_codon_sites() {
        let mut c = container(Alphabet::DnaCodon, &[("a", "ATGTAACCC"), ("b", "ATGCCCTGA")]);
        let removed = remove_sites_with_stop_codon(&mut c, &GeneticCode::standard()).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(text(&c, "a"), "ATG");

        let mut d = dna(&[("a", "TAA")]);
        assert!(matches!(
            remove_sites_with_stop_codon(&mut d, &GeneticCode::standard()),
            Err(SeqError::Unsupported { .. })
        ));
    }

    #[test]
    fn gap_and_unknown_conversion() {
        let mut c = dna(&[("a", "A-R"), ("b", "-NC")]);
        change_gaps_to_unknown(&mut c).unwrap();
        assert_eq!(text(&c, "a"), "ANR");
        assert_eq!(text(&c, "b"), "NNC");
        change_unresolved_to_gaps(&mut c).unwrap();
        assert_eq!(text(&c, "a"), "A--");
        assert_eq!(text(&c, "b"), "--C");
    }
}
