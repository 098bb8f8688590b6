use rand::Rng;

use crate::container::{MutableSiteContainer, SequenceContainer, SiteContainer, VectorSiteContainer};
use crate::error::{Result, SeqError};
use crate::sites::empty_with_rows;

/// 按给定顺序复制列；下标可重复（自助抽样即依赖这一点）
pub fn selected_sites<C: SiteContainer + ?Sized>(src: &C, selection: &[usize]) -> Result<VectorSiteContainer> {
    let n = src.num_sites();
    if let Some(&bad) = selection.iter().find(|&&j| j >= n) {
        return Err(SeqError::out_of_bounds("site", bad, n));
    }
    let mut out = empty_with_rows(src)?;
    for &j in selection {
        out.add_site(src.site(j)?.clone(), false)?;
    }
    Ok(out)
}

/// 以原始字符位置表达的选择，按字长换算为列下标。
///
/// 每个字必须完整、且从字边界开始连续选取，例如密码子字母表下
/// `[3, 4, 5, 0, 1, 2]` 对应列 `[1, 0]`。
pub fn selected_positions<C: SiteContainer + ?Sized>(src: &C, selection: &[usize]) -> Result<VectorSiteContainer> {
    let w = src.alphabet().state_coding_size();
    if selection.len() % w != 0 {
        return Err(SeqError::InvalidSelection(format!(
            "{} positions do not make whole words of size {}",
            selection.len(),
            w
        )));
    }
    let mut columns = Vec::with_capacity(selection.len() / w);
    for word in selection.chunks(w) {
        let start = word[0];
        if start % w != 0 {
            return Err(SeqError::InvalidSelection(format!(
                "position {start} is not on a word boundary of size {w}"
            )));
        }
        if word.iter().enumerate().any(|(k, &p)| p != start + k) {
            return Err(SeqError::InvalidSelection(format!(
                "positions {word:?} are not contiguous within a word"
            )));
        }
        columns.push(start / w);
    }
    selected_sites(src, &columns)
}

/// 有放回地均匀抽取 `n` 列，同时返回每个输出列对应的原始列下标
pub fn sample_sites_with_indices<C, R>(src: &C, n: usize, rng: &mut R) -> Result<(VectorSiteContainer, Vec<usize>)>
where
    C: SiteContainer + ?Sized,
    R: Rng,
{
    let m = src.num_sites();
    if m == 0 && n > 0 {
        return Err(SeqError::Empty("cannot sample sites from an alignment without sites".into()));
    }
    let picks: Vec<usize> = (0..n).map(|_| rng.gen_range(0..m)).collect();
    let out = selected_sites(src, &picks)?;
    Ok((out, picks))
}

pub fn sample_sites<C, R>(src: &C, n: usize, rng: &mut R) -> Result<VectorSiteContainer>
where
    C: SiteContainer + ?Sized,
    R: Rng,
{
    sample_sites_with_indices(src, n, rng).map(|(c, _)| c)
}

/// 自助抽样：抽取与原比对等长的列
pub fn bootstrap_sites<C, R>(src: &C, rng: &mut R) -> Result<VectorSiteContainer>
where
    C: SiteContainer + ?Sized,
    R: Rng,
{
    sample_sites(src, src.num_sites(), rng)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::seq::Site;
    use crate::util::alphabet::Alphabet;

    proptest! {
        #[test]
        fn sampling_preserves_dimensions(rows in 1usize..5, cols in 1usize..10, n in 0usize..30, seed: u64) {
            let mut c = VectorSiteContainer::with_size(rows, Alphabet::Dna);
            for j in 0..cols {
                c.add_site(Site::new(vec![(j % 4) as i32; rows], Alphabet::Dna, j as i32 + 1).unwrap(), false).unwrap();
            }
            let mut rng = StdRng::seed_from_u64(seed);
            let s = sample_sites(&c, n, &mut rng).unwrap();
            prop_assert_eq!(s.num_sites(), n);
            prop_assert_eq!(s.num_sequences(), rows);
        }
    }
}
