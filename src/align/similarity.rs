use clap::ValueEnum;
use log::{debug, warn};
use rayon::prelude::*;

use crate::container::{SequenceContainer, SiteContainer, VectorSiteContainer};
use crate::error::{check_alphabet, Result, SeqError};
use crate::seq::SymbolList;
use crate::sites::{without_gap_only_sites, without_gap_or_unresolved_only_sites};

/// 相似度计算时 gap 位置的处理方式
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GapPolicy {
    /// 所有位置都计入分母，gap 永远不算相同
    CountAll,
    /// 跳过两条序列同时为 gap 的位置
    IgnoreDoubleGap,
    /// 跳过任一序列为 gap 的位置
    IgnoreAnyGap,
    /// 跳过整个比对中全为 gap 的列；两条序列时即为双 gap 位置
    IgnoreAllGapColumns,
}

/// 两条等长序列相同的非 gap 位置比例；`as_distance` 时返回 `1 - 比例`。
///
/// `unresolved_as_gap` 把简并/未知状态当作 gap 处理。没有可比较位置时报错。
pub fn similarity<A, B>(seq1: &A, seq2: &B, as_distance: bool, policy: GapPolicy, unresolved_as_gap: bool) -> Result<f64>
where
    A: SymbolList + ?Sized,
    B: SymbolList + ?Sized,
{
    let alphabet = seq1.alphabet();
    check_alphabet(alphabet, seq2.alphabet())?;
    if seq1.len() != seq2.len() {
        return Err(SeqError::size_mismatch("sequence", seq2.len(), seq1.len()));
    }
    let is_gap = |s: i32| alphabet.is_gap(s) || (unresolved_as_gap && alphabet.is_unresolved(s));

    let mut same = 0usize;
    let mut total = 0usize;
    for (&x, &y) in seq1.states().iter().zip(seq2.states()) {
        let (gx, gy) = (is_gap(x), is_gap(y));
        let counted = match policy {
            GapPolicy::CountAll => true,
            GapPolicy::IgnoreDoubleGap | GapPolicy::IgnoreAllGapColumns => !(gx && gy),
            GapPolicy::IgnoreAnyGap => !(gx || gy),
        };
        if counted {
            total += 1;
            if x == y && !gx && !gy {
                same += 1;
            }
        }
    }
    if total == 0 {
        return Err(SeqError::Empty("no comparable positions between the two sequences".into()));
    }
    let r = same as f64 / total as f64;
    Ok(if as_distance { 1.0 - r } else { r })
}

/// 带行名的对称矩阵
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    names: Vec<String>,
    values: Vec<f64>,
}

impl DistanceMatrix {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        let n = self.len();
        if i >= n {
            return Err(SeqError::out_of_bounds("matrix row", i, n));
        }
        if j >= n {
            return Err(SeqError::out_of_bounds("matrix column", j, n));
        }
        Ok(self.values[i * n + j])
    }

    /// 按名称查找；同名时取第一个
    pub fn get_by_name(&self, a: &str, b: &str) -> Result<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        self.get(i, j)
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| SeqError::SequenceNotFound(name.to_string()))
    }
}

/// 所有行两两之间的相似度（或距离）矩阵，行对并行计算。
///
/// 某一对没有可比较位置时该格为 `NaN`，不影响其余格。
pub fn similarity_matrix<C>(src: &C, as_distance: bool, policy: GapPolicy, unresolved_as_gap: bool) -> Result<DistanceMatrix>
where
    C: SiteContainer + ?Sized,
{
    let (work, pair_policy) = if policy == GapPolicy::IgnoreAllGapColumns {
        let trimmed = if unresolved_as_gap {
            without_gap_or_unresolved_only_sites(src)?
        } else {
            without_gap_only_sites(src)?
        };
        (trimmed, GapPolicy::CountAll)
    } else {
        (VectorSiteContainer::from_container(src)?, policy)
    };

    let n = work.num_sequences();
    let rows: Vec<_> = work.to_sequences();
    let pairs: Vec<(usize, usize)> = (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j))).collect();
    debug!("computing {} pairwise {} values", pairs.len(), if as_distance { "distance" } else { "similarity" });

    let computed: Vec<f64> = pairs
        .par_iter()
        .map(|&(i, j)| match similarity(&rows[i], &rows[j], as_distance, pair_policy, unresolved_as_gap) {
            Err(SeqError::Empty(_)) => {
                warn!("'{}' and '{}' share no comparable positions", rows[i].name(), rows[j].name());
                Ok(f64::NAN)
            }
            other => other,
        })
        .collect::<Result<_>>()?;

    let diagonal = if as_distance { 0.0 } else { 1.0 };
    let mut values = vec![diagonal; n * n];
    for (&(i, j), &v) in pairs.iter().zip(&computed) {
        values[i * n + j] = v;
        values[j * n + i] = v;
    }
    Ok(DistanceMatrix { names: work.sequence_names(), values })
}
