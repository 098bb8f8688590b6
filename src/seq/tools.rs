//! 单条状态列表（位点或序列）上的统计与判定。

use std::collections::BTreeMap;

use crate::error::{Result, SeqError};
use crate::seq::SymbolList;

pub fn has_gap<L: SymbolList + ?Sized>(list: &L) -> bool {
    let a = list.alphabet();
    list.states().iter().any(|&s| a.is_gap(s))
}

pub fn gap_count<L: SymbolList + ?Sized>(list: &L) -> usize {
    let a = list.alphabet();
    list.states().iter().filter(|&&s| a.is_gap(s)).count()
}

/// 全部为 gap（空列表视为 gap-only）
pub fn is_gap_only<L: SymbolList + ?Sized>(list: &L) -> bool {
    let a = list.alphabet();
    list.states().iter().all(|&s| a.is_gap(s))
}

pub fn is_gap_or_unresolved_only<L: SymbolList + ?Sized>(list: &L) -> bool {
    let a = list.alphabet();
    list.states().iter().all(|&s| a.is_gap(s) || a.is_unresolved(s))
}

pub fn has_unknown<L: SymbolList + ?Sized>(list: &L) -> bool {
    let a = list.alphabet();
    list.states().iter().any(|&s| a.is_unknown(s))
}

/// 既没有 gap 也没有简并/未知状态
pub fn is_complete<L: SymbolList + ?Sized>(list: &L) -> bool {
    let a = list.alphabet();
    list.states().iter().all(|&s| !a.is_gap(s) && !a.is_unresolved(s))
}

/// 所有（非 gap，若 `ignore_gap`）状态是否相同
pub fn is_constant<L: SymbolList + ?Sized>(list: &L, ignore_gap: bool) -> Result<bool> {
    let a = list.alphabet();
    let mut it = list.states().iter().copied().filter(|&s| !(ignore_gap && a.is_gap(s)));
    let first = it
        .next()
        .ok_or_else(|| SeqError::Empty("cannot test constancy of an empty list".into()))?;
    Ok(it.all(|s| s == first))
}

/// 按状态编码计数。`resolve_unresolved` 时简并码按 1/n 分摊到兼容的确定状态。
///
/// 返回有序 map，遍历顺序即状态编码升序。
pub fn state_counts<L: SymbolList + ?Sized>(list: &L, resolve_unresolved: bool) -> BTreeMap<i32, f64> {
    let a = list.alphabet();
    let mut counts: BTreeMap<i32, f64> = BTreeMap::new();
    for &s in list.states() {
        let resolved = if resolve_unresolved && a.is_unresolved(s) {
            a.resolved_states(s).ok().filter(|r| !r.is_empty())
        } else {
            None
        };
        match resolved {
            Some(resolved) => {
                let w = 1.0 / resolved.len() as f64;
                for r in resolved {
                    *counts.entry(r).or_insert(0.0) += w;
                }
            }
            // 确定状态，或无法展开的编码，按原编码计数
            None => *counts.entry(s).or_insert(0.0) += 1.0,
        }
    }
    counts
}

pub fn state_frequencies<L: SymbolList + ?Sized>(list: &L, resolve_unresolved: bool) -> BTreeMap<i32, f64> {
    let n = list.len();
    let mut freqs = state_counts(list, resolve_unresolved);
    if n > 0 {
        for v in freqs.values_mut() {
            *v /= n as f64;
        }
    }
    freqs
}

/// 不同的非 gap 状态数
pub fn distinct_state_count<L: SymbolList + ?Sized>(list: &L) -> usize {
    let a = list.alphabet();
    state_counts(list, false).keys().filter(|&&s| !a.is_gap(s)).count()
}

/// Shannon 熵（自然对数）
pub fn entropy<L: SymbolList + ?Sized>(list: &L, ignore_gap: bool) -> Result<f64> {
    let a = list.alphabet();
    let mut counts = state_counts(list, false);
    if ignore_gap {
        counts.remove(&a.gap_code());
    }
    let total: f64 = counts.values().sum();
    if total == 0.0 {
        return Err(SeqError::Empty("cannot compute entropy of an empty list".into()));
    }
    let h = counts
        .values()
        .map(|&c| c / total)
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.ln())
        .sum();
    Ok(h)
}
