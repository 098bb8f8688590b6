//! 以参考比对为基准的比对质量分数（BAliBASE 风格的 CS / SPS）。
//!
//! 两个比对都先转换成 [`SequencePositions`]：同一个残基在两边的编号相同，
//! 因此可以逐列比较测试比对与参考比对是否把同样的残基放在一起。

use crate::error::{Result, SeqError};
use crate::sites::SequencePositions;

/// 参考比对中每行每个残基所在的列（0 起）
struct ResidueColumns(Vec<Vec<usize>>);

impl ResidueColumns {
    fn new(reference: &SequencePositions) -> Result<Self> {
        let mut rows = Vec::with_capacity(reference.num_rows());
        for r in 0..reference.num_rows() {
            let cols = reference
                .row(r)?
                .iter()
                .enumerate()
                .filter(|&(_, &p)| p > 0)
                .map(|(c, _)| c)
                .collect();
            rows.push(cols);
        }
        Ok(Self(rows))
    }

    fn column_of(&self, row: usize, residue: usize, names: &[String]) -> Result<usize> {
        self.0[row].get(residue - 1).copied().ok_or_else(|| {
            SeqError::InvalidArgument(format!(
                "residue {} of sequence '{}' is missing from the reference alignment",
                residue, names[row]
            ))
        })
    }
}

fn check_rows(test: &SequencePositions, reference: &SequencePositions) -> Result<()> {
    if test.num_rows() != reference.num_rows() {
        return Err(SeqError::size_mismatch("reference sequences", reference.num_rows(), test.num_rows()));
    }
    if let Some((a, b)) = test.names().iter().zip(reference.names()).find(|(a, b)| a != b) {
        return Err(SeqError::InvalidArgument(format!(
            "sequence order differs between alignments: '{a}' vs '{b}'"
        )));
    }
    Ok(())
}

/// 列分数：测试比对的某列在参考比对中原样出现（残基与 gap 的分布都一致）为 1，否则 0；
/// 全 gap 列为 `None`。
pub fn column_scores(test: &SequencePositions, reference: &SequencePositions) -> Result<Vec<Option<i32>>> {
    check_rows(test, reference)?;
    let lookup = ResidueColumns::new(reference)?;
    let n = test.num_rows();
    let mut scores = Vec::with_capacity(test.num_sites());
    for col in 0..test.num_sites() {
        // 找一个非 gap 的残基作为锚点
        let mut anchor = None;
        for row in 0..n {
            let p = test.get(row, col)?;
            if p > 0 {
                anchor = Some((row, p));
                break;
            }
        }
        let Some((row, p)) = anchor else {
            scores.push(None);
            continue;
        };
        let ref_col = lookup.column_of(row, p, test.names())?;
        let mut same = true;
        for r in 0..n {
            if test.get(r, col)? != reference.get(r, ref_col)? {
                same = false;
                break;
            }
        }
        scores.push(Some(same as i32));
    }
    Ok(scores)
}

/// 成对分数：测试比对某列中所有非 gap 残基对，在参考比对中同样对齐的比例；
/// 少于两个残基的列为 `None`。
pub fn sum_of_pairs_scores(test: &SequencePositions, reference: &SequencePositions) -> Result<Vec<Option<f64>>> {
    check_rows(test, reference)?;
    let lookup = ResidueColumns::new(reference)?;
    let n = test.num_rows();
    let mut scores = Vec::with_capacity(test.num_sites());
    for col in 0..test.num_sites() {
        let mut aligned = 0usize;
        let mut total = 0usize;
        for j in 0..n {
            let pj = test.get(j, col)?;
            if pj == 0 {
                continue;
            }
            let ref_col = lookup.column_of(j, pj, test.names())?;
            for l in (j + 1)..n {
                let pl = test.get(l, col)?;
                if pl == 0 {
                    continue;
                }
                total += 1;
                if reference.get(l, ref_col)? == pl {
                    aligned += 1;
                }
            }
        }
        scores.push(if total == 0 { None } else { Some(aligned as f64 / total as f64) });
    }
    Ok(scores)
}
