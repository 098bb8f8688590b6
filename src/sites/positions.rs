use crate::container::SiteContainer;
use crate::error::{Result, SeqError};

/// 每行每列对应的残基序号（从 1 开始，gap 为 0）。
///
/// 比对质量评估（CS / SPS）用它在两个比对之间识别同一个残基。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequencePositions {
    names: Vec<String>,
    num_sites: usize,
    // 行优先展平：values[row * num_sites + col]
    values: Vec<usize>,
}

impl SequencePositions {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn num_rows(&self) -> usize {
        self.names.len()
    }

    pub fn num_sites(&self) -> usize {
        self.num_sites
    }

    pub fn get(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.num_rows() {
            return Err(SeqError::out_of_bounds("sequence", row, self.num_rows()));
        }
        if col >= self.num_sites {
            return Err(SeqError::out_of_bounds("site", col, self.num_sites));
        }
        Ok(self.values[row * self.num_sites + col])
    }

    pub fn row(&self, row: usize) -> Result<&[usize]> {
        if row >= self.num_rows() {
            return Err(SeqError::out_of_bounds("sequence", row, self.num_rows()));
        }
        Ok(&self.values[row * self.num_sites..(row + 1) * self.num_sites])
    }

    /// 第 `row` 行的残基总数
    pub fn residue_count(&self, row: usize) -> Result<usize> {
        Ok(self.row(row)?.iter().copied().max().unwrap_or(0))
    }
}

pub fn sequence_positions<C: SiteContainer + ?Sized>(src: &C) -> Result<SequencePositions> {
    let n = src.num_sequences();
    let m = src.num_sites();
    let alphabet = src.alphabet();
    let mut values = vec![0usize; n * m];
    let mut counters = vec![0usize; n];
    for (j, site) in src.iter_sites().enumerate() {
        for i in 0..n {
            let s = site.get(i)?;
            if !alphabet.is_gap(s) {
                counters[i] += 1;
                values[i * m + j] = counters[i];
            }
        }
    }
    Ok(SequencePositions { names: src.sequence_names(), num_sites: m, values })
}

/// 每行中第 k 个残基所在的列号（从 1 开始）
pub fn alignment_positions<C: SiteContainer + ?Sized>(src: &C) -> Result<Vec<Vec<usize>>> {
    let alphabet = src.alphabet();
    let mut out = vec![Vec::new(); src.num_sequences()];
    for (j, site) in src.iter_sites().enumerate() {
        for (i, cols) in out.iter_mut().enumerate() {
            if !alphabet.is_gap(site.get(i)?) {
                cols.push(j + 1);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::VectorSiteContainer;
    use crate::seq::Sequence;
    use crate::util::alphabet::Alphabet;

    fn dna() -> VectorSiteContainer {
        VectorSiteContainer::from_sequences(
            vec![
                Sequence::from_text("a", "A-CG", Alphabet::Dna).unwrap(),
                Sequence::from_text("b", "--TT", Alphabet::Dna).unwrap(),
            ],
            Alphabet::Dna,
        )
        .unwrap()
    }

    #[test]
    fn residue_numbering() {
        let p = sequence_positions(&dna()).unwrap();
        assert_eq!(p.row(0).unwrap(), &[1, 0, 2, 3]);
        assert_eq!(p.row(1).unwrap(), &[0, 0, 1, 2]);
        assert_eq!(p.get(1, 3).unwrap(), 2);
        assert_eq!(p.residue_count(0).unwrap(), 3);
        assert!(p.get(2, 0).is_err());
        assert!(p.get(0, 4).is_err());
        assert_eq!(p.names(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn residue_columns() {
        let cols = alignment_positions(&dna()).unwrap();
        assert_eq!(cols, vec![vec![1, 3, 4], vec![3, 4]]);
    }
}
