use crate::error::{Result, SeqError};
use crate::util::alphabet::Alphabet;

/// 对称的替换打分索引
pub trait ScoreIndex: Sync {
    fn alphabet(&self) -> Alphabet;

    /// `score(a, b) == score(b, a)`
    fn score(&self, a: i32, b: i32) -> i32;
}

/// 相同得 `match_score`，不同得 `mismatch_score`（两者均为加到总分上的值）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimpleScore {
    alphabet: Alphabet,
    pub match_score: i32,
    pub mismatch_score: i32,
}

impl SimpleScore {
    pub fn new(alphabet: Alphabet, match_score: i32, mismatch_score: i32) -> Self {
        Self { alphabet, match_score, mismatch_score }
    }
}

impl ScoreIndex for SimpleScore {
    fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    fn score(&self, a: i32, b: i32) -> i32 {
        if a == b {
            self.match_score
        } else {
            self.mismatch_score
        }
    }
}

/// 确定状态之间的完整打分矩阵；涉及简并/未知状态的配对统一得 `unresolved_score`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreMatrix {
    alphabet: Alphabet,
    size: usize,
    values: Vec<i32>,
    unresolved_score: i32,
}

impl ScoreMatrix {
    /// `rows` 必须是 `alphabet.size()` 阶的对称方阵
    pub fn new(alphabet: Alphabet, rows: Vec<Vec<i32>>, unresolved_score: i32) -> Result<Self> {
        let size = alphabet.size();
        if rows.len() != size {
            return Err(SeqError::size_mismatch("score matrix rows", rows.len(), size));
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != size) {
            return Err(SeqError::size_mismatch("score matrix row", bad.len(), size));
        }
        for i in 0..size {
            for j in (i + 1)..size {
                if rows[i][j] != rows[j][i] {
                    return Err(SeqError::InvalidArgument(format!(
                        "score matrix is not symmetric at ({i}, {j}): {} != {}",
                        rows[i][j], rows[j][i]
                    )));
                }
            }
        }
        Ok(Self { alphabet, size, values: rows.into_iter().flatten().collect(), unresolved_score })
    }

    /// 对角线 `match_score`，其余 `mismatch_score`
    pub fn identity(alphabet: Alphabet, match_score: i32, mismatch_score: i32) -> Self {
        let size = alphabet.size();
        let values = (0..size * size)
            .map(|k| if k / size == k % size { match_score } else { mismatch_score })
            .collect();
        Self { alphabet, size, values, unresolved_score: mismatch_score }
    }
}

impl ScoreIndex for ScoreMatrix {
    fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    fn score(&self, a: i32, b: i32) -> i32 {
        let n = self.size as i32;
        if (0..n).contains(&a) && (0..n).contains(&b) {
            self.values[a as usize * self.size + b as usize]
        } else {
            self.unresolved_score
        }
    }
}
