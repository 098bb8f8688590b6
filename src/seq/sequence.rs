use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeqError};
use crate::seq::SymbolList;
use crate::util::alphabet::Alphabet;

/// 一条序列：名称 + 状态编码 + 注释
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SequenceData")]
pub struct Sequence {
    name: String,
    states: Vec<i32>,
    comments: Vec<String>,
    alphabet: Alphabet,
}

#[derive(Deserialize)]
struct SequenceData {
    name: String,
    states: Vec<i32>,
    comments: Vec<String>,
    alphabet: Alphabet,
}

impl TryFrom<SequenceData> for Sequence {
    type Error = SeqError;

    fn try_from(d: SequenceData) -> Result<Self> {
        Ok(Sequence::new(d.name, d.states, d.alphabet)?.with_comments(d.comments))
    }
}

/// 非法编码的输出占位符
const INVALID_SYMBOL: char = '?';

impl Sequence {
    /// 校验所有状态编码后构造
    pub fn new(name: impl Into<String>, states: Vec<i32>, alphabet: Alphabet) -> Result<Self> {
        for &s in &states {
            alphabet.check_state(s)?;
        }
        Ok(Self::from_parts(name.into(), states, Vec::new(), alphabet))
    }

    pub fn from_text(name: impl Into<String>, text: &str, alphabet: Alphabet) -> Result<Self> {
        let states = alphabet.encode(text)?;
        Ok(Self::from_parts(name.into(), states, Vec::new(), alphabet))
    }

    pub fn empty(name: impl Into<String>, alphabet: Alphabet) -> Self {
        Self::from_parts(name.into(), Vec::new(), Vec::new(), alphabet)
    }

    pub(crate) fn from_parts(
        name: String,
        states: Vec<i32>,
        comments: Vec<String>,
        alphabet: Alphabet,
    ) -> Self {
        Self { name, states, comments, alphabet }
    }

    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn set_comments(&mut self, comments: Vec<String>) {
        self.comments = comments;
    }

    pub fn get(&self, pos: usize) -> Result<i32> {
        self.states
            .get(pos)
            .copied()
            .ok_or_else(|| SeqError::out_of_bounds("sequence position", pos, self.states.len()))
    }

    pub fn set_state(&mut self, pos: usize, state: i32) -> Result<()> {
        if pos >= self.states.len() {
            return Err(SeqError::out_of_bounds("sequence position", pos, self.states.len()));
        }
        self.alphabet.check_state(state)?;
        self.states[pos] = state;
        Ok(())
    }

    /// 整体替换内容
    pub fn set_content(&mut self, states: Vec<i32>) -> Result<()> {
        for &s in &states {
            self.alphabet.check_state(s)?;
        }
        self.states = states;
        Ok(())
    }

    pub fn append(&mut self, states: &[i32]) -> Result<()> {
        for &s in states {
            self.alphabet.check_state(s)?;
        }
        self.states.extend_from_slice(states);
        Ok(())
    }

    pub fn delete_elements(&mut self, pos: usize, len: usize) -> Result<()> {
        let end = pos.checked_add(len).unwrap_or(usize::MAX);
        if end > self.states.len() {
            return Err(SeqError::out_of_bounds("sequence position", end.saturating_sub(1), self.states.len()));
        }
        self.states.drain(pos..end);
        Ok(())
    }

    /// 右端补 gap 或截断到 `size`
    pub fn set_to_size_right(&mut self, size: usize) {
        self.states.resize(size, self.alphabet.gap_code());
    }

    /// 左端补 gap 或截断到 `size`
    pub fn set_to_size_left(&mut self, size: usize) {
        let n = self.states.len();
        if size < n {
            self.states.drain(..n - size);
        } else if size > n {
            let pad = vec![self.alphabet.gap_code(); size - n];
            self.states.splice(0..0, pad);
        }
    }

    pub fn sub_sequence(&self, begin: usize, len: usize) -> Result<Sequence> {
        let end = begin.checked_add(len).unwrap_or(usize::MAX);
        if end > self.states.len() {
            return Err(SeqError::out_of_bounds("sequence position", end.saturating_sub(1), self.states.len()));
        }
        Ok(Self::from_parts(
            self.name.clone(),
            self.states[begin..end].to_vec(),
            self.comments.clone(),
            self.alphabet,
        ))
    }

    pub fn without_gaps(&self) -> Sequence {
        let gap = self.alphabet.gap_code();
        let states = self.states.iter().copied().filter(|&s| s != gap).collect();
        Self::from_parts(self.name.clone(), states, self.comments.clone(), self.alphabet)
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn into_states(self) -> Vec<i32> {
        self.states
    }
}

impl SymbolList for Sequence {
    fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    fn states(&self) -> &[i32] {
        &self.states
    }
}

/// 不做边界检查的访问，越界直接 panic
impl Index<usize> for Sequence {
    type Output = i32;

    fn index(&self, pos: usize) -> &i32 {
        &self.states[pos]
    }
}

/// 非法编码按字母表宽度写成 `?`，不返回 `fmt::Error`
impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &s in &self.states {
            match self.alphabet.int_to_char(s) {
                Ok(sym) => f.write_str(&sym)?,
                Err(_) => {
                    for _ in 0..self.alphabet.state_coding_size() {
                        write!(f, "{INVALID_SYMBOL}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dna(name: &str, text: &str) -> Sequence {
        Sequence::from_text(name, text, Alphabet::Dna).unwrap()
    }

    #[test]
    fn checked_and_unchecked_access() {
        let mut s = dna("s1", "ACGT");
        assert_eq!(s.get(2).unwrap(), 2);
        assert_eq!(s[3], 3);
        assert!(matches!(s.get(4), Err(SeqError::IndexOutOfBounds { index: 4, upper: 4, .. })));
        s.set_state(0, -1).unwrap();
        assert_eq!(s.to_text(), "-CGT");
        assert!(s.set_state(0, 99).is_err());
        assert!(s.set_state(9, 0).is_err());
    }

    #[test]
    fn resize_pads_with_gaps() {
        let mut s = dna("s1", "ACGT");
        s.set_to_size_right(6);
        assert_eq!(s.to_text(), "ACGT--");
        s.set_to_size_left(8);
        assert_eq!(s.to_text(), "--ACGT--");
        s.set_to_size_left(5);
        assert_eq!(s.to_text(), "CGT--");
        s.set_to_size_right(2);
        assert_eq!(s.to_text(), "CG");
    }

    #[test]
    fn sub_sequence_and_gap_removal() {
        let s = dna("s1", "A-CG-T").with_comments(vec!["note".into()]);
        let sub = s.sub_sequence(1, 3).unwrap();
        assert_eq!(sub.to_text(), "-CG");
        assert_eq!(sub.comments(), ["note".to_string()]);
        assert!(s.sub_sequence(4, 3).is_err());
        assert_eq!(s.without_gaps().to_text(), "ACGT");
    }

    #[test]
    fn append_and_delete() {
        let mut s = dna("s1", "AC");
        s.append(&[2, 3]).unwrap();
        assert_eq!(s.to_text(), "ACGT");
        assert!(s.append(&[42]).is_err());
        assert_eq!(s.len(), 4);
        s.delete_elements(1, 2).unwrap();
        assert_eq!(s.to_text(), "AT");
        assert!(s.delete_elements(1, 5).is_err());
    }

    #[test]
    fn deserialize_checks_states() {
        let good = dna("s1", "AC-T").with_comments(vec!["x".into()]);
        let back: Sequence = bincode::deserialize(&bincode::serialize(&good).unwrap()).unwrap();
        assert_eq!(back, good);

        let bad = Sequence::from_parts("s2".into(), vec![0, 99], Vec::new(), Alphabet::Dna);
        let bytes = bincode::serialize(&bad).unwrap();
        assert!(bincode::deserialize::<Sequence>(&bytes).is_err());
    }

    #[test]
    fn display_never_fails_on_bad_codes() {
        let bad = Sequence::from_parts("s".into(), vec![0, 99, -1], Vec::new(), Alphabet::Dna);
        assert_eq!(bad.to_text(), "A?-");
        let codon = Sequence::from_parts("c".into(), vec![0, 500], Vec::new(), Alphabet::DnaCodon);
        assert_eq!(codon.to_text(), "AAA???");
    }
}
