use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeqError};
use crate::seq::SymbolList;
use crate::util::alphabet::Alphabet;

/// 一列比对位点：每条序列一个状态，外加比对坐标 `position`
///
/// 坐标只是标签，不要求连续或唯一。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SiteData")]
pub struct Site {
    position: i32,
    states: Vec<i32>,
    alphabet: Alphabet,
}

/// 反序列化中间形式，字段顺序与 `Site` 一致
#[derive(Deserialize)]
struct SiteData {
    position: i32,
    states: Vec<i32>,
    alphabet: Alphabet,
}

impl TryFrom<SiteData> for Site {
    type Error = SeqError;

    fn try_from(d: SiteData) -> Result<Self> {
        Site::new(d.states, d.alphabet, d.position)
    }
}

impl Site {
    pub fn new(states: Vec<i32>, alphabet: Alphabet, position: i32) -> Result<Self> {
        for &s in &states {
            alphabet.check_state(s)?;
        }
        Ok(Self { position, states, alphabet })
    }

    pub fn from_text(text: &str, alphabet: Alphabet, position: i32) -> Result<Self> {
        let states = alphabet.encode(text)?;
        Ok(Self { position, states, alphabet })
    }

    pub fn empty(alphabet: Alphabet, position: i32) -> Self {
        Self { position, states: Vec::new(), alphabet }
    }

    pub(crate) fn from_parts(states: Vec<i32>, alphabet: Alphabet, position: i32) -> Self {
        Self { position, states, alphabet }
    }

    #[inline]
    pub fn position(&self) -> i32 {
        self.position
    }

    #[inline]
    pub fn set_position(&mut self, position: i32) {
        self.position = position;
    }

    pub fn get(&self, row: usize) -> Result<i32> {
        self.states
            .get(row)
            .copied()
            .ok_or_else(|| SeqError::out_of_bounds("site row", row, self.states.len()))
    }

    pub fn set_state(&mut self, row: usize, state: i32) -> Result<()> {
        if row >= self.states.len() {
            return Err(SeqError::out_of_bounds("site row", row, self.states.len()));
        }
        self.alphabet.check_state(state)?;
        self.states[row] = state;
        Ok(())
    }

    pub fn into_states(self) -> Vec<i32> {
        self.states
    }

    // 以下仅供容器维护矩阵一致性使用，调用方负责长度与编码的校验

    #[inline]
    pub(crate) fn set_unchecked(&mut self, row: usize, state: i32) {
        self.states[row] = state;
    }

    #[inline]
    pub(crate) fn push_state(&mut self, state: i32) {
        self.states.push(state);
    }

    #[inline]
    pub(crate) fn insert_state(&mut self, row: usize, state: i32) {
        self.states.insert(row, state);
    }

    #[inline]
    pub(crate) fn remove_state(&mut self, row: usize) -> i32 {
        self.states.remove(row)
    }

    #[inline]
    pub(crate) fn states_mut(&mut self) -> &mut [i32] {
        &mut self.states
    }
}

impl SymbolList for Site {
    fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    fn states(&self) -> &[i32] {
        &self.states
    }
}

impl Index<usize> for Site {
    type Output = i32;

    fn index(&self, row: usize) -> &i32 {
        &self.states[row]
    }
}
