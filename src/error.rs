//! 核心库的错误类型。
//!
//! 每个变体都携带足够的上下文（下标、名称、长度、字母表），
//! 以便上层（CLI）直接输出可读的错误信息。

use thiserror::Error;

use crate::util::alphabet::Alphabet;

#[derive(Debug, Error)]
pub enum SeqError {
    /// 下标越界：`index` 不在 `[lower, upper)` 内
    #[error("{what} index {index} out of range [{lower}, {upper})")]
    IndexOutOfBounds {
        what: &'static str,
        index: usize,
        lower: usize,
        upper: usize,
    },

    #[error("{what}: length {actual} does not match expected {expected}")]
    SizeMismatch {
        what: &'static str,
        actual: usize,
        expected: usize,
    },

    #[error("alphabet mismatch: expected {expected}, found {found}")]
    AlphabetMismatch { expected: Alphabet, found: Alphabet },

    #[error("duplicate sequence name '{0}'")]
    DuplicateName(String),

    #[error("duplicate site position {0}")]
    DuplicatePosition(i32),

    #[error("sequence '{0}' not found")]
    SequenceNotFound(String),

    /// 需要至少一行 / 一列 / 一个位点的算法收到了空输入
    #[error("empty input: {0}")]
    Empty(String),

    /// 当前字母表不支持该操作（例如非密码子字母表上去除终止密码子）
    #[error("unsupported operation on {alphabet}: {reason}")]
    Unsupported { alphabet: Alphabet, reason: String },

    #[error("invalid symbol '{symbol}' for {alphabet}")]
    BadSymbol { alphabet: Alphabet, symbol: String },

    #[error("invalid state code {state} for {alphabet}")]
    BadState { alphabet: Alphabet, state: i32 },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, SeqError>;

impl SeqError {
    pub(crate) fn out_of_bounds(what: &'static str, index: usize, upper: usize) -> Self {
        SeqError::IndexOutOfBounds { what, index, lower: 0, upper }
    }

    pub(crate) fn size_mismatch(what: &'static str, actual: usize, expected: usize) -> Self {
        SeqError::SizeMismatch { what, actual, expected }
    }
}

/// 校验两个字母表是否一致（按类型标签比较）
pub(crate) fn check_alphabet(expected: Alphabet, found: Alphabet) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(SeqError::AlphabetMismatch { expected, found })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let e = SeqError::out_of_bounds("site", 7, 5);
        assert_eq!(e.to_string(), "site index 7 out of range [0, 5)");

        let e = SeqError::size_mismatch("site", 3, 4);
        assert_eq!(e.to_string(), "site: length 3 does not match expected 4");

        let e = check_alphabet(Alphabet::Dna, Alphabet::Protein).unwrap_err();
        assert_eq!(
            e.to_string(),
            "alphabet mismatch: expected DNA alphabet, found Protein alphabet"
        );
    }
}
