//! 字母表：符号 <-> 整数状态编码。
//!
//! 编码约定：
//! - 间隙（gap）统一编码为 `-1`
//! - 核酸：A/C/G/T(U) = 0..4，IUPAC 简并码 M R W S Y K V H D B = 4..14，N = 14（unknown）
//! - 蛋白：20 种氨基酸 = 0..20，B Z J = 20..23，X = 23（unknown）
//! - 密码子：16*n1 + 4*n2 + n3 = 0..64，64 为 unknown，`---` 为 gap
//!
//! 字母表是值类型，按类型标签比较，显式构造后按值传递。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeqError};

pub const GAP: i32 = -1;

const DNA_SYMBOLS: &[u8; 15] = b"ACGTMRWSYKVHDBN";
const RNA_SYMBOLS: &[u8; 15] = b"ACGUMRWSYKVHDBN";
// bit 0..4 = A C G T
const NUCLEIC_MASKS: [u8; 15] = [1, 2, 4, 8, 3, 5, 9, 6, 10, 12, 7, 11, 13, 14, 15];
const NUCLEIC_UNKNOWN: i32 = 14;

const PROTEIN_SYMBOLS: &[u8; 24] = b"ARNDCQEGHILKMFPSTWYVBZJX";
const PROTEIN_UNKNOWN: i32 = 23;

const CODON_UNKNOWN: i32 = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alphabet {
    Dna,
    Rna,
    Protein,
    DnaCodon,
    RnaCodon,
}

impl Alphabet {
    pub fn name(&self) -> &'static str {
        match self {
            Alphabet::Dna => "DNA alphabet",
            Alphabet::Rna => "RNA alphabet",
            Alphabet::Protein => "Protein alphabet",
            Alphabet::DnaCodon => "Codon alphabet (DNA)",
            Alphabet::RnaCodon => "Codon alphabet (RNA)",
        }
    }

    #[inline]
    pub fn gap_code(&self) -> i32 {
        GAP
    }

    #[inline]
    pub fn unknown_code(&self) -> i32 {
        match self {
            Alphabet::Dna | Alphabet::Rna => NUCLEIC_UNKNOWN,
            Alphabet::Protein => PROTEIN_UNKNOWN,
            Alphabet::DnaCodon | Alphabet::RnaCodon => CODON_UNKNOWN,
        }
    }

    /// 完全确定（非简并）的状态数
    #[inline]
    pub fn size(&self) -> usize {
        match self {
            Alphabet::Dna | Alphabet::Rna => 4,
            Alphabet::Protein => 20,
            Alphabet::DnaCodon | Alphabet::RnaCodon => 64,
        }
    }

    /// 所有非 gap 状态数（含简并码与 unknown）
    #[inline]
    pub fn num_states(&self) -> usize {
        self.unknown_code() as usize + 1
    }

    /// 每个状态在文本中占用的字符数
    #[inline]
    pub fn state_coding_size(&self) -> usize {
        if self.is_codon() {
            3
        } else {
            1
        }
    }

    #[inline]
    pub fn is_codon(&self) -> bool {
        matches!(self, Alphabet::DnaCodon | Alphabet::RnaCodon)
    }

    #[inline]
    pub fn is_nucleic(&self) -> bool {
        matches!(self, Alphabet::Dna | Alphabet::Rna)
    }

    #[inline]
    pub fn is_gap(&self, state: i32) -> bool {
        state == GAP
    }

    #[inline]
    pub fn is_unknown(&self, state: i32) -> bool {
        state == self.unknown_code()
    }

    /// 简并码或 unknown；gap 不算
    #[inline]
    pub fn is_unresolved(&self, state: i32) -> bool {
        state >= self.size() as i32 && state <= self.unknown_code()
    }

    #[inline]
    pub fn is_valid_state(&self, state: i32) -> bool {
        state == GAP || (0..self.num_states() as i32).contains(&state)
    }

    pub fn check_state(&self, state: i32) -> Result<()> {
        if self.is_valid_state(state) {
            Ok(())
        } else {
            Err(SeqError::BadState { alphabet: *self, state })
        }
    }

    /// 单个符号（密码子字母表为 3 个字符）转为状态编码
    pub fn char_to_int(&self, symbol: &str) -> Result<i32> {
        let bad = || SeqError::BadSymbol { alphabet: *self, symbol: symbol.to_string() };
        let bytes = symbol.as_bytes();
        if bytes.len() != self.state_coding_size() {
            return Err(bad());
        }
        match self {
            Alphabet::Dna | Alphabet::Rna | Alphabet::Protein => {
                self.byte_to_int(bytes[0]).ok_or_else(bad)
            }
            Alphabet::DnaCodon | Alphabet::RnaCodon => {
                if bytes.iter().all(|&b| b == b'-') {
                    return Ok(GAP);
                }
                let nucleic = self.nucleic_alphabet();
                let mut codon = 0i32;
                for &b in bytes {
                    let s = nucleic.byte_to_int(b).ok_or_else(bad)?;
                    if nucleic.is_gap(s) {
                        return Err(bad());
                    }
                    if nucleic.is_unresolved(s) {
                        return Ok(CODON_UNKNOWN);
                    }
                    codon = codon * 4 + s;
                }
                Ok(codon)
            }
        }
    }

    pub fn int_to_char(&self, state: i32) -> Result<String> {
        self.check_state(state)?;
        if state == GAP {
            return Ok("-".repeat(self.state_coding_size()));
        }
        let s = state as usize;
        let out = match self {
            Alphabet::Dna => (DNA_SYMBOLS[s] as char).to_string(),
            Alphabet::Rna => (RNA_SYMBOLS[s] as char).to_string(),
            Alphabet::Protein => (PROTEIN_SYMBOLS[s] as char).to_string(),
            Alphabet::DnaCodon | Alphabet::RnaCodon => {
                if state == CODON_UNKNOWN {
                    "NNN".to_string()
                } else {
                    let table = if *self == Alphabet::DnaCodon { DNA_SYMBOLS } else { RNA_SYMBOLS };
                    codon_nucleotides(state)
                        .iter()
                        .map(|&n| table[n as usize] as char)
                        .collect()
                }
            }
        };
        Ok(out)
    }

    /// 将文本编码为状态序列；忽略空白字符
    pub fn encode(&self, text: &str) -> Result<Vec<i32>> {
        let chars: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
        let w = self.state_coding_size();
        if chars.len() % w != 0 {
            let tail = &chars[chars.len() - chars.len() % w..];
            return Err(SeqError::BadSymbol {
                alphabet: *self,
                symbol: String::from_utf8_lossy(tail).into_owned(),
            });
        }
        let mut out = Vec::with_capacity(chars.len() / w);
        for word in chars.chunks(w) {
            if w == 1 {
                let b = word[0];
                let s = self.byte_to_int(b).ok_or_else(|| SeqError::BadSymbol {
                    alphabet: *self,
                    symbol: (b as char).to_string(),
                })?;
                out.push(s);
            } else {
                out.push(self.char_to_int(&String::from_utf8_lossy(word))?);
            }
        }
        Ok(out)
    }

    pub fn decode(&self, states: &[i32]) -> Result<String> {
        let mut out = String::with_capacity(states.len() * self.state_coding_size());
        for &s in states {
            out.push_str(&self.int_to_char(s)?);
        }
        Ok(out)
    }

    /// 简并码展开为其兼容的确定状态；确定状态与 gap 原样返回
    pub fn resolved_states(&self, state: i32) -> Result<Vec<i32>> {
        self.check_state(state)?;
        if state == GAP || !self.is_unresolved(state) {
            return Ok(vec![state]);
        }
        let out = match self {
            Alphabet::Dna | Alphabet::Rna => {
                let mask = NUCLEIC_MASKS[state as usize];
                (0..4).filter(|b| mask & (1 << b) != 0).collect()
            }
            Alphabet::Protein => match state {
                20 => vec![2, 3],
                21 => vec![5, 6],
                22 => vec![9, 10],
                _ => (0..20).collect(),
            },
            Alphabet::DnaCodon | Alphabet::RnaCodon => (0..64).collect(),
        };
        Ok(out)
    }

    /// 密码子字母表对应的核酸字母表
    pub fn nucleic_alphabet(&self) -> Alphabet {
        match self {
            Alphabet::Rna | Alphabet::RnaCodon => Alphabet::Rna,
            _ => Alphabet::Dna,
        }
    }

    fn byte_to_int(&self, b: u8) -> Option<i32> {
        if b == b'-' {
            return Some(GAP);
        }
        let up = b.to_ascii_uppercase();
        let table: &[u8] = match self {
            Alphabet::Dna | Alphabet::DnaCodon => DNA_SYMBOLS,
            Alphabet::Rna | Alphabet::RnaCodon => RNA_SYMBOLS,
            Alphabet::Protein => PROTEIN_SYMBOLS,
        };
        if let Some(pos) = table.iter().position(|&c| c == up) {
            return Some(pos as i32);
        }
        match (self, up) {
            (Alphabet::Protein, b'?') => Some(PROTEIN_UNKNOWN),
            (Alphabet::Protein, _) => None,
            (_, b'X') | (_, b'?') | (_, b'O') => Some(NUCLEIC_UNKNOWN),
            _ => None,
        }
    }
}

/// 由三个确定核苷酸（0..4）组合密码子状态
#[inline]
pub fn codon_from_nucleotides(n1: i32, n2: i32, n3: i32) -> i32 {
    n1 * 16 + n2 * 4 + n3
}

#[inline]
pub fn codon_nucleotides(codon: i32) -> [i32; 3] {
    [codon / 16, (codon / 4) % 4, codon % 4]
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Alphabet {
    type Err = SeqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dna" => Ok(Alphabet::Dna),
            "rna" => Ok(Alphabet::Rna),
            "protein" | "aa" => Ok(Alphabet::Protein),
            "dna-codon" | "codon" => Ok(Alphabet::DnaCodon),
            "rna-codon" => Ok(Alphabet::RnaCodon),
            other => Err(SeqError::InvalidArgument(format!("unknown alphabet '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dna_round_trip() {
        let a = Alphabet::Dna;
        let states = a.encode("ACgt-NR").unwrap();
        assert_eq!(states, vec![0, 1, 2, 3, -1, 14, 5]);
        assert_eq!(a.decode(&states).unwrap(), "ACGT-NR");
    }

    #[test]
    fn unresolved_and_gap_queries() {
        let a = Alphabet::Dna;
        assert!(a.is_gap(-1));
        assert!(!a.is_unresolved(-1));
        assert!(a.is_unresolved(5));
        assert!(a.is_unresolved(14));
        assert!(!a.is_unresolved(3));
        assert_eq!(a.resolved_states(5).unwrap(), vec![0, 2]);
        assert_eq!(a.resolved_states(14).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(a.resolved_states(-1).unwrap(), vec![-1]);
    }

    #[test]
    fn protein_codes() {
        let a = Alphabet::Protein;
        assert_eq!(a.char_to_int("W").unwrap(), 17);
        assert_eq!(a.char_to_int("X").unwrap(), 23);
        assert_eq!(a.resolved_states(20).unwrap(), vec![2, 3]);
        assert!(a.char_to_int("*").is_err());
    }

    #[test]
    fn codon_words() {
        let a = Alphabet::DnaCodon;
        assert_eq!(a.state_coding_size(), 3);
        let states = a.encode("ATG---TAANNN").unwrap();
        assert_eq!(states, vec![codon_from_nucleotides(0, 3, 2), -1, 48, 64]);
        assert_eq!(a.decode(&states).unwrap(), "ATG---TAANNN");
        assert!(a.encode("ATGC").is_err());
        assert!(a.char_to_int("A-G").is_err());
        assert_eq!(Alphabet::RnaCodon.int_to_char(48).unwrap(), "UAA");
    }

    #[test]
    fn bad_symbol_is_reported() {
        let err = Alphabet::Dna.encode("ACZ").unwrap_err();
        assert!(matches!(err, SeqError::BadSymbol { ref symbol, .. } if symbol == "Z"));
        assert!(Alphabet::Dna.int_to_char(15).is_err());
    }

    #[test]
    fn parse_from_cli_names() {
        assert_eq!("dna".parse::<Alphabet>().unwrap(), Alphabet::Dna);
        assert_eq!("RNA-codon".parse::<Alphabet>().unwrap(), Alphabet::RnaCodon);
        assert!("binary".parse::<Alphabet>().is_err());
    }
}
