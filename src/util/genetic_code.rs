use crate::error::{Result, SeqError};
use crate::util::alphabet::{codon_from_nucleotides, Alphabet};

// 核苷酸编码 A=0 C=1 G=2 T=3
const TAA: i32 = 3 * 16;
const TAG: i32 = 3 * 16 + 2;
const TGA: i32 = 3 * 16 + 2 * 4;
const AGA: i32 = 2 * 4;
const AGG: i32 = 2 * 4 + 2;

/// 遗传密码表（只关心终止密码子）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneticCode {
    name: &'static str,
    ncbi_id: u32,
    stops: Vec<i32>,
}

impl GeneticCode {
    pub fn standard() -> Self {
        Self { name: "Standard", ncbi_id: 1, stops: vec![TAA, TAG, TGA] }
    }

    pub fn vertebrate_mitochondrial() -> Self {
        Self { name: "Vertebrate Mitochondrial", ncbi_id: 2, stops: vec![AGA, AGG, TAA, TAG] }
    }

    pub fn from_ncbi_id(id: u32) -> Result<Self> {
        match id {
            1 => Ok(Self::standard()),
            2 => Ok(Self::vertebrate_mitochondrial()),
            _ => Err(SeqError::InvalidArgument(format!("unsupported genetic code {id}"))),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ncbi_id(&self) -> u32 {
        self.ncbi_id
    }

    pub fn stop_codons(&self) -> &[i32] {
        &self.stops
    }

    /// gap 与 unknown 都不是终止密码子
    #[inline]
    pub fn is_stop(&self, codon: i32) -> bool {
        self.stops.contains(&codon)
    }

    /// 核苷酸三联体形式的查询，`n1..n3` 为确定的核苷酸编码
    pub fn is_stop_triplet(&self, n1: i32, n2: i32, n3: i32) -> bool {
        self.is_stop(codon_from_nucleotides(n1, n2, n3))
    }

    pub fn check_alphabet(&self, alphabet: Alphabet) -> Result<()> {
        if alphabet.is_codon() {
            Ok(())
        } else {
            Err(SeqError::Unsupported {
                alphabet,
                reason: format!("genetic code '{}' requires a codon alphabet", self.name),
            })
        }
    }
}
