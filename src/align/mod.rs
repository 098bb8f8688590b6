//! 双序列比对与比对层面的统计：Needleman-Wunsch 全局比对、相似度矩阵、
//! 共有序列，以及与参考比对比较的 CS / SPS 分数。

pub mod consensus;
pub mod needleman_wunsch;
pub mod scores;
pub mod scoring;
pub mod similarity;

pub use consensus::consensus;
pub use needleman_wunsch::{
    needleman_wunsch, needleman_wunsch_affine, needleman_wunsch_affine_with_buf, needleman_wunsch_with_buf,
    ops_to_cigar, GapParams, NwBuffer, PairwiseAlignment,
};
pub use scores::{column_scores, sum_of_pairs_scores};
pub use scoring::{ScoreIndex, ScoreMatrix, SimpleScore};
pub use similarity::{similarity, similarity_matrix, DistanceMatrix, GapPolicy};
