use std::fmt::Write as _;

use log::trace;

use crate::align::scoring::ScoreIndex;
use crate::container::{MutableSequenceContainer, VectorSiteContainer};
use crate::error::{check_alphabet, Result, SeqError};
use crate::seq::{Sequence, SymbolList};

const NEG_INF: i32 = i32::MIN / 4;

// 回溯方向，同分时按此顺序优先
const DIAG: u8 = 0;
const UP: u8 = 1;
const LEFT: u8 = 2;

/// 仿射 gap 参数：长度为 k 的 gap 得分 `opening + k * extending`。
///
/// 线性罚分即 `opening == 0`。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GapParams {
    pub opening: i32,
    pub extending: i32,
}

impl GapParams {
    pub fn linear(gap: i32) -> Self {
        Self { opening: 0, extending: gap }
    }

    pub fn affine(opening: i32, extending: i32) -> Self {
        Self { opening, extending }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PairwiseAlignment {
    /// 两行的比对结果，行名取自输入序列
    pub alignment: VectorSiteContainer,
    pub score: i32,
    /// 'M' 两者都有残基；'I' seq1 残基对 seq2 的 gap；'D' seq2 残基对 seq1 的 gap
    pub ops: Vec<char>,
}

impl PairwiseAlignment {
    pub fn cigar(&self) -> String {
        ops_to_cigar(&self.ops)
    }
}

/// DP 工作缓冲区，可跨调用复用
#[derive(Default)]
pub struct NwBuffer {
    m: Vec<i32>,
    x: Vec<i32>,
    y: Vec<i32>,
    tb_m: Vec<u8>,
    tb_x: Vec<u8>,
    tb_y: Vec<u8>,
}

impl NwBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn resize(&mut self, size: usize, affine: bool) {
        reset(&mut self.m, size, NEG_INF);
        reset(&mut self.tb_m, size, DIAG);
        if affine {
            reset(&mut self.x, size, NEG_INF);
            reset(&mut self.y, size, NEG_INF);
            reset(&mut self.tb_x, size, UP);
            reset(&mut self.tb_y, size, LEFT);
        }
    }
}

fn reset<T: Copy>(v: &mut Vec<T>, size: usize, fill: T) {
    v.clear();
    v.resize(size, fill);
}

/// 线性 gap 罚分的全局比对
pub fn needleman_wunsch(seq1: &Sequence, seq2: &Sequence, scores: &dyn ScoreIndex, gap: i32) -> Result<PairwiseAlignment> {
    needleman_wunsch_with_buf(seq1, seq2, scores, gap, &mut NwBuffer::new())
}

pub fn needleman_wunsch_with_buf(
    seq1: &Sequence,
    seq2: &Sequence,
    scores: &dyn ScoreIndex,
    gap: i32,
    buf: &mut NwBuffer,
) -> Result<PairwiseAlignment> {
    let (a, b) = prepare(seq1, seq2, scores)?;
    let m = a.len();
    let n = b.len();
    let cols = n + 1;
    trace!("needleman-wunsch {}x{}", m, n);

    buf.resize((m + 1) * cols, false);
    let h = &mut buf.m;
    let tb = &mut buf.tb_m;

    h[0] = 0;
    for i in 1..=m {
        h[i * cols] = i as i32 * gap;
        tb[i * cols] = UP;
    }
    for j in 1..=n {
        h[j] = j as i32 * gap;
        tb[j] = LEFT;
    }

    for i in 1..=m {
        for j in 1..=n {
            let idx = i * cols + j;
            let d = h[idx - cols - 1] + scores.score(a[i - 1], b[j - 1]);
            let u = h[idx - cols] + gap;
            let l = h[idx - 1] + gap;
            let (val, dir) = if d >= u && d >= l {
                (d, DIAG)
            } else if u >= l {
                (u, UP)
            } else {
                (l, LEFT)
            };
            h[idx] = val;
            tb[idx] = dir;
        }
    }

    let mut ops = Vec::with_capacity(m + n);
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        match tb[i * cols + j] {
            DIAG => {
                ops.push('M');
                i -= 1;
                j -= 1;
            }
            UP => {
                ops.push('I');
                i -= 1;
            }
            _ => {
                ops.push('D');
                j -= 1;
            }
        }
    }
    ops.reverse();

    finish(seq1, seq2, &a, &b, h[m * cols + n], ops)
}

/// 仿射 gap 的全局比对（Gotoh 三矩阵）
pub fn needleman_wunsch_affine(
    seq1: &Sequence,
    seq2: &Sequence,
    scores: &dyn ScoreIndex,
    gap: GapParams,
) -> Result<PairwiseAlignment> {
    needleman_wunsch_affine_with_buf(seq1, seq2, scores, gap, &mut NwBuffer::new())
}

pub fn needleman_wunsch_affine_with_buf(
    seq1: &Sequence,
    seq2: &Sequence,
    scores: &dyn ScoreIndex,
    gap: GapParams,
    buf: &mut NwBuffer,
) -> Result<PairwiseAlignment> {
    let (a, b) = prepare(seq1, seq2, scores)?;
    let m = a.len();
    let n = b.len();
    let cols = n + 1;
    trace!("affine needleman-wunsch {}x{}", m, n);

    buf.resize((m + 1) * cols, true);
    let NwBuffer { m: mm, x, y, tb_m, tb_x, tb_y } = buf;
    let open = gap.opening + gap.extending;
    let ext = gap.extending;

    // mm: 以匹配结束；x: 以 seq1 残基对 gap 结束；y: 以 seq2 残基对 gap 结束
    mm[0] = 0;
    for i in 1..=m {
        x[i * cols] = gap.opening + i as i32 * ext;
        tb_x[i * cols] = if i == 1 { DIAG } else { UP };
    }
    for j in 1..=n {
        y[j] = gap.opening + j as i32 * ext;
        tb_y[j] = if j == 1 { DIAG } else { LEFT };
    }

    for i in 1..=m {
        for j in 1..=n {
            let idx = i * cols + j;
            let diag = idx - cols - 1;
            let (best, from) = best_of(mm[diag], x[diag], y[diag]);
            mm[idx] = best + scores.score(a[i - 1], b[j - 1]);
            tb_m[idx] = from;

            let up = idx - cols;
            let (best, from) = best_of(mm[up] + open, x[up] + ext, y[up] + open);
            x[idx] = best;
            tb_x[idx] = from;

            let left = idx - 1;
            let (best, from) = best_of(mm[left] + open, x[left] + open, y[left] + ext);
            y[idx] = best;
            tb_y[idx] = from;
        }
    }

    let end = m * cols + n;
    let (score, mut state) = best_of(mm[end], x[end], y[end]);

    let mut ops = Vec::with_capacity(m + n);
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        let idx = i * cols + j;
        match state {
            DIAG => {
                ops.push('M');
                state = tb_m[idx];
                i -= 1;
                j -= 1;
            }
            UP => {
                ops.push('I');
                state = tb_x[idx];
                i -= 1;
            }
            _ => {
                ops.push('D');
                state = tb_y[idx];
                j -= 1;
            }
        }
    }
    ops.reverse();

    finish(seq1, seq2, &a, &b, score, ops)
}

/// 三者取最大，同分时 diag > up > left
fn best_of(d: i32, u: i32, l: i32) -> (i32, u8) {
    if d >= u && d >= l {
        (d, DIAG)
    } else if u >= l {
        (u, UP)
    } else {
        (l, LEFT)
    }
}

fn prepare(seq1: &Sequence, seq2: &Sequence, scores: &dyn ScoreIndex) -> Result<(Vec<i32>, Vec<i32>)> {
    check_alphabet(seq1.alphabet(), seq2.alphabet())?;
    check_alphabet(scores.alphabet(), seq1.alphabet())?;
    let a = seq1.without_gaps().into_states();
    let b = seq2.without_gaps().into_states();
    if a.is_empty() && b.is_empty() {
        return Err(SeqError::Empty("both sequences are empty after gap removal".into()));
    }
    Ok((a, b))
}

fn finish(seq1: &Sequence, seq2: &Sequence, a: &[i32], b: &[i32], score: i32, ops: Vec<char>) -> Result<PairwiseAlignment> {
    let alphabet = seq1.alphabet();
    let g = alphabet.gap_code();
    let mut row1 = Vec::with_capacity(ops.len());
    let mut row2 = Vec::with_capacity(ops.len());
    let (mut ai, mut bj) = (a.iter(), b.iter());
    for &op in &ops {
        let s1 = if op == 'D' { g } else { ai.next().copied().unwrap_or(g) };
        let s2 = if op == 'I' { g } else { bj.next().copied().unwrap_or(g) };
        row1.push(s1);
        row2.push(s2);
    }

    let mut alignment = VectorSiteContainer::new(alphabet);
    alignment.add_sequence(Sequence::from_parts(seq1.name().to_string(), row1, seq1.comments().to_vec(), alphabet), false)?;
    alignment.add_sequence(Sequence::from_parts(seq2.name().to_string(), row2, seq2.comments().to_vec(), alphabet), false)?;
    Ok(PairwiseAlignment { alignment, score, ops })
}

pub fn ops_to_cigar(ops: &[char]) -> String {
    let mut cigar = String::new();
    let mut it = ops.iter().copied();
    let Some(mut cur) = it.next() else {
        return cigar;
    };
    let mut len = 1usize;
    for op in it {
        if op == cur {
            len += 1;
        } else {
            let _ = write!(&mut cigar, "{}{}", len, cur);
            cur = op;
            len = 1;
        }
    }
    let _ = write!(&mut cigar, "{}{}", len, cur);
    cigar
}
