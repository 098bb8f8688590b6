//! 演示如何在 library 模式下使用 seqsite 处理一个小比对。
//!
//! 运行方式：
//! ```bash
//! cargo run --example simple_align
//! ```

use seqsite::prelude::*;

fn main() -> seqsite::error::Result<()> {
    // 1. 构建比对
    let mut aln = VectorSiteContainer::new(Alphabet::Dna);
    for (name, text) in [("human", "ATG-CCA-TTA"), ("chimp", "ATG-CCG-TTA"), ("mouse", "ATGACCR-TTG")] {
        aln.add_sequence(Sequence::from_text(name, text, Alphabet::Dna)?, true)?;
    }
    println!("比对: {} 条序列 x {} 个位点", aln.num_sequences(), aln.num_sites());

    // 2. 去掉全 gap 列
    let removed = sites::remove_gap_only_sites(&mut aln)?;
    println!("删除全 gap 位点: {}", removed);
    for row in aln.rows() {
        println!("  {:<6} {}", row.name(), row.to_sequence());
    }

    // 3. 共有序列
    let cons = align::consensus(&aln, "consensus", true, true)?;
    println!("共有序列: {}", cons);

    // 4. 距离矩阵
    let d = align::similarity_matrix(&aln, true, GapPolicy::IgnoreAnyGap, false)?;
    for (i, a) in d.names().iter().enumerate() {
        let row: Vec<String> = (0..d.len()).map(|j| d.get(i, j).map(|v| format!("{v:.3}"))).collect::<Result<_>>()?;
        println!("  {:<6} {}", a, row.join(" "));
    }

    // 5. 两条序列重新做全局比对
    let scores = align::SimpleScore::new(Alphabet::Dna, 1, -1);
    let res = align::needleman_wunsch(&aln.sequence(0)?, &aln.sequence(2)?, &scores, -2)?;
    println!("NW 得分 {} CIGAR {}", res.score, res.cigar());
    Ok(())
}
