use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::container::view::SequenceView;
use crate::container::{MutableSequenceContainer, MutableSiteContainer, SequenceContainer, SiteContainer};
use crate::error::{check_alphabet, Result, SeqError};
use crate::seq::{Sequence, Site, SymbolList};
use crate::util::alphabet::Alphabet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct RowInfo {
    name: String,
    comments: Vec<String>,
}

impl RowInfo {
    fn named(name: String) -> Self {
        Self { name, comments: Vec::new() }
    }

    fn placeholder(i: usize) -> Self {
        Self::named(format!("Seq_{i}"))
    }
}

/// 以位点向量为唯一存储的比对容器。
///
/// - `sites[j][i]` 即第 `i` 行第 `j` 列的状态
/// - `rows` 保存每行的名称与注释，与行号一一对应
/// - `name_index` 是名称到行号的派生索引，每次行结构变化后重建
///
/// 所有修改操作先校验后提交：失败时容器保持原样。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ContainerData", into = "ContainerData")]
pub struct VectorSiteContainer {
    alphabet: Alphabet,
    sites: Vec<Site>,
    rows: Vec<RowInfo>,
    name_index: HashMap<String, usize>,
    general_comments: Vec<String>,
}

/// 序列化形式，不含派生索引
#[derive(Serialize, Deserialize)]
struct ContainerData {
    alphabet: Alphabet,
    sites: Vec<Site>,
    rows: Vec<RowInfo>,
    general_comments: Vec<String>,
}

impl From<VectorSiteContainer> for ContainerData {
    fn from(c: VectorSiteContainer) -> Self {
        Self {
            alphabet: c.alphabet,
            sites: c.sites,
            rows: c.rows,
            general_comments: c.general_comments,
        }
    }
}

impl TryFrom<ContainerData> for VectorSiteContainer {
    type Error = SeqError;

    fn try_from(data: ContainerData) -> Result<Self> {
        let n = data.rows.len();
        for site in &data.sites {
            check_alphabet(data.alphabet, site.alphabet())?;
            if site.len() != n {
                return Err(SeqError::size_mismatch("site", site.len(), n));
            }
            for &s in site.states() {
                data.alphabet.check_state(s)?;
            }
        }
        let mut c = Self {
            alphabet: data.alphabet,
            sites: data.sites,
            rows: data.rows,
            name_index: HashMap::new(),
            general_comments: data.general_comments,
        };
        c.rebuild_index();
        Ok(c)
    }
}

impl VectorSiteContainer {
    /// 空容器：0 行 0 列
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            sites: Vec::new(),
            rows: Vec::new(),
            name_index: HashMap::new(),
            general_comments: Vec::new(),
        }
    }

    /// `n` 个自动命名（`Seq_0` …）的空序列占位
    pub fn with_size(n: usize, alphabet: Alphabet) -> Self {
        let mut c = Self::new(alphabet);
        c.rows = (0..n).map(RowInfo::placeholder).collect();
        c.rebuild_index();
        c
    }

    pub fn with_names(names: Vec<String>, alphabet: Alphabet) -> Result<Self> {
        check_unique(&names)?;
        let mut c = Self::new(alphabet);
        c.rows = names.into_iter().map(RowInfo::named).collect();
        c.rebuild_index();
        Ok(c)
    }

    /// 由一组等长位点构造，行自动命名
    pub fn from_sites(sites: Vec<Site>, alphabet: Alphabet, check_positions: bool) -> Result<Self> {
        let first = sites
            .first()
            .ok_or_else(|| SeqError::Empty("cannot build a container from zero sites".into()))?;
        let n = first.len();
        let mut seen = HashSet::new();
        for site in &sites {
            check_alphabet(alphabet, site.alphabet())?;
            if site.len() != n {
                return Err(SeqError::size_mismatch("site", site.len(), n));
            }
            if check_positions && !seen.insert(site.position()) {
                return Err(SeqError::DuplicatePosition(site.position()));
            }
        }
        let mut c = Self::with_size(n, alphabet);
        c.sites = sites;
        Ok(c)
    }

    /// 逐条 `add_sequence`（检查重名）
    pub fn from_sequences<I>(seqs: I, alphabet: Alphabet) -> Result<Self>
    where
        I: IntoIterator<Item = Sequence>,
    {
        let mut c = Self::new(alphabet);
        for seq in seqs {
            c.add_sequence(seq, true)?;
        }
        Ok(c)
    }

    /// 从任意位点容器深拷贝
    pub fn from_container<C: SiteContainer + ?Sized>(other: &C) -> Result<Self> {
        let mut c = Self::new(other.alphabet());
        c.sites = other.iter_sites().cloned().collect();
        c.rows = other
            .sequence_names()
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                Ok(RowInfo { name, comments: other.sequence_comments(i)?.to_vec() })
            })
            .collect::<Result<_>>()?;
        c.general_comments = other.general_comments().to_vec();
        c.rebuild_index();
        Ok(c)
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// 第 `pos` 行的借用视图
    pub fn row(&self, pos: usize) -> Result<SequenceView<'_>> {
        let info = self
            .rows
            .get(pos)
            .ok_or_else(|| SeqError::out_of_bounds("sequence", pos, self.rows.len()))?;
        Ok(SequenceView {
            sites: &self.sites,
            row: pos,
            name: &info.name,
            comments: &info.comments,
            alphabet: self.alphabet,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = SequenceView<'_>> + '_ {
        self.rows.iter().enumerate().map(move |(i, info)| SequenceView {
            sites: &self.sites,
            row: i,
            name: &info.name,
            comments: &info.comments,
            alphabet: self.alphabet,
        })
    }

    pub fn sequence_name(&self, pos: usize) -> Result<&str> {
        self.rows
            .get(pos)
            .map(|r| r.name.as_str())
            .ok_or_else(|| SeqError::out_of_bounds("sequence", pos, self.rows.len()))
    }

    /// 全部序列按行物化
    pub fn to_sequences(&self) -> Vec<Sequence> {
        self.rows().map(|r| r.to_sequence()).collect()
    }

    fn rebuild_index(&mut self) {
        self.name_index.clear();
        for (i, row) in self.rows.iter().enumerate() {
            self.name_index.entry(row.name.clone()).or_insert(i);
        }
    }

    fn check_bounds_row(&self, pos: usize) -> Result<()> {
        if pos < self.rows.len() {
            Ok(())
        } else {
            Err(SeqError::out_of_bounds("sequence", pos, self.rows.len()))
        }
    }

    fn check_bounds_site(&self, pos: usize) -> Result<()> {
        if pos < self.sites.len() {
            Ok(())
        } else {
            Err(SeqError::out_of_bounds("site", pos, self.sites.len()))
        }
    }

    /// `skip` 为替换操作中被替换的列
    fn check_position_free(&self, position: i32, skip: Option<usize>) -> Result<()> {
        let clash = self
            .sites
            .iter()
            .enumerate()
            .any(|(j, s)| Some(j) != skip && s.position() == position);
        if clash {
            Err(SeqError::DuplicatePosition(position))
        } else {
            Ok(())
        }
    }

    fn check_new_site(&self, site: &Site, check_position: bool, skip: Option<usize>) -> Result<()> {
        check_alphabet(self.alphabet, site.alphabet())?;
        if site.len() != self.rows.len() {
            return Err(SeqError::size_mismatch("site", site.len(), self.rows.len()));
        }
        if check_position {
            self.check_position_free(site.position(), skip)?;
        }
        Ok(())
    }

    /// 空容器收到第一列时，按列长度生成占位行
    fn seeds_rows_from(&self, site: &Site) -> bool {
        self.rows.is_empty() && self.sites.is_empty() && !site.is_empty()
    }

    /// 无位点时由第一条序列确定列数；已有的行以 gap 填充
    fn establish_sites(&mut self, len: usize) {
        let gap = self.alphabet.gap_code();
        let n = self.rows.len();
        self.sites = (0..len)
            .map(|j| Site::from_parts(vec![gap; n], self.alphabet, j as i32 + 1))
            .collect();
    }

    fn check_new_sequence_length(&self, seq: &Sequence) -> Result<()> {
        if !self.sites.is_empty() && seq.len() != self.sites.len() {
            return Err(SeqError::size_mismatch("sequence", seq.len(), self.sites.len()));
        }
        Ok(())
    }
}

fn check_unique(names: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(SeqError::DuplicateName(name.clone()));
        }
    }
    Ok(())
}

impl SequenceContainer for VectorSiteContainer {
    fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    fn num_sequences(&self) -> usize {
        self.rows.len()
    }

    fn sequence_names(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.name.clone()).collect()
    }

    fn sequence_position(&self, name: &str) -> Result<usize> {
        self.name_index
            .get(name)
            .copied()
            .ok_or_else(|| SeqError::SequenceNotFound(name.to_string()))
    }

    fn sequence(&self, pos: usize) -> Result<Sequence> {
        Ok(self.row(pos)?.to_sequence())
    }

    fn sequence_comments(&self, pos: usize) -> Result<&[String]> {
        self.rows
            .get(pos)
            .map(|r| r.comments.as_slice())
            .ok_or_else(|| SeqError::out_of_bounds("sequence", pos, self.rows.len()))
    }

    fn general_comments(&self) -> &[String] {
        &self.general_comments
    }
}

impl SiteContainer for VectorSiteContainer {
    fn num_sites(&self) -> usize {
        self.sites.len()
    }

    fn site(&self, pos: usize) -> Result<&Site> {
        self.sites
            .get(pos)
            .ok_or_else(|| SeqError::out_of_bounds("site", pos, self.sites.len()))
    }
}

impl MutableSiteContainer for VectorSiteContainer {
    fn set_site(&mut self, pos: usize, site: Site, check_position: bool) -> Result<()> {
        self.check_bounds_site(pos)?;
        self.check_new_site(&site, check_position, Some(pos))?;
        self.sites[pos] = site;
        Ok(())
    }

    fn add_site(&mut self, site: Site, check_position: bool) -> Result<()> {
        let pos = self.sites.len();
        self.insert_site(site, pos, check_position)
    }

    fn insert_site(&mut self, site: Site, pos: usize, check_position: bool) -> Result<()> {
        if pos > self.sites.len() {
            return Err(SeqError::out_of_bounds("site", pos, self.sites.len() + 1));
        }
        if self.seeds_rows_from(&site) {
            check_alphabet(self.alphabet, site.alphabet())?;
            self.rows = (0..site.len()).map(RowInfo::placeholder).collect();
            self.rebuild_index();
        } else {
            self.check_new_site(&site, check_position, None)?;
        }
        self.sites.insert(pos, site);
        Ok(())
    }

    fn remove_site(&mut self, pos: usize) -> Result<Site> {
        self.check_bounds_site(pos)?;
        Ok(self.sites.remove(pos))
    }

    fn delete_sites(&mut self, pos: usize, len: usize) -> Result<()> {
        let n = self.sites.len();
        if len == 0 {
            return if pos <= n { Ok(()) } else { Err(SeqError::out_of_bounds("site", pos, n + 1)) };
        }
        let end = pos.saturating_add(len);
        if pos >= n || end > n {
            return Err(SeqError::out_of_bounds("site", end - 1, n));
        }
        self.sites.drain(pos..end);
        Ok(())
    }

    fn reindex_sites(&mut self) {
        for (j, site) in self.sites.iter_mut().enumerate() {
            site.set_position(j as i32 + 1);
        }
    }

    fn set_site_positions(&mut self, positions: &[i32]) -> Result<()> {
        if positions.len() != self.sites.len() {
            return Err(SeqError::size_mismatch("site positions", positions.len(), self.sites.len()));
        }
        for (site, &p) in self.sites.iter_mut().zip(positions) {
            site.set_position(p);
        }
        Ok(())
    }

    fn set_site_position(&mut self, pos: usize, position: i32) -> Result<()> {
        self.check_bounds_site(pos)?;
        self.sites[pos].set_position(position);
        Ok(())
    }
}

impl MutableSequenceContainer for VectorSiteContainer {
    fn set_sequence(&mut self, pos: usize, seq: Sequence, check_name: bool) -> Result<()> {
        self.check_bounds_row(pos)?;
        check_alphabet(self.alphabet, seq.alphabet())?;
        self.check_new_sequence_length(&seq)?;
        if check_name && self.rows.iter().enumerate().any(|(i, r)| i != pos && r.name == seq.name()) {
            return Err(SeqError::DuplicateName(seq.name().to_string()));
        }

        if self.sites.is_empty() {
            self.establish_sites(seq.len());
        }
        for (site, &s) in self.sites.iter_mut().zip(seq.states()) {
            site.set_unchecked(pos, s);
        }
        self.rows[pos] = RowInfo { name: seq.name().to_string(), comments: seq.comments().to_vec() };
        self.rebuild_index();
        Ok(())
    }

    fn add_sequence(&mut self, seq: Sequence, check_name: bool) -> Result<()> {
        let pos = self.rows.len();
        self.insert_sequence(seq, pos, check_name)
    }

    fn insert_sequence(&mut self, seq: Sequence, pos: usize, check_name: bool) -> Result<()> {
        if pos > self.rows.len() {
            return Err(SeqError::out_of_bounds("sequence", pos, self.rows.len() + 1));
        }
        check_alphabet(self.alphabet, seq.alphabet())?;
        self.check_new_sequence_length(&seq)?;
        if check_name && self.name_index.contains_key(seq.name()) {
            return Err(SeqError::DuplicateName(seq.name().to_string()));
        }

        if self.sites.is_empty() {
            self.establish_sites(seq.len());
        }
        for (site, &s) in self.sites.iter_mut().zip(seq.states()) {
            site.insert_state(pos, s);
        }
        self.rows.insert(pos, RowInfo { name: seq.name().to_string(), comments: seq.comments().to_vec() });
        self.rebuild_index();
        Ok(())
    }

    fn remove_sequence(&mut self, pos: usize) -> Result<Sequence> {
        let seq = self.sequence(pos)?;
        for site in &mut self.sites {
            site.remove_state(pos);
        }
        self.rows.remove(pos);
        if self.rows.is_empty() {
            // 没有行的容器也没有列
            self.sites.clear();
        }
        self.rebuild_index();
        Ok(seq)
    }

    fn set_sequences_names(&mut self, names: Vec<String>, check_names: bool) -> Result<()> {
        if names.len() != self.rows.len() {
            return Err(SeqError::size_mismatch("sequence names", names.len(), self.rows.len()));
        }
        if check_names {
            check_unique(&names)?;
        }
        for (row, name) in self.rows.iter_mut().zip(names) {
            row.name = name;
        }
        self.rebuild_index();
        Ok(())
    }

    fn set_sequence_comments(&mut self, pos: usize, comments: Vec<String>) -> Result<()> {
        self.check_bounds_row(pos)?;
        self.rows[pos].comments = comments;
        Ok(())
    }

    fn set_state(&mut self, row: usize, col: usize, state: i32) -> Result<()> {
        self.check_bounds_row(row)?;
        self.check_bounds_site(col)?;
        self.alphabet.check_state(state)?;
        self.sites[col].set_unchecked(row, state);
        Ok(())
    }

    fn set_general_comments(&mut self, comments: Vec<String>) {
        self.general_comments = comments;
    }

    fn clear(&mut self) {
        self.sites.clear();
        self.rows.clear();
        self.name_index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dna(name: &str, text: &str) -> Sequence {
        Sequence::from_text(name, text, Alphabet::Dna).unwrap()
    }

    fn site(text: &str, pos: i32) -> Site {
        Site::from_text(text, Alphabet::Dna, pos).unwrap()
    }

    fn sample() -> VectorSiteContainer {
        VectorSiteContainer::from_sequences(
            vec![dna("s1", "ACGT"), dna("s2", "A-GT"), dna("s3", "TTGA")],
            Alphabet::Dna,
        )
        .unwrap()
    }

    fn assert_rectangular(c: &VectorSiteContainer) {
        for s in c.sites() {
            assert_eq!(s.len(), c.num_sequences());
        }
        for r in c.rows() {
            assert_eq!(r.len(), c.num_sites());
        }
    }

    #[test]
    fn first_sequence_establishes_sites() {
        let c = sample();
        assert_eq!(c.num_sequences(), 3);
        assert_eq!(c.num_sites(), 4);
        assert_eq!(c.site_positions(), vec![1, 2, 3, 4]);
        assert_eq!(c.site(1).unwrap().states(), &[1, -1, 3]);
        assert_eq!(c.sequence_by_name("s2").unwrap().to_text(), "A-GT");
        assert_rectangular(&c);
    }

    #[test]
    fn constructors() {
        let c = VectorSiteContainer::with_size(3, Alphabet::Dna);
        assert_eq!(c.sequence_names(), vec!["Seq_0", "Seq_1", "Seq_2"]);
        assert_eq!(c.num_sites(), 0);

        let c = VectorSiteContainer::with_names(vec!["a".into(), "b".into()], Alphabet::Dna).unwrap();
        assert_eq!(c.sequence_position("b").unwrap(), 1);
        assert!(matches!(
            VectorSiteContainer::with_names(vec!["a".into(), "a".into()], Alphabet::Dna),
            Err(SeqError::DuplicateName(ref n)) if n == "a"
        ));

        let c = VectorSiteContainer::from_sites(vec![site("AC", 5), site("G-", 9)], Alphabet::Dna, true).unwrap();
        assert_eq!(c.num_sequences(), 2);
        assert_eq!(c.sequence(1).unwrap().to_text(), "C-");
        assert_eq!(c.site_positions(), vec![5, 9]);

        assert!(matches!(
            VectorSiteContainer::from_sites(vec![], Alphabet::Dna, false),
            Err(SeqError::Empty(_))
        ));
        assert!(matches!(
            VectorSiteContainer::from_sites(vec![site("AC", 1), site("G", 2)], Alphabet::Dna, false),
            Err(SeqError::SizeMismatch { actual: 1, expected: 2, .. })
        ));
        assert!(matches!(
            VectorSiteContainer::from_sites(vec![site("AC", 1), site("GT", 1)], Alphabet::Dna, true),
            Err(SeqError::DuplicatePosition(1))
        ));
        assert!(VectorSiteContainer::from_sites(vec![site("AC", 1), site("GT", 1)], Alphabet::Dna, false).is_ok());
    }

    #[test]
    fn add_site_seeds_rows_on_empty_container() {
        let mut c = VectorSiteContainer::new(Alphabet::Dna);
        c.add_site(site("ACG", 1), true).unwrap();
        assert_eq!(c.num_sequences(), 3);
        assert_eq!(c.sequence_names(), vec!["Seq_0", "Seq_1", "Seq_2"]);
        c.add_site_at_coordinate(site("TTT", 1), 10, true).unwrap();
        assert_eq!(c.site_positions(), vec![1, 10]);
        assert_eq!(c.sequence(2).unwrap().to_text(), "GT");
    }

    #[test]
    fn failed_add_site_leaves_container_untouched() {
        let mut c = sample();
        let before = c.clone();
        let err = c.add_site(site("AC", 9), false).unwrap_err();
        assert!(matches!(err, SeqError::SizeMismatch { actual: 2, expected: 3, .. }));
        assert_eq!(c, before);

        let err = c.add_site(site("ACG", 2), true).unwrap_err();
        assert!(matches!(err, SeqError::DuplicatePosition(2)));
        assert_eq!(c, before);

        let prot = Site::from_text("WWW", Alphabet::Protein, 9).unwrap();
        assert!(matches!(c.add_site(prot, false), Err(SeqError::AlphabetMismatch { .. })));
        assert_eq!(c, before);
    }

    #[test]
    fn insert_and_set_site() {
        let mut c = sample();
        c.insert_site(site("NNN", 0), 1, false).unwrap();
        assert_eq!(c.sequence(0).unwrap().to_text(), "ANCGT");
        assert_eq!(c.site_positions(), vec![1, 0, 2, 3, 4]);
        assert!(c.insert_site(site("NNN", 0), 9, false).is_err());

        c.set_site(1, site("---", 7), true).unwrap();
        assert_eq!(c.sequence(2).unwrap().to_text(), "T-TGA");
        // 替换自身坐标不算冲突
        c.set_site(1, site("AAA", 7), true).unwrap();
        assert!(matches!(c.set_site(1, site("AAA", 3), true), Err(SeqError::DuplicatePosition(3))));
        assert!(c.set_site(5, site("AAA", 8), false).is_err());
        assert_rectangular(&c);
    }

    #[test]
    fn delete_site_ranges() {
        let mut c = sample();
        c.delete_sites(1, 2).unwrap();
        assert_eq!(c.sequence(0).unwrap().to_text(), "AT");
        assert_eq!(c.site_positions(), vec![1, 4]);
        assert!(matches!(
            c.delete_sites(1, 2),
            Err(SeqError::IndexOutOfBounds { index: 2, upper: 2, .. })
        ));
        c.delete_sites(2, 0).unwrap();
        let removed = c.remove_site(0).unwrap();
        assert_eq!(removed.states(), &[0, 0, 3]);
        c.delete_site(0).unwrap();
        assert_eq!(c.num_sites(), 0);
        assert_eq!(c.num_sequences(), 3);
    }

    #[test]
    fn reindex_and_positions() {
        let mut c = sample();
        c.set_site_positions(&[10, 10, 30, 40]).unwrap();
        assert_eq!(c.site_positions(), vec![10, 10, 30, 40]);
        assert!(c.set_site_positions(&[1, 2]).is_err());
        c.reindex_sites();
        assert_eq!(c.site_positions(), vec![1, 2, 3, 4]);
        c.set_site_position(0, -5).unwrap();
        assert_eq!(c.site(0).unwrap().position(), -5);
    }

    #[test]
    fn add_sequence_checks() {
        let mut c = sample();
        let before = c.clone();
        assert!(matches!(
            c.add_sequence(dna("s4", "ACG"), true),
            Err(SeqError::SizeMismatch { actual: 3, expected: 4, .. })
        ));
        assert!(matches!(c.add_sequence(dna("s1", "AAAA"), true), Err(SeqError::DuplicateName(_))));
        let prot = Sequence::from_text("p", "WWWW", Alphabet::Protein).unwrap();
        assert!(matches!(c.add_sequence(prot, true), Err(SeqError::AlphabetMismatch { .. })));
        assert_eq!(c, before);

        // 不检查时允许重名，按名查找返回第一行
        c.add_sequence(dna("s1", "CCCC"), false).unwrap();
        assert_eq!(c.num_sequences(), 4);
        assert_eq!(c.sequence_by_name("s1").unwrap().to_text(), "ACGT");
        assert_rectangular(&c);
    }

    #[test]
    fn insert_sequence_shifts_rows() {
        let mut c = sample();
        c.insert_sequence(dna("s0", "GGGG"), 0, true).unwrap();
        assert_eq!(c.sequence_names(), vec!["s0", "s1", "s2", "s3"]);
        assert_eq!(c.site(0).unwrap().states(), &[2, 0, 0, 3]);
        assert_eq!(c.sequence_position("s3").unwrap(), 3);
        assert!(c.insert_sequence(dna("s9", "GGGG"), 9, true).is_err());
    }

    #[test]
    fn set_sequence_on_placeholders() {
        let mut c = VectorSiteContainer::with_size(2, Alphabet::Dna);
        c.set_sequence(0, dna("first", "ACG"), true).unwrap();
        assert_eq!(c.num_sites(), 3);
        assert_eq!(c.sequence(1).unwrap().to_text(), "---");
        assert!(matches!(
            c.set_sequence(1, dna("second", "AC"), true),
            Err(SeqError::SizeMismatch { actual: 2, expected: 3, .. })
        ));
        assert!(matches!(c.set_sequence(1, dna("first", "TTT"), true), Err(SeqError::DuplicateName(_))));
        c.set_sequence_by_name("Seq_1", dna("second", "TTT"), true).unwrap();
        assert_eq!(c.sequence_by_name("second").unwrap().to_text(), "TTT");
        assert!(!c.has_sequence("Seq_1"));
        // 同一行改写同名不冲突
        c.set_sequence(0, dna("first", "GGG"), true).unwrap();
        assert_eq!(c.row(0).unwrap().iter().collect::<Vec<_>>(), vec![2, 2, 2]);
    }

    #[test]
    fn remove_sequence_compacts() {
        let mut c = sample();
        let s2 = c.remove_sequence_by_name("s2").unwrap();
        assert_eq!(s2.to_text(), "A-GT");
        assert_eq!(c.num_sequences(), 2);
        assert_eq!(c.sequence_position("s3").unwrap(), 1);
        assert!(matches!(c.sequence_by_name("s2"), Err(SeqError::SequenceNotFound(_))));
        assert_rectangular(&c);

        c.remove_sequence(0).unwrap();
        c.remove_sequence(0).unwrap();
        assert_eq!(c.num_sequences(), 0);
        assert_eq!(c.num_sites(), 0);
        assert!(c.remove_sequence(0).is_err());
    }

    #[test]
    fn rename_sequences() {
        let mut c = sample();
        assert!(c.set_sequences_names(vec!["a".into()], true).is_err());
        assert!(matches!(
            c.set_sequences_names(vec!["a".into(), "b".into(), "a".into()], true),
            Err(SeqError::DuplicateName(_))
        ));
        assert_eq!(c.sequence_names(), vec!["s1", "s2", "s3"]);
        c.set_sequences_names(vec!["a".into(), "b".into(), "c".into()], true).unwrap();
        assert_eq!(c.sequence_position("c").unwrap(), 2);
        assert!(!c.has_sequence("s1"));
    }

    #[test]
    fn cell_writes_are_visible_in_both_views() {
        let mut c = sample();
        c.set_state(1, 1, 1).unwrap();
        assert_eq!(c.state(1, 1).unwrap(), 1);
        assert_eq!(c.row(1).unwrap().get(1).unwrap(), 1);
        assert_eq!(c.sequence(1).unwrap().to_text(), "ACGT");
        assert!(c.set_state(3, 0, 1).is_err());
        assert!(c.set_state(0, 4, 1).is_err());
        assert!(c.set_state(0, 0, 77).is_err());
    }

    #[test]
    fn comments_and_clear() {
        let mut c = sample();
        c.set_general_comments(vec!["aligned by hand".into()]);
        c.set_sequence_comments(0, vec!["ref".into()]).unwrap();
        assert_eq!(c.sequence(0).unwrap().comments(), ["ref".to_string()]);

        let empty = c.create_empty_container();
        assert_eq!(empty.num_sequences(), 0);
        assert_eq!(empty.general_comments(), c.general_comments());
        assert_eq!(SequenceContainer::alphabet(&empty), Alphabet::Dna);

        c.clear();
        assert_eq!(c.num_sequences(), 0);
        assert_eq!(c.num_sites(), 0);
        assert_eq!(c.general_comments(), ["aligned by hand".to_string()]);
        assert!(!c.has_sequence("s1"));
    }

    #[test]
    fn copy_from_container() {
        let mut c = sample();
        c.set_sequence_comments(2, vec!["x".into()]).unwrap();
        let copy = VectorSiteContainer::from_container(&c).unwrap();
        assert_eq!(copy, c);
    }

    #[test]
    fn serde_rebuilds_index() {
        let c = sample();
        let bytes = bincode::serialize(&c).unwrap();
        let back: VectorSiteContainer = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, c);
        assert_eq!(back.sequence_position("s3").unwrap(), 2);
    }

    fn tampered() -> ContainerData {
        ContainerData {
            alphabet: Alphabet::Dna,
            sites: vec![site("AC", 1), Site::from_parts(vec![0, 99], Alphabet::Dna, 2)],
            rows: vec![RowInfo::named("s1".into()), RowInfo::named("s2".into())],
            general_comments: Vec::new(),
        }
    }

    #[test]
    fn deserialize_rejects_bad_state_codes() {
        assert!(matches!(
            VectorSiteContainer::try_from(tampered()),
            Err(SeqError::BadState { state: 99, .. })
        ));

        let bytes = bincode::serialize(&tampered()).unwrap();
        assert!(bincode::deserialize::<VectorSiteContainer>(&bytes).is_err());
    }
}
