use std::iter::FusedIterator;

use crate::container::SiteContainer;
use crate::error::{Result, SeqError};
use crate::seq::{Sequence, Site};
use crate::util::alphabet::Alphabet;

/// 容器中一行的只读借用视图，直接读位点矩阵，不复制数据
#[derive(Clone, Copy, Debug)]
pub struct SequenceView<'a> {
    pub(crate) sites: &'a [Site],
    pub(crate) row: usize,
    pub(crate) name: &'a str,
    pub(crate) comments: &'a [String],
    pub(crate) alphabet: Alphabet,
}

impl<'a> SequenceView<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn comments(&self) -> &'a [String] {
        self.comments
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// 行号
    pub fn index(&self) -> usize {
        self.row
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn get(&self, col: usize) -> Result<i32> {
        self.sites
            .get(col)
            .map(|s| s[self.row])
            .ok_or_else(|| SeqError::out_of_bounds("sequence position", col, self.sites.len()))
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + 'a {
        let row = self.row;
        self.sites.iter().map(move |s| s[row])
    }

    pub fn to_sequence(&self) -> Sequence {
        Sequence::from_parts(
            self.name.to_string(),
            self.iter().collect(),
            self.comments.to_vec(),
            self.alphabet,
        )
    }
}

/// 通过 [`SiteContainer::site`] 遍历任意容器的位点
pub struct SiteIter<'a, C: ?Sized> {
    container: &'a C,
    next: usize,
    end: usize,
}

impl<'a, C: SiteContainer + ?Sized> SiteIter<'a, C> {
    pub fn new(container: &'a C) -> Self {
        Self { container, next: 0, end: container.num_sites() }
    }
}

impl<'a, C: SiteContainer + ?Sized> Iterator for SiteIter<'a, C> {
    type Item = &'a Site;

    fn next(&mut self) -> Option<&'a Site> {
        if self.next >= self.end {
            return None;
        }
        let site = self.container.site(self.next).ok();
        self.next += 1;
        site
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.end - self.next;
        (rest, Some(rest))
    }
}

impl<'a, C: SiteContainer + ?Sized> ExactSizeIterator for SiteIter<'a, C> {}

impl<'a, C: SiteContainer + ?Sized> FusedIterator for SiteIter<'a, C> {}
