use serde::{Deserialize, Serialize};
use std::ops::Deref;

use crate::index::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub record_id: RecordId,
    pub weight: f32, // BM25 weight
}

/// Postings for one term, strictly ascending by record id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostingList(Vec<Posting>);

impl PostingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps postings that are already strictly ascending by record id.
    pub(crate) fn from_sorted(postings: Vec<Posting>) -> Self {
        debug_assert!(postings.windows(2).all(|w| w[0].record_id < w[1].record_id));
        Self(postings)
    }

    pub fn as_slice(&self) -> &[Posting] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Posting> {
        self.0
    }

    pub fn weight_of(&self, record_id: RecordId) -> Option<f32> {
        self.0
            .binary_search_by_key(&record_id, |p| p.record_id)
            .ok()
            .map(|i| self.0[i].weight)
    }
}

impl Deref for PostingList {
    type Target = [Posting];

    fn deref(&self) -> &[Posting] {
        &self.0
    }
}

/// Builds a list from arbitrary pairs: sorts by record id and sums the weights of repeated ids.
impl FromIterator<(RecordId, f32)> for PostingList {
    fn from_iter<I: IntoIterator<Item = (RecordId, f32)>>(iter: I) -> Self {
        let mut pairs: Vec<(RecordId, f32)> = iter.into_iter().collect();
        pairs.sort_by_key(|&(id, _)| id);
        let mut out: Vec<Posting> = Vec::with_capacity(pairs.len());
        for (record_id, weight) in pairs {
            match out.last_mut() {
                Some(last) if last.record_id == record_id => last.weight += weight,
                _ => out.push(Posting { record_id, weight }),
            }
        }
        Self(out)
    }
}

/// Two-pointer merge of sorted lists; weights of shared record ids are summed.
pub fn merge(a: &PostingList, b: &PostingList) -> PostingList {
    let (a, b) = (a.as_slice(), b.as_slice());
    let mut out = Vec::with_capacity(a.len() + b.len());
    let mut i = 0usize;
    let mut j = 0usize;
    while i < a.len() && j < b.len() {
        let x = a[i];
        let y = b[j];
        if x.record_id == y.record_id {
            out.push(Posting { record_id: x.record_id, weight: x.weight + y.weight });
            i += 1;
            j += 1;
        } else if x.record_id < y.record_id {
            out.push(x);
            i += 1;
        } else {
            out.push(y);
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    PostingList(out)
}

/// Left-to-right fold of [`merge`]; no lists gives an empty list.
pub fn merge_all<'a, I>(lists: I) -> PostingList
where
    I: IntoIterator<Item = &'a PostingList>,
{
    let mut iter = lists.into_iter();
    let first = match iter.next() {
        Some(list) => list.clone(),
        None => return PostingList::new(),
    };
    iter.fold(first, |acc, list| merge(&acc, list))
}
