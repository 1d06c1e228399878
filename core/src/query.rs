use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::index::{InvertedIndex, RecordId};
use crate::posting::{merge_all, PostingList};
use crate::tokenizer::tokenize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub record_id: RecordId,
    pub score: f32,
}

/// Normalize keywords through the tokenizer and drop repeats, keeping first occurrence.
fn normalize_keywords<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .iter()
        .flat_map(|k| tokenize(k.as_ref()).collect::<Vec<_>>())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

impl InvertedIndex {
    /// Score records against a bag of keywords: merge the keywords' posting lists,
    /// drop zero totals, and rank by score descending then record id ascending.
    pub fn process_query<S: AsRef<str>>(&self, keywords: &[S]) -> Vec<ScoredRecord> {
        let terms = normalize_keywords(keywords);
        let lists: Vec<&PostingList> = terms.iter().filter_map(|t| self.postings(t)).collect();
        if lists.is_empty() {
            tracing::debug!(?terms, "no query term in index");
            return Vec::new();
        }

        let mut results: Vec<ScoredRecord> = merge_all(lists.iter().copied())
            .iter()
            .filter(|p| p.weight != 0.0)
            .map(|p| ScoredRecord { record_id: p.record_id, score: p.weight })
            .collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.record_id.cmp(&b.record_id)));

        tracing::debug!(?terms, matched_terms = lists.len(), hits = results.len(), "query processed");
        results
    }

    /// Free-text entry point: tokenizes `query` and runs [`InvertedIndex::process_query`].
    pub fn search(&self, query: &str) -> Vec<ScoredRecord> {
        let keywords: Vec<String> = tokenize(query).collect();
        self.process_query(keywords.as_slice())
    }
}
