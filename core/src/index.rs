use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::BufRead;

use crate::error::{Error, Result};
use crate::posting::{Posting, PostingList};
use crate::scoring::{idf, Bm25Params};
use crate::tokenizer::tokenize;

/// 1-based position of a record in ingestion order.
pub type RecordId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub description: String,
}

impl Record {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into() }
    }

    /// Parse `title<TAB>description`. The line is split at its first tab.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self> {
        let line = line.trim_end_matches(['\n', '\r']);
        match line.split_once('\t') {
            Some((title, description)) => Ok(Self::new(title, description)),
            None => Err(Error::format(line_no, "expected tab-separated title and description")),
        }
    }

    fn tokens(&self) -> impl Iterator<Item = String> + '_ {
        tokenize(&self.title).chain(tokenize(&self.description))
    }
}

/// Ingestion phase: postings hold raw term frequencies until [`IndexBuilder::finish`]
/// rewrites them into BM25 weights.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    raw_postings: HashMap<String, Vec<(RecordId, u32)>>, // sorted by record id
    records: Vec<Record>,
    doc_lengths: Vec<u32>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn add_record(&mut self, record: Record) -> RecordId {
        let record_id = self.records.len() as RecordId + 1;
        let mut doc_len = 0u32;
        for term in record.tokens() {
            doc_len += 1;
            let plist = self.raw_postings.entry(term).or_default();
            // Records arrive in id order, so an existing posting for this record is always the tail.
            match plist.last_mut() {
                Some((id, tf)) if *id == record_id => *tf += 1,
                _ => plist.push((record_id, 1)),
            }
        }
        self.records.push(record);
        self.doc_lengths.push(doc_len);
        record_id
    }

    pub fn add_line(&mut self, line: &str) -> Result<RecordId> {
        let record = Record::parse_line(line, self.records.len() + 1)?;
        Ok(self.add_record(record))
    }

    /// Ingest every line of `reader`; returns how many records were added.
    /// Error line numbers are relative to this reader.
    pub fn read_from<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let mut added = 0usize;
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let record = Record::parse_line(&line, i + 1)?;
            self.add_record(record);
            added += 1;
        }
        Ok(added)
    }

    /// Rewrite every raw frequency into its BM25 weight and freeze the index.
    pub fn finish(self, params: Bm25Params) -> Result<InvertedIndex> {
        params.validate()?;
        let n = self.records.len();
        let avgdl = if n == 0 {
            None
        } else {
            let total: u64 = self.doc_lengths.iter().map(|&l| l as u64).sum();
            Some(total as f32 / n as f32)
        };

        let mut postings: HashMap<String, PostingList> = HashMap::with_capacity(self.raw_postings.len());
        if let Some(avgdl) = avgdl {
            for (term, raw) in self.raw_postings {
                let idf = idf(n, raw.len());
                let weighted = raw
                    .into_iter()
                    .map(|(record_id, tf)| {
                        let doc_len = self.doc_lengths[(record_id - 1) as usize];
                        Posting { record_id, weight: params.tf_weight(tf, doc_len, avgdl) * idf }
                    })
                    .collect();
                postings.insert(term, PostingList::from_sorted(weighted));
            }
        }

        tracing::info!(num_records = n, num_terms = postings.len(), avgdl = ?avgdl, "index built");
        Ok(InvertedIndex { postings, records: self.records, doc_lengths: self.doc_lengths, avgdl, params })
    }
}

/// A finished, BM25-weighted index. Read-only; share it behind `Arc` for concurrent queries.
#[derive(Debug)]
pub struct InvertedIndex {
    postings: HashMap<String, PostingList>,
    records: Vec<Record>,
    doc_lengths: Vec<u32>,
    avgdl: Option<f32>,
    params: Bm25Params,
}

impl InvertedIndex {
    pub fn build<I>(records: I, params: Bm25Params) -> Result<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut builder = IndexBuilder::new();
        for record in records {
            builder.add_record(record);
        }
        builder.finish(params)
    }

    pub fn from_reader<R: BufRead>(reader: R, params: Bm25Params) -> Result<Self> {
        let mut builder = IndexBuilder::new();
        builder.read_from(reader)?;
        builder.finish(params)
    }

    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    /// `None` for an empty collection.
    pub fn avg_doc_length(&self) -> Option<f32> {
        self.avgdl
    }

    pub fn params(&self) -> Bm25Params {
        self.params
    }

    pub fn record(&self, record_id: RecordId) -> Option<&Record> {
        let idx = (record_id as usize).checked_sub(1)?;
        self.records.get(idx)
    }

    pub fn doc_length(&self, record_id: RecordId) -> Option<u32> {
        let idx = (record_id as usize).checked_sub(1)?;
        self.doc_lengths.get(idx).copied()
    }

    pub fn records(&self) -> impl Iterator<Item = (RecordId, &Record)> + '_ {
        self.records.iter().enumerate().map(|(i, r)| (i as RecordId + 1, r))
    }

    pub fn postings(&self, term: &str) -> Option<&PostingList> {
        self.postings.get(term)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }
}
