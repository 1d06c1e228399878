//! Ranking-quality metrics over query results and a ground-truth benchmark.
//!
//! Benchmark files hold one query per line: the query text, a tab, then the
//! space-separated ids of the records judged relevant.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::BufRead;

use crate::error::{Error, Result};
use crate::index::{InvertedIndex, RecordId};

/// Fraction of the first `k` results that are relevant. The denominator is always `k`,
/// so a result list shorter than `k` is penalized; `k == 0` gives 0.
pub fn precision_at_k(results: &[RecordId], relevant: &HashSet<RecordId>, k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    let hits = results.iter().take(k).filter(|id| relevant.contains(*id)).count();
    hits as f64 / k as f64
}

/// Sum of precision@rank over every rank holding a relevant record, divided by `|relevant|`.
pub fn average_precision(results: &[RecordId], relevant: &HashSet<RecordId>) -> f64 {
    if relevant.is_empty() {
        return 0.0;
    }
    let total: f64 = results
        .iter()
        .enumerate()
        .filter(|(_, id)| relevant.contains(*id))
        .map(|(rank, _)| precision_at_k(results, relevant, rank + 1))
        .sum();
    total / relevant.len() as f64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkQuery {
    pub query: String,
    pub relevant: HashSet<RecordId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub queries: Vec<BenchmarkQuery>,
}

impl Benchmark {
    /// Parse `query<TAB>id id id` lines. Blank lines are ignored.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut queries = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (query, labels) = line
                .split_once('\t')
                .ok_or_else(|| Error::format(i + 1, "expected tab-separated query and relevant ids"))?;
            let relevant = labels
                .split_whitespace()
                .map(|id| {
                    id.parse::<RecordId>()
                        .map_err(|e| Error::format(i + 1, format!("bad record id {id:?}: {e}")))
                })
                .collect::<Result<HashSet<_>>>()?;
            queries.push(BenchmarkQuery { query: query.to_string(), relevant });
        }
        Ok(Self { queries })
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub num_queries: usize,
    pub mean_precision_at_3: f64,
    pub mean_precision_at_r: f64,
    pub mean_average_precision: f64,
}

/// Run every benchmark query through [`InvertedIndex::search`] and average the metrics.
pub fn evaluate(index: &InvertedIndex, benchmark: &Benchmark) -> EvaluationSummary {
    if benchmark.is_empty() {
        return EvaluationSummary::default();
    }
    let mut p3 = 0.0;
    let mut pr = 0.0;
    let mut ap = 0.0;
    for q in &benchmark.queries {
        let ids: Vec<RecordId> = index.search(&q.query).into_iter().map(|r| r.record_id).collect();
        p3 += precision_at_k(&ids, &q.relevant, 3);
        pr += precision_at_k(&ids, &q.relevant, q.relevant.len());
        ap += average_precision(&ids, &q.relevant);
    }
    let n = benchmark.len() as f64;
    let summary = EvaluationSummary {
        num_queries: benchmark.len(),
        mean_precision_at_3: p3 / n,
        mean_precision_at_r: pr / n,
        mean_average_precision: ap / n,
    };
    tracing::info!(?summary, "evaluation finished");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[RecordId]) -> HashSet<RecordId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn precision_at_k_values() {
        let relevant = set(&[1, 2, 5, 6, 7, 8]);
        assert_eq!(precision_at_k(&[5, 3, 6, 1, 2], &relevant, 2), 0.5);
        assert_eq!(precision_at_k(&[5, 3, 6, 1, 2], &relevant, 4), 0.75);
        assert_eq!(precision_at_k(&[5, 3, 6, 1, 2], &relevant, 0), 0.0);
        // denominator stays k when fewer results exist
        assert_eq!(precision_at_k(&[5], &relevant, 4), 0.25);
    }

    #[test]
    fn average_precision_value() {
        let ap = average_precision(&[7, 17, 9, 42, 5], &set(&[5, 7, 12, 42]));
        assert!((ap - 0.525).abs() < 1e-12);
        assert_eq!(average_precision(&[1, 2], &HashSet::new()), 0.0);
        assert_eq!(average_precision(&[], &set(&[1])), 0.0);
    }

    #[test]
    fn out_of_range_ids_never_match() {
        assert_eq!(precision_at_k(&[1, 2], &set(&[0, 999]), 2), 0.0);
    }

    #[test]
    fn parses_benchmark() {
        let b = Benchmark::from_reader("animated film\t1 3 4\nshort film\t3 4\n\n".as_bytes()).unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b.queries[0].query, "animated film");
        assert_eq!(b.queries[0].relevant, set(&[1, 3, 4]));
        assert_eq!(b.queries[1].relevant, set(&[3, 4]));
    }

    #[test]
    fn malformed_benchmark_lines() {
        assert!(matches!(
            Benchmark::from_reader("no tab here\n".as_bytes()),
            Err(Error::Format { line: 1, .. })
        ));
        assert!(matches!(
            Benchmark::from_reader("ok\t1 2\nbad\t1 x\n".as_bytes()),
            Err(Error::Format { line: 2, .. })
        ));
    }
}
