pub mod error;
pub mod eval;
pub mod index;
pub mod posting;
pub mod query;
pub mod scoring;
pub mod tokenizer;

pub use error::{Error, Result};
pub use eval::{average_precision, evaluate, precision_at_k, Benchmark, BenchmarkQuery, EvaluationSummary};
pub use index::{IndexBuilder, InvertedIndex, Record, RecordId};
pub use posting::{merge, merge_all, Posting, PostingList};
pub use query::ScoredRecord;
pub use scoring::Bm25Params;
