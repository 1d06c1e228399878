use anyhow::{Context, Result};
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use rankdex::{Bm25Params, InvertedIndex, RecordId};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path as FsPath;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
    /// Wrap query keywords in `<em>` in titles and descriptions
    #[serde(default)]
    pub highlight: bool,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub record_id: RecordId,
    pub score: f32,
    pub title: String,
    pub description: String,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<InvertedIndex>,
}

/// Build the index from a records file once; every request reads the same `Arc`.
pub fn build_app<P: AsRef<FsPath>>(records: P, params: Bm25Params) -> Result<Router> {
    let records = records.as_ref();
    let file = File::open(records).with_context(|| format!("opening records {}", records.display()))?;
    let index = InvertedIndex::from_reader(BufReader::new(file), params)
        .with_context(|| format!("indexing {}", records.display()))?;
    Ok(router(Arc::new(index)))
}

pub fn router(index: Arc<InvertedIndex>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/record/:record_id", get(record_handler))
        .with_state(AppState { index })
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let scored = state.index.search(&params.q);
    let total_hits = scored.len();
    let k = params.k.clamp(1, 100);

    let terms: Vec<String> = rankdex::tokenizer::tokenize(&params.q).collect();
    let results = scored
        .into_iter()
        .take(k)
        .filter_map(|hit| {
            let record = state.index.record(hit.record_id)?;
            let (title, description) = if params.highlight {
                (highlight_terms(&record.title, &terms), highlight_terms(&record.description, &terms))
            } else {
                (record.title.clone(), record.description.clone())
            };
            Some(SearchHit { record_id: hit.record_id, score: hit.score, title, description })
        })
        .collect();

    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results })
}

pub async fn record_handler(
    State(state): State<AppState>,
    Path(record_id): Path<RecordId>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match state.index.record(record_id) {
        Some(record) => Ok(Json(serde_json::json!({
            "record_id": record_id,
            "title": record.title,
            "description": record.description,
            "length": state.index.doc_length(record_id),
        }))),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" })))),
    }
}

/// Wrap whole-word, case-insensitive occurrences of `terms` in `<em>`.
fn highlight_terms(text: &str, terms: &[String]) -> String {
    if terms.is_empty() {
        return text.to_string();
    }
    let alternation = terms.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    // Terms are escaped letter runs, so the pattern always compiles.
    match regex::RegexBuilder::new(&format!(r"\b({alternation})\b")).case_insensitive(true).build() {
        Ok(pat) => pat.replace_all(text, "<em>$1</em>").into_owned(),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_whole_words_only() {
        let terms = vec!["film".to_string()];
        assert_eq!(highlight_terms("Film about films", &terms), "<em>Film</em> about films");
        assert_eq!(highlight_terms("nothing", &[]), "nothing");
    }
}
