use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rankdex::Bm25Params;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

const RECORDS: &str = "Movie\tanimated movie
Non animated film\tmovie
Animation short\tmovie
Short animated film\tshort movie
";

fn app() -> Router {
    let dir = tempdir().unwrap();
    let path = dir.path().join("records.tsv");
    fs::write(&path, RECORDS).unwrap();
    rankdex_server::build_app(&path, Bm25Params::default()).unwrap()
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let (status, json) = call(app(), "/search?q=short%20film&k=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"].as_u64(), Some(3));
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["record_id"].as_u64(), Some(4));
    assert_eq!(arr[1]["record_id"].as_u64(), Some(3));
    assert_eq!(arr[0]["title"].as_str(), Some("Short animated film"));
}

#[tokio::test]
async fn search_with_highlighting() {
    let (_, json) = call(app(), "/search?q=film&highlight=true").await;
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr[0]["title"].as_str(), Some("Non animated <em>film</em>"));
}

#[tokio::test]
async fn unknown_terms_give_no_hits() {
    let (status, json) = call(app(), "/search?q=zebra").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"].as_u64(), Some(0));
    assert!(json["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn record_lookup() {
    let (status, json) = call(app(), "/record/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"].as_str(), Some("Non animated film"));
    assert_eq!(json["length"].as_u64(), Some(4));

    let (status, _) = call(app(), "/record/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn malformed_records_fail_startup() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.tsv");
    fs::write(&path, "no tab on this line\n").unwrap();
    assert!(rankdex_server::build_app(&path, Bm25Params::default()).is_err());
}
