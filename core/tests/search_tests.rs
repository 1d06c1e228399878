use rankdex::{evaluate, Benchmark, Bm25Params, InvertedIndex, RecordId};

const CORPUS: &str = "Movie\tanimated movie
Non animated film\tmovie
Animation short\tmovie
Short animated film\tshort movie
";

const BENCHMARK: &str = "animated film\t1 3 4
short film\t3 4
";

fn index() -> InvertedIndex {
    InvertedIndex::from_reader(CORPUS.as_bytes(), Bm25Params::default()).unwrap()
}

#[test]
fn free_text_search_ranks_records() {
    let index = index();
    let ids: Vec<RecordId> = index.search("short film").iter().map(|r| r.record_id).collect();
    assert_eq!(ids, [4, 3, 2]);
    let top = index.record(ids[0]).unwrap();
    assert_eq!(top.title, "Short animated film");
}

#[test]
fn evaluation_means_over_benchmark() {
    let index = index();
    let benchmark = Benchmark::from_reader(BENCHMARK.as_bytes()).unwrap();
    let summary = evaluate(&index, &benchmark);
    assert_eq!(summary.num_queries, 2);
    assert!((summary.mean_precision_at_3 - 0.667).abs() < 1e-3);
    assert!((summary.mean_precision_at_r - 0.833).abs() < 1e-3);
    assert!((summary.mean_average_precision - 0.694).abs() < 1e-3);
}

#[test]
fn empty_benchmark_gives_zero_means() {
    let summary = evaluate(&index(), &Benchmark::default());
    assert_eq!(summary.num_queries, 0);
    assert_eq!(summary.mean_average_precision, 0.0);
}

#[test]
fn index_is_shareable_across_threads() {
    let index = std::sync::Arc::new(index());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let index = index.clone();
            std::thread::spawn(move || index.search("animated").len())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), 3);
    }
}
