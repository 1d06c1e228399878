use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rankdex::{evaluate, Benchmark, Bm25Params, IndexBuilder, InvertedIndex, ScoredRecord};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rankdex")]
#[command(about = "Build a BM25 inverted index over tab-separated records and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IndexArgs {
    /// Records file (one `title<TAB>description` per line) or a directory of .txt/.tsv files
    #[arg(long)]
    input: PathBuf,
    /// Length-normalization strength, within [0, 1]
    #[arg(long, default_value_t = 0.75)]
    b: f32,
    /// Term-frequency saturation constant, >= 0
    #[arg(long, default_value_t = 1.75)]
    k: f32,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a keyword query and print the top hits
    Search {
        #[command(flatten)]
        index: IndexArgs,
        /// Number of hits to print
        #[arg(long, default_value_t = 3)]
        top_k: usize,
        /// Print hits as JSON instead of title/description lines
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Query keywords
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Compute mean P@3, mean P@R and MAP against a benchmark file
    Evaluate {
        #[command(flatten)]
        index: IndexArgs,
        /// Benchmark file: `query<TAB>relevant ids` per line
        #[arg(long)]
        benchmark: PathBuf,
    },
    /// Print the weighted posting list of a term
    Postings {
        #[command(flatten)]
        index: IndexArgs,
        term: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { index, top_k, json, query } => {
            let index = build_index(&index)?;
            let results = index.process_query(query.as_slice());
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                render_output(&index, &results, top_k);
            }
            Ok(())
        }
        Commands::Evaluate { index, benchmark } => {
            let index = build_index(&index)?;
            let file = File::open(&benchmark).with_context(|| format!("opening benchmark {}", benchmark.display()))?;
            let bench = Benchmark::from_reader(BufReader::new(file))
                .with_context(|| format!("reading benchmark {}", benchmark.display()))?;
            let summary = evaluate(&index, &bench);
            println!("Mean Precision at 3 = {:.3}", summary.mean_precision_at_3);
            println!("Mean Precision at R = {:.3}", summary.mean_precision_at_r);
            println!("Mean Average Precision = {:.3}", summary.mean_average_precision);
            Ok(())
        }
        Commands::Postings { index, term } => {
            let index = build_index(&index)?;
            match index.postings(&term.to_lowercase()) {
                Some(list) => {
                    for p in list.iter() {
                        println!("{}\t{:.3}", p.record_id, p.weight);
                    }
                }
                None => println!("term {term:?} not in index"),
            }
            Ok(())
        }
    }
}

fn build_index(args: &IndexArgs) -> Result<InvertedIndex> {
    let params = Bm25Params::new(args.b, args.k)?;
    let mut builder = IndexBuilder::new();
    for file in input_files(&args.input) {
        let f = File::open(&file).with_context(|| format!("opening {}", file.display()))?;
        let added = builder
            .read_from(BufReader::new(f))
            .with_context(|| format!("reading records from {}", file.display()))?;
        tracing::debug!(file = %file.display(), added, "ingested file");
    }
    Ok(builder.finish(params)?)
}

/// A single file as given, or every .txt/.tsv under a directory in sorted path order.
fn input_files(input: &Path) -> Vec<PathBuf> {
    if !input.is_dir() {
        return vec![input.to_path_buf()];
    }
    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("txt" | "tsv")))
        .collect();
    files.sort();
    files
}

fn render_output(index: &InvertedIndex, results: &[ScoredRecord], top_k: usize) {
    for hit in results.iter().take(top_k) {
        if let Some(record) = index.record(hit.record_id) {
            println!("\n{}\n{}", record.title, record.description);
        }
    }
    println!("\n# total hits: {}.", results.len());
}
