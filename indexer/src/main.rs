use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hotel_core::eval::{build_ground_truth, evaluate_with, DEFAULT_K, DEFAULT_QUERIES};
use hotel_core::persist::{load_ground_truth, save_corpus, save_ground_truth, save_index, save_meta, DataPaths, MetaFile};
use hotel_core::tokenizer::{EnglishNormalizer, Normalizer};
use hotel_core::{Document, InvertedIndex, ScoringModel, SearchEngine};
use serde::Deserialize;
use tracing_subscriber::{EnvFilter, fmt};
use walkdir::WalkDir;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// A scraped hotel page as written by the crawler.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHotel {
    basic_data: Option<BasicData>,
    description: Option<String>,
    features: Option<Vec<Option<String>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BasicData {
    name: Option<String>,
    aggregate_rating: Option<AggregateRating>,
    address: Option<Address>,
    image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AggregateRating {
    rating_value: Option<serde_json::Value>,
    review_count: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Address {
    street_address: Option<String>,
    address_country: Option<Country>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Country {
    name: Option<String>,
}

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build, query and evaluate the hotel search index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize raw hotel records and write corpus, inverted index and meta
    Build {
        /// Input path (hotel JSON file or a directory of them)
        #[arg(long)]
        input: String,
        /// Output data directory
        #[arg(long)]
        output: String,
    },
    /// Record boolean matches of canned queries as ground truth
    GroundTruth {
        #[arg(long, default_value = "./data")]
        data: String,
        #[arg(long, default_value = "ground_truth.json")]
        output: String,
        /// Query to include; repeat for several. Defaults to the canned set
        #[arg(long = "query")]
        queries: Vec<String>,
    },
    /// Score rankings against a ground truth file
    Evaluate {
        #[arg(long, default_value = "./data")]
        data: String,
        #[arg(long, default_value = "ground_truth.json")]
        ground_truth: String,
        #[arg(long, default_value_t = DEFAULT_K)]
        k: usize,
        /// Ranking model: tf-idf or bm25
        #[arg(long, default_value = "tf-idf")]
        model: ScoringModel,
    },
    /// Print boolean matches and both rankings for one query
    Query {
        #[arg(long, default_value = "./data")]
        data: String,
        /// Only print the top N of each ranking
        #[arg(long)]
        limit: Option<usize>,
        query: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output } => build_index(&input, &output),
        Commands::GroundTruth { data, output, queries } => ground_truth(&data, &output, queries),
        Commands::Evaluate { data, ground_truth, k, model } => run_evaluation(&data, &ground_truth, k, model),
        Commands::Query { data, limit, query } => run_query(&data, &query, limit),
    }
}

fn build_index(input: &str, output: &str) -> Result<()> {
    let input_path = Path::new(input);
    let out_paths = DataPaths::new(output);

    // Doc ids are positions, so the file order must be stable between runs
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
                files.push(p.to_path_buf());
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else {
        anyhow::bail!("input {input} does not exist");
    }

    let normalizer = EnglishNormalizer::new();
    let mut corpus: Vec<Document> = Vec::new();
    for file in files {
        for raw in read_raw_hotels(&file)? {
            corpus.push(to_document(raw, &normalizer));
        }
    }
    let index = InvertedIndex::build(&corpus);
    tracing::info!(num_docs = corpus.len(), num_terms = index.num_terms(), "ingested documents");

    save_corpus(&out_paths, &corpus)?;
    save_index(&out_paths, &index)?;
    let meta = MetaFile {
        num_docs: corpus.len() as u32,
        created_at: time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339).unwrap_or_else(|_| "".into()),
        version: 1,
    };
    save_meta(&out_paths, &meta)?;

    tracing::info!(output, "index build complete");
    Ok(())
}

fn read_raw_hotels(file: &Path) -> Result<Vec<RawHotel>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing {}", file.display()))?;
    let hotels = match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<RawHotel>, _>>()?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => Vec::new(),
    };
    Ok(hotels)
}

fn to_document(raw: RawHotel, normalizer: &dyn Normalizer) -> Document {
    let basic = raw.basic_data.unwrap_or_default();
    let rating = basic.aggregate_rating.unwrap_or_default();
    let address = basic.address.unwrap_or_default();
    let description = raw.description.as_deref().map(|d| normalizer.normalize(d)).unwrap_or_default();
    let features = raw
        .features
        .unwrap_or_default()
        .into_iter()
        .map(|f| f.as_deref().map(|f| normalizer.normalize(f)).unwrap_or_default())
        .collect();
    Document {
        name: basic.name.unwrap_or_default(),
        rating: rating.rating_value,
        review_count: rating.review_count,
        address: address.street_address,
        country: address.address_country.and_then(|c| c.name),
        description,
        features,
        image: basic.image,
        summary: raw.description,
    }
}

fn ground_truth(data: &str, output: &str, queries: Vec<String>) -> Result<()> {
    let engine = SearchEngine::open(&DataPaths::new(data))?;
    let queries = if queries.is_empty() {
        DEFAULT_QUERIES.iter().map(|q| q.to_string()).collect()
    } else {
        queries
    };
    let entries = build_ground_truth(&engine, &queries);
    save_ground_truth(Path::new(output), &entries)?;
    println!("Ground truth saved to {output}");
    Ok(())
}

fn run_evaluation(data: &str, ground_truth: &str, k: usize, model: ScoringModel) -> Result<()> {
    let engine = SearchEngine::open(&DataPaths::new(data))?;
    let entries = load_ground_truth(Path::new(ground_truth))?;
    let report = evaluate_with(&entries, &engine, k, model);

    println!("\nEvaluation Metrics ({model}):");
    for q in &report.queries {
        println!("Query: {}", q.query);
        println!("Precision@{k}: {:.4}", q.precision);
        println!("Recall@{k}: {:.4}", q.recall);
        println!("F1 Score@{k}: {:.4}", q.f1);
        println!("AP@{k}: {:.4}", q.average_precision);
        println!("{}", "-".repeat(30));
    }
    println!("Mean Precision@{k}: {:.4}", report.mean_precision);
    println!("Mean Recall@{k}: {:.4}", report.mean_recall);
    println!("Mean F1@{k}: {:.4}", report.mean_f1);
    println!("MAP@{k}: {:.4}", report.map);
    Ok(())
}

fn run_query(data: &str, query: &str, limit: Option<usize>) -> Result<()> {
    let engine = SearchEngine::open(&DataPaths::new(data))?;
    println!("Raw query: {query}");
    let outcome = engine.search(query);
    let name = |id| engine.document(id).map(|d| d.name.as_str()).unwrap_or("");

    println!("\nBoolean Search Results (100% match):");
    for &doc_id in &outcome.matching {
        println!("Document {doc_id}: {}", name(doc_id));
    }
    for (model, ranked) in [(ScoringModel::TfIdf, &outcome.tf_idf), (ScoringModel::Bm25, &outcome.bm25)] {
        println!("\nRanking with {model} (all documents):");
        for (doc_id, score) in ranked.iter().take(limit.unwrap_or(usize::MAX)) {
            println!("Document {doc_id}: {} (Score: {score})", name(*doc_id));
        }
    }
    Ok(())
}
