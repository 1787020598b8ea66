//! Command line arguments

use clap::Parser;
use sentence_search::{DistanceMetric, HnswParams, IndexConfig, SearchConfig, SearchStrategy};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "sentence-search")]
#[command(about = "Semantic sentence search over a plain-text file")]
#[command(version)]
pub struct Args {
    /// Plain-text file to index
    #[arg(long, short)]
    pub input: PathBuf,

    /// Query to run (repeat for several)
    #[arg(long = "query", short = 'q', required = true)]
    pub queries: Vec<String>,

    /// Results per query (clamped to the number of sentences)
    #[arg(short = 'k', long, default_value_t = 5)]
    pub k: usize,

    /// Sentences per context window, starting at each match (0 disables)
    #[arg(long, default_value_t = 0)]
    pub context: usize,

    /// Index text starting at the first occurrence of this marker
    #[arg(long)]
    pub start_marker: Option<String>,

    /// Stop indexing at the first occurrence of this marker after the start
    #[arg(long)]
    pub end_marker: Option<String>,

    /// Distance metric: cosine or euclidean
    #[arg(long, default_value_t = DistanceMetric::Cosine)]
    pub metric: DistanceMetric,

    /// Use the HNSW approximate index instead of an exact scan
    #[arg(long)]
    pub approximate: bool,

    /// HNSW candidate list size while building
    #[arg(long, default_value_t = 100)]
    pub ef_construction: usize,

    /// HNSW candidate list size while searching
    #[arg(long, default_value_t = 100)]
    pub ef_search: usize,

    /// Warn when HNSW recall against an exact scan drops below this
    #[arg(long, default_value_t = 0.9)]
    pub min_recall: f32,

    /// Embedding model name (alias or fastembed model code)
    #[arg(long, default_value = "bge-small-en-v1.5")]
    pub model: String,

    /// Model cache directory (defaults to SENTENCE_SEARCH_MODELS_PATH or ~/.sentence-search/models)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Use precomputed vectors from a JSON fixture instead of a live model
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Args {
    pub fn index_config(&self) -> IndexConfig {
        let strategy = if self.approximate {
            SearchStrategy::Approximate(HnswParams {
                ef_construction: self.ef_construction,
                ef_search: self.ef_search,
                min_recall: self.min_recall,
                ..HnswParams::default()
            })
        } else {
            SearchStrategy::Exact
        };

        IndexConfig {
            metric: self.metric,
            strategy,
        }
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            limit: self.k,
            context_size: self.context,
        }
    }
}
