//! Load a text, index its sentences and answer queries

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use sentence_search::{
    segment, Embedder, FastEmbedder, FixtureEmbedder, HnswParams, Index, Indexer, ModelConfig,
    QueryPipeline, SearchStrategy, VectorEngine,
};

use crate::args::Args;
use crate::output;

/// Most corpus vectors sampled when checking HNSW recall
const RECALL_SAMPLE: usize = 64;

/// Run every query in `args` and return the rendered output
pub fn run(args: &Args) -> Result<String> {
    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let body = segment::trim_between(
        &raw,
        args.start_marker.as_deref(),
        args.end_marker.as_deref(),
    );
    let sentences = segment::split_sentences(body);
    if sentences.is_empty() {
        bail!("No sentences found in {}", args.input.display());
    }
    tracing::info!(
        "Segmented {} into {} sentences",
        args.input.display(),
        sentences.len()
    );

    let embedder = load_embedder(args)?;
    let pipeline = QueryPipeline::with_config(embedder, args.search_config());
    let index = pipeline
        .index_sentences(&sentences, &Indexer::new(args.index_config()))
        .context("Failed to build sentence index")?;

    if let SearchStrategy::Approximate(params) = index.config().strategy {
        check_recall(&index, &params, args.k)?;
    }

    let mut results = Vec::with_capacity(args.queries.len());
    for query in &args.queries {
        let result = pipeline
            .search_with_config(query, &index)
            .with_context(|| format!("Search failed for query {:?}", query))?;
        results.push(result);
    }

    if args.json {
        Ok(output::render_json(&results)?)
    } else {
        Ok(output::render_text(&results))
    }
}

/// Fixture when given, otherwise a cached fastembed model
pub fn load_embedder(args: &Args) -> Result<Arc<dyn Embedder>> {
    if let Some(path) = &args.fixture {
        let fixture = FixtureEmbedder::from_path(path)
            .with_context(|| format!("Failed to load fixture {}", path.display()))?;
        return Ok(Arc::new(fixture));
    }

    let config = ModelConfig {
        model_name: args.model.clone(),
        cache_dir: args.cache_dir.clone(),
        show_download_progress: true,
        ..ModelConfig::default()
    };
    let model = FastEmbedder::new(config)
        .with_context(|| format!("Failed to load embedding model {}", args.model))?;

    Ok(Arc::new(VectorEngine::new(Arc::new(model))))
}

/// Compare HNSW against an exact scan on a sample of the corpus itself
fn check_recall(index: &Index, params: &HnswParams, k: usize) -> Result<()> {
    let corpus = index.corpus();
    let stride = (corpus.len() / RECALL_SAMPLE).max(1);
    let sample: Vec<Vec<f32>> = corpus
        .iter()
        .step_by(stride)
        .take(RECALL_SAMPLE)
        .map(|unit| unit.vector().to_vec())
        .collect();

    let recall = index.recall_against_exact(&sample, k.max(1))?;
    if recall < params.min_recall {
        tracing::warn!(
            "HNSW recall@{} is {:.3}, below the {:.3} tolerance; consider raising --ef-search",
            k,
            recall,
            params.min_recall
        );
    } else {
        tracing::info!("HNSW recall@{} is {:.3}", k, recall);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TEXT: &str = "Front matter.\n\nSTART The dog ran. The cat slept.\nA hound barked. END back matter";

    const FIXTURE: &str = r#"{
        "model": "animals",
        "dimension": 3,
        "vectors": {
            "START The dog ran.": [0.8, 0.1, 0.6],
            "The cat slept.": [0.1, 0.9, 0.1],
            "A hound barked.": [0.9, 0.05, 0.2],
            "canine": [1.0, 0.0, 0.0],
            "feline": [0.0, 1.0, 0.0]
        }
    }"#;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn args(extra: &[&str]) -> (Args, NamedTempFile, NamedTempFile) {
        let text = write_temp(TEXT);
        let fixture = write_temp(FIXTURE);
        let mut argv = vec![
            "sentence-search".to_string(),
            "--input".to_string(),
            text.path().display().to_string(),
            "--fixture".to_string(),
            fixture.path().display().to_string(),
            "--start-marker".to_string(),
            "START".to_string(),
            "--end-marker".to_string(),
            "END".to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        (Args::try_parse_from(argv).unwrap(), text, fixture)
    }

    #[test]
    fn test_text_output() {
        let (args, _text, _fixture) = args(&["-q", "canine", "-k", "2"]);
        let out = run(&args).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Query: canine (cosine distance, 2 matches)");
        assert!(lines[1].starts_with("  1. ["));
        assert!(lines[1].ends_with("#2 A hound barked."));
        assert!(lines[2].ends_with("#0 START The dog ran."));
    }

    #[test]
    fn test_context_lines() {
        let (args, _text, _fixture) = args(&["-q", "feline", "-k", "1", "--context", "2"]);
        let out = run(&args).unwrap();
        assert!(out.contains("#1 The cat slept."));
        assert!(out.contains("       The cat slept. A hound barked."));
    }

    #[test]
    fn test_json_output_with_hnsw() {
        let (args, _text, _fixture) = args(&[
            "-q",
            "canine",
            "-q",
            "feline",
            "-k",
            "10",
            "--approximate",
            "--json",
        ]);
        let out = run(&args).unwrap();

        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        let results = json.as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["matches"].as_array().unwrap().len(), 3);
        assert_eq!(results[1]["matches"][0]["unit"]["text"], "The cat slept.");
    }

    #[test]
    fn test_unknown_query_fails() {
        let (args, _text, _fixture) = args(&["-q", "bovine"]);
        let err = run(&args).unwrap_err();
        assert!(format!("{:#}", err).contains("bovine"));
    }

    #[test]
    fn test_missing_input() {
        let args = Args::try_parse_from([
            "sentence-search",
            "-i",
            "/nonexistent/book.txt",
            "-q",
            "dog",
        ])
        .unwrap();
        let err = run(&args).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_no_sentences() {
        let text = write_temp("   \n\n  ...  ");
        let args = Args::try_parse_from([
            "sentence-search".to_string(),
            "-i".to_string(),
            text.path().display().to_string(),
            "-q".to_string(),
            "dog".to_string(),
        ])
        .unwrap();
        let err = run(&args).unwrap_err();
        assert!(err.to_string().contains("No sentences found"));
    }
}
