//! Query pipeline
//!
//! Embeds a query with the corpus embedder, asks the index for the nearest
//! units and maps them back to sentences with their surrounding context.

use std::sync::Arc;

use serde::Serialize;

use crate::corpus::{Corpus, TextUnit};
use crate::embedding::Embedder;
use crate::error::{QueryError, Result};
use crate::index::{DistanceMetric, Index, Indexer};

/// Search configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum results to return (default: 5)
    pub limit: usize,
    /// Units per context window starting at the match, 0 disables (default: 0)
    pub context_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: 5,
            context_size: 0,
        }
    }
}

/// One ranked match
#[derive(Debug, Clone, Serialize)]
pub struct Match<'a> {
    /// The matched unit
    pub unit: &'a TextUnit,
    /// Distance under the index metric
    pub distance: f32,
    /// `[position, position + context_size)`, clamped at the corpus end
    pub context: &'a [TextUnit],
}

impl Match<'_> {
    /// Context window joined into one passage
    pub fn context_text(&self) -> String {
        self.context
            .iter()
            .map(TextUnit::text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Matches ordered by ascending distance
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<'a> {
    pub query: String,
    pub metric: DistanceMetric,
    pub matches: Vec<Match<'a>>,
}

impl<'a> SearchResult<'a> {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match<'a>> {
        self.matches.iter()
    }

    /// Matched sentences in rank order
    pub fn texts(&self) -> Vec<&'a str> {
        self.matches.iter().map(|m| m.unit.text()).collect()
    }
}

/// Embeds queries and resolves them against an index
pub struct QueryPipeline {
    embedder: Arc<dyn Embedder>,
    config: SearchConfig,
}

impl QueryPipeline {
    /// Create a pipeline with default configuration
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self::with_config(embedder, SearchConfig::default())
    }

    pub fn with_config(embedder: Arc<dyn Embedder>, config: SearchConfig) -> Self {
        Self { embedder, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Embed sentences with this pipeline's embedder and build an index over them
    pub fn index_sentences<S: AsRef<str>>(&self, sentences: &[S], indexer: &Indexer) -> Result<Index> {
        let corpus = Corpus::from_sentences(sentences, self.embedder.as_ref())?;
        let index = indexer.build(Arc::new(corpus))?;
        Ok(index)
    }

    /// Search with the configured limit
    pub fn search_with_config<'i>(&self, raw_query: &str, index: &'i Index) -> Result<SearchResult<'i>> {
        self.search(raw_query, index, self.config.limit)
    }

    /// The `k` units nearest in meaning to `raw_query`
    pub fn search<'i>(&self, raw_query: &str, index: &'i Index, k: usize) -> Result<SearchResult<'i>> {
        let query = raw_query.trim();
        if query.is_empty() {
            return Err(QueryError::EmptyQuery.into());
        }

        let corpus = index.corpus();
        if corpus.model_id() != self.embedder.model_id() {
            return Err(QueryError::ModelMismatch {
                index_model: corpus.model_id().to_string(),
                query_model: self.embedder.model_id().to_string(),
            }
            .into());
        }

        let vector = self.embedder.embed(query)?;
        let hits = index.query(&vector, k)?;

        let matches: Vec<Match<'i>> = hits
            .into_iter()
            .map(|hit| Match {
                unit: hit.unit,
                distance: hit.distance,
                context: corpus.window(hit.unit.position(), self.config.context_size),
            })
            .collect();

        log::debug!("Query {:?} matched {} units", query, matches.len());

        Ok(SearchResult {
            query: query.to_string(),
            metric: index.metric(),
            matches,
        })
    }
}
