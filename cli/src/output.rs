//! Rendering search results for the terminal

use sentence_search::SearchResult;
use std::fmt::Write;

/// Human-readable listing, one block per query
pub fn render_text(results: &[SearchResult<'_>]) -> String {
    let mut out = String::new();

    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "Query: {} ({} distance, {} matches)",
            result.query,
            result.metric,
            result.len()
        );

        for (rank, m) in result.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. [{:.4}] #{} {}",
                rank + 1,
                m.distance,
                m.unit.position(),
                m.unit.text()
            );
            if !m.context.is_empty() {
                let _ = writeln!(out, "       {}", m.context_text());
            }
        }
    }

    out
}

/// Pretty JSON array of results
pub fn render_json(results: &[SearchResult<'_>]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}
