//! Text preparation: trimming a source text and splitting it into sentences

use std::sync::OnceLock;

use regex::Regex;

/// Sentence terminators, optionally followed by closing quotes or brackets,
/// then whitespace. Blank lines also end a sentence.
fn boundary() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| {
        Regex::new(r#"[.!?]+["'’”)\]]*\s+|\n\s*\n"#).expect("sentence boundary regex is valid")
    })
}

fn whitespace() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex is valid"))
}

/// Cut `text` down to the region that starts at the first `start` marker and
/// ends right before the next `end` marker.
///
/// A missing or absent marker falls back to the corresponding text boundary.
pub fn trim_between<'a>(text: &'a str, start: Option<&str>, end: Option<&str>) -> &'a str {
    let from = start
        .filter(|m| !m.is_empty())
        .and_then(|m| text.find(m))
        .unwrap_or(0);
    let rest = &text[from..];

    let to = end
        .filter(|m| !m.is_empty())
        .and_then(|m| rest.find(m))
        .unwrap_or(rest.len());

    rest[..to].trim()
}

/// Split text into sentences in document order.
///
/// Internal whitespace (including line wraps) is collapsed to single spaces
/// and empty fragments are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut last = 0;

    for m in boundary().find_iter(text) {
        // Keep the punctuation, drop the trailing whitespace
        let end = m.start() + m.as_str().trim_end().len();
        push_sentence(&mut sentences, &text[last..end]);
        last = m.end();
    }
    push_sentence(&mut sentences, &text[last..]);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, fragment: &str) {
    let collapsed = whitespace().replace_all(fragment.trim(), " ");
    if collapsed.chars().any(char::is_alphanumeric) {
        sentences.push(collapsed.into_owned());
    }
}
