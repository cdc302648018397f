//! Presentation helpers: result cards, summary line, plain-text rendering.

use std::fmt::Write as _;

use cord_search_api::SearchResult;
use serde::Serialize;

use crate::paginate::{Page, PageMarker};
use crate::session::{SearchSession, SessionPhase};

/// Abstracts longer than this many characters are cut for the preview.
pub const ABSTRACT_PREVIEW_CHARS: usize = 300;

/// Title shown when a result has none.
pub const UNTITLED: &str = "Untitled Document";

/// One result as a front end shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultCard {
    pub rank: usize,
    pub doc_id: String,
    pub title: String,
    pub authors: Option<String>,
    pub abstract_preview: Option<String>,
    pub url: Option<String>,
    pub score: f64,
    /// Score with two decimals.
    pub score_label: String,
}

impl ResultCard {
    #[must_use]
    pub fn new(rank: usize, result: &SearchResult) -> Self {
        let title = non_blank(&result.title).unwrap_or(UNTITLED).to_owned();
        Self {
            rank,
            doc_id: result.doc_id.clone(),
            title,
            authors: non_blank(&result.authors).map(str::to_owned),
            abstract_preview: non_blank(&result.abstract_text).map(abstract_preview),
            url: result.url.as_deref().and_then(non_blank).map(str::to_owned),
            score: result.score,
            score_label: format!("{:.2}", result.score),
        }
    }
}

/// Cards for every item on `page`, carrying global ranks.
#[must_use]
pub fn page_cards(page: &Page<'_, SearchResult>) -> Vec<ResultCard> {
    page.ranked()
        .map(|(rank, result)| ResultCard::new(rank, result))
        .collect()
}

/// First [`ABSTRACT_PREVIEW_CHARS`] characters, with `...` when cut.
#[must_use]
pub fn abstract_preview(text: &str) -> String {
    match text.char_indices().nth(ABSTRACT_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

/// Status line above the results, or `None` when there is nothing to say.
#[must_use]
pub fn summary_line(phase: SessionPhase, session: &SearchSession) -> Option<String> {
    match phase {
        SessionPhase::Idle => None,
        SessionPhase::Loading => Some("Searching...".to_owned()),
        SessionPhase::Error => session.error.clone(),
        SessionPhase::Success if session.total_count == 0 => {
            Some(format!("No results found for \"{}\"", session.query))
        }
        SessionPhase::Success => {
            let noun = if session.total_count == 1 { "result" } else { "results" };
            let mut line = format!(
                "Found {} {noun} for \"{}\"",
                session.total_count, session.query
            );
            if let Some(ms) = session.elapsed_ms {
                let _ = write!(line, " ({ms:.0} ms)");
            }
            Some(line)
        }
    }
}

/// Render one card as indented plain text.
#[must_use]
pub fn render_card(card: &ResultCard) -> String {
    let mut out = format!("#{} {}\n", card.rank, card.title);
    if let Some(authors) = &card.authors {
        let _ = writeln!(out, "    {authors}");
    }
    if let Some(preview) = &card.abstract_preview {
        let _ = writeln!(out, "    {preview}");
    }
    if let Some(url) = &card.url {
        let _ = writeln!(out, "    {url}");
    }
    if !card.doc_id.is_empty() {
        let _ = writeln!(out, "    ID: {}", card.doc_id);
    }
    let _ = writeln!(out, "    Score: {}", card.score_label);
    out
}

/// Render the page window, bracketing the current page: `1 [2] 3 ... 9`.
#[must_use]
pub fn render_window(window: &[PageMarker], current: usize) -> String {
    window
        .iter()
        .map(|marker| match marker {
            PageMarker::Page(n) if *n == current => format!("[{n}]"),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
