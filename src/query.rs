//! Query composition and token helpers.
//!
//! Everything here is pure: the raw input the user sees is never rewritten
//! by composition, only by an explicit suggestion selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator inserted between terms in match-all mode.
pub const AND_OPERATOR: &str = "AND";

/// How the terms of a query are combined by the ranking service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Match any term; the input is sent unchanged.
    #[default]
    Or,
    /// Match all terms; terms are joined with [`AND_OPERATOR`].
    And,
}

impl SearchMode {
    /// Wire/config name of this mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
        }
    }

    /// Parse a mode name. Accepts `or`/`any` and `and`/`all`, any case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "or" | "any" => Some(Self::Or),
            "and" | "all" => Some(Self::And),
            _ => None,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown search mode: {s} (expected or|and)"))
    }
}

/// Turn raw input into the query string sent to the service.
///
/// Callers must reject whitespace-only input before composing.
#[must_use]
pub fn compose(raw_text: &str, mode: SearchMode) -> String {
    match mode {
        SearchMode::Or => raw_text.to_owned(),
        SearchMode::And => raw_text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(&format!(" {AND_OPERATOR} ")),
    }
}

/// The token currently being typed: everything after the last whitespace.
///
/// Returns `""` when the input is empty or ends in whitespace.
#[must_use]
pub fn last_token(input: &str) -> &str {
    &input[last_token_start(input)..]
}

/// Replace the last token of `input` with `replacement` plus one space.
#[must_use]
pub fn replace_last_token(input: &str, replacement: &str) -> String {
    let prefix = &input[..last_token_start(input)];
    let mut out = String::with_capacity(prefix.len() + replacement.len() + 1);
    out.push_str(prefix);
    out.push_str(replacement);
    out.push(' ');
    out
}

fn last_token_start(input: &str) -> usize {
    input
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_mode_joins_tokens_with_operator() {
        assert_eq!(
            compose("sars cov-2   vaccine", SearchMode::And),
            "sars AND cov-2 AND vaccine"
        );
    }

    #[test]
    fn or_mode_returns_input_unchanged() {
        let raw = "sars cov-2   vaccine";
        assert_eq!(compose(raw, SearchMode::Or), raw);
    }

    #[test]
    fn and_mode_drops_leading_and_trailing_whitespace() {
        assert_eq!(compose("\t mask \n", SearchMode::And), "mask");
        assert_eq!(compose(" ace2  receptor ", SearchMode::And), "ace2 AND receptor");
    }

    #[test]
    fn last_token_after_final_space() {
        assert_eq!(last_token("covid vacc"), "vacc");
        assert_eq!(last_token("vacc"), "vacc");
        assert_eq!(last_token("covid "), "");
        assert_eq!(last_token(""), "");
        assert_eq!(last_token("a\tbc"), "bc");
    }

    #[test]
    fn last_token_handles_multibyte_whitespace() {
        // U+3000 IDEOGRAPHIC SPACE is three bytes long.
        assert_eq!(last_token("mask\u{3000}eff"), "eff");
    }

    #[test]
    fn replace_last_token_appends_space() {
        assert_eq!(replace_last_token("covid vacc", "vaccine"), "covid vaccine ");
        assert_eq!(replace_last_token("vacc", "vaccine"), "vaccine ");
        assert_eq!(replace_last_token("covid ", "vaccine"), "covid vaccine ");
    }

    #[test]
    fn mode_parse_accepts_aliases() {
        assert_eq!(SearchMode::parse("AND"), Some(SearchMode::And));
        assert_eq!(SearchMode::parse(" all "), Some(SearchMode::And));
        assert_eq!(SearchMode::parse("any"), Some(SearchMode::Or));
        assert_eq!(SearchMode::parse("xor"), None);
        assert!("bogus".parse::<SearchMode>().is_err());
    }

    #[test]
    fn mode_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&SearchMode::And).expect("serialize");
        assert_eq!(json, "\"and\"");
        let decoded: SearchMode = serde_json::from_str("\"or\"").expect("deserialize");
        assert_eq!(decoded, SearchMode::Or);
        assert_eq!(SearchMode::default(), SearchMode::Or);
    }
}
