//! Wire types for the ranking service responses.

use serde::{Deserialize, Deserializer, Serialize};

/// A single ranked paper returned by `/search`.
///
/// Immutable once received. Missing fields decode to empty strings (or `0`
/// for the score) so a sparse corpus record never fails the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchResult {
    /// Corpus document identifier. Unique, but may be empty.
    pub doc_id: String,
    /// Paper title.
    pub title: String,
    /// Author list as a single display string.
    pub authors: String,
    /// Paper abstract.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Link to the full text, when the corpus has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Relative relevance (higher is better). Not bounded to `[0, 1]`.
    pub score: f64,
}

/// Body of a `/search` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Ranked results. An absent or `null` field means no results, not an
    /// error.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<SearchResult>,
}

/// Body of an `/autocomplete` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    /// Completions in relevance order. `null` reads as none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub suggestions: Vec<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_result_uses_camel_case_wire_names() {
        let json = r#"{
            "docId": "ug7v899j",
            "title": "Clinical features of culture-proven Mycoplasma pneumoniae infections",
            "authors": "Madani, Tariq A; Al-Ghamdi, Aisha A",
            "abstract": "OBJECTIVE: This retrospective chart review describes...",
            "score": 12.5
        }"#;
        let result: SearchResult = serde_json::from_str(json).expect("deserialize");
        assert_eq!(result.doc_id, "ug7v899j");
        assert!(result.abstract_text.starts_with("OBJECTIVE"));
        assert!(result.url.is_none());
        assert!((result.score - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn sparse_search_result_defaults_missing_fields() {
        let result: SearchResult = serde_json::from_str(r#"{"title":"Only a title"}"#)
            .expect("deserialize");
        assert_eq!(result.title, "Only a title");
        assert!(result.doc_id.is_empty());
        assert!(result.authors.is_empty());
        assert!(result.score.abs() < f64::EPSILON);
    }

    #[test]
    fn serialized_result_omits_absent_url() {
        let result = SearchResult {
            doc_id: "a1".into(),
            title: "T".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["docId"], "a1");
        assert!(json.get("url").is_none());
        assert!(json.get("abstract").is_some());
    }

    #[test]
    fn search_response_missing_results_is_empty() {
        let response: SearchResponse = serde_json::from_str("{}").expect("deserialize");
        assert!(response.results.is_empty());
    }

    #[test]
    fn null_lists_read_as_empty() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"results":null}"#).expect("deserialize");
        assert!(response.results.is_empty());

        let response: AutocompleteResponse =
            serde_json::from_str(r#"{"suggestions":null}"#).expect("deserialize");
        assert!(response.suggestions.is_empty());
    }

    #[test]
    fn autocomplete_response_preserves_order() {
        let response: AutocompleteResponse =
            serde_json::from_str(r#"{"suggestions":["vaccine","vaccines","vaccination"]}"#)
                .expect("deserialize");
        assert_eq!(
            response.suggestions,
            vec!["vaccine", "vaccines", "vaccination"]
        );
    }
}
