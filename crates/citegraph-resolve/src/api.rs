//! Semantic Scholar graph API client

use citegraph_core::http::get_text;
use reqwest::Url;
use serde::Deserialize;

use crate::error::ResolveError;
use crate::source::{CitationSource, LookupKey, PaperLinks, PeerPaper};

pub const DEFAULT_API_URL: &str = "https://api.semanticscholar.org/graph/v1/paper";

/// Fields requested per lookup
const FIELDS: &str = "citations.externalIds,references.externalIds";

/// Lookups against `{api_url}/{DOI|PMID}:{id}`.
#[derive(Debug, Clone)]
pub struct SemanticScholarClient {
    api_url: String,
    api_key: Option<String>,
}

impl SemanticScholarClient {
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            api_url,
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    /// Lookup URL for `key`. DOI slashes stay path separators, as the
    /// service expects; every other reserved character is escaped.
    pub fn url_for(&self, key: &LookupKey) -> Result<Url, ResolveError> {
        let invalid = |detail: String| ResolveError::RequestError { detail };
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| invalid(format!("invalid API URL {:?}: {e}", self.api_url)))?;
        let prefix = match key {
            LookupKey::Doi(_) => "DOI",
            LookupKey::Pmid(_) => "PMID",
        };
        {
            let mut segs = url
                .path_segments_mut()
                .map_err(|_| invalid(format!("API URL {:?} cannot take a path", self.api_url)))?;
            segs.pop_if_empty();
            let mut parts = key.value().split('/');
            let first = parts.next().unwrap_or_default();
            segs.push(&format!("{prefix}:{first}"));
            segs.extend(parts);
        }
        url.query_pairs_mut().append_pair("fields", FIELDS);
        Ok(url)
    }
}

impl Default for SemanticScholarClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, None)
    }
}

impl CitationSource for SemanticScholarClient {
    fn lookup(&self, key: &LookupKey) -> Result<PaperLinks, ResolveError> {
        let url = self.url_for(key)?;
        log::debug!("GET {key}");
        let headers: Vec<(&str, &str)> = self
            .api_key
            .as_deref()
            .map(|k| ("x-api-key", k))
            .into_iter()
            .collect();
        let body = get_text(url.as_str(), &headers)?;
        parse_links(&body)
    }
}

#[derive(Deserialize)]
struct PaperResponse {
    #[serde(default)]
    citations: Option<Vec<LinkedPaper>>,
    #[serde(default)]
    references: Option<Vec<LinkedPaper>>,
}

#[derive(Deserialize)]
struct LinkedPaper {
    #[serde(rename = "paperId", default)]
    paper_id: Option<String>,
    #[serde(rename = "externalIds", default)]
    external_ids: Option<serde_json::Map<String, serde_json::Value>>,
}

impl LinkedPaper {
    /// Peers the service has no external IDs for are not usable.
    fn into_peer(self) -> Option<PeerPaper> {
        let ids = self.external_ids.filter(|m| !m.is_empty())?;
        let doi = ids
            .get("DOI")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        Some(PeerPaper::new(self.paper_id.unwrap_or_default(), doi))
    }
}

/// Parse a paper response body. Absent or null lists read as empty.
pub fn parse_links(body: &str) -> Result<PaperLinks, ResolveError> {
    let response: PaperResponse =
        serde_json::from_str(body).map_err(|e| ResolveError::RequestError {
            detail: format!("invalid response JSON: {e}"),
        })?;
    let peers = |list: Option<Vec<LinkedPaper>>| -> Vec<PeerPaper> {
        list.unwrap_or_default()
            .into_iter()
            .filter_map(LinkedPaper::into_peer)
            .collect()
    };
    Ok(PaperLinks {
        citations: peers(response.citations),
        references: peers(response.references),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_for_doi_and_pmid() {
        let client = SemanticScholarClient::new("https://example.org/paper/", None);
        assert_eq!(
            client.url_for(&LookupKey::Doi("10.1/abc".into())).unwrap().as_str(),
            "https://example.org/paper/DOI:10.1/abc?fields=citations.externalIds%2Creferences.externalIds"
        );
        assert_eq!(
            client.url_for(&LookupKey::Pmid("42".into())).unwrap().as_str(),
            "https://example.org/paper/PMID:42?fields=citations.externalIds%2Creferences.externalIds"
        );
    }

    #[test]
    fn url_escapes_segment_terminators() {
        let client = SemanticScholarClient::default();
        let url = client
            .url_for(&LookupKey::Doi("10.1/a#b?c d%".into()))
            .unwrap();
        assert_eq!(url.path(), "/graph/v1/paper/DOI:10.1/a%23b%3Fc%20d%25");
        assert_eq!(
            url.query(),
            Some("fields=citations.externalIds%2Creferences.externalIds")
        );
    }

    #[test]
    fn unusable_api_url_is_request_error() {
        let client = SemanticScholarClient::new("not a url", None);
        let err = client.url_for(&LookupKey::Pmid("1".into())).unwrap_err();
        assert!(matches!(err, ResolveError::RequestError { .. }));
    }

    #[test]
    fn blank_api_key_is_ignored() {
        let client = SemanticScholarClient::new(DEFAULT_API_URL, Some(String::new()));
        assert!(client.api_key.is_none());
    }

    #[test]
    fn parses_both_directions() {
        let body = r#"{
            "paperId": "self",
            "citations": [
                {"paperId": "c1", "externalIds": {"DOI": "10.5/C1", "MAG": "9"}},
                {"paperId": "c2", "externalIds": {"CorpusId": 7}}
            ],
            "references": [
                {"paperId": "r1", "externalIds": {"DOI": "10.5/r1"}}
            ]
        }"#;
        let links = parse_links(body).unwrap();
        assert_eq!(
            links.citations,
            vec![PeerPaper::new("c1", "10.5/C1"), PeerPaper::new("c2", "")]
        );
        assert_eq!(links.references, vec![PeerPaper::new("r1", "10.5/r1")]);
    }

    #[test]
    fn peers_without_external_ids_are_dropped() {
        let body = r#"{
            "citations": [
                {"paperId": "a", "externalIds": null},
                {"paperId": "b", "externalIds": {}},
                {"paperId": "c"}
            ],
            "references": null
        }"#;
        let links = parse_links(body).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn missing_lists_read_as_empty() {
        let links = parse_links(r#"{"paperId": "x"}"#).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn invalid_json_is_request_error() {
        let err = parse_links("<html>").unwrap_err();
        assert!(matches!(err, ResolveError::RequestError { .. }));
    }

    /// Live lookup; needs network access.
    #[test]
    #[ignore]
    fn live_lookup() {
        let client = SemanticScholarClient::default();
        let links = client
            .lookup(&LookupKey::Doi("10.1038/nature14539".into()))
            .unwrap();
        assert!(!links.references.is_empty());
    }
}
