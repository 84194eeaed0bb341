//! Collection enumeration through the advanced-search API.

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::{ArchiveClient, FetchError, parse_url};

/// Top-level `advancedsearch.php` JSON response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub response: SearchResults,
}

/// The `response` object of a search result.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResults {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

/// One document in `response.docs`.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchDoc {
    pub identifier: String,
}

/// Identifiers of a collection in search-API order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionListing {
    identifiers: Vec<String>,
    num_found: u64,
    pages_fetched: u32,
}

impl CollectionListing {
    /// Identifiers in the order the API returned them.
    #[must_use]
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Consumes the listing, returning its identifiers.
    #[must_use]
    pub fn into_identifiers(self) -> Vec<String> {
        self.identifiers
    }

    /// Collection size reported by the API (`numFound`).
    #[must_use]
    pub fn num_found(&self) -> u64 {
        self.num_found
    }

    /// Number of search pages requested.
    #[must_use]
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Whether the API reported more items than were listed.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        (self.identifiers.len() as u64) < self.num_found
    }
}

impl ArchiveClient {
    /// Lists every identifier in the configured collection.
    ///
    /// Pages are requested until the reported `numFound` is reached, a page
    /// comes back short, or `max_search_pages` is exhausted. With the default
    /// row limit that is one request.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if any page fails; partial listings are discarded.
    #[instrument(skip(self), fields(collection = %self.config.collection))]
    pub async fn list_collection(&self) -> Result<CollectionListing, FetchError> {
        let rows = self.config.search_rows;
        let mut listing = CollectionListing::default();

        for page in 1..=self.config.max_search_pages {
            let results = self.fetch_search_page(page).await?;
            let page_len = results.docs.len();
            listing.pages_fetched = page;
            listing.num_found = listing.num_found.max(results.num_found);
            listing
                .identifiers
                .extend(results.docs.into_iter().map(|doc| doc.identifier));

            debug!(
                page,
                page_len,
                listed = listing.identifiers.len(),
                num_found = listing.num_found,
                "Fetched search page"
            );

            let short_page = page_len < rows as usize;
            if short_page || listing.identifiers.len() as u64 >= listing.num_found {
                break;
            }
        }

        if listing.is_truncated() {
            warn!(
                listed = listing.identifiers.len(),
                num_found = listing.num_found,
                max_pages = self.config.max_search_pages,
                "Collection listing truncated; raise the page limit to list every item"
            );
        }

        info!(
            count = listing.identifiers.len(),
            "Found items in collection"
        );
        Ok(listing)
    }

    async fn fetch_search_page(&self, page: u32) -> Result<SearchResults, FetchError> {
        let url = self.search_page_url(page)?;
        let body: SearchResponse = self.get_json(url).await?;
        Ok(body.response)
    }

    fn search_page_url(&self, page: u32) -> Result<Url, FetchError> {
        let base = parse_url(&self.config.search_url())?;
        let query = format!("collection:{}", self.config.collection);
        let rows = self.config.search_rows.to_string();
        let page = page.to_string();
        Url::parse_with_params(
            base.as_str(),
            &[
                ("q", query.as_str()),
                ("fl[]", "identifier"),
                ("fl[]", "title"),
                ("rows", rows.as_str()),
                ("page", page.as_str()),
                ("output", "json"),
            ],
        )
        .map_err(|_| FetchError::invalid_url(base.as_str()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ScraperConfig;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    fn search_json(num_found: u64, identifiers: &[&str]) -> serde_json::Value {
        let docs: Vec<_> = identifiers
            .iter()
            .map(|id| serde_json::json!({"identifier": id, "title": format!("Title {id}")}))
            .collect();
        serde_json::json!({
            "responseHeader": {"status": 0},
            "response": {"numFound": num_found, "start": 0, "docs": docs}
        })
    }

    #[test]
    fn test_search_response_deserialize_missing_response() {
        let resp: SearchResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(resp.response.docs.is_empty());
        assert_eq!(resp.response.num_found, 0);
    }

    #[test]
    fn test_search_doc_requires_identifier() {
        let result = serde_json::from_value::<SearchResponse>(serde_json::json!({
            "response": {"docs": [{"title": "no id"}]}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_listing_truncation_flag() {
        let listing = CollectionListing {
            identifiers: vec!["a".to_string()],
            num_found: 2,
            pages_fetched: 1,
        };
        assert!(listing.is_truncated());

        let listing = CollectionListing {
            identifiers: vec!["a".to_string(), "b".to_string()],
            num_found: 2,
            pages_fetched: 1,
        };
        assert!(!listing.is_truncated());
    }

    #[test]
    fn test_search_page_url_carries_query_parameters() {
        let client = ArchiveClient::new(ScraperConfig::default()).unwrap();
        let url = client.search_page_url(1).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(url.path(), "/advancedsearch.php");
        assert!(pairs.contains(&("q".into(), "collection:psp-homebrew-library".into())));
        assert!(pairs.contains(&("fl[]".into(), "identifier".into())));
        assert!(pairs.contains(&("fl[]".into(), "title".into())));
        assert!(pairs.contains(&("rows".into(), "10000".into())));
        assert!(pairs.contains(&("page".into(), "1".into())));
        assert!(pairs.contains(&("output".into(), "json".into())));
    }

    #[tokio::test]
    async fn test_list_collection_preserves_api_order() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/advancedsearch.php"))
            .and(query_param("q", "collection:psp-homebrew-library"))
            .and(query_param("output", "json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(search_json(3, &["zeta", "alpha", "mid"])),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ArchiveClient::new(ScraperConfig::with_base_url(mock_server.uri())).unwrap();
        let listing = client.list_collection().await.unwrap();

        assert_eq!(listing.identifiers(), ["zeta", "alpha", "mid"]);
        assert_eq!(listing.pages_fetched(), 1);
        assert!(!listing.is_truncated());
    }

    #[tokio::test]
    async fn test_list_collection_follows_pages_until_num_found() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/advancedsearch.php"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_json(3, &["a", "b"])))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/advancedsearch.php"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_json(3, &["c"])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut config = ScraperConfig::with_base_url(mock_server.uri());
        config.search_rows = 2;
        let client = ArchiveClient::new(config).unwrap();
        let listing = client.list_collection().await.unwrap();

        assert_eq!(listing.identifiers(), ["a", "b", "c"]);
        assert_eq!(listing.pages_fetched(), 2);
        assert!(!listing.is_truncated());
    }

    #[tokio::test]
    async fn test_list_collection_flags_truncation_at_page_limit() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/advancedsearch.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_json(5, &["a", "b"])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut config = ScraperConfig::with_base_url(mock_server.uri());
        config.search_rows = 2;
        config.max_search_pages = 1;
        let client = ArchiveClient::new(config).unwrap();
        let listing = client.list_collection().await.unwrap();

        assert_eq!(listing.identifiers().len(), 2);
        assert_eq!(listing.num_found(), 5);
        assert!(listing.is_truncated());
    }

    #[tokio::test]
    async fn test_list_collection_http_error_is_typed() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/advancedsearch.php"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let client = ArchiveClient::new(ScraperConfig::with_base_url(mock_server.uri())).unwrap();
        let err = client.list_collection().await.unwrap_err();
        assert!(
            matches!(err, FetchError::HttpStatus { status: 502, .. }),
            "expected HTTP 502, got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_list_collection_malformed_json_is_decode_error() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/advancedsearch.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
            .mount(&mock_server)
            .await;

        let client = ArchiveClient::new(ScraperConfig::with_base_url(mock_server.uri())).unwrap();
        let err = client.list_collection().await.unwrap_err();
        assert_eq!(err.kind(), "decode");
    }
}
