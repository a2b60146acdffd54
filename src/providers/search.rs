//! Free-text city search.
//!
//! Uses Nominatim (OpenStreetMap). Free, no key, but requires a
//! User-Agent, which the shared HTTP client sets.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::{coordinate, SearchProvider};
use crate::error::ProviderError;
use crate::http::JsonSource;
use crate::types::SearchCandidate;

pub struct Nominatim {
    base_url: String,
    limit: u32,
}

impl Nominatim {
    pub fn new(base_url: impl Into<String>, limit: u32) -> Self {
        Self {
            base_url: base_url.into(),
            limit,
        }
    }
}

impl SearchProvider for Nominatim {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    fn query_url(&self, query: &str) -> String {
        format!(
            "{}?q={}&format=json&limit={}&addressdetails=1&featureType=city",
            self.base_url,
            urlencoding::encode(query),
            self.limit
        )
    }

    fn normalize(&self, raw: &Value) -> Result<Vec<SearchCandidate>, ProviderError> {
        let items = raw
            .as_array()
            .ok_or_else(|| ProviderError::malformed(self.name(), "expected a JSON array"))?;

        // Entries without a name or coordinates are dropped, not fatal.
        let candidates = items
            .iter()
            .filter_map(|item| {
                let display_name = item.get("display_name")?.as_str()?.to_string();
                let lat = coordinate(item.get("lat"))?;
                let lon = coordinate(item.get("lon"))?;
                let country_code = item
                    .get("address")
                    .and_then(|a| a.get("country_code"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let short_name =
                    SearchCandidate::short_name_for(&display_name, country_code.as_deref());
                Some(SearchCandidate {
                    display_name,
                    short_name,
                    lat,
                    lon,
                    country_code,
                })
            })
            .collect();

        Ok(candidates)
    }
}

/// A search provider bound to a transport.
pub struct CitySearcher {
    provider: Box<dyn SearchProvider>,
    source: Arc<dyn JsonSource>,
}

impl CitySearcher {
    pub fn new(provider: Box<dyn SearchProvider>, source: Arc<dyn JsonSource>) -> Self {
        Self { provider, source }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, ProviderError> {
        let url = self.provider.query_url(query);
        let raw = self.source.get_json(self.provider.name(), &url).await?;
        let results = self.provider.normalize(&raw)?;
        debug!(query, count = results.len(), "City search complete");
        Ok(results)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockJsonSource;
    use serde_json::json;

    fn nominatim() -> Nominatim {
        Nominatim::new("https://nominatim.example/search", 8)
    }

    #[test]
    fn test_query_url_encodes_text() {
        let url = nominatim().query_url("上海 市");
        assert!(url.starts_with("https://nominatim.example/search?q=%E4%B8%8A%E6%B5%B7%20%E5%B8%82"));
        assert!(url.ends_with("&format=json&limit=8&addressdetails=1&featureType=city"));
    }

    #[test]
    fn test_normalize_builds_short_names() {
        let raw = json!([
            {
                "display_name": "Shanghai, Huangpu District, Shanghai, China",
                "lat": "31.2322758",
                "lon": "121.4692071",
                "address": {"country_code": "cn"}
            },
            {
                "display_name": "Shanghai, Lancaster County, Pennsylvania, United States",
                "lat": "40.0",
                "lon": "-76.0"
            }
        ]);
        let results = nominatim().normalize(&raw).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].short_name, "Shanghai, CN");
        assert_eq!(results[0].lat, 31.2322758);
        assert_eq!(results[1].short_name, "Shanghai");
        assert_eq!(results[1].country_code, None);
    }

    #[test]
    fn test_normalize_skips_incomplete_entries() {
        let raw = json!([{"display_name": "Nowhere"}, {"lat": "1", "lon": "2"}]);
        assert!(nominatim().normalize(&raw).unwrap().is_empty());
    }

    #[test]
    fn test_normalize_rejects_non_array() {
        assert!(nominatim().normalize(&json!({"error": "bad"})).is_err());
    }

    #[tokio::test]
    async fn test_searcher_uses_provider_name() {
        let mut source = MockJsonSource::new();
        source
            .expect_get_json()
            .withf(|provider, url| provider == "nominatim" && url.contains("q=Paris"))
            .times(1)
            .returning(|_, _| {
                Ok(json!([{"display_name": "Paris, France", "lat": "48.85", "lon": "2.35",
                           "address": {"country_code": "fr"}}]))
            });

        let searcher = CitySearcher::new(Box::new(nominatim()), Arc::new(source));
        let results = searcher.search("Paris").await.unwrap();
        assert_eq!(results[0].short_name, "Paris, FR");
    }
}
