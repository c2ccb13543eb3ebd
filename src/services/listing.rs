// src/services/listing.rs

//! Listing sources for a collection's icon names and metadata.
//!
//! - `ApiListing`: the Iconify API (`/collections`, `/collection`)
//! - `MirrorListing`: raw icon-set JSON documents, `<mirror>/<key>.json`
//! - `LocalListing`: the same document shape read from disk
//! - `FallbackListing`: tries one source, then another

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{Categories, CollectionInfo, CollectionKey, Config, Endpoints, Listing};
use crate::utils::http::fetch_json;

/// A provider of a collection's icon names.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// List every icon in the collection.
    async fn list(&self, key: &CollectionKey) -> Result<Listing>;
}

/// Primary source: the Iconify API.
pub struct ApiListing {
    client: Client,
    endpoints: Endpoints,
    timeout: Duration,
}

impl ApiListing {
    pub fn new(client: Client, endpoints: Endpoints, timeout: Duration) -> Self {
        Self {
            client,
            endpoints,
            timeout,
        }
    }
}

#[async_trait]
impl ListingSource for ApiListing {
    fn name(&self) -> &str {
        "Iconify API"
    }

    async fn list(&self, key: &CollectionKey) -> Result<Listing> {
        let collections = fetch_json(
            &self.client,
            &self.endpoints.api("collections"),
            &[("prefix", key.as_str())],
            self.timeout,
        )
        .await?;

        let Some(summary) = collections.as_object().and_then(|m| m.get(key.as_str())) else {
            log::debug!("/collections did not contain '{}'", key);
            return Err(AppError::UnknownCollection(key.to_string()));
        };

        let collection = fetch_json(
            &self.client,
            &self.endpoints.api("collection"),
            &[("prefix", key.as_str()), ("info", "true")],
            self.timeout,
        )
        .await?;

        let icons = collection
            .get("icons")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                AppError::malformed(
                    self.name(),
                    format!(
                        "'icons' is not a list (top-level keys: {})",
                        top_level_keys(&collection)
                    ),
                )
            })?;

        let names = icons
            .iter()
            .map(|icon| match icon {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();

        // Metadata embedded in the listing wins over the existence check.
        let info = match collection.get("info").filter(|v| v.is_object()) {
            Some(info) => CollectionInfo::from_value(Some(info)),
            None => CollectionInfo::from_value(Some(summary)),
        };

        Ok(Listing {
            names,
            info,
            categories: Categories::new(),
        })
    }
}

/// Secondary source: a static JSON mirror.
pub struct MirrorListing {
    client: Client,
    endpoints: Endpoints,
    timeout: Duration,
}

impl MirrorListing {
    pub fn new(client: Client, endpoints: Endpoints, timeout: Duration) -> Self {
        Self {
            client,
            endpoints,
            timeout,
        }
    }
}

#[async_trait]
impl ListingSource for MirrorListing {
    fn name(&self) -> &str {
        "icon-set mirror"
    }

    async fn list(&self, key: &CollectionKey) -> Result<Listing> {
        let url = self.endpoints.mirror(&format!("{}.json", key));
        let document = fetch_json(&self.client, &url, &[], self.timeout).await?;
        parse_icon_set(self.name(), &document)
    }
}

/// Offline source: an icon-set JSON document on disk.
pub struct LocalListing {
    path: PathBuf,
}

impl LocalListing {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ListingSource for LocalListing {
    fn name(&self) -> &str {
        "local JSON"
    }

    async fn list(&self, key: &CollectionKey) -> Result<Listing> {
        let bytes = tokio::fs::read(&self.path).await?;
        let document: Value = serde_json::from_slice(&bytes)?;

        if let Some(prefix) = document.get("prefix").and_then(Value::as_str) {
            if !prefix.eq_ignore_ascii_case(key.as_str()) {
                log::warn!(
                    "{} declares prefix '{}' but files will be named after '{}'",
                    self.path.display(),
                    prefix,
                    key
                );
            }
        }

        let listing = parse_icon_set(self.name(), &document)?;
        log::debug!("Local JSON listing: {} icons", listing.names.len());
        Ok(listing)
    }
}

/// Tries `primary`, and on any failure `secondary`.
pub struct FallbackListing {
    primary: Box<dyn ListingSource>,
    secondary: Box<dyn ListingSource>,
}

impl FallbackListing {
    pub fn new(primary: Box<dyn ListingSource>, secondary: Box<dyn ListingSource>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl ListingSource for FallbackListing {
    fn name(&self) -> &str {
        self.primary.name()
    }

    async fn list(&self, key: &CollectionKey) -> Result<Listing> {
        match self.primary.list(key).await {
            Ok(listing) => {
                log::debug!(
                    "{} returned {} icons for '{}'",
                    self.primary.name(),
                    listing.names.len(),
                    key
                );
                Ok(listing)
            }
            Err(e) => {
                log::debug!("{} failed for '{}': {}", self.primary.name(), key, e);
                log::debug!("Falling back to {} for '{}'", self.secondary.name(), key);
                let listing = self.secondary.list(key).await?;
                log::debug!(
                    "{} returned {} icons for '{}'",
                    self.secondary.name(),
                    listing.names.len(),
                    key
                );
                Ok(listing)
            }
        }
    }
}

/// Pick the listing source for a run: a local file if given, otherwise
/// the API with the mirror as fallback.
pub fn listing_source(
    config: &Config,
    client: &Client,
    local: Option<&Path>,
) -> Box<dyn ListingSource> {
    if let Some(path) = local {
        return Box::new(LocalListing::new(path));
    }

    let timeout = Duration::from_secs(config.http.listing_timeout_secs);
    Box::new(FallbackListing::new(
        Box::new(ApiListing::new(
            client.clone(),
            config.endpoints.clone(),
            timeout,
        )),
        Box::new(MirrorListing::new(
            client.clone(),
            config.endpoints.clone(),
            timeout,
        )),
    ))
}

/// Resolve the listing for a key and reject empty collections.
pub async fn fetch_listing(source: &dyn ListingSource, key: &CollectionKey) -> Result<Listing> {
    let listing = source.list(key).await?;
    if listing.names.is_empty() {
        return Err(AppError::EmptyListing(key.to_string()));
    }
    Ok(listing)
}

/// Read an icon-set document: `icons` must be an object keyed by name;
/// `info` and `categories` are optional.
fn parse_icon_set(source_name: &str, document: &Value) -> Result<Listing> {
    let icons = document
        .get("icons")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            AppError::malformed(
                source_name,
                format!(
                    "'icons' is not an object (top-level keys: {})",
                    top_level_keys(document)
                ),
            )
        })?;

    let mut names: Vec<String> = icons.keys().cloned().collect();
    names.sort();

    let categories = document
        .get("categories")
        .and_then(Value::as_object)
        .map(|categories| {
            categories
                .iter()
                .filter_map(|(category, members)| {
                    let members: Vec<String> = members
                        .as_array()?
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect();
                    Some((category.clone(), members))
                })
                .collect::<Categories>()
        })
        .unwrap_or_default();

    Ok(Listing {
        names,
        info: CollectionInfo::from_value(document.get("info")),
        categories,
    })
}

fn top_level_keys(value: &Value) -> String {
    match value.as_object() {
        Some(map) => map.keys().cloned().collect::<Vec<_>>().join(", "),
        None => String::from("<not an object>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::http::create_async_client;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn key(s: &str) -> CollectionKey {
        CollectionKey::parse(s).unwrap()
    }

    fn config_for(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.endpoints.api_base = server.uri();
        config.endpoints.mirror_base = format!("{}/json", server.uri());
        config
    }

    fn mirror_document() -> Value {
        json!({
            "prefix": "demo",
            "info": { "name": "Demo", "license": { "title": "MIT", "spdx": "MIT" } },
            "icons": { "user": {}, "arrow-left": {}, "home": {} },
            "categories": {
                "Navigation": ["arrow-left", "home"],
                "Account": ["user", "home"]
            }
        })
    }

    async fn mount_api(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/collections"))
            .and(query_param("prefix", "demo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "demo": { "name": "Demo (summary)", "total": 3 }
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_api_listing() {
        let server = MockServer::start().await;
        mount_api(&server).await;
        Mock::given(method("GET"))
            .and(path("/collection"))
            .and(query_param("prefix", "demo"))
            .and(query_param("info", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "prefix": "demo",
                "icons": ["home", "user"],
                "info": { "name": "Demo", "license": { "title": "Apache 2.0" } }
            })))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let client = create_async_client(&config.http).unwrap();
        let source = ApiListing::new(client, config.endpoints, Duration::from_secs(5));
        let listing = source.list(&key("demo")).await.unwrap();

        assert_eq!(listing.names, vec!["home", "user"]);
        assert_eq!(listing.info.name.as_deref(), Some("Demo"));
        assert!(listing.categories.is_empty());
    }

    #[tokio::test]
    async fn test_api_listing_uses_summary_info_when_listing_has_none() {
        let server = MockServer::start().await;
        mount_api(&server).await;
        Mock::given(method("GET"))
            .and(path("/collection"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "icons": ["home"]
            })))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let client = create_async_client(&config.http).unwrap();
        let source = ApiListing::new(client, config.endpoints, Duration::from_secs(5));
        let listing = source.list(&key("demo")).await.unwrap();

        assert_eq!(listing.info.name.as_deref(), Some("Demo (summary)"));
        assert_eq!(listing.info.total, Some(3));
    }

    #[tokio::test]
    async fn test_api_listing_unknown_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let client = create_async_client(&config.http).unwrap();
        let source = ApiListing::new(client, config.endpoints, Duration::from_secs(5));
        let result = source.list(&key("demo")).await;

        assert!(matches!(result, Err(AppError::UnknownCollection(k)) if k == "demo"));
    }

    #[tokio::test]
    async fn test_api_listing_malformed_icons() {
        let server = MockServer::start().await;
        mount_api(&server).await;
        Mock::given(method("GET"))
            .and(path("/collection"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uncategorized": ["home"]
            })))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let client = create_async_client(&config.http).unwrap();
        let source = ApiListing::new(client, config.endpoints, Duration::from_secs(5));
        let result = source.list(&key("demo")).await;

        assert!(matches!(result, Err(AppError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_fallback_to_mirror_when_api_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collections"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/json/demo.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(mirror_document()))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let client = create_async_client(&config.http).unwrap();
        let source = listing_source(&config, &client, None);
        let listing = fetch_listing(source.as_ref(), &key("demo")).await.unwrap();

        assert_eq!(listing.names, vec!["arrow-left", "home", "user"]);
        assert_eq!(
            listing.categories.keys().collect::<Vec<_>>(),
            vec!["Navigation", "Account"]
        );
        assert_eq!(listing.category_of("home"), Some("Navigation"));
        let license = listing.info.license.unwrap();
        assert_eq!(license.display_name(), Some("MIT"));
    }

    #[tokio::test]
    async fn test_fallback_reports_mirror_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/json/demo.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "icons": [] })))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let client = create_async_client(&config.http).unwrap();
        let source = listing_source(&config, &client, None);
        let result = fetch_listing(source.as_ref(), &key("demo")).await;

        assert!(matches!(
            result,
            Err(AppError::MalformedResponse { source_name, .. }) if source_name == "icon-set mirror"
        ));
    }

    #[tokio::test]
    async fn test_local_listing_skips_network() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("demo.json");
        std::fs::write(&file, serde_json::to_vec(&mirror_document()).unwrap()).unwrap();

        // Endpoints point nowhere; a network call would fail.
        let mut config = Config::default();
        config.endpoints.api_base = "http://127.0.0.1:9".into();
        let client = create_async_client(&config.http).unwrap();
        let source = listing_source(&config, &client, Some(file.as_path()));

        assert_eq!(source.name(), "local JSON");
        let listing = fetch_listing(source.as_ref(), &key("demo")).await.unwrap();
        assert_eq!(listing.names.len(), 3);
        assert_eq!(listing.categories.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_listing_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("empty.json");
        std::fs::write(&file, br#"{"icons": {}}"#).unwrap();

        let source = LocalListing::new(&file);
        let result = fetch_listing(&source, &key("empty")).await;
        assert!(matches!(result, Err(AppError::EmptyListing(_))));
    }

    #[test]
    fn test_parse_icon_set_ignores_bad_categories() {
        let document = json!({
            "icons": { "a": {}, "b": {} },
            "categories": { "Good": ["a"], "Bad": "not-a-list" },
            "info": "not-an-object"
        });
        let listing = parse_icon_set("test", &document).unwrap();
        assert_eq!(listing.categories.len(), 1);
        assert!(listing.info.is_empty());
    }
}
