//! S3 object store over plain HTTP
//!
//! Uses ListObjectsV2 and GetObject. Requests are signed with SigV4 when
//! credentials are configured and sent anonymously otherwise (public buckets).

use super::sigv4::{self, SigningKeys, UnsignedRequest};
use super::ObjectStore;
use crate::config::{Credentials, StoreConfig};
use crate::error::{DocQueryError, Result};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{Client, Url};
use std::time::Duration;

lazy_static! {
    static ref KEY_RE: Regex = Regex::new(r"<Key>([^<]*)</Key>").unwrap();
    static ref TRUNCATED_RE: Regex = Regex::new(r"<IsTruncated>\s*true\s*</IsTruncated>").unwrap();
    static ref TOKEN_RE: Regex =
        Regex::new(r"<NextContinuationToken>([^<]*)</NextContinuationToken>").unwrap();
    static ref ERROR_CODE_RE: Regex = Regex::new(r"<Code>([^<]*)</Code>").unwrap();
    static ref ENTITY_RE: Regex =
        Regex::new(r"&(lt|gt|quot|apos|amp|#[0-9]+|#[xX][0-9a-fA-F]+);").unwrap();
}

/// Safety net against a service that never stops paginating
const MAX_LIST_PAGES: usize = 10_000;

/// One page of a ListObjectsV2 response
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ListPage {
    pub keys: Vec<String>,
    pub next_token: Option<String>,
}

/// Decode predefined entities and numeric character references in one pass
fn xml_unescape(s: &str) -> String {
    ENTITY_RE
        .replace_all(s, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "amp" => Some('&'),
                _ => {
                    let code = match entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => entity[1..].parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Extract keys and the continuation token from a ListObjectsV2 body
pub(crate) fn parse_list_page(body: &str) -> ListPage {
    let keys = KEY_RE
        .captures_iter(body)
        .filter_map(|c| c.get(1))
        .map(|m| xml_unescape(m.as_str()))
        .collect();

    let next_token = if TRUNCATED_RE.is_match(body) {
        TOKEN_RE
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| xml_unescape(m.as_str()))
            .filter(|t| !t.is_empty())
    } else {
        None
    };

    ListPage { keys, next_token }
}

fn error_code(body: &str) -> Option<String> {
    ERROR_CODE_RE
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// S3 (or S3-compatible) bucket
pub struct S3Store {
    client: Client,
    bucket: String,
    region: String,
    endpoint: Option<String>,
    credentials: Credentials,
}

impl S3Store {
    /// Create a store for `bucket` in `region`
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(concat!("docquery/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            bucket: bucket.into(),
            region: region.into(),
            endpoint: None,
            credentials: Credentials::anonymous(),
        }
    }

    pub fn from_config(config: &StoreConfig, credentials: &Credentials) -> Result<Self> {
        if config.bucket.trim().is_empty() {
            return Err(DocQueryError::Config(
                "s3 store requires `store.bucket`".to_string(),
            ));
        }
        let mut store = Self::new(config.bucket.trim(), config.region.clone())
            .with_credentials(credentials.clone());
        if let Some(endpoint) = &config.endpoint {
            store = store.with_endpoint(endpoint.clone());
        }
        Ok(store)
    }

    /// Use an S3-compatible endpoint with path-style addressing
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into().trim_end_matches('/').to_string());
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Scheme+authority and the path prefix objects live under
    fn base(&self) -> (String, String) {
        match &self.endpoint {
            Some(endpoint) => (endpoint.clone(), format!("/{}", sigv4::uri_encode(&self.bucket, true))),
            None => (
                format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region),
                String::new(),
            ),
        }
    }

    fn list_url(&self, prefix: &str, token: Option<&str>) -> Result<Url> {
        let (base, bucket_path) = self.base();
        let path = if bucket_path.is_empty() {
            "/".to_string()
        } else {
            bucket_path
        };

        let mut params = vec![("list-type", "2"), ("prefix", prefix)];
        if let Some(token) = token {
            params.push(("continuation-token", token));
        }
        let query = sigv4::canonical_query(&params);

        Url::parse(&format!("{}{}?{}", base, path, query))
            .map_err(|e| DocQueryError::Config(format!("Invalid store URL: {}", e)))
    }

    /// URL for `key`; keys the URL parser would rewrite (dot segments) are refused
    fn object_url(&self, key: &str) -> Result<Url> {
        let (base, bucket_path) = self.base();
        let path = format!("{}/{}", bucket_path, sigv4::uri_encode(key, false));
        let url = Url::parse(&format!("{}{}", base, path))
            .map_err(|e| DocQueryError::document_fetch(key, format!("Invalid object URL: {}", e)))?;

        if url.path() != path {
            return Err(DocQueryError::document_fetch(
                key,
                "key contains `.` or `..` segments and cannot be addressed over HTTP",
            ));
        }
        Ok(url)
    }

    /// SigV4 headers for `url`, signing the path and query exactly as they will be sent
    fn signed_headers(&self, url: &Url) -> Result<Vec<(String, String)>> {
        let Some((access_key_id, secret_access_key)) = self.credentials.key_pair() else {
            return Ok(Vec::new());
        };

        let host = match url.port() {
            Some(port) => format!("{}:{}", url.host_str().unwrap_or_default(), port),
            None => url.host_str().unwrap_or_default().to_string(),
        };
        let unsigned = UnsignedRequest {
            method: "GET",
            host: &host,
            path: url.path(),
            query: url.query().unwrap_or_default(),
        };
        let keys = SigningKeys {
            access_key_id,
            secret_access_key,
            session_token: self.credentials.session_token.as_deref(),
        };
        sigv4::sign(&unsigned, &keys, &self.region, chrono::Utc::now())
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response> {
        let mut request = self.client.get(url.clone());
        for (name, value) in self.signed_headers(&url)? {
            request = request.header(name, value);
        }
        Ok(request.send().await?)
    }

    async fn list_page(&self, prefix: &str, token: Option<&str>) -> Result<ListPage> {
        let url = self.list_url(prefix, token)?;

        let response = self.get(url).await.map_err(|e| {
            DocQueryError::StoreUnavailable(format!("Listing bucket {} failed: {}", self.bucket, e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            DocQueryError::StoreUnavailable(format!("Failed to read listing body: {}", e))
        })?;

        if !status.is_success() {
            return Err(DocQueryError::StoreUnavailable(format!(
                "Listing bucket {} returned HTTP {} ({})",
                self.bucket,
                status.as_u16(),
                error_code(&body).unwrap_or_else(|| "no error code".to_string())
            )));
        }

        Ok(parse_list_page(&body))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn store_type(&self) -> &'static str {
        "s3"
    }

    async fn list_documents(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut token: Option<String> = None;

        for page_number in 1..=MAX_LIST_PAGES {
            let page = self.list_page(prefix, token.as_deref()).await?;
            tracing::debug!(
                "Listed page {} of s3://{}/{} ({} keys)",
                page_number,
                self.bucket,
                prefix,
                page.keys.len()
            );
            keys.extend(page.keys);

            match page.next_token {
                Some(next) => token = Some(next),
                None => return Ok(keys),
            }
        }

        tracing::warn!(
            "Stopped listing s3://{}/{} after {} pages",
            self.bucket,
            prefix,
            MAX_LIST_PAGES
        );
        Ok(keys)
    }

    async fn fetch_document(&self, key: &str) -> Result<Vec<u8>> {
        let url = self.object_url(key)?;

        let response = self
            .get(url)
            .await
            .map_err(|e| DocQueryError::document_fetch(key, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocQueryError::document_fetch(
                key,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DocQueryError::document_fetch(key, e))?;
        Ok(bytes.to_vec())
    }
}
