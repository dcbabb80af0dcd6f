//! Remote access to the CIViC REST service.
//!
//! The object model only depends on the [`RemoteFetcher`] trait. [`HttpFetcher`] is the blocking
//! HTTP implementation; tests substitute an in-memory fetcher.
use crate::{
    config::ClientConfig,
    error::{CivicError, Result},
    record::{Payload, Record},
    registry::REGISTRY,
    schema::RecordKind,
    search::SearchQuery,
};
use reqwest::blocking::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub trait RemoteFetcher {
    /// Fetch the full field map of one record.
    fn fetch(&self, record_type: &str, id: i64) -> Result<Payload>;

    /// Run a search against the collection for `record_type`, returning the raw `results`.
    fn search(&self, record_type: &str, query: &SearchQuery) -> Result<Vec<Value>>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    api_url: Url,
}

impl HttpFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(HttpFetcher {
            client,
            api_url: config.api_url.clone(),
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// `{api}/{pluralized type}/{id}`
    pub fn record_url(&self, record_type: &str, id: i64) -> Result<Url> {
        let endpoint = REGISTRY.naming().endpoint_for(record_type);
        let id = id.to_string();
        self.endpoint_url(&[endpoint.as_str(), id.as_str()])
    }

    /// `{api}/{pluralized type}/search`
    pub fn search_url(&self, record_type: &str) -> Result<Url> {
        let endpoint = REGISTRY.naming().endpoint_for(record_type);
        self.endpoint_url(&[endpoint.as_str(), "search"])
    }

    fn endpoint_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| CivicError::Config(format!("{} cannot be a base URL", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn check_status(method: &str, url: &Url, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(CivicError::Transport {
            status: Some(status.as_u16()),
            message: format!("{method} {url} returned {status}"),
        })
    }
}

impl RemoteFetcher for HttpFetcher {
    fn fetch(&self, record_type: &str, id: i64) -> Result<Payload> {
        let url = self.record_url(record_type, id)?;
        tracing::debug!("[HttpFetcher::fetch] GET {}", url);
        let response = check_status("GET", &url, self.client.get(url.clone()).send()?)?;
        match response.json::<Value>()? {
            Value::Object(payload) => Ok(payload),
            other => Err(CivicError::MalformedPayload(format!(
                "GET {url} returned a non-object body: {other}"
            ))),
        }
    }

    fn search(&self, record_type: &str, query: &SearchQuery) -> Result<Vec<Value>> {
        let url = self.search_url(record_type)?;
        tracing::debug!(
            "[HttpFetcher::search] POST {} ({} queries)",
            url,
            query.queries.len()
        );
        let response = check_status(
            "POST",
            &url,
            self.client.post(url.clone()).json(query).send()?,
        )?;
        let body = response.json::<Value>()?;
        take_results(&url, body)
    }
}

fn take_results(url: &Url, body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(results)) => Ok(results),
            _ => Err(CivicError::MalformedPayload(format!(
                "POST {url} response has no results list"
            ))),
        },
        other => Err(CivicError::MalformedPayload(format!(
            "POST {url} returned a non-object body: {other}"
        ))),
    }
}

/// Fetch one complete record by id.
pub fn get_record<F>(fetcher: &F, kind: RecordKind, id: i64) -> Result<Record>
where
    F: RemoteFetcher + ?Sized,
{
    if kind.is_leaf() {
        return Err(CivicError::NotFetchable(kind.tag().to_string()));
    }
    let payload = fetcher.fetch(kind.tag(), id)?;
    Record::from_payload(kind, payload, false)
}

/// Run a search and build one record per result, in result order.
pub fn search_records<F>(
    fetcher: &F,
    kind: RecordKind,
    query: &SearchQuery,
    partial: bool,
) -> Result<Vec<Record>>
where
    F: RemoteFetcher + ?Sized,
{
    let results = fetcher.search(kind.tag(), query)?;
    tracing::debug!(
        "[search_records] {} {} results",
        results.len(),
        kind.tag()
    );
    results
        .into_iter()
        .map(|value| Record::from_value(kind, value, partial))
        .collect()
}

/// Fetch complete assertions by id with a single OR search.
pub fn get_assertions<F>(fetcher: &F, ids: &[i64]) -> Result<Vec<Record>>
where
    F: RemoteFetcher + ?Sized,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    search_records(
        fetcher,
        RecordKind::Assertion,
        &SearchQuery::ids_equal_to(ids),
        false,
    )
}
