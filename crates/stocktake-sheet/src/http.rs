//! HTTP sink for a spreadsheet-backed logging endpoint
//!
//! The endpoint's response is treated as opaque: neither the status code
//! nor the body is ever read. What the sink can report is that the request
//! was dispatched (fire-and-forget) or that it settled (awaited).
//!
//! # Examples
//!
//! ```no_run
//! use stocktake_sheet::{DeliveryMode, Encoding, HttpSink};
//!
//! let sink = HttpSink::new("https://script.google.com/macros/s/abc/exec")
//!     .unwrap()
//!     .with_encoding(Encoding::Json)
//!     .with_delivery(DeliveryMode::Awaited);
//! ```

use crate::encoding::{json_document, Encoding, HttpMethod};
use crate::SinkError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use stocktake_domain::{Delivery, InventoryRecord, RecordSink};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Whether `submit` waits for the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Spawn the request and return immediately
    #[default]
    FireAndForget,
    /// Wait until the endpoint answers, without reading the answer
    Awaited,
}

impl DeliveryMode {
    /// Name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMode::FireAndForget => "fire_and_forget",
            DeliveryMode::Awaited => "awaited",
        }
    }
}

/// Sink that submits records to a logging endpoint over HTTP
#[derive(Debug, Clone)]
pub struct HttpSink {
    endpoint: Url,
    encoding: Encoding,
    method: HttpMethod,
    delivery: DeliveryMode,
    client: reqwest::Client,
    background: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl HttpSink {
    /// Create a sink for `endpoint` with query encoding, POST and fire-and-forget delivery
    ///
    /// # Errors
    ///
    /// Returns `SinkError::InvalidEndpoint` unless `endpoint` is an absolute
    /// http(s) URL.
    pub fn new(endpoint: &str) -> Result<Self, SinkError> {
        let endpoint = Url::parse(endpoint.trim())
            .map_err(|e| SinkError::InvalidEndpoint(format!("'{}': {}", endpoint, e)))?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(SinkError::InvalidEndpoint(format!(
                "unsupported scheme '{}'",
                endpoint.scheme()
            )));
        }

        Ok(Self {
            endpoint,
            encoding: Encoding::default(),
            method: HttpMethod::default(),
            delivery: DeliveryMode::default(),
            client: build_client(None)?,
            background: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Set the body encoding
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the HTTP method
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Set whether submissions are awaited
    pub fn with_delivery(mut self, delivery: DeliveryMode) -> Self {
        self.delivery = delivery;
        self
    }

    /// Apply a request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, SinkError> {
        self.client = build_client(Some(timeout))?;
        Ok(self)
    }

    /// Configured endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Configured delivery mode
    pub fn delivery(&self) -> DeliveryMode {
        self.delivery
    }

    /// Build the request for `record` without sending it
    pub fn prepare(&self, record: &InventoryRecord) -> Result<RequestBuilder, SinkError> {
        let encoding = self.encoding.effective(self.method);

        let request = match encoding {
            Encoding::Query => {
                let mut url = self.endpoint.clone();
                {
                    let mut pairs = url.query_pairs_mut();
                    for (name, value) in record.text_fields() {
                        pairs.append_pair(name, &value);
                    }
                }
                match self.method {
                    HttpMethod::Get => self.client.get(url),
                    HttpMethod::Post => self.client.post(url),
                }
            }
            Encoding::Form => {
                let fields: Vec<(&str, String)> = record.text_fields().into_iter().collect();
                self.client.post(self.endpoint.clone()).form(&fields)
            }
            Encoding::Json => self
                .client
                .post(self.endpoint.clone())
                .json(&json_document(record)),
            Encoding::Text => {
                let body = serde_json::to_string(&json_document(record))
                    .map_err(|e| SinkError::Encode(e.to_string()))?;
                self.client
                    .post(self.endpoint.clone())
                    .header(CONTENT_TYPE, Encoding::Text.content_type().unwrap_or("text/plain"))
                    .body(body)
            }
        };

        Ok(request)
    }

    /// Wait for background dispatches started so far, up to `limit`
    ///
    /// Returns the number of dispatches still running when the limit was
    /// reached. Only needed by short-lived processes that would otherwise
    /// exit before a fire-and-forget request has left.
    pub async fn drain(&self, limit: Duration) -> usize {
        let mut handles: Vec<JoinHandle<()>> = {
            let mut background = self.background.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *background)
        };

        let wait_all = async {
            for handle in handles.iter_mut() {
                let _ = handle.await;
            }
        };
        let timed_out = tokio::time::timeout(limit, wait_all).await.is_err();

        let remaining = handles.iter().filter(|h| !h.is_finished()).count();
        if timed_out {
            warn!("{} background dispatch(es) still running after {:?}", remaining, limit);
        }
        remaining
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut background = self.background.lock().unwrap_or_else(|e| e.into_inner());
        background.retain(|h| !h.is_finished());
        background.push(handle);
    }
}

impl RecordSink for HttpSink {
    type Error = SinkError;

    async fn submit(&self, record: &InventoryRecord) -> Result<Delivery, Self::Error> {
        let request = self.prepare(record)?;
        let encoding = self.encoding.effective(self.method);

        debug!(
            "{} {} ({} encoding, {})",
            self.method.as_str().to_uppercase(),
            self.endpoint,
            encoding.as_str(),
            self.delivery.as_str()
        );

        match self.delivery {
            DeliveryMode::FireAndForget => {
                let item = record.item_name.clone();
                let handle = tokio::spawn(async move {
                    // The answer is opaque; only a failure to send is worth a log line
                    match request.send().await {
                        Ok(_) => debug!("Background dispatch for '{}' settled", item),
                        Err(e) => warn!("Background dispatch for '{}' failed: {}", item, e),
                    }
                });
                self.track(handle);
                info!("Dispatched '{}' to sheet endpoint", record.item_name);
                Ok(Delivery::Dispatched)
            }
            DeliveryMode::Awaited => {
                request
                    .send()
                    .await
                    .map_err(|e| SinkError::Transport(e.to_string()))?;
                info!("Sheet endpoint settled for '{}'", record.item_name);
                Ok(Delivery::Settled)
            }
        }
    }
}

fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, SinkError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| SinkError::Config(format!("Failed to build HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "https://sheets.example.com/exec";

    fn hammers() -> InventoryRecord {
        InventoryRecord::new("hammers", "tools", 5.0, "garage").unwrap()
    }

    fn body_text(request: &reqwest::Request) -> String {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap_or_default();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_invalid_endpoints() {
        assert!(matches!(HttpSink::new("not a url"), Err(SinkError::InvalidEndpoint(_))));
        assert!(matches!(HttpSink::new(""), Err(SinkError::InvalidEndpoint(_))));
        assert!(matches!(HttpSink::new("ftp://example.com/x"), Err(SinkError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_defaults() {
        let sink = HttpSink::new(ENDPOINT).unwrap();
        assert_eq!(sink.encoding, Encoding::Query);
        assert_eq!(sink.method, HttpMethod::Post);
        assert_eq!(sink.delivery(), DeliveryMode::FireAndForget);
    }

    #[test]
    fn test_prepare_query() {
        let sink = HttpSink::new(ENDPOINT).unwrap();
        let request = sink.prepare(&hammers()).unwrap().build().unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://sheets.example.com/exec?itemName=hammers&category=tools&quantity=5&location=garage"
        );
        assert!(request.body().is_none());
    }

    #[test]
    fn test_prepare_query_keeps_existing_parameters() {
        let sink = HttpSink::new("https://sheets.example.com/exec?sheet=Inventory").unwrap();
        let record = InventoryRecord::new("paint cans", "supplies", 2.5, "shed & loft").unwrap();
        let request = sink.prepare(&record).unwrap().build().unwrap();

        assert_eq!(
            request.url().query(),
            Some("sheet=Inventory&itemName=paint+cans&category=supplies&quantity=2.5&location=shed+%26+loft")
        );
    }

    #[test]
    fn test_prepare_get_uses_query_even_for_json() {
        let sink = HttpSink::new(ENDPOINT)
            .unwrap()
            .with_method(HttpMethod::Get)
            .with_encoding(Encoding::Json);
        let request = sink.prepare(&hammers()).unwrap().build().unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert!(request.url().query().unwrap().contains("itemName=hammers"));
        assert!(request.body().is_none());
    }

    #[test]
    fn test_prepare_form() {
        let sink = HttpSink::new(ENDPOINT).unwrap().with_encoding(Encoding::Form);
        let request = sink.prepare(&hammers()).unwrap().build().unwrap();

        assert_eq!(
            request.headers()[CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        assert_eq!(body_text(&request), "itemName=hammers&category=tools&quantity=5&location=garage");
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn test_prepare_json() {
        let sink = HttpSink::new(ENDPOINT).unwrap().with_encoding(Encoding::Json);
        let request = sink.prepare(&hammers()).unwrap().build().unwrap();

        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
        let body: serde_json::Value = serde_json::from_str(&body_text(&request)).unwrap();
        assert_eq!(body, json_document(&hammers()));
    }

    #[test]
    fn test_prepare_text() {
        let sink = HttpSink::new(ENDPOINT).unwrap().with_encoding(Encoding::Text);
        let request = sink.prepare(&hammers()).unwrap().build().unwrap();

        assert!(request.headers()[CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));
        let body: serde_json::Value = serde_json::from_str(&body_text(&request)).unwrap();
        assert_eq!(body["quantity"], 5.0);
    }

    #[test]
    fn test_delivery_mode_serde() {
        let mode: DeliveryMode = serde_json::from_str("\"fire_and_forget\"").unwrap();
        assert_eq!(mode, DeliveryMode::FireAndForget);
        let mode: DeliveryMode = serde_json::from_str("\"awaited\"").unwrap();
        assert_eq!(mode, DeliveryMode::Awaited);
    }

    #[tokio::test]
    async fn test_drain_with_nothing_in_flight() {
        let sink = HttpSink::new(ENDPOINT).unwrap();
        assert_eq!(sink.drain(Duration::from_millis(10)).await, 0);
    }
}
