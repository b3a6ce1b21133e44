//! Behavior-driven tests for the Yahoo chart adapter
//!
//! A scripted transport stands in for the network so the adapter's
//! decoding, error mapping, and retry behavior can be driven offline.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tidemark_core::{
    Backoff, HistoryRequest, HttpClient, HttpError, HttpRequest, HttpResponse, RetryConfig,
    SeriesSource, SourceErrorKind, Symbol, TradingDate, YahooChartSource,
};

/// Transport that replays a queue of canned responses.
struct ScriptedHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    fn last_url(&self) -> String {
        self.requests
            .lock()
            .expect("requests lock")
            .last()
            .expect("at least one request")
            .url
            .clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests.lock().expect("requests lock").push(request);
        let next = self
            .responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .expect("scripted response available");
        Box::pin(async move { next })
    }
}

fn chart_body() -> String {
    // Three sessions: 2024-01-02 .. 2024-01-04, with one null close
    r#"{
        "chart": {
            "result": [{
                "timestamp": [1704153600, 1704240000, 1704326400],
                "indicators": {
                    "quote": [{
                        "open": [100.0, 103.0, 104.0],
                        "high": [105.0, 106.0, 108.0],
                        "low": [99.0, 100.0, 103.0],
                        "close": [104.0, null, 107.0],
                        "volume": [1000, 1100, 1200]
                    }]
                }
            }],
            "error": null
        }
    }"#
    .to_string()
}

fn request() -> HistoryRequest {
    HistoryRequest::new(
        Symbol::parse("^NDX").expect("symbol"),
        TradingDate::parse("2024-01-01").expect("date"),
        TradingDate::parse("2024-01-31").expect("date"),
    )
    .expect("request")
}

fn fast_retries(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        backoff: Backoff::Fixed {
            delay: Duration::ZERO,
        },
        ..RetryConfig::default()
    }
}

#[tokio::test]
async fn a_successful_chart_response_becomes_a_validated_series() {
    let client = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
        chart_body(),
    ))]));
    let source = YahooChartSource::new(client.clone()).with_retry(RetryConfig::none());

    let fetch = source.daily_history(request()).await.expect("fetch");

    assert_eq!(fetch.series.len(), 2);
    assert_eq!(fetch.skipped_rows, 1);
    assert!(client.last_url().contains("/v8/finance/chart/%5ENDX"));
    assert!(client.last_url().contains("interval=1d"));
}

#[tokio::test]
async fn a_missing_symbol_maps_to_not_found() {
    let body = r#"{
        "chart": {
            "result": null,
            "error": {"code": "Not Found", "description": "No data found"}
        }
    }"#;
    let client = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
        body,
    ))]));
    let source = YahooChartSource::new(client).with_retry(RetryConfig::none());

    let err = source.daily_history(request()).await.expect_err("must fail");
    assert_eq!(err.kind(), SourceErrorKind::NotFound);
}

#[tokio::test]
async fn a_404_status_maps_to_not_found_without_retry() {
    let client = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse {
        status: 404,
        body: String::new(),
    })]));
    let source = YahooChartSource::new(client.clone()).with_retry(fast_retries(3));

    let err = source.daily_history(request()).await.expect_err("must fail");
    assert_eq!(err.kind(), SourceErrorKind::NotFound);
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn throttled_responses_are_retried_until_success() {
    let client = Arc::new(ScriptedHttpClient::new(vec![
        Ok(HttpResponse {
            status: 429,
            body: String::new(),
        }),
        Ok(HttpResponse {
            status: 503,
            body: String::new(),
        }),
        Ok(HttpResponse::ok_json(chart_body())),
    ]));
    let source = YahooChartSource::new(client.clone()).with_retry(fast_retries(3));

    let fetch = source.daily_history(request()).await.expect("fetch");
    assert_eq!(fetch.series.len(), 2);
    assert_eq!(client.request_count(), 3);
}

#[tokio::test]
async fn retries_are_exhausted_into_an_unavailable_error() {
    let client = Arc::new(ScriptedHttpClient::new(vec![
        Err(HttpError::new("connection reset")),
        Err(HttpError::new("connection reset")),
    ]));
    let source = YahooChartSource::new(client.clone()).with_retry(fast_retries(1));

    let err = source.daily_history(request()).await.expect_err("must fail");
    assert_eq!(err.kind(), SourceErrorKind::Unavailable);
    assert_eq!(client.request_count(), 2);
}

#[tokio::test]
async fn non_retryable_transport_errors_fail_immediately() {
    let client = Arc::new(ScriptedHttpClient::new(vec![Err(
        HttpError::non_retryable("invalid url"),
    )]));
    let source = YahooChartSource::new(client.clone()).with_retry(fast_retries(3));

    let err = source.daily_history(request()).await.expect_err("must fail");
    assert_eq!(err.kind(), SourceErrorKind::Unavailable);
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn inverted_date_ranges_never_reach_the_network() {
    let symbol = Symbol::parse("^NDX").expect("symbol");
    let start = TradingDate::parse("2024-02-01").expect("date");
    let end = TradingDate::parse("2024-01-01").expect("date");

    let err = HistoryRequest::new(symbol, start, end).expect_err("must fail");
    assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);
}
