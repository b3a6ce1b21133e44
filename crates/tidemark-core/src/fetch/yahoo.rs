//! Yahoo Finance v8 chart adapter for daily index history.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::OffsetDateTime;

use crate::domain::{PriceObservation, PriceSeries, TradingDate};
use crate::fetch::http::{HttpClient, HttpRequest};
use crate::fetch::retry::RetryConfig;
use crate::fetch::{HistoryRequest, SeriesFetch, SeriesSource, SourceError};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Daily OHLC history from Yahoo's unauthenticated chart endpoint.
pub struct YahooChartSource {
    http: Arc<dyn HttpClient>,
    retry: RetryConfig,
    base_url: String,
}

impl YahooChartSource {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            retry: RetryConfig::default(),
            base_url: String::from(DEFAULT_BASE_URL),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn chart_url(&self, request: &HistoryRequest) -> String {
        let period1 = unix_midnight(request.start);
        // The chart endpoint treats period2 as exclusive; push it one day
        // past the requested end to keep the range inclusive.
        let period2 = unix_midnight(request.end.next_day().unwrap_or(request.end));
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history",
            self.base_url,
            urlencoding::encode(request.symbol.as_str()),
            period1,
            period2,
        )
    }

    async fn execute_with_retry(
        &self,
        request: HttpRequest,
    ) -> Result<crate::fetch::HttpResponse, SourceError> {
        let mut attempt = 0u32;
        loop {
            match self.http.execute(request.clone()).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => {
                    let retryable = self.retry.should_retry_status(response.status);
                    if retryable && attempt < self.retry.max_retries {
                        tokio::time::sleep(self.retry.backoff.delay(attempt)).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(match response.status {
                        404 => SourceError::not_found("no chart data for symbol"),
                        429 => SourceError::rate_limited("chart endpoint throttled the request"),
                        status => {
                            SourceError::unavailable(format!("chart endpoint returned {status}"))
                        }
                    });
                }
                Err(error) => {
                    if error.retryable() && attempt < self.retry.max_retries {
                        tokio::time::sleep(self.retry.backoff.delay(attempt)).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(SourceError::unavailable(error.message().to_owned()));
                }
            }
        }
    }
}

impl SeriesSource for YahooChartSource {
    fn provider(&self) -> &'static str {
        "yahoo"
    }

    fn daily_history<'a>(
        &'a self,
        request: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SeriesFetch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let http_request = HttpRequest::get(self.chart_url(&request))
                .with_header("accept", "application/json")
                .with_timeout_ms(request.timeout_ms);

            let response = self.execute_with_retry(http_request).await?;
            decode_chart(&response.body)
        })
    }
}

fn unix_midnight(date: TradingDate) -> i64 {
    date.into_inner().midnight().assume_utc().unix_timestamp()
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize, Default)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Decode a chart payload into a validated series.
///
/// Rows with null or out-of-bounds values are skipped and counted, not
/// fatal: the provider is gap-tolerant by contract.
fn decode_chart(body: &str) -> Result<SeriesFetch, SourceError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|error| SourceError::decode(format!("chart payload: {error}")))?;

    if let Some(error) = envelope.chart.error {
        return Err(SourceError::not_found(format!(
            "{}: {}",
            error.code, error.description
        )));
    }

    let Some(result) = envelope
        .chart
        .result
        .and_then(|mut results| (!results.is_empty()).then(|| results.remove(0)))
    else {
        return Err(SourceError::decode("chart payload carries no result"));
    };

    let Some(quote) = result.indicators.quote.first() else {
        return Err(SourceError::decode("chart payload carries no quote block"));
    };

    let mut observations: Vec<PriceObservation> = Vec::with_capacity(result.timestamp.len());
    let mut skipped_rows = 0usize;
    let mut last_date: Option<TradingDate> = None;

    for (index, ts) in result.timestamp.iter().enumerate() {
        let row = (
            quote.open.get(index).copied().flatten(),
            quote.high.get(index).copied().flatten(),
            quote.low.get(index).copied().flatten(),
            quote.close.get(index).copied().flatten(),
        );
        let (Some(open), Some(high), Some(low), Some(close)) = row else {
            skipped_rows += 1;
            continue;
        };

        let Ok(datetime) = OffsetDateTime::from_unix_timestamp(*ts) else {
            skipped_rows += 1;
            continue;
        };
        let date = TradingDate::from_date(datetime.date());
        // Intraday duplicates of the same session collapse to the first row.
        if last_date.is_some_and(|previous| date <= previous) {
            skipped_rows += 1;
            continue;
        }

        let volume = quote.volume.get(index).copied().flatten();
        match PriceObservation::new(date, open, high, low, close, volume) {
            Ok(observation) => {
                last_date = Some(date);
                observations.push(observation);
            }
            Err(_) => skipped_rows += 1,
        }
    }

    let series = PriceSeries::new(observations)
        .map_err(|error| SourceError::decode(format!("chart rows: {error}")))?;

    Ok(SeriesFetch {
        series,
        skipped_rows,
    })
}
