//! Sportsbook odds-aggregator REST client with rate limiting.
//!
//! Mirrors `algo_trade_kalshi::KalshiClient`'s shape: a governor-backed
//! token bucket, a shared [`RetryPolicy`] wrapping every request, and a
//! typed accessor per endpoint. The aggregator fronts many books behind
//! one API, so the client's job is strictly fetch-and-convert — the
//! heavy lifting (vig removal, pooling) happens downstream in
//! `algo_trade_consensus`.

use crate::error::{OddsClientError, Result};
use crate::types::{RawGamesResponse, RawGameOddsResponse, RawPropOddsResponse};
use algo_trade_core::{retry_with_backoff, BookQuote, Game, PlayerPropQuote, RetryPolicy};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use std::num::NonZeroU32;
use std::sync::Arc;

/// Production base URL for the odds aggregator.
pub const ODDS_API_PROD_URL: &str = "https://api.oddsaggregator.example.com/v1";

#[derive(Debug, Clone)]
pub struct OddsClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub requests_per_minute: NonZeroU32,
    pub timeout_secs: u64,
}

impl OddsClientConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: ODDS_API_PROD_URL.to_string(),
            api_key: api_key.into(),
            requests_per_minute: nonzero!(120u32),
            timeout_secs: 10,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_minute: NonZeroU32) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }
}

pub struct OddsClient {
    config: OddsClientConfig,
    http: Client,
    rate_limiter:
        Arc<RateLimiter<governor::state::NotKeyed, governor::state::InMemoryState, governor::clock::DefaultClock>>,
    retry_policy: RetryPolicy,
}

impl std::fmt::Debug for OddsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OddsClient")
            .field("base_url", &self.config.base_url)
            .field("requests_per_minute", &self.config.requests_per_minute)
            .finish_non_exhaustive()
    }
}

impl OddsClient {
    /// # Errors
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(config: OddsClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(OddsClientError::Configuration("sportsbook_api_key must not be empty".to_string()));
        }

        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OddsClientError::Network(format!("failed to build HTTP client: {e}")))?;

        let quota = Quota::per_minute(config.requests_per_minute);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self { config, http, rate_limiter, retry_policy: RetryPolicy::default() })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        retry_with_backoff(self.retry_policy, || async {
            self.rate_limiter.until_ready().await;
            let url = format!("{}{}", self.config.base_url, path);
            tracing::debug!("GET {}", url);
            let response = self
                .http
                .get(&url)
                .header("Authorization", format!("Bearer {}", self.config.api_key))
                .header("Accept", "application/json")
                .send()
                .await?;
            self.handle_response(response).await
        })
        .await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(30);
            return Err(OddsClientError::rate_limit(retry_after));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OddsClientError::api(status.as_u16(), text));
        }

        Ok(response.json::<T>().await?)
    }

    /// Fetches today's (and near-term) slate of scheduled games.
    ///
    /// # Errors
    /// Returns an error on network failure, a non-2xx response, or a
    /// malformed body.
    pub async fn get_games(&self, date: &str) -> Result<Vec<Game>> {
        let path = format!("/games?date={date}");
        let response: RawGamesResponse = self.get(&path).await?;
        Ok(response.games.into_iter().filter_map(crate::types::RawGame::into_domain).collect())
    }

    /// Fetches every book's moneyline/spread/total quote for one game.
    ///
    /// # Errors
    /// Returns an error on network failure, a non-2xx response, or a
    /// malformed body.
    pub async fn get_game_odds(&self, game_id: &str) -> Result<Vec<BookQuote>> {
        let path = format!("/odds?game_id={game_id}");
        let response: RawGameOddsResponse = self.get(&path).await?;
        Ok(response.books.into_iter().flat_map(crate::types::RawGameOdds::into_quotes).collect())
    }

    /// Fetches every book's player-prop quotes for one game.
    ///
    /// # Errors
    /// Returns an error on network failure, a non-2xx response, or a
    /// malformed body.
    pub async fn get_player_props(&self, game_id: &str) -> Result<Vec<PlayerPropQuote>> {
        let path = format!("/props?game_id={game_id}");
        let response: RawPropOddsResponse = self.get(&path).await?;
        Ok(response.props.into_iter().filter_map(crate::types::RawPropOdds::into_domain).collect())
    }
}
