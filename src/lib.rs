//! Rate-limited async client for the DVSA MOT History trade API: registration and VIN lookups,
//! bulk-download manifests, and credential renewal behind a dual token-bucket quota gate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod obs;
pub mod rate_limit;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{StaticTokenProvider, TokenProvider},
		client::Client,
		config::{ClientConfig, RateLimitConfig},
		http::ReqwestHttpClient,
		rate_limit::{Clock, ManualClock},
	};

	/// API key attached to every request issued by test clients.
	pub const TEST_API_KEY: &str = "test-api-key";
	/// Bearer token handed out by the static provider used in tests.
	pub const TEST_BEARER_TOKEN: &str = "test-bearer-token";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a configuration pointing at `base_url` with the provided limits.
	pub fn test_config(base_url: &str, limits: RateLimitConfig) -> ClientConfig {
		ClientConfig::new("test-client", "test-secret", TEST_API_KEY)
			.with_base_url(Url::parse(base_url).expect("Mock base URL should parse successfully."))
			.with_rate_limits(limits)
	}

	/// Constructs a [`Client`] against `base_url` with a static bearer token and a manual clock.
	pub fn build_test_client(base_url: &str, limits: RateLimitConfig) -> (Client, ManualClock) {
		let clock = ManualClock::new();
		let token_provider: Arc<dyn TokenProvider> =
			Arc::new(StaticTokenProvider::new(TEST_BEARER_TOKEN));
		let shared_clock: Arc<dyn Clock> = Arc::new(clock.clone());
		let client = Client::with_http_client(
			test_config(base_url, limits),
			test_reqwest_http_client(),
			token_provider,
			shared_clock,
		)
		.expect("Test client should build successfully.");

		(client, clock)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::{Duration, Instant},
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, mot_history as _};
