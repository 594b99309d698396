//! Client configuration: credentials, endpoints, and quota parameters.

// self
use crate::{_prelude::*, auth::ApiSecret, error::ConfigError, rate_limit::WaitPolicy};

/// Production API root for trade vehicle lookups.
pub const DEFAULT_BASE_URL: &str = "https://history.mot.api.gov.uk/v1/trade/vehicles";
/// OAuth 2.0 token endpoint issuing bearer tokens for the API.
pub const DEFAULT_TOKEN_URL: &str =
	"https://login.microsoftonline.com/a455b827-244f-4c97-b5b4-ce5d13b4d00c/oauth2/v2.0/token";
/// Scope requested during the client-credentials grant.
pub const DEFAULT_SCOPE: &str = "https://tapi.dvsa.gov.uk/.default";

/// Credentials and endpoints for one [`Client`](crate::client::Client).
#[derive(Clone)]
pub struct ClientConfig {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: ApiSecret,
	/// Static key sent as `X-API-Key` on every call.
	pub api_key: ApiSecret,
	/// API root that endpoint paths are appended to.
	pub base_url: Url,
	/// Token endpoint for the client-credentials grant.
	pub token_url: String,
	/// Scope requested for bearer tokens.
	pub scope: String,
	/// Quota parameters for the shared limiter.
	pub rate_limits: RateLimitConfig,
	/// Behavior when the limiter has no token available.
	pub wait_policy: WaitPolicy,
}
impl ClientConfig {
	/// Creates a configuration targeting the production API with default quotas.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		api_key: impl Into<String>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: ApiSecret::new(client_secret),
			api_key: ApiSecret::new(api_key),
			base_url: default_base_url(),
			token_url: DEFAULT_TOKEN_URL.into(),
			scope: DEFAULT_SCOPE.into(),
			rate_limits: RateLimitConfig::default(),
			wait_policy: WaitPolicy::default(),
		}
	}

	/// Overrides the API root (e.g. to point at a mock server).
	pub fn with_base_url(mut self, url: Url) -> Self {
		self.base_url = url;

		self
	}

	/// Overrides the token endpoint.
	pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
		self.token_url = url.into();

		self
	}

	/// Overrides the requested scope.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = scope.into();

		self
	}

	/// Overrides the quota parameters.
	pub fn with_rate_limits(mut self, limits: RateLimitConfig) -> Self {
		self.rate_limits = limits;

		self
	}

	/// Overrides the default wait policy.
	pub fn with_wait_policy(mut self, policy: WaitPolicy) -> Self {
		self.wait_policy = policy;

		self
	}

	/// Validates fields that cannot be checked at construction time.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.base_url.cannot_be_a_base() {
			return Err(ConfigError::InvalidBaseUrl { url: self.base_url.to_string() });
		}

		self.rate_limits.validate()
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.field("api_key", &self.api_key)
			.field("base_url", &self.base_url.as_str())
			.field("token_url", &self.token_url)
			.field("scope", &self.scope)
			.field("rate_limits", &self.rate_limits)
			.field("wait_policy", &self.wait_policy)
			.finish()
	}
}

/// Quota parameters for the dual rate limiter.
///
/// Defaults match the published trade API limits: 15 requests per second, a burst of 10, and
/// 500 000 requests per day. The daily quota is spread over a 23 hour operating window rather
/// than a full day, leaving an hour of slack against upstream clock skew.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
	/// Short-window refill rate in requests per second.
	pub requests_per_second: f64,
	/// Short-window burst capacity.
	pub burst: u32,
	/// Requests allowed per operating window.
	pub daily_quota: u64,
	/// Period over which the daily quota refills.
	pub operating_window: Duration,
}
impl RateLimitConfig {
	const DEFAULT_OPERATING_WINDOW: Duration = Duration::from_secs(23 * 60 * 60);

	/// Overrides the short-window refill rate.
	pub fn with_requests_per_second(mut self, rate: f64) -> Self {
		self.requests_per_second = rate;

		self
	}

	/// Overrides the short-window burst capacity.
	pub fn with_burst(mut self, burst: u32) -> Self {
		self.burst = burst;

		self
	}

	/// Overrides the daily quota.
	pub fn with_daily_quota(mut self, quota: u64) -> Self {
		self.daily_quota = quota;

		self
	}

	/// Overrides the daily operating window.
	pub fn with_operating_window(mut self, window: Duration) -> Self {
		self.operating_window = window;

		self
	}

	/// Daily bucket refill rate in tokens per second.
	pub fn daily_rate(&self) -> f64 {
		self.daily_quota as f64 / self.operating_window.as_secs_f64()
	}

	/// Checks that every parameter yields a well-formed bucket.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let rate = self.requests_per_second;

		if !rate.is_finite() || rate < 0. {
			return Err(ConfigError::InvalidRateLimit { field: "requests_per_second", value: rate });
		}
		if self.operating_window.is_zero() {
			return Err(ConfigError::EmptyOperatingWindow);
		}

		Ok(())
	}
}
impl Default for RateLimitConfig {
	fn default() -> Self {
		Self {
			requests_per_second: 15.,
			burst: 10,
			daily_quota: 500_000,
			operating_window: Self::DEFAULT_OPERATING_WINDOW,
		}
	}
}

fn default_base_url() -> Url {
	Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!("Default base URL is valid."))
}
