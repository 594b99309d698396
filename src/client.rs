//! Client facade for the MOT History trade API.

pub mod dispatch;

pub use dispatch::*;

// crates.io
use reqwest::header::HeaderValue;
// self
use crate::{
	_prelude::*,
	auth::{ClientCredentialsProvider, TokenProvider},
	config::ClientConfig,
	error::ConfigError,
	http::ReqwestHttpClient,
	model::{BulkManifest, RenewedCredentials, VehicleDetails},
	obs::Endpoint,
	rate_limit::{Clock, DualRateLimiter, SystemClock, WaitPolicy},
};

/// Rate-limited, authenticated client for one credential set.
///
/// The client owns the HTTP transport, the token provider, and a [`DualRateLimiter`] shared by
/// every clone, so clones handed to concurrent tasks draw from the same quota. Each call waits
/// for a permit, attaches the `X-API-Key` header and a bearer token, and returns either the
/// decoded record or a classified [`Error`]. Calls are never retried or cached.
#[derive(Clone)]
pub struct Client {
	http_client: ReqwestHttpClient,
	token_provider: Arc<dyn TokenProvider>,
	rate_limiter: Arc<DualRateLimiter>,
	api_key: HeaderValue,
	base_url: Url,
	wait_policy: WaitPolicy,
}
impl Client {
	/// Creates a client with the default reqwest transport, the OAuth 2.0 client-credentials
	/// token provider, and the system clock.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::new()?;
		let token_provider: Arc<dyn TokenProvider> =
			Arc::new(ClientCredentialsProvider::new(&config, http_client.clone())?);

		Self::with_http_client(config, http_client, token_provider, Arc::new(SystemClock))
	}

	/// Creates a client that reuses the caller-provided transport, token provider, and clock.
	pub fn with_http_client(
		config: ClientConfig,
		http_client: ReqwestHttpClient,
		token_provider: Arc<dyn TokenProvider>,
		clock: Arc<dyn Clock>,
	) -> Result<Self> {
		config.validate()?;

		let mut api_key = HeaderValue::from_str(config.api_key.expose())
			.map_err(|_| ConfigError::InvalidApiKey)?;

		api_key.set_sensitive(true);

		let rate_limiter = Arc::new(DualRateLimiter::new(&config.rate_limits, clock)?);

		Ok(Self {
			http_client,
			token_provider,
			rate_limiter,
			api_key,
			base_url: config.base_url,
			wait_policy: config.wait_policy,
		})
	}

	/// Returns a client sharing this one's limiter and transport but waiting per `policy`.
	pub fn with_wait_policy(mut self, policy: WaitPolicy) -> Self {
		self.wait_policy = policy;

		self
	}

	/// Limiter shared by this client and its clones.
	pub fn rate_limiter(&self) -> &Arc<DualRateLimiter> {
		&self.rate_limiter
	}

	/// API root that endpoint paths are appended to.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Wait policy applied when the limiter has no token available.
	pub fn wait_policy(&self) -> WaitPolicy {
		self.wait_policy
	}

	/// Looks up a vehicle and its MOT history by registration mark.
	pub async fn vehicle_by_registration(&self, registration: &str) -> Result<VehicleDetails> {
		self.dispatch(ApiRequest::get(Endpoint::Registration, ["registration", registration]))
			.await
	}

	/// Looks up a vehicle and its MOT history by VIN.
	pub async fn vehicle_by_vin(&self, vin: &str) -> Result<VehicleDetails> {
		self.dispatch(ApiRequest::get(Endpoint::Vin, ["vin", vin])).await
	}

	/// Fetches the manifest of bulk and delta files available for download.
	pub async fn bulk_download(&self) -> Result<BulkManifest> {
		self.dispatch(ApiRequest::get(Endpoint::BulkDownload, ["bulk-download"])).await
	}

	/// Renews the client secret tied to `api_key_value`; the new secret is returned once.
	pub async fn renew_credentials(
		&self,
		api_key_value: &str,
		email: &str,
	) -> Result<RenewedCredentials> {
		let request = ApiRequest::put(Endpoint::Credentials, ["credentials"])
			.with_form("awsApiKeyValue", api_key_value)
			.with_form("email", email);

		self.dispatch(request).await
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("base_url", &self.base_url.as_str())
			.field("wait_policy", &self.wait_policy)
			.field("rate_limiter", &self.rate_limiter)
			.finish()
	}
}
