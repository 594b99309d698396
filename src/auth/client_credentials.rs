//! OAuth 2.0 client-credentials token provider with a single-flight token cache.
//!
//! Tokens are reused until shortly before they expire. Concurrent callers that find the cache
//! stale queue behind one async mutex, so only the first of them reaches the token endpoint and
//! the rest read the token it stored.

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError,
	RequestTokenError, Scope, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::{ApiSecret, TokenFuture, TokenProvider},
	config::ClientConfig,
	error::{AuthError, ConfigError, TransportError},
	http::ReqwestHttpClient,
	obs,
};

type TokenClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

#[derive(Clone)]
struct CachedToken {
	access_token: ApiSecret,
	expires_at: OffsetDateTime,
}
impl CachedToken {
	fn is_fresh_at(&self, now: OffsetDateTime, margin: Duration) -> bool {
		now + margin < self.expires_at
	}
}

/// Token provider performing the client-credentials grant against the configured endpoint.
pub struct ClientCredentialsProvider {
	oauth_client: TokenClient,
	http_client: ReqwestHttpClient,
	scope: String,
	cached: AsyncMutex<Option<CachedToken>>,
}
impl ClientCredentialsProvider {
	const REFRESH_MARGIN: Duration = Duration::from_secs(60);

	/// Builds a provider from the credentials and token endpoint in `config`.
	pub fn new(config: &ClientConfig, http_client: ReqwestHttpClient) -> Result<Self, ConfigError> {
		let token_url = TokenUrl::new(config.token_url.clone())
			.map_err(|source| ConfigError::InvalidTokenUrl { source })?;
		let oauth_client = BasicClient::new(ClientId::new(config.client_id.clone()))
			.set_client_secret(ClientSecret::new(config.client_secret.expose().to_owned()))
			.set_token_uri(token_url)
			.set_auth_type(AuthType::RequestBody);

		Ok(Self {
			oauth_client,
			http_client,
			scope: config.scope.clone(),
			cached: AsyncMutex::new(None),
		})
	}

	/// Returns the cached token, exchanging credentials first when it is missing or stale.
	pub async fn token(&self) -> Result<ApiSecret> {
		let mut cached = self.cached.lock().await;
		let now = OffsetDateTime::now_utc();

		if let Some(current) =
			cached.as_ref().filter(|token| token.is_fresh_at(now, Self::REFRESH_MARGIN))
		{
			return Ok(current.access_token.clone());
		}

		let fresh = self.exchange().await.inspect_err(obs::record_token_failure)?;
		let access_token = fresh.access_token.clone();

		*cached = Some(fresh);

		Ok(access_token)
	}

	/// Drops the cached token so the next call performs a fresh exchange.
	pub async fn invalidate(&self) {
		self.cached.lock().await.take();
	}

	async fn exchange(&self) -> Result<CachedToken, AuthError> {
		let handle = self.http_client.token_handle();
		let response = self
			.oauth_client
			.exchange_client_credentials()
			.add_scope(Scope::new(self.scope.clone()))
			.request_async(&handle)
			.await
			.map_err(map_request_error)?;
		let expires_in = response.expires_in().ok_or_else(|| AuthError::Unexpected {
			message: "token response is missing expires_in".into(),
		})?;

		Ok(CachedToken {
			access_token: ApiSecret::new(response.access_token().secret().to_owned()),
			expires_at: OffsetDateTime::now_utc() + expires_in,
		})
	}
}
impl TokenProvider for ClientCredentialsProvider {
	fn bearer_token(&self) -> TokenFuture<'_> {
		Box::pin(self.token())
	}
}
impl Debug for ClientCredentialsProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientCredentialsProvider").field("scope", &self.scope).finish()
	}
}

fn map_request_error(err: BasicRequestTokenError<HttpClientError<ReqwestError>>) -> AuthError {
	match err {
		RequestTokenError::ServerResponse(response) => {
			let reason = match response.error_description() {
				Some(description) => description.clone(),
				None => response.error().as_ref().to_owned(),
			};

			AuthError::Rejected { reason }
		},
		RequestTokenError::Request(error) => map_transport_error(error),
		RequestTokenError::Parse(source, _body) => AuthError::TokenResponseParse { source },
		RequestTokenError::Other(message) => AuthError::Unexpected { message },
	}
}

fn map_transport_error(err: HttpClientError<ReqwestError>) -> AuthError {
	match err {
		HttpClientError::Reqwest(inner) => AuthError::Transport(TransportError::from(*inner)),
		HttpClientError::Io(inner) => AuthError::Transport(TransportError::Io(inner)),
		HttpClientError::Http(inner) => AuthError::Unexpected { message: inner.to_string() },
		HttpClientError::Other(message) => AuthError::Unexpected { message },
		_ => AuthError::Unexpected { message: "unknown HTTP client failure".into() },
	}
}
