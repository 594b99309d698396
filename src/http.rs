//! Transport primitives shared by the request dispatcher and the token provider.
//!
//! [`ReqwestHttpClient`] is the single HTTP stack the crate talks through. API calls use it
//! directly; OAuth token exchanges go through [`TokenHandle`], which adapts the same client to
//! the `oauth2` crate's [`AsyncHttpClient`] contract so both paths share connection pools and
//! TLS configuration.

// std
use std::ops::Deref;
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::ConfigError};

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Builds the default transport used by [`Client::new`](crate::client::Client::new).
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
			.build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Returns an [`AsyncHttpClient`] handle for OAuth token exchanges.
	pub fn token_handle(&self) -> TokenHandle {
		TokenHandle(self.0.clone())
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Adapter that lets the `oauth2` crate execute token requests over [`ReqwestHttpClient`].
#[derive(Clone, Debug)]
pub struct TokenHandle(ReqwestClient);
impl<'c> AsyncHttpClient<'c> for TokenHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Parses a `Retry-After` header given either as delta-seconds or as an HTTP date.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::from_secs(secs));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Duration::try_from(delta).ok();
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// crates.io
	use reqwest::header::HeaderValue;
	// self
	use super::*;

	fn headers(value: &'static str) -> HeaderMap {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static(value));

		headers
	}

	#[test]
	fn retry_after_accepts_delta_seconds() {
		assert_eq!(parse_retry_after(&headers("30")), Some(Duration::from_secs(30)));
		assert_eq!(parse_retry_after(&headers(" 5 ")), Some(Duration::from_secs(5)));
	}

	#[test]
	fn retry_after_ignores_past_dates_and_garbage() {
		assert_eq!(parse_retry_after(&headers("Wed, 21 Oct 2015 07:28:00 GMT")), None);
		assert_eq!(parse_retry_after(&headers("soon")), None);
		assert_eq!(parse_retry_after(&HeaderMap::new()), None);
	}
}
