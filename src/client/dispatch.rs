//! The single request path shared by every endpoint.
//!
//! [`Client::dispatch`] acquires a limiter permit, attaches credentials, sends the request,
//! classifies the status, and only then decodes the body into the caller's expected shape.

// crates.io
use reqwest::Method;
// self
use crate::{
	_prelude::*,
	classify::classify,
	client::Client,
	error::{ConfigError, TransportError},
	http,
	obs::{self, CallOutcome, CallSpan, Endpoint},
};

/// Header carrying the static API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

const SNIPPET_LIMIT: usize = 256;

/// Endpoint-specific parameters for one [`Client::dispatch`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
	/// Endpoint label used for spans and metrics.
	pub endpoint: Endpoint,
	/// HTTP method.
	pub method: Method,
	/// Raw path segments appended to the base URL; each is percent-encoded on its own.
	pub segments: Vec<String>,
	/// Query string parameters.
	pub query: Vec<(String, String)>,
	/// Form fields sent as an `application/x-www-form-urlencoded` body.
	pub form: Option<Vec<(String, String)>>,
}
impl ApiRequest {
	/// Creates a request with the given method and path segments.
	pub fn new<I>(endpoint: Endpoint, method: Method, segments: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		Self {
			endpoint,
			method,
			segments: segments.into_iter().map(Into::into).collect(),
			query: Vec::new(),
			form: None,
		}
	}

	/// Creates a `GET` request.
	pub fn get<I>(endpoint: Endpoint, segments: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		Self::new(endpoint, Method::GET, segments)
	}

	/// Creates a `PUT` request.
	pub fn put<I>(endpoint: Endpoint, segments: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		Self::new(endpoint, Method::PUT, segments)
	}

	/// Appends a query string parameter.
	pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));

		self
	}

	/// Appends a form field, switching the body to `application/x-www-form-urlencoded`.
	pub fn with_form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.form.get_or_insert_with(Vec::new).push((key.into(), value.into()));

		self
	}

	/// Resolves the request URL against `base`.
	pub fn url(&self, base: &Url) -> Result<Url, ConfigError> {
		let mut url = base.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::InvalidBaseUrl { url: base.to_string() })?
			.pop_if_empty()
			.extend(&self.segments);

		Ok(url)
	}
}

impl Client {
	/// Issues `request` and decodes a successful body into `T`.
	///
	/// Statuses listed in the classifier table fail with [`Error::Api`] regardless of the body;
	/// any other status is decoded, so an unlisted error status with an unexpected body surfaces
	/// as [`Error::Decode`].
	pub async fn dispatch<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let endpoint = request.endpoint;
		let span = CallSpan::new(endpoint, request.method.as_str());

		obs::record_call_outcome(endpoint, CallOutcome::Attempt);

		let result = span.instrument(self.execute(request)).await;

		match &result {
			Ok(_) => obs::record_call_outcome(endpoint, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(endpoint, CallOutcome::Failure),
		}

		result
	}

	async fn execute<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let url = request.url(&self.base_url)?;

		self.rate_limiter.acquire(self.wait_policy).await?;

		let token = self.token_provider.bearer_token().await?;
		let mut builder = self
			.http_client
			.request(request.method, url)
			.header(API_KEY_HEADER, self.api_key.clone())
			.bearer_auth(token.expose());

		if !request.query.is_empty() {
			builder = builder.query(&request.query);
		}
		if let Some(form) = &request.form {
			builder = builder.form(form);
		}

		let response = builder.send().await.map_err(TransportError::from)?;
		let status = response.status().as_u16();
		let retry_after = http::parse_retry_after(response.headers());
		let body = response.bytes().await.map_err(TransportError::from)?;

		if let Some(category) = classify(status) {
			return Err(Error::Api { code: category.code, message: category.message, retry_after });
		}

		decode(status, &body)
	}
}

fn decode<T>(status: u16, body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| Error::Decode {
		status,
		snippet: snippet(body),
		source,
	})
}

fn snippet(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);

	if text.chars().count() <= SNIPPET_LIMIT {
		return text.into_owned();
	}

	let mut buf = text.chars().take(SNIPPET_LIMIT).collect::<String>();

	buf.push('…');

	buf
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{config::DEFAULT_BASE_URL, model::VehicleDetails};

	fn production() -> Url {
		Url::parse(DEFAULT_BASE_URL).expect("Default base URL should parse.")
	}

	#[test]
	fn segments_are_escaped_individually() {
		let request = ApiRequest::get(Endpoint::Registration, ["registration", "AB 12/C%"]);
		let url = request.url(&production()).expect("Production base URL accepts segments.");

		assert_eq!(
			url.as_str(),
			"https://history.mot.api.gov.uk/v1/trade/vehicles/registration/AB%2012%2FC%25"
		);
	}

	#[test]
	fn trailing_slash_on_base_is_not_doubled() {
		let base = Url::parse("http://127.0.0.1:8080/").expect("Mock base URL should parse.");
		let url = ApiRequest::get(Endpoint::BulkDownload, ["bulk-download"])
			.url(&base)
			.expect("Mock base URL accepts segments.");

		assert_eq!(url.as_str(), "http://127.0.0.1:8080/bulk-download");
	}

	#[test]
	fn form_fields_keep_insertion_order() {
		let request = ApiRequest::put(Endpoint::Credentials, ["credentials"])
			.with_form("awsApiKeyValue", "key")
			.with_form("email", "ops@example.com");

		assert_eq!(request.method, Method::PUT);
		assert_eq!(
			request.form,
			Some(vec![
				("awsApiKeyValue".into(), "key".into()),
				("email".into(), "ops@example.com".into()),
			])
		);
	}

	#[test]
	fn decode_failures_carry_path_and_snippet() {
		let err = decode::<VehicleDetails>(200, br#"{"motTests":[{"defects":"none"}]}"#)
			.expect_err("A string is not a defect list.");

		match err {
			Error::Decode { status, snippet, source } => {
				assert_eq!(status, 200);
				assert_eq!(snippet, r#"{"motTests":[{"defects":"none"}]}"#);
				assert_eq!(source.path().to_string(), "motTests[0].defects");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn long_bodies_are_truncated() {
		let body = "x".repeat(SNIPPET_LIMIT + 10);
		let preview = snippet(body.as_bytes());

		assert_eq!(preview.chars().count(), SNIPPET_LIMIT + 1);
		assert!(preview.ends_with('…'));
	}
}
