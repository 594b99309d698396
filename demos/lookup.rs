//! Demonstrates a registration lookup against a local mock of the MOT History API, including
//! the client-credentials token exchange and the shared rate limiter.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use mot_history::{
	auth::{ClientCredentialsProvider, TokenProvider},
	client::Client,
	config::{ClientConfig, RateLimitConfig},
	http::ReqwestHttpClient,
	rate_limit::SystemClock,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":3600}",
			);
		})
		.await;
	let lookup_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/trade/vehicles/registration/ML58FOU");
			then.status(200).header("content-type", "application/json").body(
				"{\"registration\":\"ML58FOU\",\"make\":\"NISSAN\",\"model\":\"SKYLINE\",\"motTests\":[]}",
			);
		})
		.await;
	let config = ClientConfig::new("demo-client", "demo-secret", "demo-api-key")
		.with_base_url(Url::parse(&server.url("/v1/trade/vehicles"))?)
		.with_token_url(server.url("/token"))
		.with_rate_limits(RateLimitConfig::default().with_burst(2));
	let http_client = ReqwestHttpClient::new()?;
	let token_provider: Arc<dyn TokenProvider> =
		Arc::new(ClientCredentialsProvider::new(&config, http_client.clone())?);
	let client =
		Client::with_http_client(config, http_client, token_provider, Arc::new(SystemClock))?;
	let vehicle = client.vehicle_by_registration("ML58FOU").await?;

	println!(
		"{} {} {} has {} recorded MOT tests.",
		vehicle.registration,
		vehicle.make,
		vehicle.model,
		vehicle.mot_tests.len()
	);
	println!("Short-window tokens left: {:.0}.", client.rate_limiter().short_window_tokens());

	token_mock.assert_async().await;
	lookup_mock.assert_async().await;

	Ok(())
}
