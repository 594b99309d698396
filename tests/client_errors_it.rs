// crates.io
use httpmock::prelude::*;
// self
use mot_history::{_preludet::*, classify::ErrorCategory, config::RateLimitConfig};

fn roomy_limits() -> RateLimitConfig {
	RateLimitConfig::default().with_burst(100)
}

#[tokio::test]
async fn classified_statuses_fail_even_with_valid_bodies() {
	let server = MockServer::start_async().await;
	let (client, _clock) = build_test_client(&server.base_url(), roomy_limits());

	for category in ErrorCategory::all() {
		let registration = format!("CODE{}", category.code);
		let mock = server
			.mock_async(|when, then| {
				when.method(GET).path(format!("/registration/{registration}"));
				then.status(category.code)
					.header("content-type", "application/json")
					.body("{\"registration\":\"ML58FOU\"}");
			})
			.await;
		let err = client
			.vehicle_by_registration(&registration)
			.await
			.expect_err("Classified statuses should never decode.");

		match err {
			Error::Api { code, message, .. } => {
				assert_eq!(code, category.code);
				assert_eq!(message, category.message);
			},
			other => panic!("Unexpected error for {}: {other:?}.", category.code),
		}

		mock.assert_async().await;
	}
}

#[tokio::test]
async fn not_found_reports_descriptive_message() {
	let server = MockServer::start_async().await;
	let (client, _clock) = build_test_client(&server.base_url(), roomy_limits());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/registration/UNKNOWN");
			then.status(404).body("{\"errorCode\":\"MOTH-NP-01\"}");
		})
		.await;
	let err = client
		.vehicle_by_registration("UNKNOWN")
		.await
		.expect_err("Missing vehicles should fail.");

	assert_eq!(err.to_string(), "Not Found - The requested data is not found");
	assert_eq!(err.status(), Some(404));

	mock.assert_async().await;
}

#[tokio::test]
async fn throttled_responses_surface_retry_after() {
	let server = MockServer::start_async().await;
	let (client, _clock) = build_test_client(&server.base_url(), roomy_limits());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/bulk-download");
			then.status(429).header("retry-after", "30");
		})
		.await;
	let err = client.bulk_download().await.expect_err("Throttled calls should fail.");

	assert!(matches!(
		err,
		Error::Api { code: 429, retry_after: Some(wait), .. } if wait == Duration::from_secs(30)
	));

	mock.assert_async().await;
}

#[tokio::test]
async fn unclassified_status_with_bad_body_is_decode_error() {
	let server = MockServer::start_async().await;
	let (client, _clock) = build_test_client(&server.base_url(), roomy_limits());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/vin/TEAPOT");
			then.status(418).body("I'm a teapot");
		})
		.await;
	let err = client.vehicle_by_vin("TEAPOT").await.expect_err("A plain-text body cannot decode.");

	match err {
		Error::Decode { status, snippet, .. } => {
			assert_eq!(status, 418);
			assert_eq!(snippet, "I'm a teapot");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	mock.assert_async().await;
}

#[tokio::test]
async fn unclassified_status_with_valid_body_decodes() {
	let server = MockServer::start_async().await;
	let (client, _clock) = build_test_client(&server.base_url(), roomy_limits());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/vin/BNR32305366");
			then.status(418)
				.header("content-type", "application/json")
				.body("{\"vin\":\"BNR32305366\",\"make\":\"NISSAN\"}");
		})
		.await;
	let vehicle = client
		.vehicle_by_vin("BNR32305366")
		.await
		.expect("Unclassified statuses fall through to decoding.");

	assert_eq!(vehicle.vin, "BNR32305366");
	assert_eq!(vehicle.make, "NISSAN");
	assert!(vehicle.registration.is_empty());

	mock.assert_async().await;
}

#[tokio::test]
async fn malformed_success_body_is_decode_error() {
	let server = MockServer::start_async().await;
	let (client, _clock) = build_test_client(&server.base_url(), roomy_limits());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/bulk-download");
			then.status(200).header("content-type", "application/json").body("{\"bulk\":[]}");
		})
		.await;
	let err = client.bulk_download().await.expect_err("A manifest without deltas is invalid.");

	assert!(matches!(err, Error::Decode { status: 200, .. }));

	mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
	let (client, _clock) = build_test_client("http://127.0.0.1:1/", roomy_limits());
	let err = client
		.vehicle_by_registration("ML58FOU")
		.await
		.expect_err("Nothing listens on port 1.");

	assert!(matches!(err, Error::Transport(_)));
	assert_eq!(err.status(), None);
}
