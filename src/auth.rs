//! Bearer-token sources and credential wrappers.
//!
//! The dispatcher asks a [`TokenProvider`] for a bearer token before every call and attaches
//! it as `Authorization: Bearer …`. The OAuth 2.0 protocol itself is delegated to the `oauth2`
//! crate inside [`ClientCredentialsProvider`].

pub mod client_credentials;
pub mod secret;

pub use client_credentials::*;
pub use secret::*;

// self
use crate::_prelude::*;

/// Boxed future returned by [`TokenProvider::bearer_token`].
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<ApiSecret>> + 'a + Send>>;

/// Supplies bearer tokens for outbound API calls.
pub trait TokenProvider
where
	Self: Send + Sync,
{
	/// Returns a token that is valid for at least the next request.
	fn bearer_token(&self) -> TokenFuture<'_>;
}

/// Provider that hands out a fixed token, for tests and pre-authenticated deployments.
#[derive(Clone, Debug)]
pub struct StaticTokenProvider(ApiSecret);
impl StaticTokenProvider {
	/// Wraps the provided token.
	pub fn new(token: impl Into<String>) -> Self {
		Self(ApiSecret::new(token))
	}
}
impl TokenProvider for StaticTokenProvider {
	fn bearer_token(&self) -> TokenFuture<'_> {
		let token = self.0.clone();

		Box::pin(async move { Ok(token) })
	}
}
