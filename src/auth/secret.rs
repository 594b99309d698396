//! Redacting wrapper for credentials and bearer tokens.

// self
use crate::_prelude::*;

/// Secret string (API key, client secret, bearer token) that never appears in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiSecret(String);
impl ApiSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for ApiSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for ApiSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ApiSecret").field(&"<redacted>").finish()
	}
}
impl Display for ApiSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = ApiSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "ApiSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.expose(), "super-secret");
	}

	#[test]
	fn secret_serializes_as_plain_string() {
		let secret: ApiSecret =
			serde_json::from_str("\"renewed\"").expect("Secret should deserialize from a string.");

		assert_eq!(secret.expose(), "renewed");
	}
}
