//! Status-code classification for MOT History API responses.
//!
//! The upstream API documents a closed set of failure statuses. Any status listed here fails the
//! call with [`Error::Api`](crate::error::Error::Api) before the body is considered; everything
//! else (all 2xx included) falls through to body decoding.

// self
use crate::_prelude::*;

const CATEGORIES: [ErrorCategory; 15] = [
	ErrorCategory::new(400, "Bad Request - The format of the request is incorrect"),
	ErrorCategory::new(401, "Unauthorized - Authentication credentials are missing or invalid"),
	ErrorCategory::new(403, "Forbidden - The request is not allowed"),
	ErrorCategory::new(404, "Not Found - The requested data is not found"),
	ErrorCategory::new(
		405,
		"Method Not Allowed - The HTTP method is not supported for this endpoint",
	),
	ErrorCategory::new(406, "Not Acceptable - The requested media type is not supported"),
	ErrorCategory::new(
		409,
		"Conflict - The request could not be completed due to a conflict with the current state of the target resource",
	),
	ErrorCategory::new(
		412,
		"Precondition Failed - Could not complete request because a constraint was not met",
	),
	ErrorCategory::new(
		415,
		"Unsupported Media Type - The media type of the request is not supported",
	),
	ErrorCategory::new(
		422,
		"Unprocessable Entity - The request was well-formed but contains semantic errors",
	),
	ErrorCategory::new(
		429,
		"Too Many Requests - The user has sent too many requests in a given amount of time",
	),
	ErrorCategory::new(500, "Internal Server Error - An unexpected error has occurred"),
	ErrorCategory::new(
		502,
		"Bad Gateway - The server received an invalid response from an upstream server",
	),
	ErrorCategory::new(
		503,
		"Service Unavailable - The server is currently unable to handle the request",
	),
	ErrorCategory::new(
		504,
		"Gateway Timeout - The upstream server failed to send a request in the time allowed by the server",
	),
];

/// A documented failure status and its descriptive message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ErrorCategory {
	/// HTTP status code.
	pub code: u16,
	/// Human-readable description.
	pub message: &'static str,
}
impl ErrorCategory {
	const fn new(code: u16, message: &'static str) -> Self {
		Self { code, message }
	}

	/// Returns every classified category in ascending status order.
	pub fn all() -> &'static [ErrorCategory] {
		&CATEGORIES
	}
}
impl Display for ErrorCategory {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{} {}", self.code, self.message)
	}
}

/// Looks up the category for `status`, returning `None` for statuses outside the table.
pub fn classify(status: u16) -> Option<ErrorCategory> {
	CATEGORIES
		.binary_search_by_key(&status, |category| category.code)
		.ok()
		.map(|idx| CATEGORIES[idx])
}
