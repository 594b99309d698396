//! Response records returned by the MOT History API.
//!
//! Records are passive serde shapes. Vehicle fields the API omits decode to empty values so
//! partial payloads (such as vehicles that have not yet had a test) still decode.

pub mod bulk;
pub mod vehicle;

pub use bulk::*;
pub use vehicle::*;

// self
use crate::{_prelude::*, auth::ApiSecret};

/// Response to a credential renewal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewedCredentials {
	/// Replacement client secret.
	pub client_secret: ApiSecret,
}
