//! Bulk-download manifest records.

// self
use crate::_prelude::*;

/// Files available for bulk download: a full snapshot plus incremental deltas.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkManifest {
	/// Full-snapshot files.
	pub bulk: Vec<BulkFile>,
	/// Incremental files published since the snapshot.
	pub delta: Vec<BulkFile>,
}

/// A downloadable bulk file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BulkFile {
	/// File name.
	pub filename: String,
	/// Pre-signed download URL.
	pub download_url: String,
	/// File size in bytes.
	pub file_size: u64,
	/// Creation date.
	pub file_created_on: String,
}
