//! Resource serializer.
//!
//! Turns a manifest into the JSON document handed to the cluster client,
//! stamped with the target `apiVersion`.

use serde_yaml::{Mapping, Value};
use sha2::{Digest, Sha256};

use crate::error::SerializeError;

use super::model::Manifest;

/// Schema version stamped on every document.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Key carrying the schema version.
const API_VERSION_KEY: &str = "apiVersion";

/// Encodes `manifest` as JSON with `apiVersion` set to `api_version`.
///
/// `apiVersion` is always the first key; any value already present in the
/// manifest is replaced. The remaining keys keep their manifest order, so the
/// output is byte-identical across calls.
///
/// # Errors
///
/// Returns an error if the manifest holds values JSON cannot represent, such
/// as sequence or mapping keys.
pub fn to_document(manifest: &Manifest, api_version: &str) -> Result<Vec<u8>, SerializeError> {
    let mut stamped = Mapping::with_capacity(manifest.object().len() + 1);
    stamped.insert(
        Value::String(API_VERSION_KEY.to_string()),
        Value::String(api_version.to_string()),
    );
    for (key, value) in manifest.object() {
        if key.as_str() == Some(API_VERSION_KEY) {
            continue;
        }
        stamped.insert(key.clone(), value.clone());
    }

    serde_json::to_vec(&stamped).map_err(|e| SerializeError::Encode {
        resource: manifest.id(),
        message: e.to_string(),
    })
}

/// Hex SHA-256 of a serialized document.
#[must_use]
pub fn document_digest(document: &[u8]) -> String {
    hex::encode(Sha256::digest(document))
}
