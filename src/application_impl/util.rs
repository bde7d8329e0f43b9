use crate::application_port::CatalogError;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> Result<T, CatalogError> {
    Ok(serde_json::from_value(body)?)
}

/// Percent-encodes an id for use as a single path segment.
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
