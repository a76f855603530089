pub mod response;

use serde::de::DeserializeOwned;

use crate::Error;

/// Deserialize a spotify response body, reporting the json path of the first mismatch.
///
/// An empty body is treated as `null`.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    let body = if body.is_empty() { b"null".as_slice() } else { body };

    let jd = &mut serde_json::Deserializer::from_slice(body);
    Ok(serde_path_to_error::deserialize(jd)?)
}
