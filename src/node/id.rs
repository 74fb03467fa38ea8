//! Opaque global identifiers
//!
//! A [`GlobalId`] binds a type tag to a type-local key in one reversible
//! opaque string: standard base64 of `"{tag}:{key}"`. Decoding splits on the
//! first separator, so keys may themselves contain `:` while type tags must
//! not (the registry rejects such tags at registration).

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};

use super::NodeError;

/// Separator between the type tag and the local key inside an identifier.
pub(crate) const SEPARATOR: char = ':';

/// An opaque identifier addressing one entity across all registered types.
///
/// Any string can be held as a `GlobalId`; validity is checked at
/// [`decode`](GlobalId::decode) time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalId(String);

impl GlobalId {
    /// Encode a (type tag, local key) pair into an identifier.
    ///
    /// Deterministic and collision-free for any separator-free tag; the key
    /// goes through its `Display` form, so numeric keys encode the same as
    /// their string spelling.
    pub fn encode(type_tag: &str, local_key: impl fmt::Display) -> Self {
        Self(BASE64.encode(format!("{}{}{}", type_tag, SEPARATOR, local_key)))
    }

    /// Decode back into the (type tag, local key) pair.
    pub fn decode(&self) -> Result<(String, String), NodeError> {
        let malformed = |reason: &'static str| NodeError::MalformedId {
            id: self.0.clone(),
            reason,
        };

        let bytes = BASE64.decode(&self.0).map_err(|_| malformed("not base64"))?;
        let raw = String::from_utf8(bytes).map_err(|_| malformed("not utf-8"))?;
        let (tag, key) = raw
            .split_once(SEPARATOR)
            .ok_or_else(|| malformed("missing separator"))?;
        if tag.is_empty() || key.is_empty() {
            return Err(malformed("empty type tag or key"));
        }
        Ok((tag.to_string(), key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for GlobalId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for GlobalId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl AsRef<str> for GlobalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
