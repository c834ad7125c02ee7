//! Codec trait and implementations for persisted entries.
//!
//! The session store is a plain string key/value map. A codec decides
//! how a record (usually the cached [`Member`](crate::Member)) becomes
//! the string stored under its key. The session layer only depends on
//! the [`Codec`] trait, so a different format can be swapped in without
//! touching the state machine.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes records to stored strings and decodes them back.
///
/// `Send + Sync + 'static` lets a codec live inside the session manager,
/// which is shared with the background monitor task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into its stored text.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value can't be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes stored text back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the text is malformed or does
    /// not match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &str) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that stores records as JSON (via `serde_json`).
///
/// JSON keeps the session file readable and matches what the browser
/// client historically wrote under the same keys.
///
/// ## Example
///
/// ```rust
/// use taskflow_protocol::{Codec, JsonCodec, Member, MemberId};
///
/// let codec = JsonCodec;
/// let member = Member {
///     id: MemberId::from("1"),
///     email: "a@x.com".into(),
///     password: "p".into(),
///     name: "Ada".into(),
///     avatar_url: String::new(),
///     role: "admin".into(),
/// };
///
/// let stored = codec.encode(&member).unwrap();
/// let decoded: Member = codec.decode(&stored).unwrap();
/// assert_eq!(member, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(data).map_err(ProtocolError::Decode)
    }
}
