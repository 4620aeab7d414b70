use crate::error::{Result, SerializerError};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Identifier part of a [`Key`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyId {
    Name(String),
    Int(i64),
}

/// Hierarchical primary key as stored in a key attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub kind: String,
    pub id: KeyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Key>>,
}

impl Key {
    pub fn named(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Key {
            kind: kind.into(),
            id: KeyId::Name(name.into()),
            parent: None,
        }
    }

    pub fn numbered(kind: impl Into<String>, id: i64) -> Self {
        Key {
            kind: kind.into(),
            id: KeyId::Int(id),
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: Key) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// A key is complete when it and all its ancestors have a kind and a
    /// non-empty identifier
    pub fn is_complete(&self) -> bool {
        let own = !self.kind.is_empty()
            && match &self.id {
                KeyId::Name(name) => !name.is_empty(),
                KeyId::Int(id) => *id != 0,
            };
        own && self.parent.as_deref().map_or(true, Key::is_complete)
    }
}

/// Converts primary keys between their canonical string form and the key
/// token stored in attributes.
pub trait KeyCodec {
    /// String form to key token (save direction)
    fn encode_key(&self, encoded: &str) -> Result<Key>;

    /// Key token to string form (load direction)
    fn decode_key(&self, key: &Key) -> Result<String>;
}

/// Keys travel as URL-safe, unpadded base64 of their JSON form
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlKeyCodec;

impl KeyCodec for UrlKeyCodec {
    fn encode_key(&self, encoded: &str) -> Result<Key> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| SerializerError::KeyEncode(format!("malformed key `{encoded}`: {e}")))?;
        let key: Key = serde_json::from_slice(&bytes)
            .map_err(|e| SerializerError::KeyEncode(format!("malformed key `{encoded}`: {e}")))?;

        if !key.is_complete() {
            return Err(SerializerError::KeyEncode(format!(
                "incomplete key `{encoded}`"
            )));
        }
        Ok(key)
    }

    fn decode_key(&self, key: &Key) -> Result<String> {
        if !key.is_complete() {
            return Err(SerializerError::KeyDecode(format!(
                "incomplete key of kind `{}`",
                key.kind
            )));
        }
        let json =
            serde_json::to_vec(key).map_err(|e| SerializerError::KeyDecode(e.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_string_round_trip() {
        let codec = UrlKeyCodec;
        let key = Key::numbered("Comment", 42).with_parent(Key::named("Post", "europe-4"));

        let encoded = codec.decode_key(&key).unwrap();
        assert!(!encoded.contains('='));
        assert_eq!(codec.encode_key(&encoded).unwrap(), key);
    }

    #[test]
    fn test_malformed_key_string() {
        let err = UrlKeyCodec.encode_key("not a key!").unwrap_err();
        assert!(matches!(err, SerializerError::KeyEncode(_)));

        let json_but_not_key = URL_SAFE_NO_PAD.encode(b"{\"kind\": 1}");
        let err = UrlKeyCodec.encode_key(&json_but_not_key).unwrap_err();
        assert!(matches!(err, SerializerError::KeyEncode(_)));
    }

    #[test]
    fn test_incomplete_keys_are_rejected() {
        let incomplete = Key::named("Comment", "");
        assert!(!incomplete.is_complete());
        assert!(matches!(
            UrlKeyCodec.decode_key(&incomplete),
            Err(SerializerError::KeyDecode(_))
        ));

        let orphan = Key::numbered("Comment", 1).with_parent(Key::named("", "p"));
        assert!(!orphan.is_complete());

        let encoded = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&incomplete).unwrap());
        assert!(matches!(
            UrlKeyCodec.encode_key(&encoded),
            Err(SerializerError::KeyEncode(_))
        ));
    }
}
