//! Serde adapter for optional binary fields.
//!
//! Blobs travel as base64 strings in request and response bodies. Use it with
//! `#[serde(default, with = "resource_framework::blob")]` on an `Option<Vec<u8>>`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
    let encoded: Option<String> = Option::deserialize(deserializer)?;
    encoded
        .map(|text| STANDARD.decode(text).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Holder {
        #[serde(default, with = "crate::blob")]
        image: Option<Vec<u8>>,
    }

    #[test]
    fn test_blob_is_base64_in_json() {
        let holder = Holder {
            image: Some(b"hi".to_vec()),
        };
        let json = serde_json::to_value(&holder).unwrap();
        assert_eq!(json["image"], "aGk=");

        let back: Holder = serde_json::from_value(json).unwrap();
        assert_eq!(back.image.as_deref(), Some(&b"hi"[..]));
    }

    #[test]
    fn test_missing_and_null_blob_deserialize_to_none() {
        let missing: Holder = serde_json::from_str("{}").unwrap();
        let null: Holder = serde_json::from_str(r#"{"image": null}"#).unwrap();
        assert!(missing.image.is_none());
        assert!(null.image.is_none());
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let result: Result<Holder, _> = serde_json::from_str(r#"{"image": "%%%"}"#);
        assert!(result.is_err());
    }
}
