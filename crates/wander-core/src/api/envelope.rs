//! Response envelope shared by every marketplace endpoint.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::util::compact_text;

/// Envelope version this client understands
pub const ENVELOPE_VERSION: u32 = 1;

/// Extra top-level keys such as `total` are ignored; `version` gates compatibility.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: bool,
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default = "Option::default")]
    data: Option<T>,
}

/// Parse `{ status, data, message?, version? }` and return `data`.
///
/// `status: false`, a missing `data` on success, an unsupported `version` and
/// any shape mismatch all map to [`Error::Server`].
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T> {
    parse_checked::<T>(body)?
        .ok_or_else(|| Error::server("successful response did not include data"))
}

/// Parse `{ status, message? }` for endpoints that return no payload.
pub fn parse_ack(body: &str) -> Result<()> {
    parse_checked::<serde_json::Value>(body).map(|_| ())
}

fn parse_checked<T: DeserializeOwned>(body: &str) -> Result<Option<T>> {
    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|error| {
        Error::server(format!("unexpected response shape: {error}"))
    })?;

    if let Some(version) = envelope.version {
        if version != ENVELOPE_VERSION {
            return Err(Error::server(format!(
                "unsupported response version {version} (expected {ENVELOPE_VERSION})"
            )));
        }
    }

    if !envelope.status {
        let message = envelope
            .message
            .map(|message| compact_text(&message))
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| "request was not successful".to_string());
        return Err(Error::Server(message));
    }

    Ok(envelope.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListingId, ListingItem};
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_listing_page() {
        let items: Vec<ListingItem> = parse_envelope(
            r#"{"status":true,"data":[{"_id":"a","name":"Hampi"},{"id":2,"name":"Ooty"}]}"#,
        )
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ListingId::from("a"));
        assert_eq!(items[1].id, ListingId::Number(2));
    }

    #[test]
    fn status_false_is_server_error_with_message() {
        let err = parse_envelope::<Vec<ListingItem>>(
            r#"{"status":false,"message":"Database unavailable"}"#,
        )
        .unwrap_err();
        assert_eq!(err, Error::Server("Database unavailable".to_string()));
    }

    #[test]
    fn nested_data_fallback_is_a_shape_mismatch() {
        let err = parse_envelope::<Vec<ListingItem>>(r#"{"status":true,"data":{"data":[]}}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Server(message) if message.contains("unexpected response shape")));
    }

    #[test]
    fn extra_envelope_fields_are_ignored() {
        let items: Vec<ListingItem> = parse_envelope(
            r#"{"status":true,"data":[{"_id":"a"}],"total":40,"count":1}"#,
        )
        .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn page_with_both_id_keys_parses() {
        let items: Vec<ListingItem> = parse_envelope(
            r#"{"status":true,"data":[{"_id":"64f1","id":"64f1","name":"Fort"},{"_id":"64f2"}]}"#,
        )
        .unwrap();
        assert_eq!(items[0].id, ListingId::from("64f1"));
        assert_eq!(items[1].id, ListingId::from("64f2"));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let err = parse_envelope::<Vec<ListingItem>>(r#"{"status":true,"version":2,"data":[]}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Server(message) if message.contains("version 2")));

        let ok: Vec<ListingItem> =
            parse_envelope(r#"{"status":true,"version":1,"data":[]}"#).unwrap();
        assert!(ok.is_empty());
    }

    #[test]
    fn success_without_data_is_rejected() {
        let err = parse_envelope::<Vec<ListingItem>>(r#"{"status":true}"#).unwrap_err();
        assert!(matches!(err, Error::Server(_)));
    }

    #[test]
    fn non_json_body_is_server_error() {
        let err = parse_envelope::<Vec<ListingItem>>("<html>502</html>").unwrap_err();
        assert!(matches!(err, Error::Server(_)));
    }

    #[test]
    fn ack_accepts_missing_data() {
        assert!(parse_ack(r#"{"status":true,"message":"deleted"}"#).is_ok());
        assert!(parse_ack(r#"{"status":false,"message":"not yours"}"#).is_err());
    }
}
