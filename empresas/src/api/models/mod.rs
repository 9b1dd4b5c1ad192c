//! API request and response data models.
//!
//! These structures define the public JSON contract. Field names on the wire are Portuguese
//! (`nome`, `socios`, `empresa`) while the Rust side uses English names, mapped with serde renames.
//!
//! - [`companies`]: company create/update payloads, summary and detail views
//! - [`partners`]: partner create/update payloads, summary and detail views
//!
//! Request payloads carry `nome` as an `Option` so that an absent field can be told apart from
//! a wrong one: creation requires it, updates treat it as "leave unchanged".

use crate::errors::{Error, Result};
use serde::de::DeserializeOwned;

pub mod companies;
pub mod partners;

/// Maximum number of characters stored for a name
pub const MAX_NAME_LENGTH: usize = 255;

/// Message returned when `nome` is missing or empty
pub const NAME_REQUIRED_MESSAGE: &str = "O campo \"nome\" é obrigatório";

/// Validate a name supplied in a request body.
///
/// Returns the name unchanged when it is present, non-empty and within [`MAX_NAME_LENGTH`].
/// Whitespace counts as content.
pub fn require_name(name: Option<&str>) -> Result<&str> {
    let name = name.filter(|n| !n.is_empty()).ok_or_else(|| Error::BadRequest {
        message: NAME_REQUIRED_MESSAGE.to_string(),
    })?;

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::BadRequest {
            message: format!("O campo \"nome\" deve ter no máximo {MAX_NAME_LENGTH} caracteres"),
        });
    }

    Ok(name)
}

/// Parse an update payload. An empty body or a JSON `null` carries no changes.
pub fn parse_update<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice::<Option<T>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| Error::BadRequest {
            message: format!("Invalid request body: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_name() {
        assert_eq!(require_name(Some("Acme")).unwrap(), "Acme");

        assert_eq!(require_name(Some("   ")).unwrap(), "   ");

        for missing in [None, Some("")] {
            match require_name(missing) {
                Err(Error::BadRequest { message }) => assert_eq!(message, NAME_REQUIRED_MESSAGE),
                other => panic!("expected bad request, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_update_treats_empty_and_null_as_no_changes() {
        for body in [&b""[..], &b"  \n"[..], &b"null"[..], &b"{}"[..]] {
            let update: companies::CompanyUpdate = parse_update(body).unwrap();
            assert!(update.name.is_none());
        }

        let update: companies::CompanyUpdate = parse_update(br#"{"nome": "Acme"}"#).unwrap();
        assert_eq!(update.name.as_deref(), Some("Acme"));

        let err = parse_update::<companies::CompanyUpdate>(b"{not json").unwrap_err();
        assert!(matches!(err, Error::BadRequest { message } if message.starts_with("Invalid request body")));
    }

    #[test]
    fn test_require_name_counts_characters_not_bytes() {
        let accented = "é".repeat(MAX_NAME_LENGTH);
        assert!(require_name(Some(&accented)).is_ok());

        let too_long = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(require_name(Some(&too_long)), Err(Error::BadRequest { .. })));
    }
}
