//! Cloud identity extraction from file names
//!
//! Upstream names every tracking file `<prefix>-<token>-<suffix>`, where the
//! token is the starting timestamp and track id of the cloud. The token,
//! with decimal points stripped, is the cloud id that ties every measurement
//! row back to its source file. There is no safe default when the name does
//! not match, so extraction failure is fatal for the file.

use cloudtrack_common::{CloudtrackError, Result};

/// Mapping from a source file to its derived cloud identifier
///
/// Derived once per file and immutable afterwards; every row produced from
/// the file carries the same `cloud_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudIdentity {
    pub file_name: String,
    pub cloud_id: i64,
}

/// Derive the [`CloudIdentity`] for a file name
///
/// Extracts the text between the first and second hyphen, strips decimal
/// points, and parses the rest as an integer. Deterministic: the same name
/// always yields the same id, in both bulk and incremental mode.
pub fn extract(file_name: &str) -> Result<CloudIdentity> {
    let after_prefix = file_name
        .split_once('-')
        .map(|(_, rest)| rest)
        .ok_or_else(|| no_match(file_name))?;

    let (token, _suffix) = after_prefix.split_once('-').ok_or_else(|| no_match(file_name))?;

    let digits = token.replace('.', "");
    let cloud_id = digits.parse::<i64>().map_err(|_| CloudtrackError::IdentityExtraction {
        file_name: file_name.to_string(),
        reason: format!("token '{}' is not numeric", token),
    })?;

    Ok(CloudIdentity {
        file_name: file_name.to_string(),
        cloud_id,
    })
}

fn no_match(file_name: &str) -> CloudtrackError {
    CloudtrackError::IdentityExtraction {
        file_name: file_name.to_string(),
        reason: "expected '<prefix>-<token>-<suffix>'".to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_token() {
        let identity = extract("track-202106151342-007.txt").unwrap();
        assert_eq!(identity.cloud_id, 202106151342);
        assert_eq!(identity.file_name, "track-202106151342-007.txt");
    }

    #[test]
    fn test_extract_strips_decimal_points() {
        let identity = extract("track-20210615.1342-007.txt").unwrap();
        assert_eq!(identity.cloud_id, 202106151342);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let a = extract("track-42-x.txt").unwrap();
        let b = extract("track-42-x.txt").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_hyphen_fails() {
        assert!(extract("track-20210615.txt").is_err());
    }

    #[test]
    fn test_no_hyphen_fails() {
        assert!(extract("track20210615.txt").is_err());
    }

    #[test]
    fn test_non_numeric_token_fails() {
        let err = extract("track-abc-007.txt").unwrap_err();
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_empty_token_fails() {
        assert!(extract("track--007.txt").is_err());
    }
}
