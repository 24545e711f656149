//! Business rules between the routes and the repositories: validation,
//! ownership checks, DTO mapping and presigned URL resolution.

pub mod albums;
pub mod artists;
pub mod auth;
pub mod playlists;
pub mod songs;
pub mod uploads;

pub use albums::AlbumService;
pub use artists::ArtistService;
pub use auth::AuthService;
pub use playlists::PlaylistService;
pub use songs::SongService;
pub use uploads::UploadService;

use crate::error::ApiError;

/// Trimmed, non-blank, at most `max` characters.
pub(crate) fn required(value: &str, field: &str, max: usize) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::BadRequest(format!("{} is required", field)));
    }
    check_length(value, field, max)?;
    Ok(value.to_string())
}

/// Like [`required`] for fields that may be left out. Blank counts as absent.
pub(crate) fn optional(
    value: Option<String>,
    field: &str,
    max: usize,
) -> Result<Option<String>, ApiError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            check_length(value, field, max)?;
            Ok(Some(value.to_string()))
        }
    }
}

/// For partial updates a blank value is rejected rather than ignored.
pub(crate) fn replacement(
    value: Option<String>,
    field: &str,
    max: usize,
) -> Result<Option<String>, ApiError> {
    value.map(|value| required(&value, field, max)).transpose()
}

fn check_length(value: &str, field: &str, max: usize) -> Result<(), ApiError> {
    if value.chars().count() > max {
        return Err(ApiError::BadRequest(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

pub(crate) fn search_term(term: Option<String>, param: &str) -> Result<String, ApiError> {
    match term.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => Ok(term.to_string()),
        _ => Err(ApiError::BadRequest(format!(
            "Query parameter '{}' is required",
            param
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_bounds() {
        assert_eq!(required("  Nina  ", "name", 10).unwrap(), "Nina");
        assert!(required("   ", "name", 10).is_err());
        assert!(required("abcdefghijk", "name", 10).is_err());
    }

    #[test]
    fn optional_blank_is_absent() {
        assert_eq!(optional(Some(" ".into()), "genre", 5).unwrap(), None);
        assert_eq!(optional(None, "genre", 5).unwrap(), None);
        assert!(optional(Some("toolong".into()), "genre", 5).is_err());
    }

    #[test]
    fn replacement_rejects_blank() {
        assert!(replacement(Some("".into()), "title", 5).is_err());
        assert_eq!(replacement(None, "title", 5).unwrap(), None);
    }

    #[test]
    fn search_term_must_be_present() {
        assert!(search_term(None, "name").is_err());
        assert!(search_term(Some(" ".into()), "name").is_err());
        assert_eq!(search_term(Some(" abba ".into()), "name").unwrap(), "abba");
    }
}
