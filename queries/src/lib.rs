//! SQL for the catalog tables. Every function takes the pool and maps rows
//! straight into the `entities` structs; error classification is left to the
//! caller.

mod albums;
mod artists;
mod playlists;
mod songs;
mod users;

pub use albums::*;
pub use artists::*;
pub use playlists::*;
pub use songs::*;
pub use users::*;

/// Builds an `ILIKE` pattern matching `term` anywhere, with the LIKE
/// metacharacters of `term` escaped.
pub fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
