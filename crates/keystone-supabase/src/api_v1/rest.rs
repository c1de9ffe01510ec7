//! Header names and values understood by the PostgREST endpoint.

/// Schema used for reads (`GET`, `HEAD`).
pub const ACCEPT_PROFILE: &str = "accept-profile";

/// Schema used for writes (`POST`, `PATCH`, `DELETE`).
pub const CONTENT_PROFILE: &str = "content-profile";

pub const PREFER: &str = "prefer";

/// Ask for the written rows back in the response body.
pub const RETURN_REPRESENTATION: &str = "return=representation";

/// Ask for a single JSON object instead of an array; zero or several rows
/// make the request fail with `PGRST116`.
pub const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// `column=eq.value` filter pair.
pub fn eq_filter(column: &str, value: &str) -> (String, String) {
    (column.to_owned(), format!("eq.{value}"))
}
