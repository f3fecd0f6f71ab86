//! Request DTOs for the lookup API
//!
//! Defines the structure of the incoming query string.

/// Query parameters for `GET /api`
///
/// # Fields
/// - `url`: The MEGA share link to look up
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiQuery {
    /// The share link, absent when the client omitted `?url=`
    pub url: Option<String>,
}

impl ApiQuery {
    /// Builds the query from decoded `key=value` pairs.
    ///
    /// Repeated `url` parameters are not an error: the first one wins and
    /// the rest are ignored, like `url.Values.Get` in Go.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let url = pairs
            .into_iter()
            .find(|(key, _)| key == "url")
            .map(|(_, value)| value);
        Self { url }
    }

    /// Returns the share link, or an empty string when none was given.
    pub fn link(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }
}
