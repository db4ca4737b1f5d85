//! Error types for probe operations.

use std::num::ParseIntError;

/// Errors that can occur while parsing environment signals.
///
/// Capability predicates on [`Probe`](crate::Probe) never return these;
/// they surface only from the explicit parsing and loading functions.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The user agent carries no version token for the browser.
    #[error("no {browser} version token in user agent")]
    VersionTokenMissing {
        /// The browser whose token was looked for.
        browser: &'static str,
    },

    /// A captured version component is not a valid integer.
    #[error("invalid {component} version component: {source}")]
    InvalidVersionComponent {
        /// The component that failed (e.g., "major").
        component: &'static str,
        /// The underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },

    /// The user agent string is empty.
    #[error("user agent is empty")]
    EmptyUserAgent,

    /// A global the operation depends on is absent.
    #[error("missing global: {0}")]
    MissingGlobal(&'static str),

    /// An OS parser failed.
    #[error("OS parse error: {0}")]
    OsParse(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// YAML parsing failed.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// A specialized Result type for probe operations.
pub type Result<T> = std::result::Result<T, Error>;
