//! Error types for the `safe_html` crate.
//!
//! Sanitizing itself never fails; only building a sanitizer can.

/// All errors that can occur while configuring a sanitizer.
#[derive(Debug, thiserror::Error)]
pub enum SafeHtmlError {
    /// A whitelisted tag name is empty or contains characters other than
    /// ASCII lowercase letters and digits.
    #[error("Invalid tag name: {0:?}")]
    InvalidTagName(String),

    /// The builder configuration is invalid.
    #[error("Config error: {0}")]
    Config(String),
}

/// A type alias for `Result<T, SafeHtmlError>`.
pub type Result<T> = std::result::Result<T, SafeHtmlError>;
