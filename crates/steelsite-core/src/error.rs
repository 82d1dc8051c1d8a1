#![forbid(unsafe_code)]

//! Error taxonomy for the behavior layer.
//!
//! None of these are fatal to the page. Missing elements degrade to no-ops,
//! rewrite failures are logged and left in place, and configuration errors
//! fall back to defaults at the host boundary.

/// Errors surfaced by the core and the web host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    /// An element required by the DOM contract was not found.
    MissingElement(&'static str),
    /// Configuration could not be parsed or failed validation.
    Config(String),
    /// A translatable node could not be rewritten.
    Rewrite {
        /// Selector of the node that failed.
        selector: &'static str,
    },
}

impl core::fmt::Display for SiteError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingElement(what) => write!(f, "missing element: {what}"),
            Self::Config(msg) => write!(f, "invalid configuration: {msg}"),
            Self::Rewrite { selector } => write!(f, "rewrite failed for `{selector}`"),
        }
    }
}

impl std::error::Error for SiteError {}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_target() {
        let err = SiteError::Rewrite {
            selector: ".hero p",
        };
        assert_eq!(err.to_string(), "rewrite failed for `.hero p`");
        assert_eq!(
            SiteError::MissingElement("#form-status").to_string(),
            "missing element: #form-status"
        );
    }

    #[test]
    fn json_errors_become_config_errors() {
        let err: SiteError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, SiteError::Config(_)));
    }
}
