//! Error types for Manimator

use thiserror::Error;

/// Result type alias using Manimator's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating or executing a scene
#[derive(Error, Debug)]
pub enum Error {
    /// The tool host could not be reached or the session broke
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The model call failed or returned unusable text
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Generated source has no Scene subclass
    #[error("no scene subclass found")]
    NoEntryPoint,

    /// Generated source failed to load as a module
    #[error("{0}")]
    Load(String),

    /// The rendering engine failed during render
    #[error("{0}")]
    Render(String),

    /// A tool call returned something other than the expected text reply
    #[error("Tool error: {0}")]
    Tool(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_errors_render_bare_messages() {
        assert_eq!(Error::NoEntryPoint.to_string(), "no scene subclass found");
        assert_eq!(
            Error::Load("NameError: name 'Circl' is not defined".into()).to_string(),
            "NameError: name 'Circl' is not defined"
        );
    }

    #[test]
    fn test_orchestration_errors_are_prefixed() {
        let err = Error::Generation("empty response".into());
        assert_eq!(err.to_string(), "Generation failed: empty response");
    }

    #[test]
    fn test_json_errors_convert() {
        fn parse(raw: &str) -> Result<serde_json::Value> {
            Ok(serde_json::from_str(raw)?)
        }

        let err = parse("{not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
