use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures of the record store backing users, servers, channels and messages.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io error on {collection}: {source}")]
    Io {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store serialization error on {collection}: {source}")]
    Serde {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors a handler reports back to the connection that caused them.
///
/// Dropped signaling envelopes are deliberately absent: a relay to a
/// missing target is not an error.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("authentication error: {0}")]
    Authentication(String),

    #[error("authorization error: {0}")]
    Authorization(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl HubError {
    /// The message placed in the `error` event sent to the client.
    ///
    /// Persistence details stay in the server log.
    pub fn client_message(&self) -> String {
        match self {
            HubError::Validation(msg)
            | HubError::Authentication(msg)
            | HubError::Authorization(msg)
            | HubError::NotFound(msg) => msg.clone(),
            HubError::Persistence(_) => "server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("port must be non-zero".into());
        assert_eq!(
            err.to_string(),
            "config validation error: port must be non-zero"
        );
    }

    #[test]
    fn store_error_display() {
        let err = StoreError::Io {
            collection: "messages".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert_eq!(err.to_string(), "store io error on messages: read-only");

        let err = StoreError::Unavailable("disk full".into());
        assert_eq!(err.to_string(), "store unavailable: disk full");
    }

    #[test]
    fn hub_error_from_store() {
        let err: HubError = StoreError::Unavailable("gone".into()).into();
        assert!(matches!(err, HubError::Persistence(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn client_message_hides_persistence_details() {
        let err: HubError = StoreError::Unavailable("/var/data is read-only".into()).into();
        assert_eq!(err.client_message(), "server error");

        let err = HubError::Authorization("access denied".into());
        assert_eq!(err.client_message(), "access denied");
    }

    #[test]
    fn hub_error_variants_display() {
        let err = HubError::Validation("message required".into());
        assert_eq!(err.to_string(), "validation error: message required");

        let err = HubError::Authentication("invalid token".into());
        assert_eq!(err.to_string(), "authentication error: invalid token");

        let err = HubError::NotFound("channel not found".into());
        assert_eq!(err.to_string(), "not found: channel not found");
    }
}
