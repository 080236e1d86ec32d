//! Authentication error taxonomy and its user-facing message table

use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;

/// Fallback shown for unexpected login failures
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
/// Fallback shown for unexpected registration failures
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed";

/// Failure of a remote authentication call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The server answered 401
    AuthenticationRejected,
    /// The server answered 403
    AuthorizationDenied,
    /// The server answered 404
    SubjectNotFound,
    /// Any other non-success status, with the server's message if it sent one
    ServerError {
        status: u16,
        message: Option<String>,
    },
    /// The request went out but no response came back (connect failure, timeout)
    TransportUnavailable(String),
    /// The request could not be built or the response could not be understood
    ClientFault(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::AuthenticationRejected => write!(f, "Authentication rejected (401)"),
            AuthError::AuthorizationDenied => write!(f, "Authorization denied (403)"),
            AuthError::SubjectNotFound => write!(f, "Subject not found (404)"),
            AuthError::ServerError {
                status,
                message: Some(msg),
            } => write!(f, "Server error ({status}): {msg}"),
            AuthError::ServerError {
                status,
                message: None,
            } => write!(f, "Server error ({status})"),
            AuthError::TransportUnavailable(msg) => write!(f, "No response from server: {msg}"),
            AuthError::ClientFault(msg) => write!(f, "Client error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Optional JSON error body sent by the authentication service
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl AuthError {
    /// Classify a non-success HTTP status, using the raw body for the server message
    #[must_use]
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => AuthError::AuthenticationRejected,
            StatusCode::FORBIDDEN => AuthError::AuthorizationDenied,
            StatusCode::NOT_FOUND => AuthError::SubjectNotFound,
            other => AuthError::ServerError {
                status: other.as_u16(),
                message: serde_json::from_str::<ErrorBody>(body)
                    .ok()
                    .and_then(|b| b.message)
                    .filter(|m| !m.is_empty()),
            },
        }
    }

    /// Classify a transport-level `reqwest` failure
    #[must_use]
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_builder() {
            AuthError::ClientFault(err.to_string())
        } else if err.is_timeout() || err.is_connect() || err.is_request() {
            AuthError::TransportUnavailable(err.to_string())
        } else if let Some(status) = err.status() {
            AuthError::from_status(status, "")
        } else {
            AuthError::ClientFault(err.to_string())
        }
    }

    /// Message shown to the user; `fallback` replaces a missing server message
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AuthError::AuthenticationRejected => "Invalid email or password".to_string(),
            AuthError::AuthorizationDenied => "Role permission denied".to_string(),
            AuthError::SubjectNotFound => "User not found".to_string(),
            AuthError::ServerError { message, .. } => {
                message.clone().unwrap_or_else(|| fallback.to_string())
            }
            AuthError::TransportUnavailable(_) => "No server response".to_string(),
            AuthError::ClientFault(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_status_messages() {
        let cases = [
            (401, "Invalid email or password"),
            (403, "Role permission denied"),
            (404, "User not found"),
        ];

        for (code, expected) in cases {
            let status = StatusCode::from_u16(code).unwrap();
            // A server message never overrides the fixed table
            let err = AuthError::from_status(status, r#"{"message":"ignored"}"#);
            assert_eq!(err.user_message(LOGIN_FAILED_MESSAGE), expected);
        }
    }

    #[test]
    fn test_server_message_passthrough() {
        let err = AuthError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"message":"Database unavailable"}"#,
        );
        assert_eq!(
            err,
            AuthError::ServerError {
                status: 500,
                message: Some("Database unavailable".to_string())
            }
        );
        assert_eq!(err.user_message(LOGIN_FAILED_MESSAGE), "Database unavailable");
    }

    #[test]
    fn test_server_error_falls_back_without_message() {
        for body in ["", "<html>oops</html>", "{}", r#"{"message":""}"#] {
            let err = AuthError::from_status(StatusCode::BAD_GATEWAY, body);
            assert_eq!(err.user_message(LOGIN_FAILED_MESSAGE), "Login failed");
            assert_eq!(
                err.user_message(REGISTRATION_FAILED_MESSAGE),
                "Registration failed"
            );
        }
    }

    #[test]
    fn test_transport_and_client_messages() {
        let transport = AuthError::TransportUnavailable("connection refused".to_string());
        assert_eq!(transport.user_message(LOGIN_FAILED_MESSAGE), "No server response");

        let client = AuthError::ClientFault("relative URL without a base".to_string());
        assert_eq!(
            client.user_message(LOGIN_FAILED_MESSAGE),
            "relative URL without a base"
        );
    }

    #[test]
    fn test_display_includes_status() {
        let err = AuthError::ServerError {
            status: 503,
            message: None,
        };
        assert_eq!(err.to_string(), "Server error (503)");
    }
}
