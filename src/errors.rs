use thiserror::Error;

/// Structured failures produced while handling a request.
///
/// `Upstream` carries the archive service's response status and body as data
/// instead of a preformatted string, so the invoker decides how to surface
/// them.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    BadRequest {
        code: &'static str,
        message: String,
    },
    #[error("API request failed with status {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("{message}")]
    Internal { message: String },
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
