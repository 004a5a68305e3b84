use thiserror::Error;

/// Failure taxonomy shared by both remote data sources.
///
/// Network errors and non-success HTTP statuses collapse into `FetchFailed`;
/// a body that arrives but is missing expected fields is `MalformedResponse`.
/// Neither is retried automatically.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Build a `FetchFailed` from an HTTP status and the raw error body.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        FetchError::FetchFailed(format!("status {}: {}", status, truncate_body(body)))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::FetchFailed(err.to_string())
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX { format!("{}...", &body[..MAX]) } else { body.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_bodies() {
        let long = "x".repeat(300);
        let out = truncate_body(&long);
        assert_eq!(out.len(), 203);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn short_bodies_pass_through() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn status_errors_carry_body_text() {
        let err = FetchError::from_status(reqwest::StatusCode::NOT_FOUND, "city not found");
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("city not found"));
    }
}
