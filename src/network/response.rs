//! Outcome of a network query

use crate::error::QueryError;
use reqwest::StatusCode;

/// Status description reported for successful queries
pub const STATUS_OK: &str = "OK";

/// Result of a single GET request.
///
/// Exactly one of three shapes:
/// - success: body present, status `"OK"`, no fault
/// - HTTP failure: no body, status name such as `"NotFound"`, no fault
/// - fault: no body, status equal to the fault message, fault present
#[derive(Debug)]
pub struct QueryResponse {
    /// Response body, present only on success
    pub body: Option<String>,
    /// "OK", the status name, or the fault message
    pub status: String,
    /// Captured fault
    pub fault: Option<QueryError>,
    /// HTTP status received, if the server answered
    pub http_status: Option<StatusCode>,
}

impl QueryResponse {
    /// Successful response carrying the body text
    pub fn ok(body: String) -> Self {
        Self {
            body: Some(body),
            status: STATUS_OK.to_string(),
            fault: None,
            http_status: Some(StatusCode::OK),
        }
    }

    /// Response for a non-success HTTP status
    pub fn from_status(status: StatusCode) -> Self {
        Self {
            body: None,
            status: status_description(status),
            fault: None,
            http_status: Some(status),
        }
    }

    /// Response for a captured fault
    pub fn from_fault(fault: QueryError) -> Self {
        Self {
            body: None,
            status: fault.to_string(),
            fault: Some(fault),
            http_status: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.body.is_some()
    }

    pub fn into_parts(self) -> (Option<String>, String, Option<QueryError>) {
        (self.body, self.status, self.fault)
    }

    /// Convert into a `Result`, turning a non-success status into [`QueryError::Status`]
    pub fn into_result(self) -> Result<String, QueryError> {
        match (self.body, self.fault) {
            (Some(body), _) => Ok(body),
            (None, Some(fault)) => Err(fault),
            (None, None) => Err(QueryError::Status(
                self.http_status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            )),
        }
    }
}

impl From<QueryError> for QueryResponse {
    fn from(fault: QueryError) -> Self {
        Self::from_fault(fault)
    }
}

/// PascalCase name of a status code (`404` -> `NotFound`).
///
/// Codes without a canonical reason phrase are rendered as their number.
pub fn status_description(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason
            .split(|c: char| !c.is_ascii_alphanumeric() && c != '\'')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let word: String = word.chars().filter(|c| *c != '\'').collect();
                let mut chars = word.chars();
                let capitalized = match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                };
                capitalized
            })
            .collect(),
        None => status.as_u16().to_string(),
    }
}
