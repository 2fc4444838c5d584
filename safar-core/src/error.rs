use serde_json::Value;

const DUMP_LIMIT: usize = 200;

/// Every failure a screen can surface. None of them are fatal: the caller
/// shows `user_message()` and keeps the form editable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Not signed in")]
    MissingAuth,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend unreachable: {0}")]
    Network(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unreadable response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Maps a non-success HTTP answer to an error kind. `body` is the raw
    /// response text; JSON bodies go through [`server_message`].
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<Value>(body) {
            Ok(json) => server_message(&json),
            Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
            Err(_) => truncate(body.trim()),
        };

        match status {
            401 => ApiError::MissingAuth,
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Rejected { status, message },
        }
    }

    pub fn redirect_to_login(&self) -> bool {
        matches!(self, ApiError::MissingAuth)
    }

    /// Text for the transient notification shown to the operator.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::MissingAuth => "Your session has ended. Please log in again.".to_string(),
            ApiError::Forbidden(_) => "You do not have permission to perform this action.".to_string(),
            ApiError::NotFound(_) => "The requested record no longer exists.".to_string(),
            ApiError::Network(_) => {
                "Could not reach the server. The backend may be down, please try again later.".to_string()
            }
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Rejected { message, .. } | ApiError::Server { message, .. } => message.clone(),
            ApiError::Decode(_) => "The server sent an unexpected response.".to_string(),
        }
    }
}

/// Pulls the most useful message out of a backend error body: `detail`,
/// then `message`, then `non_field_errors`, then field errors (nested array
/// rows become `trip_details[1].flight_number`), else a truncated dump.
pub fn server_message(body: &Value) -> String {
    for key in ["detail", "message", "non_field_errors"] {
        if let Some(text) = body.get(key).and_then(message_text) {
            return text;
        }
    }

    let mut field_errors = Vec::new();
    if let Value::Object(map) = body {
        for (field, value) in map {
            collect_field_errors(field, value, &mut field_errors);
        }
    }
    if !field_errors.is_empty() {
        return field_errors.join("; ");
    }

    truncate(&body.to_string())
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

fn collect_field_errors(path: &str, value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(msg) => out.push(format!("{path}: {msg}")),
        Value::Array(items) => {
            let messages: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if !messages.is_empty() {
                out.push(format!("{path}: {}", messages.join(", ")));
            }
            for (index, item) in items.iter().enumerate() {
                if let Value::Object(row) = item {
                    for (field, nested) in row {
                        collect_field_errors(&format!("{path}[{index}].{field}"), nested, out);
                    }
                }
            }
        }
        Value::Object(map) => {
            for (field, nested) in map {
                collect_field_errors(&format!("{path}.{field}"), nested, out);
            }
        }
        _ => {}
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= DUMP_LIMIT {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(DUMP_LIMIT).collect();
    cut.push_str("...");
    cut
}
