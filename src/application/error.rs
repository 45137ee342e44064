use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::{config::LoadError, domain::posts::PostId, infra::error::InfraError};

const FALLBACK_API_MESSAGE: &str = "API error";

/// A non-2xx answer from the collection endpoint.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    /// Parsed JSON body, when the server sent one.
    pub data: Option<Value>,
}

impl ApiError {
    /// Build from a failed response. The message prefers the body's
    /// `message`, then its `error`, then the status reason phrase.
    pub fn from_response(status: StatusCode, data: Option<Value>) -> Self {
        let message = data
            .as_ref()
            .and_then(|body| body_message(body, "message").or_else(|| body_message(body, "error")))
            .or_else(|| status.canonical_reason().map(str::to_owned))
            .unwrap_or_else(|| FALLBACK_API_MESSAGE.to_owned());

        Self {
            status: status.as_u16(),
            message,
            data,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND.as_u16()
    }
}

fn body_message(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("base URL `{0}` cannot carry an item path")]
    InvalidBaseUrl(String),
}

impl ClientError {
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Text suitable for an alert: the server's own message for API errors.
    pub fn display_message(&self) -> String {
        match self {
            ClientError::Api(api) => api.message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api(api) => Some(api.status),
            ClientError::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

/// User-initiated operations on the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Create,
    Update,
    Patch,
    Delete,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Load => "load",
            Action::Create => "create",
            Action::Update => "update",
            Action::Patch => "patch",
            Action::Delete => "delete",
        }
    }

    fn failure_prefix(self) -> &'static str {
        match self {
            Action::Load => "Failed to load posts",
            Action::Create => "Create failed",
            Action::Update => "Update failed",
            Action::Patch => "Patch failed",
            Action::Delete => "Failed to delete",
        }
    }
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{}: {}", .action.failure_prefix(), .source.display_message())]
    Failed {
        action: Action,
        #[source]
        source: ClientError,
    },
    #[error("post {0} is not in the collection")]
    NotInCollection(PostId),
}

impl ActionError {
    pub fn failed(action: Action, source: ClientError) -> Self {
        Self::Failed { action, source }
    }

    pub fn action(&self) -> Option<Action> {
        match self {
            ActionError::Failed { action, .. } => Some(*action),
            ActionError::NotInCollection(_) => None,
        }
    }

    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            ActionError::Failed { source, .. } => Some(source),
            ActionError::NotInCollection(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to render output: {0}")]
    Output(String),
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::Output(message.into())
    }
}
