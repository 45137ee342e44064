//! Uniform handling of collection responses.

use reqwest::{Response, StatusCode, header::CONTENT_TYPE};
use serde_json::Value;

use crate::application::error::{ApiError, ClientError};
use crate::domain::posts::Post;

const JSON_MEDIA_TYPE: &str = "application/json";

pub async fn read_response(resp: Response) -> Result<Option<Value>, ClientError> {
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = resp.bytes().await?;
    normalize(status, content_type.as_deref(), &bytes)
}

/// Only JSON-declared bodies are parsed; anything else counts as no body.
/// A non-2xx status always becomes [`ApiError`], with an unparsable error
/// body treated as absent.
pub fn normalize(
    status: StatusCode,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<Option<Value>, ClientError> {
    let is_json = content_type.is_some_and(|value| value.contains(JSON_MEDIA_TYPE));

    if !status.is_success() {
        let data = if is_json && !body.is_empty() {
            serde_json::from_slice(body).ok()
        } else {
            None
        };
        return Err(ApiError::from_response(status, data).into());
    }

    if !is_json || body.is_empty() {
        return Ok(None);
    }

    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ClientError::invalid_response(format!("failed to parse body: {e}")))
}

pub fn decode_post(data: Option<Value>) -> Result<Post, ClientError> {
    let value = data.ok_or_else(|| ClientError::invalid_response("expected a post, got no body"))?;
    parse_post(value)
}

pub fn decode_posts(data: Option<Value>) -> Result<Vec<Post>, ClientError> {
    match data {
        Some(Value::Array(items)) => items.into_iter().map(parse_post).collect(),
        Some(other) => Err(ClientError::invalid_response(format!(
            "expected an array of posts, got {}",
            kind(&other)
        ))),
        None => Err(ClientError::invalid_response(
            "expected an array of posts, got no body",
        )),
    }
}

fn parse_post(value: Value) -> Result<Post, ClientError> {
    let post: Post = serde_json::from_value(value)
        .map_err(|e| ClientError::invalid_response(format!("malformed post: {e}")))?;
    if post.id.is_blank() {
        return Err(ClientError::invalid_response("post is missing an id"));
    }
    Ok(post)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
