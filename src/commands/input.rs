use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::application::error::AppError;
use crate::config::PayloadArgs;
use crate::domain::posts::PostFields;

/// Build the request body: the JSON object from `--json-body`/`--json-file`
/// first, then `--title`, `--body` and each `--field` on top.
pub fn build_fields(args: PayloadArgs) -> Result<PostFields, AppError> {
    let PayloadArgs {
        title,
        body,
        fields,
        json_body,
        json_file,
    } = args;

    let mut payload = match (json_body, json_file) {
        (_, Some(path)) => parse_object(&read_file(&path)?)?,
        (Some(raw), None) => parse_object(&raw)?,
        (None, None) => PostFields::new(),
    };

    if let Some(title) = title {
        payload.insert("title".to_string(), Value::String(title));
    }
    if let Some(body) = body {
        payload.insert("body".to_string(), Value::String(body));
    }
    for pair in fields {
        let (key, value) = split_field(&pair)?;
        payload.insert(key.to_string(), field_value(value));
    }

    if payload.is_empty() {
        return Err(AppError::invalid_input(
            "payload is empty; pass --title, --body, --field or --json-body",
        ));
    }
    Ok(payload)
}

fn read_file(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|source| AppError::InputFile {
        path: path.display().to_string(),
        source,
    })
}

fn parse_object(raw: &str) -> Result<PostFields, AppError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::invalid_input("payload must be a JSON object")),
        Err(e) => Err(AppError::invalid_input(format!("payload is not JSON: {e}"))),
    }
}

fn split_field(pair: &str) -> Result<(&str, &str), AppError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(AppError::invalid_input(format!(
            "field `{pair}` must look like KEY=VALUE"
        ))),
    }
}

fn field_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
