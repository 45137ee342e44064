use serde::Serialize;

use crate::application::collection::Snapshot;
use crate::application::error::AppError;
use crate::domain::posts::Post;

const UNTITLED: &str = "(untitled)";
const BODY_PREVIEW_CHARS: usize = 72;

/// Text view of the whole collection, including the inline error and the
/// edit target.
pub fn render_collection(snapshot: &Snapshot) -> String {
    let mut lines = vec![format!("Posts ({})", snapshot.posts.len())];
    if snapshot.loading {
        lines.push("Loading...".to_string());
    }
    if let Some(error) = &snapshot.error {
        lines.push(format!("Error: {error}"));
    }
    if let Some(editing) = &snapshot.editing {
        lines.push(format!(
            "Editing: #{} {}",
            editing.id,
            editing.title().unwrap_or(UNTITLED)
        ));
    }
    if snapshot.posts.is_empty() {
        lines.push("(no posts)".to_string());
    }
    for post in &snapshot.posts {
        lines.push(String::new());
        lines.extend(post_lines(post));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn render_post(post: &Post) -> String {
    let mut out = post_lines(post).join("\n");
    out.push('\n');
    out
}

fn post_lines(post: &Post) -> Vec<String> {
    let mut heading = format!("#{}  {}", post.id, post.title().unwrap_or(UNTITLED));
    if post.liked {
        heading.push_str(" [liked]");
    }
    let mut lines = vec![heading];

    let stamps: Vec<String> = [
        ("created", post.created_at.as_deref()),
        ("modified", post.modified_at.as_deref()),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|value| format!("{label} {value}")))
    .collect();
    if !stamps.is_empty() {
        lines.push(format!("    {}", stamps.join(", ")));
    }

    if let Some(body) = post.body().and_then(|body| body.lines().next()) {
        lines.push(format!("    {}", preview(body)));
    }
    lines
}

fn preview(text: &str) -> String {
    if text.chars().count() <= BODY_PREVIEW_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(BODY_PREVIEW_CHARS).collect();
    format!("{cut}...")
}

pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    let mut out = serde_json::to_string_pretty(value).map_err(|e| AppError::output(e.to_string()))?;
    out.push('\n');
    Ok(out)
}
