//! Subcommand handlers: load the collection, apply one action through the
//! controller, then render what the collection looks like afterwards.

mod input;

use std::sync::Arc;

use tracing::info;

use crate::application::api::PostsApi;
use crate::application::collection::{Confirm, Deleted, PostCollection};
use crate::application::error::{ActionError, AppError};
use crate::config::Command;
use crate::domain::posts::{Post, PostFields, PostId};
use crate::presentation::prompt::AssumeYes;
use crate::presentation::views::{render_collection, render_post, to_pretty_json};

pub use input::build_fields;

/// How results are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    pub fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

/// Run one subcommand. Whatever should reach stdout is appended to `out`,
/// including the stale view when a failed reload is the error returned.
pub async fn execute(
    api: Arc<dyn PostsApi>,
    command: Command,
    mode: OutputMode,
    confirm: &dyn Confirm,
    out: &mut String,
) -> Result<(), AppError> {
    match command {
        Command::Get { id } => {
            let post = api.get(&id).await?;
            write_post(&post, mode, out)
        }
        other => {
            let collection = PostCollection::new(api);
            if let Err(err) = collection.load().await {
                write_collection(&collection, mode, out)?;
                return Err(err.into());
            }
            apply(&collection, other, mode, confirm, out).await
        }
    }
}

async fn apply(
    collection: &PostCollection,
    command: Command,
    mode: OutputMode,
    confirm: &dyn Confirm,
    out: &mut String,
) -> Result<(), AppError> {
    match command {
        Command::List | Command::Get { .. } => write_collection(collection, mode, out),
        Command::Create(payload) => {
            let fields = build_fields(payload)?;
            let post = collection.create(&fields).await?;
            write_affected(collection, &post, mode, out)
        }
        Command::Update { id, payload } => {
            let fields = build_fields(payload)?;
            let post = update(collection, &id, &fields).await?;
            write_affected(collection, &post, mode, out)
        }
        Command::Patch { id, payload } => {
            let fields = build_fields(payload)?;
            let post = collection.patch(&id, &fields).await?;
            write_affected(collection, &post, mode, out)
        }
        Command::Like { id } => {
            let post = collection.toggle_like(&id).await?;
            write_affected(collection, &post, mode, out)
        }
        Command::Delete { id, yes } => {
            let confirm: &dyn Confirm = if yes { &AssumeYes } else { confirm };
            delete(collection, &id, confirm, mode, out).await
        }
    }
}

/// Full replace through the edit target; a rejected replace closes it again.
async fn update(
    collection: &PostCollection,
    id: &PostId,
    fields: &PostFields,
) -> Result<Post, ActionError> {
    collection.begin_edit(id)?;
    let result = collection.update(id, fields).await;
    if result.is_err() {
        collection.cancel_edit();
    }
    result
}

async fn delete(
    collection: &PostCollection,
    id: &PostId,
    confirm: &dyn Confirm,
    mode: OutputMode,
    out: &mut String,
) -> Result<(), AppError> {
    match collection.delete(id, confirm).await? {
        Deleted::Removed => write_collection(collection, mode, out),
        Deleted::Cancelled => {
            info!(%id, "nothing deleted");
            if mode == OutputMode::Text {
                out.push_str("Deletion cancelled\n");
            }
            Ok(())
        }
    }
}

fn write_collection(
    collection: &PostCollection,
    mode: OutputMode,
    out: &mut String,
) -> Result<(), AppError> {
    let snapshot = collection.snapshot();
    let rendered = match mode {
        OutputMode::Text => render_collection(&snapshot),
        OutputMode::Json => to_pretty_json(&snapshot.posts)?,
    };
    out.push_str(&rendered);
    Ok(())
}

/// Text mode shows the whole reconciled list; JSON mode only the post the
/// server returned.
fn write_affected(
    collection: &PostCollection,
    post: &Post,
    mode: OutputMode,
    out: &mut String,
) -> Result<(), AppError> {
    match mode {
        OutputMode::Text => write_collection(collection, mode, out),
        OutputMode::Json => write_post(post, mode, out),
    }
}

fn write_post(post: &Post, mode: OutputMode, out: &mut String) -> Result<(), AppError> {
    let rendered = match mode {
        OutputMode::Text => render_post(post),
        OutputMode::Json => to_pretty_json(post)?,
    };
    out.push_str(&rendered);
    Ok(())
}
