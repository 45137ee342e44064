//! View-model over the remote posts collection.
//!
//! `PostCollection` owns the client-visible list plus the loading, error and
//! edit-target flags. Every operation awaits the remote call first and then
//! applies its result to the state in one locked step, so a reader never sees
//! a half-applied change. Overlapping writes to the same post are not
//! coordinated: whichever response lands last wins.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{info, warn};

use crate::application::api::PostsApi;
use crate::application::error::{Action, ActionError, ClientError};
use crate::application::lock::state_lock;
use crate::domain::posts::{Post, PostFields, PostId, sort_newest_first};

pub const DELETE_PROMPT: &str = "Delete this post?";
const LOAD_FALLBACK_MESSAGE: &str = "Failed to load posts";

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Read-only copy of the collection state handed to the rendering layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub posts: Vec<Post>,
    pub loading: bool,
    pub error: Option<String>,
    pub editing: Option<Post>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deleted {
    Removed,
    Cancelled,
}

#[derive(Debug, Default)]
struct CollectionState {
    posts: Vec<Post>,
    loading: bool,
    error: Option<String>,
    editing: Option<Post>,
}

impl CollectionState {
    fn substitute(&mut self, id: &PostId, post: Post) -> bool {
        match self.posts.iter_mut().find(|existing| existing.id == *id) {
            Some(slot) => {
                *slot = post;
                true
            }
            None => false,
        }
    }

    fn find(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == *id)
    }
}

pub struct PostCollection {
    api: Arc<dyn PostsApi>,
    state: Mutex<CollectionState>,
}

impl PostCollection {
    pub fn new(api: Arc<dyn PostsApi>) -> Self {
        Self {
            api,
            state: Mutex::new(CollectionState::default()),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = state_lock(&self.state, "snapshot");
        Snapshot {
            posts: state.posts.clone(),
            loading: state.loading,
            error: state.error.clone(),
            editing: state.editing.clone(),
        }
    }

    /// Reload from the server and sort newest first. On failure the previous
    /// list stays in place and the error surface carries the message.
    pub async fn load(&self) -> Result<usize, ActionError> {
        {
            let mut state = state_lock(&self.state, "load.begin");
            state.loading = true;
            state.error = None;
        }

        let result = self.api.list().await;

        let mut state = state_lock(&self.state, "load.finish");
        state.loading = false;
        match result {
            Ok(mut posts) => {
                sort_newest_first(&mut posts);
                let count = posts.len();
                state.posts = posts;
                info!(count, "collection reloaded");
                Ok(count)
            }
            Err(source) => {
                let message = load_error_message(&source);
                warn!(error = %source, kept = state.posts.len(), "collection reload failed");
                state.error = Some(message);
                Err(ActionError::failed(Action::Load, source))
            }
        }
    }

    /// Create on the server and put the stored post at the front.
    pub async fn create(&self, fields: &PostFields) -> Result<Post, ActionError> {
        let post = self
            .api
            .create(fields)
            .await
            .map_err(|source| action_failed(Action::Create, None, source))?;

        let mut state = state_lock(&self.state, "create");
        state.posts.retain(|existing| existing.id != post.id);
        state.posts.insert(0, post.clone());
        info!(id = %post.id, "post created");
        Ok(post)
    }

    /// Full replace. The stored post takes the old one's slot and the edit
    /// target is cleared.
    pub async fn update(&self, id: &PostId, fields: &PostFields) -> Result<Post, ActionError> {
        let post = self
            .api
            .replace(id, fields)
            .await
            .map_err(|source| action_failed(Action::Update, Some(id), source))?;

        let mut state = state_lock(&self.state, "update");
        let applied = state.substitute(id, post.clone());
        state.editing = None;
        info!(%id, applied, "post replaced");
        Ok(post)
    }

    /// Partial update. Same substitution as [`Self::update`]; the edit target
    /// is left alone.
    pub async fn patch(&self, id: &PostId, fields: &PostFields) -> Result<Post, ActionError> {
        let post = self
            .api
            .partial_update(id, fields)
            .await
            .map_err(|source| action_failed(Action::Patch, Some(id), source))?;

        let mut state = state_lock(&self.state, "patch");
        let applied = state.substitute(id, post.clone());
        info!(%id, applied, "post patched");
        Ok(post)
    }

    /// Flip the liked flag of a post already in the collection.
    pub async fn toggle_like(&self, id: &PostId) -> Result<Post, ActionError> {
        let liked = {
            let state = state_lock(&self.state, "toggle_like");
            state
                .find(id)
                .map(|post| post.liked)
                .ok_or_else(|| ActionError::NotInCollection(id.clone()))?
        };

        let mut fields = PostFields::new();
        fields.insert("liked".to_string(), Value::Bool(!liked));
        self.patch(id, &fields).await
    }

    /// Delete after the user confirms. Nothing is sent when they decline, and
    /// the local copy only goes away once the server agrees.
    pub async fn delete(&self, id: &PostId, confirm: &dyn Confirm) -> Result<Deleted, ActionError> {
        if !confirm.confirm(DELETE_PROMPT) {
            info!(%id, "deletion cancelled");
            return Ok(Deleted::Cancelled);
        }

        self.api
            .remove(id)
            .await
            .map_err(|source| action_failed(Action::Delete, Some(id), source))?;

        let mut state = state_lock(&self.state, "delete");
        state.posts.retain(|post| post.id != *id);
        if state.editing.as_ref().is_some_and(|post| post.id == *id) {
            state.editing = None;
        }
        info!(%id, "post deleted");
        Ok(Deleted::Removed)
    }

    /// Open a post for a full edit.
    pub fn begin_edit(&self, id: &PostId) -> Result<Post, ActionError> {
        let mut state = state_lock(&self.state, "begin_edit");
        let post = state
            .find(id)
            .cloned()
            .ok_or_else(|| ActionError::NotInCollection(id.clone()))?;
        state.editing = Some(post.clone());
        Ok(post)
    }

    pub fn cancel_edit(&self) {
        state_lock(&self.state, "cancel_edit").editing = None;
    }
}

fn load_error_message(source: &ClientError) -> String {
    let message = source.display_message();
    if message.trim().is_empty() {
        LOAD_FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

fn action_failed(action: Action, id: Option<&PostId>, source: ClientError) -> ActionError {
    match id {
        Some(id) => warn!(action = action.as_str(), %id, error = %source, "action failed"),
        None => warn!(action = action.as_str(), error = %source, "action failed"),
    }
    ActionError::failed(action, source)
}
