//! Port describing the remote posts collection.

use async_trait::async_trait;

use crate::application::error::ClientError;
use crate::domain::posts::{Post, PostFields, PostId};

#[async_trait]
pub trait PostsApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Post>, ClientError>;

    async fn get(&self, id: &PostId) -> Result<Post, ClientError>;

    async fn create(&self, fields: &PostFields) -> Result<Post, ClientError>;

    /// Full replace (`PUT`).
    async fn replace(&self, id: &PostId, fields: &PostFields) -> Result<Post, ClientError>;

    /// Partial update (`PATCH`); only the given fields change server-side.
    async fn partial_update(&self, id: &PostId, fields: &PostFields)
    -> Result<Post, ClientError>;

    async fn remove(&self, id: &PostId) -> Result<(), ClientError>;
}
