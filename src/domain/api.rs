use async_trait::async_trait;

use super::error::ApiError;
use super::todo::{TodoId, TodoItem, TodoPayload};

/// The remote `/todos` collection.
#[async_trait]
pub trait TodoApi: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<TodoItem>, ApiError>;
    async fn create(&self, input: TodoPayload) -> Result<TodoItem, ApiError>;
    async fn update(&self, id: TodoId, input: TodoPayload) -> Result<TodoItem, ApiError>;
    async fn delete(&self, id: TodoId) -> Result<(), ApiError>;
}
