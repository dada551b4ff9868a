use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::{
    domain::models::{NewUser, Todo, TodoDraft, User},
    infrastructure::{config::DatabaseConfig, db},
    services::errors::ServiceError,
};

mod memory;
mod mongo;

pub use memory::{MemoryTodoRepository, MemoryUserRepository};
pub use mongo::{MongoTodoRepository, MongoUserRepository};

/// Standalone todo documents.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>, ServiceError>;
    async fn get(&self, id: ObjectId) -> Result<Option<Todo>, ServiceError>;
    /// Persists a new todo under a freshly generated id.
    async fn insert(&self, draft: TodoDraft) -> Result<Todo, ServiceError>;
    async fn replace(&self, id: ObjectId, draft: TodoDraft) -> Result<Option<Todo>, ServiceError>;
    async fn remove(&self, id: ObjectId) -> Result<Option<Todo>, ServiceError>;
}

/// User documents and their embedded todo lists.
///
/// The embedded-todo operations return `None` when either the user or the
/// targeted todo does not exist, leaving the document untouched.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, id: ObjectId) -> Result<Option<User>, ServiceError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ServiceError>;
    /// Fails with [`ServiceError::Conflict`] when the username is taken.
    async fn insert(&self, user: NewUser) -> Result<User, ServiceError>;
    async fn push_todo(&self, user_id: ObjectId, draft: TodoDraft)
        -> Result<Option<User>, ServiceError>;
    async fn pull_todo(&self, user_id: ObjectId, todo_id: ObjectId)
        -> Result<Option<User>, ServiceError>;
    async fn set_todo(
        &self,
        user_id: ObjectId,
        todo_id: ObjectId,
        draft: TodoDraft,
    ) -> Result<Option<User>, ServiceError>;
}

#[derive(Clone)]
pub struct Repositories {
    pub todos: Arc<dyn TodoRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            todos: Arc::new(MemoryTodoRepository::default()),
            users: Arc::new(MemoryUserRepository::default()),
        }
    }
}

pub async fn build_repositories(config: &DatabaseConfig) -> anyhow::Result<Repositories> {
    match config.provider.as_str() {
        "mongodb" => {
            let database = db::connect(config).await?;
            db::ensure_indexes(&database).await?;
            Ok(Repositories {
                todos: Arc::new(MongoTodoRepository::new(&database)),
                users: Arc::new(MongoUserRepository::new(&database)),
            })
        }
        "memory" => Ok(Repositories::in_memory()),
        other => anyhow::bail!("unsupported database provider: {other}"),
    }
}
