use std::sync::Arc;

use crate::{
    domain::models::{Todo, TodoDraft},
    infrastructure::storage::TodoRepository,
    validation::rules::parse_object_id,
};

use super::errors::ServiceError;

#[derive(Clone)]
pub struct TodoService {
    todos: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(todos: Arc<dyn TodoRepository>) -> Self {
        Self { todos }
    }

    pub async fn get_all(&self) -> Result<Vec<Todo>, ServiceError> {
        self.todos.list().await.map_err(|err| err.logged("get_all_todos"))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Todo, ServiceError> {
        let id = parse_object_id(id)?;
        self.todos
            .get(id)
            .await
            .map_err(|err| err.logged("get_todo_by_id"))?
            .ok_or(ServiceError::NotFound("todo"))
    }

    pub async fn create(&self, draft: TodoDraft) -> Result<Todo, ServiceError> {
        self.todos
            .insert(draft)
            .await
            .map_err(|err| err.logged("create_todo"))
    }

    /// Replaces title and description; fields absent from `draft` are cleared.
    pub async fn update(&self, id: &str, draft: TodoDraft) -> Result<Todo, ServiceError> {
        let id = parse_object_id(id)?;
        self.todos
            .replace(id, draft)
            .await
            .map_err(|err| err.logged("update_todo"))?
            .ok_or(ServiceError::NotFound("todo"))
    }

    /// Removes the todo and hands back what was deleted.
    pub async fn delete(&self, id: &str) -> Result<Todo, ServiceError> {
        let id = parse_object_id(id)?;
        self.todos
            .remove(id)
            .await
            .map_err(|err| err.logged("delete_todo"))?
            .ok_or(ServiceError::NotFound("todo"))
    }
}
