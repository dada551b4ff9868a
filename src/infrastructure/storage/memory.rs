use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use parking_lot::RwLock;

use super::{TodoRepository, UserRepository};
use crate::{
    domain::models::{NewUser, Todo, TodoDraft, User},
    services::errors::ServiceError,
};

/// Insertion-ordered todos kept in process memory.
#[derive(Default)]
pub struct MemoryTodoRepository {
    todos: RwLock<Vec<Todo>>,
}

#[async_trait]
impl TodoRepository for MemoryTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>, ServiceError> {
        Ok(self.todos.read().clone())
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Todo>, ServiceError> {
        Ok(self.todos.read().iter().find(|todo| todo.id == id).cloned())
    }

    async fn insert(&self, draft: TodoDraft) -> Result<Todo, ServiceError> {
        let todo = Todo::from_draft(draft);
        self.todos.write().push(todo.clone());
        Ok(todo)
    }

    async fn replace(&self, id: ObjectId, draft: TodoDraft) -> Result<Option<Todo>, ServiceError> {
        let mut todos = self.todos.write();
        Ok(todos.iter_mut().find(|todo| todo.id == id).map(|todo| {
            todo.apply(draft);
            todo.clone()
        }))
    }

    async fn remove(&self, id: ObjectId) -> Result<Option<Todo>, ServiceError> {
        let mut todos = self.todos.write();
        let index = todos.iter().position(|todo| todo.id == id);
        Ok(index.map(|index| todos.remove(index)))
    }
}

/// Users kept in process memory. Embedded todo changes are read-modify-write
/// under the write lock.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepository {
    fn modify<F>(&self, user_id: ObjectId, change: F) -> Option<User>
    where
        F: FnOnce(&mut Vec<Todo>) -> bool,
    {
        let mut users = self.users.write();
        let user = users.iter_mut().find(|user| user.id == user_id)?;
        change(&mut user.todos).then(|| user.clone())
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn get(&self, id: ObjectId) -> Result<Option<User>, ServiceError> {
        Ok(self.users.read().iter().find(|user| user.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ServiceError> {
        Ok(self
            .users
            .read()
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, ServiceError> {
        let mut users = self.users.write();
        if users.iter().any(|existing| existing.username == user.username) {
            return Err(ServiceError::Conflict(format!(
                "username {} is already taken",
                user.username
            )));
        }
        let user = User::from_new(user);
        users.push(user.clone());
        Ok(user)
    }

    async fn push_todo(
        &self,
        user_id: ObjectId,
        draft: TodoDraft,
    ) -> Result<Option<User>, ServiceError> {
        Ok(self.modify(user_id, |todos| {
            todos.push(Todo::from_draft(draft));
            true
        }))
    }

    async fn pull_todo(
        &self,
        user_id: ObjectId,
        todo_id: ObjectId,
    ) -> Result<Option<User>, ServiceError> {
        Ok(self.modify(user_id, |todos| {
            match todos.iter().position(|todo| todo.id == todo_id) {
                Some(index) => {
                    todos.remove(index);
                    true
                }
                None => false,
            }
        }))
    }

    async fn set_todo(
        &self,
        user_id: ObjectId,
        todo_id: ObjectId,
        draft: TodoDraft,
    ) -> Result<Option<User>, ServiceError> {
        Ok(self.modify(user_id, |todos| {
            match todos.iter_mut().find(|todo| todo.id == todo_id) {
                Some(todo) => {
                    todo.apply(draft);
                    true
                }
                None => false,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::password::PasswordHasher;

    async fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: PasswordHasher::new(4).hash("secret").await.unwrap(),
        }
    }

    #[tokio::test]
    async fn todos_keep_insertion_order() {
        let repository = MemoryTodoRepository::default();
        let first = repository.insert(TodoDraft::new("Item 1", "do item 1")).await.unwrap();
        let second = repository.insert(TodoDraft::new("Item 2", "do item 2")).await.unwrap();

        let ids: Vec<_> = repository.list().await.unwrap().into_iter().map(|t| t.id).collect();

        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn remove_returns_removed_todo_once() {
        let repository = MemoryTodoRepository::default();
        let todo = repository.insert(TodoDraft::new("Item 1", "do item 1")).await.unwrap();

        assert_eq!(repository.remove(todo.id).await.unwrap(), Some(todo.clone()));
        assert_eq!(repository.remove(todo.id).await.unwrap(), None);
        assert!(repository.get(todo.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let repository = MemoryUserRepository::default();
        repository.insert(new_user("alice").await).await.unwrap();

        let result = repository.insert(new_user("alice").await).await;

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn embedded_changes_miss_on_unknown_todo() {
        let repository = MemoryUserRepository::default();
        let user = repository.insert(new_user("bob").await).await.unwrap();
        let user = repository
            .push_todo(user.id, TodoDraft::new("Buy milk", "2%"))
            .await
            .unwrap()
            .expect("user exists");

        let unknown = ObjectId::new();
        assert!(repository.pull_todo(user.id, unknown).await.unwrap().is_none());
        assert!(repository
            .set_todo(user.id, unknown, TodoDraft::default())
            .await
            .unwrap()
            .is_none());
        assert_eq!(repository.get(user.id).await.unwrap(), Some(user));
    }
}
