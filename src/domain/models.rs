use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::infrastructure::password::PasswordHash;

/// A todo item, stored either in its own collection or embedded in a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Todo {
    pub fn from_draft(draft: TodoDraft) -> Self {
        Self {
            id: ObjectId::new(),
            title: draft.title,
            description: draft.description,
        }
    }

    /// Replaces the mutable fields. Fields missing from the draft are cleared.
    pub fn apply(&mut self, draft: TodoDraft) {
        self.title = draft.title;
        self.description = draft.description;
    }
}

/// Caller-supplied todo fields for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TodoDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    /// bcrypt hash of the user's password.
    pub password: String,
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl User {
    pub fn from_new(new_user: NewUser) -> Self {
        Self {
            id: ObjectId::new(),
            username: new_user.username,
            password: new_user.password.into_string(),
            todos: Vec::new(),
        }
    }

    pub fn find_todo(&self, todo_id: ObjectId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == todo_id)
    }
}

/// A user ready to be persisted. The password can only be supplied already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: PasswordHash,
}

/// Plaintext registration data as received from a client.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_replaces_both_fields() {
        let mut todo = Todo::from_draft(TodoDraft::new("Buy milk", "2%"));
        let id = todo.id;

        todo.apply(TodoDraft {
            title: Some("Buy bread".to_string()),
            description: None,
        });

        assert_eq!(todo.id, id);
        assert_eq!(todo.title.as_deref(), Some("Buy bread"));
        assert_eq!(todo.description, None);
    }

    #[test]
    fn todo_serializes_id_as_underscore_id() {
        let todo = Todo::from_draft(TodoDraft::new("Item 1", "do item 1"));

        let document = mongodb::bson::to_document(&todo).expect("todo should serialize");

        assert_eq!(document.get_object_id("_id").ok(), Some(todo.id));
        assert_eq!(document.get_str("title").ok(), Some("Item 1"));
    }
}
