use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson, Document},
    error::{ErrorKind, WriteFailure},
    options::ReturnDocument,
    Collection, Database,
};

use super::{TodoRepository, UserRepository};
use crate::{
    domain::models::{NewUser, Todo, TodoDraft, User},
    infrastructure::db::{TODOS_COLLECTION, USERS_COLLECTION},
    services::errors::ServiceError,
};

const DUPLICATE_KEY: i32 = 11000;

pub struct MongoTodoRepository {
    collection: Collection<Todo>,
}

impl MongoTodoRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(TODOS_COLLECTION),
        }
    }
}

#[async_trait]
impl TodoRepository for MongoTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>, ServiceError> {
        self.collection
            .find(doc! {})
            .await
            .map_err(map_mongo_error)?
            .try_collect::<Vec<_>>()
            .await
            .map_err(map_mongo_error)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Todo>, ServiceError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(map_mongo_error)
    }

    async fn insert(&self, draft: TodoDraft) -> Result<Todo, ServiceError> {
        let todo = Todo::from_draft(draft);
        self.collection
            .insert_one(&todo)
            .await
            .map_err(map_mongo_error)?;
        Ok(todo)
    }

    async fn replace(&self, id: ObjectId, draft: TodoDraft) -> Result<Option<Todo>, ServiceError> {
        self.collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "title": draft.title, "description": draft.description } },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_mongo_error)
    }

    async fn remove(&self, id: ObjectId) -> Result<Option<Todo>, ServiceError> {
        self.collection
            .find_one_and_delete(doc! { "_id": id })
            .await
            .map_err(map_mongo_error)
    }
}

/// Embedded todos are changed with single-document atomic operators, filtered
/// on both the user id and the todo id.
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(USERS_COLLECTION),
        }
    }

    async fn update_returning(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<Option<User>, ServiceError> {
        self.collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_mongo_error)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn get(&self, id: ObjectId) -> Result<Option<User>, ServiceError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(map_mongo_error)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ServiceError> {
        self.collection
            .find_one(doc! { "username": username })
            .await
            .map_err(map_mongo_error)
    }

    async fn insert(&self, user: NewUser) -> Result<User, ServiceError> {
        let user = User::from_new(user);
        self.collection
            .insert_one(&user)
            .await
            .map_err(map_mongo_error)?;
        Ok(user)
    }

    async fn push_todo(
        &self,
        user_id: ObjectId,
        draft: TodoDraft,
    ) -> Result<Option<User>, ServiceError> {
        let todo = to_bson(&Todo::from_draft(draft))
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
        self.update_returning(
            doc! { "_id": user_id },
            doc! { "$push": { "todos": todo } },
        )
        .await
    }

    async fn pull_todo(
        &self,
        user_id: ObjectId,
        todo_id: ObjectId,
    ) -> Result<Option<User>, ServiceError> {
        self.update_returning(
            doc! { "_id": user_id, "todos._id": todo_id },
            doc! { "$pull": { "todos": { "_id": todo_id } } },
        )
        .await
    }

    async fn set_todo(
        &self,
        user_id: ObjectId,
        todo_id: ObjectId,
        draft: TodoDraft,
    ) -> Result<Option<User>, ServiceError> {
        self.update_returning(
            doc! { "_id": user_id, "todos._id": todo_id },
            doc! {
                "$set": {
                    "todos.$.title": draft.title,
                    "todos.$.description": draft.description
                }
            },
        )
        .await
    }
}

fn map_mongo_error(err: mongodb::error::Error) -> ServiceError {
    if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = err.kind.as_ref() {
        if write_error.code == DUPLICATE_KEY {
            return ServiceError::Conflict(write_error.message.clone());
        }
    }
    ServiceError::Internal(err.to_string())
}
