use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use tracing::{debug, info};

use crate::{
    domain::models::{Credentials, NewUser, TodoDraft, User},
    infrastructure::{password::PasswordHasher, storage::UserRepository},
    validation::rules::parse_object_id,
};

use super::errors::ServiceError;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    /// Verifies credentials. An unknown username and a wrong password fail the
    /// same way and cost the same single bcrypt verification.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ServiceError> {
        let user = self
            .users
            .find_by_username(username)
            .await
            .map_err(|err| err.logged("login"))?;

        let Some(user) = user else {
            self.hasher
                .verify_decoy(password)
                .await
                .map_err(|err| err.logged("login"))?;
            debug!("login rejected");
            return Err(ServiceError::InvalidCredentials);
        };

        let matches = self
            .hasher
            .verify(password, &user.password)
            .await
            .map_err(|err| err.logged("login"))?;
        if !matches {
            debug!("login rejected");
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<User, ServiceError> {
        let id = parse_object_id(id)?;
        self.users
            .get(id)
            .await
            .map_err(|err| err.logged("find_user_by_id"))?
            .ok_or(ServiceError::NotFound("user"))
    }

    /// Hashes the password exactly once, then persists the user with an empty todo list.
    pub async fn create_user(&self, credentials: Credentials) -> Result<User, ServiceError> {
        let password = self
            .hasher
            .hash(&credentials.password)
            .await
            .map_err(|err| err.logged("create_user"))?;
        let user = self
            .users
            .insert(NewUser {
                username: credentials.username,
                password,
            })
            .await
            .map_err(|err| err.logged("create_user"))?;
        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    pub async fn create_todo(&self, user_id: &str, draft: TodoDraft) -> Result<User, ServiceError> {
        let user_id = parse_object_id(user_id)?;
        self.users
            .push_todo(user_id, draft)
            .await
            .map_err(|err| err.logged("create_user_todo"))?
            .ok_or(ServiceError::NotFound("user"))
    }

    pub async fn delete_todo(&self, user_id: &str, todo_id: &str) -> Result<User, ServiceError> {
        let user_id = parse_object_id(user_id)?;
        let todo_id = parse_object_id(todo_id)?;
        let updated = self
            .users
            .pull_todo(user_id, todo_id)
            .await
            .map_err(|err| err.logged("delete_user_todo"))?;
        match updated {
            Some(user) => Ok(user),
            None => Err(self.explain_miss(user_id, "delete_user_todo").await),
        }
    }

    /// Replaces title and description of one embedded todo; absent fields are cleared.
    pub async fn update_todo(
        &self,
        user_id: &str,
        todo_id: &str,
        draft: TodoDraft,
    ) -> Result<User, ServiceError> {
        let user_id = parse_object_id(user_id)?;
        let todo_id = parse_object_id(todo_id)?;
        let updated = self
            .users
            .set_todo(user_id, todo_id, draft)
            .await
            .map_err(|err| err.logged("update_user_todo"))?;
        match updated {
            Some(user) => Ok(user),
            None => Err(self.explain_miss(user_id, "update_user_todo").await),
        }
    }

    /// An embedded update matched nothing: either the user or the todo is missing.
    async fn explain_miss(&self, user_id: ObjectId, operation: &'static str) -> ServiceError {
        match self.users.get(user_id).await {
            Ok(Some(_)) => ServiceError::NotFound("todo"),
            Ok(None) => ServiceError::NotFound("user"),
            Err(err) => err.logged(operation),
        }
    }
}
