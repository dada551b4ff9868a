use std::sync::Arc;

use crate::{
    infrastructure::{config::Config, password::PasswordHasher, storage::Repositories},
    services::{todos::TodoService, users::UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub todos: TodoService,
    pub users: UserService,
}

impl AppState {
    pub fn new(config: Arc<Config>, repositories: Repositories) -> Self {
        let hasher = PasswordHasher::new(config.auth.bcrypt_cost);
        Self {
            todos: TodoService::new(repositories.todos),
            users: UserService::new(repositories.users, hasher),
            config,
        }
    }
}
