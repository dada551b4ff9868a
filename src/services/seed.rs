use tracing::info;

use crate::domain::models::{Credentials, TodoDraft};

use super::{errors::ServiceError, todos::TodoService, users::UserService};

const SAMPLE_USERNAME: &str = "login";
const SAMPLE_PASSWORD: &str = "password";

/// Populates an empty deployment with a couple of todos and one sample user.
pub async fn seed_sample_data(todos: &TodoService, users: &UserService) -> Result<(), ServiceError> {
    if todos.get_all().await?.is_empty() {
        todos.create(TodoDraft::new("Item 1", "do item 1")).await?;
        todos.create(TodoDraft::new("Item 2", "do item 2")).await?;
        info!("seeded sample todos");
    }

    let sample = Credentials {
        username: SAMPLE_USERNAME.to_string(),
        password: SAMPLE_PASSWORD.to_string(),
    };
    let user = match users.create_user(sample).await {
        Ok(user) => {
            info!(username = SAMPLE_USERNAME, "seeded sample user");
            user
        }
        Err(ServiceError::Conflict(_)) => {
            match users.login(SAMPLE_USERNAME, SAMPLE_PASSWORD).await {
                Ok(user) => user,
                Err(ServiceError::InvalidCredentials) => {
                    info!(username = SAMPLE_USERNAME, "sample username taken, leaving it alone");
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
        Err(err) => return Err(err),
    };

    if user.todos.is_empty() {
        users
            .create_todo(&user.id.to_hex(), TodoDraft::new("Item 1", "do Item 1"))
            .await?;
        info!(username = SAMPLE_USERNAME, "seeded sample user todo");
    }

    Ok(())
}
