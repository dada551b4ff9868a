use async_graphql::{
    extensions::Tracing, Context, EmptySubscription, ErrorExtensions, InputObject, Object,
    Result, Schema, SimpleObject, ID,
};

use crate::{
    domain::models::{self, Credentials, TodoDraft},
    services::users::UserService,
};

pub type UserSchema = Schema<UserQuery, UserMutation, EmptySubscription>;

pub fn build_schema(service: UserService) -> UserSchema {
    Schema::build(UserQuery, UserMutation, EmptySubscription)
        .extension(Tracing)
        .data(service)
        .finish()
}

/// A todo embedded in its owning user.
#[derive(Debug, SimpleObject)]
#[graphql(name = "Todo")]
pub struct UserTodo {
    pub id: ID,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, SimpleObject)]
pub struct User {
    pub id: ID,
    pub username: String,
    /// bcrypt hash, never the plaintext.
    pub password: String,
    pub todos: Vec<UserTodo>,
}

impl From<models::User> for User {
    fn from(user: models::User) -> Self {
        Self {
            id: ID(user.id.to_hex()),
            username: user.username,
            password: user.password,
            todos: user
                .todos
                .into_iter()
                .map(|todo| UserTodo {
                    id: ID(todo.id.to_hex()),
                    title: todo.title,
                    description: todo.description,
                })
                .collect(),
        }
    }
}

#[derive(InputObject)]
pub struct UserInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, InputObject)]
#[graphql(name = "TodoInput")]
pub struct UserTodoInput {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl From<UserTodoInput> for TodoDraft {
    fn from(input: UserTodoInput) -> Self {
        Self {
            title: input.title,
            description: input.description,
        }
    }
}

#[derive(Default)]
pub struct UserQuery;

#[Object(name = "Query")]
impl UserQuery {
    /// Fails with `UNAUTHENTICATED` for an unknown username or a wrong password alike.
    async fn login(&self, ctx: &Context<'_>, username: String, password: String) -> Result<User> {
        ctx.data::<UserService>()?
            .login(&username, &password)
            .await
            .map(User::from)
            .map_err(|err| err.extend())
    }

    async fn find_by_id(&self, ctx: &Context<'_>, id: ID) -> Result<User> {
        ctx.data::<UserService>()?
            .find_by_id(&id)
            .await
            .map(User::from)
            .map_err(|err| err.extend())
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object(name = "Mutation")]
impl UserMutation {
    async fn create_user(&self, ctx: &Context<'_>, new_user: UserInput) -> Result<User> {
        let credentials = Credentials {
            username: new_user.username,
            password: new_user.password,
        };
        ctx.data::<UserService>()?
            .create_user(credentials)
            .await
            .map(User::from)
            .map_err(|err| err.extend())
    }

    async fn create_todo(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "userID")] user_id: ID,
        new_todo: UserTodoInput,
    ) -> Result<User> {
        ctx.data::<UserService>()?
            .create_todo(&user_id, new_todo.into())
            .await
            .map(User::from)
            .map_err(|err| err.extend())
    }

    async fn delete_todo(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "userID")] user_id: ID,
        #[graphql(name = "todoID")] todo_id: ID,
    ) -> Result<User> {
        ctx.data::<UserService>()?
            .delete_todo(&user_id, &todo_id)
            .await
            .map(User::from)
            .map_err(|err| err.extend())
    }

    /// Replaces both fields of the embedded todo; a field left out becomes null.
    async fn update_todo(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "userID")] user_id: ID,
        #[graphql(name = "todoID")] todo_id: ID,
        new_todo: UserTodoInput,
    ) -> Result<User> {
        ctx.data::<UserService>()?
            .update_todo(&user_id, &todo_id, new_todo.into())
            .await
            .map(User::from)
            .map_err(|err| err.extend())
    }
}
