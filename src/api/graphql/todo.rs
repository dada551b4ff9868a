use async_graphql::{
    extensions::Tracing, Context, EmptySubscription, ErrorExtensions, InputObject, Object,
    Result, Schema, SimpleObject, ID,
};

use crate::{
    domain::models::{self, TodoDraft},
    services::todos::TodoService,
};

pub type TodoSchema = Schema<TodoQuery, TodoMutation, EmptySubscription>;

pub fn build_schema(service: TodoService) -> TodoSchema {
    Schema::build(TodoQuery, TodoMutation, EmptySubscription)
        .extension(Tracing)
        .data(service)
        .finish()
}

#[derive(Debug, SimpleObject)]
pub struct Todo {
    pub id: ID,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl From<models::Todo> for Todo {
    fn from(todo: models::Todo) -> Self {
        Self {
            id: ID(todo.id.to_hex()),
            title: todo.title,
            description: todo.description,
        }
    }
}

#[derive(Debug, InputObject)]
pub struct TodoInput {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl From<TodoInput> for TodoDraft {
    fn from(input: TodoInput) -> Self {
        Self {
            title: input.title,
            description: input.description,
        }
    }
}

#[derive(Default)]
pub struct TodoQuery;

#[Object(name = "Query")]
impl TodoQuery {
    async fn get_all_todos(&self, ctx: &Context<'_>) -> Result<Vec<Todo>> {
        let todos = ctx
            .data::<TodoService>()?
            .get_all()
            .await
            .map_err(|err| err.extend())?;
        Ok(todos.into_iter().map(Todo::from).collect())
    }

    async fn get_todo_by_id(&self, ctx: &Context<'_>, id: ID) -> Result<Todo> {
        ctx.data::<TodoService>()?
            .get_by_id(&id)
            .await
            .map(Todo::from)
            .map_err(|err| err.extend())
    }
}

#[derive(Default)]
pub struct TodoMutation;

#[Object(name = "Mutation")]
impl TodoMutation {
    async fn create_todo(&self, ctx: &Context<'_>, new_todo: TodoInput) -> Result<Todo> {
        ctx.data::<TodoService>()?
            .create(new_todo.into())
            .await
            .map(Todo::from)
            .map_err(|err| err.extend())
    }

    /// Replaces both fields; a field left out of `newTodo` becomes null.
    async fn update_todo(&self, ctx: &Context<'_>, id: ID, new_todo: TodoInput) -> Result<Todo> {
        ctx.data::<TodoService>()?
            .update(&id, new_todo.into())
            .await
            .map(Todo::from)
            .map_err(|err| err.extend())
    }

    /// Returns the deleted todo.
    async fn delete_todo(&self, ctx: &Context<'_>, id: ID) -> Result<Todo> {
        ctx.data::<TodoService>()?
            .delete(&id)
            .await
            .map(Todo::from)
            .map_err(|err| err.extend())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::infrastructure::storage::MemoryTodoRepository;

    fn schema() -> TodoSchema {
        build_schema(TodoService::new(Arc::new(MemoryTodoRepository::default())))
    }

    #[test]
    fn sdl_exposes_expected_fields() {
        let sdl = schema().sdl();

        for field in [
            "getAllTodos: [Todo!]!",
            "getTodoById(id: ID!): Todo!",
            "createTodo(newTodo: TodoInput!): Todo!",
            "updateTodo(id: ID!, newTodo: TodoInput!): Todo!",
            "deleteTodo(id: ID!): Todo!",
        ] {
            assert!(sdl.contains(field), "missing {field} in\n{sdl}");
        }
    }

    #[tokio::test]
    async fn invalid_id_surfaces_bad_user_input() {
        let response = schema()
            .execute(r#"{ getTodoById(id: "nope") { id } }"#)
            .await;

        assert_eq!(response.errors.len(), 1);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["errors"][0]["extensions"]["code"], "BAD_USER_INPUT");
        assert_eq!(json["data"], serde_json::Value::Null);
    }
}
