use async_graphql::{http::GraphiQLSource, Executor};
use async_graphql_axum::{rejection::GraphQLRejection, GraphQLBatchRequest, GraphQLResponse};
use axum::{
    extract::{FromRequest, Request, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

pub mod todo;
pub mod user;

#[derive(Clone)]
struct Endpoint<E> {
    executor: E,
    path: &'static str,
}

/// POST executes single or batched requests. GET executes a request carried in
/// the query string and serves GraphiQL when there is none.
pub fn mount<E: Executor>(executor: E, path: &'static str) -> Router {
    Router::new()
        .route("/", get(query_or_graphiql::<E>).post(execute::<E>))
        .with_state(Endpoint { executor, path })
}

async fn execute<E: Executor>(
    State(endpoint): State<Endpoint<E>>,
    request: GraphQLBatchRequest,
) -> GraphQLResponse {
    endpoint.executor.execute_batch(request.into_inner()).await.into()
}

async fn query_or_graphiql<E: Executor>(
    State(endpoint): State<Endpoint<E>>,
    request: Request,
) -> Response {
    if !has_query_param(request.uri().query()) {
        return Html(GraphiQLSource::build().endpoint(endpoint.path).finish()).into_response();
    }
    match GraphQLBatchRequest::<GraphQLRejection>::from_request(request, &()).await {
        Ok(request) => execute(State(endpoint), request).await.into_response(),
        Err(rejection) => rejection.into_response(),
    }
}

fn has_query_param(query: Option<&str>) -> bool {
    query
        .unwrap_or_default()
        .split('&')
        .any(|pair| pair.split('=').next() == Some("query"))
}
