use juniper::http::GraphQLRequest;
use rocket::data::{Data, Limits, ToByteUnit};
use rocket::serde::json::{self, Json, Value};
use rocket::State;
use serde::Serialize;
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use crate::db::Db;
use crate::graphql::Schema;
use crate::resolvers::Context;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Responder)]
pub enum Reply {
    #[response(status = 200)]
    Data(Json<Value>),
    #[response(status = 400)]
    BadRequest(Json<ErrorBody>),
}

impl Reply {
    fn bad_request(error: impl Into<String>) -> Reply {
        let error = error.into();
        warn!(%error, "rejecting request");
        Reply::BadRequest(Json(ErrorBody { error }))
    }
}

/// Joins the `message` of every entry in a serialized GraphQL error list.
fn error_messages(errors: &Value) -> String {
    match errors.as_array() {
        Some(list) => list
            .iter()
            .map(|e| match e.get("message").and_then(Value::as_str) {
                Some(message) => message.to_string(),
                None => e.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        None => errors.to_string(),
    }
}

async fn execute(request: GraphQLRequest, schema: &Schema, db: Db) -> Reply {
    let span = info_span!("graphql", request_id = %Uuid::new_v4());
    async move {
        let context = Context::new(db);
        let response = request.execute(schema, &context).await;
        let body = match json::serde_json::to_value(&response) {
            Ok(body) => body,
            Err(e) => return Reply::bad_request(e.to_string()),
        };
        match body.get("errors") {
            Some(errors) => Reply::bad_request(error_messages(errors)),
            None => Reply::Data(Json(body)),
        }
    }
    .instrument(span)
    .await
}

#[get("/")]
pub fn index() -> &'static str {
    "GraphQL Server: homepage"
}

#[get("/graphql?<query>")]
pub async fn graphql_get(query: Option<String>, db: Db, schema: &State<Schema>) -> Reply {
    let request = GraphQLRequest::new(query.unwrap_or_default(), None, None);
    execute(request, schema, db).await
}

/// Standard `{query, operationName, variables}` bodies from GraphQL clients.
#[post("/graphql", format = "json", data = "<request>", rank = 1)]
pub async fn graphql_post_json(
    request: Result<Json<GraphQLRequest>, json::Error<'_>>,
    db: Db,
    schema: &State<Schema>,
) -> Reply {
    match request {
        Ok(request) => execute(request.into_inner(), schema, db).await,
        Err(_) => Reply::bad_request("Invalid request body"),
    }
}

/// Any other body is the query string itself.
#[post("/graphql", data = "<body>", rank = 2)]
pub async fn graphql_post(
    body: Data<'_>,
    limits: &Limits,
    db: Db,
    schema: &State<Schema>,
) -> Reply {
    let limit = limits.get("string").unwrap_or(1.mebibytes());
    let query = match body.open(limit).into_string().await {
        Ok(query) if query.is_complete() => query.into_inner(),
        _ => return Reply::bad_request("Invalid request body"),
    };
    execute(GraphQLRequest::new(query, None, None), schema, db).await
}

#[catch(404)]
pub fn not_found() -> &'static str {
    "This page does not exist ... 404!"
}
