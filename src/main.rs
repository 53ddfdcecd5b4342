#[macro_use]
extern crate rocket;

mod db;
mod error;
mod graphql;
mod models;
mod operations;
mod resolvers;
mod routes;

use std::env;

use rocket::{Build, Rocket};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn rocket(pool: db::Pool) -> Rocket<Build> {
    rocket::build()
        .manage(pool)
        .manage(graphql::schema())
        .mount(
            "/",
            routes![
                routes::index,
                routes::graphql_get,
                routes::graphql_post_json,
                routes::graphql_post
            ],
        )
        .register("/", catchers![routes::not_found])
}

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let database_url = env::var("RUSTY_POSTS_DATABASE_URL")
        .unwrap_or_else(|_| String::from("rusty-posts.db"));
    let pool = db::init_pool(&database_url)?;
    info!(%database_url, "datastore ready");

    rocket(pool).launch().await?;
    Ok(())
}
