use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel::sqlite::SqliteConnection;
use diesel::QueryResult;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use rocket::outcome::{try_outcome, Outcome};
use rocket::request::{self, FromRequest};
use rocket::tokio::task;
use rocket::{Request, State};

use crate::error::{Error, Result};

pub mod schema;

pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), r2d2::Error> {
        // Writers from other pooled connections wait instead of failing with SQLITE_BUSY.
        conn.batch_execute("PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)
    }
}

/// Builds the connection pool and brings the schema up to date.
pub fn init_pool(database_url: &str) -> Result<Pool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)?;
    run_migrations(&pool)?;
    Ok(pool)
}

pub fn run_migrations(pool: &Pool) -> Result<()> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(Error::Migration)?;
    Ok(())
}

/// Handle on the datastore, handed to every GraphQL request.
#[derive(Clone)]
pub struct Db(Pool);

impl Db {
    pub fn new(pool: Pool) -> Self {
        Db(pool)
    }

    /// Runs one blocking datastore call on a pooled connection.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.0.clone();
        task::spawn_blocking(move || -> Result<T> {
            let mut conn = pool.get()?;
            Ok(f(&mut *conn)?)
        })
        .await?
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Db {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Db, ()> {
        let pool = try_outcome!(request.guard::<&State<Pool>>().await);
        Outcome::Success(Db(pool.inner().clone()))
    }
}

#[cfg(test)]
pub mod testing {
    use tempfile::TempDir;

    use super::{init_pool, Db, Pool};

    /// A pool over a fresh database file; the directory must outlive the pool.
    pub fn temp_pool() -> (TempDir, Pool) {
        let dir = tempfile::tempdir().unwrap();
        let url = dir.path().join("rusty-posts.db");
        let pool = init_pool(url.to_str().unwrap()).unwrap();
        (dir, pool)
    }

    pub fn temp_db() -> (TempDir, Db) {
        let (dir, pool) = temp_pool();
        (dir, Db::new(pool))
    }
}
