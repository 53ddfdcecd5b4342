//! Field resolvers.
//!
//! Each resolver is an `async fn(&Context, Args) -> Result<T>` (nested fields
//! also take their parent). Nothing here knows about juniper; `graphql`
//! adapts these into schema fields.

use chrono::Utc;
use tracing::debug;

use crate::db::Db;
use crate::error::{Error, Result};
use crate::models::{NewPost, NewUser, NodeList, Post, User};
use crate::operations::{self, PostQuery};

/// Per-request state shared by all resolvers of one GraphQL execution.
pub struct Context {
    db: Db,
}

impl Context {
    pub fn new(db: Db) -> Self {
        Context { db }
    }
}

#[derive(Debug, Clone)]
pub struct CreateUserArgs {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CreatePostArgs {
    pub user_id: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct UserArgs {
    pub id: String,
}

/// `limit`/`offset` of any list field. Neither is range checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListArgs {
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

pub async fn create_user(ctx: &Context, args: CreateUserArgs) -> Result<User> {
    let record = NewUser {
        name: args.name.clone(),
    };
    let key = ctx
        .db
        .run(move |conn| operations::insert_user(&record, conn))
        .await?;
    debug!(key, "created user");
    Ok(User {
        id: key.to_string(),
        name: args.name,
    })
}

pub async fn create_post(ctx: &Context, args: CreatePostArgs) -> Result<Post> {
    let created_at = Utc::now();
    let record = NewPost {
        user_id: args.user_id.clone(),
        created_date: created_at.naive_utc(),
        content: args.content.clone(),
    };
    let key = ctx
        .db
        .run(move |conn| operations::insert_post(&record, conn))
        .await?;
    debug!(key, user_id = %args.user_id, "created post");
    Ok(Post {
        id: key.to_string(),
        user_id: args.user_id,
        created_at,
        content: args.content,
    })
}

pub async fn query_user(ctx: &Context, args: UserArgs) -> Result<User> {
    let key: i64 = args.id.parse().map_err(Error::InvalidId)?;
    let record = ctx
        .db
        .run(move |conn| operations::get_user(key, conn))
        .await
        .map_err(|e| match e {
            Error::Datastore(diesel::result::Error::NotFound) => Error::UserNotFound,
            e => e,
        })?;
    Ok(User {
        id: args.id,
        name: record.name,
    })
}

pub async fn query_posts(ctx: &Context, args: ListArgs) -> Result<NodeList<Post>> {
    query_post_list(ctx, None, args).await
}

/// Posts written by `parent`, matched on the id string it was served with.
pub async fn query_posts_by_user(
    ctx: &Context,
    parent: &User,
    args: ListArgs,
) -> Result<NodeList<Post>> {
    query_post_list(ctx, Some(parent.id.clone()), args).await
}

async fn query_post_list(
    ctx: &Context,
    user_id: Option<String>,
    args: ListArgs,
) -> Result<NodeList<Post>> {
    let query = PostQuery {
        user_id,
        limit: args.limit.map(i64::from),
        offset: args.offset.map(i64::from),
    };
    debug!(?query, "listing posts");
    let records = ctx
        .db
        .run(move |conn| operations::list_posts(&query, conn))
        .await?;
    let nodes: Vec<Post> = records.into_iter().map(Post::from).collect();
    Ok(NodeList::from(nodes))
}
