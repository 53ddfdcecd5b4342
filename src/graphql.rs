//! GraphQL schema: object types, root query and root mutation.

use chrono::{DateTime, Utc};
use juniper::{graphql_object, EmptySubscription, FieldResult, RootNode};

use crate::models::{NodeList, Post, User};
use crate::resolvers::{
    self, Context, CreatePostArgs, CreateUserArgs, ListArgs, UserArgs,
};

impl juniper::Context for Context {}

#[graphql_object(context = Context)]
impl User {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn posts(
        &self,
        context: &Context,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> FieldResult<Option<NodeList<Post>>> {
        let list = resolvers::query_posts_by_user(context, self, ListArgs { limit, offset }).await?;
        Ok(Some(list))
    }
}

#[graphql_object(context = Context)]
impl Post {
    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn content(&self) -> &str {
        &self.content
    }
}

#[graphql_object(name = "PostList", context = Context)]
impl NodeList<Post> {
    fn nodes(&self) -> &[Post] {
        &self.nodes
    }

    fn total_count(&self) -> i32 {
        self.total_count
    }
}

pub struct Query;

#[graphql_object(context = Context)]
impl Query {
    async fn user(context: &Context, id: String) -> FieldResult<Option<User>> {
        Ok(Some(resolvers::query_user(context, UserArgs { id }).await?))
    }

    async fn posts(
        context: &Context,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> FieldResult<Option<NodeList<Post>>> {
        Ok(Some(
            resolvers::query_posts(context, ListArgs { limit, offset }).await?,
        ))
    }
}

pub struct Mutation;

#[graphql_object(context = Context)]
impl Mutation {
    async fn create_user(context: &Context, name: String) -> FieldResult<Option<User>> {
        Ok(Some(
            resolvers::create_user(context, CreateUserArgs { name }).await?,
        ))
    }

    async fn create_post(
        context: &Context,
        #[graphql(name = "userID")] user_id: String,
        content: String,
    ) -> FieldResult<Option<Post>> {
        let args = CreatePostArgs { user_id, content };
        Ok(Some(resolvers::create_post(context, args).await?))
    }
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

/// Builds the schema. Called once at startup; the result is shared read-only.
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
