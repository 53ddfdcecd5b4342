use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::db::schema::{post, user};

#[derive(Queryable, Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: i64,
    pub name: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = user)]
pub struct NewUser {
    pub name: String,
}

#[derive(Queryable, Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub post_id: i64,
    pub user_id: String,
    pub created_date: NaiveDateTime,
    pub content: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = post)]
pub struct NewPost {
    pub user_id: String,
    pub created_date: NaiveDateTime,
    pub content: String,
}

/// A user as served over GraphQL. `id` is the datastore key in base 10.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub content: String,
}

impl From<PostRecord> for Post {
    fn from(record: PostRecord) -> Self {
        Post {
            id: record.post_id.to_string(),
            user_id: record.user_id,
            created_at: record.created_date.and_utc(),
            content: record.content,
        }
    }
}

/// One page of a list-valued field.
///
/// `total_count` is the length of this page, not the number of matching
/// records before `limit`/`offset` were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeList<T> {
    pub nodes: Vec<T>,
    pub total_count: i32,
}

impl<T> From<Vec<T>> for NodeList<T> {
    fn from(nodes: Vec<T>) -> Self {
        let total_count = i32::try_from(nodes.len()).unwrap_or(i32::MAX);
        NodeList { nodes, total_count }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn post_id_and_timestamp_come_from_the_record() {
        let created_date = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_micro_opt(12, 30, 0, 250)
            .unwrap();
        let post = Post::from(PostRecord {
            post_id: 42,
            user_id: "7".into(),
            created_date,
            content: "hello".into(),
        });
        assert_eq!(post.id, "42");
        assert_eq!(post.user_id, "7");
        assert_eq!(post.created_at.naive_utc(), created_date);
    }

    #[test]
    fn total_count_is_page_length() {
        let list = NodeList::from(vec!["a", "b", "c"]);
        assert_eq!(list.total_count, 3);
        assert_eq!(NodeList::<u8>::from(Vec::new()).total_count, 0);
    }
}
