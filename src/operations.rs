use diesel::prelude::*;
use diesel::result::QueryResult;
use diesel::sqlite::SqliteConnection;

use crate::db::schema::{post, user};
use crate::models::{NewPost, NewUser, PostRecord, UserRecord};

/// Filter and page selection for a post scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub user_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Inserts a user and returns the key the datastore assigned to it.
pub fn insert_user(new_user: &NewUser, conn: &mut SqliteConnection) -> QueryResult<i64> {
    diesel::insert_into(user::table)
        .values(new_user)
        .returning(user::user_id)
        .get_result(conn)
}

pub fn get_user(key: i64, conn: &mut SqliteConnection) -> QueryResult<UserRecord> {
    user::table.find(key).first(conn)
}

pub fn insert_post(new_post: &NewPost, conn: &mut SqliteConnection) -> QueryResult<i64> {
    diesel::insert_into(post::table)
        .values(new_post)
        .returning(post::post_id)
        .get_result(conn)
}

/// Newest posts first. `limit` and `offset` go to SQLite untouched.
pub fn list_posts(query: &PostQuery, conn: &mut SqliteConnection) -> QueryResult<Vec<PostRecord>> {
    let mut select = post::table
        .order((post::created_date.desc(), post::post_id.desc()))
        .into_boxed();
    if let Some(user_id) = &query.user_id {
        select = select.filter(post::user_id.eq(user_id.as_str()));
    }
    if let Some(limit) = query.limit {
        select = select.limit(limit);
    }
    if let Some(offset) = query.offset {
        select = select.offset(offset);
    }
    select.load(conn)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use diesel::result::Error as DieselError;

    use super::*;
    use crate::db::testing::temp_pool;

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, minute, 0)
            .unwrap()
    }

    fn new_post(user_id: &str, created_date: NaiveDateTime, content: &str) -> NewPost {
        NewPost {
            user_id: user_id.into(),
            created_date,
            content: content.into(),
        }
    }

    fn contents(records: &[PostRecord]) -> Vec<&str> {
        records.iter().map(|p| p.content.as_str()).collect()
    }

    #[test]
    fn user_keys_are_unique_and_readable() {
        let (_dir, pool) = temp_pool();
        let conn = &mut *pool.get().unwrap();

        let ada = insert_user(&NewUser { name: "Ada".into() }, conn).unwrap();
        let alan = insert_user(&NewUser { name: "Alan".into() }, conn).unwrap();
        assert_ne!(ada, alan);

        assert_eq!(get_user(ada, conn).unwrap().name, "Ada");
        assert_eq!(get_user(alan, conn).unwrap().name, "Alan");
    }

    #[test]
    fn missing_user_is_not_found() {
        let (_dir, pool) = temp_pool();
        let conn = &mut *pool.get().unwrap();
        assert!(matches!(get_user(999, conn), Err(DieselError::NotFound)));
    }

    #[test]
    fn posts_come_back_newest_first() {
        let (_dir, pool) = temp_pool();
        let conn = &mut *pool.get().unwrap();
        insert_post(&new_post("1", at(1), "first"), conn).unwrap();
        insert_post(&new_post("2", at(3), "third"), conn).unwrap();
        insert_post(&new_post("1", at(2), "second"), conn).unwrap();

        let all = list_posts(&PostQuery::default(), conn).unwrap();
        assert_eq!(contents(&all), ["third", "second", "first"]);
    }

    #[test]
    fn equal_timestamps_fall_back_to_newest_key() {
        let (_dir, pool) = temp_pool();
        let conn = &mut *pool.get().unwrap();
        let older = insert_post(&new_post("1", at(5), "a"), conn).unwrap();
        let newer = insert_post(&new_post("1", at(5), "b"), conn).unwrap();

        let all = list_posts(&PostQuery::default(), conn).unwrap();
        assert_eq!(
            all.iter().map(|p| p.post_id).collect::<Vec<_>>(),
            [newer, older]
        );
    }

    #[test]
    fn sub_second_timestamps_keep_their_order() {
        let (_dir, pool) = temp_pool();
        let conn = &mut *pool.get().unwrap();
        let base = at(0);
        insert_post(&new_post("1", base + Duration::milliseconds(500), "late"), conn).unwrap();
        insert_post(&new_post("1", base + Duration::milliseconds(123), "early"), conn).unwrap();
        insert_post(&new_post("1", base, "whole"), conn).unwrap();

        let all = list_posts(&PostQuery::default(), conn).unwrap();
        assert_eq!(contents(&all), ["late", "early", "whole"]);
    }

    #[test]
    fn limit_and_offset_page_the_ordered_scan() {
        let (_dir, pool) = temp_pool();
        let conn = &mut *pool.get().unwrap();
        for minute in 0..5 {
            insert_post(&new_post("1", at(minute), &format!("p{minute}")), conn).unwrap();
        }

        let page = PostQuery {
            limit: Some(2),
            offset: Some(1),
            ..PostQuery::default()
        };
        assert_eq!(contents(&list_posts(&page, conn).unwrap()), ["p3", "p2"]);

        let only_offset = PostQuery {
            offset: Some(3),
            ..PostQuery::default()
        };
        assert_eq!(contents(&list_posts(&only_offset, conn).unwrap()), ["p1", "p0"]);

        let only_limit = PostQuery {
            limit: Some(1),
            ..PostQuery::default()
        };
        assert_eq!(contents(&list_posts(&only_limit, conn).unwrap()), ["p4"]);
    }

    #[test]
    fn negative_limit_is_passed_through() {
        let (_dir, pool) = temp_pool();
        let conn = &mut *pool.get().unwrap();
        for minute in 0..3 {
            insert_post(&new_post("1", at(minute), "x"), conn).unwrap();
        }
        let query = PostQuery {
            limit: Some(-1),
            ..PostQuery::default()
        };
        // SQLite treats a negative limit as unbounded.
        assert_eq!(list_posts(&query, conn).unwrap().len(), 3);
    }

    #[test]
    fn user_filter_keeps_only_matching_posts() {
        let (_dir, pool) = temp_pool();
        let conn = &mut *pool.get().unwrap();
        insert_post(&new_post("1", at(1), "mine"), conn).unwrap();
        insert_post(&new_post("2", at(2), "theirs"), conn).unwrap();

        let query = PostQuery {
            user_id: Some("1".into()),
            ..PostQuery::default()
        };
        assert_eq!(contents(&list_posts(&query, conn).unwrap()), ["mine"]);

        let nobody = PostQuery {
            user_id: Some("3".into()),
            ..PostQuery::default()
        };
        assert!(list_posts(&nobody, conn).unwrap().is_empty());
    }
}
