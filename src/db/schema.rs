diesel::table! {
    user (user_id) {
        user_id -> BigInt,
        name -> Text,
    }
}

diesel::table! {
    post (post_id) {
        post_id -> BigInt,
        user_id -> Text,
        created_date -> Timestamp,
        content -> Text,
    }
}
