//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; `diesel print-schema`
//! can regenerate them from a live database.

diesel::table! {
    /// Registered accounts, keyed by UUID with a unique email.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Notes, each owned by one user.
    notes (id) {
        id -> Uuid,
        user_id -> Uuid,
        title -> Varchar,
        content -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Todos, each owned by one user.
    todos (id) {
        id -> Uuid,
        user_id -> Uuid,
        text -> Varchar,
        completed -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(notes -> users (user_id));
diesel::joinable!(todos -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, notes, todos);
