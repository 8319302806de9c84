pub mod user_access;
