pub mod plans;
pub mod user_access;
