pub mod unmetered;
pub mod user_access;
