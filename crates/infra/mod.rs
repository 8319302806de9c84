pub mod db;
pub mod memory;
pub mod user_access_store;
