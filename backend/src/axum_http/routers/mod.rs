pub mod access;
pub mod plans;
