pub mod actor;
pub mod application;
pub mod interview;
