pub mod config;
pub mod project;
pub mod prompt;
pub mod search;
pub mod ticket;
