pub mod board;
pub mod issue;
pub mod project;
pub mod query;
pub mod recent;
pub mod ticket;
pub mod user;
