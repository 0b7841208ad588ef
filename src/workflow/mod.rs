pub mod project;
pub mod search;
pub mod ticket;

#[cfg(test)]
pub(crate) mod testing;
