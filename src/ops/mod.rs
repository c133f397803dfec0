//! Chain-walking operations over a raw [`Table`](crate::table::Table).

pub mod get;
pub mod grow;
pub mod insert;
pub mod remove;
