#[macro_use]
extern crate lazy_static;

pub mod catalog;
pub mod cli;
pub mod core;
pub mod sql;
pub mod util;

pub use catalog::Catalog;
pub use sql::Session;
