pub mod ddl;
pub mod parser;
pub mod session;

pub use session::Session;
