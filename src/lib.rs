mod error;
pub use error::*;

pub mod config;
pub mod dom;
pub mod edit;
pub mod messages;
pub mod models;
pub mod page;
pub mod routes;
pub mod table;
pub mod transport;
pub mod ui;
pub(crate) mod validate;
