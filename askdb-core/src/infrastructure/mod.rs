//! Adapters for the outside world: language-model HTTP clients, the MySQL
//! database and the REST server.

#[cfg(feature = "mysql")]
pub mod database;
pub mod model;
#[cfg(feature = "rest")]
pub mod server;
