//! Database adapters implementing [`SqlDatabase`](crate::application::tooling::SqlDatabase).

mod mysql;

pub use mysql::MySqlDatabase;
