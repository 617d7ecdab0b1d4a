mod cache;
mod error;
mod interface;
mod registry;
pub mod rows;

pub use error::{DatabaseError, ToolError};
pub use interface::{Cell, ColumnHeader, ColumnInfo, RawRows, SqlDatabase};
pub use registry::{
    RegistryLimits, TableSchema, ToolRegistry, ValidationReport, row_limit_notice,
};
pub use rows::RowSet;
