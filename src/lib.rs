pub mod config;
pub mod error;
pub mod export;
pub mod report;
pub mod source;

pub use config::{Column, ColumnCatalog, ColumnKind, Config};
pub use error::{CarteraError, Result};
pub use export::{ExportFormat, ExportJob, ExportStep};
pub use report::{bucketize, combine, AgingRecord, AgingSpec, CombineSpec, Pager, Row, Value};
