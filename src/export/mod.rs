mod csv;
mod job;
mod xlsx;

pub use csv::build_csv;
pub use job::{export_filename, ExportFormat, ExportJob, ExportStep};
pub use xlsx::{XlsxJob, CHUNK_SIZE};
