pub mod aging;
pub mod combine;
pub mod format;
pub mod page;
pub mod row;

pub use aging::{bucketize, AgingOrder, AgingRecord, AgingSpec};
pub use combine::{combine, CombineSpec};
pub use page::{Pager, PAGE_SIZE};
pub use row::{Row, Value};
