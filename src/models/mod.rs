// Domain models for the report

mod instance;
mod row;
mod volume;

pub use instance::{CpuSummary, InstanceRecord, Tag, name_tag};
pub use row::{AggregatedRow, CellValue};
pub use volume::VolumeRecord;
