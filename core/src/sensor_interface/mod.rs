pub mod measurement;
pub mod report;

pub use measurement::{Measurement, Scan};
pub use report::FrameReport;
