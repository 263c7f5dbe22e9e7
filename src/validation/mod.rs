//! Error taxonomy and input data-quality checks

pub mod data;
pub mod error;

pub use data::{ReadingValidator, TimestampReport, TimestampValidator};
pub use error::{ProcessingError, ProcessingResult};
