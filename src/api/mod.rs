//! Outer interfaces of the processor
//!
//! Rendering and export of processed runs, the raw record log the
//! acquisition board appends to, and the start signal between operator and
//! board.

pub mod formatting;
pub mod plot;
pub mod recording;
pub mod signal;

pub use formatting::{CsvFormatter, JsonFormatter};
pub use plot::PlotRenderer;
pub use recording::RecordLog;
pub use signal::StartSignal;
