pub mod calibration;
pub mod format;

pub use calibration::{calibrate, Anchors, Calibration};
pub use format::{format_seconds, format_timestamp, parse_timestamp};
