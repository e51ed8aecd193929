pub mod center_finder;
pub mod constants;
pub mod cyclotrace_errors;
pub mod geometry;
pub mod scan_time;
pub mod volume;
