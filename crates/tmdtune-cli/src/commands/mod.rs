pub mod analyze;
pub mod scan;
pub mod tune;
