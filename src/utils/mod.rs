pub mod progress;
pub mod scan;
pub mod validation;
