pub mod analyze;
pub mod convert;
pub mod info;
