pub mod connectwise;
pub mod notes;
pub mod performance;
pub mod records;
