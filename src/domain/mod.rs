pub mod error;
pub mod expense;
pub mod filter;
pub mod report;
