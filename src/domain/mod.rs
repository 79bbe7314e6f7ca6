pub mod error;
pub mod outcome;
pub mod upload;
