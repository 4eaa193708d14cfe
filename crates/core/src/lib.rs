pub mod error;
pub mod password;
pub mod types;
pub mod validation;
