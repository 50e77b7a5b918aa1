//! Auth Backend Shared Library
//!
//! Wire types and input validation shared by the backend and its clients.

pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
