pub mod cost;
pub mod efficiency;
pub mod error;
pub mod financing;
pub mod model;
pub mod odometer;
pub mod types;

#[cfg(feature = "interchange")]
pub mod interchange;

pub use error::{AutologError, ValidationError, ValueRange};
pub use types::*;

/// Standard result type for all autolog operations
pub type AutologResult<T> = Result<T, AutologError>;
