pub mod calendar;
pub mod comparison;
pub mod contributions;
pub mod error;
pub mod projection;
pub mod regimes;
pub mod tables;
pub mod types;

pub use error::JdgTaxError;
pub use types::*;

/// Standard result type for all jdg-tax operations
pub type JdgTaxResult<T> = Result<T, JdgTaxError>;
