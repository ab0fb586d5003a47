pub mod error;
pub mod types;

#[cfg(feature = "scenarios")]
pub mod scenarios;

#[cfg(feature = "monte_carlo")]
pub mod monte_carlo;

#[cfg(feature = "portfolio")]
pub mod portfolio;

#[cfg(feature = "dashboard")]
pub mod dashboard;

pub use error::AntifragileError;
pub use types::*;

/// Standard result type for all antifragile-core operations
pub type AntifragileResult<T> = Result<T, AntifragileError>;
