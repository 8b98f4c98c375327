pub mod error;
pub mod rates;
pub mod simulation;
pub mod types;

pub use error::LoanSimError;
pub use types::*;

/// Standard result type for all loansim operations
pub type LoanSimResult<T> = Result<T, LoanSimError>;
