//! Numerical helpers shared by the forecasting code.

pub mod distributions;
pub mod linalg;

pub use distributions::StandardNormal;
pub use linalg::{inverse_diagonal, solve_linear_system};
