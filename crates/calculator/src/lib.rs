//! # APY Tracker Interest Calculator
//!
//! This crate answers "how much will this deposit earn?" for the savings and CD
//! listings served by the API.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No knowledge of HTTP or storage. It depends only on `core-types`.
//! - **Stateless Calculation:** `InterestCalculator` takes a principal, a rate, a term
//!   and a compounding schedule and produces a `CalculationResult`. Nothing is persisted.
//!
//! ## Public API
//!
//! - `InterestCalculator`: The struct that contains the projection logic.
//! - `CalculationResult`: Simple vs. compound totals, rounded to cents.
//! - `CalculatorError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod result;

// Re-export the key components to create a clean, public-facing API.
pub use engine::InterestCalculator;
pub use error::CalculatorError;
pub use result::CalculationResult;
