//! Task filtering entry points.
//!
//! # Responsibility
//! - Expose the pure filter engine used to derive list-screen views.
//! - Keep criteria shaping inside core.

pub mod filter;
