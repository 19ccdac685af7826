//! Flutter bridge crate for TaskDeck core.
//!
//! Only `api` is exposed to codegen; it holds no business rules of its own.

pub mod api;
