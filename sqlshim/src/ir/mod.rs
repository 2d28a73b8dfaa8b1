//! Dialect-neutral statement tree.
//!
//! Trees are built by an upstream query builder (or deserialized from JSON)
//! and are never mutated by the compiler. Rewrites produce new values.

mod expr;
mod stmt;

pub use expr::*;
pub use stmt::*;
