//! Domain records shared by stores and presentation layers.
//!
//! # Invariants
//! - Every to-do item is identified by a stable `TodoId`.
//! - Items are immutable apart from their completion flag.

pub mod todo;
