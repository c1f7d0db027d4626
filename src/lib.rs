//! benchskip - Declarative skip lists for benchmark operators
//!
//! This library loads per-run-mode skip lists that mark benchmark operators,
//! or individual kernel implementations of an operator, as excluded, and
//! answers whether a given operator/implementation pair should run.

pub mod cli;
pub mod config;
pub mod skiplist;
