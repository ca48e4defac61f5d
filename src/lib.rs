//! Blockfall (workspace facade crate).
//!
//! The rules live in dedicated crates under `crates/`; this package re-exports them as
//! `blockfall::{core, engine, types}` and hosts the headless replay tooling.

pub use blockfall_core as core;
pub use blockfall_engine as engine;
pub use blockfall_types as types;

pub mod replay;
