//! Configuration loader: ordered sources in, typed struct out.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` that collects sources in
//!   declaration order.
//! - Load every source, fold the trees together and bind the result.
//!
//! Does NOT handle:
//! - Reading any particular format (see `sources`).
//! - Coercion and validation rules (see `bind`).
//!
//! Invariants / Assumptions:
//! - Later sources take precedence over earlier ones, per leaf path.
//! - Sources are loaded sequentially; the first failure aborts the load.
//! - Nothing is read until `load_tree`, `bind` or `load` is called.

mod builder;

#[cfg(test)]
mod tests;

pub use builder::ConfigLoader;
