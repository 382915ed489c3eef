//! Geometry core for 2D floor-plan drafting.
//!
//! A [`plan::Plan`] owns points, walls and openings. Queries in
//! [`operations`] read it without mutating: [`operations::snap`] resolves
//! cursor samples, [`operations::joint`] computes mitered wall faces, and
//! [`operations::loops`] detects closed rooms.

pub mod error;
pub mod math;
pub mod operations;
pub mod plan;

pub use error::{FloorcraftError, Result};
