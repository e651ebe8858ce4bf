//! **navgrid-core**: the walkability grid that navgrid searches run on.
//!
//! This crate provides geometry primitives, immutable [`Cell`]s and the
//! [`NavGrid`] grid model, plus the [`GridModel`] trait through which
//! pathfinding code reads it.

pub mod cell;
pub mod config;
pub mod error;
pub mod geom;
pub mod grid;

pub use cell::Cell;
pub use config::{GraphKind, GridConfig};
pub use error::GridError;
pub use geom::{Point, Range, WorldPos};
pub use grid::{GridModel, NavGrid};
