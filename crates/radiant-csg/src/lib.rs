#![warn(missing_docs)]

//! Constructive solid geometry on convex radiant brushes.
//!
//! Every operation works on clones of its inputs and hands back new
//! brushes; placing the results in a scene is up to the caller.
//!
//! - [`subtract`] carves a source brush into convex fragments around a cutter
//! - [`merge`] fuses brushes whose union is convex
//! - [`make_hollow`] replaces a brush by wall slabs
//! - [`split_brush`] cuts a brush with a plane

mod classify;
mod error;
mod hollow;
mod merge;
mod split;
mod subtract;

pub use classify::classify_brush;
pub use error::CsgError;
pub use hollow::make_hollow;
pub use merge::merge;
pub use split::{split_brush, SplitMode, SplitOutcome, SplitPlane};
pub use subtract::{subtract, subtract_all, subtract_from_each, SubtractStrategy};
