//! Position mapping between generated output and the grammar
//!
//!     When the generator copies user-written fragments (semantic actions, attributes) into
//!     generated source, a [`TrackingWriter`] records where each fragment landed in a
//!     [`PositionMap`]. A compiler error reported against the generated file can then be
//!     traced back to the grammar line and column the offending text came from.
//!
//!     Maps are stored next to the generated files in a small text format, see
//!     [`PositionMap::serialize`].

pub mod error;
pub mod position_map;
pub mod writer;

pub use error::MapError;
pub use position_map::{MapEntry, PositionMap};
pub use writer::TrackingWriter;
