#![warn(missing_docs)]

//! `.map` import/export for radiant brushes.
//!
//! Reads and writes the plain-text map format: a list of entities, each
//! with quoted key/value pairs and brush blocks made of face lines.
//!
//! # Example
//!
//! ```no_run
//! use radiant_map::{read_map, write_map};
//!
//! let doc = read_map("maps/base.map").unwrap();
//! println!("{} brushes", doc.brush_count());
//! write_map(&doc, "maps/base_copy.map").unwrap();
//! ```

mod document;
mod error;
mod lexer;
mod parser;
mod reader;
mod writer;

pub use document::{MapDocument, MapEntity};
pub use error::MapError;
pub use reader::{read_map, read_map_from_buffer, read_map_with_max_world_coord};
pub use writer::{write_brush, write_map, write_map_to, write_map_to_buffer};
