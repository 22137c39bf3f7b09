//! Map file reader.

use std::path::Path;

use crate::document::MapDocument;
use crate::error::MapError;
use crate::parser::Parser;

/// Read a map file from a path.
///
/// Every brush is evaluated once after its faces are read.
pub fn read_map(path: impl AsRef<Path>) -> Result<MapDocument, MapError> {
    let data = std::fs::read(path)?;
    read_map_from_buffer(&data)
}

/// Read a map from a byte buffer.
pub fn read_map_from_buffer(data: &[u8]) -> Result<MapDocument, MapError> {
    Parser::parse(data)
}

/// Read a map from a byte buffer, building brushes inside a world of the
/// given half-size.
pub fn read_map_with_max_world_coord(
    data: &[u8],
    max_world_coord: f64,
) -> Result<MapDocument, MapError> {
    Parser::parse_with_max_world_coord(data, max_world_coord)
}
