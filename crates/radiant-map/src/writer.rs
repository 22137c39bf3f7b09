//! Map file writer.
//!
//! Writes `// entity N` and `// brush N` comments before each block. Only
//! faces that contribute a polygon are written, and brushes without any
//! such face are skipped.

use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

use radiant_brush::{shader_to_map_name, Brush, Face};

use crate::document::{MapDocument, MapEntity};
use crate::error::MapError;

/// Write a map document to a file.
pub fn write_map(doc: &MapDocument, path: impl AsRef<Path>) -> Result<(), MapError> {
    let data = write_map_to_buffer(doc)?;
    std::fs::write(path, data)?;
    Ok(())
}

/// Write a map document to a byte buffer.
pub fn write_map_to_buffer(doc: &MapDocument) -> Result<Vec<u8>, MapError> {
    let mut out = Vec::new();
    write_map_to(doc, &mut out)?;
    Ok(out)
}

/// Write a map document to any writer.
pub fn write_map_to<W: Write>(doc: &MapDocument, out: &mut W) -> Result<(), MapError> {
    for (i, entity) in doc.entities.iter().enumerate() {
        writeln!(out, "// entity {i}")?;
        write_entity(entity, out)?;
    }
    Ok(())
}

fn write_entity<W: Write>(entity: &MapEntity, out: &mut W) -> Result<(), MapError> {
    writeln!(out, "{{")?;
    for (key, value) in &entity.properties {
        writeln!(out, "\"{}\" \"{}\"", escape(key), escape(value))?;
    }

    let mut written = 0;
    for brush in &entity.brushes {
        let brush = evaluated(brush);
        if !brush.has_contributing_faces() {
            log::debug!("skipping brush without contributing faces");
            continue;
        }
        writeln!(out, "// brush {written}")?;
        write_brush(&brush, out)?;
        written += 1;
    }

    writeln!(out, "}}")?;
    Ok(())
}

/// Write one brush block, contributing faces only.
pub fn write_brush<W: Write>(brush: &Brush, out: &mut W) -> Result<(), MapError> {
    let brush = evaluated(brush);
    writeln!(out, "{{")?;
    for face in brush.faces().iter().filter(|f| f.contributes()) {
        write_face(face, out)?;
    }
    writeln!(out, "}}")?;
    Ok(())
}

fn write_face<W: Write>(face: &Face, out: &mut W) -> Result<(), MapError> {
    for p in face.plane_points() {
        write!(out, "( {} {} {} ) ", num(p.x), num(p.y), num(p.z))?;
    }
    let t = face.texdef();
    write!(
        out,
        "{} {} {} {} {} {}",
        shader_to_map_name(face.shader_name()),
        num(t.shift[0]),
        num(t.shift[1]),
        num(t.rotate),
        num(t.scale[0]),
        num(t.scale[1]),
    )?;

    let flags = face.flags();
    if flags.specified || face.is_detail() {
        write!(
            out,
            " {} {} {}",
            flags.content_flags, flags.surface_flags, flags.value
        )?;
    }
    writeln!(out)?;
    Ok(())
}

fn evaluated(brush: &Brush) -> Cow<'_, Brush> {
    if brush.needs_evaluation() {
        Cow::Owned(brush.clone().evaluated())
    } else {
        Cow::Borrowed(brush)
    }
}

/// Backslash-escape quotes and backslashes inside a quoted string.
fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['"', '\\']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 2);
    for ch in text.chars() {
        if matches!(ch, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    Cow::Owned(escaped)
}

/// Shortest text for `v`, with negative zero written as `0`.
fn num(v: f64) -> String {
    if v == 0.0 {
        "0".to_string()
    } else {
        format!("{v}")
    }
}
