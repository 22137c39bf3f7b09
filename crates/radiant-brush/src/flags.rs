//! Surface flags, content flags and value carried by every face.

use serde::{Deserialize, Serialize};

/// Content flag bits (what the volume behind a face is made of).
pub mod contents {
    /// Solid, blocks everything.
    pub const SOLID: u32 = 1;
    /// Translucent window.
    pub const WINDOW: u32 = 2;
    /// Water volume.
    pub const WATER: u32 = 32;
    /// Blocks actors only.
    pub const ACTORCLIP: u32 = 0x10000;
    /// Actors can walk through.
    pub const PASSABLE: u32 = 0x20000;
    /// Origin brush of a rotating entity.
    pub const ORIGIN: u32 = 0x0100_0000;
    /// Blocks weapon fire only.
    pub const WEAPONCLIP: u32 = 0x0200_0000;
    /// Dead actors.
    pub const DEADMONSTER: u32 = 0x0400_0000;
    /// Non-structural brush, ignored by the visibility partition.
    pub const DETAIL: u32 = 0x0800_0000;
    /// Translucent content.
    pub const TRANSLUCENT: u32 = 0x1000_0000;
    /// Stairs that actors can step onto.
    pub const STEPON: u32 = 0x4000_0000;
}

/// Surface flag bits (how a face is rendered and collided).
pub mod surface {
    /// Emits light.
    pub const LIGHT: u32 = 1;
    /// Slippery.
    pub const SLICK: u32 = 2;
    /// Turbulent warp.
    pub const WARP: u32 = 8;
    /// 33% translucent.
    pub const TRANS33: u32 = 0x10;
    /// 66% translucent.
    pub const TRANS66: u32 = 0x20;
    /// Scrolling texture.
    pub const FLOWING: u32 = 0x40;
    /// Not drawn.
    pub const NODRAW: u32 = 0x80;
    /// Visibility hint splitter.
    pub const HINT: u32 = 0x100;
    /// Ignored by the compiler.
    pub const SKIP: u32 = 0x200;
    /// Alpha-tested.
    pub const ALPHATEST: u32 = 0x0200_0000;
}

/// Per-face flags with per-bit "dirty" masks.
///
/// When several faces are read together (see [`ContentsFlagsValue::merge`])
/// the dirty masks mark the bits on which the faces disagree. Writing such
/// a merged value back with [`ContentsFlagsValue::assign_masked`] leaves the
/// disagreeing bits of each face untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentsFlagsValue {
    /// Surface flag bits.
    pub surface_flags: u32,
    /// Content flag bits.
    pub content_flags: u32,
    /// Surface value (light intensity and similar).
    pub value: i32,
    /// True once the flags were set explicitly rather than defaulted.
    pub specified: bool,
    /// Surface bits that differ across a merged selection.
    #[serde(default)]
    pub surface_flags_dirty: u32,
    /// Content bits that differ across a merged selection.
    #[serde(default)]
    pub content_flags_dirty: u32,
    /// Values differ across a merged selection.
    #[serde(default)]
    pub value_dirty: bool,
}

impl ContentsFlagsValue {
    /// Flags with clean dirty masks.
    pub fn new(surface_flags: u32, content_flags: u32, value: i32, specified: bool) -> Self {
        Self {
            surface_flags,
            content_flags,
            value,
            specified,
            ..Self::default()
        }
    }

    /// True if the detail content bit is set.
    pub fn is_detail(&self) -> bool {
        self.content_flags & contents::DETAIL != 0
    }

    /// Set or clear the detail content bit.
    pub fn set_detail(&mut self, detail: bool) {
        if detail {
            self.content_flags |= contents::DETAIL;
        } else {
            self.content_flags &= !contents::DETAIL;
        }
    }

    /// True if any bit or the value is inconsistent across a merge.
    pub fn is_dirty(&self) -> bool {
        self.surface_flags_dirty != 0 || self.content_flags_dirty != 0 || self.value_dirty
    }

    /// Fold another face's flags into this accumulator.
    ///
    /// The first face folded into an unspecified accumulator is copied;
    /// later faces only widen the dirty masks where they disagree.
    pub fn merge(&mut self, other: &ContentsFlagsValue) {
        if !self.specified {
            *self = *other;
            self.specified = true;
            return;
        }
        self.surface_flags_dirty |= self.surface_flags ^ other.surface_flags;
        self.content_flags_dirty |= self.content_flags ^ other.content_flags;
        if self.value != other.value {
            self.value_dirty = true;
        }
    }

    /// Write `other` into these flags, keeping bits that `other` marks dirty.
    /// The detail bit is not touched.
    pub fn assign_masked(&mut self, other: &ContentsFlagsValue) {
        let detail = self.is_detail();
        self.surface_flags = (self.surface_flags & other.surface_flags_dirty)
            | (other.surface_flags & !other.surface_flags_dirty);
        self.content_flags = (self.content_flags & other.content_flags_dirty)
            | (other.content_flags & !other.content_flags_dirty);
        if !other.value_dirty {
            self.value = other.value;
        }
        self.specified = other.specified;
        self.surface_flags_dirty = 0;
        self.content_flags_dirty = 0;
        self.value_dirty = false;
        self.set_detail(detail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_bit() {
        let mut f = ContentsFlagsValue::default();
        assert!(!f.is_detail());
        f.set_detail(true);
        assert_eq!(f.content_flags, contents::DETAIL);
        f.set_detail(false);
        assert_eq!(f.content_flags, 0);
    }

    #[test]
    fn test_merge_marks_disagreeing_bits() {
        let mut acc = ContentsFlagsValue::default();
        acc.merge(&ContentsFlagsValue::new(surface::NODRAW, contents::SOLID, 5, true));
        assert!(!acc.is_dirty());
        acc.merge(&ContentsFlagsValue::new(
            surface::NODRAW | surface::HINT,
            contents::SOLID,
            7,
            true,
        ));
        assert_eq!(acc.surface_flags_dirty, surface::HINT);
        assert_eq!(acc.content_flags_dirty, 0);
        assert!(acc.value_dirty);
        assert_eq!(acc.surface_flags, surface::NODRAW);
    }

    #[test]
    fn test_assign_masked_keeps_dirty_bits() {
        let mut face = ContentsFlagsValue::new(surface::HINT, contents::DETAIL, 3, true);
        let mut edit = ContentsFlagsValue::new(surface::LIGHT, contents::WATER, 100, true);
        edit.surface_flags_dirty = surface::HINT;
        edit.value_dirty = true;
        face.assign_masked(&edit);
        assert_eq!(face.surface_flags, surface::HINT | surface::LIGHT);
        // detail survives even though the new content flags lack it
        assert_eq!(face.content_flags, contents::WATER | contents::DETAIL);
        assert_eq!(face.value, 3);
        assert!(!face.is_dirty());
    }
}
