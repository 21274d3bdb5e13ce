//! The fixed-size header at the start of each [glyph data] record
//!
//! [glyph data]: https://learn.microsoft.com/en-us/typography/opentype/spec/sbix#glyph-data

use font_types::Tag;

use crate::{
    font_data::{FontData, ReadError},
    write::{FontWrite, TableWriter},
};

/// Graphic type for PNG image data.
pub const PNG: Tag = Tag::new(b"png ");
/// Graphic type for JPEG image data.
pub const JPG: Tag = Tag::new(b"jpg ");
/// Graphic type for TIFF image data.
pub const TIFF: Tag = Tag::new(b"tiff");
/// Graphic type for a record that reuses the bitmap of another glyph.
pub const DUPE: Tag = Tag::new(b"dupe");

/// The header of a non-empty glyph data record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitmapHeader {
    /// The horizontal (x-axis) position of the left edge of the bitmap graphic
    /// in relation to the glyph design space origin.
    pub origin_offset_x: i16,
    /// The vertical (y-axis) position of the bottom edge of the bitmap graphic
    /// in relation to the glyph design space origin.
    pub origin_offset_y: i16,
    /// The format of the embedded graphic data: one of 'jpg ', 'png ' or
    /// 'tiff', or the special format 'dupe'.
    pub graphic_type: Tag,
}

impl BitmapHeader {
    /// The encoded size of the header.
    pub const RAW_BYTE_LEN: usize = 8;

    pub fn new(origin_offset_x: i16, origin_offset_y: i16, graphic_type: Tag) -> Self {
        BitmapHeader {
            origin_offset_x,
            origin_offset_y,
            graphic_type,
        }
    }

    /// Read the header from the start of `data`.
    pub fn read(data: FontData) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        Ok(BitmapHeader {
            origin_offset_x: cursor.read()?,
            origin_offset_y: cursor.read()?,
            graphic_type: cursor.read()?,
        })
    }

    /// `true` if this record refers to another glyph's bitmap.
    pub fn is_dupe(&self) -> bool {
        self.graphic_type == DUPE
    }
}

impl FontWrite for BitmapHeader {
    fn write_into(&self, writer: &mut TableWriter) {
        self.origin_offset_x.write_into(writer);
        self.origin_offset_y.write_into(writer);
        self.graphic_type.write_into(writer);
    }
}
