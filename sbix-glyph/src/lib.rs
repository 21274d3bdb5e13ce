//! Glyph bitmap records from the [sbix] table
//!
//! Each strike of an `sbix` table stores one record per glyph. A record is
//! either empty, an 8 byte header followed by embedded image data, or a
//! `dupe` record that reuses the bitmap of another glyph. This crate decodes
//! and encodes the body of a single record, and converts records to and from
//! a ttx-style text representation.
//!
//! Locating records inside a strike, and resolving glyph names, are the
//! caller's responsibility; the latter is provided through the
//! [`GlyphNames`] trait.
//!
//! # Example
//!
//! ```
//! use sbix_glyph::{types::GlyphId16, Bitmap, GlyphOrder, RawBitmapInput, PNG};
//!
//! let names: GlyphOrder = [".notdef", "A", "B"].into_iter().collect();
//! let bitmap = Bitmap::image("A", 5, -6, PNG, vec![0x89, 0x50, 0x4e, 0x47]);
//! let bytes = bitmap.encode(&names).unwrap();
//!
//! let input = RawBitmapInput::new(GlyphId16::new(1), &bytes);
//! assert_eq!(Bitmap::decode(input, &names).unwrap(), bitmap);
//! ```
//!
//! [sbix]: https://learn.microsoft.com/en-us/typography/opentype/spec/sbix

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod bitmap;
mod error;
pub mod font_data;
mod glyph_names;
mod header;
pub mod markup;
pub mod write;

#[cfg(test)]
mod test_helpers;

pub use bitmap::{Bitmap, RawBitmapInput};
pub use error::Error;
pub use glyph_names::{parse_synthetic_glyph_name, synthetic_glyph_name, GlyphNames, GlyphOrder};
pub use header::{BitmapHeader, DUPE, JPG, PNG, TIFF};
pub use markup::{read_hex, Attributes, MarkupWriter, XmlWriter};

/// Public re-export of the font-types crate.
pub extern crate font_types as types;
