//! Errors that occur while converting glyph bitmap records

use crate::font_data::ReadError;

/// An error that occurs when decoding, encoding or importing a [`Bitmap`].
///
/// [`Bitmap`]: crate::Bitmap
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Decode was called without any underlying data.
    MalformedRecord,
    /// A non-empty record is shorter than the glyph data header.
    TruncatedHeader { len: usize },
    /// A `dupe` record whose payload is not a single glyph id.
    MalformedReference { len: usize },
    /// A record cannot be written without knowing which glyph it belongs to.
    MissingGlyphName,
    /// A `dupe` record without a reference glyph name cannot be written as text.
    UnresolvedReference,
    /// An element that does not belong to a bitmap entry.
    UnknownElement(String),
    /// A glyph name that the glyph order does not contain.
    UnknownGlyphName(String),
    /// A required attribute is missing from a bitmap element.
    MissingAttribute(&'static str),
    /// An attribute could not be parsed.
    InvalidAttribute { name: &'static str, value: String },
    /// Hex data in a text dump could not be decoded.
    InvalidHex(hex::FromHexError),
    /// The underlying data could not be read.
    Read(ReadError),
    /// The markup writer failed.
    Markup,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MalformedRecord => write!(f, "No table data to decode"),
            Error::TruncatedHeader { len } => write!(
                f,
                "Bitmap header too short: expected {} bytes, got {len}",
                crate::BitmapHeader::RAW_BYTE_LEN
            ),
            Error::MalformedReference { len } => {
                write!(f, "'dupe' bitmap payload must be 2 bytes, got {len}")
            }
            Error::MissingGlyphName => write!(f, "Can't encode bitmap without glyph name"),
            Error::UnresolvedReference => {
                write!(f, "'dupe' bitmap has no reference glyph name")
            }
            Error::UnknownElement(name) => write!(f, "Can't handle '{name}' element"),
            Error::UnknownGlyphName(name) => write!(f, "No glyph named '{name}'"),
            Error::MissingAttribute(name) => write!(f, "Missing attribute '{name}'"),
            Error::InvalidAttribute { name, value } => {
                write!(f, "Invalid value '{value}' for attribute '{name}'")
            }
            Error::InvalidHex(err) => write!(f, "Invalid hex data: {err}"),
            Error::Read(err) => write!(f, "{err}"),
            Error::Markup => write!(f, "Failed to write markup"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidHex(err) => Some(err),
            Error::Read(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ReadError> for Error {
    fn from(src: ReadError) -> Self {
        Error::Read(src)
    }
}

impl From<hex::FromHexError> for Error {
    fn from(src: hex::FromHexError) -> Self {
        Error::InvalidHex(src)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(_: std::fmt::Error) -> Self {
        Error::Markup
    }
}
