//! raw font bytes

use font_types::{GlyphId16, Tag};

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for reading consecutive scalars out of some [`FontData`].
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

/// A scalar that can be read from big-endian bytes.
pub trait ReadScalar: Sized {
    /// The size of the raw type, in bytes.
    const RAW_BYTE_LEN: usize;

    /// Read an instance of `Self` from exactly `RAW_BYTE_LEN` bytes.
    fn read(bytes: &[u8]) -> Option<Self>;
}

/// An error that occurs when reading font data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    OutOfBounds,
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(FontData::new)
    }

    pub fn read_at<T: ReadScalar>(&self, offset: usize) -> Result<T, ReadError> {
        self.bytes
            .get(offset..offset.saturating_add(T::RAW_BYTE_LEN))
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    pub fn read<T: ReadScalar>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.pos += T::RAW_BYTE_LEN;
        temp
    }
}

macro_rules! read_be_bytes {
    ($ty:ty, $len:literal) => {
        impl ReadScalar for $ty {
            const RAW_BYTE_LEN: usize = $len;

            #[inline]
            fn read(bytes: &[u8]) -> Option<Self> {
                bytes.try_into().ok().map(<$ty>::from_be_bytes)
            }
        }
    };
}

read_be_bytes!(u16, 2);
read_be_bytes!(i16, 2);
read_be_bytes!(u32, 4);
read_be_bytes!(Tag, 4);

impl ReadScalar for GlyphId16 {
    const RAW_BYTE_LEN: usize = 2;

    #[inline]
    fn read(bytes: &[u8]) -> Option<Self> {
        u16::read(bytes).map(GlyphId16::new)
    }
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "An offset was out of bounds"),
        }
    }
}

impl std::error::Error for ReadError {}
