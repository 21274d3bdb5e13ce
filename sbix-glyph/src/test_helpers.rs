//! small utilities used in tests

use crate::{
    font_data::FontData,
    glyph_names::GlyphOrder,
    write::{FontWrite, TableWriter},
};

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Default)]
pub struct BeBuffer {
    data: TableWriter,
}

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl FontWrite) -> Self {
        item.write_into(&mut self.data);
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: FontWrite>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            item.write_into(&mut self.data);
        }
        self
    }

    pub fn font_data(&self) -> FontData<'_> {
        FontData::new(self.as_slice())
    }

    pub fn as_slice(&self) -> &[u8] {
        self.data.as_slice()
    }
}

/// A small glyph order shared by the tests: `.notdef`, `space`, `A`..`E`
pub fn test_glyph_order() -> GlyphOrder {
    [".notdef", "space", "A", "B", "C", "D", "E"]
        .into_iter()
        .collect()
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
