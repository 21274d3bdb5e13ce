//! Mapping between glyph ids and glyph names

use font_types::GlyphId16;
use indexmap::IndexSet;

/// Resolution between glyph identifiers and glyph names.
///
/// Bitmap records are keyed by glyph name, while the binary table is keyed by
/// glyph id; this trait is the bridge between the two. It is normally backed
/// by the font's glyph order.
pub trait GlyphNames {
    /// The name of the glyph with this id.
    ///
    /// Ids without a known name should resolve to a synthetic name, so that
    /// this never fails.
    fn glyph_name(&self, gid: GlyphId16) -> String;

    /// The id of the glyph with this name, if there is one.
    fn glyph_id(&self, name: &str) -> Option<GlyphId16>;
}

const SYNTHETIC_PREFIX: &str = "glyph";

/// The synthetic name used for glyphs that have no name of their own.
pub fn synthetic_glyph_name(gid: GlyphId16) -> String {
    format!("{SYNTHETIC_PREFIX}{:05}", gid.to_u16())
}

/// The id encoded in a name of the form produced by [`synthetic_glyph_name`].
pub fn parse_synthetic_glyph_name(name: &str) -> Option<GlyphId16> {
    let digits = name.strip_prefix(SYNTHETIC_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(GlyphId16::new)
}

/// An ordered list of glyph names, where each name's position is its glyph id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphOrder {
    names: IndexSet<String>,
}

impl GlyphOrder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Append a glyph, returning its id.
    ///
    /// If the name is already present, its existing id is returned. Returns
    /// `None` if the order is full.
    pub fn push(&mut self, name: impl Into<String>) -> Option<GlyphId16> {
        let name = name.into();
        if let Some(existing) = self.names.get_index_of(name.as_str()) {
            return u16::try_from(existing).ok().map(GlyphId16::new);
        }
        let next = u16::try_from(self.names.len()).ok()?;
        self.names.insert(name);
        Some(GlyphId16::new(next))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over the names, in glyph id order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }
}

impl GlyphNames for GlyphOrder {
    fn glyph_name(&self, gid: GlyphId16) -> String {
        self.names
            .get_index(gid.to_u16() as usize)
            .cloned()
            .unwrap_or_else(|| synthetic_glyph_name(gid))
    }

    fn glyph_id(&self, name: &str) -> Option<GlyphId16> {
        match self.names.get_index_of(name) {
            Some(idx) => u16::try_from(idx).ok().map(GlyphId16::new),
            None => parse_synthetic_glyph_name(name),
        }
    }
}

impl<T: GlyphNames + ?Sized> GlyphNames for &T {
    fn glyph_name(&self, gid: GlyphId16) -> String {
        (**self).glyph_name(gid)
    }

    fn glyph_id(&self, name: &str) -> Option<GlyphId16> {
        (**self).glyph_id(name)
    }
}

impl<S: Into<String>> FromIterator<S> for GlyphOrder {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut order = GlyphOrder::new();
        for name in iter {
            if order.push(name).is_none() {
                log::warn!("glyph order is full, dropping remaining names");
                break;
            }
        }
        order
    }
}
