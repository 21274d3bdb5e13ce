//! Per-glyph bitmap records

use font_types::{GlyphId16, Tag};

use crate::{
    error::Error,
    font_data::{FontData, ReadScalar},
    glyph_names::GlyphNames,
    header::{BitmapHeader, DUPE},
    write::{FontWrite, TableWriter},
};

/// The encoded body of one glyph's bitmap record, as sliced out of a strike.
#[derive(Clone, Copy, Debug)]
pub struct RawBitmapInput<'a> {
    /// The glyph this record belongs to.
    pub glyph_id: GlyphId16,
    /// The record's bytes; `None` if the caller has no data at all.
    pub data: Option<&'a [u8]>,
}

impl<'a> RawBitmapInput<'a> {
    pub fn new(glyph_id: GlyphId16, data: &'a [u8]) -> Self {
        RawBitmapInput {
            glyph_id,
            data: Some(data),
        }
    }
}

/// The bitmap for a single glyph in a strike.
///
/// A record with no `graphic_type` is empty: the glyph has no bitmap at this
/// strike. Otherwise `image_data` holds the payload that follows the header;
/// for a `dupe` record this is the big-endian id of the glyph whose bitmap is
/// reused, and `reference_glyph_name` names that glyph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bitmap {
    pub glyph_name: Option<String>,
    pub origin_offset_x: i16,
    pub origin_offset_y: i16,
    pub graphic_type: Option<Tag>,
    pub image_data: Vec<u8>,
    pub reference_glyph_name: Option<String>,
}

impl Bitmap {
    /// A record signalling that this glyph has no bitmap.
    pub fn empty(glyph_name: impl Into<String>) -> Self {
        Bitmap {
            glyph_name: Some(glyph_name.into()),
            ..Default::default()
        }
    }

    /// A record holding image data of the given graphic type.
    pub fn image(
        glyph_name: impl Into<String>,
        origin_offset_x: i16,
        origin_offset_y: i16,
        graphic_type: Tag,
        image_data: Vec<u8>,
    ) -> Self {
        Bitmap {
            glyph_name: Some(glyph_name.into()),
            origin_offset_x,
            origin_offset_y,
            graphic_type: Some(graphic_type),
            image_data,
            reference_glyph_name: None,
        }
    }

    /// A record that reuses the bitmap of the glyph named `reference`.
    pub fn dupe(
        glyph_name: impl Into<String>,
        origin_offset_x: i16,
        origin_offset_y: i16,
        reference: impl Into<String>,
    ) -> Self {
        Bitmap {
            glyph_name: Some(glyph_name.into()),
            origin_offset_x,
            origin_offset_y,
            graphic_type: Some(DUPE),
            image_data: Vec::new(),
            reference_glyph_name: Some(reference.into()),
        }
    }

    /// `true` if this glyph has no bitmap.
    pub fn is_empty(&self) -> bool {
        self.graphic_type.is_none()
    }

    /// `true` if this record reuses another glyph's bitmap.
    pub fn is_dupe(&self) -> bool {
        self.graphic_type == Some(DUPE)
    }

    /// The header for this record, or `None` if the record is empty.
    pub fn header(&self) -> Option<BitmapHeader> {
        self.graphic_type
            .map(|tag| BitmapHeader::new(self.origin_offset_x, self.origin_offset_y, tag))
    }

    /// Resolve the id of the glyph this record belongs to.
    pub fn glyph_id(&self, names: &impl GlyphNames) -> Result<GlyphId16, Error> {
        let name = self.glyph_name.as_deref().ok_or(Error::MissingGlyphName)?;
        names
            .glyph_id(name)
            .ok_or_else(|| Error::UnknownGlyphName(name.to_owned()))
    }

    /// Decode one glyph's record.
    ///
    /// An empty body decodes to an empty record.
    pub fn decode(input: RawBitmapInput, names: &impl GlyphNames) -> Result<Self, Error> {
        let glyph_name = names.glyph_name(input.glyph_id);
        let data = input.data.ok_or(Error::MalformedRecord)?;
        if data.is_empty() {
            return Ok(Bitmap::empty(glyph_name));
        }
        if data.len() < BitmapHeader::RAW_BYTE_LEN {
            return Err(Error::TruncatedHeader { len: data.len() });
        }

        let data = FontData::new(data);
        let header = BitmapHeader::read(data)?;
        let payload = data
            .split_off(BitmapHeader::RAW_BYTE_LEN)
            .unwrap_or_default();
        log::trace!(
            "decoding {} bitmap for {glyph_name}, {} bytes",
            header.graphic_type,
            payload.len()
        );

        let reference_glyph_name = if header.is_dupe() {
            if payload.len() != GlyphId16::RAW_BYTE_LEN {
                return Err(Error::MalformedReference { len: payload.len() });
            }
            let reference = names.glyph_name(payload.read_at::<GlyphId16>(0)?);
            log::debug!("bitmap for {glyph_name} reuses {reference}");
            Some(reference)
        } else {
            None
        };

        Ok(Bitmap {
            glyph_name: Some(glyph_name),
            origin_offset_x: header.origin_offset_x,
            origin_offset_y: header.origin_offset_y,
            graphic_type: Some(header.graphic_type),
            image_data: payload.as_bytes().to_vec(),
            reference_glyph_name,
        })
    }

    /// Encode the body of this record.
    ///
    /// An empty record encodes to no bytes at all.
    pub fn encode(&self, names: &impl GlyphNames) -> Result<Vec<u8>, Error> {
        let glyph_id = self.glyph_id(names)?;
        let Some(header) = self.header() else {
            log::trace!("empty bitmap for {glyph_id}");
            return Ok(Vec::new());
        };

        let mut writer = TableWriter::default();
        header.write_into(&mut writer);
        if header.is_dupe() {
            self.dupe_target(names)?.write_into(&mut writer);
        } else {
            writer.write_slice(&self.image_data);
        }
        let data = writer.into_data();
        log::trace!(
            "encoded {} bitmap for {glyph_id}, {} bytes",
            header.graphic_type,
            data.len()
        );
        Ok(data)
    }

    /// The glyph whose bitmap a `dupe` record reuses.
    ///
    /// A reference name takes precedence over the payload bytes; without a
    /// name the payload must be a single glyph id.
    fn dupe_target(&self, names: &impl GlyphNames) -> Result<GlyphId16, Error> {
        let from_payload = (self.image_data.len() == GlyphId16::RAW_BYTE_LEN)
            .then(|| FontData::new(&self.image_data).read_at::<GlyphId16>(0).ok())
            .flatten();
        let Some(reference) = self.reference_glyph_name.as_deref() else {
            return from_payload.ok_or(Error::MalformedReference {
                len: self.image_data.len(),
            });
        };
        let gid = names
            .glyph_id(reference)
            .ok_or_else(|| Error::UnknownGlyphName(reference.to_owned()))?;
        match from_payload {
            Some(payload_gid) if payload_gid != gid => {
                log::warn!("dupe payload {payload_gid} disagrees with '{reference}' ({gid})")
            }
            _ => log::debug!("dupe bitmap references '{reference}' ({gid})"),
        }
        Ok(gid)
    }
}
