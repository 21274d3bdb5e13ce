//! Text representation of bitmap records
//!
//! A record is written as a `bitmap` element. Non-empty records carry their
//! header as attributes and hold either a `ref` child naming the reused glyph
//! (for `dupe` records) or a `hexdata` child with the image bytes:
//!
//! ```text
//! <bitmap format="png " glyphname="A" originOffsetX="5" originOffsetY="-6">
//!   <hexdata>
//!     89504e47
//!   </hexdata>
//! </bitmap>
//! ```

use std::fmt::{self, Write};

use font_types::{GlyphId16, Tag};
use indexmap::IndexMap;

use crate::{
    bitmap::Bitmap, error::Error, glyph_names::GlyphNames, header::DUPE, write::dump,
};

/// The attributes of a parsed element, in document order.
pub type Attributes = IndexMap<String, String>;

const BITMAP: &str = "bitmap";
const REF: &str = "ref";
const HEXDATA: &str = "hexdata";
const GLYPH_NAME: &str = "glyphname";
const FORMAT: &str = "format";
const ORIGIN_OFFSET_X: &str = "originOffsetX";
const ORIGIN_OFFSET_Y: &str = "originOffsetY";

// bytes per line in hex dumps
const HEX_LINE_LEN: usize = 16;
// bytes per space-separated group in hex dumps
const HEX_GROUP_LEN: usize = 4;

/// A sink for element-structured text output.
pub trait MarkupWriter {
    /// Open an element that will have children.
    fn begin_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> fmt::Result;
    /// Write an element with no children.
    fn simple_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> fmt::Result;
    /// Close the most recently opened element.
    fn end_element(&mut self, name: &str) -> fmt::Result;
    fn newline(&mut self) -> fmt::Result;
    /// Write binary data as lines of hex digits.
    fn write_hex(&mut self, data: &[u8]) -> fmt::Result;
}

/// An indenting XML writer.
pub struct XmlWriter<W> {
    out: W,
    depth: usize,
    indent: &'static str,
    at_line_start: bool,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(out: W) -> Self {
        XmlWriter {
            out,
            depth: 0,
            indent: "  ",
            at_line_start: true,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_indent(&mut self) -> fmt::Result {
        if self.at_line_start {
            for _ in 0..self.depth {
                self.out.write_str(self.indent)?;
            }
            self.at_line_start = false;
        }
        Ok(())
    }

    fn write_tag(&mut self, name: &str, attrs: &[(&str, &str)], close: bool) -> fmt::Result {
        self.write_indent()?;
        write!(self.out, "<{name}")?;
        for (attr, value) in attrs {
            write!(self.out, " {attr}=\"")?;
            write_escaped(&mut self.out, value)?;
            self.out.write_char('"')?;
        }
        self.out.write_str(if close { "/>" } else { ">" })
    }
}

impl<W: Write> MarkupWriter for XmlWriter<W> {
    fn begin_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> fmt::Result {
        self.write_tag(name, attrs, false)?;
        self.depth += 1;
        Ok(())
    }

    fn simple_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> fmt::Result {
        self.write_tag(name, attrs, true)
    }

    fn end_element(&mut self, name: &str) -> fmt::Result {
        self.depth = self.depth.saturating_sub(1);
        self.write_indent()?;
        write!(self.out, "</{name}>")
    }

    fn newline(&mut self) -> fmt::Result {
        self.out.write_char('\n')?;
        self.at_line_start = true;
        Ok(())
    }

    fn write_hex(&mut self, data: &[u8]) -> fmt::Result {
        for line in data.chunks(HEX_LINE_LEN) {
            self.write_indent()?;
            for (i, group) in line.chunks(HEX_GROUP_LEN).enumerate() {
                if i != 0 {
                    self.out.write_char(' ')?;
                }
                self.out.write_str(&hex::encode(group))?;
            }
            self.newline()?;
        }
        Ok(())
    }
}

fn write_escaped(out: &mut impl Write, value: &str) -> fmt::Result {
    for c in value.chars() {
        match c {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '"' => out.write_str("&quot;")?,
            _ => out.write_char(c)?,
        }
    }
    Ok(())
}

/// Decode hex digits, ignoring any whitespace between them.
///
/// An odd number of digits is padded with a trailing `0`.
pub fn read_hex(content: &str) -> Result<Vec<u8>, Error> {
    let mut digits: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        digits.push('0');
    }
    Ok(hex::decode(digits)?)
}

impl Bitmap {
    /// Write this record as a `bitmap` element.
    ///
    /// A `dupe` record must have its reference resolved; see
    /// [`Bitmap::resolve_reference`].
    pub fn to_markup(&self, writer: &mut impl MarkupWriter) -> Result<(), Error> {
        let glyph_name = self.glyph_name.as_deref().ok_or(Error::MissingGlyphName)?;
        let Some(header) = self.header() else {
            writer.simple_element(BITMAP, &[(GLYPH_NAME, glyph_name)])?;
            writer.newline()?;
            return Ok(());
        };

        // resolved before writing, so a failure leaves the writer untouched
        let reference = if header.is_dupe() {
            let reference = self.reference_glyph_name.as_deref();
            Some(reference.ok_or(Error::UnresolvedReference)?)
        } else {
            None
        };
        let format = header.graphic_type.to_string();
        let x = header.origin_offset_x.to_string();
        let y = header.origin_offset_y.to_string();
        writer.begin_element(
            BITMAP,
            &[
                (FORMAT, format.as_str()),
                (GLYPH_NAME, glyph_name),
                (ORIGIN_OFFSET_X, x.as_str()),
                (ORIGIN_OFFSET_Y, y.as_str()),
            ],
        )?;
        writer.newline()?;
        if let Some(reference) = reference {
            writer.simple_element(REF, &[(GLYPH_NAME, reference)])?;
        } else {
            writer.begin_element(HEXDATA, &[])?;
            writer.newline()?;
            writer.write_hex(&self.image_data)?;
            writer.end_element(HEXDATA)?;
        }
        writer.newline()?;
        writer.end_element(BITMAP)?;
        writer.newline()?;
        Ok(())
    }

    /// Start a record from the attributes of a `bitmap` element.
    ///
    /// The payload is filled in by passing each child element to
    /// [`Bitmap::from_markup`].
    pub fn from_markup_attributes(attrs: &Attributes) -> Result<Self, Error> {
        let glyph_name = required(attrs, GLYPH_NAME)?;
        let Some(format) = attrs.get(FORMAT) else {
            return Ok(Bitmap::empty(glyph_name));
        };
        let graphic_type =
            Tag::new_checked(format.as_bytes()).map_err(|_| Error::InvalidAttribute {
                name: FORMAT,
                value: format.clone(),
            })?;
        Ok(Bitmap {
            glyph_name: Some(glyph_name.to_owned()),
            origin_offset_x: parse_offset(attrs, ORIGIN_OFFSET_X)?,
            origin_offset_y: parse_offset(attrs, ORIGIN_OFFSET_Y)?,
            graphic_type: Some(graphic_type),
            image_data: Vec::new(),
            reference_glyph_name: None,
        })
    }

    /// Update this record from one child element of its `bitmap` element.
    ///
    /// A `ref` child stores the referenced glyph's id as the payload, the
    /// same representation a decoded `dupe` record has.
    pub fn from_markup(
        &mut self,
        name: &str,
        attrs: &Attributes,
        content: &str,
        names: &impl GlyphNames,
    ) -> Result<(), Error> {
        match name {
            REF => {
                let reference = required(attrs, GLYPH_NAME)?;
                let gid = names
                    .glyph_id(reference)
                    .ok_or_else(|| Error::UnknownGlyphName(reference.to_owned()))?;
                self.image_data = dump(&gid);
            }
            HEXDATA => self.image_data = read_hex(content)?,
            _ => return Err(Error::UnknownElement(name.to_owned())),
        }
        Ok(())
    }

    /// Set `reference_glyph_name` from the payload of a `dupe` record.
    ///
    /// Records imported from markup hold only the referenced glyph's id; this
    /// names it, so the record can be written out again. Does nothing for
    /// other records.
    pub fn resolve_reference(&mut self, names: &impl GlyphNames) -> Result<(), Error> {
        if self.graphic_type != Some(DUPE) {
            return Ok(());
        }
        let gid = match self.image_data.as_slice() {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            other => return Err(Error::MalformedReference { len: other.len() }),
        };
        self.reference_glyph_name = Some(names.glyph_name(GlyphId16::new(gid)));
        Ok(())
    }
}

fn required<'a>(attrs: &'a Attributes, name: &'static str) -> Result<&'a str, Error> {
    attrs
        .get(name)
        .map(String::as_str)
        .ok_or(Error::MissingAttribute(name))
}

fn parse_offset(attrs: &Attributes, name: &'static str) -> Result<i16, Error> {
    let value = required(attrs, name)?;
    value.trim().parse().map_err(|_| Error::InvalidAttribute {
        name,
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        header::PNG,
        test_helpers::{init_logging, test_glyph_order},
    };

    fn to_xml(bitmap: &Bitmap) -> String {
        let mut writer = XmlWriter::new(String::new());
        bitmap.to_markup(&mut writer).unwrap();
        writer.into_inner()
    }

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // the text between the opening and closing tags of `name`
    fn element_content<'a>(xml: &'a str, name: &str) -> &'a str {
        let open = format!("<{name}>");
        let close = format!("</{name}>");
        let start = xml.find(&open).unwrap() + open.len();
        let end = xml.find(&close).unwrap();
        &xml[start..end]
    }

    #[test]
    fn write_empty() {
        assert_eq!(to_xml(&Bitmap::empty("space")), "<bitmap glyphname=\"space\"/>\n");
    }

    #[test]
    fn write_image() {
        let data = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x10".to_vec();
        let bitmap = Bitmap::image("A", 5, -6, PNG, data);
        assert_eq!(
            to_xml(&bitmap),
            "<bitmap format=\"png \" glyphname=\"A\" originOffsetX=\"5\" originOffsetY=\"-6\">\n\
             \x20 <hexdata>\n\
             \x20   89504e47 0d0a1a0a 0000000d 49484452\n\
             \x20   00000010\n\
             \x20 </hexdata>\n\
             </bitmap>\n"
        );
    }

    #[test]
    fn write_dupe() {
        let bitmap = Bitmap::dupe("B", 0, 1, "A");
        assert_eq!(
            to_xml(&bitmap),
            "<bitmap format=\"dupe\" glyphname=\"B\" originOffsetX=\"0\" originOffsetY=\"1\">\n\
             \x20 <ref glyphname=\"A\"/>\n\
             </bitmap>\n"
        );
    }

    #[test]
    fn attribute_values_are_escaped() {
        assert_eq!(
            to_xml(&Bitmap::empty("a&b\"<c>")),
            "<bitmap glyphname=\"a&amp;b&quot;&lt;c&gt;\"/>\n"
        );
    }

    #[test]
    fn write_requires_glyph_name() {
        let mut writer = XmlWriter::new(String::new());
        assert_eq!(
            Bitmap::default().to_markup(&mut writer),
            Err(Error::MissingGlyphName)
        );
    }

    #[test]
    fn image_text_round_trip() {
        init_logging();
        let names = test_glyph_order();
        let data: Vec<u8> = b"\x89PNG\r\n\x1a\n".iter().copied().chain(0..40).collect();
        let bitmap = Bitmap::image("A", 5, -6, PNG, data);
        let xml = to_xml(&bitmap);

        let mut imported = Bitmap::from_markup_attributes(&attrs(&[
            ("format", "png "),
            ("glyphname", "A"),
            ("originOffsetX", "5"),
            ("originOffsetY", "-6"),
        ]))
        .unwrap();
        let content = element_content(&xml, "hexdata");
        imported
            .from_markup("hexdata", &Attributes::new(), content, &names)
            .unwrap();
        assert_eq!(imported, bitmap);
    }

    #[test]
    fn dupe_text_round_trip() {
        let names = test_glyph_order();
        let original = Bitmap::dupe("E", 2, 3, "B");
        let bytes = original.encode(&names).unwrap();

        let mut imported = Bitmap::from_markup_attributes(&attrs(&[
            ("format", "dupe"),
            ("glyphname", "E"),
            ("originOffsetX", "2"),
            ("originOffsetY", "3"),
        ]))
        .unwrap();
        imported
            .from_markup("ref", &attrs(&[("glyphname", "B")]), "", &names)
            .unwrap();
        assert_eq!(imported.image_data, [0, 3]);
        assert!(imported.reference_glyph_name.is_none());
        assert_eq!(imported.encode(&names).unwrap(), bytes);

        let mut writer = XmlWriter::new(String::new());
        assert_eq!(
            imported.to_markup(&mut writer),
            Err(Error::UnresolvedReference)
        );
        imported.resolve_reference(&names).unwrap();
        assert_eq!(to_xml(&imported), to_xml(&original));
    }

    #[test]
    fn failed_write_leaves_writer_usable() {
        let mut writer = XmlWriter::new(String::new());
        let mut unresolved = Bitmap::dupe("B", 0, 1, "A");
        unresolved.reference_glyph_name = None;
        assert_eq!(
            unresolved.to_markup(&mut writer),
            Err(Error::UnresolvedReference)
        );
        assert_eq!(
            Bitmap::default().to_markup(&mut writer),
            Err(Error::MissingGlyphName)
        );
        Bitmap::empty("C").to_markup(&mut writer).unwrap();
        assert_eq!(writer.into_inner(), "<bitmap glyphname=\"C\"/>\n");
    }

    #[test]
    fn unknown_element() {
        let names = test_glyph_order();
        let mut bitmap = Bitmap::empty("A");
        assert_eq!(
            bitmap.from_markup("bogus", &Attributes::new(), "", &names),
            Err(Error::UnknownElement("bogus".into()))
        );
    }

    #[test]
    fn ref_to_unknown_glyph() {
        let names = test_glyph_order();
        let mut bitmap = Bitmap::empty("A");
        assert_eq!(
            bitmap.from_markup("ref", &attrs(&[("glyphname", "nope")]), "", &names),
            Err(Error::UnknownGlyphName("nope".into()))
        );
        assert_eq!(
            bitmap.from_markup("ref", &Attributes::new(), "", &names),
            Err(Error::MissingAttribute("glyphname"))
        );
    }

    #[test]
    fn bitmap_attributes() {
        assert_eq!(
            Bitmap::from_markup_attributes(&attrs(&[("glyphname", "space")])),
            Ok(Bitmap::empty("space"))
        );
        assert_eq!(
            Bitmap::from_markup_attributes(&attrs(&[])),
            Err(Error::MissingAttribute("glyphname"))
        );
        assert_eq!(
            Bitmap::from_markup_attributes(&attrs(&[("glyphname", "A"), ("format", "png ")])),
            Err(Error::MissingAttribute("originOffsetX"))
        );
        assert_eq!(
            Bitmap::from_markup_attributes(&attrs(&[
                ("glyphname", "A"),
                ("format", "png "),
                ("originOffsetX", "0"),
                ("originOffsetY", "40000"),
            ])),
            Err(Error::InvalidAttribute {
                name: "originOffsetY",
                value: "40000".into()
            })
        );
        assert!(matches!(
            Bitmap::from_markup_attributes(&attrs(&[
                ("glyphname", "A"),
                ("format", "toolong"),
                ("originOffsetX", "0"),
                ("originOffsetY", "0"),
            ])),
            Err(Error::InvalidAttribute { name: "format", .. })
        ));
    }

    #[test]
    fn hex_whitespace() {
        assert_eq!(
            read_hex("  8950 4e47\n\t0d0a\n").unwrap(),
            [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a]
        );
        assert_eq!(read_hex("").unwrap(), Vec::<u8>::new());
        assert!(matches!(read_hex("zz"), Err(Error::InvalidHex(_))));
    }

    #[test]
    fn odd_hex_is_padded() {
        assert_eq!(read_hex("abc").unwrap(), [0xab, 0xc0]);
        assert_eq!(read_hex("8 9 5").unwrap(), [0x89, 0x50]);
    }

    #[test]
    fn resolve_reference_ignores_images() {
        let names = test_glyph_order();
        let mut bitmap = Bitmap::image("A", 0, 0, PNG, vec![1, 2]);
        bitmap.resolve_reference(&names).unwrap();
        assert!(bitmap.reference_glyph_name.is_none());
    }
}
