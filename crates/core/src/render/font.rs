//! Embedded text face.
//!
//! DejaVu Sans ships with the crate and is written once per document as a
//! Type0 font: two-byte Identity-H glyph codes, a CIDFontType2 descendant
//! carrying the TrueType program, and a ToUnicode map so extracted text reads
//! as the logical source string.

use std::collections::BTreeMap;

use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use ttf_parser::{Face, GlyphId};

use super::error::RenderError;
use super::shaping::{contextual_forms, mirror, visual_order};

static DEJAVU_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

const FONT_NAME: &str = "DejaVuSans";
const CMAP_CHUNK: usize = 100;

const CMAP_HEADER: &str = "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
";

const CMAP_FOOTER: &str = "endcmap
CMapName currentdict /CMap defineresource pop
end
end";

struct UsedGlyph {
    /// Advance in thousandths of an em.
    width: i64,
    text: String,
}

/// Glyphs placed contiguously, left to right, from `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedRun {
    /// Thousandths of an em from the line start.
    pub offset: i64,
    pub glyphs: Vec<u16>,
}

/// A shaped, visually ordered line.
///
/// Runs are kept in logical order so text extraction reads like the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaidOutLine {
    pub runs: Vec<PlacedRun>,
    /// Total width in thousandths of an em.
    pub advance: i64,
}

pub struct FontFace {
    face: Face<'static>,
    used: BTreeMap<u16, UsedGlyph>,
}

impl FontFace {
    pub fn load() -> Result<Self, RenderError> {
        Ok(Self {
            face: Face::parse(DEJAVU_SANS, 0)?,
            used: BTreeMap::new(),
        })
    }

    fn scale(&self, units: i64) -> i64 {
        units * 1000 / i64::from(self.face.units_per_em().max(1))
    }

    /// Resolves a display character, falling back to the source's base
    /// letter and then to `.notdef`.
    fn glyph(&mut self, display: char, source: &str) -> (u16, i64) {
        let id = self
            .face
            .glyph_index(display)
            .or_else(|| source.chars().next().and_then(|c| self.face.glyph_index(c)))
            .unwrap_or(GlyphId(0));
        let width = self.scale(i64::from(self.face.glyph_hor_advance(id).unwrap_or(0)));
        self.used.entry(id.0).or_insert_with(|| UsedGlyph {
            width,
            text: source.to_string(),
        });
        (id.0, width)
    }

    pub fn layout(&mut self, text: &str) -> LaidOutLine {
        let chars: Vec<char> = text.chars().collect();
        let units = contextual_forms(&chars);

        let mut owner = vec![0; chars.len()];
        for (idx, unit) in units.iter().enumerate() {
            for slot in &mut owner[unit.start..unit.start + unit.len] {
                *slot = idx;
            }
        }

        // (offset, glyph, visual rank) per unit
        let mut placed: Vec<Option<(i64, u16, usize)>> = vec![None; units.len()];
        let mut x = 0;
        let mut rank = 0;
        for (logical, rtl) in visual_order(text) {
            let Some(&idx) = owner.get(logical) else {
                continue;
            };
            if placed[idx].is_some() {
                continue;
            }
            let unit = units[idx];
            let display = if rtl { mirror(unit.display) } else { unit.display };
            let source: String = chars[unit.start..unit.start + unit.len].iter().collect();
            let (glyph, width) = self.glyph(display, &source);
            placed[idx] = Some((x, glyph, rank));
            rank += 1;
            x += width;
        }

        let mut runs: Vec<PlacedRun> = Vec::new();
        let mut last_rank: Option<usize> = None;
        for (offset, glyph, rank) in placed.into_iter().flatten() {
            match runs.last_mut() {
                Some(run) if last_rank.is_some_and(|r| r + 1 == rank) => run.glyphs.push(glyph),
                _ => runs.push(PlacedRun {
                    offset,
                    glyphs: vec![glyph],
                }),
            }
            last_rank = Some(rank);
        }

        LaidOutLine { runs, advance: x }
    }

    /// Writes the font objects and returns the Type0 font's id.
    pub fn embed(&self, doc: &mut Document) -> ObjectId {
        let face = &self.face;
        let program_id = doc.add_object(Stream::new(
            dictionary! {
                "Length1" => i64::try_from(DEJAVU_SANS.len()).unwrap_or(i64::MAX),
            },
            DEJAVU_SANS.to_vec(),
        ));

        let bbox = face.global_bounding_box();
        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => FONT_NAME,
            "Flags" => 32,
            "FontBBox" => vec![
                self.scale(bbox.x_min.into()).into(),
                self.scale(bbox.y_min.into()).into(),
                self.scale(bbox.x_max.into()).into(),
                self.scale(bbox.y_max.into()).into(),
            ],
            "ItalicAngle" => 0,
            "Ascent" => self.scale(face.ascender().into()),
            "Descent" => self.scale(face.descender().into()),
            "CapHeight" => self.scale(face.capital_height().unwrap_or(face.ascender()).into()),
            "StemV" => 80,
            "FontFile2" => program_id,
        });

        let mut widths = Vec::with_capacity(self.used.len() * 2);
        for (glyph, used) in &self.used {
            widths.push(Object::Integer(i64::from(*glyph)));
            widths.push(Object::Array(vec![Object::Integer(used.width)]));
        }
        let descendant_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => FONT_NAME,
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor_id,
            "DW" => 1000,
            "W" => widths,
            "CIDToGIDMap" => "Identity",
        });

        let to_unicode_id = doc.add_object(Stream::new(
            dictionary! {},
            self.to_unicode().into_bytes(),
        ));

        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => FONT_NAME,
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(descendant_id)],
            "ToUnicode" => to_unicode_id,
        })
    }

    fn to_unicode(&self) -> String {
        let entries: Vec<(u16, &str)> = self
            .used
            .iter()
            .filter(|(glyph, _)| **glyph != 0)
            .map(|(glyph, used)| (*glyph, used.text.as_str()))
            .collect();

        let mut cmap = String::from(CMAP_HEADER);
        for chunk in entries.chunks(CMAP_CHUNK) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for (glyph, text) in chunk {
                cmap.push_str(&format!("<{glyph:04X}> <"));
                for unit in text.encode_utf16() {
                    cmap.push_str(&format!("{unit:04X}"));
                }
                cmap.push_str(">\n");
            }
            cmap.push_str("endbfchar\n");
        }
        cmap.push_str(CMAP_FOOTER);
        cmap
    }
}

/// Glyph ids as a two-byte big-endian string.
pub fn glyph_bytes(glyphs: &[u16]) -> Vec<u8> {
    glyphs.iter().flat_map(|g| g.to_be_bytes()).collect()
}
