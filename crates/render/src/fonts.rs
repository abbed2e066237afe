//! Font resolution and embedding.
//!
//! A render request may carry an external font asset (path or bytes). If it
//! loads, the face is embedded as a Type0/CIDFontType2 font with Identity-H
//! encoding and its advance widths drive text measurement. If it is missing
//! or unparseable the renderer degrades to the built-in Helvetica base-14
//! font; that degradation is reported as [`FontResolution::FallbackUsed`],
//! never as a render failure.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use pdf_writer::types::{CidFontType, FontFlags, SystemInfo};
use pdf_writer::{Filter, Name, Pdf, Rect, Ref, Str};
use serde::{Deserialize, Serialize};

/// Where the typeface comes from. `Builtin` means no external asset was
/// requested; the other variants are supplied by the caller (filesystem path
/// or pre-fetched bytes).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FontSource {
    #[default]
    Builtin,
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// How the typeface for a render was obtained. `FallbackUsed` is a warning,
/// not an error: the document rendered, but a requested asset was replaced by
/// the built-in face and may not cover the target script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FontResolution {
    Resolved { name: String },
    FallbackUsed { reason: String },
}

/// PDF resource name under which the document font is registered.
pub(crate) const FONT_RES_NAME: &[u8] = b"F1";

const BUILTIN_NAME: &str = "Helvetica";
const EMBEDDED_NAME: &[u8] = b"QuoteFont";

/// Advance width (per mille of em) used for characters the face has no glyph
/// for; matches the /DW entry written for embedded fonts.
const DEFAULT_GLYPH_WIDTH: f32 = 500.0;

/// Helvetica AFM advance widths (per mille of em) for 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica AFM advance widths for the Latin-1 block 0xA0..=0xFF, where
/// WinAnsi and Unicode agree.
#[rustfmt::skip]
const HELVETICA_WIDTHS_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333,
    737, 333, 400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556,
    834, 834, 834, 611, 667, 667, 667, 667, 667, 667, 1000, 722, 667, 667,
    667, 667, 278, 278, 278, 278, 722, 722, 778, 778, 778, 778, 778, 584,
    778, 722, 722, 722, 722, 667, 667, 611, 556, 556, 556, 556, 556, 556,
    889, 500, 556, 556, 556, 556, 278, 278, 278, 278, 556, 556, 556, 556,
    556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// WinAnsi code points 0x80..=0x9F that differ from Unicode: the punctuation
/// block (curly quotes, dashes, euro, ...), each with its Helvetica width.
#[rustfmt::skip]
const WIN_ANSI_PUNCTUATION: [(char, u8, u16); 27] = [
    ('\u{20AC}', 0x80, 556),  // euro
    ('\u{201A}', 0x82, 222),  // quotesinglbase
    ('\u{0192}', 0x83, 556),  // florin
    ('\u{201E}', 0x84, 333),  // quotedblbase
    ('\u{2026}', 0x85, 1000), // ellipsis
    ('\u{2020}', 0x86, 556),  // dagger
    ('\u{2021}', 0x87, 556),  // daggerdbl
    ('\u{02C6}', 0x88, 333),  // circumflex
    ('\u{2030}', 0x89, 1000), // perthousand
    ('\u{0160}', 0x8A, 667),  // Scaron
    ('\u{2039}', 0x8B, 333),  // guilsinglleft
    ('\u{0152}', 0x8C, 1000), // OE
    ('\u{017D}', 0x8E, 611),  // Zcaron
    ('\u{2018}', 0x91, 222),  // quoteleft
    ('\u{2019}', 0x92, 222),  // quoteright
    ('\u{201C}', 0x93, 333),  // quotedblleft
    ('\u{201D}', 0x94, 333),  // quotedblright
    ('\u{2022}', 0x95, 350),  // bullet
    ('\u{2013}', 0x96, 556),  // endash
    ('\u{2014}', 0x97, 1000), // emdash
    ('\u{02DC}', 0x98, 333),  // tilde
    ('\u{2122}', 0x99, 1000), // trademark
    ('\u{0161}', 0x9A, 500),  // scaron
    ('\u{203A}', 0x9B, 333),  // guilsinglright
    ('\u{0153}', 0x9C, 944),  // oe
    ('\u{017E}', 0x9E, 500),  // zcaron
    ('\u{0178}', 0x9F, 667),  // Ydieresis
];

/// WinAnsi byte and Helvetica width for `c`, or `None` if the encoding has
/// no slot for it. Unicode C1 controls (0x80..0x9F) are deliberately absent.
fn win_ansi(c: char) -> Option<(u8, u16)> {
    let cp = u32::from(c);
    match cp {
        0x20..=0x7E => Some((cp as u8, HELVETICA_WIDTHS[(cp - 0x20) as usize])),
        0xA0..=0xFF => Some((cp as u8, HELVETICA_WIDTHS_LATIN1[(cp - 0xA0) as usize])),
        _ => WIN_ANSI_PUNCTUATION
            .iter()
            .find(|&&(ch, _, _)| ch == c)
            .map(|&(_, byte, width)| (byte, width)),
    }
}

#[derive(Debug, Clone, Copy)]
struct Glyph {
    gid: u16,
    advance: u16,
}

/// A supplied TrueType face reduced to what rendering needs: the raw bytes
/// for embedding, scaling metrics, and the glyphs for the characters the
/// document actually uses.
#[derive(Debug, Clone)]
pub(crate) struct EmbeddedFace {
    data: Vec<u8>,
    units_per_em: u16,
    ascent: i16,
    descent: i16,
    cap_height: i16,
    bbox: [i16; 4],
    glyphs: BTreeMap<char, Glyph>,
}

/// The typeface a render call draws with.
#[derive(Debug, Clone)]
pub(crate) enum LoadedFont {
    Builtin,
    Embedded(EmbeddedFace),
}

/// Resolve a font source for the given character set.
///
/// Never fails: any problem with the asset is folded into a
/// [`FontResolution::FallbackUsed`] and logged at `warn`.
pub(crate) fn resolve(source: &FontSource, used: &BTreeSet<char>) -> (LoadedFont, FontResolution) {
    let outcome = match source {
        FontSource::Builtin => {
            return (
                LoadedFont::Builtin,
                FontResolution::Resolved {
                    name: BUILTIN_NAME.to_string(),
                },
            );
        }
        FontSource::Path(path) => match std::fs::read(path) {
            Ok(data) => parse_face(data, used)
                .map_err(|e| format!("font asset {}: {e}", path.display())),
            Err(e) => Err(format!("font asset {} unreadable: {e}", path.display())),
        },
        FontSource::Bytes(data) => parse_face(data.clone(), used),
    };

    match outcome {
        Ok(face) => (
            LoadedFont::Embedded(face),
            FontResolution::Resolved {
                name: String::from_utf8_lossy(EMBEDDED_NAME).into_owned(),
            },
        ),
        Err(reason) => {
            tracing::warn!(%reason, "falling back to built-in typeface");
            (
                LoadedFont::Builtin,
                FontResolution::FallbackUsed { reason },
            )
        }
    }
}

fn parse_face(data: Vec<u8>, used: &BTreeSet<char>) -> Result<EmbeddedFace, String> {
    let face = ttf_parser::Face::parse(&data, 0)
        .map_err(|e| format!("not a parseable TrueType face: {e}"))?;

    let mut glyphs = BTreeMap::new();
    for &ch in used {
        if let Some(gid) = face.glyph_index(ch) {
            let advance = face.glyph_hor_advance(gid).unwrap_or(0);
            glyphs.insert(
                ch,
                Glyph {
                    gid: gid.0,
                    advance,
                },
            );
        }
    }

    let units_per_em = face.units_per_em();
    let ascent = face.ascender();
    let descent = face.descender();
    let cap_height = face.capital_height().unwrap_or(ascent);
    let bbox = face.global_bounding_box();
    let bbox = [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max];
    drop(face);

    Ok(EmbeddedFace {
        data,
        units_per_em,
        ascent,
        descent,
        cap_height,
        bbox,
        glyphs,
    })
}

impl LoadedFont {
    /// Width of `text` drawn at `size`, in text-space units.
    pub(crate) fn text_width(&self, text: &str, size: f32) -> f32 {
        let per_mille: f32 = match self {
            // Characters without a WinAnsi slot draw as '?' (556/1000 em), so
            // they measure as '?' too.
            LoadedFont::Builtin => text
                .chars()
                .map(|c| match win_ansi(c) {
                    Some((_, width)) => f32::from(width),
                    None => 556.0,
                })
                .sum(),
            LoadedFont::Embedded(face) => {
                let upem = f32::from(face.units_per_em);
                text.chars()
                    .map(|c| match face.glyphs.get(&c) {
                        Some(g) => f32::from(g.advance) * 1000.0 / upem,
                        None => DEFAULT_GLYPH_WIDTH,
                    })
                    .sum()
            }
        };
        per_mille * size / 1000.0
    }

    /// Encode `text` for a `Tj` operator under this font's encoding: WinAnsi
    /// bytes for the built-in face, big-endian glyph ids for an embedded one.
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            LoadedFont::Builtin => text
                .chars()
                .map(|c| win_ansi(c).map(|(byte, _)| byte).unwrap_or(b'?'))
                .collect(),
            LoadedFont::Embedded(face) => {
                let mut out = Vec::with_capacity(text.len() * 2);
                for c in text.chars() {
                    let gid = face.glyphs.get(&c).map(|g| g.gid).unwrap_or(0);
                    out.extend_from_slice(&gid.to_be_bytes());
                }
                out
            }
        }
    }

    /// Write the font objects into `pdf` and return the font dictionary ref
    /// to pair with [`FONT_RES_NAME`] in each page's resources.
    pub(crate) fn register(&self, pdf: &mut Pdf, alloc: &mut dyn FnMut() -> Ref) -> Ref {
        match self {
            LoadedFont::Builtin => {
                let font_ref = alloc();
                pdf.type1_font(font_ref)
                    .base_font(Name(BUILTIN_NAME.as_bytes()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
                font_ref
            }
            LoadedFont::Embedded(face) => {
                let font_ref = alloc();
                let cid_ref = alloc();
                let desc_ref = alloc();
                let data_ref = alloc();

                pdf.type0_font(font_ref)
                    .base_font(Name(EMBEDDED_NAME))
                    .encoding_predefined(Name(b"Identity-H"))
                    .descendant_font(cid_ref);

                let scale = 1000.0 / f32::from(face.units_per_em);
                {
                    let mut cid = pdf.cid_font(cid_ref);
                    cid.subtype(CidFontType::Type2)
                        .base_font(Name(EMBEDDED_NAME))
                        .system_info(SystemInfo {
                            registry: Str(b"Adobe"),
                            ordering: Str(b"Identity"),
                            supplement: 0,
                        })
                        .font_descriptor(desc_ref)
                        .default_width(DEFAULT_GLYPH_WIDTH)
                        .cid_to_gid_map_predefined(Name(b"Identity"));

                    // Sparse per-glyph widths, ascending by gid.
                    let by_gid: BTreeMap<u16, f32> = face
                        .glyphs
                        .values()
                        .map(|g| (g.gid, f32::from(g.advance) * scale))
                        .collect();
                    let mut widths = cid.widths();
                    for (gid, w) in by_gid {
                        widths.consecutive(gid, [w]);
                    }
                }

                pdf.font_descriptor(desc_ref)
                    .name(Name(EMBEDDED_NAME))
                    .flags(FontFlags::NON_SYMBOLIC)
                    .bbox(Rect::new(
                        f32::from(face.bbox[0]) * scale,
                        f32::from(face.bbox[1]) * scale,
                        f32::from(face.bbox[2]) * scale,
                        f32::from(face.bbox[3]) * scale,
                    ))
                    .italic_angle(0.0)
                    .ascent(f32::from(face.ascent) * scale)
                    .descent(f32::from(face.descent) * scale)
                    .cap_height(f32::from(face.cap_height) * scale)
                    .stem_v(80.0)
                    .font_file2(data_ref);

                let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&face.data, 6);
                pdf.stream(data_ref, &compressed)
                    .filter(Filter::FlateDecode);

                font_ref
            }
        }
    }
}
