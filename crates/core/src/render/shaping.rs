//! Arabic contextual shaping and bidirectional ordering.
//!
//! Letters are mapped to their Presentation Forms-B codepoints (isolated,
//! final, initial, medial) from their joining neighbours, and lam-alef pairs
//! collapse into one ligature. Line order comes from the Unicode bidi
//! algorithm with a right-to-left paragraph direction.

use unicode_bidi::{BidiInfo, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Joining {
    Dual,
    Right,
    Causing,
    Transparent,
    None,
}

/// `(base, isolated, final, initial, medial)`; zero marks a missing form.
const FORMS: &[(char, u32, u32, u32, u32)] = &[
    ('\u{0621}', 0xFE80, 0, 0, 0),
    ('\u{0622}', 0xFE81, 0xFE82, 0, 0),
    ('\u{0623}', 0xFE83, 0xFE84, 0, 0),
    ('\u{0624}', 0xFE85, 0xFE86, 0, 0),
    ('\u{0625}', 0xFE87, 0xFE88, 0, 0),
    ('\u{0626}', 0xFE89, 0xFE8A, 0xFE8B, 0xFE8C),
    ('\u{0627}', 0xFE8D, 0xFE8E, 0, 0),
    ('\u{0628}', 0xFE8F, 0xFE90, 0xFE91, 0xFE92),
    ('\u{0629}', 0xFE93, 0xFE94, 0, 0),
    ('\u{062A}', 0xFE95, 0xFE96, 0xFE97, 0xFE98),
    ('\u{062B}', 0xFE99, 0xFE9A, 0xFE9B, 0xFE9C),
    ('\u{062C}', 0xFE9D, 0xFE9E, 0xFE9F, 0xFEA0),
    ('\u{062D}', 0xFEA1, 0xFEA2, 0xFEA3, 0xFEA4),
    ('\u{062E}', 0xFEA5, 0xFEA6, 0xFEA7, 0xFEA8),
    ('\u{062F}', 0xFEA9, 0xFEAA, 0, 0),
    ('\u{0630}', 0xFEAB, 0xFEAC, 0, 0),
    ('\u{0631}', 0xFEAD, 0xFEAE, 0, 0),
    ('\u{0632}', 0xFEAF, 0xFEB0, 0, 0),
    ('\u{0633}', 0xFEB1, 0xFEB2, 0xFEB3, 0xFEB4),
    ('\u{0634}', 0xFEB5, 0xFEB6, 0xFEB7, 0xFEB8),
    ('\u{0635}', 0xFEB9, 0xFEBA, 0xFEBB, 0xFEBC),
    ('\u{0636}', 0xFEBD, 0xFEBE, 0xFEBF, 0xFEC0),
    ('\u{0637}', 0xFEC1, 0xFEC2, 0xFEC3, 0xFEC4),
    ('\u{0638}', 0xFEC5, 0xFEC6, 0xFEC7, 0xFEC8),
    ('\u{0639}', 0xFEC9, 0xFECA, 0xFECB, 0xFECC),
    ('\u{063A}', 0xFECD, 0xFECE, 0xFECF, 0xFED0),
    ('\u{0641}', 0xFED1, 0xFED2, 0xFED3, 0xFED4),
    ('\u{0642}', 0xFED5, 0xFED6, 0xFED7, 0xFED8),
    ('\u{0643}', 0xFED9, 0xFEDA, 0xFEDB, 0xFEDC),
    ('\u{0644}', 0xFEDD, 0xFEDE, 0xFEDF, 0xFEE0),
    ('\u{0645}', 0xFEE1, 0xFEE2, 0xFEE3, 0xFEE4),
    ('\u{0646}', 0xFEE5, 0xFEE6, 0xFEE7, 0xFEE8),
    ('\u{0647}', 0xFEE9, 0xFEEA, 0xFEEB, 0xFEEC),
    ('\u{0648}', 0xFEED, 0xFEEE, 0, 0),
    ('\u{0649}', 0xFEEF, 0xFEF0, 0, 0),
    ('\u{064A}', 0xFEF1, 0xFEF2, 0xFEF3, 0xFEF4),
];

const LAM: char = '\u{0644}';

/// Alef variants that ligate with a preceding lam: `(alef, isolated, final)`.
const LAM_ALEF: &[(char, u32, u32)] = &[
    ('\u{0622}', 0xFEF5, 0xFEF6),
    ('\u{0623}', 0xFEF7, 0xFEF8),
    ('\u{0625}', 0xFEF9, 0xFEFA),
    ('\u{0627}', 0xFEFB, 0xFEFC),
];

const MIRRORED: &[(char, char)] = &[
    ('(', ')'),
    (')', '('),
    ('[', ']'),
    (']', '['),
    ('{', '}'),
    ('}', '{'),
    ('<', '>'),
    ('>', '<'),
    ('«', '»'),
    ('»', '«'),
];

/// One display character covering `len` logical characters from `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    pub display: char,
    pub start: usize,
    pub len: usize,
}

fn forms(c: char) -> Option<(u32, u32, u32, u32)> {
    FORMS
        .iter()
        .find(|(base, ..)| *base == c)
        .map(|&(_, iso, fin, ini, med)| (iso, fin, ini, med))
}

fn joining(c: char) -> Joining {
    match c {
        '\u{0640}' | '\u{200D}' => Joining::Causing,
        '\u{0610}'..='\u{061A}' | '\u{064B}'..='\u{065F}' | '\u{0670}' => Joining::Transparent,
        _ => match forms(c) {
            Some((_, 0, _, _)) => Joining::None,
            Some((_, _, 0, _)) => Joining::Right,
            Some(_) => Joining::Dual,
            None => Joining::None,
        },
    }
}

/// Whether a character joins with the one after it.
fn joins_forward(j: Joining) -> bool {
    matches!(j, Joining::Dual | Joining::Causing)
}

/// Whether a character joins with the one before it.
fn joins_backward(j: Joining) -> bool {
    matches!(j, Joining::Dual | Joining::Right | Joining::Causing)
}

fn neighbour(chars: &[char], from: usize, forward: bool) -> Joining {
    let mut idx = from;
    loop {
        let next = if forward {
            idx.checked_add(1).filter(|n| *n < chars.len())
        } else {
            idx.checked_sub(1)
        };
        let Some(n) = next else {
            return Joining::None;
        };
        let j = joining(chars[n]);
        if j != Joining::Transparent {
            return j;
        }
        idx = n;
    }
}

fn pick(form: u32, fallback: char) -> char {
    if form == 0 {
        fallback
    } else {
        char::from_u32(form).unwrap_or(fallback)
    }
}

/// Replaces Arabic letters with their contextual forms, in logical order.
pub fn contextual_forms(chars: &[char]) -> Vec<Unit> {
    let mut units = Vec::with_capacity(chars.len());
    let mut idx = 0;
    while idx < chars.len() {
        let c = chars[idx];
        let before = joins_forward(neighbour(chars, idx, false));

        if c == LAM
            && let Some(next) = chars.get(idx + 1)
            && let Some(&(_, iso, fin)) = LAM_ALEF.iter().find(|(alef, ..)| alef == next)
        {
            let form = if before { fin } else { iso };
            units.push(Unit {
                display: pick(form, c),
                start: idx,
                len: 2,
            });
            idx += 2;
            continue;
        }

        let display = match forms(c) {
            Some((iso, fin, ini, med)) => {
                let after = joins_forward(joining(c))
                    && joins_backward(neighbour(chars, idx, true));
                let before = before && joins_backward(joining(c));
                match (before, after) {
                    (true, true) => pick(med, c),
                    (true, false) => pick(fin, c),
                    (false, true) => pick(ini, c),
                    (false, false) => pick(iso, c),
                }
            }
            None => c,
        };
        units.push(Unit {
            display,
            start: idx,
            len: 1,
        });
        idx += 1;
    }
    units
}

/// Left-to-right display order of a line.
///
/// Each entry is a logical character index and whether it sits on a
/// right-to-left level.
pub fn visual_order(text: &str) -> Vec<(usize, bool)> {
    let info = BidiInfo::new(text, Some(Level::rtl()));
    let mut order = Vec::with_capacity(text.len());
    let mut offset = 0;
    for para in &info.paragraphs {
        let levels = info.reordered_levels_per_char(para, para.range.clone());
        for logical in BidiInfo::reorder_visual(&levels) {
            order.push((offset + logical, levels[logical].is_rtl()));
        }
        offset += levels.len();
    }
    order
}

/// Mirrored counterpart of a paired punctuation character.
pub fn mirror(c: char) -> char {
    MIRRORED
        .iter()
        .find(|(from, _)| *from == c)
        .map_or(c, |(_, to)| *to)
}
