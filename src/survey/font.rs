// A 5x7 bitmap font for the printable ASCII range, with diacritics drawn over the base letter.
// Each glyph is 5 columns, least significant bit at the top.

// Rows above the glyphs for the accents of capitals, and below for the cedilla.
const TOP: usize = 2;
const GLYPH_HEIGHT: usize = 7;
pub const HEIGHT: usize = TOP + GLYPH_HEIGHT + 1;
/// Horizontal space taken by one character, including the spacing column.
pub const ADVANCE: usize = 6;

const FIRST: u32 = 0x20;

const GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x00, 0x08, 0x14, 0x22, 0x41], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x41, 0x22, 0x14, 0x08, 0x00], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x01, 0x01], // F
    [0x3E, 0x41, 0x41, 0x51, 0x32], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x04, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x7F, 0x20, 0x18, 0x20, 0x7F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x03, 0x04, 0x78, 0x04, 0x03], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x00, 0x7F, 0x41, 0x41], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // \
    [0x41, 0x41, 0x7F, 0x00, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x08, 0x14, 0x54, 0x54, 0x3C], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x00, 0x7F, 0x10, 0x28, 0x44], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x10, 0x08, 0x08, 0x10, 0x08], // ~
];

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Mark {
    Acute,
    Grave,
    Circumflex,
    Diaeresis,
    Cedilla,
}

impl Mark {
    // (column, row) relative to the top of the base glyph. Negative rows are above it.
    fn pixels(self, capital: bool) -> &'static [(usize, i32)] {
        match (self, capital) {
            (Mark::Acute, false) => &[(3, 0), (2, 1)],
            (Mark::Acute, true) => &[(3, -2), (2, -1)],
            (Mark::Grave, false) => &[(1, 0), (2, 1)],
            (Mark::Grave, true) => &[(1, -2), (2, -1)],
            (Mark::Circumflex, false) => &[(2, 0), (1, 1), (3, 1)],
            (Mark::Circumflex, true) => &[(2, -2), (1, -1), (3, -1)],
            (Mark::Diaeresis, false) => &[(1, 0), (3, 0)],
            (Mark::Diaeresis, true) => &[(1, -1), (3, -1)],
            (Mark::Cedilla, _) => &[(2, 7)],
        }
    }
}

/// Splits a letter into its base letter and its diacritic.
///
/// Characters outside of the printable ASCII range without a known decomposition become '?'.
pub fn decompose(c: char) -> (char, Option<Mark>) {
    let (base, mark) = match c {
        ' '..='~' => (c, None),
        'á' => ('a', Some(Mark::Acute)),
        'à' => ('a', Some(Mark::Grave)),
        'â' => ('a', Some(Mark::Circumflex)),
        'ä' => ('a', Some(Mark::Diaeresis)),
        'Á' => ('A', Some(Mark::Acute)),
        'À' => ('A', Some(Mark::Grave)),
        'Â' => ('A', Some(Mark::Circumflex)),
        'Ä' => ('A', Some(Mark::Diaeresis)),
        'ç' => ('c', Some(Mark::Cedilla)),
        'Ç' => ('C', Some(Mark::Cedilla)),
        'é' => ('e', Some(Mark::Acute)),
        'è' => ('e', Some(Mark::Grave)),
        'ê' => ('e', Some(Mark::Circumflex)),
        'ë' => ('e', Some(Mark::Diaeresis)),
        'É' => ('E', Some(Mark::Acute)),
        'È' => ('E', Some(Mark::Grave)),
        'Ê' => ('E', Some(Mark::Circumflex)),
        'Ë' => ('E', Some(Mark::Diaeresis)),
        'í' => ('i', Some(Mark::Acute)),
        'ì' => ('i', Some(Mark::Grave)),
        'î' => ('i', Some(Mark::Circumflex)),
        'ï' => ('i', Some(Mark::Diaeresis)),
        'Í' => ('I', Some(Mark::Acute)),
        'Ì' => ('I', Some(Mark::Grave)),
        'Î' => ('I', Some(Mark::Circumflex)),
        'Ï' => ('I', Some(Mark::Diaeresis)),
        'ó' => ('o', Some(Mark::Acute)),
        'ò' => ('o', Some(Mark::Grave)),
        'ô' => ('o', Some(Mark::Circumflex)),
        'ö' => ('o', Some(Mark::Diaeresis)),
        'Ó' => ('O', Some(Mark::Acute)),
        'Ò' => ('O', Some(Mark::Grave)),
        'Ô' => ('O', Some(Mark::Circumflex)),
        'Ö' => ('O', Some(Mark::Diaeresis)),
        'ú' => ('u', Some(Mark::Acute)),
        'ù' => ('u', Some(Mark::Grave)),
        'û' => ('u', Some(Mark::Circumflex)),
        'ü' => ('u', Some(Mark::Diaeresis)),
        'Ú' => ('U', Some(Mark::Acute)),
        'Ù' => ('U', Some(Mark::Grave)),
        'Û' => ('U', Some(Mark::Circumflex)),
        'Ü' => ('U', Some(Mark::Diaeresis)),
        'ÿ' => ('y', Some(Mark::Diaeresis)),
        'ã' | 'å' => ('a', None),
        'ñ' => ('n', None),
        'õ' | 'œ' => ('o', None),
        'Ã' | 'Å' => ('A', None),
        'Ñ' => ('N', None),
        'Õ' | 'Œ' => ('O', None),
        '\u{2019}' | '\u{2018}' => ('\'', None),
        '\u{a0}' => (' ', None),
        _ => ('?', None),
    };
    (base, mark)
}

fn glyph(c: char) -> &'static [u8; 5] {
    let idx = (c as u32 - FIRST) as usize;
    &GLYPHS[idx]
}

/// Width in pixels of the rendered text.
pub fn text_width(s: &str, scale: usize) -> usize {
    s.chars().count() * ADVANCE * scale
}

/// The lit pixels of the text, at scale 1, relative to its top-left corner.
pub fn pixels(s: &str) -> Vec<(usize, usize)> {
    let mut res: Vec<(usize, usize)> = Vec::new();
    for (idx, c) in s.chars().enumerate() {
        let (base, mark) = decompose(c);
        let left = idx * ADVANCE;
        for (col, bits) in glyph(base).iter().enumerate() {
            for row in 0..GLYPH_HEIGHT {
                if bits & (1 << row) != 0 {
                    res.push((left + col, TOP + row));
                }
            }
        }
        if let Some(m) = mark {
            for (col, row) in m.pixels(base.is_ascii_uppercase()) {
                res.push((left + col, (TOP as i32 + row) as usize));
            }
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accents_are_kept() {
        assert_eq!(decompose('é'), ('e', Some(Mark::Acute)));
        assert_eq!(decompose('à'), ('a', Some(Mark::Grave)));
        assert_eq!(decompose('ç'), ('c', Some(Mark::Cedilla)));
        assert_eq!(decompose('d'), ('d', None));
        assert_eq!(decompose('→'), ('?', None));
        // The accent adds pixels above the base letter.
        let plain = pixels("Indecis");
        let accented = pixels("Indécis");
        assert_eq!(accented.len(), plain.len() + 2);
        assert!(plain.iter().all(|p| accented.contains(p)));
        assert_ne!(pixels("a"), pixels("à"));
    }

    #[test]
    fn capital_accents_stay_in_the_cell() {
        for s in ["É", "Ç", "Ê", "ç", "ë"] {
            assert!(pixels(s).iter().all(|(x, y)| *x < ADVANCE && *y < HEIGHT));
        }
        // Above the capital, not on it.
        let base = pixels("E");
        assert!(pixels("É").iter().filter(|p| !base.contains(p)).all(|(_, y)| *y < TOP));
    }

    #[test]
    fn space_has_no_pixel() {
        assert!(pixels("   ").is_empty());
        assert_eq!(text_width("abc", 2), 36);
    }

    #[test]
    fn pixels_stay_in_the_cell() {
        let px = pixels("Q1");
        assert!(!px.is_empty());
        assert!(px.iter().all(|(x, y)| *x < 2 * ADVANCE && *y < HEIGHT));
        // The second character starts after the first one.
        assert!(px.iter().any(|(x, _)| *x >= ADVANCE));
    }
}
