//! Base-14 font metrics and text encoding.
//!
//! Report cards use a fixed set of built-in PDF fonts, so nothing is embedded:
//! Helvetica and Helvetica-Bold for body text, Courier-Bold for the footer
//! line. Widths are approximations at 1000 units/em, good enough for table
//! cell wrapping at report font sizes.

/// The three fonts a report ever draws with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    CourierBold,
}

impl Font {
    /// PDF resource name, registered on every page.
    pub(crate) fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
            Font::CourierBold => "F3",
        }
    }

    pub(crate) fn base_font(self) -> &'static [u8] {
        match self {
            Font::Helvetica => b"Helvetica",
            Font::HelveticaBold => b"Helvetica-Bold",
            Font::CourierBold => b"Courier-Bold",
        }
    }

    pub(crate) const ALL: [Font; 3] = [Font::Helvetica, Font::HelveticaBold, Font::CourierBold];

    /// Width of one WinAnsi-encodable char at 1000 units/em.
    fn char_width_1000(self, ch: char) -> f32 {
        // Courier is monospace: every glyph advances 600.
        if self == Font::CourierBold {
            return 600.0;
        }
        let byte = char_to_winansi(ch);
        if byte < 32 {
            return 0.0;
        }
        let bold = self == Font::HelveticaBold;
        match byte {
            32 => 278.0,                          // space
            33..=47 => {
                if bold { 389.0 } else { 333.0 }  // punctuation
            }
            48..=57 => 556.0,                     // digits
            58..=64 => {
                if bold { 389.0 } else { 333.0 }
            }
            73 | 74 => 278.0,                     // I J (narrow uppercase)
            77 => 833.0,                          // M (wide)
            65..=90 => {
                if bold { 722.0 } else { 667.0 }  // uppercase average
            }
            91..=96 => 333.0,                     // brackets etc.
            102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
            109 | 119 => 833.0,                   // m w (wide)
            97..=122 => 556.0,                    // lowercase average
            _ => 556.0,
        }
    }

    /// Width in millimetres of `text` at `size` points.
    pub(crate) fn text_width_mm(self, text: &str, size: f32) -> f32 {
        let pts: f32 = text
            .chars()
            .map(|ch| self.char_width_1000(ch) * size / 1000.0)
            .sum();
        pts * PT_TO_MM
    }
}

pub(crate) const MM_TO_PT: f32 = 72.0 / 25.4;
pub(crate) const PT_TO_MM: f32 = 25.4 / 72.0;

/// Map a single Unicode char to its WinAnsi (Windows-1252) byte, 0 if
/// unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95, // bullet
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi bytes for PDF Str encoding. Unmappable
/// chars are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b >= 32)
        .collect()
}
