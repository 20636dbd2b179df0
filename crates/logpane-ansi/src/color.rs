//! The fixed foreground palette for SGR color codes.
//!
//! Log output only ever selects from the 16 standard entries (SGR 30–37 for
//! the normal set, 90–97 for the bright set). Each entry carries a compact
//! hex token the render layer can hand straight to its styling backend.

/// A palette entry selected by an SGR foreground code.
///
/// The mapping is an explicit finite table, not a dispatch mechanism:
/// `from_sgr` is the only way in, and unrecognized codes simply map to
/// `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnsiColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl AnsiColor {
    /// Look up the palette entry for an SGR parameter value.
    ///
    /// `30..=37` selects the normal set, `90..=97` the bright set. Any
    /// other code returns `None` (the caller treats it as "no color
    /// change", not an error).
    #[must_use]
    pub fn from_sgr(code: u16) -> Option<Self> {
        match code {
            30 => Some(Self::Black),
            31 => Some(Self::Red),
            32 => Some(Self::Green),
            33 => Some(Self::Yellow),
            34 => Some(Self::Blue),
            35 => Some(Self::Magenta),
            36 => Some(Self::Cyan),
            37 => Some(Self::White),
            90 => Some(Self::BrightBlack),
            91 => Some(Self::BrightRed),
            92 => Some(Self::BrightGreen),
            93 => Some(Self::BrightYellow),
            94 => Some(Self::BrightBlue),
            95 => Some(Self::BrightMagenta),
            96 => Some(Self::BrightCyan),
            97 => Some(Self::BrightWhite),
            _ => None,
        }
    }

    /// The hex token rendered for this entry.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Black => "#000",
            Self::Red => "#c00",
            Self::Green => "#0a0",
            Self::Yellow => "#a60",
            Self::Blue => "#06c",
            Self::Magenta => "#a0a",
            Self::Cyan => "#0aa",
            Self::White => "#ccc",
            Self::BrightBlack => "#666",
            Self::BrightRed => "#f55",
            Self::BrightGreen => "#5f5",
            Self::BrightYellow => "#ff5",
            Self::BrightBlue => "#59f",
            Self::BrightMagenta => "#f5f",
            Self::BrightCyan => "#5ff",
            Self::BrightWhite => "#fff",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_set_maps_30_to_37() {
        assert_eq!(AnsiColor::from_sgr(30), Some(AnsiColor::Black));
        assert_eq!(AnsiColor::from_sgr(31), Some(AnsiColor::Red));
        assert_eq!(AnsiColor::from_sgr(32), Some(AnsiColor::Green));
        assert_eq!(AnsiColor::from_sgr(37), Some(AnsiColor::White));
    }

    #[test]
    fn bright_set_maps_90_to_97() {
        assert_eq!(AnsiColor::from_sgr(90), Some(AnsiColor::BrightBlack));
        assert_eq!(AnsiColor::from_sgr(97), Some(AnsiColor::BrightWhite));
    }

    #[test]
    fn codes_outside_the_palette_map_to_none() {
        for code in [0u16, 1, 29, 38, 39, 89, 98, 256, u16::MAX] {
            assert_eq!(AnsiColor::from_sgr(code), None, "code {code}");
        }
    }

    #[test]
    fn red_and_green_hex_tokens_are_pinned() {
        // The panel's rendered output depends on these two exact values.
        assert_eq!(AnsiColor::Red.hex(), "#c00");
        assert_eq!(AnsiColor::Green.hex(), "#0a0");
    }

    #[test]
    fn every_entry_has_a_distinct_hex_token() {
        let all = [
            AnsiColor::Black,
            AnsiColor::Red,
            AnsiColor::Green,
            AnsiColor::Yellow,
            AnsiColor::Blue,
            AnsiColor::Magenta,
            AnsiColor::Cyan,
            AnsiColor::White,
            AnsiColor::BrightBlack,
            AnsiColor::BrightRed,
            AnsiColor::BrightGreen,
            AnsiColor::BrightYellow,
            AnsiColor::BrightBlue,
            AnsiColor::BrightMagenta,
            AnsiColor::BrightCyan,
            AnsiColor::BrightWhite,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.hex(), b.hex());
            }
        }
    }
}
