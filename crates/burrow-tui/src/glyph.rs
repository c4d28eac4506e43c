//! Box-drawing glyphs.
//!
//! The explorer never hardcodes line-drawing characters. It asks a
//! [`GlyphProvider`] for the four corners and the two lines once, at
//! construction, and draws every frame from that cached [`Glyphs`] set.

use std::env;
use std::fmt;

/// A single terminal cell worth of drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glyph(char);

impl Glyph {
    /// Wrap a character.
    pub const fn new(ch: char) -> Self {
        Self(ch)
    }

    /// The character to put in the cell.
    pub const fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of the six line-drawing glyphs.
///
/// Implementations must not fail; when the terminal cannot draw lines they
/// return plain ASCII substitutes.
pub trait GlyphProvider {
    fn top_left_corner(&self) -> Glyph;
    fn bottom_left_corner(&self) -> Glyph;
    fn top_right_corner(&self) -> Glyph;
    fn bottom_right_corner(&self) -> Glyph;
    fn horizontal_line(&self) -> Glyph;
    fn vertical_line(&self) -> Glyph;
}

/// Cached copy of a provider's glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub top_left: Glyph,
    pub bottom_left: Glyph,
    pub top_right: Glyph,
    pub bottom_right: Glyph,
    pub horizontal: Glyph,
    pub vertical: Glyph,
}

impl Glyphs {
    /// Query every glyph from `provider` once.
    pub fn from_provider(provider: &(impl GlyphProvider + ?Sized)) -> Self {
        Self {
            top_left: provider.top_left_corner(),
            bottom_left: provider.bottom_left_corner(),
            top_right: provider.top_right_corner(),
            bottom_right: provider.bottom_right_corner(),
            horizontal: provider.horizontal_line(),
            vertical: provider.vertical_line(),
        }
    }
}

impl Default for Glyphs {
    fn default() -> Self {
        Self::from_provider(&UnicodeGlyphs)
    }
}

impl GlyphProvider for Glyphs {
    fn top_left_corner(&self) -> Glyph {
        self.top_left
    }

    fn bottom_left_corner(&self) -> Glyph {
        self.bottom_left
    }

    fn top_right_corner(&self) -> Glyph {
        self.top_right
    }

    fn bottom_right_corner(&self) -> Glyph {
        self.bottom_right
    }

    fn horizontal_line(&self) -> Glyph {
        self.horizontal
    }

    fn vertical_line(&self) -> Glyph {
        self.vertical
    }
}

/// Unicode box-drawing characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeGlyphs;

impl GlyphProvider for UnicodeGlyphs {
    fn top_left_corner(&self) -> Glyph {
        Glyph('┌')
    }

    fn bottom_left_corner(&self) -> Glyph {
        Glyph('└')
    }

    fn top_right_corner(&self) -> Glyph {
        Glyph('┐')
    }

    fn bottom_right_corner(&self) -> Glyph {
        Glyph('┘')
    }

    fn horizontal_line(&self) -> Glyph {
        Glyph('─')
    }

    fn vertical_line(&self) -> Glyph {
        Glyph('│')
    }
}

/// Plain ASCII fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiGlyphs;

impl GlyphProvider for AsciiGlyphs {
    fn top_left_corner(&self) -> Glyph {
        Glyph('+')
    }

    fn bottom_left_corner(&self) -> Glyph {
        Glyph('+')
    }

    fn top_right_corner(&self) -> Glyph {
        Glyph('+')
    }

    fn bottom_right_corner(&self) -> Glyph {
        Glyph('+')
    }

    fn horizontal_line(&self) -> Glyph {
        Glyph('-')
    }

    fn vertical_line(&self) -> Glyph {
        Glyph('|')
    }
}

/// Picks Unicode or ASCII glyphs from the locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalGlyphs {
    unicode: bool,
}

impl TerminalGlyphs {
    /// Inspect `LC_ALL`, `LC_CTYPE` and `LANG`, first one set wins.
    pub fn detect() -> Self {
        let locale = ["LC_ALL", "LC_CTYPE", "LANG"]
            .iter()
            .find_map(|var| env::var(var).ok().filter(|v| !v.is_empty()));
        Self::from_locale(locale.as_deref())
    }

    /// Decide from a locale string such as `en_US.UTF-8`.
    pub fn from_locale(locale: Option<&str>) -> Self {
        let unicode = locale.is_some_and(|l| {
            let l = l.to_ascii_lowercase();
            l.contains("utf-8") || l.contains("utf8")
        });
        Self { unicode }
    }

    /// Force ASCII output.
    pub fn ascii() -> Self {
        Self { unicode: false }
    }

    /// Whether Unicode glyphs are in use.
    pub fn is_unicode(&self) -> bool {
        self.unicode
    }

    fn pick(&self, unicode: Glyph, ascii: Glyph) -> Glyph {
        if self.unicode { unicode } else { ascii }
    }
}

impl GlyphProvider for TerminalGlyphs {
    fn top_left_corner(&self) -> Glyph {
        self.pick(UnicodeGlyphs.top_left_corner(), AsciiGlyphs.top_left_corner())
    }

    fn bottom_left_corner(&self) -> Glyph {
        self.pick(
            UnicodeGlyphs.bottom_left_corner(),
            AsciiGlyphs.bottom_left_corner(),
        )
    }

    fn top_right_corner(&self) -> Glyph {
        self.pick(UnicodeGlyphs.top_right_corner(), AsciiGlyphs.top_right_corner())
    }

    fn bottom_right_corner(&self) -> Glyph {
        self.pick(
            UnicodeGlyphs.bottom_right_corner(),
            AsciiGlyphs.bottom_right_corner(),
        )
    }

    fn horizontal_line(&self) -> Glyph {
        self.pick(UnicodeGlyphs.horizontal_line(), AsciiGlyphs.horizontal_line())
    }

    fn vertical_line(&self) -> Glyph {
        self.pick(UnicodeGlyphs.vertical_line(), AsciiGlyphs.vertical_line())
    }
}
