//! 256-color SGR helpers and marker-span recoloring.
//!
//! Coloring happens after reflow, so width math upstream never sees an
//! escape. [`colorize`] is where inline marker spans turn into color
//! switches: inline code gets a background-swap framing, strong and
//! emphasis get heading-level colors, and the span end restores the
//! enclosing foreground.

use crate::markers::{CODE_END, CODE_START, EMPH_END, EMPH_START, STRONG_END, STRONG_START};
use crate::theme::Palette;

pub const RESET: &str = "\x1b[0m";

pub fn fg(color: u8) -> String {
    format!("\x1b[38;5;{color}m")
}

pub fn bg(color: u8) -> String {
    format!("\x1b[48;5;{color}m")
}

/// Color `s` with `color`, rewriting any inline marker spans it contains.
pub fn colorize(s: &str, color: u8, palette: &Palette) -> String {
    let spans = [
        (CODE_START, CODE_END, palette.headings[1], true),
        (STRONG_START, STRONG_END, palette.headings[1], false),
        (EMPH_START, EMPH_END, palette.headings[2], false),
    ];
    let mut s = s.to_string();
    for (start, end, span_color, swap_bg) in spans {
        if !s.contains(start) {
            continue;
        }
        let open = if swap_bg {
            format!("{}{}", bg(palette.background), fg(span_color))
        } else {
            fg(span_color)
        };
        // SGR has no "pop background": a swapped span ends with a full
        // reset before the enclosing foreground comes back.
        let close = if swap_bg {
            format!("{RESET}{}", fg(color))
        } else {
            fg(color)
        };
        s = s.replace(start, &open);
        s = s.replace(end, &close);
    }
    format!("{}{s}{RESET}", fg(color))
}

/// Low-visibility decoration color.
pub fn low(s: &str, palette: &Palette) -> String {
    colorize(s, palette.low, palette)
}

/// Normal text color; also the fallback for unknown tags.
pub fn plain(s: &str, palette: &Palette) -> String {
    colorize(s, palette.text, palette)
}

/// Drop every ANSI escape sequence.
pub fn strip(s: &str) -> String {
    console::strip_ansi_codes(s).into_owned()
}

/// Printable display width: escapes ignored, East Asian widths honored.
pub fn printable_width(s: &str) -> usize {
    console::measure_text_width(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorize_wraps_and_resets() {
        let palette = Palette::default();
        let out = colorize("hi", 123, &palette);
        assert_eq!(out, "\x1b[38;5;123mhi\x1b[0m");
    }

    #[test]
    fn emphasis_span_switches_to_heading_color_and_back() {
        let palette = Palette::default();
        let text = format!("a {EMPH_START}b{EMPH_END} c");
        let out = colorize(&text, palette.text, &palette);
        let expected = format!(
            "{}a {}b{} c{RESET}",
            fg(palette.text),
            fg(palette.headings[2]),
            fg(palette.text),
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn inline_code_swaps_background_and_fully_resets() {
        let palette = Palette::default();
        let text = format!("x {CODE_START}y{CODE_END}");
        let out = colorize(&text, palette.text, &palette);
        assert!(out.contains(&bg(palette.background)));
        assert!(out.contains(&format!("{RESET}{}", fg(palette.text))));
    }

    #[test]
    fn strip_and_width_ignore_escapes() {
        let palette = Palette::default();
        let out = colorize("wide 漢", 10, &palette);
        assert_eq!(strip(&out), "wide 漢");
        assert_eq!(printable_width(&out), 7);
    }
}
