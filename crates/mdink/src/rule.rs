//! Horizontal rules: placeholder emission during the walk, width
//! resolution in a single pass over the finished text.

use mdink_core::ansi;
use mdink_core::markers::HR_MARKER;
use mdink_core::theme::Palette;

use crate::render::{HR_ENDS, HR_SEP, LEFT_INDENT};

/// A rule renders as end glyphs around a marker byte; the marker becomes
/// the actual dashes once the final text width is known.
pub(crate) fn placeholder(hierarchy: usize, palette: &Palette) -> String {
    let indent = LEFT_INDENT.repeat(hierarchy.saturating_sub(1));
    let end = ansi::colorize(&HR_ENDS.to_string(), palette.rotated(hierarchy), palette);
    ansi::low(&format!("\n{indent}{end}{HR_MARKER}{end}{indent}\n"), palette)
}

/// Resolve every rule placeholder against the widest printable line.
/// More indent means fewer dashes: width = min(columns, max width)
/// − 2 × the marker's printable offset.
pub(crate) fn size_rules(text: &str, columns: usize) -> String {
    if !text.contains(HR_MARKER) {
        return text.to_string();
    }
    let mut max_width = 0usize;
    for line in text.lines() {
        if line.contains(HR_MARKER) {
            continue;
        }
        max_width = max_width.max(ansi::printable_width(line));
    }
    let mut out = text.to_string();
    for line in text.lines().filter(|l| l.contains(HR_MARKER)) {
        let clean = ansi::strip(line);
        let indent = clean.chars().position(|c| c == HR_MARKER).unwrap_or(0);
        let width = columns.min(max_width).saturating_sub(2 * indent);
        let sized = line.replace(HR_MARKER, &HR_SEP.to_string().repeat(width));
        out = out.replace(line, &sized);
    }
    out
}
