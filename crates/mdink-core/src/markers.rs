//! Inline marker codec.
//!
//! Emphasis, strong and inline code survive reflow as paired single-byte
//! control markers embedded in the node text. The markers are replaced by
//! SGR sequences only after wrapping, so the reflow layer never sees an
//! escape sequence. Byte values: tab is `\x09`, so it is skipped.

use crate::node::{DocumentNode, Tag};

pub const CODE_START: char = '\x07';
pub const CODE_END: char = '\x08';
pub const STRONG_START: char = '\x16';
pub const STRONG_END: char = '\x10';
pub const EMPH_START: char = '\x11';
pub const EMPH_END: char = '\x12';

/// Guard byte protecting punctuation the tokenizer would mangle.
pub const TOKENIZER_GUARD: char = '\x01';
/// Stash placeholder delimiters for raw blocks kept out of the formatter.
pub const STASH_START: char = '\x02';
pub const STASH_END: char = '\x03';
/// Placeholder a horizontal rule leaves behind until the sizing pass.
pub const HR_MARKER: char = '\x15';

pub fn is_marker(ch: char) -> bool {
    matches!(
        ch,
        CODE_START | CODE_END | STRONG_START | STRONG_END | EMPH_START | EMPH_END
    )
}

const TAG_MARKERS: [(&str, &str, char, char); 3] = [
    ("<code>", "</code>", CODE_START, CODE_END),
    ("<strong>", "</strong>", STRONG_START, STRONG_END),
    ("<em>", "</em>", EMPH_START, EMPH_END),
];

/// Replace the three inline tags in serialized text with their markers.
pub fn encode_tags(s: &str) -> String {
    let mut out = s.to_string();
    for (open, close, start, end) in TAG_MARKERS {
        out = out.replace(open, &start.to_string());
        out = out.replace(close, &end.to_string());
    }
    out
}

/// Exact inverse of [`encode_tags`].
pub fn decode_tags(s: &str) -> String {
    let mut out = s.to_string();
    for (open, close, start, end) in TAG_MARKERS {
        out = out.replace(start, open);
        out = out.replace(end, close);
    }
    out
}

/// Flattened inline content of a node.
pub struct InlineText {
    pub text: String,
    /// Index of a trailing bullet/ordered list child that was not
    /// flattened; the formatter re-enters it one level deeper.
    pub trailing_list: Option<usize>,
}

/// Is this node's leading content inline text rather than block children?
///
/// True when the node carries its own text, has no children at all, or its
/// first child is a text run or one of the three inline tags. Any other
/// leading child makes the node a block parent.
pub fn is_inline_text(node: &DocumentNode) -> bool {
    if !node.own_text().is_empty() {
        return true;
    }
    match node.children.first() {
        None => true,
        Some(first) => matches!(first.tag, Tag::Text) || first.tag.is_inline_markup(),
    }
}

/// Flatten a node's inline content into marker-encoded text.
///
/// Link and image children contribute their label text. A bullet or
/// ordered list in final position is reported, not flattened; any other
/// block child ends the flattening (the rest of the children are dropped,
/// matching how the original consumed its serialized form).
pub fn flatten_inline(node: &DocumentNode) -> InlineText {
    let mut text = String::new();
    text.push_str(node.own_text());
    let mut trailing_list = None;
    let last = node.children.len().saturating_sub(1);
    for (i, child) in node.children.iter().enumerate() {
        match &child.tag {
            Tag::Text => text.push_str(child.own_text()),
            tag if tag.is_inline_markup() => encode_span(child, &mut text),
            Tag::Link | Tag::Image => text.push_str(&plain_text(child)),
            tag if tag.is_list_container() && i == last => {
                trailing_list = Some(i);
                break;
            }
            _ => break,
        }
    }
    InlineText {
        text: unescape_entities(&text),
        trailing_list,
    }
}

fn encode_span(node: &DocumentNode, out: &mut String) {
    let (start, end) = match node.tag {
        Tag::Code => (CODE_START, CODE_END),
        Tag::Strong => (STRONG_START, STRONG_END),
        _ => (EMPH_START, EMPH_END),
    };
    out.push(start);
    out.push_str(node.own_text());
    for child in &node.children {
        match &child.tag {
            Tag::Text => out.push_str(child.own_text()),
            tag if tag.is_inline_markup() => encode_span(child, out),
            Tag::Link | Tag::Image => out.push_str(&plain_text(child)),
            _ => {}
        }
    }
    out.push(end);
}

/// Concatenated descendant text with no markup at all.
pub fn plain_text(node: &DocumentNode) -> String {
    let mut out = String::new();
    collect_plain(node, &mut out);
    out
}

fn collect_plain(node: &DocumentNode, out: &mut String) {
    out.push_str(node.own_text());
    for child in &node.children {
        collect_plain(child, out);
    }
}

/// Unescape the named HTML entities plus decimal/hex numeric references.
pub fn unescape_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let Some(semi) = rest.find(';') else {
            out.push_str(rest);
            return out;
        };
        let entity = &rest[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric(entity),
        };
        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_numeric(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let value = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    char::from_u32(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        let cases = [
            "plain",
            "a <em>b</em> c",
            "<strong>s <em>e <code>c</code></em></strong> tail",
            "<code><code>nested</code></code>",
            "unbalanced <em>start only",
        ];
        for case in cases {
            assert_eq!(decode_tags(&encode_tags(case)), case);
        }
    }

    #[test]
    fn flatten_encodes_nested_spans() {
        let mut p = DocumentNode::with_text(Tag::Paragraph, "see ");
        let mut strong = DocumentNode::with_text(Tag::Strong, "very ");
        strong.push(DocumentNode::with_text(Tag::Emphasis, "deep"));
        p.push(strong);
        p.push(DocumentNode::text_run(" end"));

        let inline = flatten_inline(&p);
        assert_eq!(
            inline.text,
            format!("see {STRONG_START}very {EMPH_START}deep{EMPH_END}{STRONG_END} end")
        );
        assert!(inline.trailing_list.is_none());
    }

    #[test]
    fn trailing_list_is_reported_not_flattened() {
        let mut li = DocumentNode::with_text(Tag::ListItem, "item");
        let mut ul = DocumentNode::new(Tag::BulletList);
        ul.push(DocumentNode::with_text(Tag::ListItem, "nested"));
        li.push(ul);

        let inline = flatten_inline(&li);
        assert_eq!(inline.text, "item");
        assert_eq!(inline.trailing_list, Some(0));
    }

    #[test]
    fn links_flatten_to_their_label() {
        let mut p = DocumentNode::with_text(Tag::Paragraph, "go ");
        let mut a = DocumentNode::new(Tag::Link);
        a.set_attr("href", "https://example.org");
        a.push(DocumentNode::text_run("here"));
        p.push(a);

        assert_eq!(flatten_inline(&p).text, "go here");
    }

    #[test]
    fn block_child_is_not_inline() {
        let mut li = DocumentNode::new(Tag::ListItem);
        li.push(DocumentNode::new(Tag::Paragraph));
        assert!(!is_inline_text(&li));

        let mut p = DocumentNode::with_text(Tag::Paragraph, "x");
        p.push(DocumentNode::with_text(Tag::Emphasis, "y"));
        assert!(is_inline_text(&p));
    }

    #[test]
    fn entity_unescape() {
        assert_eq!(unescape_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(unescape_entities("&#65;&#x42;"), "AB");
        assert_eq!(unescape_entities("&bogus; stays"), "&bogus; stays");
        assert_eq!(unescape_entities("lone & amp"), "lone & amp");
    }
}
