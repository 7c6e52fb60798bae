//! The recursive block formatter: one handler per tag, selected by
//! pattern match, with a plain-colored fallback for anything unknown.

use mdink_core::ansi;
use mdink_core::markers;
use mdink_core::node::{DocumentNode, Tag};
use mdink_core::wrap;

use crate::code;
use crate::config::RenderConfig;
use crate::rule;
use crate::table;

pub(crate) const HR_SEP: char = '─';
pub(crate) const TXT_BLOCK_CUT: char = '✂';
pub(crate) const CODE_PREFIX: &str = "| ";
pub(crate) const LIST_PREFIX: &str = "- ";
pub(crate) const HR_ENDS: char = '◈';
pub(crate) const ADMON_BAR: &str = "┃ ";
pub(crate) const LEFT_INDENT: &str = "  ";

/// Per-descent state; a fresh context is built for every recursive call.
pub(crate) struct Context<'a> {
    pub hierarchy: usize,
    /// First-line prefix assigned by the parent list container.
    pub prefix: Option<String>,
    pub parent: Option<&'a DocumentNode>,
}

impl Context<'_> {
    fn root() -> Self {
        Context {
            hierarchy: 0,
            prefix: None,
            parent: None,
        }
    }
}

pub(crate) struct Renderer<'a> {
    pub config: &'a RenderConfig,
}

/// Walk the tree into rendered buffer entries. Entries may span several
/// physical lines; the caller joins them with newlines.
pub(crate) fn render_tree(root: &DocumentNode, config: &RenderConfig) -> Vec<String> {
    let mut out = Vec::new();
    Renderer { config }.walk(root, &Context::root(), &mut out);
    out
}

enum AdmonColor {
    Heading(u8),
    Alert,
}

/// Fixed admonition keyword table. Unknown keywords are accepted and get
/// the `note` color.
static ADMONITIONS: [(&str, AdmonColor); 9] = [
    ("note", AdmonColor::Heading(3)),
    ("warning", AdmonColor::Alert),
    ("attention", AdmonColor::Heading(1)),
    ("hint", AdmonColor::Heading(4)),
    ("summary", AdmonColor::Heading(1)),
    ("question", AdmonColor::Heading(5)),
    ("danger", AdmonColor::Alert),
    ("dev", AdmonColor::Heading(5)),
    ("caution", AdmonColor::Heading(2)),
];

/// `rest` is the text after `"!!! "`. Returns the keyword (matched by
/// prefix, or the first word when unrecognized) and its color.
fn admonition(rest: &str) -> (String, &'static AdmonColor) {
    for (keyword, color) in &ADMONITIONS {
        if rest.starts_with(keyword) {
            return (keyword.to_string(), color);
        }
    }
    let keyword = rest.split(' ').next().unwrap_or("").to_string();
    (keyword, &ADMONITIONS[0].1)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Renderer<'_> {
    pub(crate) fn walk(&self, node: &DocumentNode, ctx: &Context<'_>, out: &mut Vec<String>) {
        match &node.tag {
            Tag::Rule => out.push(rule::placeholder(ctx.hierarchy, &self.config.palette)),
            Tag::Table => table::render(self, node, ctx.hierarchy, out),
            // inline code is consumed by the marker codec, so a code node
            // reaching dispatch is always a block
            Tag::Code => {
                let lang = node.attr("class");
                let lang = (!lang.is_empty()).then_some(lang);
                out.push(code::format_block(
                    node.own_text(),
                    lang,
                    ctx.hierarchy,
                    self.config,
                ));
            }
            _ if self.is_text_bearing(node) => self.format_text(node, ctx, out),
            _ => self.walk_children(node, ctx.hierarchy, out),
        }
    }

    fn is_text_bearing(&self, node: &DocumentNode) -> bool {
        !node.own_text().is_empty()
            || node.tag.heading_level().is_some()
            || matches!(
                node.tag,
                Tag::Paragraph | Tag::ListItem | Tag::Link | Tag::Image | Tag::Text
            )
    }

    fn format_text(&self, node: &DocumentNode, ctx: &Context<'_>, out: &mut Vec<String>) {
        let palette = &self.config.palette;
        let inline = markers::is_inline_text(node);
        let (text, trailing_list) = if inline {
            let flat = markers::flatten_inline(node);
            (flat.text, flat.trailing_list)
        } else {
            (node.own_text().to_string(), None)
        };
        let mut text = text.trim().to_string();

        let mut admon_color = None;
        let mut pref = String::new();
        let mut body_pref = String::new();
        if let Some(rest) = text.strip_prefix("!!! ") {
            let rest = rest.to_string();
            let (keyword, color) = admonition(&rest);
            pref = format!("{ADMON_BAR}{}", capitalize(&keyword));
            body_pref = ADMON_BAR.to_string();
            text = rest.strip_prefix(keyword.as_str()).unwrap_or("").to_string();
            admon_color = Some(match color {
                AdmonColor::Heading(level) => palette.heading(*level),
                AdmonColor::Alert => palette.alert,
            });
        }

        // a list annotation from the parent container wins over the
        // admonition prefix; continuation lines align under it
        if let Some(annotation) = &ctx.prefix {
            pref = annotation.clone();
            body_pref = " ".repeat(pref.chars().count());
        }

        let mut hierarchy = ctx.hierarchy;
        let mut indent = LEFT_INDENT.repeat(hierarchy);
        if let Some(level) = node.tag.heading_level() {
            indent = " ".repeat((level as usize).saturating_sub(1));
            hierarchy += level as usize;
        }

        let text = wrap::reflow(&text, false, self.config.columns, &indent, &pref);

        if let Some(color) = admon_color {
            out.push("\n".to_string());
            pref = ansi::colorize(&pref, color, palette);
            body_pref = ansi::colorize(&body_pref, color, palette);
        } else if !pref.is_empty() {
            let ordinal = pref
                .split('.')
                .next()
                .is_some_and(|head| !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()));
            if pref == LIST_PREFIX || ordinal {
                pref = ansi::colorize(&pref, palette.rotated(hierarchy), palette);
            }
        }

        let continuation = format!("\n{indent}{body_pref}");
        let joined = text.split('\n').collect::<Vec<_>>().join(&continuation);
        let assembled = format!("{indent}{pref}{joined}");

        // a paragraph inside a text-less list item continues the bullet
        // line instead of opening a new one
        let fixup = node.tag == Tag::Paragraph
            && ctx
                .parent
                .is_some_and(|p| p.tag == Tag::ListItem && p.own_text().is_empty());

        let rendered = if fixup {
            self.style_tag(node, assembled.trim_start())
        } else {
            self.style_tag(node, &assembled)
        };
        if fixup && !out.is_empty() {
            let last = out.len() - 1;
            out[last].push_str(&rendered);
        } else {
            out.push(rendered);
        }

        if self.config.show_links {
            for key in ["src", "href"] {
                if node.has_attr(key) {
                    if let Some(last) = out.last_mut() {
                        last.push_str(&ansi::low(&format!("({}) ", node.attr(key)), palette));
                    }
                }
            }
        }
        if admon_color.is_some() {
            out.push("\n".to_string());
        }

        if inline {
            // an inline-consumed list item re-enters a trailing nested
            // list one level deeper; its other children are spent
            if node.tag == Tag::ListItem {
                if let Some(idx) = trailing_list {
                    let child_ctx = Context {
                        hierarchy: hierarchy + 1,
                        prefix: None,
                        parent: Some(node),
                    };
                    self.walk(&node.children[idx], &child_ctx, out);
                }
            }
            return;
        }
        self.walk_children(node, hierarchy, out);
    }

    fn style_tag(&self, node: &DocumentNode, text: &str) -> String {
        let palette = &self.config.palette;
        match &node.tag {
            Tag::Heading(level) => {
                format!("\n{}", ansi::colorize(text, palette.heading(*level), palette))
            }
            Tag::Link => ansi::low(text, palette),
            _ => ansi::plain(text, palette),
        }
    }

    pub(crate) fn walk_children(
        &self,
        node: &DocumentNode,
        hierarchy: usize,
        out: &mut Vec<String>,
    ) {
        let mut ordinal = 0usize;
        for child in &node.children {
            let prefix = match node.tag {
                Tag::BulletList => Some(LIST_PREFIX.to_string()),
                Tag::OrderedList => {
                    ordinal += 1;
                    Some(format!("{ordinal}. "))
                }
                _ => None,
            };
            let ctx = Context {
                hierarchy: hierarchy + 1,
                prefix,
                parent: Some(node),
            };
            self.walk(child, &ctx, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admonition_table_is_prefix_matched() {
        let (k, _) = admonition("note: careful");
        assert_eq!(k, "note");
        // startswith semantics: "notes" still matches "note"
        let (k, _) = admonition("notes on things");
        assert_eq!(k, "note");
    }

    #[test]
    fn unknown_admonition_keyword_is_accepted() {
        let (k, color) = admonition("custom: something");
        assert_eq!(k, "custom:");
        assert!(matches!(*color, AdmonColor::Heading(3)));
    }

    #[test]
    fn capitalize_first_char_only() {
        assert_eq!(capitalize("warning"), "Warning");
        assert_eq!(capitalize(""), "");
    }
}
