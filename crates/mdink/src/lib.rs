//! `mdink` renders markdown as ANSI-colored text for the terminal.
//!
//! The pipeline: a parsed [`DocumentNode`] tree goes through the
//! recursive block formatter (themes, reflow, lists, admonitions, code
//! highlighting, table layout), rule placeholders are sized against the
//! final text, and one string of SGR sequences comes back.
//!
//! ## Minimal example
//!
//! ```rust
//! use mdink::{RenderConfig, render_markdown};
//!
//! let config = RenderConfig::default();
//! let out = render_markdown("# Hello\n\nSome *markdown*.", &config);
//! assert!(out.contains("Hello"));
//! ```
//!
//! Rendering is synchronous and I/O-free. All state lives in the
//! [`RenderConfig`] built per invocation, so concurrent renders do not
//! interfere.

mod code;
pub mod config;
pub mod hilite;
mod render;
mod rule;
mod table;
pub mod tree;
pub mod window;

pub use config::RenderConfig;
pub use hilite::{HiliteMode, code_hilite};
pub use mdink_core::node::{DocumentNode, Tag};
pub use mdink_core::theme::{Palette, ThemeCatalog, ThemeChoice, ThemeRequest};
pub use mdink_core::token::{CodeTokenizer, Token, TokenKind};
pub use tree::{ParsedDocument, parse_markdown};
pub use window::display_from;

use mdink_core::ansi;

/// Render a document tree.
pub fn render(root: &DocumentNode, config: &RenderConfig) -> String {
    finish(render::render_tree(root, config), &[], config)
}

/// Parse and render a markdown string.
pub fn render_markdown(source: &str, config: &RenderConfig) -> String {
    let doc = tree::parse_markdown(source, config.tab_width);
    finish(render::render_tree(&doc.root, config), &doc.stash, config)
}

fn finish(lines: Vec<String>, stash: &[String], config: &RenderConfig) -> String {
    let joined = lines.join("\n");
    let restored = tree::restore_stash(joined, stash, config);
    let sized = rule::size_rules(&restored, config.columns);
    let out = format!("{sized}\n");
    if config.no_color { ansi::strip(&out) } else { out }
}
