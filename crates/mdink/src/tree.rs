//! pulldown-cmark event stream → [`DocumentNode`] tree.
//!
//! The parser is a collaborator, not part of the renderer: everything
//! downstream of this module works on the tree alone. Raw HTML is stashed
//! behind opaque `\x02N\x03` placeholders and restored verbatim after
//! formatting.

use mdink_core::markers::{STASH_END, STASH_START};
use mdink_core::node::{DocumentNode, Tag};
use pulldown_cmark::{
    CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag as MdTag, TagEnd,
};

use crate::code;
use crate::config::RenderConfig;

pub struct ParsedDocument {
    pub root: DocumentNode,
    /// Raw HTML runs referenced by stash placeholders in the tree.
    pub stash: Vec<String>,
}

/// Parse markdown into a document tree. Tabs are expanded to `tab_width`
/// spaces first.
pub fn parse_markdown(source: &str, tab_width: usize) -> ParsedDocument {
    let source = expand_tabs(source, tab_width.max(1));
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);

    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(&source, options) {
        builder.event(event);
    }
    builder.finish()
}

struct TreeBuilder {
    root: DocumentNode,
    /// Currently open containers, innermost last.
    stack: Vec<DocumentNode>,
    stash: Vec<String>,
    /// Accumulates a block-level HTML run until its end event.
    html_block: Option<String>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            root: DocumentNode::new(Tag::Document),
            stack: Vec::new(),
            stash: Vec::new(),
            html_block: None,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some(buf) = self.html_block.as_mut() {
                    buf.push_str(&text);
                } else {
                    self.push_text(&text);
                }
            }
            Event::Code(code) => {
                let top = self.top();
                top.push(DocumentNode::with_text(Tag::Code, code.into_string()));
            }
            Event::Html(html) | Event::InlineHtml(html) => match self.html_block.as_mut() {
                Some(buf) => buf.push_str(&html),
                None => {
                    let placeholder = self.stash_raw(html.into_string());
                    self.push_text(&placeholder);
                }
            },
            Event::SoftBreak | Event::HardBreak => self.push_text("\n"),
            Event::Rule => self.top().push(DocumentNode::new(Tag::Rule)),
            // math, footnotes and task lists stay disabled in the parser
            _ => {}
        }
    }

    fn start(&mut self, tag: MdTag<'_>) {
        let node = match tag {
            MdTag::Paragraph => DocumentNode::new(Tag::Paragraph),
            MdTag::Heading { level, .. } => DocumentNode::new(Tag::Heading(heading_level(level))),
            MdTag::BlockQuote(_) => DocumentNode::new(Tag::BlockQuote),
            MdTag::CodeBlock(kind) => {
                let mut code = DocumentNode::new(Tag::Code);
                if let CodeBlockKind::Fenced(info) = kind {
                    if let Some(lang) = normalize_fenced_lang(&info) {
                        code.set_attr("class", lang);
                    }
                }
                self.stack.push(DocumentNode::new(Tag::Pre));
                self.stack.push(code);
                return;
            }
            MdTag::List(start) => {
                if start.is_some() {
                    DocumentNode::new(Tag::OrderedList)
                } else {
                    DocumentNode::new(Tag::BulletList)
                }
            }
            MdTag::Item => DocumentNode::new(Tag::ListItem),
            MdTag::Table(_) => DocumentNode::new(Tag::Table),
            MdTag::TableHead => {
                // the head row arrives without a row wrapper
                self.stack.push(DocumentNode::new(Tag::TableHead));
                self.stack.push(DocumentNode::new(Tag::TableRow));
                return;
            }
            MdTag::TableRow => DocumentNode::new(Tag::TableRow),
            MdTag::TableCell => DocumentNode::new(Tag::TableCell),
            MdTag::Emphasis => DocumentNode::new(Tag::Emphasis),
            MdTag::Strong => DocumentNode::new(Tag::Strong),
            MdTag::Link { dest_url, .. } => {
                let mut node = DocumentNode::new(Tag::Link);
                node.set_attr("href", dest_url.into_string());
                node
            }
            MdTag::Image { dest_url, .. } => {
                let mut node = DocumentNode::new(Tag::Image);
                node.set_attr("src", dest_url.into_string());
                node
            }
            MdTag::HtmlBlock => {
                self.html_block = Some(String::new());
                return;
            }
            other => DocumentNode::new(Tag::Other(format!("{other:?}"))),
        };
        self.stack.push(node);
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::CodeBlock => {
                // pop the code node into its pre wrapper, then the pre
                self.close();
                self.close();
            }
            TagEnd::TableHead => {
                self.close(); // implicit head row
                self.close();
                self.stack.push(DocumentNode::new(Tag::TableBody));
            }
            TagEnd::Table => {
                if self
                    .stack
                    .last()
                    .is_some_and(|n| n.tag == Tag::TableBody)
                {
                    self.close();
                }
                self.close();
            }
            TagEnd::HtmlBlock => {
                if let Some(raw) = self.html_block.take() {
                    let placeholder = self.stash_raw(raw);
                    let node = DocumentNode::with_text(Tag::Paragraph, placeholder);
                    self.top().push(node);
                }
            }
            _ => self.close(),
        }
    }

    fn close(&mut self) {
        if let Some(node) = self.stack.pop() {
            self.top().push(node);
        }
    }

    fn top(&mut self) -> &mut DocumentNode {
        if self.stack.is_empty() {
            &mut self.root
        } else {
            let last = self.stack.len() - 1;
            &mut self.stack[last]
        }
    }

    fn push_text(&mut self, text: &str) {
        let top = self.top();
        if top.children.is_empty() {
            top.text.get_or_insert_with(String::new).push_str(text);
            return;
        }
        if let Some(last) = top.children.last_mut() {
            if last.tag == Tag::Text {
                last.text.get_or_insert_with(String::new).push_str(text);
                return;
            }
        }
        top.push(DocumentNode::text_run(text));
    }

    fn stash_raw(&mut self, raw: String) -> String {
        let placeholder = format!("{STASH_START}{}{STASH_END}", self.stash.len());
        self.stash.push(raw);
        placeholder
    }

    fn finish(mut self) -> ParsedDocument {
        while !self.stack.is_empty() {
            self.close();
        }
        ParsedDocument {
            root: self.root,
            stash: self.stash,
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn normalize_fenced_lang(lang: &CowStr<'_>) -> Option<String> {
    let raw = lang.trim();
    let first = raw.split_whitespace().next().unwrap_or("");
    let first = first.split(',').next().unwrap_or("").trim();
    if first.is_empty() {
        return None;
    }
    let first = first.strip_prefix("language-").unwrap_or(first);
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

fn expand_tabs(source: &str, tab_width: usize) -> String {
    if source.contains('\t') {
        source.replace('\t', &" ".repeat(tab_width))
    } else {
        source.to_string()
    }
}

/// Swap stash placeholders back in after formatting. Raw `<pre><code>`
/// blocks get the code treatment; everything else returns verbatim,
/// entity-unescaped.
pub(crate) fn restore_stash(text: String, stash: &[String], config: &RenderConfig) -> String {
    let mut out = text;
    for (index, raw) in stash.iter().enumerate() {
        let placeholder = format!("{STASH_START}{index}{STASH_END}");
        if !out.contains(&placeholder) {
            continue;
        }
        let raw = mdink_core::markers::unescape_entities(raw);
        let restored = match raw.trim_start().strip_prefix("<pre><code") {
            Some(rest) => {
                let (opening, body) = rest.split_once('>').unwrap_or(("", rest));
                let lang = opening
                    .split("class=\"")
                    .nth(1)
                    .and_then(|s| s.split('"').next())
                    .map(|s| s.strip_prefix("language-").unwrap_or(s));
                let body = body
                    .rsplit_once("</code>")
                    .map(|(inner, _)| inner)
                    .unwrap_or(body);
                code::format_block(body.trim(), lang, 2, config)
            }
            None => raw.clone(),
        };
        out = out.replace(&placeholder, &restored);
    }
    out
}
