//! `mdink-core` provides the leaf building blocks of the mdink renderer.
//!
//! The render engine itself lives in the `mdink` crate; tokenizer backends
//! live in `mdink-syntax`. This crate is the shared vocabulary:
//!
//! - [`node`]: the document tree the renderer walks.
//! - [`theme`]: theme catalog, resolution and the per-render [`theme::Palette`].
//! - [`markers`]: the inline marker codec keeping emphasis/strong/inline
//!   code intact through reflow.
//! - [`wrap`]: width-aware reflow.
//! - [`ansi`]: SGR helpers and marker-span recoloring.
//! - [`token`]: the `(category, literal)` token model and the
//!   [`token::CodeTokenizer`] seam for highlighting backends.
//!
//! Everything here is synchronous and I/O-free; the tree, tokens and theme
//! catalog arrive pre-loaded.

pub mod ansi;
pub mod markers;
pub mod node;
pub mod theme;
pub mod token;
pub mod wrap;
