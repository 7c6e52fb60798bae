//! Tokenizer backends for mdink.
//!
//! The render engine consumes the [`mdink_core::token::CodeTokenizer`]
//! trait; this crate provides the syntect-backed implementation used by
//! default. Alternative backends plug in at the same seam.

mod syntect;

pub use crate::syntect::SyntectTokenizer;
