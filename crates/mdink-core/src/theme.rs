//! Theme catalog and the per-render palette.
//!
//! A theme is five 256-color indices for headings, optionally five more
//! for code tokens. The catalog maps theme keys to entries; resolution
//! order is explicit request → environment → default. A theme whose color
//! list is not exactly five entries long never takes effect.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::token::TokenKind;

/// Default heading colors, brightest to dimmest.
pub const DEFAULT_HEADINGS: [u8; 5] = [231, 153, 117, 109, 65];
/// Warnings and lexer errors.
pub const DEFAULT_ALERT: u8 = 124;
/// Low-visibility decoration (rules, code gutters, links).
pub const DEFAULT_LOW: u8 = 59;
/// Background used for the inline-code swap.
pub const DEFAULT_BACKGROUND: u8 = 16;
/// Normal text.
pub const DEFAULT_TEXT: u8 = 188;
/// Code with no tokenizer at hand.
pub const DEFAULT_CODE: u8 = 102;

const TEXT_THEME_ENV: [&str; 2] = ["MDINK_THEME", "MDINK_STYLE"];
const CODE_THEME_ENV: [&str; 2] = ["MDINK_CODE_THEME", "MDINK_CODE_STYLE"];

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("malformed theme catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Deserialize)]
pub struct ThemeEntry {
    pub name: String,
    /// Heading colors. Only a length of exactly 5 is valid.
    pub ct: Vec<u8>,
    /// Code token colors; headings double for code when absent.
    #[serde(default)]
    pub code: Option<Vec<u8>>,
}

/// Which theme a render asks for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ThemeRequest {
    /// Environment lookup, then the per-slot default.
    #[default]
    Default,
    /// Uniform pick from the catalog.
    Random,
    Named(String),
}

impl ThemeRequest {
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("") => ThemeRequest::Default,
            Some("random") => ThemeRequest::Random,
            Some(name) => ThemeRequest::Named(name.to_string()),
        }
    }
}

/// The announced outcome of a successful resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeChoice {
    pub key: String,
    pub name: String,
}

#[derive(Clone, Debug, Default)]
pub struct ThemeCatalog {
    entries: BTreeMap<String, ThemeEntry>,
}

impl ThemeCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: BTreeMap<String, ThemeEntry> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// The catalog shipped with the crate. A build that corrupted the
    /// embedded asset surfaces as an empty catalog, which resolution
    /// treats as "no themes": defaults stay.
    pub fn builtin() -> Self {
        Self::from_json(include_str!("../assets/themes.json")).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&ThemeEntry> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Resolve a request to five colors, or `None` to leave the palette
    /// untouched. `for_code` switches the environment variables, the
    /// default (text falls back to `random`, code to "no change") and
    /// which color list of the entry applies.
    pub fn resolve(
        &self,
        request: &ThemeRequest,
        for_code: bool,
    ) -> Option<(ThemeChoice, [u8; 5])> {
        let env_names = if for_code { CODE_THEME_ENV } else { TEXT_THEME_ENV };
        let mut request = request.clone();
        if request == ThemeRequest::Default {
            for name in env_names {
                if let Ok(value) = std::env::var(name) {
                    if !value.is_empty() {
                        request = ThemeRequest::from_arg(Some(value.as_str()));
                        break;
                    }
                }
            }
        }
        if request == ThemeRequest::Default {
            if for_code {
                return None;
            }
            request = ThemeRequest::Random;
        }

        let key = match request {
            ThemeRequest::Named(name) => name,
            ThemeRequest::Random => {
                if self.entries.is_empty() {
                    return None;
                }
                let idx = fastrand::usize(..self.entries.len());
                self.entries.keys().nth(idx)?.clone()
            }
            ThemeRequest::Default => unreachable!("rewritten above"),
        };

        let entry = self.get(&key)?;
        let list = if for_code {
            entry.code.as_ref().unwrap_or(&entry.ct)
        } else {
            &entry.ct
        };
        let colors: [u8; 5] = list.as_slice().try_into().ok()?;
        log::debug!(
            "theme{} resolved: {} ({})",
            if for_code { " (code)" } else { "" },
            key,
            entry.name
        );
        Some((
            ThemeChoice {
                key,
                name: entry.name.clone(),
            },
            colors,
        ))
    }
}

/// The ten active colors plus the fixed decoration colors for one render.
/// Built once per invocation and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub headings: [u8; 5],
    pub code: [u8; 5],
    pub text: u8,
    pub low: u8,
    pub alert: u8,
    pub code_fallback: u8,
    pub background: u8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            headings: DEFAULT_HEADINGS,
            code: DEFAULT_HEADINGS,
            text: DEFAULT_TEXT,
            low: DEFAULT_LOW,
            alert: DEFAULT_ALERT,
            code_fallback: DEFAULT_CODE,
            background: DEFAULT_BACKGROUND,
        }
    }
}

impl Palette {
    /// Build the palette for one render, resolving both theme slots.
    /// Returns the choices alongside so a caller can announce them.
    pub fn resolve(
        catalog: &ThemeCatalog,
        text_theme: &ThemeRequest,
        code_theme: &ThemeRequest,
    ) -> (Self, Option<ThemeChoice>, Option<ThemeChoice>) {
        let mut palette = Self::default();
        let text_choice = catalog.resolve(text_theme, false).map(|(choice, colors)| {
            palette.headings = colors;
            choice
        });
        let code_choice = catalog.resolve(code_theme, true).map(|(choice, colors)| {
            palette.code = colors;
            choice
        });
        (palette, text_choice, code_choice)
    }

    /// Heading color for a level; levels 6–8 clamp to the deepest slot.
    pub fn heading(&self, level: u8) -> u8 {
        let level = level.clamp(1, 5) as usize;
        self.headings[level - 1]
    }

    /// Hierarchy-rotated heading color: `H<((hierarchy - 2) mod 5) + 1>`.
    pub fn rotated(&self, hierarchy: usize) -> u8 {
        let idx = (hierarchy as i64 - 2).rem_euclid(5) as usize;
        self.headings[idx]
    }

    /// Category → color map for code tokens. `None` passes through
    /// uncolored.
    pub fn token_color(&self, kind: TokenKind) -> Option<u8> {
        match kind {
            TokenKind::Keyword => Some(self.code[2]),
            TokenKind::Name => Some(self.code[0]),
            TokenKind::Comment => Some(self.low),
            TokenKind::Str => Some(self.code[3]),
            TokenKind::Error => Some(self.alert),
            TokenKind::Number => Some(self.code[3]),
            TokenKind::Operator => Some(self.code[4]),
            TokenKind::Generic => Some(self.code[1]),
            TokenKind::Text => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn catalog() -> ThemeCatalog {
        ThemeCatalog::from_json(
            r#"{
                "ocean": {"name": "Ocean", "ct": [15, 45, 39, 33, 27]},
                "short": {"name": "Too Short", "ct": [1, 2, 3]},
                "long": {"name": "Too Long", "ct": [1, 2, 3, 4, 5, 6]},
                "coded": {"name": "Coded", "ct": [9, 8, 7, 6, 5], "code": [5, 4, 3, 2, 1]}
            }"#,
        )
        .expect("test catalog")
    }

    fn clear_env() {
        for name in TEXT_THEME_ENV.iter().chain(CODE_THEME_ENV.iter()) {
            unsafe { std::env::remove_var(name) };
        }
    }

    #[test]
    #[serial]
    fn exactly_five_colors_apply_in_order() {
        clear_env();
        let catalog = catalog();
        let request = ThemeRequest::Named("ocean".into());
        let (choice, colors) = catalog.resolve(&request, false).expect("ocean resolves");
        assert_eq!(choice.name, "Ocean");
        assert_eq!(colors, [15, 45, 39, 33, 27]);
    }

    #[test]
    #[serial]
    fn wrong_arity_and_unknown_names_are_noops() {
        clear_env();
        let catalog = catalog();
        for name in ["short", "long", "no-such-theme"] {
            let request = ThemeRequest::Named(name.into());
            assert!(catalog.resolve(&request, false).is_none(), "{name}");
        }
    }

    #[test]
    #[serial]
    fn code_default_is_no_change_text_default_is_random() {
        clear_env();
        let catalog = catalog();
        assert!(catalog.resolve(&ThemeRequest::Default, true).is_none());
        // text default rolls a random theme; only the 5-color entries can
        // win, so retry until one lands.
        let (_, colors) = (0..64)
            .find_map(|_| catalog.resolve(&ThemeRequest::Default, false))
            .expect("random eventually hits a valid entry");
        assert_eq!(colors.len(), 5);
    }

    #[test]
    #[serial]
    fn environment_overrides_the_default() {
        clear_env();
        let catalog = catalog();
        unsafe { std::env::set_var("MDINK_CODE_THEME", "coded") };
        let (choice, colors) = catalog
            .resolve(&ThemeRequest::Default, true)
            .expect("env theme resolves");
        assert_eq!(choice.key, "coded");
        assert_eq!(colors, [5, 4, 3, 2, 1]);
        clear_env();
    }

    #[test]
    #[serial]
    fn explicit_request_beats_environment() {
        clear_env();
        unsafe { std::env::set_var("MDINK_THEME", "coded") };
        let catalog = catalog();
        let request = ThemeRequest::Named("ocean".into());
        let (choice, _) = catalog.resolve(&request, false).expect("ocean resolves");
        assert_eq!(choice.key, "ocean");
        clear_env();
    }

    #[test]
    fn rotation_and_clamping() {
        let palette = Palette::default();
        assert_eq!(palette.heading(1), DEFAULT_HEADINGS[0]);
        assert_eq!(palette.heading(6), DEFAULT_HEADINGS[4]);
        assert_eq!(palette.heading(8), DEFAULT_HEADINGS[4]);
        assert_eq!(palette.rotated(2), DEFAULT_HEADINGS[0]);
        assert_eq!(palette.rotated(4), DEFAULT_HEADINGS[2]);
        assert_eq!(palette.rotated(0), DEFAULT_HEADINGS[3]);
        assert_eq!(palette.rotated(7), DEFAULT_HEADINGS[0]);
    }

    #[test]
    fn builtin_catalog_parses() {
        let catalog = ThemeCatalog::builtin();
        assert!(!catalog.is_empty());
        for key in catalog.keys() {
            let entry = catalog.get(key).expect("key present");
            assert_eq!(entry.ct.len(), 5, "builtin theme {key} must be valid");
        }
    }
}
