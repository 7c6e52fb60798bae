use std::sync::Arc;

use mdink_core::theme::{Palette, ThemeCatalog, ThemeChoice, ThemeRequest};
use mdink_core::token::CodeTokenizer;

/// Everything one render invocation needs, built once up front and
/// read-only afterwards. There is no process-global state: concurrent
/// renders each own their config.
#[derive(Clone)]
pub struct RenderConfig {
    /// Terminal width the output is laid out for.
    pub columns: usize,
    /// The ten active colors plus fixed decoration colors.
    pub palette: Palette,
    /// Append `(url)` after nodes carrying an href/src attribute.
    pub show_links: bool,
    /// Strip every escape sequence from the final string.
    pub no_color: bool,
    /// Tabs are expanded to this many spaces before parsing.
    pub tab_width: usize,
    /// Code tokenizer; `None` renders code blocks uncolored.
    pub tokenizer: Option<Arc<dyn CodeTokenizer + Send + Sync>>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            columns: 80,
            palette: Palette::default(),
            show_links: false,
            no_color: false,
            tab_width: 4,
            tokenizer: None,
        }
    }
}

impl RenderConfig {
    /// Resolve both theme slots against `catalog` and install the result.
    /// Returns the choices so a caller can announce them.
    pub fn resolve_themes(
        &mut self,
        catalog: &ThemeCatalog,
        text: &ThemeRequest,
        code: &ThemeRequest,
    ) -> (Option<ThemeChoice>, Option<ThemeChoice>) {
        let (palette, text_choice, code_choice) = Palette::resolve(catalog, text, code);
        self.palette = palette;
        (text_choice, code_choice)
    }
}
