//! DuckDuckGo HTML endpoint form parameters.

use doniyor_core::{SafeMode, TextSearchParams};

/// Form body for the first result page.
///
/// Field names follow the HTML endpoint: `q` query, `kl` region,
/// `kp` safe-search level, `b` empty marker the endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub q: String,
    pub kl: String,
    pub kp: &'static str,
    pub b: String,
}

impl From<&TextSearchParams> for SearchForm {
    fn from(params: &TextSearchParams) -> Self {
        Self {
            q: params.query_text.clone(),
            kl: params.region.clone(),
            kp: safe_mode_param(params.safe_mode),
            b: String::new(),
        }
    }
}

/// Form body for any result page: either the initial form or the hidden
/// fields of a "Next" form scraped from the previous page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageForm {
    First(SearchForm),
    Next(Vec<(String, String)>),
}

impl PageForm {
    /// Flatten into ordered name/value pairs for `reqwest::RequestBuilder::form`.
    pub fn fields(&self) -> Vec<(String, String)> {
        match self {
            PageForm::First(form) => vec![
                ("q".into(), form.q.clone()),
                ("kl".into(), form.kl.clone()),
                ("kp".into(), form.kp.into()),
                ("b".into(), form.b.clone()),
            ],
            PageForm::Next(fields) => fields.clone(),
        }
    }
}

/// Map the provider safe mode onto the endpoint's `kp` values.
pub fn safe_mode_param(mode: SafeMode) -> &'static str {
    match mode {
        SafeMode::Off => "-2",
        SafeMode::Moderate => "-1",
        SafeMode::Strict => "1",
    }
}
