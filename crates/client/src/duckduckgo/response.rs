//! DuckDuckGo HTML result page parsing.
//!
//! Each organic result becomes a raw record `{title, href, body}`. Sponsored
//! blocks are skipped and redirect links are unwrapped to their targets.

use doniyor_core::RawRecord;
use scraper::{ElementRef, Html, Selector};
use serde_json::json;
use url::Url;

/// One parsed result page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPage {
    /// Raw records in page order.
    pub records: Vec<RawRecord>,
    /// Hidden fields of the "Next" form, if the page has one.
    pub next_page: Option<Vec<(String, String)>>,
}

impl ResultPage {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse a result page.
///
/// Returns `None` when the body does not look like a result page at all
/// (no results container and no explicit "no results" marker).
pub fn parse_page(html: &str) -> Option<ResultPage> {
    let document = Html::parse_document(html);
    let container = Selector::parse("#links, div.results, div.serp__results").expect("invalid selector");
    let no_results = Selector::parse("div.no-results").expect("invalid selector");

    if document.select(&no_results).next().is_some() {
        return Some(ResultPage::default());
    }

    if document.select(&container).next().is_none() {
        return None;
    }

    let result = Selector::parse("div.result").expect("invalid selector");
    let records = document.select(&result).filter(|el| !is_ad(el)).filter_map(parse_result).collect();

    Some(ResultPage { records, next_page: next_page_fields(&document) })
}

fn is_ad(element: &ElementRef<'_>) -> bool {
    element.value().classes().any(|class| class == "result--ad")
}

fn parse_result(element: ElementRef<'_>) -> Option<RawRecord> {
    let title_link = Selector::parse("a.result__a").expect("invalid selector");
    let snippet = Selector::parse(".result__snippet").expect("invalid selector");

    let link = element.select(&title_link).next()?;
    let title = element_text(&link);
    let href = link.value().attr("href").map(unwrap_redirect).unwrap_or_default();
    let body = element.select(&snippet).next().map(|el| element_text(&el)).unwrap_or_default();

    Some(json!({ "title": title, "href": href, "body": body }))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Resolve a result link to the page it points at.
///
/// The endpoint wraps targets as `//duckduckgo.com/l/?uddg=<encoded>&rut=...`.
/// Protocol-relative links get `https:`. Anything unparseable is returned as-is.
pub fn unwrap_redirect(href: &str) -> String {
    let href = href.trim();
    let absolute = if href.starts_with("//") { format!("https:{href}") } else { href.to_string() };

    let Ok(url) = Url::parse(&absolute) else {
        return absolute;
    };

    let is_redirect = url.host_str().is_some_and(|host| host.ends_with("duckduckgo.com")) && url.path() == "/l/";
    if is_redirect
        && let Some((_, target)) = url.query_pairs().find(|(key, _)| key == "uddg")
    {
        return target.into_owned();
    }

    absolute
}

/// Hidden inputs of the form whose submit button reads "Next".
fn next_page_fields(document: &Html) -> Option<Vec<(String, String)>> {
    let form = Selector::parse("div.nav-link form").expect("invalid selector");
    let submit = Selector::parse("input[type=submit]").expect("invalid selector");
    let hidden = Selector::parse("input[type=hidden]").expect("invalid selector");

    let next_form = document.select(&form).find(|f| {
        f.select(&submit)
            .any(|input| input.value().attr("value").is_some_and(|v| v.trim().eq_ignore_ascii_case("next")))
    })?;

    let fields: Vec<(String, String)> = next_form
        .select(&hidden)
        .filter_map(|input| {
            let name = input.value().attr("name")?;
            Some((name.to_string(), input.value().attr("value").unwrap_or_default().to_string()))
        })
        .collect();

    if fields.is_empty() { None } else { Some(fields) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<div class="serp__results">
  <div id="links" class="results">
    <div class="result results_links results_links_deep result--ad">
      <h2 class="result__title"><a class="result__a" href="https://ads.example/click">Sponsored thing</a></h2>
      <a class="result__snippet" href="https://ads.example/click">Buy now</a>
    </div>
    <div class="result results_links results_links_deep web-result">
      <h2 class="result__title">
        <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&amp;rut=abc">Rust &amp; <b>Cargo</b></a>
      </h2>
      <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F">A language   empowering
        everyone.</a>
    </div>
    <div class="result results_links results_links_deep web-result">
      <h2 class="result__title"><a rel="nofollow" class="result__a" href="https://doc.rust-lang.org/book/">The Book</a></h2>
    </div>
    <div class="result results_links results_links_deep web-result">
      <h2 class="result__title">No link here</h2>
    </div>
    <div class="nav-link">
      <form action="/html/" method="post">
        <input type="submit" class="btn btn--alt" value="Next" />
        <input type="hidden" name="q" value="rust" />
        <input type="hidden" name="s" value="10" />
        <input type="hidden" name="dc" value="11" />
        <input type="hidden" name="kl" value="us-en" />
      </form>
    </div>
  </div>
</div>
</body>
</html>"#;

    #[test]
    fn test_parse_page_records() {
        let page = parse_page(FIXTURE_HTML).unwrap();
        assert_eq!(page.records.len(), 2);

        let first = &page.records[0];
        assert_eq!(first["title"], "Rust & Cargo");
        assert_eq!(first["href"], "https://www.rust-lang.org/");
        assert!(first["body"].as_str().unwrap().starts_with("A language"));

        let second = &page.records[1];
        assert_eq!(second["href"], "https://doc.rust-lang.org/book/");
        assert_eq!(second["body"], "");
    }

    #[test]
    fn test_parse_page_skips_ads() {
        let page = parse_page(FIXTURE_HTML).unwrap();
        assert!(page.records.iter().all(|r| r["href"] != "https://ads.example/click"));
    }

    #[test]
    fn test_parse_page_next_form() {
        let page = parse_page(FIXTURE_HTML).unwrap();
        let next = page.next_page.unwrap();
        assert!(next.contains(&("s".to_string(), "10".to_string())));
        assert!(next.contains(&("q".to_string(), "rust".to_string())));
        assert_eq!(next.len(), 4);
    }

    #[test]
    fn test_previous_only_form_is_not_next() {
        let html = r#"<html><body><div id="links">
            <div class="nav-link"><form action="/html/" method="post">
              <input type="submit" value="Previous" />
              <input type="hidden" name="s" value="0" />
            </form></div>
        </div></body></html>"#;

        let page = parse_page(html).unwrap();
        assert!(page.is_empty());
        assert!(page.next_page.is_none());
    }

    #[test]
    fn test_parse_no_results_page() {
        let html = r#"<html><body><div class="no-results">No results.</div></body></html>"#;
        let page = parse_page(html).unwrap();
        assert!(page.is_empty());
        assert!(page.next_page.is_none());
    }

    #[test]
    fn test_parse_unrecognized_page() {
        assert!(parse_page("<html><body><p>Unexpected challenge</p></body></html>").is_none());
        assert!(parse_page("").is_none());
    }

    #[test]
    fn test_unwrap_redirect() {
        assert_eq!(
            unwrap_redirect("//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc&rut=x"),
            "https://example.com/a?b=c"
        );
        assert_eq!(unwrap_redirect("//example.com/page"), "https://example.com/page");
        assert_eq!(unwrap_redirect(" https://plain.example/ "), "https://plain.example/");
        assert_eq!(unwrap_redirect("https://duckduckgo.com/l/?rut=only"), "https://duckduckgo.com/l/?rut=only");
        assert_eq!(unwrap_redirect("not a url"), "not a url");
    }
}
