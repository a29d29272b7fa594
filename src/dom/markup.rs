use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ID_ATTR: Regex = Regex::new(r#"<[A-Za-z][^<>]*?\sid\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap();
}

/// Ids of every element declared in `markup`, in document order.
pub fn element_ids(markup: &str) -> Vec<String> {
    ID_ATTR
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}

/// Only `#id` selectors are supported.
pub fn selector_id(selector: &str) -> Option<&str> {
    selector
        .strip_prefix('#')
        .filter(|id| !id.is_empty() && !id.contains(char::is_whitespace))
}

pub fn contains_selector(markup: &str, selector: &str) -> bool {
    selector_id(selector).is_some_and(|id| element_ids(markup).iter().any(|found| found == id))
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn inline_error(message: &str) -> String {
    format!(
        r#"<div class="route-error" id="route-error" role="alert">{}</div>"#,
        escape_html(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_ids_with_either_quote_style() {
        let markup = r#"<section id="feed-view"><button id='player-play'>x</button><div data-id="nope"></div></section>"#;
        assert_eq!(element_ids(markup), vec!["feed-view", "player-play"]);
    }

    #[test]
    fn id_text_outside_tags_is_not_an_element() {
        let markup = r#"<p> id="x"</p><p class="a" id="y">id='z'</p>"#;
        assert_eq!(element_ids(markup), vec!["y"]);
        assert!(!contains_selector(markup, "#x"));
    }

    #[test]
    fn selector_must_be_an_id() {
        assert_eq!(selector_id("#app"), Some("app"));
        assert_eq!(selector_id(".app"), None);
        assert_eq!(selector_id("#"), None);
        assert!(contains_selector(r#"<main id="lists-view"></main>"#, "#lists-view"));
        assert!(!contains_selector(r#"<main id="lists-view"></main>"#, "#feed-view"));
    }

    #[test]
    fn inline_error_is_escaped() {
        let html = inline_error("<b>down</b>");
        assert!(html.contains("&lt;b&gt;down&lt;/b&gt;"));
        assert!(contains_selector(&html, "#route-error"));
    }
}
