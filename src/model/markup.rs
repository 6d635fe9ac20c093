// File: src/model/markup.rs
// Strips the small HTML-ish markup subset used in the listing and collects links.
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::{Display, EnumString};

/// Which hyperlink syntax a source uses. Older listings use plain anchors,
/// newer ones a `<link ...>` tag that may carry a numeric page reference.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MarkupDialect {
    #[default]
    Anchor,
    LinkTag,
}

/// Links in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkCollector {
    links: Vec<String>,
}

impl LinkCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, url: impl Into<String>) {
        self.links.push(url.into());
    }

    /// Drops repeated links, keeping the first occurrence of each.
    pub fn dedup(&mut self) {
        let mut seen = HashSet::new();
        self.links.retain(|l| seen.insert(l.clone()));
    }

    pub fn first(&self) -> Option<&str> {
        self.links.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.links
    }
}

impl<S: Into<String>> FromIterator<S> for LinkCollector {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            links: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Rewrite {
    /// Keep capture group 1.
    Inner,
    Newline,
    /// Group 1 is the href, group 2 the visible text.
    Anchor,
    /// Group 1 is a page reference or URL, group 2 the visible text.
    LinkTag,
}

struct MarkupRule {
    pattern: Lazy<Regex>,
    rewrite: Rewrite,
}

static BOLD: MarkupRule = MarkupRule {
    pattern: Lazy::new(|| Regex::new(r"<b>([^<]*)</b>").expect("valid markup rule")),
    rewrite: Rewrite::Inner,
};

static LINE_BREAK: MarkupRule = MarkupRule {
    pattern: Lazy::new(|| Regex::new(r"<br\s*/?>").expect("valid markup rule")),
    rewrite: Rewrite::Newline,
};

static ANCHOR: MarkupRule = MarkupRule {
    pattern: Lazy::new(|| {
        Regex::new(r#"<a href="([^ "]+)"[^>]*>([^<]+)</a>"#).expect("valid markup rule")
    }),
    rewrite: Rewrite::Anchor,
};

static LINK_TAG: MarkupRule = MarkupRule {
    pattern: Lazy::new(|| {
        Regex::new(r"<link\s+([^\s>]+)[^>]*>([^<]+)</link>").expect("valid markup rule")
    }),
    rewrite: Rewrite::LinkTag,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupExtractor {
    dialect: MarkupDialect,
    base_url: String,
}

impl MarkupExtractor {
    pub fn new(dialect: MarkupDialect, base_url: impl Into<String>) -> Self {
        Self {
            dialect,
            base_url: base_url.into(),
        }
    }

    fn rules(&self) -> [&'static MarkupRule; 3] {
        let link = match self.dialect {
            MarkupDialect::Anchor => &ANCHOR,
            MarkupDialect::LinkTag => &LINK_TAG,
        };
        [&BOLD, &LINE_BREAK, link]
    }

    /// Numeric references point at the club's page index, anything else is
    /// taken as a literal URL.
    pub fn resolve_reference(&self, reference: &str) -> String {
        if !reference.is_empty() && reference.chars().all(|c| c.is_ascii_digit()) {
            format!("{}?id={}", self.base_url, reference)
        } else {
            reference.to_string()
        }
    }

    /// Returns the plain text of `text` and appends every link found to
    /// `links` in encounter order. Unrecognized markup is left as is.
    pub fn extract(&self, text: Option<&str>, links: &mut LinkCollector) -> Option<String> {
        let mut current = text?.to_string();
        // Every replacement shortens the text, so this reaches a fixed point.
        // Repeating the pass makes the extraction idempotent for markup that
        // only becomes matchable after an inner tag was removed.
        loop {
            let next = self.apply_rules(&current, links);
            if next == current {
                return Some(current);
            }
            current = next;
        }
    }

    fn apply_rules(&self, text: &str, links: &mut LinkCollector) -> String {
        let mut out = text.to_string();
        for rule in self.rules() {
            out = rule
                .pattern
                .replace_all(&out, |caps: &Captures| self.rewrite(rule.rewrite, caps, links))
                .into_owned();
        }
        out
    }

    fn rewrite(&self, rewrite: Rewrite, caps: &Captures, links: &mut LinkCollector) -> String {
        let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();
        match rewrite {
            Rewrite::Inner => group(1).to_string(),
            Rewrite::Newline => "\n".to_string(),
            Rewrite::Anchor => {
                links.push(group(1));
                group(2).to_string()
            }
            Rewrite::LinkTag => {
                links.push(self.resolve_reference(group(1)));
                group(2).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_and_breaks() {
        let ex = MarkupExtractor::new(MarkupDialect::Anchor, "");
        let mut links = LinkCollector::new();
        let out = ex
            .extract(Some("<b>Fieldday</b><br>Zeltplatz<br />Nord<br/>Ende"), &mut links)
            .unwrap();
        assert_eq!(out, "Fieldday\nZeltplatz\nNord\nEnde");
        assert!(links.is_empty());
    }

    #[test]
    fn test_absent_text_is_noop() {
        let ex = MarkupExtractor::new(MarkupDialect::LinkTag, "http://www.example.org/");
        let mut links = LinkCollector::new();
        assert_eq!(ex.extract(None, &mut links), None);
        assert!(links.is_empty());
    }

    #[test]
    fn test_link_tag_reference_resolution() {
        let ex = MarkupExtractor::new(MarkupDialect::LinkTag, "http://www.example.org/");
        assert_eq!(
            ex.resolve_reference("123"),
            "http://www.example.org/?id=123"
        );
        assert_eq!(
            ex.resolve_reference("http://dl0ue.de/"),
            "http://dl0ue.de/"
        );
    }

    #[test]
    fn test_inactive_dialect_passes_through() {
        let ex = MarkupExtractor::new(MarkupDialect::Anchor, "http://www.example.org/");
        let mut links = LinkCollector::new();
        let text = "Siehe <link 42>Ausschreibung</link>";
        assert_eq!(ex.extract(Some(text), &mut links).unwrap(), text);
        assert!(links.is_empty());
    }

    #[test]
    fn test_nested_markup_reaches_fixed_point() {
        let ex = MarkupExtractor::new(MarkupDialect::Anchor, "");
        let mut links = LinkCollector::new();
        let once = ex.extract(Some("<b><br></b>Treffen"), &mut links).unwrap();
        assert_eq!(once, "\nTreffen");
        let twice = ex.extract(Some(&once), &mut links).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dialect_names() {
        assert_eq!(MarkupDialect::LinkTag.to_string(), "link-tag");
        assert_eq!("anchor".parse::<MarkupDialect>().unwrap(), MarkupDialect::Anchor);
    }
}
