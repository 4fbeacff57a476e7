//! XHTML document composition.

use crate::title::extract_title;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

const DOCTYPE: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN"
  "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">"#;

const HTML_OPEN: &str = r#"<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="en" lang="en">"#;

const CONTENT_TYPE_META: &str =
    r#"<meta http-equiv="Content-Type" content="text/html; charset=UTF-8" />"#;

/// A rendered fragment plus the title it will be published under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub body: String,
}

impl Document {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Build a document whose title comes from the fragment's first `<h1>`
    pub fn from_fragment(fragment: impl Into<String>) -> Self {
        let body = fragment.into();
        let title = extract_title(&body);
        Self { title, body }
    }

    /// Serialize to the final XHTML text. Deterministic for equal documents.
    pub fn render(&self) -> String {
        compose(&self.body, &self.title)
    }
}

/// Wrap `fragment` in a strict XHTML 1.0 document titled `title`.
///
/// Neither argument is escaped: the fragment is expected to be valid
/// markup already, and the title is taken from that same markup.
pub fn compose(fragment: &str, title: &str) -> String {
    format!(
        "{XML_DECLARATION}\n\
         {DOCTYPE}\n\
         {HTML_OPEN}\n\
         <head>\n  \
         {CONTENT_TYPE_META}\n  \
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         {fragment}\n\
         </body>\n\
         </html>"
    )
}
