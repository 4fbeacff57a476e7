//! Markdown to HTML fragment rendering.

pub mod linkify;

use crate::config::RenderConfig;
use pulldown_cmark::{html, Event, Options, Parser};

pub use linkify::LinkifyTransformer;

/// Markdown renderer with a fixed configuration
///
/// Output is an HTML fragment (no `<html>`/`<body>` wrapper). Singleton
/// tags are always self-closed, so the fragment can be embedded in an
/// XHTML document as-is. Rendering never fails: malformed markdown just
/// renders to whatever CommonMark makes of it.
#[derive(Debug, Clone)]
pub struct MarkupRenderer {
    options: Options,
    config: RenderConfig,
}

impl MarkupRenderer {
    pub fn new(config: RenderConfig) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        if config.typographer {
            options.insert(Options::ENABLE_SMART_PUNCTUATION);
        }

        Self { options, config }
    }

    /// Convert markdown to an HTML fragment
    pub fn render(&self, markdown: &str) -> String {
        let events: Vec<Event> = Parser::new_ext(markdown, self.options).collect();

        let events = if self.config.raw_html {
            events
        } else {
            escape_raw_html(events)
        };

        let events = if self.config.linkify {
            LinkifyTransformer::new().transform(events)
        } else {
            events
        };

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }
}

impl Default for MarkupRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

/// Demote raw HTML to text so the writer escapes it
fn escape_raw_html(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    events
        .into_iter()
        .map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        })
        .collect()
}
