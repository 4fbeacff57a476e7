//! Autolinking of bare URLs in running text.

use once_cell::sync::Lazy;
use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<>]+").expect("valid url regex"));

/// Characters that end a sentence rather than a URL
const TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"', '*', '_'];

/// Closing brackets, stripped only when the URL leaves them unbalanced
const BRACKETS: &[(char, char)] = &[('(', ')'), ('[', ']'), ('{', '}')];

/// Transformer that turns `https://...`, `http://...` and `www....` text
/// into links. Text already inside a link (markdown or raw `<a>`), an image
/// or a code block is left alone.
pub struct LinkifyTransformer;

impl LinkifyTransformer {
    pub fn new() -> Self {
        Self
    }

    pub fn transform<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut result = Vec::with_capacity(events.len());
        let mut pending = String::new();
        let mut opaque_depth = 0usize;
        let mut in_code_block = false;

        for event in events {
            if let Event::Text(text) = &event {
                if opaque_depth == 0 && !in_code_block {
                    // Merge consecutive text so URLs split across events still match
                    pending.push_str(text.as_ref());
                    continue;
                }
            }

            flush(&mut pending, &mut result);

            match &event {
                Event::Start(Tag::Link { .. }) | Event::Start(Tag::Image { .. }) => {
                    opaque_depth += 1
                }
                Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                    opaque_depth = opaque_depth.saturating_sub(1)
                }
                Event::InlineHtml(raw) => match anchor_tag(raw) {
                    Some(AnchorTag::Open) => opaque_depth += 1,
                    Some(AnchorTag::Close) => opaque_depth = opaque_depth.saturating_sub(1),
                    None => {}
                },
                Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
                Event::End(TagEnd::CodeBlock) => in_code_block = false,
                _ => {}
            }
            result.push(event);
        }

        flush(&mut pending, &mut result);
        result
    }
}

impl Default for LinkifyTransformer {
    fn default() -> Self {
        Self::new()
    }
}

enum AnchorTag {
    Open,
    Close,
}

/// Recognise a raw `<a ...>` or `</a>` tag
fn anchor_tag(raw: &str) -> Option<AnchorTag> {
    let raw = raw.trim();
    let (tag, rest) = if let Some(rest) = raw.strip_prefix("</") {
        (AnchorTag::Close, rest)
    } else if let Some(rest) = raw.strip_prefix('<') {
        if raw.ends_with("/>") {
            return None;
        }
        (AnchorTag::Open, rest)
    } else {
        return None;
    };

    let mut chars = rest.chars();
    if !chars.next()?.eq_ignore_ascii_case(&'a') {
        return None;
    }
    match chars.next()? {
        '>' => Some(tag),
        c if c.is_whitespace() => Some(tag),
        _ => None,
    }
}

/// Drop sentence punctuation and unmatched closing brackets from the end
fn trim_url(candidate: &str) -> &str {
    let mut url = candidate;
    while let Some(last) = url.chars().last() {
        let strip = if TRAILING.contains(&last) {
            true
        } else if let Some(&(open, close)) = BRACKETS.iter().find(|(_, c)| *c == last) {
            url.matches(close).count() > url.matches(open).count()
        } else {
            false
        };
        if !strip {
            break;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
    url
}

fn flush<'a>(pending: &mut String, out: &mut Vec<Event<'a>>) {
    if pending.is_empty() {
        return;
    }
    let text = std::mem::take(pending);
    out.extend(linkify_text(&text));
}

fn linkify_text(text: &str) -> Vec<Event<'static>> {
    let mut events = Vec::new();
    let mut cursor = 0;

    for m in URL_RE.find_iter(text) {
        let url = trim_url(m.as_str());
        if url.is_empty() || url.eq_ignore_ascii_case("www.") {
            continue;
        }
        let end = m.start() + url.len();

        if m.start() > cursor {
            events.push(text_event(&text[cursor..m.start()]));
        }

        let href = if url.len() >= 4 && url[..4].eq_ignore_ascii_case("www.") {
            format!("http://{url}")
        } else {
            url.to_string()
        };

        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::Boxed(href.into_boxed_str()),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        events.push(text_event(url));
        events.push(Event::End(TagEnd::Link));

        cursor = end;
    }

    if cursor < text.len() {
        events.push(text_event(&text[cursor..]));
    }
    events
}

fn text_event(text: &str) -> Event<'static> {
    Event::Text(CowStr::Boxed(text.to_string().into_boxed_str()))
}
