use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<(/?)([a-zA-Z][a-zA-Z0-9]*)([^>]*)>").expect("valid tag pattern")
});

static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid href pattern")
});

/// How message text is turned into what the bubble shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Text is markup: a small HTML subset is interpreted, other tags dropped.
    #[default]
    Trusted,
    /// Text is shown literally, tags and all.
    Escaped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanStyle {
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

/// Styled runs of text ready for painting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedText {
    spans: Vec<Span>,
}

impl RenderedText {
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

pub fn render(text: &str, mode: RenderMode) -> RenderedText {
    match mode {
        RenderMode::Escaped => RenderedText {
            spans: vec![Span {
                text: text.to_string(),
                style: SpanStyle::default(),
            }],
        },
        RenderMode::Trusted => render_markup(text),
    }
}

fn render_markup(text: &str) -> RenderedText {
    let mut builder = Builder::default();
    let mut cursor = 0;

    for tag in TAG.captures_iter(text) {
        let whole = tag.get(0).map_or(cursor..cursor, |m| m.range());
        builder.push_text(&text[cursor..whole.start]);
        cursor = whole.end;

        // Comment
        let Some(name) = tag.get(2) else { continue };
        let closing = tag.get(1).is_some_and(|m| !m.as_str().is_empty());
        let attrs = tag.get(3).map_or("", |m| m.as_str());
        builder.handle_tag(&name.as_str().to_ascii_lowercase(), closing, attrs);
    }
    builder.push_text(&text[cursor..]);

    builder.finish()
}

#[derive(Default)]
struct Builder {
    spans: Vec<Span>,
    bold: usize,
    italic: usize,
    code: usize,
    links: Vec<String>,
    skipping: Option<String>,
}

impl Builder {
    fn handle_tag(&mut self, name: &str, closing: bool, attrs: &str) {
        if let Some(skipped) = &self.skipping {
            if closing && skipped == name {
                self.skipping = None;
            }
            return;
        }

        match (name, closing) {
            ("script" | "style", false) => self.skipping = Some(name.to_string()),
            ("b" | "strong", false) => self.bold += 1,
            ("b" | "strong", true) => self.bold = self.bold.saturating_sub(1),
            ("i" | "em", false) => self.italic += 1,
            ("i" | "em", true) => self.italic = self.italic.saturating_sub(1),
            ("code" | "pre", false) => self.code += 1,
            ("code" | "pre", true) => self.code = self.code.saturating_sub(1),
            ("a", false) => {
                let href = HREF
                    .captures(attrs)
                    .and_then(|c| c.get(1).or_else(|| c.get(2)))
                    .map(|m| decode_entities(m.as_str()))
                    .unwrap_or_default();
                self.links.push(href);
            }
            ("a", true) => {
                self.links.pop();
            }
            ("br", _) => self.push_break(),
            ("li", false) => {
                self.start_line();
                self.push_raw("• ");
            }
            ("p" | "div" | "ul" | "ol" | "li" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6", _) => {
                self.start_line()
            }
            _ => {}
        }
    }

    fn style(&self) -> SpanStyle {
        SpanStyle {
            bold: self.bold > 0,
            italic: self.italic > 0,
            code: self.code > 0,
            link: self.links.last().cloned(),
        }
    }

    fn last_char(&self) -> Option<char> {
        self.spans.last().and_then(|span| span.text.chars().last())
    }

    fn push_text(&mut self, raw: &str) {
        if self.skipping.is_some() || raw.is_empty() {
            return;
        }

        let mut collapsed = String::with_capacity(raw.len());
        let mut in_space = matches!(self.last_char(), None | Some(' ' | '\n'));
        for ch in raw.chars() {
            if ch.is_ascii_whitespace() {
                if !in_space {
                    collapsed.push(' ');
                    in_space = true;
                }
            } else {
                collapsed.push(ch);
                in_space = false;
            }
        }

        self.push_raw(&decode_entities(&collapsed));
    }

    fn push_raw(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let style = self.style();
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.spans.push(Span {
                text: text.to_string(),
                style,
            }),
        }
    }

    fn push_break(&mut self) {
        self.trim_trailing_spaces();
        let trailing_breaks = self
            .spans
            .last()
            .map_or(0, |span| span.text.chars().rev().take_while(|c| *c == '\n').count());
        if self.spans.is_empty() || trailing_breaks >= 2 {
            return;
        }
        self.push_raw("\n");
    }

    /// Block boundary: move to a fresh line unless already on one.
    fn start_line(&mut self) {
        self.trim_trailing_spaces();
        if !matches!(self.last_char(), None | Some('\n')) {
            self.push_raw("\n");
        }
    }

    fn trim_trailing_spaces(&mut self) {
        while let Some(last) = self.spans.last_mut() {
            let trimmed = last.text.trim_end_matches(' ').len();
            last.text.truncate(trimmed);
            if last.text.is_empty() {
                self.spans.pop();
            } else {
                break;
            }
        }
    }

    fn finish(mut self) -> RenderedText {
        while let Some(last) = self.spans.last_mut() {
            let trimmed = last.text.trim_end().len();
            last.text.truncate(trimmed);
            if last.text.is_empty() {
                self.spans.pop();
            } else {
                break;
            }
        }
        RenderedText { spans: self.spans }
    }
}

fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
