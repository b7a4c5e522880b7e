//! Markdown to HTML conversion.
//!
//! Wraps `pulldown-cmark` with the extension set chosen in
//! [`MarkdownConfig`] and an optional [`Highlighter`] for fenced code blocks.
//! Fenced blocks are part of CommonMark and always parsed. Intra-word `_`
//! never opens emphasis under CommonMark flanking rules, so `snake_case_name`
//! renders verbatim without any extra switch. Superscript follows the same
//! rules: `x ^2^ y` gives `<sup>2</sup>` but `x^2^` attached to a word
//! stays literal.

use crate::config::MarkdownConfig;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};

/// Turns a fenced code block into highlighted markup.
///
/// Returning `None` keeps the default `<pre><code class="language-…">`
/// rendering for that block.
pub trait Highlighter {
    fn highlight(&self, code: &str, language: &str) -> Option<String>;
}

impl<F> Highlighter for F
where
    F: Fn(&str, &str) -> Option<String>,
{
    fn highlight(&self, code: &str, language: &str) -> Option<String> {
        self(code, language)
    }
}

pub struct MarkdownRenderer {
    options: Options,
    highlighter: Option<Box<dyn Highlighter>>,
}

impl MarkdownRenderer {
    pub fn new(config: &MarkdownConfig) -> Self {
        let mut options = Options::empty();
        if config.strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if config.superscript {
            options.insert(Options::ENABLE_SUPERSCRIPT);
        }
        if config.tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if config.smart_punctuation {
            options.insert(Options::ENABLE_SMART_PUNCTUATION);
        }
        Self {
            options,
            highlighter: None,
        }
    }

    /// Route fenced code blocks through `highlighter`.
    #[must_use]
    pub fn with_highlighter(mut self, highlighter: impl Highlighter + 'static) -> Self {
        self.highlighter = Some(Box::new(highlighter));
        self
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        match &self.highlighter {
            Some(highlighter) => {
                html::push_html(&mut out, highlight_fenced(parser, highlighter.as_ref()))
            }
            None => html::push_html(&mut out, parser),
        }
        out
    }
}

/// Replace each fenced code block the highlighter accepts with a single
/// raw HTML event. Blocks it declines are passed through untouched.
fn highlight_fenced<'a>(
    events: impl Iterator<Item = Event<'a>>,
    highlighter: &dyn Highlighter,
) -> impl Iterator<Item = Event<'a>> {
    let mut out = Vec::new();
    let mut pending: Option<(CowStr<'a>, Vec<Event<'a>>)> = None;

    for event in events {
        let Some((lang, mut buffered)) = pending.take() else {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))) => {
                    let start = Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang.clone())));
                    pending = Some((lang, vec![start]));
                }
                event => out.push(event),
            }
            continue;
        };

        match event {
            Event::End(TagEnd::CodeBlock) => {
                let code: String = buffered
                    .iter()
                    .filter_map(|e| match e {
                        Event::Text(text) => Some(text.as_ref()),
                        _ => None,
                    })
                    .collect();
                let language = lang.split_whitespace().next().unwrap_or("");
                match highlighter.highlight(&code, language) {
                    Some(markup) => out.push(Event::Html(markup.into())),
                    None => {
                        out.extend(buffered);
                        out.push(Event::End(TagEnd::CodeBlock));
                    }
                }
            }
            event => {
                buffered.push(event);
                pending = Some((lang, buffered));
            }
        }
    }

    out.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::new(&MarkdownConfig::default())
    }

    #[test]
    fn renders_basic_markdown() {
        let html = renderer().render("# Title\n\nThis is **bold** and *italic*.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
    }

    #[test]
    fn default_options_enable_extensions() {
        let options = renderer().options();
        assert!(options.contains(Options::ENABLE_STRIKETHROUGH));
        assert!(options.contains(Options::ENABLE_SUPERSCRIPT));
        assert!(options.contains(Options::ENABLE_TABLES));
        assert!(options.contains(Options::ENABLE_SMART_PUNCTUATION));
    }

    #[test]
    fn disabled_extensions_are_off() {
        let config = MarkdownConfig {
            strikethrough: false,
            superscript: false,
            tables: false,
            smart_punctuation: false,
        };
        let r = MarkdownRenderer::new(&config);
        assert!(r.options().is_empty());
        assert!(!r.render("~~gone~~").contains("<del>"));
    }

    #[test]
    fn strikethrough_renders_del() {
        assert!(renderer().render("~~gone~~").contains("<del>gone</del>"));
    }

    #[test]
    fn superscript_renders_sup() {
        assert_eq!(renderer().render("x ^2^ y"), "<p>x <sup>2</sup> y</p>\n");
    }

    #[test]
    fn superscript_attached_to_word_is_literal() {
        assert_eq!(renderer().render("x^2^"), "<p>x^2^</p>\n");
        assert_eq!(renderer().render("10^2^ here"), "<p>10^2^ here</p>\n");
    }

    #[test]
    fn intra_word_underscores_are_literal() {
        let html = renderer().render("call snake_case_name here");
        assert!(html.contains("snake_case_name"));
        assert!(!html.contains("<em>"));
    }

    #[test]
    fn fenced_code_without_highlighter() {
        let html = renderer().render("```rust\nfn main() {}\n```");
        assert!(html.contains(r#"<code class="language-rust">"#));
        assert!(html.contains("fn main() {}"));
    }

    #[test]
    fn highlighter_receives_code_and_language() {
        let r = renderer().with_highlighter(|code: &str, lang: &str| {
            Some(format!("<div class=\"hl-{lang}\">{}</div>", code.trim()))
        });
        let html = r.render("Before\n\n```rust\nlet x = 1;\n```\n\nAfter");
        assert!(html.contains(r#"<div class="hl-rust">let x = 1;</div>"#));
        assert!(!html.contains("<pre>"));
        assert!(html.contains("<p>Before</p>"));
        assert!(html.contains("<p>After</p>"));
    }

    #[test]
    fn highlighter_gets_first_word_of_info_string() {
        let r = renderer().with_highlighter(|_: &str, lang: &str| Some(format!("[{lang}]")));
        let html = r.render("```python title=x\npass\n```");
        assert!(html.contains("[python]"));
    }

    #[test]
    fn declined_blocks_fall_back_to_default() {
        let r = renderer().with_highlighter(|code: &str, lang: &str| {
            (lang == "rust").then(|| format!("<b>{code}</b>"))
        });
        let html = r.render("```text\nplain <stuff>\n```");
        assert!(html.contains(r#"<code class="language-text">"#));
        assert!(html.contains("plain &lt;stuff&gt;"));
    }

    #[test]
    fn indented_code_is_not_highlighted() {
        let r = renderer().with_highlighter(|_: &str, _: &str| Some("HIT".to_string()));
        let html = r.render("    indented code\n");
        assert!(!html.contains("HIT"));
        assert!(html.contains("<pre><code>"));
    }
}
