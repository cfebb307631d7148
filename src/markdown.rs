//! Markdown rendering for blog content.
//!
//! Content is split into raw-HTML segments (pulldown-cmark, GFM extensions,
//! raw HTML passed through) and fenced code segments carrying a language tag.
//! Code segments get a token highlighter and a copy-to-clipboard control; the
//! split keeps the copy button a real component instead of something injected
//! into an `inner_html` blob.

use std::sync::OnceLock;

use leptos::prelude::*;
use leptos::task::spawn_local;

use gloo_timers::future::TimeoutFuture;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use wasm_bindgen_futures::JsFuture;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Rendered HTML for everything that is not a tagged code fence.
    Html(String),
    /// A fenced block with a `language-*` tag.
    Code { lang: String, code: String },
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Splits markdown (plus raw HTML) into renderable segments.
pub fn segment(content: &str) -> Vec<Segment> {
    let parser = Parser::new_ext(content, parser_options());
    let mut segments = Vec::new();
    let mut pending: Vec<Event> = Vec::new();
    let mut code: Option<(String, String)> = None;

    let flush = |pending: &mut Vec<Event>, segments: &mut Vec<Segment>| {
        if pending.is_empty() {
            return;
        }
        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, pending.drain(..));
        if !html.trim().is_empty() {
            segments.push(Segment::Html(html));
        }
    };

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))) if !lang.is_empty() => {
                flush(&mut pending, &mut segments);
                code = Some((lang.to_string(), String::new()));
            }
            Event::End(TagEnd::CodeBlock) if code.is_some() => {
                let (lang, mut text) = code.take().unwrap_or_default();
                while text.ends_with('\n') {
                    text.pop();
                }
                segments.push(Segment::Code { lang, code: text });
            }
            Event::Text(text) if code.is_some() => {
                if let Some((_, buf)) = code.as_mut() {
                    buf.push_str(&text);
                }
            }
            other => pending.push(other),
        }
    }
    flush(&mut pending, &mut segments);
    segments
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Single-pass token highlighter for code blocks. One combined pattern keeps
/// later token classes from matching inside markup emitted for earlier ones.
pub fn highlight_code(code: &str) -> String {
    static TOKENS: OnceLock<Regex> = OnceLock::new();
    let tokens = TOKENS.get_or_init(|| {
        Regex::new(
            r#"(?x)
            (?P<comment>//[^\n]*|\#[^\n]*)
            |(?P<string>"(?:\\.|[^"\\])*"|'(?:\\.|[^'\\])*')
            |(?P<number>\b\d[\d_]*(?:\.\d+)?\b)
            |(?P<kw>\b(?:fn|let|mut|const|static|pub|use|mod|struct|enum|impl|trait|match|if|else|for|while|loop|return|async|await|move|function|var|def|class|import|from|export|new|true|false|null|None|Some|Ok|Err)\b)
            "#,
        )
        .unwrap()
    });

    let mut out = String::with_capacity(code.len());
    let mut cursor = 0;
    for cap in tokens.captures_iter(code) {
        let m = cap.get(0).unwrap();
        out.push_str(&escape_html(&code[cursor..m.start()]));
        let class = if cap.name("comment").is_some() {
            "tok-comment"
        } else if cap.name("string").is_some() {
            "tok-string"
        } else if cap.name("number").is_some() {
            "tok-number"
        } else {
            "tok-keyword"
        };
        out.push_str(&format!(
            "<span class=\"{}\">{}</span>",
            class,
            escape_html(m.as_str())
        ));
        cursor = m.end();
    }
    out.push_str(&escape_html(&code[cursor..]));
    out
}

/// Renders a full markdown document.
#[component]
pub fn MarkdownView(#[prop(into)] content: Signal<String>) -> impl IntoView {
    view! {
        <div class="markdown-body">
            {move || {
                segment(&content.get())
                    .into_iter()
                    .map(|seg| match seg {
                        Segment::Html(html) => view! { <div class="md-html" inner_html=html></div> }
                            .into_any(),
                        Segment::Code { lang, code } => view! { <CodeBlock lang=lang code=code /> }
                            .into_any(),
                    })
                    .collect::<Vec<_>>()
            }}
        </div>
    }
}

/// A highlighted code fence with a copy-to-clipboard control. The button
/// shows "Copied!" for two seconds after a successful copy.
#[component]
fn CodeBlock(lang: String, code: String) -> impl IntoView {
    let (copied, set_copied) = signal(false);
    let highlighted = highlight_code(&code);
    let class = format!("language-{lang}");

    let copy = move |_| {
        let text = code.clone();
        spawn_local(async move {
            let promise = window().navigator().clipboard().write_text(&text);
            if JsFuture::from(promise).await.is_ok() {
                set_copied.try_set(true);
                TimeoutFuture::new(2000).await;
                set_copied.try_set(false);
            }
        });
    };

    view! {
        <div class="code-block">
            <button class="code-copy" on:click=copy>
                {move || if copied.get() { "Copied!" } else { "Copy" }}
            </button>
            <pre>
                <code class=class inner_html=highlighted></code>
            </pre>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_tagged_fences_out_of_html() {
        let segments = segment("intro\n\n```rust\nfn main() {}\n```\n\noutro");
        assert_eq!(segments.len(), 3);
        assert!(matches!(&segments[0], Segment::Html(h) if h.contains("intro")));
        match &segments[1] {
            Segment::Code { lang, code } => {
                assert_eq!(lang, "rust");
                assert_eq!(code, "fn main() {}");
            }
            other => panic!("expected code segment, got {other:?}"),
        }
        assert!(matches!(&segments[2], Segment::Html(h) if h.contains("outro")));
    }

    #[test]
    fn untagged_fences_stay_in_html() {
        let segments = segment("```\nplain\n```");
        assert_eq!(segments.len(), 1);
        assert!(matches!(&segments[0], Segment::Html(h) if h.contains("<code>")));
    }

    #[test]
    fn raw_html_passes_through() {
        let segments = segment("before\n\n<div class=\"x\">inline</div>");
        let html: String = segments
            .iter()
            .map(|s| match s {
                Segment::Html(h) => h.as_str(),
                _ => "",
            })
            .collect();
        assert!(html.contains("<div class=\"x\">"));
    }

    #[test]
    fn gfm_tables_render() {
        let segments = segment("|a|b|\n|-|-|\n|1|2|");
        assert!(matches!(&segments[0], Segment::Html(h) if h.contains("<table>")));
    }

    #[test]
    fn highlighter_escapes_and_tags() {
        let out = highlight_code("let x = \"<b>\"; // note");
        assert!(out.contains("<span class=\"tok-keyword\">let</span>"));
        assert!(out.contains("&lt;b&gt;"));
        assert!(out.contains("tok-comment"));
        assert!(!out.contains("<b>"));
    }

    #[test]
    fn highlighter_handles_plain_text() {
        assert_eq!(highlight_code("plain words"), "plain words");
    }
}
