//! Markup-to-HTML body rendering.
//!
//! Converts a document body from CommonMark to HTML with hard-line-wrap
//! semantics (a single newline inside a paragraph becomes `<br>`, not a new
//! paragraph), then attaches the site's presentation classes with a fixed
//! sequence of textual substitutions.
//!
//! The substitution pass is not idempotent: running it over already-rendered
//! HTML would inject the classes twice. The assembler invokes it exactly once
//! per fetch.

use pulldown_cmark::{html, Event, Parser};

use crate::document::types::Record;
use crate::error::{Error, Result};

/// Render `record`'s markup body to styled HTML in place.
pub fn render_body<T: Record>(record: &mut T) -> Result<()> {
    let rendered = markup_to_html(record.body())?;
    record.set_body(rendered);
    Ok(())
}

/// CommonMark conversion plus the presentation-class pass.
pub fn markup_to_html(markup: &str) -> Result<String> {
    let parser = Parser::new(markup).map(|event| match event {
        // hard-wrap semantics: a soft break renders as a line break
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut out = Vec::new();
    html::write_html_io(&mut out, parser).map_err(|err| Error::Render(err.to_string()))?;
    let body = String::from_utf8(out).map_err(|err| Error::Render(err.to_string()))?;

    Ok(apply_presentation_classes(body))
}

/// The four class rewrites, in this order, each global. The anchor rewrite
/// deliberately drops the trailing space — the converter always emits
/// `<a href=...`, so the attribute follows the class immediately.
fn apply_presentation_classes(body: String) -> String {
    let body = body.replace("<p>", r#"<p class="content-text">"#);
    let body = body.replace("<h2>", r#"<h2 class="category-subtitle">"#);
    let body = body.replace("<a ", r#"<a class="hyperlink""#);
    body.replace("<li>", r#"<li class="content-text">- "#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::types::{Article, Document};

    #[test]
    fn paragraphs_and_list_items_get_content_classes() {
        let html = markup_to_html("Hello\n\n- a\n- b").unwrap();
        assert!(html.contains(r#"<p class="content-text">Hello</p>"#));
        assert!(html.contains(r#"<li class="content-text">- a</li>"#));
        assert!(html.contains(r#"<li class="content-text">- b</li>"#));
    }

    #[test]
    fn single_newline_becomes_a_line_break() {
        let html = markup_to_html("first line\nsecond line").unwrap();
        assert!(html.contains("<br"), "soft break should render hard: {html}");
        assert_eq!(html.matches("<p").count(), 1, "still one paragraph: {html}");
    }

    #[test]
    fn headings_get_the_subtitle_class() {
        let html = markup_to_html("## Section").unwrap();
        assert!(html.contains(r#"<h2 class="category-subtitle">Section</h2>"#));
    }

    #[test]
    fn anchors_get_the_hyperlink_class_without_a_trailing_space() {
        let html = markup_to_html("[site](https://example.com)").unwrap();
        assert!(
            html.contains(r#"<a class="hyperlink"href="https://example.com""#),
            "unexpected anchor markup: {html}"
        );
    }

    #[test]
    fn render_body_mutates_the_record_in_place() {
        let mut article = Article {
            document: Document {
                body: "Hello".into(),
                ..Document::default()
            },
            ..Article::default()
        };
        render_body(&mut article).unwrap();
        assert_eq!(
            article.body().trim_end(),
            r#"<p class="content-text">Hello</p>"#
        );
    }
}
