use std::path::Path;

/// A document prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedDocument {
    /// Served verbatim as plain text.
    PlainText(String),
    /// Markdown converted to HTML. The caller embeds this into the page
    /// template unescaped.
    Html(String),
}

/// Content-type-aware rendering: `.md` becomes HTML, every other extension
/// (including `.txt`) passes through as plain text.
pub fn render(name: &str, content: &[u8]) -> RenderedDocument {
    let text = String::from_utf8_lossy(content).into_owned();
    if Path::new(name).extension().is_some_and(|ext| ext == "md") {
        RenderedDocument::Html(markdown_to_html(&text))
    } else {
        RenderedDocument::PlainText(text)
    }
}

/// Converts markdown content to HTML
fn markdown_to_html(markdown: &str) -> String {
    use pulldown_cmark::{html, Options, Parser};

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}
