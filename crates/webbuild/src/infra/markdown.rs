//! Markdown to HTML rendering with pulldown-cmark.

use pulldown_cmark::{Options, Parser, html};

use crate::domain::action::MarkdownOptions;

pub fn render_markdown(source: &str, options: &MarkdownOptions) -> String {
    let parser = Parser::new_ext(source, parser_options(options));
    let mut output = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

fn parser_options(options: &MarkdownOptions) -> Options {
    let mut flags = Options::empty();
    flags.set(Options::ENABLE_TABLES, options.tables);
    flags.set(Options::ENABLE_FOOTNOTES, options.footnotes);
    flags.set(Options::ENABLE_STRIKETHROUGH, options.strikethrough);
    flags.set(Options::ENABLE_TASKLISTS, options.tasklists);
    flags.set(Options::ENABLE_SMART_PUNCTUATION, options.smart_punctuation);
    flags.set(Options::ENABLE_HEADING_ATTRIBUTES, options.heading_attributes);
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headings_and_fenced_code() {
        let html = render_markdown(
            "# Title\n\n```rust\nlet a = 1 < 2;\n```\n",
            &MarkdownOptions::default(),
        );
        insta::assert_snapshot!(html, @r#"
        <h1>Title</h1>
        <pre><code class="language-rust">let a = 1 &lt; 2;
        </code></pre>
        "#);
    }

    #[test]
    fn strikethrough_can_be_disabled() {
        let enabled = render_markdown("~~gone~~", &MarkdownOptions::default());
        assert!(enabled.contains("<del>gone</del>"));

        let options = MarkdownOptions {
            strikethrough: false,
            ..MarkdownOptions::default()
        };
        let disabled = render_markdown("~~gone~~", &options);
        assert!(!disabled.contains("<del>"));
    }
}
