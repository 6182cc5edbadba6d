//! HTML minification backed by minify-html.

use minify_html::{Cfg, minify};

use crate::domain::action::MinifyOptions;

pub fn minify_markup(source: &str, options: &MinifyOptions) -> String {
    let mut cfg = Cfg::new();
    cfg.keep_comments = options.keep_comments;
    cfg.keep_closing_tags = options.keep_closing_tags;
    cfg.minify_css = options.minify_css;
    cfg.minify_js = options.minify_js;

    String::from_utf8_lossy(&minify(source.as_bytes(), &cfg)).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_and_drops_comments() {
        let input = "<div>\n    <!-- note -->\n    <p>hello   world</p>\n</div>\n";
        let output = minify_markup(input, &MinifyOptions::default());
        assert!(!output.contains("note"));
        assert!(output.contains("hello world"));
        assert!(output.len() < input.len());
    }

    #[test]
    fn keeps_comments_on_request() {
        let options = MinifyOptions {
            keep_comments: true,
            ..MinifyOptions::default()
        };
        let output = minify_markup("<p>a</p><!-- keep -->", &options);
        assert!(output.contains("<!-- keep -->"));
    }

    #[test]
    fn preformatted_text_is_untouched() {
        let output = minify_markup(
            "<pre>  two  spaces\n  kept</pre>",
            &MinifyOptions::default(),
        );
        assert!(output.contains("  two  spaces\n  kept"));
    }
}
