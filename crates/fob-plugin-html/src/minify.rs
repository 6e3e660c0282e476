//! HTML minification through the `minify-html` crate

use serde::{Deserialize, Serialize};

use crate::error::{HtmlPluginError, Result};

/// Minifier configuration forwarded from the `minifyOptions` option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MinifyOptions {
    /// Minify CSS in `<style>` elements and `style` attributes
    pub minify_css: bool,
    /// Minify JavaScript in `<script>` elements
    pub minify_js: bool,
    pub keep_comments: bool,
    pub keep_closing_tags: bool,
    pub keep_html_and_head_opening_tags: bool,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            minify_css: true,
            minify_js: true,
            keep_comments: false,
            keep_closing_tags: true,
            keep_html_and_head_opening_tags: true,
        }
    }
}

impl MinifyOptions {
    fn to_cfg(&self) -> ::minify_html::Cfg {
        ::minify_html::Cfg {
            minify_css: self.minify_css,
            minify_js: self.minify_js,
            keep_comments: self.keep_comments,
            keep_closing_tags: self.keep_closing_tags,
            keep_html_and_head_opening_tags: self.keep_html_and_head_opening_tags,
            ..::minify_html::Cfg::default()
        }
    }
}

/// Minify a serialized HTML document
pub fn minify_document(source: &str, options: &MinifyOptions) -> Result<String> {
    let minified = ::minify_html::minify(source.as_bytes(), &options.to_cfg());
    String::from_utf8(minified).map_err(|source| HtmlPluginError::Minify { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_shrinks_whitespace() {
        let source = "<!doctype html>\n<html>\n  <head>\n    <title>Demo</title>\n  </head>\n  <body>\n    <p>Hello</p>\n  </body>\n</html>";
        let minified = minify_document(source, &MinifyOptions::default()).unwrap();

        assert!(minified.len() < source.len());
        assert!(minified.contains("Hello"));
        assert!(minified.contains("<title>Demo"));
    }

    #[test]
    fn test_keep_comments() {
        let source = "<html><head></head><body><!-- marker --><p>x</p></body></html>";
        let options = MinifyOptions {
            keep_comments: true,
            ..MinifyOptions::default()
        };

        assert!(minify_document(source, &options).unwrap().contains("marker"));
        assert!(!minify_document(source, &MinifyOptions::default())
            .unwrap()
            .contains("marker"));
    }
}
