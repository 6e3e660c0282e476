//! HTML document generation
//!
//! [`HtmlGenerator`] ties the pieces together for one emission: load the
//! template, decorate, inject, serialize and optionally minify.

use std::path::Path;
use tracing::{debug, info};

use crate::classify::{classify, OutputFile};
use crate::decorate::{apply_favicon, apply_markers, apply_meta, apply_title};
use crate::document::Document;
use crate::dom::has_root_element;
use crate::error::{HtmlPluginError, Result};
use crate::inject::{inject_tags, InjectContext};
use crate::minify::minify_document;
use crate::normalize::{NormalizedOptions, OutputTarget, ResolvedOutput, TemplateSource};

/// Content of an emitted file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmittedSource {
    Text(String),
    Bytes(Vec<u8>),
}

impl EmittedSource {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bytes(_) => None,
        }
    }
}

/// File produced by one emission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
    pub file_name: String,
    pub source: EmittedSource,
}

/// Generates the HTML document for a bundle
#[derive(Debug, Clone)]
pub struct HtmlGenerator {
    options: NormalizedOptions,
    output: ResolvedOutput,
}

impl HtmlGenerator {
    /// Run the output-dependent validation and build a generator
    pub fn new(options: NormalizedOptions, target: &OutputTarget) -> Result<Self> {
        let output = options.resolve_output(target)?;
        Ok(Self { options, output })
    }

    pub fn options(&self) -> &NormalizedOptions {
        &self.options
    }

    /// Name of the emitted HTML file
    pub fn file_name(&self) -> &str {
        &self.output.file_name
    }

    /// Template file to watch, if the template is not literal markup
    pub fn watch_file(&self) -> Option<&Path> {
        self.options.template.path()
    }

    /// Build every file of one emission
    ///
    /// The favicon, when configured, comes first and the HTML document last.
    /// Nothing is returned unless the whole emission succeeds.
    pub fn generate(&self, outputs: &[OutputFile], markers: &[String]) -> Result<Vec<EmittedFile>> {
        let mut emitted = Vec::with_capacity(2);
        let source = self.load_template()?;
        if !has_root_element(&source) {
            return Err(HtmlPluginError::MissingRootElement);
        }

        let mut document = Document::parse(&source);

        apply_meta(&mut document, &self.options.meta);
        apply_markers(&mut document, markers);
        if let Some(title) = &self.options.title {
            apply_title(&mut document, title);
        }
        if let Some(favicon) = &self.options.favicon {
            let file = self.favicon_file(favicon)?;
            apply_favicon(
                &mut document,
                &format!("{}{}", self.options.online_path, file.file_name),
            );
            emitted.push(file);
        }

        let index = classify(outputs);
        debug!(
            "[fob-html] {} entries, {} dynamic entries",
            index.entries.len(),
            index.dynamic_entries.len()
        );
        let ctx = InjectContext {
            inject: self.options.inject,
            module_mode: self.output.module_mode,
            preload: &self.options.preload,
            externals: &self.options.externals,
            online_path: &self.options.online_path,
        };
        inject_tags(&mut document, outputs, &index, &ctx);

        let mut html = document.serialize();
        if let Some(minify) = &self.options.minify {
            html = minify_document(&html, minify)?;
        }

        info!(
            "[fob-html] Generated {} ({} bytes)",
            self.output.file_name,
            html.len()
        );
        emitted.push(EmittedFile {
            file_name: self.output.file_name.clone(),
            source: EmittedSource::Text(html),
        });

        Ok(emitted)
    }

    fn load_template(&self) -> Result<String> {
        match &self.options.template {
            TemplateSource::File(path) => {
                std::fs::read_to_string(path).map_err(|source| HtmlPluginError::ReadTemplate {
                    path: path.clone(),
                    source,
                })
            }
            TemplateSource::Literal(markup) => Ok(markup.clone()),
        }
    }

    fn favicon_file(&self, path: &Path) -> Result<EmittedFile> {
        let bytes = std::fs::read(path).map_err(|source| HtmlPluginError::ReadFavicon {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(EmittedFile {
            file_name,
            source: EmittedSource::Bytes(bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HtmlPluginOptions;
    use crate::normalize::OutputFormat;

    fn generator(options: HtmlPluginOptions) -> HtmlGenerator {
        let options = NormalizedOptions::normalize(options, "/nonexistent-root").unwrap();
        HtmlGenerator::new(options, &OutputTarget::new(OutputFormat::Esm)).unwrap()
    }

    #[test]
    fn test_missing_root_element() {
        let generator =
            generator(HtmlPluginOptions::new("<body></body>").with_file_name("index.html"));
        assert!(matches!(
            generator.generate(&[], &[]),
            Err(HtmlPluginError::MissingRootElement)
        ));
    }

    #[test]
    fn test_commented_root_element_is_missing() {
        let generator = generator(
            HtmlPluginOptions::new("<!-- <html> --><body></body>").with_file_name("index.html"),
        );
        assert!(matches!(
            generator.generate(&[], &[]),
            Err(HtmlPluginError::MissingRootElement)
        ));
    }

    #[test]
    fn test_generate_literal_template() {
        let generator = generator(
            HtmlPluginOptions::new("<html><head></head><body></body></html>")
                .with_file_name("out/index.html")
                .with_title("Demo"),
        );

        let files = generator
            .generate(&[OutputFile::entry("main.a1.js", "main")], &[])
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "out/index.html");
        assert_eq!(
            files[0].source.as_text().unwrap(),
            "<!doctype html>\n<html><head>\n  <title>Demo</title></head><body>\n  <script src=\"main.a1.js\"></script></body></html>"
        );
        assert!(generator.watch_file().is_none());
    }

    #[test]
    fn test_generate_minified() {
        let generator = generator(
            HtmlPluginOptions::new("<html>\n  <head></head>\n  <body></body>\n</html>")
                .with_file_name("index.html")
                .with_minify(crate::minify::MinifyOptions::default()),
        );

        let files = generator
            .generate(&[OutputFile::entry("main.js", "main")], &[])
            .unwrap();
        let html = files[0].source.as_text().unwrap();

        assert!(!html.contains("\n  "));
        assert!(html.contains("main.js"));
    }
}
