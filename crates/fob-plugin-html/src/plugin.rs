//! Rolldown adapter

use anyhow::Context;
use parking_lot::Mutex;
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use rolldown_common::{Output, OutputAsset, StrOrBytes};
use rolldown_plugin::{HookGenerateBundleArgs, HookNoopReturn, HookUsage, Plugin, PluginContext};

use crate::classify::{OutputFile, OutputKind};
use crate::config::HtmlPluginOptions;
use crate::error::Result;
use crate::generate::{EmittedFile, EmittedSource, HtmlGenerator};
use crate::normalize::{NormalizedOptions, OutputTarget};

/// Raw markup snippets spliced into `head`
///
/// Cloning shares the list, so a cooperating plugin (a favicon generator, for
/// instance) can push snippets that the HTML plugin reads at emission time.
#[derive(Clone, Debug, Default)]
pub struct FaviconMarkers(Arc<Mutex<Vec<String>>>);

impl FaviconMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, marker: impl Into<String>) {
        self.0.lock().push(marker.into());
    }

    pub fn extend<I, S>(&self, markers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.lock().extend(markers.into_iter().map(Into::into));
    }

    /// Copy of the current markers
    pub fn snapshot(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}

/// Rolldown plugin emitting an HTML document that references the bundle
///
/// Both validation phases run in the constructor, so a misconfigured plugin
/// fails before the build starts. The document itself is produced in the
/// `generate_bundle` hook.
#[derive(Clone, Debug)]
pub struct FobHtmlPlugin {
    generator: Arc<HtmlGenerator>,
    markers: FaviconMarkers,
}

impl FobHtmlPlugin {
    /// Create the plugin, resolving relative paths against the current
    /// directory
    pub fn new(options: HtmlPluginOptions, target: OutputTarget) -> Result<Self> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_cwd(options, target, cwd)
    }

    pub fn with_cwd(
        options: HtmlPluginOptions,
        target: OutputTarget,
        cwd: impl Into<PathBuf>,
    ) -> Result<Self> {
        let options = NormalizedOptions::normalize(options, cwd)?;
        let generator = HtmlGenerator::new(options, &target)?;
        Ok(Self {
            generator: Arc::new(generator),
            markers: FaviconMarkers::default(),
        })
    }

    /// Share an existing marker list
    pub fn with_markers(mut self, markers: FaviconMarkers) -> Self {
        self.markers = markers;
        self
    }

    pub fn markers(&self) -> &FaviconMarkers {
        &self.markers
    }

    pub fn generator(&self) -> &HtmlGenerator {
        &self.generator
    }

    /// Generate the document for `bundle`, returning the assets to add to it
    pub fn emit_assets(&self, bundle: &[Output]) -> Result<Vec<Output>> {
        let outputs: Vec<OutputFile> = bundle.iter().map(output_file).collect();
        let emitted = self
            .generator
            .generate(&outputs, &self.markers.snapshot())?;

        Ok(emitted.into_iter().map(into_asset).collect())
    }

    /// Path the hook registers with Rolldown's watcher
    ///
    /// Literal templates have nothing to watch.
    fn watch_target(&self) -> Option<String> {
        self.generator
            .watch_file()
            .map(|template| template.to_string_lossy().into_owned())
    }

    /// Generate the document for `bundle` and push the emitted assets into it
    pub fn process_bundle(&self, bundle: &mut Vec<Output>) -> Result<()> {
        let assets = self.emit_assets(bundle)?;
        bundle.extend(assets);
        Ok(())
    }
}

impl Plugin for FobHtmlPlugin {
    fn name(&self) -> Cow<'static, str> {
        "fob-html".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::GenerateBundle
    }

    fn generate_bundle(
        &self,
        ctx: &PluginContext,
        args: &mut HookGenerateBundleArgs<'_>,
    ) -> impl std::future::Future<Output = HookNoopReturn> + Send {
        if let Some(template) = self.watch_target() {
            debug!("[fob-html] Watching template {}", template);
            ctx.add_watch_file(&template);
        }

        let plugin = self.clone();

        async move {
            let assets = plugin.emit_assets(&args.bundle).with_context(|| {
                format!(
                    "fob-html failed to generate {}",
                    plugin.generator.file_name()
                )
            })?;
            args.bundle.extend(assets);
            Ok(())
        }
    }
}

fn output_file(output: &Output) -> OutputFile {
    match output {
        Output::Chunk(chunk) => OutputFile {
            file_name: chunk.filename.to_string(),
            kind: OutputKind::Chunk,
            is_entry: chunk.is_entry,
            is_dynamic_entry: chunk.is_dynamic_entry,
            logical_name: chunk.name.to_string(),
        },
        Output::Asset(asset) => OutputFile::asset(asset.filename.to_string()),
    }
}

fn into_asset(file: EmittedFile) -> Output {
    let source = match file.source {
        EmittedSource::Text(text) => StrOrBytes::Str(text),
        EmittedSource::Bytes(bytes) => StrOrBytes::Bytes(bytes),
    };
    Output::Asset(Arc::new(OutputAsset {
        names: vec![],
        original_file_names: vec![],
        filename: file.file_name.into(),
        source,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_are_shared() {
        let markers = FaviconMarkers::new();
        let clone = markers.clone();
        clone.push("<link rel=\"icon\" href=\"icon.png\">");
        clone.extend(["<meta name=\"theme-color\" content=\"#fff\">"]);

        assert_eq!(markers.len(), 2);
        assert_eq!(markers.snapshot()[0], "<link rel=\"icon\" href=\"icon.png\">");

        markers.clear();
        assert!(clone.is_empty());
    }

    #[test]
    fn test_asset_output_conversion() {
        let output = into_asset(EmittedFile {
            file_name: "index.html".to_string(),
            source: EmittedSource::Text("<html></html>".to_string()),
        });

        let file = output_file(&output);
        assert_eq!(file.file_name, "index.html");
        assert_eq!(file.kind, OutputKind::Asset);
        assert!(!file.is_entry);
    }

    #[test]
    fn test_watch_target_for_template_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let template = temp.path().join("index.html");
        std::fs::write(&template, "<html></html>").unwrap();

        let plugin = FobHtmlPlugin::with_cwd(
            HtmlPluginOptions::new("index.html"),
            OutputTarget::default().with_dir("dist"),
            temp.path(),
        )
        .unwrap();

        assert_eq!(
            plugin.watch_target().as_deref(),
            Some(&*template.to_string_lossy())
        );
    }

    #[test]
    fn test_literal_template_is_not_watched() {
        let plugin = FobHtmlPlugin::new(
            HtmlPluginOptions::new("<html></html>").with_file_name("index.html"),
            OutputTarget::default(),
        )
        .unwrap();

        assert!(plugin.watch_target().is_none());
    }

    #[test]
    fn test_invalid_options_fail_at_construction() {
        let options = HtmlPluginOptions::new("<html></html>")
            .with_file_name("index.html")
            .with_modules(true)
            .with_nomodule(true);

        assert!(FobHtmlPlugin::new(options, OutputTarget::default()).is_err());
    }
}
