//! Rolldown plugin generating the HTML entry document of a bundle
//!
//! After Rolldown has produced the output chunks and assets, this plugin takes
//! an HTML template (a file or literal markup) and references the bundle from
//! it with `<script>`, `<link rel="stylesheet">` and `<link rel="preload">`
//! tags. It can also set the `<title>`, merge `<meta>` entries, add a favicon
//! and reference external resources that the build does not produce.
//!
//! ## Architecture
//!
//! ```text
//! options → normalize() → resolve_output(format) → HtmlGenerator
//!                                                     ↓
//! generate_bundle() → classify outputs → parse template → decorate → inject
//!                                                     ↓
//!                                 serialize (+ minify) → emitted assets
//! ```
//!
//! Entry chunks and the files sharing their stem (`main.js` and `main.css`)
//! are injected, dynamic entries are preloaded when their name is listed in
//! `preload`, everything else is left alone.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fob_plugin_html::{FobHtmlPlugin, HtmlPluginOptions, OutputFormat, OutputTarget};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = HtmlPluginOptions::new("src/index.html")
//!     .with_title("My App")
//!     .with_meta("viewport", "width=device-width, initial-scale=1")
//!     .with_modules(true);
//!
//! let target = OutputTarget::new(OutputFormat::Esm).with_dir("dist");
//! let plugin = Arc::new(FobHtmlPlugin::new(options, target)?);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod config;
pub mod decorate;
pub mod document;
pub mod dom;
pub mod error;
pub mod generate;
pub mod inject;
pub mod minify;
pub mod normalize;
mod plugin;

pub use classify::{classify, file_stem, NameIndex, OutputFile, OutputKind};
pub use config::{ExternalOptions, HtmlPluginOptions, MinifySetting};
pub use document::Document;
pub use error::{HtmlPluginError, Result};
pub use generate::{EmittedFile, EmittedSource, HtmlGenerator};
pub use minify::MinifyOptions;
pub use normalize::{
    CrossOrigin, External, InjectMode, InsertPoint, ModuleMode, NormalizedOptions, OutputFormat,
    OutputTarget, Position, PreloadSet, ResolvedOutput, ResourceType, TemplateSource,
};
pub use plugin::{FaviconMarkers, FobHtmlPlugin};
