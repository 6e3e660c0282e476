//! Rolldown adapter tests.

use arcstr::ArcStr;
use fob_plugin_html::{FaviconMarkers, FobHtmlPlugin, HtmlPluginOptions, OutputFormat, OutputTarget};
use rolldown_common::{Output, OutputAsset, OutputChunk, StrOrBytes};
use rolldown_plugin::Plugin;
use std::sync::Arc;

fn chunk(name: &str, filename: &str, is_entry: bool, is_dynamic_entry: bool) -> Output {
    Output::Chunk(Arc::new(OutputChunk {
        name: ArcStr::from(name),
        filename: ArcStr::from(filename),
        code: String::new(),
        map: None,
        sourcemap_filename: None,
        preliminary_filename: filename.to_string(),
        is_entry,
        is_dynamic_entry,
        facade_module_id: None,
        module_ids: vec![],
        imports: vec![],
        dynamic_imports: vec![],
        exports: vec![],
        modules: rolldown_common::Modules {
            keys: vec![],
            values: vec![],
        },
    }))
}

fn asset(filename: &str) -> Output {
    Output::Asset(Arc::new(OutputAsset {
        names: vec![],
        original_file_names: vec![],
        filename: ArcStr::from(filename),
        source: StrOrBytes::Str(String::new()),
    }))
}

fn html_of(bundle: &[Output], filename: &str) -> String {
    bundle
        .iter()
        .find_map(|output| match output {
            Output::Asset(asset) if asset.filename.as_str() == filename => match &asset.source {
                StrOrBytes::Str(text) => Some(text.clone()),
                StrOrBytes::Bytes(bytes) => String::from_utf8(bytes.clone()).ok(),
            },
            _ => None,
        })
        .unwrap()
}

fn plugin(options: HtmlPluginOptions) -> FobHtmlPlugin {
    FobHtmlPlugin::new(options, OutputTarget::new(OutputFormat::Esm).with_dir("dist")).unwrap()
}

#[test]
fn plugin_name() {
    let plugin = plugin(HtmlPluginOptions::new("<html></html>").with_file_name("index.html"));
    assert_eq!(plugin.name(), "fob-html");
}

#[test]
fn emits_document_for_rolldown_bundle() {
    let plugin = plugin(
        HtmlPluginOptions::new("<html><head></head><body></body></html>")
            .with_file_name("index.html")
            .with_preload(["settings"]),
    );
    let mut bundle = vec![
        chunk("main", "main-Dx8a.js", true, false),
        asset("main-Dx8a.css"),
        chunk("settings", "settings-K2.js", false, true),
        chunk("shared", "shared-9f.js", false, false),
    ];

    plugin.process_bundle(&mut bundle).unwrap();

    assert_eq!(bundle.len(), 5);
    let html = html_of(&bundle, "index.html");
    assert!(html.contains("<script src=\"main-Dx8a.js\"></script>"));
    assert!(html.contains("<link rel=\"stylesheet\" href=\"main-Dx8a.css\">"));
    assert!(html.contains("<link rel=\"preload\" href=\"settings-K2.js\" as=\"script\">"));
    assert!(!html.contains("shared-9f.js"));
}

#[test]
fn nothing_pushed_on_failure() {
    let plugin = plugin(HtmlPluginOptions::new("<div></div>").with_file_name("index.html"));
    let mut bundle = vec![chunk("main", "main.js", true, false)];

    assert!(plugin.process_bundle(&mut bundle).is_err());
    assert_eq!(bundle.len(), 1);
}

#[test]
fn shared_markers_reach_document() {
    let markers = FaviconMarkers::new();
    let plugin = plugin(
        HtmlPluginOptions::new("<html><head></head><body></body></html>")
            .with_file_name("index.html"),
    )
    .with_markers(markers.clone());

    markers.push("<link rel=\"icon\" sizes=\"32x32\" href=\"icon-32.png\">");

    let mut bundle = Vec::new();
    plugin.process_bundle(&mut bundle).unwrap();

    assert!(html_of(&bundle, "index.html")
        .contains("<link rel=\"icon\" sizes=\"32x32\" href=\"icon-32.png\">\n"));
}
