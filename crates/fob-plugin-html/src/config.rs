//! HTML plugin configuration types
//!
//! This module holds the option record exactly as users write it, in JSON, TOML
//! or through the builder methods. Options whose accepted shapes are loose
//! (`inject`, `preload`, `modules`, `nomodule`) are kept as raw JSON values so
//! that [`crate::normalize`] can reject bad values with a message naming the
//! offending option.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::{HtmlPluginError, Result};
use crate::minify::MinifyOptions;

/// Options of the HTML plugin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlPluginOptions {
    /// Path to an HTML file, or literal HTML markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Output file name, relative to the bundle output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Removed alias of `fileName`, always rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<Value>,

    /// `false`, `"head"` or `"body"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inject: Option<Value>,

    /// Document title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Path to the favicon file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<PathBuf>,

    /// `<meta name=.. content=..>` entries, in insertion order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<IndexMap<String, String>>,

    /// Resources that are not produced by the build
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub externals: Option<Vec<ExternalOptions>>,

    /// Logical names of dynamic entries to preload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preload: Option<Value>,

    /// Add `type="module"` to injected scripts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Value>,

    /// Add `nomodule` to injected scripts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nomodule: Option<Value>,

    /// Minifier configuration, `true` for defaults
    #[serde(default, alias = "minify", skip_serializing_if = "Option::is_none")]
    pub minify_options: Option<MinifySetting>,

    /// URL prefix of every injected file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online_path: Option<String>,

    /// Keys this plugin does not know about
    #[serde(flatten, skip_serializing)]
    pub unknown: IndexMap<String, Value>,
}

/// One configured external resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalOptions {
    /// `"before"` or `"after"` the generated tags
    pub position: String,

    /// URL written verbatim into the tag
    #[serde(alias = "file")]
    pub file_path: String,

    /// `"css"` or `"js"`, inferred from the extension when absent
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// `"head"` or `"body"`
    #[serde(default, alias = "inject", skip_serializing_if = "Option::is_none")]
    pub insert_point: Option<String>,

    /// `"anonymous"` or `"use-credentials"`
    #[serde(default, alias = "crossorigin", skip_serializing_if = "Option::is_none")]
    pub cross_origin_policy: Option<String>,
}

impl ExternalOptions {
    pub fn new(position: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            position: position.into(),
            file_path: file_path.into(),
            kind: None,
            insert_point: None,
            cross_origin_policy: None,
        }
    }

    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_insert_point(mut self, insert_point: impl Into<String>) -> Self {
        self.insert_point = Some(insert_point.into());
        self
    }

    pub fn with_cross_origin(mut self, policy: impl Into<String>) -> Self {
        self.cross_origin_policy = Some(policy.into());
        self
    }
}

/// `minifyOptions` accepts a flag or a full configuration object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MinifySetting {
    Enabled(bool),
    Options(MinifyOptions),
}

impl MinifySetting {
    /// Minifier configuration, if minification is switched on
    pub fn options(&self) -> Option<MinifyOptions> {
        match self {
            Self::Enabled(true) => Some(MinifyOptions::default()),
            Self::Enabled(false) => None,
            Self::Options(options) => Some(options.clone()),
        }
    }
}

impl HtmlPluginOptions {
    /// Create options for the given template path or markup
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: Some(template.into()),
            ..Self::default()
        }
    }

    /// Create from a `serde_json::Value`
    ///
    /// # Example
    ///
    /// ```
    /// use fob_plugin_html::HtmlPluginOptions;
    /// use serde_json::json;
    ///
    /// let options = HtmlPluginOptions::from_value(json!({
    ///     "template": "src/index.html",
    ///     "title": "My App",
    ///     "preload": ["lazy"]
    /// }))
    /// .unwrap();
    /// assert_eq!(options.title.as_deref(), Some("My App"));
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(HtmlPluginError::invalid_config)
    }

    /// Parse options from JSON text
    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(HtmlPluginError::invalid_config)
    }

    /// Parse options from TOML text
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let toml_val: toml::Value = toml::from_str(source)
            .map_err(|e| HtmlPluginError::invalid_config(format!("Invalid TOML syntax: {}", e)))?;
        let value = serde_json::to_value(toml_val).map_err(|e| {
            HtmlPluginError::invalid_config(format!("TOML to JSON conversion failed: {}", e))
        })?;
        Self::from_value(value)
    }

    /// Load options from a `.toml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| HtmlPluginError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Set `inject` to `"head"` or `"body"`
    pub fn with_inject(mut self, target: impl Into<String>) -> Self {
        self.inject = Some(Value::String(target.into()));
        self
    }

    /// Set `inject: false`
    pub fn without_inject(mut self) -> Self {
        self.inject = Some(Value::Bool(false));
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_favicon(mut self, path: impl Into<PathBuf>) -> Self {
        self.favicon = Some(path.into());
        self
    }

    /// Add one meta entry, keeping insertion order
    pub fn with_meta(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.meta
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), content.into());
        self
    }

    pub fn with_external(mut self, external: ExternalOptions) -> Self {
        self.externals.get_or_insert_with(Vec::new).push(external);
        self
    }

    pub fn with_preload<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names
            .into_iter()
            .map(|name| Value::String(name.into()))
            .collect();
        self.preload = Some(Value::Array(names));
        self
    }

    pub fn with_modules(mut self, enabled: bool) -> Self {
        self.modules = Some(Value::Bool(enabled));
        self
    }

    pub fn with_nomodule(mut self, enabled: bool) -> Self {
        self.nomodule = Some(Value::Bool(enabled));
        self
    }

    pub fn with_minify(mut self, options: MinifyOptions) -> Self {
        self.minify_options = Some(MinifySetting::Options(options));
        self
    }

    pub fn with_online_path(mut self, prefix: impl Into<String>) -> Self {
        self.online_path = Some(prefix.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_keeps_meta_order() {
        let options = HtmlPluginOptions::from_value(json!({
            "template": "index.html",
            "meta": { "viewport": "width=device-width", "description": "demo", "author": "me" }
        }))
        .unwrap();

        let keys: Vec<_> = options.meta.unwrap().into_keys().collect();
        assert_eq!(keys, vec!["viewport", "description", "author"]);
    }

    #[test]
    fn test_unknown_keys_are_collected() {
        let options = HtmlPluginOptions::from_value(json!({
            "template": "index.html",
            "titel": "typo"
        }))
        .unwrap();

        assert!(options.unknown.contains_key("titel"));
        assert!(options.title.is_none());
    }

    #[test]
    fn test_external_aliases() {
        let options = HtmlPluginOptions::from_value(json!({
            "template": "index.html",
            "externals": [
                { "position": "before", "file": "https://cdn/x.css", "crossorigin": "anonymous" }
            ]
        }))
        .unwrap();

        let external = &options.externals.unwrap()[0];
        assert_eq!(external.file_path, "https://cdn/x.css");
        assert_eq!(external.cross_origin_policy.as_deref(), Some("anonymous"));
    }

    #[test]
    fn test_minify_alias_and_flag() {
        let options = HtmlPluginOptions::from_value(json!({
            "template": "index.html",
            "minify": true
        }))
        .unwrap();

        assert_eq!(
            options.minify_options.and_then(|m| m.options()),
            Some(MinifyOptions::default())
        );
    }

    #[test]
    fn test_from_toml_str() {
        let options = HtmlPluginOptions::from_toml_str(
            r#"
template = "src/index.html"
inject = "head"
preload = ["lazy"]

[[externals]]
position = "after"
filePath = "analytics.js"
"#,
        )
        .unwrap();

        assert_eq!(options.inject, Some(json!("head")));
        assert_eq!(options.externals.unwrap()[0].position, "after");
    }

    #[test]
    fn test_builder() {
        let options = HtmlPluginOptions::new("<html></html>")
            .with_file_name("index.html")
            .with_meta("description", "demo")
            .with_preload(["lazy"])
            .with_modules(true);

        assert_eq!(options.file_name.as_deref(), Some("index.html"));
        assert_eq!(options.preload, Some(json!(["lazy"])));
        assert_eq!(options.modules, Some(json!(true)));
    }
}
