//! Option validation
//!
//! Validation happens in two phases. [`NormalizedOptions::normalize`] runs once
//! at setup and checks everything that does not depend on the bundle output.
//! [`NormalizedOptions::resolve_output`] runs once the output format and
//! location are known and yields the [`ResolvedOutput`] used at emission time.

use indexmap::{IndexMap, IndexSet};
use path_clean::PathClean;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::config::{ExternalOptions, HtmlPluginOptions};
use crate::error::{HtmlPluginError, Result};
use crate::minify::MinifyOptions;

/// Where a tag is inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertPoint {
    Head,
    Body,
}

impl InsertPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Body => "body",
        }
    }
}

impl FromStr for InsertPoint {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "head" => Ok(Self::Head),
            "body" => Ok(Self::Body),
            _ => Err(()),
        }
    }
}

/// Whether an external is emitted before or after the generated tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Before,
    After,
}

/// Value of the `crossorigin` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossOrigin {
    Anonymous,
    UseCredentials,
}

impl CrossOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::UseCredentials => "use-credentials",
        }
    }
}

/// Kind of tag used to reference a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Style,
    Script,
}

impl ResourceType {
    /// Tag kind used when injecting a file, `css` is a stylesheet and
    /// everything else is a script
    pub fn for_injection(extension: &str) -> Self {
        if extension == "css" {
            Self::Style
        } else {
            Self::Script
        }
    }

    /// `as` value of a preload link, `None` for extensions that cannot be
    /// preloaded
    pub fn for_preload(extension: &str) -> Option<Self> {
        match extension {
            "css" => Some(Self::Style),
            "js" | "mjs" => Some(Self::Script),
            _ => None,
        }
    }

    /// Side of the document this kind lands on by default
    pub fn default_insert_point(&self) -> InsertPoint {
        match self {
            Self::Style => InsertPoint::Head,
            Self::Script => InsertPoint::Body,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Style => "style",
            Self::Script => "script",
        }
    }
}

/// Normalized `inject` option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InjectMode {
    /// `inject: false`, generated files are not referenced
    Disabled,
    /// Every tag goes to the side its type defaults to
    #[default]
    Auto,
    /// Preferred side, only overriding each type's default
    Target(InsertPoint),
}

impl InjectMode {
    /// Where an entry file of the given type is inserted
    pub fn placement(&self, resource: ResourceType) -> InsertPoint {
        match (self, resource) {
            (Self::Target(InsertPoint::Body), ResourceType::Style) => InsertPoint::Body,
            (Self::Target(InsertPoint::Head), ResourceType::Script) => InsertPoint::Head,
            _ => resource.default_insert_point(),
        }
    }
}

/// Attribute added to script tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleMode {
    #[default]
    Classic,
    /// `type="module"`
    Module,
    /// bare `nomodule`
    NoModule,
}

/// Bundle output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Esm,
    Cjs,
    Iife,
    Umd,
}

impl OutputFormat {
    /// Only ES module output can be loaded with `type="module"`
    pub fn supports_modules(&self) -> bool {
        matches!(self, Self::Esm)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Esm => "esm",
            Self::Cjs => "cjs",
            Self::Iife => "iife",
            Self::Umd => "umd",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = HtmlPluginError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "es" | "esm" | "module" => Ok(Self::Esm),
            "cjs" | "commonjs" => Ok(Self::Cjs),
            "iife" => Ok(Self::Iife),
            "umd" => Ok(Self::Umd),
            _ => Err(HtmlPluginError::invalid_option(
                "format",
                s,
                "one of \"esm\", \"cjs\", \"iife\" or \"umd\"",
            )),
        }
    }
}

/// Output options of the bundle the document is generated for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputTarget {
    pub format: OutputFormat,
    /// Output directory
    pub dir: Option<PathBuf>,
    /// Single output file
    pub file: Option<PathBuf>,
}

impl OutputTarget {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// Where the template markup comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// An existing file, re-read on every emission
    File(PathBuf),
    /// Literal markup
    Literal(String),
}

impl TemplateSource {
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Literal(_) => None,
        }
    }
}

/// Validated external resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct External {
    pub position: Position,
    pub file_path: String,
    pub resource: ResourceType,
    pub insert_point: Option<InsertPoint>,
    pub cross_origin: Option<CrossOrigin>,
}

impl External {
    /// Configured insert point, or the default side of its type
    pub fn insert_point(&self) -> InsertPoint {
        self.insert_point
            .unwrap_or_else(|| self.resource.default_insert_point())
    }
}

/// Logical names of dynamic entries to preload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadSet(IndexSet<String>);

impl PreloadSet {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    fn from_value(value: Option<&Value>) -> Result<Self> {
        let expected = "a list of entry names, false or null";
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(Self::default()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name.clone()),
                    other => Err(HtmlPluginError::invalid_option("preload", other, expected)),
                })
                .collect::<Result<IndexSet<_>>>()
                .map(Self),
            Some(other) => Err(HtmlPluginError::invalid_option("preload", other, expected)),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for PreloadSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Options after the setup phase
#[derive(Debug, Clone)]
pub struct NormalizedOptions {
    pub template: TemplateSource,
    pub file_name: Option<String>,
    pub inject: InjectMode,
    pub title: Option<String>,
    pub favicon: Option<PathBuf>,
    pub meta: IndexMap<String, String>,
    pub externals: Vec<External>,
    pub preload: PreloadSet,
    pub modules: bool,
    pub nomodule: bool,
    pub minify: Option<MinifyOptions>,
    /// Empty, or ending with exactly one `/`
    pub online_path: String,
    /// Directory relative paths are resolved against
    pub cwd: PathBuf,
}

/// Values fixed once the bundle output is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutput {
    /// Name of the emitted HTML asset, relative to the output directory
    pub file_name: String,
    pub module_mode: ModuleMode,
}

impl NormalizedOptions {
    /// Validate options that do not depend on the output format
    pub fn normalize(options: HtmlPluginOptions, cwd: impl Into<PathBuf>) -> Result<Self> {
        let cwd = cwd.into();

        if options.file.is_some() {
            return Err(HtmlPluginError::LegacyFileOption);
        }

        for key in options.unknown.keys() {
            warn!("[fob-html] Unknown option `{}` is ignored", key);
        }

        let template = options.template.ok_or(HtmlPluginError::MissingTemplate)?;
        let template_path = cwd.join(&template);
        let template = if template_path.is_file() {
            TemplateSource::File(template_path.clean())
        } else {
            TemplateSource::Literal(template)
        };

        if !template.is_file() && options.file_name.is_none() {
            return Err(HtmlPluginError::MissingFileName);
        }

        let favicon = match options.favicon {
            Some(path) => {
                let resolved = cwd.join(&path);
                if !resolved.is_file() {
                    return Err(HtmlPluginError::file_not_found("favicon", path));
                }
                Some(resolved.clean())
            }
            None => None,
        };

        let normalized = Self {
            template,
            file_name: options.file_name,
            inject: parse_inject(options.inject.as_ref())?,
            title: options.title,
            favicon,
            meta: options.meta.unwrap_or_default(),
            externals: options
                .externals
                .unwrap_or_default()
                .iter()
                .map(parse_external)
                .collect::<Result<_>>()?,
            preload: PreloadSet::from_value(options.preload.as_ref())?,
            modules: parse_flag("modules", options.modules.as_ref())?,
            nomodule: parse_flag("nomodule", options.nomodule.as_ref())?,
            minify: options.minify_options.and_then(|setting| setting.options()),
            online_path: normalize_online_path(options.online_path.as_deref()),
            cwd,
        };

        debug!(
            "[fob-html] Normalized options: template is a file: {}, inject: {:?}, {} externals, {} preloads",
            normalized.template.is_file(),
            normalized.inject,
            normalized.externals.len(),
            normalized.preload.len()
        );

        Ok(normalized)
    }

    /// Validate options against the output format and resolve the emitted
    /// file name
    pub fn resolve_output(&self, target: &OutputTarget) -> Result<ResolvedOutput> {
        if self.modules && self.nomodule {
            return Err(HtmlPluginError::conflicting_options("modules", "nomodule"));
        }
        if self.modules && !target.format.supports_modules() {
            return Err(HtmlPluginError::incompatible_format(
                "modules",
                target.format,
                "Set the output format to \"esm\" or switch `modules` off",
            ));
        }
        if self.nomodule && target.format.supports_modules() {
            return Err(HtmlPluginError::incompatible_format(
                "nomodule",
                target.format,
                "ES module output cannot be loaded by browsers without module support, use another format or switch `nomodule` off",
            ));
        }

        let module_mode = if self.modules {
            ModuleMode::Module
        } else if self.nomodule {
            ModuleMode::NoModule
        } else {
            ModuleMode::Classic
        };

        let file_name = match (&self.file_name, &self.template) {
            (Some(file_name), _) => file_name.clone(),
            (None, TemplateSource::File(template)) => self.derive_file_name(template, target)?,
            (None, TemplateSource::Literal(_)) => return Err(HtmlPluginError::MissingFileName),
        };

        Ok(ResolvedOutput {
            file_name,
            module_mode,
        })
    }

    fn derive_file_name(&self, template: &Path, target: &OutputTarget) -> Result<String> {
        let out_dir = match (&target.dir, &target.file) {
            (Some(dir), _) => dir.clone(),
            (None, Some(file)) => file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            (None, None) => PathBuf::new(),
        };

        let base_name = template
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or(HtmlPluginError::MissingFileName)?;

        let destination = self.cwd.join(out_dir).join(&base_name).clean();
        if destination == template.clean() {
            return Err(HtmlPluginError::self_overwrite(destination));
        }

        Ok(base_name)
    }
}

fn parse_inject(value: Option<&Value>) -> Result<InjectMode> {
    let expected = "false, \"head\" or \"body\"";
    match value {
        None | Some(Value::Null) | Some(Value::Bool(true)) => Ok(InjectMode::Auto),
        Some(Value::Bool(false)) => Ok(InjectMode::Disabled),
        Some(Value::String(target)) => target
            .parse()
            .map(InjectMode::Target)
            .map_err(|_| HtmlPluginError::invalid_option("inject", target, expected)),
        Some(other) => Err(HtmlPluginError::invalid_option("inject", other, expected)),
    }
}

fn parse_flag(option: &str, value: Option<&Value>) -> Result<bool> {
    match value {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(other) => Err(HtmlPluginError::invalid_option(option, other, "a boolean")),
    }
}

fn parse_external(external: &ExternalOptions) -> Result<External> {
    let position = match external.position.as_str() {
        "before" => Position::Before,
        "after" => Position::After,
        other => {
            return Err(HtmlPluginError::invalid_option(
                "externals.position",
                other,
                "\"before\" or \"after\"",
            ));
        }
    };

    let cross_origin = match external.cross_origin_policy.as_deref() {
        None => None,
        Some("anonymous") => Some(CrossOrigin::Anonymous),
        Some("use-credentials") => Some(CrossOrigin::UseCredentials),
        Some(other) => {
            return Err(HtmlPluginError::invalid_option(
                "externals.crossOriginPolicy",
                other,
                "\"anonymous\" or \"use-credentials\"",
            ));
        }
    };

    let resource = match external.kind.as_deref() {
        None => ResourceType::for_injection(extension_of(&external.file_path)),
        Some("css" | "style") => ResourceType::Style,
        Some("js" | "script") => ResourceType::Script,
        Some(other) => {
            return Err(HtmlPluginError::invalid_option(
                "externals.type",
                other,
                "\"css\" or \"js\"",
            ));
        }
    };

    let insert_point = match external.insert_point.as_deref() {
        None => None,
        Some(point) => Some(point.parse().map_err(|_| {
            HtmlPluginError::invalid_option("externals.insertPoint", point, "\"head\" or \"body\"")
        })?),
    };

    Ok(External {
        position,
        file_path: external.file_path.clone(),
        resource,
        insert_point,
        cross_origin,
    })
}

/// Extension of a URL or file name, ignoring any query or fragment
pub(crate) fn extension_of(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(index) if index > 0 => &name[index + 1..],
        _ => "",
    }
}

fn normalize_online_path(prefix: Option<&str>) -> String {
    match prefix {
        None => String::new(),
        Some(prefix) => {
            let trimmed = prefix.trim_end_matches('/');
            if trimmed.is_empty() && prefix.is_empty() {
                String::new()
            } else {
                format!("{}/", trimmed)
            }
        }
    }
}
