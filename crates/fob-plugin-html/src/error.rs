//! Error types for the HTML plugin

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HtmlPluginError>;

/// Errors raised while validating options or emitting the HTML document
#[derive(Error, Debug, Diagnostic)]
pub enum HtmlPluginError {
    /// An option has a value outside of its accepted set
    #[error("Invalid value for the `{option}` option: {value}")]
    #[diagnostic(code(fob::html::invalid_option), help("Expected {expected}"))]
    InvalidOption {
        option: String,
        value: String,
        expected: String,
    },

    /// Two options were enabled that cannot be used together
    #[error("The `{first}` and `{second}` options cannot be used together")]
    #[diagnostic(
        code(fob::html::conflicting_options),
        help("Switch off one of the options")
    )]
    ConflictingOptions { first: String, second: String },

    /// The module mode does not fit the bundle output format
    #[error("The `{option}` option is set to true but the output format is {format}")]
    #[diagnostic(code(fob::html::incompatible_format))]
    IncompatibleFormat {
        option: String,
        format: String,
        #[help]
        hint: String,
    },

    /// The options record could not be deserialized
    #[error("Invalid HTML plugin configuration: {message}")]
    #[diagnostic(code(fob::html::invalid_config))]
    InvalidConfig { message: String },

    /// No template was configured
    #[error("The `template` option is required")]
    #[diagnostic(
        code(fob::html::missing_template),
        help("Set `template` to an HTML file path or to literal HTML markup")
    )]
    MissingTemplate,

    /// A literal template needs an explicit output file name
    #[error("When `template` is an HTML string the `fileName` option must be defined")]
    #[diagnostic(code(fob::html::missing_file_name))]
    MissingFileName,

    /// A file referenced by an option does not exist
    #[error("The file `{}` from the `{option}` option does not exist", .path.display())]
    #[diagnostic(code(fob::html::file_not_found))]
    FileNotFound { option: String, path: PathBuf },

    /// The removed `file` option was used
    #[error("The `file` option is deprecated")]
    #[diagnostic(
        code(fob::html::legacy_file_option),
        help("Rename `file` to `fileName`")
    )]
    LegacyFileOption,

    /// The resolved output path is the template itself
    #[error("Couldn't write the generated HTML to the source template {}", .path.display())]
    #[diagnostic(
        code(fob::html::self_overwrite),
        help("Define one of the options: `fileName`, the output `file` or the output `dir`")
    )]
    SelfOverwrite { path: PathBuf },

    /// The template has no `<html>` element
    #[error("The input template doesn't contain the `html` tag")]
    #[diagnostic(code(fob::html::missing_root_element))]
    MissingRootElement,

    /// Reading the template file failed
    #[error("Failed to read the template {}: {source}", .path.display())]
    #[diagnostic(code(fob::html::read_template))]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the favicon file failed
    #[error("Failed to read the favicon {}: {source}", .path.display())]
    #[diagnostic(code(fob::html::read_favicon))]
    ReadFavicon {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a configuration file failed
    #[error("Failed to read the configuration file {}: {source}", .path.display())]
    #[diagnostic(code(fob::html::read_config))]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The minifier returned bytes that are not UTF-8
    #[error("Minified HTML is not valid UTF-8: {source}")]
    #[diagnostic(code(fob::html::minify))]
    Minify {
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl HtmlPluginError {
    pub fn invalid_option(
        option: impl Into<String>,
        value: impl std::fmt::Display,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidOption {
            option: option.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    pub fn conflicting_options(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::ConflictingOptions {
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn incompatible_format(
        option: impl Into<String>,
        format: impl std::fmt::Display,
        hint: impl Into<String>,
    ) -> Self {
        Self::IncompatibleFormat {
            option: option.into(),
            format: format.to_string(),
            hint: hint.into(),
        }
    }

    pub fn invalid_config(message: impl std::fmt::Display) -> Self {
        Self::InvalidConfig {
            message: message.to_string(),
        }
    }

    pub fn file_not_found(option: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound {
            option: option.into(),
            path: path.into(),
        }
    }

    pub fn self_overwrite(path: impl Into<PathBuf>) -> Self {
        Self::SelfOverwrite { path: path.into() }
    }
}
