//! The render option set.
//!
//! [`PdfOptions`] is an ordered mapping from option name to [`OptionValue`].
//! It is seeded from a [`PdfViewConfig`] when a view is built and can be
//! overridden by the caller before rendering. Values are not validated when
//! set; typed accessors interpret them when the command is built.
//!
//! # Recognized keys
//!
//! | Key | Value | Used for |
//! |-----|-------|----------|
//! | `footer` / `header` | map of `left`, `right`, `center`, `font-name`, `html`, `line`, `spacing`, `font-size` | `--footer-*` / `--header-*` |
//! | `orientation` | `Portrait` / `Landscape` | `--orientation` |
//! | `pageSize` | text, e.g. `A4` | `--page-size` |
//! | `mode` | `download` / `embedded` / `string` / `save` | output dispatch |
//! | `filename` | text | download name or save path |
//! | `binary` | path | program to run |
//! | `copies` | integer | `--copies` when greater than 1 |
//! | `toc` / `grayscale` | bool | `--toc` / `--grayscale` |
//! | `username` / `password` | text, or absent | `--username` / `--password` |
//! | `title` | text | `--title` |
//!
//! Any other key is stored and never read.
//!
//! # Example
//!
//! ```rust
//! use wkhtmltopdf_view::{OptionValue, PdfOptions, PdfViewConfig};
//!
//! let mut options = PdfOptions::from_config(&PdfViewConfig::default());
//! options.set_option("copies", 3);
//! options.set_options([
//!     ("orientation", OptionValue::from("Landscape")),
//!     ("footer", OptionValue::map([("center", "[page]/[topage]")])),
//! ]);
//!
//! assert_eq!(options.copies(), 3);
//! assert_eq!(options.orientation(), "Landscape");
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::command::REDACTED;
use crate::config::PdfViewConfig;
use crate::error::PdfViewError;

/// Option key names.
pub mod keys {
    /// Footer sub-command map.
    pub const FOOTER: &str = "footer";
    /// Header sub-command map.
    pub const HEADER: &str = "header";
    /// Page orientation.
    pub const ORIENTATION: &str = "orientation";
    /// Page size name.
    pub const PAGE_SIZE: &str = "pageSize";
    /// Output dispatch mode.
    pub const MODE: &str = "mode";
    /// Download name or save path.
    pub const FILENAME: &str = "filename";
    /// Path of the wkhtmltopdf executable.
    pub const BINARY: &str = "binary";
    /// Number of copies.
    pub const COPIES: &str = "copies";
    /// Table of contents flag.
    pub const TOC: &str = "toc";
    /// Grayscale flag.
    pub const GRAYSCALE: &str = "grayscale";
    /// HTTP authentication user.
    pub const USERNAME: &str = "username";
    /// HTTP authentication password.
    pub const PASSWORD: &str = "password";
    /// Document title.
    pub const TITLE: &str = "title";
}

/// A single option value.
///
/// Deserializes from plain JSON: `null` is [`Absent`](Self::Absent), objects
/// become [`Map`](Self::Map) with their key order preserved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// No value. Used for unset credentials.
    #[default]
    Absent,
    /// A flag.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A non-integer number, such as `2.0` in JSON.
    Float(f64),
    /// A string.
    Text(String),
    /// A list. Stored as given and never passed to wkhtmltopdf.
    List(Vec<OptionValue>),
    /// A nested mapping (header/footer sub-keys).
    Map(IndexMap<String, OptionValue>),
}

impl OptionValue {
    /// Build a [`Map`](Self::Map) value from key/value pairs, keeping their order.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<OptionValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns the string if this is [`Text`](Self::Text).
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested mapping if this is [`Map`](Self::Map).
    pub fn as_map(&self) -> Option<&IndexMap<String, OptionValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// `true` for [`Absent`](Self::Absent), `false`, the empty string and the
    /// empty map.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Absent | Self::Bool(false) => true,
            Self::Text(s) => s.is_empty(),
            Self::Map(m) => m.is_empty(),
            Self::List(l) => l.is_empty(),
            Self::Bool(true) | Self::Int(_) | Self::Float(_) => false,
        }
    }
}

/// Scalar values render as the text passed to wkhtmltopdf; `true` is `1`,
/// while `false`, absent values, lists and maps render empty.
impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent | Self::Bool(false) | Self::Map(_) | Self::List(_) => Ok(()),
            Self::Bool(true) => f.write_str("1"),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for OptionValue {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<u32> for OptionValue {
    fn from(n: u32) -> Self {
        Self::Int(n.into())
    }
}

impl From<PathBuf> for OptionValue {
    fn from(path: PathBuf) -> Self {
        Self::Text(path.to_string_lossy().into_owned())
    }
}

impl From<IndexMap<String, OptionValue>> for OptionValue {
    fn from(map: IndexMap<String, OptionValue>) -> Self {
        Self::Map(map)
    }
}

impl<T: Into<OptionValue>> From<Option<T>> for OptionValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

impl From<Orientation> for OptionValue {
    fn from(orientation: Orientation) -> Self {
        Self::Text(orientation.as_str().to_string())
    }
}

impl From<RenderMode> for OptionValue {
    fn from(mode: RenderMode) -> Self {
        Self::Text(mode.as_str().to_string())
    }
}

// ============================================================================
// Enumerated option values
// ============================================================================

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Taller than wide.
    #[default]
    Portrait,
    /// Wider than tall.
    Landscape,
}

impl Orientation {
    /// The wkhtmltopdf spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "Portrait",
            Self::Landscape => "Landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = PdfViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            _ => Err(PdfViewError::Configuration(format!(
                "Orientation: {} is not supported",
                s
            ))),
        }
    }
}

/// How rendered PDF bytes are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// HTTP response forcing a file download.
    #[default]
    Download,
    /// HTTP response displayed inline by the browser.
    Embedded,
    /// Bytes returned to the caller, no HTTP response.
    String,
    /// Bytes written to the `filename` path, no HTTP response.
    Save,
}

impl RenderMode {
    /// The option spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Embedded => "embedded",
            Self::String => "string",
            Self::Save => "save",
        }
    }

    /// `true` for the modes that produce an HTTP response.
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Download | Self::Embedded)
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = PdfViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "download" => Ok(Self::Download),
            "embedded" => Ok(Self::Embedded),
            "string" => Ok(Self::String),
            "save" => Ok(Self::Save),
            other => Err(PdfViewError::Configuration(format!(
                "Mode: {} is not supported",
                other
            ))),
        }
    }
}

// ============================================================================
// PdfOptions
// ============================================================================

/// Ordered option set for one view.
///
/// Cloned at the start of every render, so changes made while a render is
/// running never affect it.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PdfOptions {
    values: IndexMap<String, OptionValue>,
}

impl PdfOptions {
    /// An empty option set. Prefer [`from_config`](Self::from_config).
    pub fn new() -> Self {
        Self::default()
    }

    /// The default option set described by `config`.
    pub fn from_config(config: &PdfViewConfig) -> Self {
        let mut options = Self::new();
        options.set_option(keys::FOOTER, OptionValue::Map(IndexMap::new()));
        options.set_option(keys::HEADER, OptionValue::Map(IndexMap::new()));
        options.set_option(keys::ORIENTATION, config.orientation);
        options.set_option(keys::PAGE_SIZE, config.page_size.clone());
        options.set_option(keys::MODE, config.mode);
        options.set_option(keys::FILENAME, config.filename.clone());
        options.set_option(keys::BINARY, config.binary.clone());
        options.set_option(keys::COPIES, config.copies);
        options.set_option(keys::TOC, config.toc);
        options.set_option(keys::GRAYSCALE, config.grayscale);
        options.set_option(keys::USERNAME, config.username.clone());
        options.set_option(keys::PASSWORD, config.password.clone());
        options
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Unknown keys are accepted and ignored when the command is built.
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        let key = key.into();
        let value = value.into();
        if is_credential(&key) {
            log::trace!("Setting option {}", key);
        } else {
            log::trace!("Setting option {} = {:?}", key, value);
        }
        self.values.insert(key, value);
    }

    /// Apply every entry through [`set_option`](Self::set_option).
    pub fn set_options<K, V, I>(&mut self, entries: I)
    where
        K: Into<String>,
        V: Into<OptionValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.set_option(key, value);
        }
    }

    /// Raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of stored options.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if no option is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn text(&self, key: &str) -> String {
        self.get(key).map(ToString::to_string).unwrap_or_default()
    }

    /// Program path. Empty if unset.
    pub fn binary(&self) -> PathBuf {
        PathBuf::from(self.text(keys::BINARY))
    }

    /// Copy count; integers and numeric strings are honored, anything else
    /// counts as 1.
    pub fn copies(&self) -> i64 {
        match self.get(keys::COPIES) {
            Some(OptionValue::Int(n)) => *n,
            Some(OptionValue::Float(n)) if n.is_finite() => n.trunc() as i64,
            Some(OptionValue::Text(s)) => s.trim().parse().unwrap_or(1),
            _ => 1,
        }
    }

    /// Orientation text as passed to `--orientation`.
    pub fn orientation(&self) -> String {
        self.text(keys::ORIENTATION)
    }

    /// Page size text as passed to `--page-size`.
    pub fn page_size(&self) -> String {
        self.text(keys::PAGE_SIZE)
    }

    /// `true` only when `toc` is the boolean `true`.
    pub fn toc(&self) -> bool {
        matches!(self.get(keys::TOC), Some(OptionValue::Bool(true)))
    }

    /// `true` only when `grayscale` is the boolean `true`.
    pub fn grayscale(&self) -> bool {
        matches!(self.get(keys::GRAYSCALE), Some(OptionValue::Bool(true)))
    }

    fn credential(&self, key: &str) -> Option<String> {
        match self.get(key) {
            None | Some(OptionValue::Absent) | Some(OptionValue::Bool(false)) => None,
            Some(value) => Some(value.to_string()),
        }
    }

    /// Username, unless absent or `false`.
    pub fn username(&self) -> Option<String> {
        self.credential(keys::USERNAME)
    }

    /// Password, unless absent or `false`.
    pub fn password(&self) -> Option<String> {
        self.credential(keys::PASSWORD)
    }

    /// Title text; empty if unset.
    pub fn title(&self) -> String {
        self.text(keys::TITLE)
    }

    /// `true` if a non-empty title has been set.
    pub fn has_title(&self) -> bool {
        self.get(keys::TITLE).is_some_and(|v| !v.is_empty())
    }

    /// Download name or save path.
    pub fn filename(&self) -> String {
        self.text(keys::FILENAME)
    }

    /// Parsed render mode.
    ///
    /// # Errors
    ///
    /// [`PdfViewError::Configuration`] if the mode is not one of
    /// `download`, `embedded`, `string`, `save`.
    pub fn mode(&self) -> crate::Result<RenderMode> {
        self.text(keys::MODE).parse()
    }

    /// Nested mapping for a header/footer section; `None` if the option is
    /// missing or is not a map.
    pub fn section(&self, name: &str) -> Option<&IndexMap<String, OptionValue>> {
        self.get(name).and_then(OptionValue::as_map)
    }
}

impl fmt::Debug for PdfOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.values {
            if is_credential(key) && *value != OptionValue::Absent {
                map.entry(key, &REDACTED);
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

fn is_credential(key: &str) -> bool {
    key == keys::USERNAME || key == keys::PASSWORD
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for PdfOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Self::new();
        options.set_options(iter);
        options
    }
}

impl<K: Into<String>, V: Into<OptionValue>> Extend<(K, V)> for PdfOptions {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.set_options(iter);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
