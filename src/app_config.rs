use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::screenplay::ElementKind;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Line classification keywords
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Scene number formatting
    #[serde(default)]
    pub numbering: NumberingConfig,

    /// Page simulation settings
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Template substitution values
    #[serde(default)]
    pub template: TemplateConfig,

    /// External export program
    #[serde(default)]
    pub export: ExportConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Keyword lists driving scene heading and transition detection
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Scene heading prefixes, matched case-insensitively
    #[serde(default = "default_scene_heading_prefixes")]
    pub scene_heading_prefixes: Vec<String>,

    /// Transition suffixes, matched at the end of an uppercase line
    #[serde(default = "default_transition_suffixes")]
    pub transition_suffixes: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            scene_heading_prefixes: default_scene_heading_prefixes(),
            transition_suffixes: default_transition_suffixes(),
        }
    }
}

/// Where revision letters are written relative to the base number
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RevisionPlacement {
    // @placement: 10A sorts between 10 and 11
    #[default]
    Suffix,
    // @placement: A11 sorts between 10 and 11
    Prefix,
}

impl RevisionPlacement {
    // @returns: Capitalized placement name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Suffix => "Suffix",
            Self::Prefix => "Prefix",
        }
    }
}

impl std::fmt::Display for RevisionPlacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Suffix => write!(f, "suffix"),
            Self::Prefix => write!(f, "prefix"),
        }
    }
}

impl std::str::FromStr for RevisionPlacement {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "suffix" => Ok(Self::Suffix),
            "prefix" => Ok(Self::Prefix),
            _ => Err(anyhow!("Invalid revision placement: {}", s)),
        }
    }
}

/// Scene numbering configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NumberingConfig {
    // @field: Revision letter placement
    #[serde(default)]
    pub placement: RevisionPlacement,

    // @field: Separator between revision levels, e.g. 10A-B
    #[serde(default = "default_revision_separator")]
    pub revision_separator: String,
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            placement: RevisionPlacement::default(),
            revision_separator: default_revision_separator(),
        }
    }
}

/// Paper size determining the page line budget
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    Letter,
    A4,
}

impl PageSize {
    // @returns: Printable lines per page
    pub fn lines_per_page(&self) -> usize {
        match self {
            Self::Letter => 55,
            Self::A4 => 60,
        }
    }

    // @returns: Capitalized size name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Letter => "Letter",
            Self::A4 => "A4",
        }
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Letter => write!(f, "letter"),
            Self::A4 => write!(f, "a4"),
        }
    }
}

impl std::str::FromStr for PageSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "letter" | "us-letter" => Ok(Self::Letter),
            "a4" => Ok(Self::A4),
            _ => Err(anyhow!("Invalid page size: {}", s)),
        }
    }
}

/// Column widths in characters used when word-wrapping elements
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FillWidths {
    #[serde(default = "default_action_width")]
    pub action: usize,
    #[serde(default = "default_scene_heading_width")]
    pub scene_heading: usize,
    #[serde(default = "default_character_width")]
    pub character: usize,
    #[serde(default = "default_dialogue_width")]
    pub dialogue: usize,
    #[serde(default = "default_parenthetical_width")]
    pub parenthetical: usize,
    #[serde(default = "default_transition_width")]
    pub transition: usize,
    #[serde(default = "default_centered_width")]
    pub centered: usize,
}

impl FillWidths {
    /// Widths of one side of a dual-dialogue pair
    pub fn dual() -> Self {
        Self {
            action: default_action_width(),
            scene_heading: default_scene_heading_width(),
            character: 28,
            dialogue: 28,
            parenthetical: 22,
            transition: default_transition_width(),
            centered: default_centered_width(),
        }
    }

    // @returns: Fill width for an element kind
    pub fn width_for(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::SceneHeading => self.scene_heading,
            ElementKind::Character => self.character,
            ElementKind::Dialogue => self.dialogue,
            ElementKind::Parenthetical => self.parenthetical,
            ElementKind::Transition => self.transition,
            ElementKind::Centered => self.centered,
            _ => self.action,
        }
    }

    fn all(&self) -> [usize; 7] {
        [
            self.action,
            self.scene_heading,
            self.character,
            self.dialogue,
            self.parenthetical,
            self.transition,
            self.centered,
        ]
    }
}

impl Default for FillWidths {
    fn default() -> Self {
        Self {
            action: default_action_width(),
            scene_heading: default_scene_heading_width(),
            character: default_character_width(),
            dialogue: default_dialogue_width(),
            parenthetical: default_parenthetical_width(),
            transition: default_transition_width(),
            centered: default_centered_width(),
        }
    }
}

/// Pagination configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PaginationConfig {
    /// Paper size
    #[serde(default)]
    pub page_size: PageSize,

    /// Overrides the paper size line budget
    #[serde(default)]
    pub lines_per_page: Option<usize>,

    /// Single column fill widths
    #[serde(default)]
    pub widths: FillWidths,

    /// Fill widths for dual-dialogue columns
    #[serde(default = "FillWidths::dual")]
    pub dual_widths: FillWidths,

    /// Element kinds that appear in exported output
    #[serde(default = "default_export_elements")]
    pub export_elements: Vec<ElementKind>,

    /// Marker written before a page break that splits dialogue
    #[serde(default = "default_more_marker")]
    pub more_marker: String,

    /// Marker appended to the restated character after a split
    #[serde(default = "default_continued_marker")]
    pub continued_marker: String,

    /// Forced page break marker
    #[serde(default = "default_page_break_marker")]
    pub page_break_marker: String,

    /// Write the following page number after inserted markers
    #[serde(default)]
    pub number_pages: bool,
}

impl PaginationConfig {
    /// Effective line budget of one page
    pub fn page_line_budget(&self) -> usize {
        self.lines_per_page
            .unwrap_or_else(|| self.page_size.lines_per_page())
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            lines_per_page: None,
            widths: FillWidths::default(),
            dual_widths: FillWidths::dual(),
            export_elements: default_export_elements(),
            more_marker: default_more_marker(),
            continued_marker: default_continued_marker(),
            page_break_marker: default_page_break_marker(),
            number_pages: false,
        }
    }
}

/// Values for `{{key}}` template tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TemplateConfig {
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub email: Option<String>,

    /// chrono format string for `{{time}}`
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            fullname: None,
            nick: None,
            email: None,
            time_format: default_time_format(),
        }
    }
}

/// External export program settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExportConfig {
    /// Program to run
    #[serde(default = "default_export_program")]
    pub program: String,

    /// Arguments; `{source}` and `{output}` are substituted
    #[serde(default = "default_export_args")]
    pub args: Vec<String>,

    /// Output file extension
    #[serde(default = "default_export_extension")]
    pub extension: String,

    /// Timeout in seconds
    #[serde(default = "default_export_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            program: default_export_program(),
            args: default_export_args(),
            extension: default_export_extension(),
            timeout_secs: default_export_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_scene_heading_prefixes() -> Vec<String> {
    ["INT", "EXT", "EST", "INT./EXT", "INT/EXT", "I/E"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_transition_suffixes() -> Vec<String> {
    ["TO:", "FADE OUT", "FADE OUT.", "FADE TO BLACK."]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_revision_separator() -> String {
    "-".to_string()
}

fn default_action_width() -> usize {
    61
}

fn default_scene_heading_width() -> usize {
    61
}

fn default_character_width() -> usize {
    38
}

fn default_dialogue_width() -> usize {
    35
}

fn default_parenthetical_width() -> usize {
    26
}

fn default_transition_width() -> usize {
    61
}

fn default_centered_width() -> usize {
    61
}

fn default_export_elements() -> Vec<ElementKind> {
    vec![
        ElementKind::SceneHeading,
        ElementKind::Action,
        ElementKind::Character,
        ElementKind::Dialogue,
        ElementKind::Parenthetical,
        ElementKind::Transition,
        ElementKind::Centered,
        ElementKind::PageBreak,
    ]
}

fn default_more_marker() -> String {
    "(MORE)".to_string()
}

fn default_continued_marker() -> String {
    "(CONT'D)".to_string()
}

fn default_page_break_marker() -> String {
    "===".to_string()
}

fn default_time_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_export_program() -> String {
    "afterwriting".to_string()
}

fn default_export_args() -> Vec<String> {
    vec![
        "--source".to_string(),
        "{source}".to_string(),
        "--pdf".to_string(),
        "{output}".to_string(),
        "--overwrite".to_string(),
    ]
}

fn default_export_extension() -> String {
    "pdf".to_string()
}

fn default_export_timeout_secs() -> u64 {
    120
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.classifier.scene_heading_prefixes.iter().all(|p| p.trim().is_empty()) {
            return Err(anyhow!("At least one scene heading prefix is required"));
        }
        if self.classifier.transition_suffixes.iter().all(|s| s.trim().is_empty()) {
            return Err(anyhow!("At least one transition suffix is required"));
        }

        let separator = &self.numbering.revision_separator;
        if separator.chars().any(|c| c.is_ascii_alphanumeric() || c == '#') {
            return Err(anyhow!(
                "Revision separator '{}' must not contain letters, digits or '#'",
                separator
            ));
        }

        let pagination = &self.pagination;
        if pagination.page_line_budget() < 10 {
            return Err(anyhow!(
                "A page must hold at least 10 lines, got {}",
                pagination.page_line_budget()
            ));
        }
        if pagination
            .widths
            .all()
            .iter()
            .chain(pagination.dual_widths.all().iter())
            .any(|width| *width == 0)
        {
            return Err(anyhow!("Fill widths must be greater than zero"));
        }
        if pagination.page_break_marker.len() < 3
            || !pagination.page_break_marker.chars().all(|c| c == '=')
        {
            return Err(anyhow!(
                "Page break marker must be three or more '=' characters"
            ));
        }

        let has_error = chrono::format::StrftimeItems::new(&self.template.time_format)
            .any(|item| matches!(item, chrono::format::Item::Error));
        if has_error {
            return Err(anyhow!("Invalid time format: {}", self.template.time_format));
        }

        if self.export.program.trim().is_empty() {
            return Err(anyhow!("Export program is required"));
        }
        if self.export.timeout_secs == 0 {
            return Err(anyhow!("Export timeout must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            classifier: ClassifierConfig::default(),
            numbering: NumberingConfig::default(),
            pagination: PaginationConfig::default(),
            template: TemplateConfig::default(),
            export: ExportConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
