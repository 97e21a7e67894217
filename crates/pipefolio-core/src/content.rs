//! Static portfolio content
//!
//! The whole page is data: a profile plus an ordered list of stages, each with
//! its console log, an optional pipeline prompt and a list of content blocks.
//! A default portfolio is compiled in; any TOML file with the same shape can
//! replace it.

use crate::stage::StageId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const BUILTIN_PORTFOLIO: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/content/portfolio.toml"
));

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse content{}: {source}", display_origin(.path))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: toml::de::Error,
    },
    #[error("portfolio has no stages")]
    NoStages,
    #[error("stage {stage} has an empty title")]
    EmptyTitle { stage: usize },
    #[error("stage {stage}: progress for {label:?} is {percent}%, expected 0-100")]
    ProgressOutOfRange {
        stage: usize,
        label: String,
        percent: u8,
    },
}

fn display_origin(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

/// Tech badge color; unknown names fall back to blue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BadgeColor {
    #[default]
    Blue,
    Green,
    Orange,
    Purple,
    Red,
    Yellow,
    Gray,
}

impl BadgeColor {
    pub fn name(self) -> &'static str {
        match self {
            BadgeColor::Blue => "blue",
            BadgeColor::Green => "green",
            BadgeColor::Orange => "orange",
            BadgeColor::Purple => "purple",
            BadgeColor::Red => "red",
            BadgeColor::Yellow => "yellow",
            BadgeColor::Gray => "gray",
        }
    }
}

impl From<String> for BadgeColor {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "green" => BadgeColor::Green,
            "orange" => BadgeColor::Orange,
            "purple" => BadgeColor::Purple,
            "red" => BadgeColor::Red,
            "yellow" => BadgeColor::Yellow,
            "gray" | "grey" => BadgeColor::Gray,
            _ => BadgeColor::Blue,
        }
    }
}

impl From<BadgeColor> for String {
    fn from(color: BadgeColor) -> Self {
        color.name().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub name: String,
    #[serde(default)]
    pub color: BadgeColor,
    /// Optional glyph shown before the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A label/value row ("Role: DevOps Engineer")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<BadgeColor>,
}

impl KeyValue {
    /// Value placeholder replaced by the current date at render time
    pub const TODAY: &'static str = "@today";

    pub fn is_today(&self) -> bool {
        self.value == Self::TODAY
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronouns: Option<String>,
    pub headline: String,
    #[serde(default)]
    pub summary: Vec<String>,
    #[serde(default)]
    pub badges: Vec<Badge>,
    #[serde(default)]
    pub status: Vec<KeyValue>,
}

/// Command and canned answer shown in the pipeline prompt popup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub command: String,
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub color: BadgeColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default)]
    pub color: BadgeColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressItem {
    pub label: String,
    pub percent: u8,
    #[serde(default)]
    pub color: BadgeColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub url: String,
    #[serde(default)]
    pub color: BadgeColor,
}

/// One piece of section content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Text {
        paragraphs: Vec<String>,
    },
    Badges {
        heading: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        badges: Vec<Badge>,
    },
    /// A role card: title, subtitle, period and bullet points
    Bullets {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        period: Option<String>,
        items: Vec<String>,
    },
    Metrics {
        heading: String,
        metrics: Vec<Metric>,
    },
    Projects {
        projects: Vec<Project>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        footer: Option<Link>,
    },
    List {
        heading: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        items: Vec<ListItem>,
    },
    Progress {
        heading: String,
        items: Vec<ProgressItem>,
    },
    Links {
        heading: String,
        links: Vec<Link>,
    },
    KeyValues {
        heading: String,
        rows: Vec<KeyValue>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageContent {
    /// Short name used in the navigation ("Build")
    pub title: String,
    /// What the stage does ("Compile Experience")
    pub description: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Section heading; defaults to the description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Prompt>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

fn default_icon() -> String {
    "●".to_string()
}

impl StageContent {
    pub fn heading(&self) -> &str {
        self.heading.as_deref().unwrap_or(&self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Name shown in the header
    #[serde(default = "default_title")]
    pub title: String,
    pub profile: Profile,
    pub stages: Vec<StageContent>,
}

fn default_title() -> String {
    "DevOps Pipeline".to_string()
}

impl Portfolio {
    /// The compiled-in portfolio
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_toml_str(BUILTIN_PORTFOLIO, None)
    }

    /// Load and validate a portfolio file
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let text = std::fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, Some(path))
    }

    /// Parse and validate TOML content. `origin` is only used in error messages.
    pub fn from_toml_str(text: &str, origin: Option<&Path>) -> Result<Self, ContentError> {
        let portfolio: Portfolio = toml::from_str(text).map_err(|source| ContentError::Parse {
            path: origin.map(Path::to_path_buf),
            source,
        })?;
        portfolio.validate()?;
        Ok(portfolio)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        if self.stages.is_empty() {
            return Err(ContentError::NoStages);
        }
        for (index, stage) in self.stages.iter().enumerate() {
            if stage.title.trim().is_empty() {
                return Err(ContentError::EmptyTitle { stage: index });
            }
            for block in &stage.blocks {
                if let Block::Progress { items, .. } = block {
                    if let Some(item) = items.iter().find(|item| item.percent > 100) {
                        return Err(ContentError::ProgressOutOfRange {
                            stage: index,
                            label: item.label.clone(),
                            percent: item.percent,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn stage(&self, id: StageId) -> Option<&StageContent> {
        self.stages.get(id.index())
    }

    pub fn stage_ids(&self) -> impl Iterator<Item = StageId> + '_ {
        (0..self.stages.len()).map(StageId::new)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
