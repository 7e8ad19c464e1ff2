use serde::{Deserialize, Serialize};

/// Visual classification of a node, driving box height and font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeTier {
    #[default]
    Standard,
    /// Short single-row boxes with a small font.
    Compact,
}

impl NodeTier {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "standard" | "default" => Some(Self::Standard),
            "compact" | "leaf" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// A row as delivered by the data source, before cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub id: String,
    pub name: String,
    pub parent: String,
    pub tier: Option<NodeTier>,
}

impl RawRow {
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent: parent.into(),
            tier: None,
        }
    }
}

/// A cleaned record: the unit the hierarchy builder consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub parent: Option<String>,
    pub tier: NodeTier,
}

impl Record {
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent: parent.map(str::to_string),
            tier: NodeTier::Standard,
        }
    }

    pub fn with_tier(mut self, tier: NodeTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Label length in characters, the unit box sizes are derived from.
    pub fn label_len(&self) -> usize {
        self.name.chars().count()
    }
}
