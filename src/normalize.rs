use crate::config::DEFAULT_COMPACT_LABEL_PATTERN;
use crate::error::{Error, Result};
use crate::ir::{NodeTier, RawRow, Record};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

static DEFAULT_COMPACT_LABEL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(DEFAULT_COMPACT_LABEL_PATTERN).ok());

/// Decides which tier a row belongs to when the source does not say.
#[derive(Debug, Clone)]
pub struct TierRule {
    compact_label: Option<Regex>,
}

impl TierRule {
    pub fn from_pattern(pattern: Option<&str>) -> Result<Self> {
        let compact_label = match pattern {
            None => None,
            Some(pattern) => Some(Regex::new(pattern).map_err(|err| Error::InvalidTierPattern {
                pattern: pattern.to_string(),
                message: err.to_string(),
            })?),
        };
        Ok(Self { compact_label })
    }

    /// Every row is standard unless it carries an explicit tier.
    pub fn none() -> Self {
        Self {
            compact_label: None,
        }
    }

    pub fn classify(&self, row: &RawRow) -> NodeTier {
        if let Some(tier) = row.tier {
            return tier;
        }
        match &self.compact_label {
            Some(re) if re.is_match(&row.name) => NodeTier::Compact,
            _ => NodeTier::Standard,
        }
    }
}

impl Default for TierRule {
    fn default() -> Self {
        Self {
            compact_label: DEFAULT_COMPACT_LABEL.clone(),
        }
    }
}

fn is_header(row: &RawRow) -> bool {
    row.id.to_lowercase() == "id"
}

fn is_blank(row: &RawRow) -> bool {
    row.id.trim().is_empty() && row.name.trim().is_empty() && row.parent.trim().is_empty()
}

#[instrument(level = "debug", skip_all, fields(rows = rows.len()))]
pub fn normalize_rows(rows: &[RawRow], rule: &TierRule) -> Vec<Record> {
    let records: Vec<Record> = rows
        .iter()
        .filter(|row| !is_header(row) && !is_blank(row))
        .map(|row| Record {
            id: row.id.clone(),
            name: row.name.clone(),
            parent: if row.parent.is_empty() {
                None
            } else {
                Some(row.parent.clone())
            },
            tier: rule.classify(row),
        })
        .collect();
    debug!(kept = records.len(), dropped = rows.len() - records.len(), "normalized rows");
    records
}
