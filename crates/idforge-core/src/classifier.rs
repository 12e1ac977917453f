use crate::rules::default_rules;
use crate::types::ItemKind;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ItemPath
// ---------------------------------------------------------------------------

/// Hierarchical address of a classified item. Only the prefix relevant to
/// the item's kind is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPath {
    pub bo: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ob: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lo: Option<u32>,
}

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bo)?;
        for part in [self.pm, self.ob, self.lo].into_iter().flatten() {
            write!(f, ".{part}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ClassifiedItem (output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedItem {
    pub kind: ItemKind,
    /// `None` for WIIFM items, which belong to the preceding business
    /// objective by position only.
    pub path: Option<ItemPath>,
    pub title: String,
    pub depth: u8,
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// Scan state threaded through the left-to-right fold over lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub bo: u32,
    pub pm: u32,
    pub ob: u32,
    pub lo: u32,
}

impl Counters {
    /// Advance the counters for an item of `kind`, resetting every deeper
    /// level, and return the item's path.
    pub fn step(self, kind: ItemKind) -> (Counters, Option<ItemPath>) {
        let next = match kind {
            ItemKind::BusinessObjective => Counters {
                bo: self.bo.saturating_add(1),
                ..Counters::default()
            },
            ItemKind::PerformanceMetric => Counters {
                pm: self.pm.saturating_add(1),
                ob: 0,
                lo: 0,
                ..self
            },
            ItemKind::ObservableBehavior => Counters {
                ob: self.ob.saturating_add(1),
                lo: 0,
                ..self
            },
            ItemKind::LearningObjective => Counters {
                lo: self.lo.saturating_add(1),
                ..self
            },
            ItemKind::Wiifm => return (self, None),
        };
        (next, Some(next.path_for(kind)))
    }

    fn path_for(self, kind: ItemKind) -> ItemPath {
        let depth = kind.depth();
        ItemPath {
            bo: self.bo,
            pm: (depth >= 2).then_some(self.pm),
            ob: (depth >= 3).then_some(self.ob),
            lo: (depth >= 4).then_some(self.lo),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// A fn-pointer rule: `matches` is called with a trimmed line.
pub struct Rule {
    pub id: &'static str,
    pub kind: ItemKind,
    pub matches: fn(&str) -> bool,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl Classifier {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First rule matching `line`, in table order.
    pub fn matching_rule(&self, line: &str) -> Option<&Rule> {
        let line = line.trim();
        self.rules.iter().find(|rule| (rule.matches)(line))
    }

    /// Classify every significant line of `text`. Lines no rule matches are
    /// dropped; an empty result means the caller should show the raw text.
    pub fn classify(&self, text: &str) -> Vec<ClassifiedItem> {
        let (_, items) = significant_lines(text).fold(
            (Counters::default(), Vec::new()),
            |(counters, mut items), line| {
                let Some(rule) = self.matching_rule(line) else {
                    tracing::debug!(line, "no IBO rule matched; dropping line");
                    return (counters, items);
                };
                let (counters, path) = counters.step(rule.kind);
                tracing::trace!(rule = rule.id, kind = %rule.kind, "classified line");
                items.push(ClassifiedItem {
                    kind: rule.kind,
                    path,
                    title: extract_title(rule.kind, line),
                    depth: rule.kind.depth(),
                });
                (counters, items)
            },
        );
        items
    }
}

/// Classify `text` with the default rule table.
pub fn classify(text: &str) -> Vec<ClassifiedItem> {
    Classifier::default().classify(text)
}

/// Trimmed lines of at least three characters. Accepts `\n`, `\r\n`, and
/// bare `\r` endings.
pub fn significant_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| line.chars().count() >= 3)
}

// ---------------------------------------------------------------------------
// Title extraction
// ---------------------------------------------------------------------------

/// Strip heading markers, bold delimiters, list or number markers, and the
/// kind's label prefix. Falls back to the cleaned line when the label is all
/// there is.
pub fn extract_title(kind: ItemKind, line: &str) -> String {
    let text = regex!(r"^#+\s*").replace(line.trim(), "");
    let text = text.replace("**", "").replace("__", "");
    let text = regex!(r"^(?:[-*•+]\s+|\d+[.)](?:\s+|$))+").replace(text.trim(), "");
    let cleaned = text.trim();

    let label = match kind {
        ItemKind::BusinessObjective => regex!(
            r"(?i)^(?:(?:business\s+objectives?|intended\s+business\s+outcomes?|ibos?)\b|bo\d+\b)\s*(?:#?\d+(?:\.\d+)*\s*(?:[:.\-–—)]|$))?\s*[:.\-–—]?\s*"
        ),
        ItemKind::Wiifm => regex!(
            r"(?i)^(?:wiifm|what['’]s\s+in\s+it\s+for\s+me|value\s+proposition)\b\??\s*(?:\([^)]*\))?\s*[:.\-–—]?\s*"
        ),
        ItemKind::PerformanceMetric => regex!(
            r"(?i)^(?:performance\s+metrics?|success\s+metrics?|kpis?)\b\s*(?:#?\d+(?:\.\d+)*\s*(?:[:.\-–—)]|$))?\s*[:.\-–—]?\s*"
        ),
        ItemKind::ObservableBehavior => regex!(
            r"(?i)^observable\s+behaviou?rs?\b\s*(?:#?\d+(?:\.\d+)*\s*(?:[:.\-–—)]|$))?\s*[:.\-–—]?\s*"
        ),
        ItemKind::LearningObjective => regex!(
            r"(?i)^learning\s+objectives?\b\s*(?:#?\d+(?:\.\d+)*\s*(?:[:.\-–—)]|$))?\s*[:.\-–—]?\s*"
        ),
    };

    let stripped = label.replace(cleaned, "");
    let title = if stripped.trim().is_empty() {
        cleaned
    } else {
        stripped.trim()
    };
    title.trim_end_matches(':').trim_end().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
