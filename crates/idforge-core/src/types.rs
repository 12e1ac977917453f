use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ItemKind
// ---------------------------------------------------------------------------

/// Category assigned to a line of IBO text. Declaration order is the
/// classifier's priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    BusinessObjective,
    Wiifm,
    PerformanceMetric,
    ObservableBehavior,
    LearningObjective,
}

impl ItemKind {
    pub fn all() -> &'static [ItemKind] {
        &[
            ItemKind::BusinessObjective,
            ItemKind::Wiifm,
            ItemKind::PerformanceMetric,
            ItemKind::ObservableBehavior,
            ItemKind::LearningObjective,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::BusinessObjective => "business_objective",
            ItemKind::Wiifm => "wiifm",
            ItemKind::PerformanceMetric => "performance_metric",
            ItemKind::ObservableBehavior => "observable_behavior",
            ItemKind::LearningObjective => "learning_objective",
        }
    }

    /// Indentation level used when rendering.
    pub fn depth(self) -> u8 {
        match self {
            ItemKind::BusinessObjective => 1,
            ItemKind::Wiifm | ItemKind::PerformanceMetric => 2,
            ItemKind::ObservableBehavior => 3,
            ItemKind::LearningObjective => 4,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StepId
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepId {
    Persona,
    Topic,
    GenerateIbos,
    ChooseModality,
    Build4c,
    Review,
}

impl StepId {
    pub fn all() -> &'static [StepId] {
        &[
            StepId::Persona,
            StepId::Topic,
            StepId::GenerateIbos,
            StepId::ChooseModality,
            StepId::Build4c,
            StepId::Review,
        ]
    }

    pub fn first() -> StepId {
        StepId::Persona
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<StepId> {
        StepId::all().get(i).copied()
    }

    pub fn next(self) -> Option<StepId> {
        StepId::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Option<StepId> {
        self.index().checked_sub(1).and_then(StepId::from_index)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepId::Persona => "persona",
            StepId::Topic => "topic",
            StepId::GenerateIbos => "generate-ibos",
            StepId::ChooseModality => "choose-modality",
            StepId::Build4c => "build-4c",
            StepId::Review => "review",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            StepId::Persona => "Choose persona",
            StepId::Topic => "Topic & business goals",
            StepId::GenerateIbos => "Generate IBOs",
            StepId::ChooseModality => "Choose modality",
            StepId::Build4c => "Build 4C activities",
            StepId::Review => "Review",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StepId {
    type Err = crate::error::IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "persona" => Ok(StepId::Persona),
            // Older session records used the builder view's step names.
            "topic" | "topic-goals" => Ok(StepId::Topic),
            "generate-ibos" | "ai-generation" => Ok(StepId::GenerateIbos),
            "choose-modality" => Ok(StepId::ChooseModality),
            "build-4c" | "build-activities" | "cards" => Ok(StepId::Build4c),
            "review" => Ok(StepId::Review),
            _ => Err(crate::error::IdError::InvalidStep(s.to_string())),
        }
    }
}

impl Serialize for StepId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StepId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Modality
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Onsite,
    Virtual,
    Hybrid,
}

impl Modality {
    pub fn as_str(self) -> &'static str {
        match self {
            Modality::Onsite => "onsite",
            Modality::Virtual => "virtual",
            Modality::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Modality {
    type Err = crate::error::IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "onsite" | "on-site" | "in-person" => Ok(Modality::Onsite),
            "virtual" | "remote" => Ok(Modality::Virtual),
            "hybrid" => Ok(Modality::Hybrid),
            _ => Err(crate::error::IdError::InvalidModality(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// FourCPhase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FourCPhase {
    Connection,
    Concept,
    ConcretePractice,
    Conclusion,
}

impl FourCPhase {
    pub fn all() -> &'static [FourCPhase] {
        &[
            FourCPhase::Connection,
            FourCPhase::Concept,
            FourCPhase::ConcretePractice,
            FourCPhase::Conclusion,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FourCPhase::Connection => "connection",
            FourCPhase::Concept => "concept",
            FourCPhase::ConcretePractice => "concrete_practice",
            FourCPhase::Conclusion => "conclusion",
        }
    }
}

impl fmt::Display for FourCPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FourCPhase {
    type Err = crate::error::IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "connection" | "connections" => Ok(FourCPhase::Connection),
            "concept" | "concepts" => Ok(FourCPhase::Concept),
            "concrete_practice" | "concrete-practice" | "practice" => {
                Ok(FourCPhase::ConcretePractice)
            }
            "conclusion" | "conclusions" => Ok(FourCPhase::Conclusion),
            _ => Err(crate::error::IdError::InvalidPhase(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn step_ordering() {
        assert!(StepId::Persona < StepId::Topic);
        assert!(StepId::Build4c < StepId::Review);
        assert_eq!(StepId::all().len(), 6);
    }

    #[test]
    fn step_next_prev() {
        assert_eq!(StepId::Persona.next(), Some(StepId::Topic));
        assert_eq!(StepId::Review.next(), None);
        assert_eq!(StepId::Persona.prev(), None);
        assert_eq!(StepId::ChooseModality.prev(), Some(StepId::GenerateIbos));
    }

    #[test]
    fn step_parse_canonical() {
        for step in StepId::all() {
            assert_eq!(StepId::from_str(step.as_str()).unwrap(), *step);
        }
    }

    #[test]
    fn step_parse_legacy_names() {
        assert_eq!(StepId::from_str("topic-goals").unwrap(), StepId::Topic);
        assert_eq!(
            StepId::from_str("ai-generation").unwrap(),
            StepId::GenerateIbos
        );
        assert_eq!(StepId::from_str("cards").unwrap(), StepId::Build4c);
        assert!(StepId::from_str("refine-ibos").is_err());
    }

    #[test]
    fn step_serializes_as_kebab_id() {
        let json = serde_json::to_string(&StepId::GenerateIbos).unwrap();
        assert_eq!(json, "\"generate-ibos\"");
        let parsed: StepId = serde_json::from_str("\"build-activities\"").unwrap();
        assert_eq!(parsed, StepId::Build4c);
    }

    #[test]
    fn modality_parse_is_case_insensitive() {
        assert_eq!(Modality::from_str("Virtual").unwrap(), Modality::Virtual);
        assert_eq!(Modality::from_str(" HYBRID ").unwrap(), Modality::Hybrid);
        assert!(Modality::from_str("carrier-pigeon").is_err());
    }

    #[test]
    fn item_kind_depths() {
        assert_eq!(ItemKind::BusinessObjective.depth(), 1);
        assert_eq!(ItemKind::Wiifm.depth(), 2);
        assert_eq!(ItemKind::LearningObjective.depth(), 4);
    }

    #[test]
    fn four_c_phase_parse() {
        assert_eq!(
            FourCPhase::from_str("concrete-practice").unwrap(),
            FourCPhase::ConcretePractice
        );
        assert!(FourCPhase::from_str("closing").is_err());
    }
}
