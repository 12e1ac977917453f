use crate::types::FourCPhase;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A timed activity in a session's 4C sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub phase: FourCPhase,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration_minutes: u32,
}

impl Activity {
    pub fn new(phase: FourCPhase, title: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase,
            title: title.into(),
            description: None,
            duration_minutes,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

pub fn total_minutes(activities: &[Activity]) -> u64 {
    activities.iter().map(|a| u64::from(a.duration_minutes)).sum()
}

/// 4C phases with no activity yet, in 4C order.
pub fn missing_phases(activities: &[Activity]) -> Vec<FourCPhase> {
    FourCPhase::all()
        .iter()
        .copied()
        .filter(|p| !activities.iter().any(|a| a.phase == *p))
        .collect()
}

/// Activities ordered by 4C phase, keeping insertion order within a phase.
pub fn in_sequence(activities: &[Activity]) -> Vec<&Activity> {
    let mut ordered: Vec<&Activity> = activities.iter().collect();
    ordered.sort_by_key(|a| a.phase);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Activity> {
        vec![
            Activity::new(FourCPhase::ConcretePractice, "Role play", 20),
            Activity::new(FourCPhase::Connection, "Warm-up poll", 5),
            Activity::new(FourCPhase::ConcretePractice, "Peer review", 10),
        ]
    }

    #[test]
    fn totals_durations() {
        assert_eq!(total_minutes(&sample()), 35);
        assert_eq!(total_minutes(&[]), 0);
    }

    #[test]
    fn total_does_not_overflow_u32() {
        let acts = vec![
            Activity::new(FourCPhase::Concept, "Marathon", u32::MAX),
            Activity::new(FourCPhase::Conclusion, "Wrap-up", 1),
        ];
        assert_eq!(total_minutes(&acts), u64::from(u32::MAX) + 1);
    }

    #[test]
    fn reports_missing_phases_in_order() {
        assert_eq!(
            missing_phases(&sample()),
            vec![FourCPhase::Concept, FourCPhase::Conclusion]
        );
        assert_eq!(missing_phases(&[]).len(), 4);
    }

    #[test]
    fn sequence_is_stable_within_phase() {
        let acts = sample();
        let titles: Vec<&str> = in_sequence(&acts).iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Warm-up poll", "Role play", "Peer review"]);
    }

    #[test]
    fn ids_are_unique() {
        let a = Activity::new(FourCPhase::Concept, "Mini lecture", 15);
        let b = Activity::new(FourCPhase::Concept, "Mini lecture", 15);
        assert_ne!(a.id, b.id);
    }
}
