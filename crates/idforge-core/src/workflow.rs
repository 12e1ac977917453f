//! Navigation through the fixed, ordered list of session-building steps.
//!
//! Queries here are advisory and never fail. Ordering is enforced where
//! progress is written, see [`crate::session::Session::apply_update`].

use crate::error::{IdError, Result};
use crate::session::Session;
use crate::types::StepId;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Step catalog
// ---------------------------------------------------------------------------

/// A step and the predicate that tells whether the session data for it is
/// filled in.
pub struct Step {
    pub id: StepId,
    pub is_complete: fn(&Session) -> bool,
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step").field("id", &self.id).finish()
    }
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn persona_chosen(s: &Session) -> bool {
    filled(&s.persona_id)
}

fn topic_and_goals_set(s: &Session) -> bool {
    filled(&s.topic) && filled(&s.business_goals)
}

fn modality_chosen(s: &Session) -> bool {
    s.modality.is_some()
}

// Drafting and review steps only count once explicitly marked complete.
fn marked_only(_: &Session) -> bool {
    false
}

static STEPS: &[Step] = &[
    Step {
        id: StepId::Persona,
        is_complete: persona_chosen,
    },
    Step {
        id: StepId::Topic,
        is_complete: topic_and_goals_set,
    },
    Step {
        id: StepId::GenerateIbos,
        is_complete: marked_only,
    },
    Step {
        id: StepId::ChooseModality,
        is_complete: modality_chosen,
    },
    Step {
        id: StepId::Build4c,
        is_complete: marked_only,
    },
    Step {
        id: StepId::Review,
        is_complete: marked_only,
    },
];

pub fn steps() -> &'static [Step] {
    STEPS
}

pub fn step(id: StepId) -> &'static Step {
    &STEPS[id.index()]
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

pub fn current_step_index(session: &Session) -> usize {
    session.current_step.map_or(0, StepId::index)
}

pub fn current_step(session: &Session) -> StepId {
    session.current_step.unwrap_or_else(StepId::first)
}

/// Any earlier step is open; forward movement is limited to the next step.
pub fn can_advance_to(session: &Session, target: StepId) -> bool {
    target.index() <= current_step_index(session) + 1
}

pub fn is_step_complete(session: &Session, id: StepId) -> bool {
    (step(id).is_complete)(session)
}

pub fn is_step_done(session: &Session, id: StepId) -> bool {
    is_step_complete(session, id) || session.completed_steps.contains(&id)
}

pub fn reachable_steps(session: &Session) -> Vec<StepId> {
    StepId::all()
        .iter()
        .copied()
        .filter(|s| can_advance_to(session, *s))
        .collect()
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Move to the next step. Returns false when already on the last one.
pub fn advance(session: &mut Session) -> bool {
    match current_step(session).next() {
        Some(next) => {
            session.set_current_step(next);
            true
        }
        None => false,
    }
}

/// Move to the previous step. Returns false when already on the first one.
pub fn retreat(session: &mut Session) -> bool {
    match current_step(session).prev() {
        Some(prev) => {
            session.set_current_step(prev);
            true
        }
        None => false,
    }
}

pub fn go_to(session: &mut Session, target: StepId) -> Result<()> {
    if !can_advance_to(session, target) {
        return Err(IdError::InvalidTransition {
            from: current_step(session).to_string(),
            to: target.to_string(),
            reason: format!(
                "'{}' is not reachable yet; finish '{}' first",
                target,
                current_step(session)
            ),
        });
    }
    session.set_current_step(target);
    Ok(())
}

pub fn mark_complete(session: &mut Session, id: StepId) {
    if !session.completed_steps.contains(&id) {
        session.completed_steps.push(id);
    }
    session.set_current_step(id);
}

// ---------------------------------------------------------------------------
// Progress report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepStatus {
    pub step: StepId,
    pub title: &'static str,
    pub index: usize,
    pub current: bool,
    pub complete: bool,
    pub reachable: bool,
}

pub fn progress(session: &Session) -> Vec<StepStatus> {
    let current = current_step(session);
    STEPS
        .iter()
        .enumerate()
        .map(|(index, s)| StepStatus {
            step: s.id,
            title: s.id.title(),
            index,
            current: s.id == current,
            complete: is_step_done(session, s.id),
            reachable: can_advance_to(session, s.id),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Modality;

    fn at(step: Option<StepId>) -> Session {
        let mut s = Session::new("kickoff", "Kickoff");
        s.current_step = step;
        s
    }

    #[test]
    fn catalog_matches_step_order() {
        for (i, s) in steps().iter().enumerate() {
            assert_eq!(s.id.index(), i);
        }
        assert_eq!(steps().len(), StepId::all().len());
    }

    #[test]
    fn forward_bound_from_topic() {
        let s = at(Some(StepId::Topic));
        assert!(!can_advance_to(&s, StepId::ChooseModality));
        assert!(can_advance_to(&s, StepId::GenerateIbos));
        assert!(can_advance_to(&s, StepId::Persona));
    }

    #[test]
    fn unset_step_defaults_to_first() {
        let s = at(None);
        assert_eq!(current_step_index(&s), 0);
        assert_eq!(current_step(&s), StepId::Persona);
        assert!(can_advance_to(&s, StepId::Topic));
        assert!(!can_advance_to(&s, StepId::GenerateIbos));
    }

    #[test]
    fn backward_is_always_open() {
        for current in StepId::all() {
            let s = at(Some(*current));
            for target in StepId::all() {
                let expected = target.index() <= current.index() + 1;
                assert_eq!(can_advance_to(&s, *target), expected);
            }
        }
    }

    #[test]
    fn advance_and_retreat_stop_at_ends() {
        let mut s = at(Some(StepId::Review));
        assert!(!advance(&mut s));
        assert_eq!(s.current_step, Some(StepId::Review));

        let mut s = at(None);
        assert!(!retreat(&mut s));
        assert!(advance(&mut s));
        assert_eq!(s.current_step, Some(StepId::Topic));
        assert!(retreat(&mut s));
        assert_eq!(s.current_step, Some(StepId::Persona));
    }

    #[test]
    fn go_to_rejects_unreachable() {
        let mut s = at(Some(StepId::Topic));
        let err = go_to(&mut s, StepId::Build4c).unwrap_err();
        assert!(matches!(err, IdError::InvalidTransition { .. }));
        assert_eq!(s.current_step, Some(StepId::Topic));

        go_to(&mut s, StepId::Persona).unwrap();
        assert_eq!(s.current_step, Some(StepId::Persona));
    }

    #[test]
    fn completion_predicates() {
        let mut s = at(None);
        assert!(!is_step_complete(&s, StepId::Persona));
        s.set_persona("new-rep");
        assert!(is_step_complete(&s, StepId::Persona));

        s.set_topic("Objection handling");
        assert!(!is_step_complete(&s, StepId::Topic));
        s.set_business_goals("   ");
        assert!(!is_step_complete(&s, StepId::Topic));
        s.set_business_goals("Raise close rate");
        assert!(is_step_complete(&s, StepId::Topic));

        s.set_modality(Modality::Virtual);
        assert!(is_step_complete(&s, StepId::ChooseModality));

        s.set_ibo_content("# Business Objective: x");
        assert!(!is_step_complete(&s, StepId::GenerateIbos));
        assert!(!is_step_complete(&s, StepId::Review));
    }

    #[test]
    fn mark_complete_records_once_and_moves() {
        let mut s = at(Some(StepId::Topic));
        mark_complete(&mut s, StepId::GenerateIbos);
        mark_complete(&mut s, StepId::GenerateIbos);
        assert_eq!(s.completed_steps, vec![StepId::GenerateIbos]);
        assert_eq!(s.current_step, Some(StepId::GenerateIbos));
        assert!(is_step_done(&s, StepId::GenerateIbos));
    }

    #[test]
    fn progress_rows() {
        let mut s = at(Some(StepId::Topic));
        s.set_persona("new-rep");
        let rows = progress(&s);
        assert_eq!(rows.len(), 6);
        assert!(rows[0].complete && !rows[0].current);
        assert!(rows[1].current);
        assert!(rows[2].reachable);
        assert!(!rows[3].reachable);
        assert_eq!(reachable_steps(&s).len(), 3);
    }
}
