use crate::activity::Activity;
use crate::error::{IdError, Result};
use crate::paths;
use crate::types::{Modality, StepId};
use crate::workflow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub persona_id: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub business_goals: Option<String>,
    #[serde(default)]
    pub modality: Option<Modality>,
    #[serde(default, with = "lenient_step")]
    pub current_step: Option<StepId>,
    #[serde(default, with = "step_list")]
    pub completed_steps: Vec<StepId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ibo_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub four_c_content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<Activity>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            title: title.into(),
            persona_id: None,
            topic: None,
            business_goals: None,
            modality: None,
            current_step: Some(StepId::first()),
            completed_steps: Vec::new(),
            ibo_content: None,
            four_c_content: None,
            activities: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, slug: impl Into<String>, title: impl Into<String>) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;
        if paths::session_dir(root, &slug).exists() {
            return Err(IdError::SessionExists(slug));
        }
        let session = Self::new(slug, title);
        session.save(root)?;
        Ok(session)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let manifest = paths::session_manifest(root, slug);
        if !manifest.exists() {
            return Err(IdError::SessionNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&manifest)?;
        let session: Session = serde_yaml::from_str(&data)?;
        Ok(session)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let manifest = paths::session_manifest(root, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = root.join(paths::SESSIONS_DIR);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut sessions = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, &slug) {
                    Ok(s) => sessions.push(s),
                    Err(IdError::SessionNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        sessions.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(sessions)
    }

    /// Write a progress update against the stored record. With `enforce`
    /// set, a `current_step` more than one past the stored step is rejected.
    pub fn commit_progress(
        root: &Path,
        slug: &str,
        update: &SessionUpdate,
        enforce: bool,
    ) -> Result<Self> {
        let mut stored = Self::load(root, slug)?;
        stored.apply_update(update, enforce)?;
        stored.save(root)?;
        Ok(stored)
    }

    // ---------------------------------------------------------------------------
    // Progress
    // ---------------------------------------------------------------------------

    pub fn progress_update(&self) -> SessionUpdate {
        SessionUpdate {
            current_step: workflow::current_step(self),
            completed_steps: self.completed_steps.clone(),
        }
    }

    pub fn apply_update(&mut self, update: &SessionUpdate, enforce: bool) -> Result<()> {
        if enforce && !workflow::can_advance_to(self, update.current_step) {
            return Err(IdError::InvalidTransition {
                from: workflow::current_step(self).to_string(),
                to: update.current_step.to_string(),
                reason: "steps can only be entered one at a time".to_string(),
            });
        }
        self.current_step = Some(update.current_step);
        self.completed_steps = dedup_steps(update.completed_steps.iter().copied());
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_current_step(&mut self, step: StepId) {
        self.current_step = Some(step);
        self.updated_at = Utc::now();
    }

    // ---------------------------------------------------------------------------
    // Field mutations
    // ---------------------------------------------------------------------------

    pub fn set_persona(&mut self, persona_id: impl Into<String>) {
        self.persona_id = Some(persona_id.into());
        self.updated_at = Utc::now();
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = Some(topic.into());
        self.updated_at = Utc::now();
    }

    pub fn set_business_goals(&mut self, goals: impl Into<String>) {
        self.business_goals = Some(goals.into());
        self.updated_at = Utc::now();
    }

    pub fn set_modality(&mut self, modality: Modality) {
        self.modality = Some(modality);
        self.updated_at = Utc::now();
    }

    pub fn set_ibo_content(&mut self, content: impl Into<String>) {
        self.ibo_content = Some(content.into());
        self.updated_at = Utc::now();
    }

    pub fn set_four_c_content(&mut self, content: impl Into<String>) {
        self.four_c_content = Some(content.into());
        self.updated_at = Utc::now();
    }

    pub fn add_activity(&mut self, activity: Activity) {
        self.activities.push(activity);
        self.updated_at = Utc::now();
    }

    pub fn remove_activity(&mut self, id: &str) -> Result<Activity> {
        let pos = self
            .activities
            .iter()
            .position(|a| a.id.to_string() == id)
            .ok_or_else(|| IdError::ActivityNotFound(id.to_string()))?;
        self.updated_at = Utc::now();
        Ok(self.activities.remove(pos))
    }
}

// ---------------------------------------------------------------------------
// SessionUpdate
// ---------------------------------------------------------------------------

/// Partial write carrying only the workflow position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUpdate {
    pub current_step: StepId,
    #[serde(default, with = "step_list")]
    pub completed_steps: Vec<StepId>,
}

fn dedup_steps(steps: impl IntoIterator<Item = StepId>) -> Vec<StepId> {
    let mut out = Vec::new();
    for step in steps {
        if !out.contains(&step) {
            out.push(step);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// current_step: blank or unrecognised ids read as unset
// ---------------------------------------------------------------------------

mod lenient_step {
    use crate::types::StepId;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        step: &Option<StepId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        step.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<StepId>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(id) => match id.parse::<StepId>() {
                Ok(step) => Some(step),
                Err(_) => {
                    tracing::warn!(step = %id, "unknown current step; treating as unset");
                    None
                }
            },
        })
    }
}

// ---------------------------------------------------------------------------
// step_list: completed steps are a JSON-encoded string at rest
// ---------------------------------------------------------------------------

mod step_list {
    use super::dedup_steps;
    use crate::types::StepId;
    use serde::{de, ser, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Encoded {
        Json(String),
        List(Vec<String>),
    }

    pub fn serialize<S: Serializer>(steps: &[StepId], serializer: S) -> Result<S::Ok, S::Error> {
        let ids: Vec<&str> = steps.iter().map(|s| s.as_str()).collect();
        let json = serde_json::to_string(&ids).map_err(ser::Error::custom)?;
        serializer.serialize_str(&json)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<StepId>, D::Error> {
        let raw = match Option::<Encoded>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(Encoded::List(ids)) => ids,
            Some(Encoded::Json(s)) if s.trim().is_empty() => Vec::new(),
            Some(Encoded::Json(s)) => {
                serde_json::from_str::<Vec<String>>(&s).map_err(de::Error::custom)?
            }
        };
        Ok(dedup_steps(raw.iter().filter_map(|id| match id.parse::<StepId>() {
            Ok(step) => Some(step),
            Err(_) => {
                tracing::warn!(step = %id, "dropping unknown completed step");
                None
            }
        })))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
