use crate::error::{IdError, Result};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Persona
// ---------------------------------------------------------------------------

/// The learner a session is designed for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pain_points: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Persona {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            name: name.into(),
            role: None,
            description: None,
            goals: Vec::new(),
            pain_points: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Plain-text summary handed to the drafting model.
    pub fn context(&self) -> String {
        let mut out = format!("Persona: {}", self.name);
        if let Some(ref role) = self.role {
            out.push_str(&format!("\nRole: {role}"));
        }
        if let Some(ref desc) = self.description {
            out.push_str(&format!("\nDescription: {desc}"));
        }
        if !self.goals.is_empty() {
            out.push_str(&format!("\nGoals: {}", self.goals.join("; ")));
        }
        if !self.pain_points.is_empty() {
            out.push_str(&format!("\nPain points: {}", self.pain_points.join("; ")));
        }
        out
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, persona: Persona) -> Result<Self> {
        paths::validate_slug(&persona.slug)?;
        if paths::persona_dir(root, &persona.slug).exists() {
            return Err(IdError::PersonaExists(persona.slug));
        }
        persona.save(root)?;
        Ok(persona)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let manifest = paths::persona_manifest(root, slug);
        if !manifest.exists() {
            return Err(IdError::PersonaNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&manifest)?;
        let persona: Persona = serde_yaml::from_str(&data)?;
        Ok(persona)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let manifest = paths::persona_manifest(root, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = root.join(paths::PERSONAS_DIR);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut personas = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, &slug) {
                    Ok(p) => personas.push(p),
                    Err(IdError::PersonaNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        personas.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(personas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rep() -> Persona {
        let mut p = Persona::new("new-rep", "New Sales Rep");
        p.role = Some("Account executive".to_string());
        p.goals = vec!["Hit quota".to_string(), "Learn the product".to_string()];
        p
    }

    #[test]
    fn create_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        Persona::create(dir.path(), rep()).unwrap();
        let loaded = Persona::load(dir.path(), "new-rep").unwrap();
        assert_eq!(loaded.name, "New Sales Rep");
        assert_eq!(loaded.goals.len(), 2);
    }

    #[test]
    fn duplicate_create_fails() {
        let dir = TempDir::new().unwrap();
        Persona::create(dir.path(), rep()).unwrap();
        assert!(matches!(
            Persona::create(dir.path(), rep()),
            Err(IdError::PersonaExists(_))
        ));
    }

    #[test]
    fn invalid_slug_rejected() {
        let dir = TempDir::new().unwrap();
        let p = Persona::new("Bad Slug", "x");
        assert!(matches!(
            Persona::create(dir.path(), p),
            Err(IdError::InvalidSlug(_))
        ));
    }

    #[test]
    fn missing_persona_is_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Persona::load(dir.path(), "ghost"),
            Err(IdError::PersonaNotFound(_))
        ));
    }

    #[test]
    fn list_empty_without_dir() {
        let dir = TempDir::new().unwrap();
        assert!(Persona::list(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn context_mentions_role_and_goals() {
        let ctx = rep().context();
        assert!(ctx.contains("Persona: New Sales Rep"));
        assert!(ctx.contains("Role: Account executive"));
        assert!(ctx.contains("Goals: Hit quota; Learn the product"));
        assert!(!ctx.contains("Pain points"));
    }
}
