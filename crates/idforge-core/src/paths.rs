use crate::error::{IdError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const IDFORGE_DIR: &str = ".idforge";
pub const PERSONAS_DIR: &str = ".idforge/personas";
pub const SESSIONS_DIR: &str = ".idforge/sessions";

pub const CONFIG_FILE: &str = ".idforge/config.yaml";
pub const MANIFEST_FILE: &str = "manifest.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn idforge_dir(root: &Path) -> PathBuf {
    root.join(IDFORGE_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn persona_dir(root: &Path, slug: &str) -> PathBuf {
    root.join(PERSONAS_DIR).join(slug)
}

pub fn persona_manifest(root: &Path, slug: &str) -> PathBuf {
    persona_dir(root, slug).join(MANIFEST_FILE)
}

pub fn session_dir(root: &Path, slug: &str) -> PathBuf {
    root.join(SESSIONS_DIR).join(slug)
}

pub fn session_manifest(root: &Path, slug: &str) -> PathBuf {
    session_dir(root, slug).join(MANIFEST_FILE)
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(IdError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slugs() {
        for slug in ["sales-onboarding", "a", "q3-kickoff-2024", "x1"] {
            validate_slug(slug).unwrap_or_else(|_| panic!("expected valid: {slug}"));
        }
    }

    #[test]
    fn invalid_slugs() {
        for slug in ["", "-leading", "trailing-", "has spaces", "Mixed", "snake_case"] {
            assert!(validate_slug(slug).is_err(), "expected invalid: {slug}");
        }
    }

    #[test]
    fn manifest_paths() {
        let root = Path::new("/tmp/course");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/course/.idforge/config.yaml")
        );
        assert_eq!(
            session_manifest(root, "kickoff"),
            PathBuf::from("/tmp/course/.idforge/sessions/kickoff/manifest.yaml")
        );
        assert_eq!(
            persona_manifest(root, "new-rep"),
            PathBuf::from("/tmp/course/.idforge/personas/new-rep/manifest.yaml")
        );
    }
}
