use crate::output::print_json;
use anyhow::Context;
use idforge_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path, name: Option<&str>, json: bool) -> anyhow::Result<()> {
    let project_name = name.map(str::to_string).unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    });

    for dir in [paths::IDFORGE_DIR, paths::PERSONAS_DIR, paths::SESSIONS_DIR] {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    let created = !paths::config_path(root).exists();
    if created {
        Config::new(&project_name)
            .save(root)
            .context("failed to write config.yaml")?;
    }
    tracing::debug!(root = %root.display(), created, "initialized");

    if json {
        return print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "config_created": created,
        }));
    }

    println!("Initializing idforge in: {}", root.display());
    if created {
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }
    println!("\nNext: idforge persona create <slug> --name <name>");
    Ok(())
}
