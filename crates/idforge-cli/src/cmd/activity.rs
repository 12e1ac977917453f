use crate::cmd::ibo::draft_request;
use crate::output::{print_banner, print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use idforge_core::{
    activity::{self, Activity},
    config::Config,
    draft::{AnthropicDrafter, Drafter},
    session::Session,
    types::FourCPhase,
};
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum ActivitySubcommand {
    /// Add an activity to a session
    Add {
        session: String,
        /// connection, concept, concrete-practice, or conclusion
        #[arg(long)]
        phase: String,
        #[arg(long)]
        title: String,
        /// Duration in minutes
        #[arg(long)]
        minutes: u32,
        #[arg(long)]
        description: Option<String>,
    },
    /// List a session's activities in 4C order
    List { session: String },
    /// Remove an activity by id
    Remove { session: String, id: String },
    /// Draft a 4C plan for a session with the AI client
    Draft { session: String },
}

pub fn run(root: &Path, subcmd: ActivitySubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ActivitySubcommand::Add {
            session,
            phase,
            title,
            minutes,
            description,
        } => add(root, &session, &phase, title, minutes, description, json),
        ActivitySubcommand::List { session } => list(root, &session, json),
        ActivitySubcommand::Remove { session, id } => remove(root, &session, &id, json),
        ActivitySubcommand::Draft { session } => draft(root, &session, json),
    }
}

fn add(
    root: &Path,
    slug: &str,
    phase: &str,
    title: String,
    minutes: u32,
    description: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let phase = FourCPhase::from_str(phase)?;
    let mut session =
        Session::load(root, slug).with_context(|| format!("failed to load session '{slug}'"))?;

    let mut act = Activity::new(phase, title, minutes);
    if let Some(d) = description {
        act = act.with_description(d);
    }
    session.add_activity(act.clone());
    session.save(root).context("failed to save session")?;

    if json {
        print_json(&act)?;
    } else {
        println!(
            "Added {} activity '{}' ({} min) [{}]",
            act.phase, act.title, act.duration_minutes, act.id
        );
    }
    Ok(())
}

fn list(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let session =
        Session::load(root, slug).with_context(|| format!("failed to load session '{slug}'"))?;
    let ordered = activity::in_sequence(&session.activities);
    let missing = activity::missing_phases(&session.activities);
    let total = activity::total_minutes(&session.activities);

    if json {
        return print_json(&serde_json::json!({
            "activities": ordered,
            "total_minutes": total,
            "missing_phases": missing,
        }));
    }

    if ordered.is_empty() {
        println!("No activities yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = ordered
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.phase.to_string(),
                a.duration_minutes.to_string(),
                a.title.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "PHASE", "MIN", "TITLE"], rows);
    println!("\nTotal: {total} min");
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|p| p.as_str()).collect();
        println!("Missing phases: {}", names.join(", "));
    }
    Ok(())
}

fn remove(root: &Path, slug: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let mut session =
        Session::load(root, slug).with_context(|| format!("failed to load session '{slug}'"))?;
    let removed = session.remove_activity(id)?;
    session.save(root).context("failed to save session")?;

    if json {
        print_json(&removed)?;
    } else {
        println!("Removed activity '{}'", removed.title);
    }
    Ok(())
}

fn draft(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let mut session =
        Session::load(root, slug).with_context(|| format!("failed to load session '{slug}'"))?;
    let ibos = session.ibo_content.clone().with_context(|| {
        format!("session '{slug}' has no IBO text; run 'idforge ibo generate {slug}' first")
    })?;
    let request = draft_request(root, &session)?;

    let drafter = AnthropicDrafter::from_env(config.ai).context("failed to set up AI client")?;
    let text = drafter
        .draft_four_c(&request, &ibos)
        .with_context(|| format!("failed to draft 4C plan for '{slug}'"))?;

    session.set_four_c_content(text.trim_end());
    session.save(root).context("failed to save session")?;

    if json {
        return print_json(&serde_json::json!({ "slug": slug, "four_c_content": text }));
    }
    print_banner(&format!("4C plan for {slug}"));
    println!("{}", text.trim_end());
    Ok(())
}
