use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use idforge_core::{
    activity,
    config::Config,
    persona::Persona,
    session::Session,
    types::{Modality, StepId},
    workflow,
};
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum SessionSubcommand {
    /// Create a new session
    Create {
        slug: String,
        #[arg(long)]
        title: Option<String>,
        /// Persona slug the session is designed for
        #[arg(long)]
        persona: Option<String>,
    },
    /// List all sessions
    List,
    /// Show session details
    Show { slug: String },
    /// Update session fields
    Set {
        slug: String,
        #[arg(long)]
        persona: Option<String>,
        #[arg(long)]
        topic: Option<String>,
        /// Business goals the session should serve
        #[arg(long)]
        goals: Option<String>,
        /// onsite, virtual, or hybrid
        #[arg(long)]
        modality: Option<String>,
    },
    /// Show per-step workflow progress
    Progress { slug: String },
    /// Move to the next step
    Advance { slug: String },
    /// Move back one step
    Retreat { slug: String },
    /// Jump to a reachable step
    Goto { slug: String, step: String },
    /// Mark a step complete and make it current
    Complete { slug: String, step: String },
}

pub fn run(root: &Path, subcmd: SessionSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        SessionSubcommand::Create {
            slug,
            title,
            persona,
        } => create(root, &slug, title, persona, json),
        SessionSubcommand::List => list(root, json),
        SessionSubcommand::Show { slug } => show(root, &slug, json),
        SessionSubcommand::Set {
            slug,
            persona,
            topic,
            goals,
            modality,
        } => set(root, &slug, persona, topic, goals, modality, json),
        SessionSubcommand::Progress { slug } => progress(root, &slug, json),
        SessionSubcommand::Advance { slug } => navigate(root, &slug, Move::Advance, json),
        SessionSubcommand::Retreat { slug } => navigate(root, &slug, Move::Retreat, json),
        SessionSubcommand::Goto { slug, step } => {
            let step = StepId::from_str(&step)?;
            navigate(root, &slug, Move::GoTo(step), json)
        }
        SessionSubcommand::Complete { slug, step } => {
            let step = StepId::from_str(&step)?;
            navigate(root, &slug, Move::Complete(step), json)
        }
    }
}

fn create(
    root: &Path,
    slug: &str,
    title: Option<String>,
    persona: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    Config::load(root).context("failed to load config")?;
    if let Some(ref p) = persona {
        Persona::load(root, p).with_context(|| format!("failed to load persona '{p}'"))?;
    }

    let title = title.unwrap_or_else(|| slug.replace('-', " "));
    let mut session = Session::create(root, slug, &title)
        .with_context(|| format!("failed to create session '{slug}'"))?;
    if let Some(p) = persona {
        session.set_persona(p);
        session.save(root).context("failed to save session")?;
    }

    if json {
        print_json(&session)?;
    } else {
        println!("Created session: {slug} ({title})");
        println!("Step: {}", workflow::current_step(&session).title());
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let sessions = Session::list(root).context("failed to list sessions")?;

    if json {
        let summaries: Vec<_> = sessions
            .iter()
            .map(|s| {
                serde_json::json!({
                    "slug": s.slug,
                    "title": s.title,
                    "persona_id": s.persona_id,
                    "current_step": workflow::current_step(s),
                    "completed_steps": s.completed_steps,
                })
            })
            .collect();
        print_json(&summaries)?;
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = sessions
        .iter()
        .map(|s| {
            vec![
                s.slug.clone(),
                workflow::current_step(s).to_string(),
                s.persona_id.clone().unwrap_or_default(),
                s.title.clone(),
            ]
        })
        .collect();
    print_table(&["SLUG", "STEP", "PERSONA", "TITLE"], rows);
    Ok(())
}

fn show(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let session =
        Session::load(root, slug).with_context(|| format!("failed to load session '{slug}'"))?;

    if json {
        print_json(&session)?;
        return Ok(());
    }

    println!("Session:  {} ({})", session.slug, session.title);
    println!("Step:     {}", workflow::current_step(&session));
    if let Some(ref p) = session.persona_id {
        println!("Persona:  {p}");
    }
    if let Some(ref topic) = session.topic {
        println!("Topic:    {topic}");
    }
    if let Some(ref goals) = session.business_goals {
        println!("Goals:    {goals}");
    }
    if let Some(m) = session.modality {
        println!("Modality: {m}");
    }
    println!("Created:  {}", session.created_at.format("%Y-%m-%d %H:%M"));

    if session.ibo_content.is_some() {
        println!("\nIBOs drafted. See: idforge ibo format --session {slug}");
    }
    if !session.activities.is_empty() {
        println!(
            "\nActivities ({}, {} min):",
            session.activities.len(),
            activity::total_minutes(&session.activities)
        );
        for a in activity::in_sequence(&session.activities) {
            println!("  [{}] {} ({} min)", a.phase, a.title, a.duration_minutes);
        }
    }
    Ok(())
}

fn set(
    root: &Path,
    slug: &str,
    persona: Option<String>,
    topic: Option<String>,
    goals: Option<String>,
    modality: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let mut session =
        Session::load(root, slug).with_context(|| format!("failed to load session '{slug}'"))?;

    if let Some(p) = persona {
        Persona::load(root, &p).with_context(|| format!("failed to load persona '{p}'"))?;
        session.set_persona(p);
    }
    if let Some(t) = topic {
        session.set_topic(t);
    }
    if let Some(g) = goals {
        session.set_business_goals(g);
    }
    if let Some(m) = modality {
        session.set_modality(Modality::from_str(&m)?);
    }
    session.save(root).context("failed to save session")?;

    if json {
        print_json(&session)?;
    } else {
        println!("Updated session: {slug}");
    }
    Ok(())
}

fn progress(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let session =
        Session::load(root, slug).with_context(|| format!("failed to load session '{slug}'"))?;
    let rows = workflow::progress(&session);

    if json {
        print_json(&rows)?;
        return Ok(());
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            let marker = if r.current { ">" } else { "" };
            let status = if r.complete {
                "done"
            } else if r.reachable {
                "open"
            } else {
                "locked"
            };
            vec![
                marker.to_string(),
                (r.index + 1).to_string(),
                r.step.to_string(),
                status.to_string(),
                r.title.to_string(),
            ]
        })
        .collect();
    print_table(&["", "#", "STEP", "STATUS", "TITLE"], table);
    Ok(())
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

enum Move {
    Advance,
    Retreat,
    GoTo(StepId),
    Complete(StepId),
}

fn navigate(root: &Path, slug: &str, mv: Move, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let mut draft =
        Session::load(root, slug).with_context(|| format!("failed to load session '{slug}'"))?;

    let moved = match mv {
        Move::Advance => workflow::advance(&mut draft),
        Move::Retreat => workflow::retreat(&mut draft),
        Move::GoTo(step) => {
            workflow::go_to(&mut draft, step)?;
            true
        }
        Move::Complete(step) => {
            workflow::mark_complete(&mut draft, step);
            true
        }
    };

    let session = Session::commit_progress(
        root,
        slug,
        &draft.progress_update(),
        config.workflow.enforce_step_order,
    )
    .with_context(|| format!("failed to update progress for '{slug}'"))?;

    if json {
        return print_json(&serde_json::json!({
            "slug": session.slug,
            "moved": moved,
            "current_step": workflow::current_step(&session),
            "completed_steps": session.completed_steps,
        }));
    }

    let current = workflow::current_step(&session);
    if moved {
        println!("{slug}: now at '{current}' ({})", current.title());
    } else {
        println!("{slug}: already at '{current}'");
    }
    Ok(())
}
