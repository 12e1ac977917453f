use crate::output::{print_banner, print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use idforge_core::{
    classifier::{significant_lines, Classifier},
    config::Config,
    draft::{AnthropicDrafter, DraftRequest, Drafter},
    format::{format_with, render_outline, FormattedIbos},
    io,
    persona::Persona,
    session::Session,
    IdError,
};
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum IboSubcommand {
    /// Classify IBO text and print it as a numbered outline
    Format {
        /// Input file (stdin when omitted or '-')
        file: Option<PathBuf>,
        /// Format the IBO text stored on a session instead
        #[arg(long, conflicts_with = "file")]
        session: Option<String>,
    },
    /// Show which rule matched each line
    Explain {
        /// Input file (stdin when omitted or '-')
        file: Option<PathBuf>,
    },
    /// Store hand-written IBO text on a session
    Import {
        session: String,
        /// Input file (stdin when omitted or '-')
        file: Option<PathBuf>,
    },
    /// Draft IBOs for a session with the AI client
    Generate { session: String },
}

pub fn run(root: &Path, subcmd: IboSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        IboSubcommand::Format { file, session } => format(root, file, session, json),
        IboSubcommand::Explain { file } => explain(file, json),
        IboSubcommand::Import { session, file } => import(root, &session, file, json),
        IboSubcommand::Generate { session } => generate(root, &session, json),
    }
}

fn format(
    root: &Path,
    file: Option<PathBuf>,
    session: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let text = match session {
        Some(slug) => Session::load(root, &slug)
            .with_context(|| format!("failed to load session '{slug}'"))?
            .ibo_content
            .with_context(|| format!("session '{slug}' has no IBO text yet"))?,
        None => io::read_input(file.as_deref()).context("failed to read IBO text")?,
    };
    print_formatted(&format_with(&Classifier::default(), &text), json)
}

pub(crate) fn print_formatted(formatted: &FormattedIbos, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(formatted);
    }
    match formatted {
        FormattedIbos::Structured { items } => print!("{}", render_outline(items)),
        FormattedIbos::Raw { text } => {
            print_banner("WARNING: no IBO structure detected; showing raw text");
            println!("{}", text.trim_end());
        }
    }
    Ok(())
}

fn explain(file: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let text = io::read_input(file.as_deref()).context("failed to read IBO text")?;
    let classifier = Classifier::default();

    let rows: Vec<(String, Option<&'static str>, Option<String>)> = significant_lines(&text)
        .map(|line| {
            let rule = classifier.matching_rule(line);
            (
                line.to_string(),
                rule.map(|r| r.id),
                rule.map(|r| r.kind.to_string()),
            )
        })
        .collect();

    if json {
        let value: Vec<_> = rows
            .iter()
            .map(|(line, rule, kind)| {
                serde_json::json!({ "line": line, "rule": rule, "kind": kind })
            })
            .collect();
        return print_json(&value);
    }

    let table = rows
        .into_iter()
        .map(|(line, rule, kind)| {
            vec![
                rule.unwrap_or("-").to_string(),
                kind.unwrap_or_else(|| "-".to_string()),
                line,
            ]
        })
        .collect();
    print_table(&["RULE", "KIND", "LINE"], table);
    Ok(())
}

fn import(root: &Path, slug: &str, file: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let text = io::read_input(file.as_deref()).context("failed to read IBO text")?;
    let mut session =
        Session::load(root, slug).with_context(|| format!("failed to load session '{slug}'"))?;
    session.set_ibo_content(text.trim_end());
    session.save(root).context("failed to save session")?;

    let formatted = format_with(&Classifier::default(), text.trim_end());
    if !json {
        println!("Stored IBO text on session '{slug}'.\n");
    }
    print_formatted(&formatted, json)
}

fn generate(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let mut session =
        Session::load(root, slug).with_context(|| format!("failed to load session '{slug}'"))?;
    let request = draft_request(root, &session)?;

    let drafter = AnthropicDrafter::from_env(config.ai).context("failed to set up AI client")?;
    let text = drafter
        .draft_ibos(&request)
        .with_context(|| format!("failed to draft IBOs for '{slug}'"))?;

    session.set_ibo_content(text.trim_end());
    session.save(root).context("failed to save session")?;

    print_formatted(&format_with(&Classifier::default(), &text), json)
}

/// Gather persona and topic context for a drafting call.
pub(crate) fn draft_request(root: &Path, session: &Session) -> anyhow::Result<DraftRequest> {
    let persona_id = session.persona_id.as_deref().ok_or(IdError::MissingField {
        field: "persona".to_string(),
        action: "draft".to_string(),
    })?;
    let persona = Persona::load(root, persona_id)
        .with_context(|| format!("failed to load persona '{persona_id}'"))?;
    Ok(DraftRequest::from_session(session, &persona)?)
}
