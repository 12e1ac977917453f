use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use idforge_core::{config::Config, persona::Persona};
use std::path::Path;

#[derive(Subcommand)]
pub enum PersonaSubcommand {
    /// Create a new persona
    Create {
        slug: String,
        /// Display name
        #[arg(long)]
        name: String,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// A goal the learner has (repeatable)
        #[arg(long = "goal")]
        goals: Vec<String>,
        /// A pain point the learner has (repeatable)
        #[arg(long = "pain-point")]
        pain_points: Vec<String>,
    },
    /// List all personas
    List,
    /// Show persona details
    Show { slug: String },
}

pub fn run(root: &Path, subcmd: PersonaSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        PersonaSubcommand::Create {
            slug,
            name,
            role,
            description,
            goals,
            pain_points,
        } => {
            let mut persona = Persona::new(slug, name);
            persona.role = role;
            persona.description = description;
            persona.goals = goals;
            persona.pain_points = pain_points;
            create(root, persona, json)
        }
        PersonaSubcommand::List => list(root, json),
        PersonaSubcommand::Show { slug } => show(root, &slug, json),
    }
}

fn create(root: &Path, persona: Persona, json: bool) -> anyhow::Result<()> {
    Config::load(root).context("failed to load config")?;
    let slug = persona.slug.clone();
    let persona = Persona::create(root, persona)
        .with_context(|| format!("failed to create persona '{slug}'"))?;

    if json {
        print_json(&persona)?;
    } else {
        println!("Created persona: {} ({})", persona.slug, persona.name);
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let personas = Persona::list(root).context("failed to list personas")?;

    if json {
        print_json(&personas)?;
        return Ok(());
    }

    if personas.is_empty() {
        println!("No personas yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = personas
        .iter()
        .map(|p| {
            vec![
                p.slug.clone(),
                p.name.clone(),
                p.role.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["SLUG", "NAME", "ROLE"], rows);
    Ok(())
}

fn show(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let persona =
        Persona::load(root, slug).with_context(|| format!("failed to load persona '{slug}'"))?;

    if json {
        print_json(&persona)?;
        return Ok(());
    }

    println!("Persona: {} ({})", persona.slug, persona.name);
    if let Some(ref role) = persona.role {
        println!("Role:    {role}");
    }
    if let Some(ref desc) = persona.description {
        println!("Desc:    {desc}");
    }
    println!("Created: {}", persona.created_at.format("%Y-%m-%d %H:%M"));

    if !persona.goals.is_empty() {
        println!("\nGoals:");
        for goal in &persona.goals {
            println!("  - {goal}");
        }
    }
    if !persona.pain_points.is_empty() {
        println!("\nPain points:");
        for pain in &persona.pain_points {
            println!("  - {pain}");
        }
    }
    Ok(())
}
