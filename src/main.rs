//! PV designer entry point: load a project, size it, report, and export.

mod cli;

use anyhow::{Context, Result, bail};
use log::info;

use pv_designer::config::DesignerConfig;
use pv_designer::io::export::{export_monthly_csv, read_snapshot_json, write_snapshot_json};
use pv_designer::presets::preset;
use pv_designer::session::{JsonDirRepository, ProjectSession, StaticAuth, User};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            std::process::exit(2);
        }
    };

    let config = match &opts.config {
        Some(path) => DesignerConfig::from_toml_file(path)?,
        None => DesignerConfig::default(),
    };
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("invalid configuration ({} errors)", errors.len());
    }

    let snapshot = match (&opts.project, &opts.preset) {
        (Some(path), _) => read_snapshot_json(path)
            .with_context(|| format!("cannot read project \"{}\"", path.display()))?,
        (None, Some(name)) => preset(name)?,
        (None, None) => preset("residential")?,
    };

    let mut session = ProjectSession::new(&config);
    session.load_project(&snapshot)?;

    println!("Project: {}", session.name());
    if !session.description().is_empty() {
        println!("{}", session.description());
    }
    println!(
        "{} components, {} wires\n",
        session.graph().object_count(),
        session.graph().wires().len()
    );
    println!("{}", session.calculations());

    if let Some(path) = &opts.csv_out {
        export_monthly_csv(session.calculations(), path)
            .with_context(|| format!("failed to write CSV \"{}\"", path.display()))?;
        eprintln!("Monthly production written to {}", path.display());
    }

    if let Some(path) = &opts.export_out {
        let exported = session.export_scene()?;
        write_snapshot_json(&exported, path)
            .with_context(|| format!("failed to write snapshot \"{}\"", path.display()))?;
        eprintln!("Project snapshot written to {}", path.display());
    }

    if let Some(dir) = &opts.store {
        let mut repo = JsonDirRepository::open(dir)
            .with_context(|| format!("cannot open project store \"{}\"", dir.display()))?;
        let auth = match &opts.user {
            Some(name) => StaticAuth::signed_in(User::new(name.clone(), name.clone())),
            None => StaticAuth::default(),
        };
        let id = session.save(&mut repo, &auth)?;
        info!("project stored as {id}");
        eprintln!("Project saved to {}", dir.join(format!("{id}.json")).display());
    }

    Ok(())
}
