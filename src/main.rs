use agent_history::config::Config;
use agent_history::constant::{CHANGELOG_FILENAME, PATCH_FILENAME};
use agent_history::form::{read_form_file, read_import_file};
use agent_history::history::DiffOptions;
use agent_history::session::history_export_filename;
use agent_history::template::AgentTemplate;
use agent_history::{
    AgentFileGenerator, CompareSession, FileStore, FormData, SnapshotStore, StaticForm, logging,
};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

type Session = CompareSession<FileStore, AgentFileGenerator, StaticForm>;

/// Snapshot, diff and merge generated agent profiles.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Save a form file as a new version
    Save {
        /// JSON form data (bare, `formData` or `wizardState.formData`)
        form: PathBuf,
        /// Version name, defaults to v<n>
        #[arg(long)]
        name: Option<String>,
    },
    /// List saved versions, newest first
    List,
    /// Show the diff and changelog between two references
    Compare(CompareArgs),
    /// Print or write a patch between two references
    Patch {
        #[command(flatten)]
        compare: CompareArgs,
        /// Write to this directory instead of stdout
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Print or write the version history as JSON
    Export {
        /// Write to this directory instead of stdout
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Left side: __current, __template, __imported or a version id
    left: String,
    /// Right side, same forms as left
    right: String,
    /// Live form data backing __current
    #[arg(long)]
    form: Option<PathBuf>,
    /// JSON array of templates backing __template
    #[arg(long)]
    template_file: Option<PathBuf>,
    /// Imported configuration backing __imported
    #[arg(long)]
    import: Option<PathBuf>,
    #[arg(long)]
    ignore_whitespace: bool,
    #[arg(long)]
    only_changed: bool,
    /// Write the changelog to this directory as well
    #[arg(long)]
    changelog_dir: Option<PathBuf>,
}

fn open_session(config: &Config, live: FormData) -> Result<Session, Box<dyn Error>> {
    let store = SnapshotStore::with_settings(
        FileStore::new(config)?,
        AgentFileGenerator,
        &config.settings,
    );
    Ok(CompareSession::new(store, StaticForm(live)).with_options(config.settings.diff_options()))
}

fn prepare_compare(config: &Config, args: &CompareArgs) -> Result<Session, Box<dyn Error>> {
    let live = match &args.form {
        Some(path) => read_form_file(path)?,
        None => FormData::new(),
    };
    let mut session = open_session(config, live)?;

    if let Some(path) = &args.template_file {
        let templates: Vec<AgentTemplate> = serde_json::from_str(&fs::read_to_string(path)?)?;
        session.set_templates(templates);
    }
    if let Some(path) = &args.import {
        session.set_imported_baseline(&read_import_file(path)?);
    }

    let defaults = session.options();
    session.select(args.left.parse()?, args.right.parse()?);
    session.set_options(DiffOptions {
        ignore_whitespace: args.ignore_whitespace || defaults.ignore_whitespace,
        only_changed: args.only_changed || defaults.only_changed,
    });

    if session.last_diff().is_none() {
        return Err(format!("cannot resolve {} and {}", args.left, args.right).into());
    }
    Ok(session)
}

fn write_or_print(out_dir: Option<&Path>, filename: &str, content: &str) -> Result<(), Box<dyn Error>> {
    match out_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(filename);
            fs::write(&path, content)?;
            info!("Wrote {:?}", path);
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    logging::setup_logger();
    let cli = Cli::parse();
    let config = Config::default();

    match cli.cmd {
        Cmd::Save { form, name } => {
            let mut session = open_session(&config, read_form_file(&form)?)?;
            let snapshot = session.save_version(name.as_deref());
            println!("{}\t{}", snapshot.id(), snapshot.name());
        }
        Cmd::List => {
            let session = open_session(&config, FormData::new())?;
            for snapshot in session.history() {
                println!(
                    "{}\t{}\t{}",
                    snapshot.id(),
                    snapshot.source(),
                    snapshot.label()
                );
            }
        }
        Cmd::Compare(args) => {
            let session = prepare_compare(&config, &args)?;
            if let Some(view) = session.render() {
                println!("{}\n", view);
            }
            if let Some(changelog) = session.changelog() {
                write_or_print(args.changelog_dir.as_deref(), CHANGELOG_FILENAME, changelog)?;
            }
        }
        Cmd::Patch { compare, out_dir } => {
            let session = prepare_compare(&config, &compare)?;
            if let Some(patch) = session.generate_patch() {
                write_or_print(out_dir.as_deref(), PATCH_FILENAME, &patch)?;
            }
        }
        Cmd::Export { out_dir } => {
            let session = open_session(&config, FormData::new())?;
            let filename = history_export_filename(Local::now().date_naive());
            write_or_print(out_dir.as_deref(), &filename, &session.export_history_json()?)?;
        }
    }

    Ok(())
}
