//! `pagekit` command-line host.
//!
//! Wires the editor settings, the file store and the page shell together.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_settings()            -- settings.toml or defaults
//!  └─ FileStore::new(dir)        -- one JSON file per key
//!  └─ ConfigStore::load_default  -- stored document or defaults
//!  └─ command
//!       ├─ show / paths / get    -- read the document
//!       ├─ set                   -- admin mode → begin_edit → update_draft → commit
//!       ├─ reset                 -- defaults + clear storage
//!       ├─ init-settings         -- write settings.toml
//!       └─ serve                 -- page runtime over stdin/stdout JSON lines
//! ```
//!
//! Logs go to stderr so `serve` can keep stdout for replies.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pagekit_core::FieldPath;
use pagekit_editor::application::config_store::ConfigStore;
use pagekit_editor::application::edit_session::EditSession;
use pagekit_editor::application::page_shell::PageShell;
use pagekit_editor::infrastructure::runtime::{serve_lines, spawn_page};
use pagekit_editor::infrastructure::storage::settings::{
    load_settings, save_settings, settings_file_path,
};
use pagekit_editor::infrastructure::storage::FileStore;

/// Command-line arguments for the PageKit host.
#[derive(Parser, Debug)]
#[command(name = "pagekit", about = "Inline site editor for PageKit sites", version)]
struct Cli {
    /// Directory holding the stored site document (overrides settings).
    #[arg(long, env = "PAGEKIT_STORE_DIR")]
    store_dir: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory).
    #[arg(long, env = "PAGEKIT_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current site document as JSON.
    Show,
    /// List every editable field path.
    Paths,
    /// Print one field.
    Get { path: String },
    /// Edit one field and save it.
    Set { path: String, value: String },
    /// Restore the default document and clear storage.
    Reset,
    /// Write the effective settings to the settings file.
    InitSettings {
        /// Replace an existing settings file.
        #[arg(long)]
        force: bool,
    },
    /// Run a page session over stdin/stdout, one JSON message per line.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings_path = match cli.settings {
        Some(path) => path,
        None => settings_file_path().context("locating settings file")?,
    };
    let settings = load_settings(&settings_path)
        .with_context(|| format!("loading settings from {}", settings_path.display()))?;

    // Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.general.log_level)),
        )
        .init();

    let store_dir = match cli.store_dir {
        Some(dir) => dir,
        None => settings.storage_dir().context("locating storage directory")?,
    };
    info!(store = %store_dir.display(), "opening site storage");
    let mut store = ConfigStore::load_default(FileStore::new(store_dir));

    match cli.command {
        Command::Show => {
            println!("{}", serde_json::to_string_pretty(store.current())?);
        }
        Command::Paths => {
            for path in store.current().leaf_paths() {
                println!("{path}");
            }
        }
        Command::Get { path } => {
            let path = FieldPath::parse(&path)?;
            println!("{}", store.current().get(&path)?);
        }
        Command::Set { path, value } => {
            let path = FieldPath::parse(&path)?;
            let mut session = EditSession::new(settings.editor.discard_policy);
            session.set_admin_mode(true);
            session.begin_edit(path, store.current())?;
            session.update_draft(value)?;
            let outcome = session.commit(&mut store)?;
            if let Err(e) = outcome.persisted {
                bail!("{} changed but could not be saved: {e}", outcome.path);
            }
            println!("{} = {}", outcome.path, outcome.value);
        }
        Command::Reset => {
            store.reset_to_defaults().context("clearing stored document")?;
            println!("site document reset to defaults");
        }
        Command::InitSettings { force } => {
            if settings_path.exists() && !force {
                bail!(
                    "{} already exists (pass --force to overwrite)",
                    settings_path.display()
                );
            }
            save_settings(&settings_path, &settings)
                .with_context(|| format!("writing settings to {}", settings_path.display()))?;
            println!("wrote {}", settings_path.display());
        }
        Command::Serve => {
            let shell = PageShell::new(store, settings.shell_options());
            let (handle, task) = spawn_page(shell, settings.tick_interval());
            let stdin = BufReader::new(tokio::io::stdin());
            let result = serve_lines(&handle, stdin, tokio::io::stdout()).await;
            drop(handle);
            task.await.context("page runtime panicked")?;
            result?;
        }
    }

    Ok(())
}
