// SelVault - Ligne de commande
//
// Definition des arguments (clap) et execution des commandes qui ne
// touchent que le fichier d'historique. La commande `run`, qui a besoin
// des tampons du systeme, est lancee par le binaire.

use crate::config::settings::{AppPaths, Settings};
use crate::error::{SvError, SvResult};
use crate::history::store::HistoryStore;
use crate::storage::export::ExportFilter;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// Largeur de l'apercu affiche par `list` et `search`
const PREVIEW_CHARS: usize = 60;

#[derive(Parser, Debug)]
#[command(
    name = "selvault",
    version,
    about = "Clipboard and primary-selection history manager"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: <config dir>/selvault/selvault.rc)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// History file (default: <data dir>/selvault/history)
    #[arg(long, value_name = "PATH", global = true)]
    pub history: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Watch the selections and record their history
    Run,
    /// Print the history, most recent first
    List,
    /// Print the entries containing a text (case-insensitive)
    Search { query: String },
    /// Write the history to a text file
    Export {
        path: PathBuf,
        /// Only pinned entries
        #[arg(long, conflicts_with = "unpinned")]
        pinned: bool,
        /// Only unpinned entries
        #[arg(long)]
        unpinned: bool,
    },
    /// Remove every unpinned entry
    Clear,
    /// Pin or unpin the entry at INDEX (as shown by `list`)
    Pin { index: usize },
}

impl Cli {
    /// Chemins effectifs, options de la ligne de commande comprises.
    pub fn paths(&self) -> AppPaths {
        AppPaths::discover().with_overrides(self.config.clone(), self.history.clone())
    }
}

fn export_filter(pinned: bool, unpinned: bool) -> ExportFilter {
    match (pinned, unpinned) {
        (true, _) => ExportFilter::Pinned,
        (_, true) => ExportFilter::Unpinned,
        _ => ExportFilter::All,
    }
}

fn print_entries(store: &HistoryStore, indices: &[usize], out: &mut dyn Write) -> SvResult<()> {
    let entries = store.get_entries();
    for &i in indices {
        if let Some(entry) = entries.get(i) {
            let mark = if entry.is_pinned() { '*' } else { ' ' };
            writeln!(out, "{i:>4} {mark} {}", entry.preview(PREVIEW_CHARS))?;
        }
    }
    Ok(())
}

/// Execute une commande hors `run` sur le fichier d'historique.
/// Les modifications sont toujours ecrites sur disque.
///
/// # Errors
/// - `SvError::Io` : ecriture de l'historique ou de l'export impossible
/// - `SvError::Config` : index inconnu ou commande non geree ici
pub fn execute(command: &Command, settings: &Settings, paths: &AppPaths, out: &mut dyn Write) -> SvResult<()> {
    let store = HistoryStore::new(&paths.history, settings);
    store.load();

    match command {
        Command::Run => return Err(SvError::Config("`run` needs the system selections".into())),
        Command::List => {
            let all: Vec<usize> = (0..store.len()).collect();
            print_entries(&store, &all, out)?;
        }
        Command::Search { query } => {
            let found = store.search(query);
            print_entries(&store, &found, out)?;
        }
        Command::Export { path, pinned, unpinned } => {
            let count = store.export_as_text(path, export_filter(*pinned, *unpinned))?;
            writeln!(out, "{count} entries exported to {}", path.display())?;
        }
        Command::Clear => {
            store.clear();
            store.save()?;
            writeln!(out, "{} pinned entries kept", store.len())?;
        }
        Command::Pin { index } => {
            let pinned = store
                .toggle_pin(*index)
                .ok_or_else(|| SvError::Config(format!("no history entry at index {index}")))?;
            store.save()?;
            writeln!(out, "entry {index} {}", if pinned { "pinned" } else { "unpinned" })?;
        }
    }
    Ok(())
}
