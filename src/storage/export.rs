// SelVault - Export texte de l'historique
//
// Ecrit les entrees dans un fichier UTF-8 lisible, separees par une
// ligne de tirets entouree de lignes vides.
//
// # Regroupement
// Les entrees non epinglees sont ecrites en premier, puis les entrees
// epinglees, chaque groupe dans l'ordre de l'historique.

use crate::constants::EXPORT_SEPARATOR;
use crate::error::SvResult;
use crate::history::entry::HistoryEntry;
use std::fs;
use std::path::Path;

/// Partie de l'historique a exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFilter {
    #[default]
    All,
    Pinned,
    Unpinned,
}

impl ExportFilter {
    fn accepts_group(&self, pinned: bool) -> bool {
        match self {
            ExportFilter::All => true,
            ExportFilter::Pinned => pinned,
            ExportFilter::Unpinned => !pinned,
        }
    }
}

/// Construit le texte exporte.
pub fn render_export(entries: &[HistoryEntry], filter: ExportFilter) -> String {
    let mut out = String::new();
    let mut first = true;
    for pinned in [false, true] {
        if !filter.accepts_group(pinned) {
            continue;
        }
        for entry in entries.iter().filter(|e| e.is_pinned() == pinned) {
            if !first {
                out.push_str(EXPORT_SEPARATOR);
            }
            out.push_str(&entry.text);
            first = false;
        }
    }
    out
}

/// Exporte l'historique dans `path`. Retourne le nombre d'entrees ecrites.
///
/// # Errors
/// `SvError::Io` si le fichier de destination ne peut pas etre ecrit.
pub fn export_as_text(path: &Path, entries: &[HistoryEntry], filter: ExportFilter) -> SvResult<usize> {
    let count = entries
        .iter()
        .filter(|e| filter.accepts_group(e.is_pinned()))
        .count();
    fs::write(path, render_export(entries, filter))?;
    tracing::info!(count, path = %path.display(), "history exported");
    Ok(count)
}
