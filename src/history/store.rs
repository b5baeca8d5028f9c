// SelVault - Historique partage
// Enveloppe synchronisee de HistoryRing avec politique de persistance
//
// `HistoryStore` est l'unique etat mutable partage de l'application : la
// boucle de scrutation et les commandes utilisateur passent toutes par
// son Mutex. Chaque operation prend le verrou pour sa duree, ecriture
// disque comprise : une mutation et sa sauvegarde forment un tout, et
// deux sauvegardes ne se chevauchent jamais.
//
// # Persistance
// Si `save_history` est actif, chaque mutation declenche une sauvegarde
// complete. Un echec est journalise et l'historique reste marque dirty :
// la sauvegarde sera retentee a la mutation suivante.
//
// # Chargement
// `load` ne retourne jamais d'erreur : un fichier absent, illisible ou
// d'un autre format donne un historique vide.

use crate::config::settings::Settings;
use crate::error::SvResult;
use crate::history::entry::{EntryFlags, HistoryEntry};
use crate::history::ring::{AddOutcome, HistoryRing};
use crate::history::search;
use crate::storage::export::{self, ExportFilter};
use crate::storage::history_file;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

struct StoreState {
    ring: HistoryRing,
    limit: usize,
    save_history: bool,
}

/// Historique ordonne (plus recent en tete), partage entre threads.
pub struct HistoryStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl HistoryStore {
    /// Cree un historique vide associe au fichier `path`.
    pub fn new(path: impl Into<PathBuf>, settings: &Settings) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(StoreState {
                ring: HistoryRing::new(),
                limit: settings.history_limit,
                save_history: settings.save_history,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Chemin du fichier d'historique.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ajoute un texte en tete, puis tronque a la limite.
    pub fn add_text_item(&self, text: &str, flags: EntryFlags) -> AddOutcome {
        let mut state = self.lock();
        let outcome = state.ring.add_text(text, flags);
        if outcome == AddOutcome::Ignored {
            return outcome;
        }
        let limit = state.limit;
        state.ring.truncate(limit);
        tracing::debug!(?outcome, bytes = text.len(), "history item added");
        self.persist(&mut state);
        outcome
    }

    /// Supprime les entrees non epinglees les plus anciennes au-dela de la limite.
    pub fn truncate(&self) -> usize {
        let mut state = self.lock();
        let limit = state.limit;
        let removed = state.ring.truncate(limit);
        if removed > 0 {
            tracing::debug!(removed, "history truncated");
        }
        self.persist(&mut state);
        removed
    }

    /// Supprime toutes les entrees non epinglees.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.ring.clear_unpinned();
        tracing::info!(kept = state.ring.len(), "history cleared");
        self.persist(&mut state);
    }

    /// Epingle/desepingle l'entree `index`. Retourne le nouvel etat.
    pub fn toggle_pin(&self, index: usize) -> Option<bool> {
        let mut state = self.lock();
        let pinned = state.ring.toggle_pin(index)?;
        self.persist(&mut state);
        Some(pinned)
    }

    /// Supprime les entrees aux indices donnes. Retourne le nombre supprime.
    pub fn remove(&self, indices: &[usize]) -> usize {
        let mut state = self.lock();
        let removed = state.ring.remove_many(indices);
        if removed > 0 {
            self.persist(&mut state);
        }
        removed
    }

    /// Sauvegarde explicite de l'historique, quel que soit `save_history`.
    ///
    /// # Errors
    /// `SvError::Io` si l'ecriture du fichier echoue.
    pub fn save(&self) -> SvResult<()> {
        let mut state = self.lock();
        history_file::save_history(&self.path, state.ring.as_slice())?;
        state.ring.reset_dirty();
        tracing::info!(entries = state.ring.len(), "history saved");
        Ok(())
    }

    /// Remplace l'historique par le contenu du fichier.
    /// Retourne le nombre d'entrees chargees.
    pub fn load(&self) -> usize {
        let entries = match history_file::load_history(&self.path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "cannot read history: {e}");
                Vec::new()
            }
        };
        let count = entries.len();
        self.lock().ring.load_from(entries);
        tracing::info!(entries = count, "history loaded");
        count
    }

    /// Exporte l'historique en texte brut.
    ///
    /// # Errors
    /// `SvError::Io` si le fichier de destination ne peut pas etre ecrit.
    pub fn export_as_text(&self, path: &Path, filter: ExportFilter) -> SvResult<usize> {
        let snapshot = self.get_entries();
        export::export_as_text(path, &snapshot, filter)
    }

    /// Copie ordonnee des entrees (plus recente en tete).
    pub fn get_entries(&self) -> Vec<HistoryEntry> {
        self.lock().ring.as_slice().to_vec()
    }

    /// Texte de l'entree la plus recente.
    pub fn most_recent(&self) -> Option<String> {
        self.lock().ring.get(0).map(|e| e.text.clone())
    }

    /// Indices des entrees contenant `query` (insensible a la casse).
    pub fn search(&self, query: &str) -> Vec<usize> {
        search::search_entries(self.lock().ring.as_slice(), query)
    }

    /// Nombre d'entrees.
    pub fn len(&self) -> usize {
        self.lock().ring.len()
    }

    /// Retourne true si l'historique est vide.
    pub fn is_empty(&self) -> bool {
        self.lock().ring.is_empty()
    }

    /// Retourne true si des modifications n'ont pas encore ete ecrites.
    pub fn is_dirty(&self) -> bool {
        self.lock().ring.is_dirty()
    }

    /// Applique une nouvelle limite et une nouvelle politique de sauvegarde.
    pub fn apply_settings(&self, settings: &Settings) {
        let mut state = self.lock();
        state.limit = settings.history_limit;
        state.save_history = settings.save_history;
        let removed = state.ring.truncate(settings.history_limit);
        if removed > 0 {
            tracing::debug!(removed, "history truncated");
        }
        self.persist(&mut state);
    }

    /// Sauvegarde si la persistance est active et l'historique modifie.
    /// Appele avec le verrou tenu.
    fn persist(&self, state: &mut StoreState) {
        if !state.save_history || !state.ring.is_dirty() {
            return;
        }
        match history_file::save_history(&self.path, state.ring.as_slice()) {
            Ok(()) => state.ring.reset_dirty(),
            Err(e) => tracing::warn!("history save failed, will retry: {e}"),
        }
    }
}
