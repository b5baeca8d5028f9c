// SelVault - Liste ordonnee de l'historique
// Structure FIFO avec deduplication et epinglage
//
// Ce module implemente le stockage en memoire des entrees de
// l'historique sous forme de liste ordonnee (plus recente en tete).
// Il n'est pas synchronise : `HistoryStore` l'enveloppe dans un Mutex.
//
// # Deduplication
// `add_text` cherche une entree TEXT non epinglee de meme contenu ;
// si elle existe, elle est deplacee en tete et garde ses propres flags
// (les flags fournis par l'appelant sont ignores). Une entree epinglee
// identique n'est jamais deplacee ni fusionnee.
//
// # Capacite et rotation
// `truncate` supprime les entrees non epinglees les plus anciennes tant
// que la longueur depasse la limite. L'entree en tete (la derniere
// inseree) et les entrees epinglees ne sont jamais supprimees.
//
// # Dirty flag
// Le flag `dirty` est positionne a chaque modification et remis a
// zero apres une sauvegarde reussie (via `reset_dirty`).

use crate::history::entry::{EntryFlags, HistoryEntry};

/// Historique en memoire, les plus recentes en tete.
#[derive(Debug, Clone, Default)]
pub struct HistoryRing {
    entries: Vec<HistoryEntry>,
    dirty: bool,
}

/// Resultat d'un ajout de texte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Texte vide, rien n'a change
    Ignored,
    /// Nouvelle entree creee
    Inserted,
    /// Doublon existant deplace en tete
    Promoted,
}

impl HistoryRing {
    /// Cree un historique vide.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute un texte en tete de l'historique.
    pub fn add_text(&mut self, text: &str, flags: EntryFlags) -> AddOutcome {
        if text.is_empty() {
            return AddOutcome::Ignored;
        }

        if let Some(pos) = self.entries.iter().position(|e| e.is_text_duplicate_of(text)) {
            let existing = self.entries.remove(pos);
            if existing.flags != flags {
                tracing::debug!(
                    kept = existing.flags.bits(),
                    requested = flags.bits(),
                    "duplicate text keeps its existing flags"
                );
            }
            self.entries.insert(0, existing);
            self.dirty = true;
            return AddOutcome::Promoted;
        }

        self.entries.insert(0, HistoryEntry::text(text, flags));
        self.dirty = true;
        AddOutcome::Inserted
    }

    /// Supprime les entrees excedentaires. Retourne le nombre de suppressions.
    pub fn truncate(&mut self, limit: usize) -> usize {
        let mut removed = 0;
        while self.entries.len() > limit {
            // Plus ancienne entree non epinglee, hors tete
            let victim = (1..self.entries.len())
                .rev()
                .find(|&i| !self.entries[i].is_pinned());
            match victim {
                Some(i) => {
                    self.entries.remove(i);
                    removed += 1;
                }
                // Tout le reste est epingle
                None => break,
            }
        }
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Purge toutes les entrees non epinglees.
    pub fn clear_unpinned(&mut self) {
        self.entries.retain(|e| e.is_pinned());
        self.dirty = true;
    }

    /// Epingle ou desepingle l'entree a l'index donne.
    /// Retourne le nouvel etat, ou None si l'index est hors limites.
    pub fn toggle_pin(&mut self, index: usize) -> Option<bool> {
        let entry = self.entries.get_mut(index)?;
        let pinned = !entry.is_pinned();
        entry.flags.set_pinned(pinned);
        self.dirty = true;
        Some(pinned)
    }

    /// Supprime l'entree a l'index donne.
    pub fn remove(&mut self, index: usize) -> Option<HistoryEntry> {
        if index < self.entries.len() {
            self.dirty = true;
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Supprime plusieurs entrees d'un coup (indices dans l'ordre courant).
    /// Les indices hors limites ou dupliques sont ignores.
    pub fn remove_many(&mut self, indices: &[usize]) -> usize {
        let mut sorted: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.entries.len())
            .collect();
        sorted.sort_unstable();
        sorted.dedup();
        // Du plus grand au plus petit pour garder les indices valides
        for &i in sorted.iter().rev() {
            self.entries.remove(i);
        }
        if !sorted.is_empty() {
            self.dirty = true;
        }
        sorted.len()
    }

    /// Retourne l'entree a l'index donne (0 = plus recente).
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Nombre d'entrees.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Retourne true si l'historique est vide.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nombre d'entrees epinglees.
    pub fn pinned_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_pinned()).count()
    }

    /// Retourne true si l'historique a ete modifie depuis le dernier reset.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marque l'historique comme non modifie.
    pub fn reset_dirty(&mut self) {
        self.dirty = false;
    }

    /// Retourne toutes les entrees comme slice.
    pub fn as_slice(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Reconstruit l'historique a partir d'un vecteur d'entrees.
    pub fn load_from(&mut self, entries: Vec<HistoryEntry>) {
        self.entries = entries;
        self.dirty = false;
    }
}
