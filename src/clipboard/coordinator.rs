// SelVault - Coordination des deux tampons de selection
//
// Le coordinateur possede les deux trackers, le backend, l'historique
// partage et les preferences. Il est construit une seule fois au
// demarrage et recoit tous les evenements : tick de scrutation, clic sur
// une entree de l'historique, effacement de l'historique.
//
// # Texte accepte
// Chaque texte accepte par un tracker est ajoute a l'historique (flags 0),
// devient le texte le plus recent, puis est transmis aux ecouteurs.
// Un texte restaure n'est pas re-ajoute : il est deja dans l'historique.
//
// # Synchronisation
// Apres les deux Check d'un tick, si `synchronize` est actif, que les deux
// tampons sont suivis, que leurs textes different et qu'un texte recent
// existe, ce texte est ecrit dans les deux tampons.

use crate::clipboard::backend::{SelectionBackend, SelectionKind};
use crate::clipboard::tracker::{self, CheckOutcome, SelectionTracker};
use crate::config::settings::Settings;
use crate::error::SvResult;
use crate::history::entry::EntryFlags;
use crate::history::store::HistoryStore;
use std::sync::Arc;

/// Ecouteur notifie a chaque texte accepte.
pub type AcceptedListener = Box<dyn FnMut(SelectionKind, &str)>;

/// Resultat d'un tick de scrutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub primary: CheckOutcome,
    pub clipboard: CheckOutcome,
    /// Les deux tampons ont ete realignes
    pub synchronized: bool,
}

impl TickReport {
    /// Retourne true si une re-verification courte doit etre programmee.
    pub fn wants_rearm(&self) -> bool {
        self.primary == CheckOutcome::Deferred
    }
}

/// Politique commune aux deux tampons.
pub struct Coordinator<B: SelectionBackend> {
    backend: B,
    store: Arc<HistoryStore>,
    settings: Settings,
    primary: SelectionTracker,
    clipboard: SelectionTracker,
    most_recent: Option<String>,
    listeners: Vec<AcceptedListener>,
}

impl<B: SelectionBackend> Coordinator<B> {
    pub fn new(backend: B, store: Arc<HistoryStore>, settings: Settings) -> Self {
        Self {
            backend,
            store,
            settings,
            primary: SelectionTracker::new(SelectionKind::Primary),
            clipboard: SelectionTracker::new(SelectionKind::Clipboard),
            most_recent: None,
            listeners: Vec::new(),
        }
    }

    /// Ajoute un ecouteur de textes acceptes.
    pub fn on_accepted(&mut self, listener: impl FnMut(SelectionKind, &str) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<HistoryStore> {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Dernier texte accepte, restaure ou choisi dans l'historique.
    pub fn most_recent(&self) -> Option<&str> {
        self.most_recent.as_deref()
    }

    /// Dernier texte connu d'un tampon.
    pub fn current_text(&self, kind: SelectionKind) -> Option<&str> {
        self.tracker(kind).last_text()
    }

    fn tracker(&self, kind: SelectionKind) -> &SelectionTracker {
        match kind {
            SelectionKind::Primary => &self.primary,
            SelectionKind::Clipboard => &self.clipboard,
        }
    }

    /// Tracker, backend et preferences empruntes ensemble.
    fn parts(&mut self, kind: SelectionKind) -> (&mut SelectionTracker, &mut B, &Settings) {
        let tracker = match kind {
            SelectionKind::Primary => &mut self.primary,
            SelectionKind::Clipboard => &mut self.clipboard,
        };
        (tracker, &mut self.backend, &self.settings)
    }

    /// Check d'un tampon (timer ou notification de changement).
    pub fn check(&mut self, kind: SelectionKind) -> CheckOutcome {
        let (tracker, backend, settings) = self.parts(kind);
        let outcome = tracker.check(backend, settings);
        match &outcome {
            CheckOutcome::Accepted(text) => self.accept(kind, text),
            CheckOutcome::Restored(text) => self.most_recent = Some(text.clone()),
            _ => {}
        }
        outcome
    }

    /// Un cycle de scrutation : PRIMARY, CLIPBOARD, puis synchronisation.
    pub fn tick(&mut self) -> TickReport {
        let primary = self.check(SelectionKind::Primary);
        let clipboard = self.check(SelectionKind::Clipboard);
        let synchronized = self.synchronize();
        TickReport {
            primary,
            clipboard,
            synchronized,
        }
    }

    fn synchronize(&mut self) -> bool {
        let both_tracked = SelectionKind::ALL
            .iter()
            .all(|&k| tracker::is_tracked(&self.settings, k));
        if !self.settings.synchronize || !both_tracked {
            return false;
        }
        if self.primary.last_text() == self.clipboard.last_text() {
            return false;
        }
        let Some(text) = self.most_recent.clone() else {
            return false;
        };
        tracing::debug!(bytes = text.len(), "synchronizing selections");
        for kind in SelectionKind::ALL {
            self.set_external(kind, &text);
        }
        true
    }

    /// Ecrit un texte dans un tampon (SetExternal). Un echec est journalise.
    pub fn set_external(&mut self, kind: SelectionKind, text: &str) -> bool {
        let (tracker, backend, settings) = self.parts(kind);
        match tracker.set_external(backend, settings, text) {
            Ok(true) => {
                self.accept(kind, text);
                true
            }
            Ok(false) => false,
            Err(e) => {
                tracing::warn!(buffer = %kind, "cannot set selection: {e}");
                false
            }
        }
    }

    /// Clic sur une entree de l'historique : le texte va dans les deux tampons.
    /// Retourne true si au moins un tampon suivi a ete ecrit ; sinon le
    /// texte le plus recent reste inchange.
    pub fn select_history_item(&mut self, text: &str) -> bool {
        let mut written = false;
        for kind in SelectionKind::ALL {
            if !tracker::is_tracked(&self.settings, kind) {
                continue;
            }
            let (tracker, backend, settings) = self.parts(kind);
            match tracker.set_external(backend, settings, text) {
                Ok(changed) => {
                    written = true;
                    if changed {
                        self.accept(kind, text);
                    }
                }
                Err(e) => tracing::warn!(buffer = %kind, "cannot set selection: {e}"),
            }
        }
        if written && !text.is_empty() {
            self.most_recent = Some(text.to_string());
        }
        written
    }

    /// Vide les deux tampons (effacement de l'historique).
    ///
    /// # Errors
    /// `SvError::Selection` si un tampon ne peut pas etre vide ; l'autre
    /// tampon est tout de meme traite.
    pub fn reset_all(&mut self) -> SvResult<()> {
        self.most_recent = None;
        let mut result = Ok(());
        for kind in SelectionKind::ALL {
            let (tracker, backend, settings) = self.parts(kind);
            if let Err(e) = tracker.reset(backend, settings) {
                tracing::warn!(buffer = %kind, "cannot reset selection: {e}");
                result = Err(e);
            }
        }
        result
    }

    /// Au demarrage, remplit les tampons suivis et vides avec l'entree
    /// la plus recente de l'historique.
    pub fn restore_from_history(&mut self) {
        let Some(text) = self.store.most_recent() else {
            return;
        };
        for kind in SelectionKind::ALL {
            if !tracker::is_tracked(&self.settings, kind) {
                continue;
            }
            let empty = match self.backend.read_text(kind) {
                Ok(raw) => raw.map_or(true, |b| b.is_empty()),
                Err(e) => {
                    tracing::warn!(buffer = %kind, "cannot read selection: {e}");
                    continue;
                }
            };
            if empty && !self.backend.has_other_content(kind) {
                tracing::debug!(buffer = %kind, "restoring selection from history");
                // deja dans l'historique : pas de nouvel ajout
                let (tracker, backend, settings) = self.parts(kind);
                if let Err(e) = tracker.set_external(backend, settings, &text) {
                    tracing::warn!(buffer = %kind, "cannot restore selection: {e}");
                    continue;
                }
                self.most_recent = Some(text.clone());
            }
        }
    }

    /// Remplace les preferences a chaud.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.store.apply_settings(&settings);
        self.settings = settings;
    }

    fn accept(&mut self, kind: SelectionKind, text: &str) {
        self.store.add_text_item(text, EntryFlags::empty());
        self.most_recent = Some(text.to_string());
        for listener in &mut self.listeners {
            listener(kind, text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::backend::fake::FakeSelections;
    use std::cell::RefCell;
    use std::rc::Rc;

    const P: SelectionKind = SelectionKind::Primary;
    const C: SelectionKind = SelectionKind::Clipboard;

    fn settings(synchronize: bool) -> Settings {
        Settings {
            track_primary: true,
            track_clipboard: true,
            synchronize,
            save_history: false,
            ..Settings::default()
        }
    }

    fn coordinator(settings: Settings) -> Coordinator<FakeSelections> {
        let store = Arc::new(HistoryStore::new("/nonexistent/history", &settings));
        Coordinator::new(FakeSelections::default(), store, settings)
    }

    fn history(c: &Coordinator<FakeSelections>) -> Vec<String> {
        c.store().get_entries().into_iter().map(|e| e.text).collect()
    }

    #[test]
    fn test_accepted_text_goes_to_history_and_listeners() {
        let mut c = coordinator(settings(false));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        c.on_accepted(move |kind, text| sink.borrow_mut().push((kind, text.to_string())));

        c.backend_mut().put(C, "copied");
        let report = c.tick();
        assert_eq!(report.clipboard, CheckOutcome::Accepted("copied".into()));
        assert_eq!(history(&c), vec!["copied"]);
        assert_eq!(*seen.borrow(), vec![(C, "copied".to_string())]);
        assert_eq!(c.most_recent(), Some("copied"));
    }

    #[test]
    fn test_unchanged_primary_no_event_no_write() {
        let mut c = coordinator(settings(false));
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        c.on_accepted(move |_, _| *sink.borrow_mut() += 1);

        c.backend_mut().put(P, "sel");
        c.check(P);
        assert_eq!(c.check(P), CheckOutcome::Unchanged);
        assert_eq!(*count.borrow(), 1);
        assert!(c.backend().writes.is_empty());
    }

    #[test]
    fn test_restore_empty_scenario() {
        let mut c = coordinator(settings(false));
        c.backend_mut().put(C, "x");
        c.tick();
        c.backend_mut().empty(C);
        let report = c.tick();
        assert_eq!(report.clipboard, CheckOutcome::Restored("x".into()));
        assert_eq!(c.backend().text(C), Some("x"));
        assert_eq!(c.current_text(C), Some("x"));
        // pas de doublon dans l'historique
        assert_eq!(history(&c), vec!["x"]);
    }

    #[test]
    fn test_synchronize_converges() {
        let mut c = coordinator(settings(true));
        c.backend_mut().put(C, "copied");
        let report = c.tick();
        assert!(report.synchronized);
        assert_eq!(c.backend().text(P), Some("copied"));
        assert_eq!(c.current_text(P), Some("copied"));
        assert_eq!(c.current_text(C), Some("copied"));
        assert_eq!(history(&c), vec!["copied"]);

        // deja aligne : plus d'ecriture
        let writes = c.backend().writes.len();
        assert!(!c.tick().synchronized);
        assert_eq!(c.backend().writes.len(), writes);
    }

    #[test]
    fn test_synchronize_prefers_most_recent() {
        let mut c = coordinator(settings(true));
        c.backend_mut().put(P, "older");
        c.backend_mut().put(C, "newer");
        c.tick();
        // CLIPBOARD est verifie apres PRIMARY : il l'emporte
        assert_eq!(c.backend().text(P), Some("newer"));
        assert_eq!(c.backend().text(C), Some("newer"));
        assert_eq!(history(&c), vec!["newer", "older"]);
    }

    #[test]
    fn test_no_sync_when_one_buffer_untracked() {
        let mut c = coordinator(Settings {
            track_primary: false,
            ..settings(true)
        });
        c.backend_mut().put(C, "copied");
        assert!(!c.tick().synchronized);
        assert!(c.backend().text(P).is_none());
    }

    #[test]
    fn test_deferred_tick_wants_rearm() {
        let mut c = coordinator(settings(false));
        c.backend_mut().held = true;
        c.backend_mut().put(P, "drag");
        let report = c.tick();
        assert!(report.wants_rearm());
        assert!(c.store().is_empty());

        c.backend_mut().held = false;
        let report = c.tick();
        assert!(!report.wants_rearm());
        assert_eq!(history(&c), vec!["drag"]);
    }

    #[test]
    fn test_select_history_item() {
        let mut c = coordinator(settings(false));
        for t in ["a", "b"] {
            c.backend_mut().put(C, t);
            c.tick();
        }
        assert!(c.select_history_item("a"));
        assert_eq!(c.backend().text(P), Some("a"));
        assert_eq!(c.backend().text(C), Some("a"));
        assert_eq!(history(&c), vec!["a", "b"]);
        assert_eq!(c.most_recent(), Some("a"));
    }

    #[test]
    fn test_select_history_item_nothing_tracked() {
        let mut c = coordinator(Settings {
            track_primary: false,
            track_clipboard: false,
            ..settings(false)
        });
        assert!(!c.select_history_item("old"));
        assert!(c.most_recent().is_none());
        assert!(c.backend().writes.is_empty());
    }

    #[test]
    fn test_select_history_item_write_refused() {
        let mut c = coordinator(settings(false));
        c.backend_mut().put(C, "current");
        c.tick();
        c.backend_mut().fail_writes = true;
        assert!(!c.select_history_item("old"));
        assert_eq!(c.most_recent(), Some("current"));
        assert_eq!(history(&c), vec!["current"]);

        // un seul tampon suivi et ecrit suffit
        c.backend_mut().fail_writes = false;
        c.apply_settings(Settings {
            track_primary: false,
            ..settings(false)
        });
        assert!(c.select_history_item("old"));
        assert_eq!(c.most_recent(), Some("old"));
        assert!(c.backend().text(P).is_none());
    }

    #[test]
    fn test_reset_all() {
        let mut c = coordinator(settings(false));
        c.backend_mut().put(C, "secret");
        c.tick();
        c.reset_all().unwrap();
        assert!(c.most_recent().is_none());
        assert!(c.current_text(C).is_none());
        // le tampon vide n'est pas restaure
        assert_eq!(c.tick().clipboard, CheckOutcome::Empty);
    }

    #[test]
    fn test_restore_from_history_on_startup() {
        let s = settings(false);
        let store = Arc::new(HistoryStore::new("/nonexistent/history", &s));
        store.add_text_item("persisted", EntryFlags::empty());
        let mut fake = FakeSelections::default();
        fake.put(P, "already there");
        let mut c = Coordinator::new(fake, store, s);

        c.restore_from_history();
        assert_eq!(c.backend().text(C), Some("persisted"));
        assert_eq!(c.backend().text(P), Some("already there"));
        assert_eq!(c.most_recent(), Some("persisted"));
        assert_eq!(c.store().len(), 1);
    }

    #[test]
    fn test_apply_settings_disables_tracking() {
        let mut c = coordinator(settings(false));
        c.apply_settings(Settings {
            enabled: false,
            ..settings(false)
        });
        c.backend_mut().put(C, "ignored");
        let report = c.tick();
        assert_eq!(report.clipboard, CheckOutcome::Disabled);
        assert!(c.store().is_empty());
    }
}
