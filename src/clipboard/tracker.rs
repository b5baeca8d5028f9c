// SelVault - Suivi d'un tampon de selection
// Machine a etats : Check, SetExternal, Reset
//
// Chaque tampon suivi (PRIMARY, CLIPBOARD) a son propre tracker, qui
// memorise le dernier texte accepte et decide du sort de chaque
// changement observe.
//
// # Check
// 1. Tampon non suivi (ou suivi desactive) : rien, et l'eventuelle
//    re-verification differee est annulee.
// 2. PRIMARY avec un bouton de souris enfonce : la selection est en cours,
//    on differe (l'appelant re-arme un timer court).
// 3. Tampon vide : si `restore_empty` est actif, qu'aucun autre contenu
//    n'est present et qu'un dernier texte existe, il est re-ecrit. C'est
//    le seul cas ou un Check ecrit dans le tampon.
// 4. Texte identique au dernier texte : rien.
// 5. Texte compose uniquement d'espaces avec `ignore_whiteonly` : rejete.
// 6. Sinon le texte est accepte et memorise, sans etre re-ecrit (il est
//    deja dans le tampon).
//
// # Texte invalide
// Les octets lus sont tronques au premier octet UTF-8 invalide ; sans
// aucun octet valide, le contenu est ignore.

use crate::clipboard::backend::{SelectionBackend, SelectionKind};
use crate::config::settings::Settings;
use crate::error::SvResult;
use crate::history::text;

/// Resultat d'un Check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Tampon non suivi
    Disabled,
    /// Selection a la souris en cours, re-verifier plus tard
    Deferred,
    /// Tampon vide, rien a restaurer
    Empty,
    /// Tampon vide, dernier texte re-ecrit
    Restored(String),
    /// Meme texte que le dernier accepte
    Unchanged,
    /// Texte refuse par le filtre
    Rejected,
    /// Contenu illisible (aucun octet UTF-8 valide ou erreur de lecture)
    Invalid,
    /// Nouveau texte accepte
    Accepted(String),
}

/// Indique si un tampon est suivi avec ces preferences.
pub fn is_tracked(settings: &Settings, kind: SelectionKind) -> bool {
    settings.enabled
        && match kind {
            SelectionKind::Primary => settings.track_primary,
            SelectionKind::Clipboard => settings.track_clipboard,
        }
}

/// Filtre applique avant d'accepter un texte.
pub fn should_save(text: &str, settings: &Settings) -> bool {
    !(settings.ignore_whiteonly && text.chars().all(char::is_whitespace))
}

/// Etat d'un tampon de selection.
#[derive(Debug, Clone)]
pub struct SelectionTracker {
    kind: SelectionKind,
    last_text: Option<String>,
    deferred: bool,
}

impl SelectionTracker {
    pub fn new(kind: SelectionKind) -> Self {
        Self {
            kind,
            last_text: None,
            deferred: false,
        }
    }

    pub fn kind(&self) -> SelectionKind {
        self.kind
    }

    /// Dernier texte accepte (ou restaure).
    pub fn last_text(&self) -> Option<&str> {
        self.last_text.as_deref()
    }

    /// Retourne true si une re-verification differee est en attente.
    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    /// Examine le contenu courant du tampon.
    pub fn check(&mut self, backend: &mut dyn SelectionBackend, settings: &Settings) -> CheckOutcome {
        if !is_tracked(settings, self.kind) {
            self.deferred = false;
            return CheckOutcome::Disabled;
        }

        if self.kind == SelectionKind::Primary && backend.pointer_held() {
            if !self.deferred {
                tracing::debug!(buffer = %self.kind, "pointer held, deferring check");
            }
            self.deferred = true;
            return CheckOutcome::Deferred;
        }
        self.deferred = false;

        let raw = match backend.read_text(self.kind) {
            Ok(raw) => raw.filter(|bytes| !bytes.is_empty()),
            Err(e) => {
                tracing::warn!(buffer = %self.kind, "cannot read selection: {e}");
                return CheckOutcome::Invalid;
            }
        };

        let Some(bytes) = raw else {
            return self.restore_if_empty(backend, settings);
        };

        let new = match text::validate_owned(&bytes) {
            Ok(t) => t,
            Err(e) => {
                tracing::debug!(buffer = %self.kind, "discarding selection: {e}");
                return CheckOutcome::Invalid;
            }
        };

        if self.last_text.as_deref() == Some(new.as_str()) {
            return CheckOutcome::Unchanged;
        }
        if !should_save(&new, settings) {
            tracing::debug!(buffer = %self.kind, bytes = new.len(), "whitespace-only text ignored");
            return CheckOutcome::Rejected;
        }

        tracing::debug!(buffer = %self.kind, bytes = new.len(), "selection accepted");
        self.last_text = Some(new.clone());
        CheckOutcome::Accepted(new)
    }

    fn restore_if_empty(&mut self, backend: &mut dyn SelectionBackend, settings: &Settings) -> CheckOutcome {
        if !settings.restore_empty || backend.has_other_content(self.kind) {
            return CheckOutcome::Empty;
        }
        let Some(last) = self.last_text.clone() else {
            return CheckOutcome::Empty;
        };
        match backend.write_text(self.kind, &last) {
            Ok(()) => {
                tracing::debug!(buffer = %self.kind, bytes = last.len(), "empty selection restored");
                CheckOutcome::Restored(last)
            }
            Err(e) => {
                tracing::warn!(buffer = %self.kind, "cannot restore selection: {e}");
                CheckOutcome::Empty
            }
        }
    }

    /// Ecrit `text` dans le tampon et le memorise.
    /// Retourne true si le texte differe du dernier texte memorise.
    ///
    /// # Errors
    /// `SvError::Selection` si l'ecriture echoue ; l'etat n'est pas modifie.
    pub fn set_external(
        &mut self,
        backend: &mut dyn SelectionBackend,
        settings: &Settings,
        text: &str,
    ) -> SvResult<bool> {
        if !is_tracked(settings, self.kind) {
            return Ok(false);
        }
        if text.is_empty() {
            self.reset(backend, settings)?;
            return Ok(false);
        }
        backend.write_text(self.kind, text)?;
        let changed = self.last_text.as_deref() != Some(text);
        if changed {
            self.last_text = Some(text.to_string());
        }
        Ok(changed)
    }

    /// Vide le tampon et oublie le dernier texte.
    ///
    /// # Errors
    /// `SvError::Selection` si le tampon ne peut pas etre vide.
    pub fn reset(&mut self, backend: &mut dyn SelectionBackend, settings: &Settings) -> SvResult<()> {
        self.last_text = None;
        self.deferred = false;
        if is_tracked(settings, self.kind) {
            backend.write_text(self.kind, "")?;
        }
        Ok(())
    }
}
