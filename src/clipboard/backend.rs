// SelVault - Acces abstrait aux tampons de selection
//
// Le coeur ne connait que ce trait : lire/ecrire le texte d'un tampon,
// savoir s'il contient autre chose que du texte, et savoir si un bouton
// de la souris est enfonce (selection PRIMARY en cours).
//
// Les octets lus sont bruts : la validation UTF-8 est faite par le
// tracker, pas par le backend.

use crate::error::SvResult;
use std::fmt;

/// Tampon de selection suivi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionKind {
    /// Selection a la souris
    Primary,
    /// Copier/coller explicite
    Clipboard,
}

impl SelectionKind {
    /// Les deux tampons, dans l'ordre de verification.
    pub const ALL: [SelectionKind; 2] = [SelectionKind::Primary, SelectionKind::Clipboard];

    pub fn as_str(self) -> &'static str {
        match self {
            SelectionKind::Primary => "PRIMARY",
            SelectionKind::Clipboard => "CLIPBOARD",
        }
    }
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capacite de lecture/ecriture des tampons de selection.
pub trait SelectionBackend {
    /// Lit le contenu texte brut du tampon. `None` si le tampon est vide
    /// ou ne contient pas de texte.
    fn read_text(&mut self, kind: SelectionKind) -> SvResult<Option<Vec<u8>>>;

    /// Remplace le contenu du tampon. Un texte vide vide le tampon.
    fn write_text(&mut self, kind: SelectionKind, text: &str) -> SvResult<()>;

    /// Retourne true si le tampon contient un contenu non textuel (image...).
    fn has_other_content(&mut self, kind: SelectionKind) -> bool;

    /// Retourne true si un bouton de la souris est enfonce.
    fn pointer_held(&mut self) -> bool;
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::HashMap;

    /// Tampons en memoire, chaque ecriture est enregistree.
    #[derive(Debug, Default)]
    pub struct FakeSelections {
        pub contents: HashMap<SelectionKind, Vec<u8>>,
        pub other_content: HashMap<SelectionKind, bool>,
        pub writes: Vec<(SelectionKind, String)>,
        pub held: bool,
        pub fail_writes: bool,
    }

    impl FakeSelections {
        /// Simule une copie faite par une autre application.
        pub fn put(&mut self, kind: SelectionKind, text: &str) {
            self.contents.insert(kind, text.as_bytes().to_vec());
        }

        pub fn put_raw(&mut self, kind: SelectionKind, bytes: &[u8]) {
            self.contents.insert(kind, bytes.to_vec());
        }

        pub fn empty(&mut self, kind: SelectionKind) {
            self.contents.remove(&kind);
        }

        pub fn text(&self, kind: SelectionKind) -> Option<&str> {
            self.contents.get(&kind).and_then(|b| std::str::from_utf8(b).ok())
        }
    }

    impl SelectionBackend for FakeSelections {
        fn read_text(&mut self, kind: SelectionKind) -> SvResult<Option<Vec<u8>>> {
            Ok(self.contents.get(&kind).filter(|b| !b.is_empty()).cloned())
        }

        fn write_text(&mut self, kind: SelectionKind, text: &str) -> SvResult<()> {
            if self.fail_writes {
                return Err(crate::error::SvError::Selection("write refused".into()));
            }
            self.writes.push((kind, text.to_string()));
            self.put(kind, text);
            Ok(())
        }

        fn has_other_content(&mut self, kind: SelectionKind) -> bool {
            self.other_content.get(&kind).copied().unwrap_or(false)
        }

        fn pointer_held(&mut self) -> bool {
            self.held
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(SelectionKind::Primary.to_string(), "PRIMARY");
        assert_eq!(SelectionKind::ALL[1], SelectionKind::Clipboard);
    }
}
