// SelVault - Structure HistoryEntry
// Represente une entree dans l'historique des selections
//
// Ce module definit les types de donnees fondamentaux de l'historique :
// - `EntryKind`  : type de contenu (texte, image, ou code inconnu conserve)
// - `EntryFlags` : ensemble de bits (seul PERSISTENT est interprete)
// - `HistoryEntry` : entree complete (texte, flags, type)
//
// # Serialisation
// Chaque entree est serialisable en trame binaire (voir storage/format.rs).
// Le type et les flags sont conserves tels quels, y compris les valeurs
// inconnues, pour qu'une relecture reproduise exactement le fichier.
//
// # Deduplication
// `is_text_duplicate_of` ne considere que les entrees TEXT non epinglees :
// une entree epinglee n'est jamais fusionnee avec un nouveau texte.

/// Type de contenu de l'entree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Texte UTF-8
    Text,
    /// Image (reserve, jamais produit par le moniteur)
    Image,
    /// Code inconnu lu depuis le disque
    Other(i16),
}

impl EntryKind {
    /// Code TEXT sur disque
    pub const TEXT_CODE: i16 = 0x1;
    /// Code IMAGE sur disque
    pub const IMAGE_CODE: i16 = 0x2;

    /// Convertit un code disque en EntryKind.
    pub fn from_raw(v: i16) -> Self {
        match v {
            Self::TEXT_CODE => Self::Text,
            Self::IMAGE_CODE => Self::Image,
            other => Self::Other(other),
        }
    }

    /// Retourne le code disque.
    pub fn to_raw(self) -> i16 {
        match self {
            Self::Text => Self::TEXT_CODE,
            Self::Image => Self::IMAGE_CODE,
            Self::Other(v) => v,
        }
    }
}

/// Flags d'une entree, stockes sur 16 bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EntryFlags(u16);

impl EntryFlags {
    /// L'entree est epinglee (survit a la troncature et au vidage)
    pub const PERSISTENT: u16 = 0x4;

    /// Flags vides.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Flags avec uniquement PERSISTENT.
    pub const fn pinned() -> Self {
        Self(Self::PERSISTENT)
    }

    /// Construit depuis les bits bruts.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Bits bruts.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Retourne true si l'entree est epinglee.
    pub fn is_pinned(self) -> bool {
        self.0 & Self::PERSISTENT != 0
    }

    /// Positionne ou retire le bit PERSISTENT sans toucher aux autres.
    pub fn set_pinned(&mut self, pinned: bool) {
        if pinned {
            self.0 |= Self::PERSISTENT;
        } else {
            self.0 &= !Self::PERSISTENT;
        }
    }
}

/// Une entree dans l'historique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Contenu (jamais vide une fois stocke)
    pub text: String,
    /// Flags (epingle, etc.)
    pub flags: EntryFlags,
    /// Type de contenu
    pub kind: EntryKind,
}

impl HistoryEntry {
    /// Cree une entree texte.
    pub fn text(text: impl Into<String>, flags: EntryFlags) -> Self {
        Self {
            text: text.into(),
            flags,
            kind: EntryKind::Text,
        }
    }

    /// Retourne true si l'entree est epinglee.
    pub fn is_pinned(&self) -> bool {
        self.flags.is_pinned()
    }

    /// Verifie si cette entree est un doublon fusionnable de `text`.
    pub fn is_text_duplicate_of(&self, text: &str) -> bool {
        self.kind == EntryKind::Text && !self.is_pinned() && self.text == text
    }

    /// Retourne un apercu tronque de la premiere ligne.
    pub fn preview(&self, max_chars: usize) -> String {
        let first_line = self.text.lines().next().unwrap_or("");
        if first_line.chars().count() <= max_chars {
            first_line.to_string()
        } else {
            let mut s: String = first_line.chars().take(max_chars.saturating_sub(3)).collect();
            s.push_str("...");
            s
        }
    }
}
