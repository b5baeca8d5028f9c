// SelVault - Types d'erreur centralises
//
// Ce module definit les erreurs de l'application et le type alias
// `SvResult<T>` utilise dans toute la crate.
//
// # Categories d'erreurs
// - `CodecError`      : trame binaire malformee (entree ignoree)
// - `ValidationError` : texte UTF-8 invalide (tronque ou ignore)
// - `SvError::Io`     : echec d'ouverture/lecture/ecriture de fichier
// - `SvError::Config` : valeur de configuration inutilisable
// - `SvError::Selection` : echec d'acces a un tampon de selection
//
// Aucune de ces erreurs n'est fatale : l'appelant journalise et retombe
// sur un comportement sur (historique vide, entree ignoree, tampon intact).
// Le `Display` de `SvError` prefixe chaque variante entre crochets pour
// faciliter le diagnostic dans les logs.

use thiserror::Error;

/// Trame de l'historique binaire invalide.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Longueur declaree inferieure au surcout fixe d'une trame
    #[error("frame length {0} is smaller than the frame header")]
    BadLength(u32),
    /// La trame depasse la fin des donnees disponibles
    #[error("frame declares {declared} bytes but only {available} remain")]
    Truncated { declared: usize, available: usize },
    /// Aucun octet UTF-8 valide dans le texte de la trame
    #[error("frame text has no valid UTF-8 prefix")]
    EmptyText,
}

impl CodecError {
    /// Indique si la lecture peut continuer apres cette erreur.
    /// Seule une trame vide garde une frontiere de trame fiable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CodecError::EmptyText)
    }
}

/// Texte qui n'est pas de l'UTF-8 valide.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Aucun octet valide : le texte doit etre ignore
    #[error("text is not valid UTF-8 (no valid prefix in {len} bytes)")]
    NoValidPrefix { len: usize },
}

/// Enumeration de toutes les erreurs possibles dans SelVault.
#[derive(Debug, Error)]
pub enum SvError {
    /// Erreur de lecture/ecriture disque
    #[error("[Io] {0}")]
    Io(#[from] std::io::Error),
    /// Trame binaire invalide
    #[error("[Codec] {0}")]
    Codec(#[from] CodecError),
    /// Texte invalide
    #[error("[Validation] {0}")]
    Validation(#[from] ValidationError),
    /// Erreur de configuration
    #[error("[Config] {0}")]
    Config(String),
    /// Erreur d'acces a un tampon de selection
    #[error("[Selection] {0}")]
    Selection(String),
}

/// Type Result specialise pour SelVault.
pub type SvResult<T> = Result<T, SvError>;
