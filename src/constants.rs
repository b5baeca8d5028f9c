// SelVault - Constantes globales
//
// Ce module centralise les constantes de l'application :
// - Format du fichier d'historique (magic, tailles de trame)
// - Valeurs par defaut de la configuration
// - Intervalles du moniteur de selections
// - Noms de fichiers et repertoires
//
// Les constantes sont utilisees par les modules storage, history,
// clipboard et config pour garantir la coherence des valeurs.

/// Taille fixe de l'en-tete magic du fichier d'historique (octets)
pub const HISTORY_MAGIC_SIZE: usize = 32;

/// Chaine magic identifiant la version du format (completee par des NUL)
pub const HISTORY_MAGIC: &[u8] = b"SelVaultHistory/1";

/// Taille du prefixe de longueur d'une trame (u32)
pub const FRAME_LEN_SIZE: usize = 4;

/// Taille de l'en-tete fixe d'une trame : kind i16 + flags i16 + reserve 16 octets
pub const FRAME_HEADER_SIZE: usize = 2 + 2 + FRAME_RESERVED_SIZE;

/// Octets reserves dans l'en-tete d'une trame
pub const FRAME_RESERVED_SIZE: usize = 16;

/// Surcout total d'une trame (prefixe + en-tete)
pub const FRAME_OVERHEAD: usize = FRAME_LEN_SIZE + FRAME_HEADER_SIZE;

/// Nombre max d'entrees par defaut
pub const DEFAULT_HISTORY_LIMIT: usize = 25;

/// Bornes de la limite d'historique
pub const MIN_HISTORY_LIMIT: usize = 1;
pub const MAX_HISTORY_LIMIT: usize = 1000;

/// Intervalle de scrutation par defaut (ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Bornes de l'intervalle de scrutation (ms)
pub const MIN_POLL_INTERVAL_MS: u64 = 50;
pub const MAX_POLL_INTERVAL_MS: u64 = 10_000;

/// Delai de re-verification pendant une selection a la souris (ms)
pub const DEFERRED_CHECK_INTERVAL_MS: u64 = 300;

/// Separateur entre deux entrees dans l'export texte
pub const EXPORT_SEPARATOR: &str = "\n\n\
    ----------------------------------------\
    ----------------------------------------\
    \n\n";

/// Nom du dossier application dans les repertoires XDG
pub const APP_DIR_NAME: &str = "selvault";

/// Nom du fichier d'historique binaire
pub const HISTORY_FILENAME: &str = "history";

/// Nom du fichier de configuration
pub const CONFIG_FILENAME: &str = "selvault.rc";

/// Section des preferences dans le fichier de configuration
pub const CONFIG_SECTION: &str = "rc";
