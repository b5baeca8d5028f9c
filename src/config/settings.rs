// SelVault - Structure de configuration et valeurs par defaut
//
// Ce module definit la structure `Settings` qui centralise les
// preferences lues par le coeur : suivi des tampons, filtrage,
// restauration, synchronisation, persistance et scrutation.
//
// # Chargement
// `Settings::load(path)` lit le fichier de configuration et applique
// les valeurs hors section puis celles de la section [rc]. Les valeurs
// manquantes conservent leur defaut, les valeurs hors bornes sont
// clampees, les valeurs illisibles sont ignorees avec un avertissement.
//
// # Fichier par defaut
// `Settings::save_default(path)` genere un fichier de configuration
// commente avec toutes les options disponibles et leurs valeurs.
//
// # Chemins
// `AppPaths::discover()` place l'historique dans le repertoire de donnees
// et la configuration dans le repertoire de configuration de
// l'utilisateur (XDG sous Linux).

use crate::config::parser::{self, ParsedConfig, GENERAL_SECTION};
use crate::constants::*;
use directories::BaseDirs;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Preferences de l'application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Interrupteur general du suivi des tampons
    pub enabled: bool,
    pub history_limit: usize,
    /// Ignore les textes composes uniquement d'espaces
    pub ignore_whiteonly: bool,
    pub track_primary: bool,
    pub track_clipboard: bool,
    /// Re-ecrit le dernier texte quand un tampon se vide
    pub restore_empty: bool,
    /// Aligne PRIMARY et CLIPBOARD sur le dernier texte accepte
    pub synchronize: bool,
    pub save_history: bool,
    pub poll_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            history_limit: DEFAULT_HISTORY_LIMIT,
            ignore_whiteonly: false,
            track_primary: false,
            track_clipboard: true,
            restore_empty: true,
            synchronize: false,
            save_history: true,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Settings {
    /// Charge la configuration depuis un fichier. Utilise les defauts pour les valeurs manquantes.
    pub fn load(path: &Path) -> Self {
        let mut settings = Settings::default();
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults: {e}");
                return settings;
            }
        };

        let config = parser::parse_config(&text);
        // Les cles hors section sont appliquees avant [rc], qui a le dernier mot
        for section in [GENERAL_SECTION, CONFIG_SECTION] {
            if let Some(values) = config.get(section) {
                settings.apply_section(values);
            }
        }
        settings
    }

    /// Applique les valeurs d'une section sur les parametres.
    fn apply_section(&mut self, values: &HashMap<String, String>) {
        let flags: [(&str, &mut bool); 7] = [
            ("enabled", &mut self.enabled),
            ("ignore_whiteonly", &mut self.ignore_whiteonly),
            ("track_primary_selection", &mut self.track_primary),
            ("track_clipboard_selection", &mut self.track_clipboard),
            ("restore_empty", &mut self.restore_empty),
            ("synchronize", &mut self.synchronize),
            ("save_history", &mut self.save_history),
        ];
        for (key, slot) in flags {
            if let Some(raw) = values.get(key) {
                match parser::parse_bool(raw) {
                    Some(v) => *slot = v,
                    None => warn_invalid(key, raw),
                }
            }
        }

        if let Some(raw) = values.get("history_limit") {
            match parser::parse_usize(raw) {
                Some(v) => self.history_limit = v.clamp(MIN_HISTORY_LIMIT, MAX_HISTORY_LIMIT),
                None => warn_invalid("history_limit", raw),
            }
        }
        if let Some(raw) = values.get("poll_interval_ms") {
            match parser::parse_u64(raw) {
                Some(v) => self.poll_interval_ms = v.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS),
                None => warn_invalid("poll_interval_ms", raw),
            }
        }
    }

    /// Convertit les parametres en configuration serialisable.
    pub fn to_parsed(&self) -> ParsedConfig {
        let bool_str = |b: bool| (if b { "true" } else { "false" }).to_string();
        let mut rc = HashMap::new();
        rc.insert("enabled".into(), bool_str(self.enabled));
        rc.insert("history_limit".into(), self.history_limit.to_string());
        rc.insert("ignore_whiteonly".into(), bool_str(self.ignore_whiteonly));
        rc.insert("track_primary_selection".into(), bool_str(self.track_primary));
        rc.insert("track_clipboard_selection".into(), bool_str(self.track_clipboard));
        rc.insert("restore_empty".into(), bool_str(self.restore_empty));
        rc.insert("synchronize".into(), bool_str(self.synchronize));
        rc.insert("save_history".into(), bool_str(self.save_history));
        rc.insert("poll_interval_ms".into(), self.poll_interval_ms.to_string());

        let mut config = ParsedConfig::new();
        config.insert(CONFIG_SECTION.to_string(), rc);
        config
    }

    /// Sauvegarde la configuration par defaut, avec commentaires.
    pub fn save_default(path: &Path) -> std::io::Result<()> {
        let content = default_config_text();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }

    /// Intervalle de scrutation des tampons.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Retourne true si au moins un tampon est suivi.
    pub fn tracks_any(&self) -> bool {
        self.enabled && (self.track_primary || self.track_clipboard)
    }
}

fn warn_invalid(key: &str, raw: &str) {
    tracing::warn!(key, value = raw, "ignoring invalid config value");
}

/// Chemins des fichiers de l'application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub history: PathBuf,
    pub config: PathBuf,
}

impl AppPaths {
    /// Determine les chemins standards de l'utilisateur.
    /// Sans repertoire personnel, retombe sur le repertoire courant.
    pub fn discover() -> Self {
        match BaseDirs::new() {
            Some(dirs) => Self {
                history: dirs.data_dir().join(APP_DIR_NAME).join(HISTORY_FILENAME),
                config: dirs.config_dir().join(APP_DIR_NAME).join(CONFIG_FILENAME),
            },
            None => {
                tracing::warn!("no home directory, using the current directory");
                let base = PathBuf::from(".").join(APP_DIR_NAME);
                Self {
                    history: base.join(HISTORY_FILENAME),
                    config: base.join(CONFIG_FILENAME),
                }
            }
        }
    }

    /// Remplace les chemins fournis explicitement.
    pub fn with_overrides(mut self, config: Option<PathBuf>, history: Option<PathBuf>) -> Self {
        if let Some(c) = config {
            self.config = c;
        }
        if let Some(h) = history {
            self.history = h;
        }
        self
    }
}

/// Texte par defaut du fichier de configuration.
fn default_config_text() -> String {
    let header = "\
# SelVault Configuration
#
# enabled                    suivi des tampons actif
# history_limit              1..1000 entrees (les epinglees en plus)
# ignore_whiteonly           ignore les textes composes d'espaces
# track_primary_selection    suit la selection a la souris (PRIMARY)
# track_clipboard_selection  suit le presse-papiers (CLIPBOARD)
# restore_empty              re-ecrit le dernier texte si le tampon se vide
# synchronize                aligne PRIMARY et CLIPBOARD
# save_history               sauvegarde l'historique sur disque
# poll_interval_ms           50..10000

";
    format!("{header}{}", parser::serialize_config(&Settings::default().to_parsed()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_text(text: &str) -> Settings {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, text).unwrap();
        Settings::load(&path)
    }

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.enabled);
        assert_eq!(s.history_limit, 25);
        assert!(!s.track_primary);
        assert!(s.track_clipboard);
        assert!(s.restore_empty);
        assert!(!s.synchronize);
        assert!(s.save_history);
        assert_eq!(s.poll_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load(&dir.path().join("none.rc")), Settings::default());
    }

    #[test]
    fn test_load_rc_section() {
        let s = load_text(
            "[rc]\nhistory_limit = 40\ntrack_primary_selection = yes\nsynchronize = on\nsave_history = false\n",
        );
        assert_eq!(s.history_limit, 40);
        assert!(s.track_primary);
        assert!(s.synchronize);
        assert!(!s.save_history);
    }

    #[test]
    fn test_clamping_and_invalid_values() {
        let s = load_text("[rc]\nhistory_limit = 5000\npoll_interval_ms = 1\nrestore_empty = maybe\n");
        assert_eq!(s.history_limit, MAX_HISTORY_LIMIT);
        assert_eq!(s.poll_interval_ms, MIN_POLL_INTERVAL_MS);
        assert!(s.restore_empty);
        let s = load_text("[rc]\nhistory_limit = 0\n");
        assert_eq!(s.history_limit, MIN_HISTORY_LIMIT);
    }

    #[test]
    fn test_rc_overrides_general() {
        let s = load_text("synchronize = true\nhistory_limit = 7\n[rc]\nsynchronize = false\n");
        assert!(!s.synchronize);
        assert_eq!(s.history_limit, 7);
    }

    #[test]
    fn test_default_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join(CONFIG_FILENAME);
        Settings::save_default(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# SelVault"));
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_tracks_any() {
        let mut s = Settings::default();
        assert!(s.tracks_any());
        s.enabled = false;
        assert!(!s.tracks_any());
    }

    #[test]
    fn test_path_overrides() {
        let paths = AppPaths::discover().with_overrides(Some("/tmp/a.rc".into()), None);
        assert_eq!(paths.config, PathBuf::from("/tmp/a.rc"));
        assert!(paths.history.ends_with(Path::new(APP_DIR_NAME).join(HISTORY_FILENAME)));
    }
}
