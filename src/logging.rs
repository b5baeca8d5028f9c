// SelVault - Journalisation
//
// Initialise `tracing-subscriber` une seule fois, depuis le binaire.
// Le filtre par defaut est `selvault=info` ; `RUST_LOG` le remplace, et
// `-v`/`-vv` sur la ligne de commande passent en debug/trace.
//
// # Niveaux
// - `warn`  : anomalies recuperables (UTF-8 tronque, magic inconnu,
//             sauvegarde echouee)
// - `info`  : chargement, sauvegarde, export, effacement
// - `debug` : decisions de la machine a etats (tailles seulement, jamais
//             le contenu des tampons)

use crate::error::{SvError, SvResult};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Niveau de journalisation selon le nombre de `-v`.
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Filtre applique quand `RUST_LOG` n'est pas defini.
pub fn default_filter(verbosity: u8) -> String {
    let level = level_from_verbosity(verbosity).to_string().to_lowercase();
    format!("{}={level}", env!("CARGO_CRATE_NAME"))
}

/// Installe le subscriber global (sortie sur stderr).
///
/// # Errors
/// `SvError::Config` si le filtre est invalide ou si un subscriber est
/// deja installe.
pub fn init(verbosity: u8) -> SvResult<()> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if verbosity == 0 && !directives.trim().is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(default_filter(verbosity)),
    }
    .map_err(|e| SvError::Config(format!("invalid log filter: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| SvError::Config(format!("cannot install logger: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(level_from_verbosity(0), Level::INFO);
        assert_eq!(level_from_verbosity(1), Level::DEBUG);
        assert_eq!(level_from_verbosity(5), Level::TRACE);
    }

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(0), "selvault=info");
        assert_eq!(default_filter(2), "selvault=trace");
        assert!(EnvFilter::try_new(default_filter(1)).is_ok());
    }
}
