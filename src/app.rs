// SelVault - Orchestrateur principal
// Connecte les composants : configuration, historique, tampons de selection
// Gere la boucle de scrutation et le cycle de vie de l'application
//
// # Architecture
// L'application est mono-thread : une seule boucle appelle le
// coordinateur a intervalle fixe. L'historique est partage via un Arc
// pour les commandes qui le consultent pendant que la boucle tourne.
//
// # Cycle de vie
// 1. `App::start()` : chargement de l'historique, restauration des
//    tampons vides
// 2. `App::run()`   : boucle tick/sommeil jusqu'a la demande d'arret
// 3. fin de `run()` : sauvegarde finale si la persistance est active
//
// Sous Unix, `install_shutdown_signals` relie SIGINT et SIGTERM au drapeau
// d'arret : le gestionnaire ne fait que lever le drapeau, la boucle sort
// a son prochain reveil.
//
// # Re-armement differe
// Quand une selection a la souris est en cours, le prochain tick est
// avance a 300 ms au lieu de l'intervalle normal. Il n'y a pas de timer
// separe a annuler : sans nouveau report, l'intervalle normal reprend.

use crate::clipboard::backend::SelectionBackend;
use crate::clipboard::coordinator::{Coordinator, TickReport};
use crate::config::settings::Settings;
use crate::constants::DEFERRED_CHECK_INTERVAL_MS;
#[cfg(unix)]
use crate::error::{SvError, SvResult};
use crate::history::store::HistoryStore;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
#[cfg(unix)]
use std::sync::OnceLock;
use std::time::Duration;

#[cfg(unix)]
static SHUTDOWN_FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();

#[cfg(unix)]
extern "C" fn on_terminate(_: libc::c_int) {
    if let Some(flag) = SHUTDOWN_FLAG.get() {
        flag.store(true, Ordering::SeqCst);
    }
}

/// Leve `flag` a la reception de SIGINT ou SIGTERM.
/// Un seul drapeau par processus : les appels suivants gardent le premier.
///
/// # Errors
/// `SvError::Config` si un gestionnaire ne peut pas etre installe.
#[cfg(unix)]
pub fn install_shutdown_signals(flag: Arc<AtomicBool>) -> SvResult<()> {
    if SHUTDOWN_FLAG.set(flag).is_err() {
        tracing::debug!("shutdown signals already installed");
        return Ok(());
    }
    for signal in [libc::SIGINT, libc::SIGTERM] {
        let previous = unsafe { libc::signal(signal, on_terminate as libc::sighandler_t) };
        if previous == libc::SIG_ERR {
            return Err(SvError::Config(format!("cannot install handler for signal {signal}")));
        }
    }
    Ok(())
}

/// Application principale SelVault.
pub struct App<B: SelectionBackend> {
    coordinator: Coordinator<B>,
    shutdown: Arc<AtomicBool>,
}

impl<B: SelectionBackend> App<B> {
    /// Charge l'historique et prepare le coordinateur.
    pub fn start(backend: B, settings: Settings, history_path: PathBuf) -> Self {
        let store = Arc::new(HistoryStore::new(history_path, &settings));
        store.load();

        let mut coordinator = Coordinator::new(backend, store, settings);
        coordinator.on_accepted(|kind, text| {
            tracing::debug!(buffer = %kind, bytes = text.len(), "new history entry");
        });
        coordinator.restore_from_history();

        Self {
            coordinator,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Drapeau d'arret partage : la boucle s'arrete au prochain reveil.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn coordinator(&self) -> &Coordinator<B> {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut Coordinator<B> {
        &mut self.coordinator
    }

    /// Delai avant le prochain tick.
    pub fn next_delay(&self, report: &TickReport) -> Duration {
        let poll = self.coordinator.settings().poll_interval();
        if report.wants_rearm() {
            poll.min(Duration::from_millis(DEFERRED_CHECK_INTERVAL_MS))
        } else {
            poll
        }
    }

    /// Un tick, retourne le delai avant le suivant.
    pub fn step(&mut self) -> Duration {
        let report = self.coordinator.tick();
        self.next_delay(&report)
    }

    /// Boucle principale, jusqu'a la levee du drapeau d'arret.
    pub fn run(&mut self) {
        if !self.coordinator.settings().tracks_any() {
            tracing::info!("no selection tracked, nothing to do");
            return;
        }
        tracing::info!(
            interval_ms = self.coordinator.settings().poll_interval_ms,
            entries = self.coordinator.store().len(),
            "watching selections"
        );

        while !self.shutdown.load(Ordering::Relaxed) {
            let delay = self.step();
            std::thread::sleep(delay);
        }

        if self.coordinator.settings().save_history {
            if let Err(e) = self.coordinator.store().save() {
                tracing::warn!("final history save failed: {e}");
            }
        }
        tracing::info!("stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::backend::fake::FakeSelections;
    use crate::clipboard::backend::SelectionKind;
    use crate::history::entry::EntryFlags;

    fn settings() -> Settings {
        Settings {
            track_primary: true,
            save_history: true,
            poll_interval_ms: 500,
            ..Settings::default()
        }
    }

    #[test]
    fn test_start_loads_and_restores() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        let seed = HistoryStore::new(&path, &settings());
        seed.add_text_item("older", EntryFlags::empty());
        seed.add_text_item("newest", EntryFlags::empty());

        let app = App::start(FakeSelections::default(), settings(), path);
        assert_eq!(app.coordinator().store().len(), 2);
        assert_eq!(app.coordinator().backend().text(SelectionKind::Clipboard), Some("newest"));
        assert_eq!(app.coordinator().backend().text(SelectionKind::Primary), Some("newest"));
    }

    #[test]
    fn test_deferred_step_rearms_quickly() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::start(FakeSelections::default(), settings(), dir.path().join("history"));
        app.coordinator_mut().backend_mut().held = true;
        assert_eq!(app.step(), Duration::from_millis(DEFERRED_CHECK_INTERVAL_MS));
        app.coordinator_mut().backend_mut().held = false;
        assert_eq!(app.step(), Duration::from_millis(500));
    }

    #[test]
    fn test_rearm_never_slower_than_poll() {
        let dir = tempfile::tempdir().unwrap();
        let fast = Settings {
            poll_interval_ms: 100,
            ..settings()
        };
        let mut app = App::start(FakeSelections::default(), fast, dir.path().join("history"));
        app.coordinator_mut().backend_mut().held = true;
        assert_eq!(app.step(), Duration::from_millis(100));
    }

    #[test]
    fn test_run_stops_on_shutdown_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        let mut app = App::start(FakeSelections::default(), settings(), path.clone());
        app.shutdown_handle().store(true, Ordering::Relaxed);
        app.run();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_terminate_signal_raises_shutdown_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        let mut app = App::start(FakeSelections::default(), settings(), path.clone());
        install_shutdown_signals(app.shutdown_handle()).unwrap();
        // second appel ignore
        install_shutdown_signals(Arc::new(AtomicBool::new(false))).unwrap();

        assert_eq!(unsafe { libc::raise(libc::SIGTERM) }, 0);
        assert!(app.shutdown_handle().load(Ordering::SeqCst));
        app.run();
        assert!(path.exists());
    }

    #[test]
    fn test_run_returns_when_nothing_tracked() {
        let dir = tempfile::tempdir().unwrap();
        let off = Settings {
            enabled: false,
            ..settings()
        };
        let mut app = App::start(FakeSelections::default(), off, dir.path().join("history"));
        app.run();
        assert!(app.coordinator().store().is_empty());
    }
}
