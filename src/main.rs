// SelVault - Point d'entree
// Gestionnaire d'historique des selections PRIMARY et CLIPBOARD
//
// Ce binaire surveille les tampons de selection et maintient un
// historique persistant, ou execute une commande ponctuelle sur cet
// historique (liste, recherche, export, effacement, epinglage).
//
// # Configuration
// Le fichier $XDG_CONFIG_HOME/selvault/selvault.rc est cree
// automatiquement au premier lancement avec les valeurs par defaut.

use clap::Parser;
use selvault::cli::{self, Cli, Command};
use selvault::config::settings::{AppPaths, Settings};
use selvault::error::SvResult;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = selvault::logging::init(cli.verbose) {
        eprintln!("selvault: {e}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("selvault: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> SvResult<()> {
    let paths = cli.paths();
    if !paths.config.exists() {
        match Settings::save_default(&paths.config) {
            Ok(()) => tracing::info!(path = %paths.config.display(), "default config written"),
            Err(e) => tracing::warn!("cannot write default config: {e}"),
        }
    }
    let settings = Settings::load(&paths.config);

    match &cli.command {
        Command::Run => watch(settings, paths),
        other => {
            let stdout = std::io::stdout();
            cli::execute(other, &settings, &paths, &mut stdout.lock())
        }
    }
}

#[cfg(target_os = "linux")]
fn watch(settings: Settings, paths: AppPaths) -> SvResult<()> {
    use selvault::app::App;
    use selvault::clipboard::system::SystemSelections;

    let mut app = App::start(SystemSelections::new(), settings, paths.history);
    if let Err(e) = selvault::app::install_shutdown_signals(app.shutdown_handle()) {
        tracing::warn!("{e}, history is only saved on mutation");
    }
    app.run();
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn watch(_settings: Settings, _paths: AppPaths) -> SvResult<()> {
    Err(selvault::error::SvError::Selection(
        "selection tracking is only available on Linux".into(),
    ))
}
