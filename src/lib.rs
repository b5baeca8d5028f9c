// SelVault - Arbre de modules (crate library)
//
// Ce fichier constitue le point d'entree de la crate library de SelVault.
// Il expose tous les modules pour le binaire et pour les tests.
//
// # Modules
// - `app`       : orchestrateur principal, boucle de scrutation
// - `cli`       : arguments de la ligne de commande et commandes hors ligne
// - `clipboard` : suivi des tampons PRIMARY et CLIPBOARD
// - `config`    : lecture/ecriture de la configuration utilisateur
// - `constants` : constantes globales (tailles, delais, noms de fichiers)
// - `error`     : types d'erreur centralises (SvError, SvResult)
// - `history`   : historique en memoire (liste ordonnee, recherche, store)
// - `logging`   : initialisation de tracing
// - `storage`   : persistance binaire et export texte

/// Orchestrateur principal de l'application.
pub mod app;
/// Ligne de commande.
pub mod cli;
/// Suivi des tampons de selection.
pub mod clipboard;
/// Configuration utilisateur et parseur de fichiers.
pub mod config;
/// Constantes globales de l'application.
pub mod constants;
/// Types d'erreur centralises.
pub mod error;
/// Gestion de l'historique en memoire.
pub mod history;
/// Journalisation.
pub mod logging;
/// Persistance sur disque.
pub mod storage;
