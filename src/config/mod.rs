// SelVault - Module config
// Lecture/ecriture de la configuration utilisateur
//
// Ce module gere les preferences de SelVault via un fichier texte au
// format cle-valeur avec sections, situe dans
// `$XDG_CONFIG_HOME/selvault/selvault.rc`.
//
// # Sous-modules
// - `parser`   : parseur generique de fichiers cle-valeur avec sections,
//                commentaires et guillemets. Supporte la serialisation
//                et la deserialisation bidirectionnelle.
// - `settings` : structure Settings (suivi des tampons, historique,
//                persistance) avec valeurs par defaut et bornes, et
//                chemins standards des fichiers.
//
// # Utilisation
// ```rust,ignore
// let settings = Settings::load(&paths.config);
// // Les valeurs manquantes utilisent les defauts
// ```

/// Parseur de fichiers de configuration au format cle-valeur avec sections.
pub mod parser;
/// Structure de configuration et valeurs par defaut de l'application.
pub mod settings;
