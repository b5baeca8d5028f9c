// SelVault - Module storage
// Persistance de l'historique sur disque
//
// Ce module gere la sauvegarde et le chargement de l'historique dans un
// fichier binaire, ainsi que son export en texte brut.
//
// # Sous-modules
// - `format`       : codec d'une trame (prefixe de longueur, en-tete fixe)
// - `history_file` : fichier complet (magic, trames, terminateur) avec
//                    ecriture atomique (temp+rename)
// - `export`       : export texte lisible, entrees separees par une regle
//
// # Format du fichier history
// ```text
// [MAGIC 32B][len u32|kind i16|flags i16|reserved 16B|text]*[0 u32]
// ```

/// Codec binaire d'une entree de l'historique.
pub mod format;
/// Lecture/ecriture du fichier d'historique.
pub mod history_file;
/// Export texte de l'historique.
pub mod export;
