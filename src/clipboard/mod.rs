// SelVault - Module clipboard
// Suivi des tampons de selection PRIMARY et CLIPBOARD
//
// Ce module fournit la machine a etats qui decide du sort de chaque
// changement observe dans un tampon de selection :
// - `backend`     : trait SelectionBackend (lecture/ecriture abstraite)
// - `tracker`     : etat d'un tampon et regles Check/SetExternal/Reset
// - `coordinator` : politique commune aux deux tampons, ajout a
//                   l'historique et synchronisation
// - `system`      : backend reel au-dessus d'arboard (Linux)
//
// Architecture :
// Le coeur ne depend que du trait ; les tests utilisent des tampons en
// memoire. Aucune fonction ne bloque : la re-verification pendant une
// selection a la souris est un re-armement de timer cote application.
//
// # Securite
// Le contenu des tampons n'est jamais journalise, seulement sa taille.

/// Acces abstrait aux tampons de selection.
pub mod backend;
/// Coordination des deux tampons et de l'historique.
pub mod coordinator;
/// Backend systeme base sur arboard.
#[cfg(target_os = "linux")]
pub mod system;
/// Machine a etats d'un tampon de selection.
pub mod tracker;
