// SelVault - Module history
// Gestion de l'historique des selections en memoire
//
// Ce module gere l'historique des textes captures depuis les tampons de
// selection. Il est independant de la plateforme.
//
// # Sous-modules
// - `entry`  : structure HistoryEntry avec type, flags et texte
// - `text`   : extraction du prefixe UTF-8 valide d'octets bruts
// - `ring`   : liste ordonnee HistoryRing avec deduplication, epinglage
//              et troncature
// - `search` : recherche incrementale insensible a la casse
// - `store`  : HistoryStore, enveloppe synchronisee avec persistance
//
// # Architecture
// L'historique utilise un Vec<HistoryEntry>, plus recent en tete. Les
// entrees les plus anciennes (non epinglees) sont supprimees quand la
// limite est depassee. Un flag `dirty` evite les sauvegardes inutiles.

/// Structure de donnees d'une entree de l'historique.
pub mod entry;
/// Liste ordonnee avec deduplication et epinglage.
pub mod ring;
/// Recherche incrementale insensible a la casse.
pub mod search;
/// Historique partage avec persistance.
pub mod store;
/// Validation UTF-8 des textes.
pub mod text;
