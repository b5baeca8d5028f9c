// SelVault - Recherche dans l'historique
// Filtrage par sous-chaine, insensible a la casse
//
// Recherche incrementale utilisee par le menu d'historique : les
// entrees sont filtrees a chaque caractere tape.
//
// # Algorithme
// Recherche naive par `contains` en O(n*m) sur chaque entree, apres
// passage en minuscules. Si la requete est vide, tous les indices
// sont retournes.

use crate::history::entry::HistoryEntry;

/// Retourne les indices des entrees dont le texte contient la requete.
pub fn search_entries(entries: &[HistoryEntry], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..entries.len()).collect();
    }
    let query_lower = query.to_lowercase();
    entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.text.to_lowercase().contains(&query_lower))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::entry::EntryFlags;

    fn make(text: &str) -> HistoryEntry {
        HistoryEntry::text(text, EntryFlags::empty())
    }

    #[test]
    fn test_search_empty_query() {
        let entries = vec![make("hello"), make("world")];
        assert_eq!(search_entries(&entries, ""), vec![0, 1]);
    }

    #[test]
    fn test_search_case_insensitive() {
        let entries = vec![make("Hello World"), make("foo bar"), make("ÉCOLE")];
        assert_eq!(search_entries(&entries, "hello"), vec![0]);
        assert_eq!(search_entries(&entries, "école"), vec![2]);
    }

    #[test]
    fn test_search_no_match() {
        let entries = vec![make("hello")];
        assert_eq!(search_entries(&entries, "xyz"), Vec::<usize>::new());
    }
}
