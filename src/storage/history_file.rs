// SelVault - Lecture/ecriture du fichier d'historique
// Sauvegarde et chargement complets de l'historique
//
// # Format du fichier
// ```text
// [magic]     32 octets, chaine de version completee par des NUL
// [trame]*    voir storage/format.rs
// [0]         u32 terminateur
// ```
//
// # Comportement
// - Fichier absent, trop court ou magic different : historique vide,
//   jamais une erreur bloquante au demarrage.
// - Trame tronquee : les entrees deja lues sont conservees.
// - L'ecriture est atomique (fichier temporaire + rename). Le fichier
//   temporaire ajoute `.<pid>.tmp` au nom complet, extension comprise.
// - Les trames sont ecrites dans l'ordre memoire et relues dans le meme
//   ordre, donc load(save(x)) == x.

use crate::constants::*;
use crate::error::SvResult;
use crate::history::entry::HistoryEntry;
use crate::storage::format::{self, FrameReader};
use std::fs;
use std::io::ErrorKind;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Construit l'en-tete magic de 32 octets.
fn magic_header() -> [u8; HISTORY_MAGIC_SIZE] {
    let mut magic = [0u8; HISTORY_MAGIC_SIZE];
    magic[..HISTORY_MAGIC.len()].copy_from_slice(HISTORY_MAGIC);
    magic
}

/// Serialise un historique complet (magic + trames + terminateur).
pub fn encode_history(entries: &[HistoryEntry]) -> Vec<u8> {
    let mut data = Vec::with_capacity(HISTORY_MAGIC_SIZE + entries.len() * 64);
    data.extend_from_slice(&magic_header());
    for entry in entries.iter().filter(|e| !e.text.is_empty()) {
        data.extend_from_slice(&format::encode(entry));
    }
    data.extend_from_slice(&0u32.to_le_bytes());
    data
}

/// Deserialise un historique complet. Ne retourne jamais d'erreur :
/// un contenu inexploitable donne un historique vide ou partiel.
pub fn decode_history(mut data: Vec<u8>) -> Vec<HistoryEntry> {
    if data.len() < HISTORY_MAGIC_SIZE {
        tracing::warn!("history file has no magic, assuming no history");
        return Vec::new();
    }
    if data[..HISTORY_MAGIC_SIZE] != magic_header() {
        tracing::warn!("history file magic mismatch, assuming no history");
        return Vec::new();
    }

    let frames = data.split_off(HISTORY_MAGIC_SIZE);
    let (entries, fatal) = FrameReader::new(frames).read_all();
    if let Some(e) = fatal {
        tracing::warn!(kept = entries.len(), "history file damaged: {e}");
    }
    entries
}

/// Fichier temporaire voisin de `path` : `history.dat` -> `history.dat.<pid>.tmp`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(format!(".{}.tmp", std::process::id()));
    PathBuf::from(name)
}

/// Sauvegarde l'historique sur disque.
/// Utilise une ecriture atomique (fichier temporaire + rename).
pub fn save_history(path: &Path, entries: &[HistoryEntry]) -> SvResult<()> {
    let data = encode_history(entries);

    let tmp_path = temp_path(path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&tmp_path, &data)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    tracing::debug!(entries = entries.len(), bytes = data.len(), "history saved");
    Ok(())
}

/// Charge l'historique depuis le disque.
///
/// # Errors
/// `SvError::Io` si le fichier existe mais ne peut pas etre lu.
pub fn load_history(path: &Path) -> SvResult<Vec<HistoryEntry>> {
    let data = match fs::read(path) {
        Ok(d) => d,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    Ok(decode_history(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::entry::{EntryFlags, EntryKind};
    use proptest::prelude::*;

    fn make_entries() -> Vec<HistoryEntry> {
        vec![
            HistoryEntry::text("newest", EntryFlags::empty()),
            HistoryEntry::text("pinned one", EntryFlags::pinned()),
            HistoryEntry {
                text: "raw".into(),
                flags: EntryFlags::empty(),
                kind: EntryKind::Image,
            },
        ]
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history");

        let entries = make_entries();
        save_history(&path, &entries).unwrap();
        let loaded = load_history(&path).unwrap();
        assert_eq!(loaded, entries);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_temp_name_keeps_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.dat");
        let sibling = dir.path().join("history.tmp");
        fs::write(&sibling, b"unrelated").unwrap();

        let tmp = temp_path(&path);
        let name = tmp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("history.dat."));
        assert!(name.ends_with(".tmp"));
        assert_ne!(temp_path(&dir.path().join("history.bak")), tmp);

        save_history(&path, &make_entries()).unwrap();
        assert_eq!(load_history(&path).unwrap(), make_entries());
        assert_eq!(fs::read(&sibling).unwrap(), b"unrelated");
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2, "stray files: {names:?}");
    }

    #[test]
    fn test_file_layout() {
        let data = encode_history(&[HistoryEntry::text("x", EntryFlags::empty())]);
        assert_eq!(&data[..HISTORY_MAGIC.len()], HISTORY_MAGIC);
        assert!(data[HISTORY_MAGIC.len()..HISTORY_MAGIC_SIZE].iter().all(|&b| b == 0));
        assert_eq!(data.len(), HISTORY_MAGIC_SIZE + FRAME_OVERHEAD + 1 + 4);
        assert_eq!(&data[data.len() - 4..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_load_nonexistent() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_history(&dir.path().join("missing")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_wrong_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        let mut data = encode_history(&make_entries());
        data[0..3].copy_from_slice(b"1.0");
        fs::write(&path, data).unwrap();
        assert!(load_history(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_short_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        fs::write(&path, b"SelVault").unwrap();
        assert!(load_history(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_truncated_keeps_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        let mut data = encode_history(&make_entries());
        // coupe au milieu de la derniere trame
        data.truncate(data.len() - 6);
        fs::write(&path, data).unwrap();
        let loaded = load_history(&path).unwrap();
        let texts: Vec<_> = loaded.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["newest", "pinned one"]);
    }

    #[test]
    fn test_empty_history_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        save_history(&path, &[]).unwrap();
        assert!(load_history(&path).unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn prop_load_save_identity(
            items in proptest::collection::vec((".{1,30}", any::<bool>()), 0..20)
        ) {
            let entries: Vec<_> = items
                .iter()
                .map(|(t, p)| {
                    let flags = if *p { EntryFlags::pinned() } else { EntryFlags::empty() };
                    HistoryEntry::text(t.as_str(), flags)
                })
                .collect();
            prop_assert_eq!(decode_history(encode_history(&entries)), entries);
        }
    }
}
