// SelVault - Codec des trames de l'historique
// Format binaire a prefixe de longueur, une trame par entree
//
// # Format d'une trame (entiers little-endian)
// ```text
// [len]       u32   taille totale = 4 + 20 + taille du texte
// [kind]      i16   1 = TEXT, 2 = IMAGE, autre code conserve
// [flags]     i16   0x4 = PERSISTENT, autres bits conserves
// [reserved]  16 octets a zero
// [text]      len - 24 octets, sans terminateur
// ```
//
// # Robustesse
// `FrameReader` avance sur un buffer possede et verifie chaque longueur
// avant de lire : une trame qui deborde de la fin des donnees arrete la
// lecture (on ne devine jamais ou commence la trame suivante). Une trame
// dont le texte n'a aucun prefixe UTF-8 valide est ignoree et la lecture
// continue, sa frontiere etant intacte.
//
// # Fin de flux
// Une longueur 0, ou moins de 4 octets restants, termine la lecture.

use crate::constants::*;
use crate::error::CodecError;
use crate::history::entry::{EntryFlags, EntryKind, HistoryEntry};
use crate::history::text;

/// Serialise une entree en trame binaire.
pub fn encode(entry: &HistoryEntry) -> Vec<u8> {
    let text_bytes = entry.text.as_bytes();
    let total = FRAME_OVERHEAD + text_bytes.len();

    let mut buf = Vec::with_capacity(total);
    buf.extend_from_slice(&(total as u32).to_le_bytes());
    buf.extend_from_slice(&entry.kind.to_raw().to_le_bytes());
    buf.extend_from_slice(&(entry.flags.bits() as i16).to_le_bytes());
    buf.extend_from_slice(&[0u8; FRAME_RESERVED_SIZE]);
    buf.extend_from_slice(text_bytes);
    buf
}

/// Deserialise une trame placee en debut de `data`.
/// Retourne l'entree et le nombre d'octets consommes.
///
/// # Errors
/// - `CodecError::BadLength` : longueur plus petite que le surcout fixe
/// - `CodecError::Truncated` : la trame depasse la fin de `data`
/// - `CodecError::EmptyText` : aucun octet UTF-8 valide dans le texte
pub fn decode(data: &[u8]) -> Result<(HistoryEntry, usize), CodecError> {
    let len_bytes = data.get(..FRAME_LEN_SIZE).ok_or(CodecError::Truncated {
        declared: FRAME_LEN_SIZE,
        available: data.len(),
    })?;
    let declared = read_u32(len_bytes);
    let total = declared as usize;
    if total < FRAME_OVERHEAD {
        return Err(CodecError::BadLength(declared));
    }

    let frame = data.get(..total).ok_or(CodecError::Truncated {
        declared: total,
        available: data.len(),
    })?;

    let header = &frame[FRAME_LEN_SIZE..FRAME_OVERHEAD];
    let kind = EntryKind::from_raw(read_i16(&header[0..2]));
    let flags = EntryFlags::from_bits(read_i16(&header[2..4]) as u16);
    // header[4..20] : reserve, ignore

    let text = text::validate_owned(&frame[FRAME_OVERHEAD..]).map_err(|_| CodecError::EmptyText)?;

    Ok((HistoryEntry { text, flags, kind }, total))
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(raw)
}

fn read_i16(bytes: &[u8]) -> i16 {
    let mut raw = [0u8; 2];
    raw.copy_from_slice(&bytes[..2]);
    i16::from_le_bytes(raw)
}

/// Lecteur sequentiel de trames sur un buffer possede.
pub struct FrameReader {
    data: Vec<u8>,
    pos: usize,
    done: bool,
}

impl FrameReader {
    /// Cree un lecteur sur les octets situes apres l'en-tete magic.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, pos: 0, done: false }
    }

    /// Lit toutes les trames restantes, en ignorant les trames vides.
    /// Retourne les entrees lues et l'erreur fatale eventuelle.
    pub fn read_all(mut self) -> (Vec<HistoryEntry>, Option<CodecError>) {
        let mut entries = Vec::new();
        let mut fatal = None;
        while let Some(item) = self.next() {
            match item {
                Ok(entry) => entries.push(entry),
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(offset = self.pos, "dropping history entry: {e}");
                }
                Err(e) => fatal = Some(e),
            }
        }
        (entries, fatal)
    }
}

impl Iterator for FrameReader {
    type Item = Result<HistoryEntry, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let rest = &self.data[self.pos..];
        if rest.len() < FRAME_LEN_SIZE || read_u32(rest) == 0 {
            self.done = true;
            return None;
        }

        // Longueur deja validee par decode, y compris pour EmptyText
        let declared = read_u32(rest) as usize;
        match decode(rest) {
            Ok((entry, used)) => {
                self.pos += used;
                Some(Ok(entry))
            }
            Err(CodecError::EmptyText) => {
                self.pos += declared;
                Some(Err(CodecError::EmptyText))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
