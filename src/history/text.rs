// SelVault - Validation UTF-8
//
// Le texte lu depuis le disque ou depuis un tampon de selection peut
// contenir des octets invalides. On conserve le plus long prefixe valide
// et on signale la troncature ; un prefixe vide rend le texte inutilisable.

use crate::error::ValidationError;
use std::borrow::Cow;

/// Texte valide extrait d'octets bruts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidText<'a> {
    pub text: Cow<'a, str>,
    /// Nombre d'octets ecartes apres le premier octet invalide
    pub dropped: usize,
}

impl ValidText<'_> {
    /// Retourne true si des octets ont ete ecartes.
    pub fn was_truncated(&self) -> bool {
        self.dropped > 0
    }
}

/// Extrait le prefixe UTF-8 valide de `bytes`.
///
/// # Errors
/// `ValidationError::NoValidPrefix` si aucun octet n'est exploitable.
pub fn valid_prefix(bytes: &[u8]) -> Result<ValidText<'_>, ValidationError> {
    let valid = match std::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
    };
    if valid.is_empty() {
        return Err(ValidationError::NoValidPrefix { len: bytes.len() });
    }
    Ok(ValidText {
        dropped: bytes.len() - valid.len(),
        text: Cow::Borrowed(valid),
    })
}

/// Version possedee de `valid_prefix`, journalise la troncature.
pub fn validate_owned(bytes: &[u8]) -> Result<String, ValidationError> {
    let valid = valid_prefix(bytes)?;
    if valid.was_truncated() {
        tracing::warn!(
            kept = valid.text.len(),
            dropped = valid.dropped,
            "truncating invalid UTF-8 text"
        );
    }
    Ok(valid.text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_text_untouched() {
        let v = valid_prefix("héllo".as_bytes()).unwrap();
        assert_eq!(v.text, "héllo");
        assert!(!v.was_truncated());
    }

    #[test]
    fn test_truncated_at_invalid_byte() {
        let v = valid_prefix(b"abc\xffdef").unwrap();
        assert_eq!(v.text, "abc");
        assert_eq!(v.dropped, 4);
    }

    #[test]
    fn test_no_valid_prefix() {
        assert_eq!(
            valid_prefix(b"\xff\xfe"),
            Err(ValidationError::NoValidPrefix { len: 2 })
        );
        assert!(valid_prefix(b"").is_err());
    }

    #[test]
    fn test_validate_owned() {
        assert_eq!(validate_owned(b"ok\xc3").unwrap(), "ok");
        assert!(validate_owned(b"\x80").is_err());
    }
}
