// SelVault - Parseur format cle-valeur
// Format simple : sections [nom], cle = valeur, commentaires #
//
// Le fichier de preferences est un fichier texte minimaliste, lu sans
// serde ni toml.
//
// # Format supporte
// - Sections : `[section_name]`
// - Cle-valeur : `key = value`
// - Guillemets : `key = "value with spaces"`
// - Commentaires : `# ligne entiere` ou `key = value # inline`
// - Valeurs sans section sont affectees a la section "general"
//
// # Serialisation
// `serialize_config` produit un fichier deterministe (sections et cles
// triees alphabetiquement). Les valeurs avec espaces sont auto-quotees.

use std::collections::HashMap;

/// Resultat du parsing : sections contenant des paires cle-valeur.
pub type ParsedConfig = HashMap<String, HashMap<String, String>>;

/// Section des cles ecrites avant tout en-tete `[nom]`.
pub const GENERAL_SECTION: &str = "general";

/// Parse un fichier de configuration au format cle-valeur avec sections.
///
/// Format supporte :
/// - Sections : `[section_name]`
/// - Cle-valeur : `key = value` ou `key = "value with spaces"`
/// - Commentaires : lignes commencant par `#`
pub fn parse_config(text: &str) -> ParsedConfig {
    let mut config = ParsedConfig::new();
    let mut current_section = String::from(GENERAL_SECTION);

    for line in text.lines() {
        let trimmed = line.trim();

        // Ignorer les lignes vides et commentaires
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Detection de section
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            current_section = trimmed[1..trimmed.len() - 1].trim().to_string();
            continue;
        }

        // Parsing cle = valeur
        if let Some(eq_pos) = trimmed.find('=') {
            let key = trimmed[..eq_pos].trim().to_string();
            let raw_value = trimmed[eq_pos + 1..].trim();

            // Supprimer les commentaires inline (apres #, mais pas dans les strings)
            let value = strip_inline_comment(raw_value);
            let value = strip_quotes(&value);

            config
                .entry(current_section.clone())
                .or_default()
                .insert(key, value);
        }
    }

    config
}

/// Supprime les commentaires inline (apres #) en respectant les guillemets.
fn strip_inline_comment(s: &str) -> String {
    let mut in_quotes = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes => return s[..i].trim().to_string(),
            _ => {}
        }
    }
    s.to_string()
}

/// Supprime les guillemets autour d'une valeur.
fn strip_quotes(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Serialise une configuration en texte.
pub fn serialize_config(config: &ParsedConfig) -> String {
    let mut out = String::new();
    // Trier les sections pour un resultat deterministe
    let mut sections: Vec<_> = config.keys().collect();
    sections.sort();

    for section in sections {
        out.push_str(&format!("[{}]\n", section));
        if let Some(pairs) = config.get(section) {
            let mut keys: Vec<_> = pairs.keys().collect();
            keys.sort();
            for key in keys {
                let value = &pairs[key];
                // Utiliser des guillemets si la valeur contient des espaces
                if value.contains(' ') || value.contains('#') {
                    out.push_str(&format!("{} = \"{}\"\n", key, value));
                } else {
                    out.push_str(&format!("{} = {}\n", key, value));
                }
            }
        }
        out.push('\n');
    }

    out
}

/// Parse une valeur comme booleen.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Parse une valeur comme usize.
pub fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse().ok()
}

/// Parse une valeur comme u64.
pub fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}
