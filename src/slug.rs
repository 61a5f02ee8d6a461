//! Slug derivation for teams and competitions.
//!
//! Slugs are lowercase ASCII alphanumerics separated by single hyphens. They
//! are the natural key for upserts, so the same input must always produce the
//! same output.

use sha2::{Digest, Sha256};

/// Slug used when the input carries no text at all.
pub const FALLBACK_SLUG: &str = "n-a";

const FALLBACK_HASH_HEX_LEN: usize = 8;

/// Derive a slug from a single display name.
pub fn slugify(input: &str) -> String {
    slugify_parts(&[input])
}

/// Derive a slug from several parts, e.g. a competition name and its country.
///
/// Empty parts are ignored. Text that contains no ASCII alphanumerics at all
/// (for example a name written only in a non-Latin script) falls back to
/// `n-a-<hash>` where the hash fragment keeps distinct inputs apart.
pub fn slugify_parts(parts: &[&str]) -> String {
    let slug = parts
        .iter()
        .map(|part| slugify_token(part))
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if !slug.is_empty() {
        return slug;
    }

    let raw = parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("|");

    if raw.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        format!("{}-{}", FALLBACK_SLUG, hash_fragment(&raw))
    }
}

fn slugify_token(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_dash = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if let Some(folded) = fold_latin(ch) {
            slug.push_str(folded);
            last_dash = false;
        } else if !last_dash && !slug.is_empty() {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// ASCII spelling of accented Latin letters common in club and league names.
fn fold_latin(ch: char) -> Option<&'static str> {
    let folded = match ch.to_lowercase().next()? {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'ł' | 'ľ' | 'ĺ' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'ŕ' | 'ř' => "r",
        'ś' | 'š' | 'ş' | 'ș' => "s",
        'ť' | 'ţ' | 'ț' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        'þ' => "th",
        _ => return None,
    };
    Some(folded)
}

fn hash_fragment(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    hex::encode(digest)
        .chars()
        .take(FALLBACK_HASH_HEX_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Manchester United"), "manchester-united");
        assert_eq!(slugify("  Paris Saint-Germain  "), "paris-saint-germain");
        assert_eq!(slugify("AFC Bournemouth!!"), "afc-bournemouth");
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(slugify("Brighton & Hove -- Albion"), "brighton-hove-albion");
        assert_eq!(slugify("a__b..c"), "a-b-c");
    }

    #[test]
    fn folds_accented_latin_letters() {
        assert_eq!(slugify("Atlético Madrid"), "atletico-madrid");
        assert_eq!(slugify("Bayern München"), "bayern-munchen");
        assert_eq!(slugify("BORUSSIA MÖNCHENGLADBACH"), "borussia-monchengladbach");
        assert_eq!(slugify("Fenerbahçe"), "fenerbahce");
        assert_eq!(slugify("Śląsk Wrocław"), "slask-wroclaw");
        assert_eq!(slugify("Fortuna Düsseldorf / Eintracht Braunschweig"), "fortuna-dusseldorf-eintracht-braunschweig");
        assert_eq!(slugify("Große Straße"), "grosse-strasse");
    }

    #[test]
    fn drops_other_symbols_without_panicking() {
        assert_eq!(slugify("Club № 1 ★"), "club-1");
    }

    #[test]
    fn joins_parts_and_skips_empty_ones() {
        assert_eq!(
            slugify_parts(&["Premier League", "England"]),
            "premier-league-england"
        );
        assert_eq!(slugify_parts(&["Premier League", ""]), "premier-league");
        assert_eq!(slugify_parts(&["", "Serie A"]), "serie-a");
    }

    #[test]
    fn empty_input_uses_fallback() {
        assert_eq!(slugify(""), FALLBACK_SLUG);
        assert_eq!(slugify("   "), FALLBACK_SLUG);
        assert_eq!(slugify_parts(&[]), FALLBACK_SLUG);
        assert!(slugify("---").starts_with("n-a-"));
    }

    #[test]
    fn non_latin_input_gets_distinct_hashed_fallback() {
        let tokyo = slugify("東京");
        let osaka = slugify("大阪");
        assert!(tokyo.starts_with("n-a-"));
        assert_eq!(tokyo.len(), FALLBACK_SLUG.len() + 1 + FALLBACK_HASH_HEX_LEN);
        assert_ne!(tokyo, osaka);
    }

    #[test]
    fn derivation_is_deterministic() {
        for name in ["Arsenal", "Real Madrid C.F.", "東京", "", "Olympique de Marseille"] {
            assert_eq!(slugify(name), slugify(name));
        }
    }
}
