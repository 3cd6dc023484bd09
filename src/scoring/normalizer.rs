//! Team name canonicalization.
//!
//! Two feeds rarely spell a club the same way ("Central Córdoba",
//! "CENTRAL CORDOBA de Santiago"). A key is built by trimming, lower-casing,
//! stripping diacritics and collapsing whitespace. Known homonym prefixes are
//! then cut down to the prefix itself, so a trailing qualifier does not split
//! one club into two. The prefix list is an explicit allow-list; there is no
//! similarity matching.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Prefixes collapsed by default. Extra ones come from `scoring.ambiguous_prefixes`.
pub const DEFAULT_AMBIGUOUS_PREFIXES: &[&str] = &["central cordoba"];

#[derive(Debug, Clone)]
pub struct NameNormalizer {
    // Already folded, longest first.
    prefixes: Vec<String>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::with_extra_prefixes(std::iter::empty::<&str>())
    }
}

impl NameNormalizer {
    pub fn with_extra_prefixes<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut prefixes: Vec<String> = DEFAULT_AMBIGUOUS_PREFIXES
            .iter()
            .map(|p| fold(p))
            .chain(extra.into_iter().map(|p| fold(p.as_ref())))
            .filter(|p| !p.is_empty())
            .collect();
        prefixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        prefixes.dedup();

        Self { prefixes }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Canonical comparison key for a raw team name.
    pub fn normalize(&self, raw: &str) -> String {
        let folded = fold(raw);

        for prefix in &self.prefixes {
            let at_word_boundary = folded
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '));
            if at_word_boundary {
                return prefix.clone();
            }
        }

        folded
    }

    /// Equality on normalized keys. An empty key never matches anything.
    pub fn same_team(&self, a: &str, b: &str) -> bool {
        let key_a = self.normalize(a);
        !key_a.is_empty() && key_a == self.normalize(b)
    }
}

/// Normalize with the default allow-list.
pub fn normalize(raw: &str) -> String {
    NameNormalizer::default().normalize(raw)
}

fn fold(raw: &str) -> String {
    let unaccented: String = raw
        .trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    unaccented.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_case_and_whitespace() {
        assert_eq!(normalize("  Atlético   de\tMadrid "), "atletico de madrid");
        assert_eq!(normalize("CÓRDOBA"), "cordoba");
        assert_eq!(normalize("Córdoba"), normalize("Cordoba"));
    }

    #[test]
    fn collapses_allow_listed_qualifier() {
        assert_eq!(normalize("Central Córdoba"), normalize("Central Cordoba de Santiago"));
        assert_eq!(normalize("Central Cordoba de Santiago"), "central cordoba");
    }

    #[test]
    fn prefix_must_end_on_a_word_boundary() {
        assert_eq!(normalize("Central Cordobas"), "central cordobas");
    }

    #[test]
    fn no_generic_substring_collapsing() {
        assert_ne!(normalize("Racing Club"), normalize("Racing"));
        assert_ne!(normalize("Boca Juniors"), normalize("Boca"));
    }

    #[test]
    fn empty_input_never_matches() {
        let normalizer = NameNormalizer::default();
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert!(!normalizer.same_team("", ""));
        assert!(!normalizer.same_team("", "Racing"));
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "",
            "   ",
            "Central Córdoba",
            "CENTRAL   CÓRDOBA de Santiago del Estero",
            "Estudiantes de La Plata",
            "Unión\u{00A0}de  Santa Fe",
            "Nöel  FC",
            "São Paulo",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn extra_prefixes_are_folded_before_use() {
        let normalizer = NameNormalizer::with_extra_prefixes(["  Deportivo  Español "]);
        assert_eq!(normalizer.normalize("Deportivo Espanol de Buenos Aires"), "deportivo espanol");
        assert!(normalizer.same_team("Central Córdoba", "central cordoba (SdE)"));
        assert!(!normalizer.same_team("Racing Club", "Racing"));
    }
}
