//! Synonym expansion, doctrine-aware.
//!
//! Expands a (rewritten) query into OR-combined variants so the embedding
//! captures canonical phrasings the user did not type. E.g.
//! "what is the eucharist" also embeds "what is the blessed sacrament".

/// Deterministic query expansion over an injected term → synonyms table.
///
/// The table is iterated in insertion order and matching is literal
/// case-insensitive substring replacement, so repeated calls on the same
/// input produce byte-identical output.
pub struct SynonymExpander {
    table: Vec<(String, Vec<String>)>,
}

/// Canonical doctrinal vocabulary and its common alternate phrasings.
fn default_table() -> Vec<(&'static str, &'static [&'static str])> {
    vec![
        (
            "eucharist",
            &["blessed sacrament", "holy communion", "body and blood of christ"][..],
        ),
        ("confession", &["sacrament of penance", "reconciliation"]),
        ("baptism", &["sacrament of christian initiation"]),
        ("prayer", &["oration", "lifting of the heart to god"]),
        ("mary", &["blessed virgin", "mother of god", "theotokos"]),
        ("pope", &["roman pontiff", "bishop of rome", "successor of peter"]),
        ("bible", &["sacred scripture", "word of god"]),
        ("church", &["people of god", "body of christ"]),
        ("heaven", &["beatific vision", "eternal life"]),
        ("purgatory", &["final purification"]),
        ("ten commandments", &["decalogue"]),
        ("holy spirit", &["paraclete", "third person of the trinity"]),
        ("love", &["charity"]),
        ("grace", &["divine favor", "participation in the life of god"]),
    ]
}

impl SynonymExpander {
    /// Build an expander over the given table. Terms are matched
    /// case-insensitively; they are lowercased here once. Empty terms
    /// would match at every position and are dropped.
    pub fn new(table: Vec<(String, Vec<String>)>) -> Self {
        let table = table
            .into_iter()
            .filter(|(term, _)| !term.is_empty())
            .map(|(term, syns)| (term.to_ascii_lowercase(), syns))
            .collect();
        Self { table }
    }

    pub fn with_default_table() -> Self {
        Self::new(
            default_table()
                .into_iter()
                .map(|(term, syns)| {
                    (
                        term.to_string(),
                        syns.iter().map(|s| s.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }

    /// Expand `query` into an OR-combined string of variants.
    ///
    /// For each table entry whose term occurs in the query, one variant is
    /// generated per synonym by replacing every occurrence of the term.
    /// The original query always comes first; if no variant differs, the
    /// original is returned unchanged.
    pub fn expand(&self, query: &str) -> String {
        let lower = query.to_ascii_lowercase();
        let mut variants: Vec<String> = vec![query.to_string()];

        for (term, synonyms) in &self.table {
            if !lower.contains(term.as_str()) {
                continue;
            }
            for synonym in synonyms {
                let variant = replace_all_ignore_ascii_case(query, term, synonym);
                if variant != query && !variants.contains(&variant) {
                    variants.push(variant);
                }
            }
        }

        if variants.len() > 1 {
            variants.join(" OR ")
        } else {
            variants.swap_remove(0)
        }
    }
}

/// Replace every case-insensitive occurrence of `needle_lower` (already
/// lowercased, ASCII) in `haystack`. Literal matching, no pattern syntax.
fn replace_all_ignore_ascii_case(haystack: &str, needle_lower: &str, replacement: &str) -> String {
    let lower = haystack.to_ascii_lowercase();
    let mut out = String::with_capacity(haystack.len());
    let mut pos = 0;
    while let Some(found) = lower[pos..].find(needle_lower) {
        let at = pos + found;
        out.push_str(&haystack[pos..at]);
        out.push_str(replacement);
        pos = at + needle_lower.len();
    }
    out.push_str(&haystack[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_expander() -> SynonymExpander {
        SynonymExpander::new(vec![
            (
                "eucharist".to_string(),
                vec!["blessed sacrament".to_string(), "holy communion".to_string()],
            ),
            ("prayer".to_string(), vec!["oration".to_string()]),
        ])
    }

    #[test]
    fn test_no_match_returns_original() {
        let e = small_expander();
        assert_eq!(e.expand("what is sin"), "what is sin");
    }

    #[test]
    fn test_single_term_expands_to_or_variants() {
        let e = small_expander();
        assert_eq!(
            e.expand("what is the eucharist"),
            "what is the eucharist OR what is the blessed sacrament OR what is the holy communion"
        );
    }

    #[test]
    fn test_case_insensitive_match_and_replacement() {
        let e = small_expander();
        assert_eq!(
            e.expand("The EUCHARIST"),
            "The EUCHARIST OR The blessed sacrament OR The holy communion"
        );
    }

    #[test]
    fn test_multiple_terms_expand_in_table_order() {
        let e = small_expander();
        let out = e.expand("eucharist and prayer");
        assert_eq!(
            out,
            "eucharist and prayer OR blessed sacrament and prayer OR \
             holy communion and prayer OR eucharist and oration"
        );
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let e = SynonymExpander::new(vec![("prayer".to_string(), vec!["oration".to_string()])]);
        assert_eq!(
            e.expand("prayer about prayer"),
            "prayer about prayer OR oration about oration"
        );
    }

    #[test]
    fn test_idempotent_byte_identical() {
        let e = SynonymExpander::with_default_table();
        let q = "how should I pray to the Holy Spirit";
        assert_eq!(e.expand(q), e.expand(q));
    }

    #[test]
    fn test_default_table_expands_doctrinal_terms() {
        let e = SynonymExpander::with_default_table();
        let out = e.expand("what is the eucharist");
        assert!(out.contains(" OR "));
        assert!(out.contains("blessed sacrament"));
        assert!(out.starts_with("what is the eucharist"));
    }

    #[test]
    fn test_duplicate_variants_collapsed() {
        let e = SynonymExpander::new(vec![
            ("prayer".to_string(), vec!["oration".to_string()]),
            ("prayer".to_string(), vec!["oration".to_string()]),
        ]);
        assert_eq!(e.expand("on prayer"), "on prayer OR on oration");
    }

    #[test]
    fn test_empty_term_in_table_is_ignored() {
        let e = SynonymExpander::new(vec![
            ("".to_string(), vec!["noise".to_string()]),
            ("prayer".to_string(), vec!["oration".to_string()]),
        ]);
        assert_eq!(e.expand("on prayer"), "on prayer OR on oration");
        assert_eq!(e.expand("unrelated"), "unrelated");
    }

    #[test]
    fn test_literal_matching_with_metacharacters() {
        // A term containing regex metacharacters must still match literally
        let e = SynonymExpander::new(vec![(
            "q.e.d".to_string(),
            vec!["demonstrated".to_string()],
        )]);
        assert_eq!(e.expand("thus q.e.d here"), "thus q.e.d here OR thus demonstrated here");
        // and must not match other characters at the dot positions
        assert_eq!(e.expand("quedo"), "quedo");
    }
}
