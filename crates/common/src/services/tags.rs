//! Comma-delimited tag handling
//!
//! Papers store tags as one string (`"nlp, BERT,transformers"`). Parsing is
//! kept here so the storage format can change without touching callers.

use std::collections::BTreeSet;

/// Split a tag string on commas, trim and lowercase each tag, drop empties
pub fn parse_tags(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Union of the tags of every given tag string, sorted
pub fn collect_tags<I, S>(tag_strings: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags = BTreeSet::new();
    for raw in tag_strings {
        tags.extend(parse_tags(raw.as_ref()));
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_lowercases() {
        let tags: Vec<_> = parse_tags(" NLP, ,Bert ").collect();
        assert_eq!(tags, vec!["nlp", "bert"]);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_tags("").count(), 0);
        assert_eq!(parse_tags(" , ,").count(), 0);
    }

    #[test]
    fn test_collect_unions_and_dedupes() {
        let tags = collect_tags(["nlp,bert", "cv", "NLP"]);
        let tags: Vec<_> = tags.into_iter().collect();
        assert_eq!(tags, vec!["bert", "cv", "nlp"]);
    }
}
