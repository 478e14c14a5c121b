use std::collections::BTreeMap;

/// Case-sensitive token counts. Characters that are neither word characters
/// nor whitespace are dropped before splitting on whitespace.
pub fn word_frequency(text: &str) -> BTreeMap<String, usize> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    let mut counts = BTreeMap::new();
    for token in cleaned.split_whitespace() {
        *counts.entry(token.to_string()).or_insert(0) += 1;
    }
    counts
}

pub fn render_report(counts: &BTreeMap<String, usize>) -> String {
    if counts.is_empty() {
        return "No words found in your text.".to_string();
    }
    let mut report = String::from("Word frequency:\n");
    for (word, n) in counts {
        report.push_str(&format!("{}: {}\n", word, n));
    }
    report.truncate(report.trim_end().len());
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_repeated_words() {
        let counts = word_frequency("cat dog cat");
        assert_eq!(counts.get("cat"), Some(&2));
        assert_eq!(counts.get("dog"), Some(&1));
        assert_eq!(counts.len(), 2);
        assert_eq!(render_report(&counts), "Word frequency:\ncat: 2\ndog: 1");
    }

    #[test]
    fn strips_punctuation_and_keeps_case() {
        let counts = word_frequency("Hello, hello! snake_case... it's");
        assert_eq!(counts.get("Hello"), Some(&1));
        assert_eq!(counts.get("hello"), Some(&1));
        assert_eq!(counts.get("snake_case"), Some(&1));
        assert_eq!(counts.get("its"), Some(&1));
    }

    #[test]
    fn report_is_sorted_by_token() {
        let counts = word_frequency("pear Apple apple banana");
        let keys: Vec<_> = counts.keys().cloned().collect();
        assert_eq!(keys, vec!["Apple", "apple", "banana", "pear"]);
    }

    #[test]
    fn punctuation_only_yields_empty_report() {
        let counts = word_frequency("?! ... --");
        assert!(counts.is_empty());
        assert_eq!(render_report(&counts), "No words found in your text.");
    }
}
