use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::models::WordCount;

/// MTLD factor boundary: a running segment is complete once its type-token
/// ratio decays to this value
const MTLD_THRESHOLD: f64 = 0.72;

/// How many top words to keep per speaker
const TOP_WORD_LIMIT: usize = 30;

/// Function words excluded from the per-speaker frequency list
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "is", "it", "i",
    "you", "he", "she", "we", "they", "that", "this", "was", "were", "are", "be", "been", "being",
    "have", "has", "had", "do", "does", "did", "will", "would", "could", "should", "may", "might",
    "can", "shall", "so", "if", "then", "than", "not", "no", "my", "your", "our", "their", "its",
    "me", "him", "her", "us", "them", "what", "which", "who", "where", "when", "how", "just",
    "also", "very", "with", "from", "about", "as", "all", "up", "out",
];

/// Canonical word form: lowercased, outer punctuation stripped
///
/// Internal apostrophes and hyphens survive ("don't", "mm-hmm"); a piece
/// that is all punctuation yields nothing.
pub fn normalize_word(raw: &str) -> Option<String> {
    let trimmed = raw.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Type-token ratio: unique normalized forms over total words
///
/// `total_words` is the word-token count, which may exceed the number of
/// normalizable forms. Zero words yields 0.0.
pub fn type_token_ratio(forms: &[String], total_words: usize) -> f64 {
    if total_words == 0 {
        return 0.0;
    }
    let unique: BTreeSet<&str> = forms.iter().map(String::as_str).collect();
    unique.len() as f64 / total_words as f64
}

/// Measure of textual lexical diversity over the normalized form sequence
///
/// Bidirectional MTLD: the mean of a forward and a backward pass, each
/// counting how many times the running type-token ratio decays past the
/// factor threshold. Zero forms yields 0.0.
pub fn mtld(forms: &[String]) -> f64 {
    if forms.is_empty() {
        return 0.0;
    }
    let forward = mtld_pass(forms.iter());
    let backward = mtld_pass(forms.iter().rev());
    (forward + backward) / 2.0
}

fn mtld_pass<'a>(words: impl Iterator<Item = &'a String>) -> f64 {
    let mut factors = 0.0;
    let mut types: HashSet<&str> = HashSet::new();
    let mut segment_len = 0usize;
    let mut total = 0usize;

    for word in words {
        total += 1;
        segment_len += 1;
        types.insert(word.as_str());
        let ratio = types.len() as f64 / segment_len as f64;
        if ratio <= MTLD_THRESHOLD {
            factors += 1.0;
            types.clear();
            segment_len = 0;
        }
    }

    // Partial factor for the unfinished trailing segment
    if segment_len > 0 {
        let ratio = types.len() as f64 / segment_len as f64;
        factors += (1.0 - ratio) / (1.0 - MTLD_THRESHOLD);
    }

    if factors == 0.0 {
        0.0
    } else {
        total as f64 / factors
    }
}

/// Most frequent content words, stop-word filtered, deterministically ordered
/// by descending count then ascending word
pub fn word_frequencies(forms: &[String]) -> Vec<WordCount> {
    let stop_words: BTreeSet<&str> = STOP_WORDS.iter().copied().collect();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for form in forms {
        if form.len() > 1 && !stop_words.contains(form.as_str()) {
            *counts.entry(form.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<WordCount> = counts
        .into_iter()
        .map(|(word, count)| WordCount {
            word: word.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    ranked.truncate(TOP_WORD_LIMIT);
    ranked
}
