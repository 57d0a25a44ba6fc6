use super::lexical::normalize_word;

/// Flesch-Kincaid grade level over a speaker's raw word sequence
///
/// `0.39 * (words / sentences) + 11.8 * (syllables / words) - 15.59`.
/// Sentences are counted from terminal punctuation on the words themselves,
/// with a floor of one; an empty word list yields 0.0 rather than failing.
pub fn grade_level(words: &[String]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }

    let word_count = words.len() as f64;
    let sentence_count = count_sentences(words).max(1) as f64;
    let syllable_count: usize = words
        .iter()
        .filter_map(|w| normalize_word(w))
        .map(|form| syllables(&form))
        .sum();

    0.39 * (word_count / sentence_count) + 11.8 * (syllable_count as f64 / word_count) - 15.59
}

/// Count sentence boundaries: words ending in terminal punctuation
/// (closing quotes and brackets are looked through)
fn count_sentences(words: &[String]) -> usize {
    words
        .iter()
        .filter(|w| {
            w.trim_end_matches(['"', '\'', ')', ']'])
                .ends_with(['.', '!', '?'])
        })
        .count()
}

/// Syllable estimate by vowel-group counting
///
/// A trailing silent 'e' is dropped unless the word ends in a
/// consonant + "le" cluster ("table"); every word gets at least one.
pub fn syllables(form: &str) -> usize {
    let letters: Vec<char> = form
        .chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphabetic)
        .collect();
    if letters.is_empty() {
        return 0;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

    let mut count = 0usize;
    let mut previous_was_vowel = false;
    for &c in &letters {
        let vowel = is_vowel(c);
        if vowel && !previous_was_vowel {
            count += 1;
        }
        previous_was_vowel = vowel;
    }

    let n = letters.len();
    if n >= 3 && letters[n - 1] == 'e' && !is_vowel(letters[n - 2]) && count > 1 {
        let consonant_le = letters[n - 2] == 'l' && !is_vowel(letters[n - 3]);
        if !consonant_le {
            count -= 1;
        }
    }

    count.max(1)
}
