use std::collections::{HashMap, HashSet};

/// Irregular inflections mapped straight to their lemma.
/// Every lemma here is itself a fixed point of the suffix rules.
const IRREGULAR: &[(&str, &str)] = &[
    ("am", "be"), ("is", "be"), ("are", "be"), ("was", "be"), ("were", "be"),
    ("been", "be"), ("being", "be"),
    ("has", "have"), ("had", "have"), ("having", "have"),
    ("does", "do"), ("did", "do"), ("done", "do"), ("doing", "do"),
    ("goes", "go"), ("went", "go"), ("gone", "go"),
    ("made", "make"), ("found", "find"), ("shown", "show"), ("gave", "give"),
    ("given", "give"), ("took", "take"), ("taken", "take"), ("knew", "know"),
    ("known", "know"), ("saw", "see"), ("seen", "see"), ("got", "get"),
    ("gotten", "get"), ("began", "begin"), ("begun", "begin"), ("led", "lead"),
    ("built", "build"), ("brought", "bring"), ("thought", "think"), ("sought", "seek"),
    ("held", "hold"), ("left", "leave"), ("meant", "mean"), ("kept", "keep"),
    ("ran", "run"), ("wrote", "write"), ("written", "write"), ("chose", "choose"),
    ("chosen", "choose"), ("grew", "grow"), ("grown", "grow"), ("drew", "draw"),
    ("drawn", "draw"), ("fell", "fall"), ("fallen", "fall"), ("felt", "feel"),
    ("lost", "lose"), ("paid", "pay"), ("said", "say"), ("sent", "send"),
    ("spent", "spend"), ("stood", "stand"), ("told", "tell"), ("understood", "understand"),
    ("won", "win"), ("created", "create"), ("creating", "create"), ("creates", "create"),
    ("children", "child"), ("men", "man"), ("women", "woman"), ("feet", "foot"),
    ("teeth", "tooth"), ("mice", "mouse"), ("analyses", "analysis"),
    ("hypotheses", "hypothesis"), ("theses", "thesis"), ("criteria", "criterion"),
    ("phenomena", "phenomenon"), ("matrices", "matrix"), ("indices", "index"),
    ("vertices", "vertex"), ("spectra", "spectrum"),
];

/// Words that look inflected but are already base forms
const PROTECTED: &[&str] = &[
    "series", "species", "news", "bias", "gas", "thus", "plus", "corpus", "virus", "focus",
    "status", "consensus", "apparatus", "stimulus", "nucleus", "radius", "always", "perhaps",
    "bed", "red", "shed", "embed", "indeed", "hundred", "sacred", "naked", "wicked", "kindred",
    "morning", "evening", "ceiling", "sibling", "wedding", "spring", "string", "thing",
    "nothing", "something", "anything", "everything",
];

/// Rule-based English lemmatizer.
///
/// Inflected verbs and plural nouns are reduced to a base form with the irregular
/// table and a small set of suffix rules. `-ing` / `-ed` forms are reduced to the
/// verb even when they act as nouns or adjectives (`trained model` -> `train model`).
/// Rules are applied until nothing changes, so `lemma(lemma(w)) == lemma(w)`.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    irregular: HashMap<&'static str, &'static str>,
    protected: HashSet<&'static str>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::english()
    }
}

impl Lemmatizer {
    pub fn english() -> Self {
        Self {
            irregular: IRREGULAR.iter().copied().collect(),
            protected: PROTECTED.iter().copied().collect(),
        }
    }

    /// Lemma of a lowercased token.
    /// Tokens that are not purely ASCII-alphabetic are returned unchanged.
    pub fn lemma(&self, lower: &str) -> String {
        if lower.is_empty() || !lower.bytes().all(|b| b.is_ascii_lowercase()) {
            return lower.to_string();
        }
        let mut current = lower.to_string();
        // 各ルールは語を短くするか不規則表の固定点へ飛ぶので必ず止まる
        while let Some(next) = self.step(&current) {
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn step(&self, word: &str) -> Option<String> {
        if let Some(&lemma) = self.irregular.get(word) {
            return Some(lemma.to_string());
        }
        if self.protected.contains(word) {
            return None;
        }
        strip_plural(word)
            .or_else(|| strip_past(word))
            .or_else(|| strip_progressive(word))
    }
}

#[inline]
fn is_vowel(bytes: &[u8], i: usize) -> bool {
    match bytes[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => true,
        // y は子音の後なら母音扱い
        b'y' => i > 0 && !is_vowel(bytes, i - 1),
        _ => false,
    }
}

#[inline]
fn has_vowel(stem: &str) -> bool {
    let bytes = stem.as_bytes();
    (0..bytes.len()).any(|i| is_vowel(bytes, i))
}

/// Porter measure: number of vowel-consonant sequences
fn measure(stem: &str) -> usize {
    let bytes = stem.as_bytes();
    let mut m = 0;
    let mut prev_vowel = false;
    for i in 0..bytes.len() {
        let v = is_vowel(bytes, i);
        if prev_vowel && !v {
            m += 1;
        }
        prev_vowel = v;
    }
    m
}

/// consonant-vowel-consonant ending, last consonant not w / x / y
fn ends_cvc(stem: &str) -> bool {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    n >= 3
        && !is_vowel(bytes, n - 3)
        && is_vowel(bytes, n - 2)
        && !is_vowel(bytes, n - 1)
        && !matches!(bytes[n - 1], b'w' | b'x' | b'y')
}

fn ends_double_consonant(stem: &str) -> bool {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    n >= 2 && bytes[n - 1] == bytes[n - 2] && !is_vowel(bytes, n - 1)
}

fn strip_plural(word: &str) -> Option<String> {
    if word.len() <= 3 || !word.ends_with('s') {
        return None;
    }
    if ["ss", "us", "is", "ous", "ics"].iter().any(|s| word.ends_with(s)) {
        return None;
    }
    if word.len() > 4 && word.ends_with("ies") {
        return Some(format!("{}y", &word[..word.len() - 3]));
    }
    if ["sses", "xes", "ches", "shes", "zzes"].iter().any(|s| word.ends_with(s)) {
        return Some(word[..word.len() - 2].to_string());
    }
    Some(word[..word.len() - 1].to_string())
}

fn strip_past(word: &str) -> Option<String> {
    if word.len() <= 4 || !word.ends_with("ed") || word.ends_with("eed") {
        return None;
    }
    if word.ends_with("ied") {
        return Some(format!("{}y", &word[..word.len() - 3]));
    }
    let stem = &word[..word.len() - 2];
    if !has_vowel(stem) {
        return None;
    }
    Some(restore_stem(stem))
}

fn strip_progressive(word: &str) -> Option<String> {
    if word.len() <= 4 || !word.ends_with("ing") {
        return None;
    }
    let stem = &word[..word.len() - 3];
    if stem.len() < 2 || !has_vowel(stem) {
        return None;
    }
    Some(restore_stem(stem))
}

/// Undo consonant doubling or restore a silent `e` after `-ed` / `-ing` removal
fn restore_stem(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    if ends_double_consonant(stem) && !matches!(bytes[n - 1], b'l' | b's' | b'z') {
        return stem[..n - 1].to_string();
    }
    if needs_silent_e(stem) {
        return format!("{}e", stem);
    }
    stem.to_string()
}

fn needs_silent_e(stem: &str) -> bool {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n < 2 {
        return false;
    }
    let last = bytes[n - 1];
    let before = bytes[n - 2];
    let before_is_consonant = !is_vowel(bytes, n - 2);
    if stem.ends_with("at") {
        return !(stem.ends_with("eat") || stem.ends_with("oat"));
    }
    if stem.ends_with("bl") || stem.ends_with("iz") || stem.ends_with("ang") || stem.ends_with("rg") {
        return true;
    }
    if stem.ends_with("ur") {
        return n >= 3 && !is_vowel(bytes, n - 3);
    }
    match last {
        b'c' | b'v' => return true,
        b'z' => return before != b'z',
        b's' => return before != b's',
        b'l' => return before_is_consonant && before != b'l',
        _ => {}
    }
    measure(stem) == 1 && ends_cvc(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plurals_are_singularized() {
        let lem = Lemmatizer::english();
        assert_eq!(lem.lemma("networks"), "network");
        assert_eq!(lem.lemma("studies"), "study");
        assert_eq!(lem.lemma("processes"), "process");
        assert_eq!(lem.lemma("approaches"), "approach");
        assert_eq!(lem.lemma("process"), "process");
        assert_eq!(lem.lemma("analysis"), "analysis");
        assert_eq!(lem.lemma("series"), "series");
    }

    #[test]
    fn verb_forms_reduce_to_base() {
        let lem = Lemmatizer::english();
        assert_eq!(lem.lemma("trained"), "train");
        assert_eq!(lem.lemma("training"), "train");
        assert_eq!(lem.lemma("running"), "run");
        assert_eq!(lem.lemma("stopped"), "stop");
        assert_eq!(lem.lemma("making"), "make");
        assert_eq!(lem.lemma("using"), "use");
        assert_eq!(lem.lemma("based"), "base");
        assert_eq!(lem.lemma("related"), "relate");
        assert_eq!(lem.lemma("optimized"), "optimize");
        assert_eq!(lem.lemma("measured"), "measure");
        assert_eq!(lem.lemma("occurred"), "occur");
        assert_eq!(lem.lemma("applied"), "apply");
        assert_eq!(lem.lemma("developed"), "develop");
        assert_eq!(lem.lemma("learning"), "learn");
    }

    #[test]
    fn irregular_forms_use_table() {
        let lem = Lemmatizer::english();
        assert_eq!(lem.lemma("was"), "be");
        assert_eq!(lem.lemma("children"), "child");
        assert_eq!(lem.lemma("led"), "lead");
        assert_eq!(lem.lemma("matrices"), "matrix");
    }

    #[test]
    fn short_and_protected_words_are_kept() {
        let lem = Lemmatizer::english();
        assert_eq!(lem.lemma("thing"), "thing");
        assert_eq!(lem.lemma("bring"), "bring");
        assert_eq!(lem.lemma("need"), "need");
        assert_eq!(lem.lemma("gas"), "gas");
        assert_eq!(lem.lemma("bed"), "bed");
    }

    #[test]
    fn non_alphabetic_tokens_pass_through() {
        let lem = Lemmatizer::english();
        assert_eq!(lem.lemma("covid-19"), "covid-19");
        assert_eq!(lem.lemma("."), ".");
        assert_eq!(lem.lemma("résumés"), "résumés");
    }

    #[test]
    fn irregular_lemmas_are_fixed_points() {
        let lem = Lemmatizer::english();
        for &(_, lemma) in IRREGULAR {
            assert_eq!(lem.lemma(lemma), lemma, "irregular lemma {lemma} is not stable");
        }
    }

    #[test]
    fn lemma_is_stable_under_repetition() {
        let lem = Lemmatizer::english();
        for word in ["embedded", "findings", "classes", "ceilings", "modeling", "hoped", "focuses"] {
            let once = lem.lemma(word);
            assert_eq!(lem.lemma(&once), once);
        }
    }
}
