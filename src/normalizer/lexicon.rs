use std::collections::HashMap;

/// Coarse grammatical category of a token.
/// Only the closed classes matter for normalization; every other word is `Word`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    /// determiner (a, the, this, ...)
    Det,
    /// adposition (of, in, with, ...)
    Adp,
    /// coordinating conjunction (and, or, but, nor)
    CConj,
    /// subordinating conjunction (if, because, whether, ...)
    SConj,
    /// pronoun (it, they, which, ...)
    Pron,
    Num,
    Punct,
    Space,
    /// open-class word (noun, verb, adjective, adverb, ...)
    Word,
}

impl PartOfSpeech {
    /// Categories that never reach the index
    #[inline]
    pub fn is_removed(self) -> bool {
        matches!(
            self,
            PartOfSpeech::Det
                | PartOfSpeech::Adp
                | PartOfSpeech::CConj
                | PartOfSpeech::SConj
                | PartOfSpeech::Pron
                | PartOfSpeech::Space
        )
    }
}

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "these", "those", "each", "every", "some", "any", "no", "all",
    "both", "either", "neither", "another", "such", "whatever", "whichever",
];

const ADPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
    "over", "under", "within", "without", "across", "along", "among", "amongst", "around",
    "behind", "beyond", "despite", "except", "inside", "outside", "near", "per", "via",
    "toward", "towards", "upon", "onto", "throughout", "than", "amid", "versus", "vs",
    "beside", "besides", "underneath", "unlike", "beneath", "alongside",
];

const COORDINATING: &[&str] = &["and", "or", "but", "nor"];

const SUBORDINATING: &[&str] = &[
    "if", "because", "although", "though", "while", "whilst", "whereas", "unless", "whether",
    "since", "until", "till", "as", "that", "whenever", "wherever",
];

const PRONOUNS: &[&str] = &[
    "i", "me", "my", "mine", "myself", "you", "your", "yours", "yourself", "yourselves", "he",
    "him", "his", "himself", "she", "her", "hers", "herself", "it", "its", "itself", "we", "us",
    "our", "ours", "ourselves", "they", "them", "their", "theirs", "themselves", "who", "whom",
    "whose", "whoever", "what", "which", "something", "anything", "nothing", "everything",
    "someone", "anyone", "everyone", "somebody", "anybody", "everybody", "nobody", "there",
];

/// Closed-class English lexicon used to tag function words
#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: HashMap<&'static str, PartOfSpeech>,
}

impl Lexicon {
    pub fn english() -> Self {
        let mut entries = HashMap::new();
        let classes = [
            (DETERMINERS, PartOfSpeech::Det),
            (ADPOSITIONS, PartOfSpeech::Adp),
            (COORDINATING, PartOfSpeech::CConj),
            (SUBORDINATING, PartOfSpeech::SConj),
            (PRONOUNS, PartOfSpeech::Pron),
        ];
        for (words, pos) in classes {
            for &word in words {
                // 複数の品詞を持つ語は最初の分類を採用 (どれも除去対象)
                entries.entry(word).or_insert(pos);
            }
        }
        Self { entries }
    }

    /// Closed-class lookup of a lowercased word
    #[inline]
    pub fn closed_class(&self, lower: &str) -> Option<PartOfSpeech> {
        self.entries.get(lower).copied()
    }

    /// Tag a lowercased word token.
    /// Numbers (digits with optional inner `-`, `/`) are `Num`, unknown words are `Word`.
    pub fn tag(&self, lower: &str) -> PartOfSpeech {
        if let Some(pos) = self.closed_class(lower) {
            return pos;
        }
        let numeric = lower.chars().any(|c| c.is_ascii_digit())
            && lower.chars().all(|c| c.is_ascii_digit() || c == '-' || c == '/');
        if numeric {
            PartOfSpeech::Num
        } else {
            PartOfSpeech::Word
        }
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_words_are_tagged() {
        let lex = Lexicon::english();
        assert_eq!(lex.tag("the"), PartOfSpeech::Det);
        assert_eq!(lex.tag("of"), PartOfSpeech::Adp);
        assert_eq!(lex.tag("and"), PartOfSpeech::CConj);
        assert_eq!(lex.tag("because"), PartOfSpeech::SConj);
        assert_eq!(lex.tag("they"), PartOfSpeech::Pron);
        assert!(lex.tag("that").is_removed());
    }

    #[test]
    fn content_words_and_numbers_survive() {
        let lex = Lexicon::english();
        assert_eq!(lex.tag("network"), PartOfSpeech::Word);
        assert_eq!(lex.tag("2024"), PartOfSpeech::Num);
        assert_eq!(lex.tag("covid-19"), PartOfSpeech::Word);
        assert!(!PartOfSpeech::Punct.is_removed());
        assert!(!PartOfSpeech::Num.is_removed());
    }
}
