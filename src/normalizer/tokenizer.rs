/// Characters that always split a token, wherever they appear in a word.
/// Hyphens are deliberately absent: `state-of-the-art` stays one token.
pub const SEPARATORS: &[char] = &[
    '.', ',', '?', '!', ':', ';', '…', '‘', '’', '`', '“', '”', '"', '\'', '~',
];

/// Characters that split only at the start or end of a whitespace-delimited chunk.
/// Edge stripping also peels separators, so `(again)!` yields `(`, `again`, `)`, `!`.
pub const EDGE_PUNCT: &[char] = &['(', ')', '[', ']', '{', '}', '<', '>', '*', '|', '#', '%'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Punct,
    Space,
}

/// A slice of the input text with its coarse kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken<'a> {
    pub text: &'a str,
    pub kind: TokenKind,
}

impl<'a> RawToken<'a> {
    fn new(text: &'a str, kind: TokenKind) -> Self {
        Self { text, kind }
    }
}

/// Whitespace tokenizer with prefix / infix / suffix punctuation splitting.
///
/// - runs of whitespace other than a single `' '` become `Space` tokens
/// - every char in `separators` becomes its own `Punct` token
/// - chars in `edge_punct` are split off the ends of a chunk
#[derive(Debug, Clone)]
pub struct Tokenizer {
    separators: Vec<char>,
    edge_punct: Vec<char>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(SEPARATORS, EDGE_PUNCT)
    }
}

impl Tokenizer {
    pub fn new(separators: &[char], edge_punct: &[char]) -> Self {
        Self {
            separators: separators.to_vec(),
            edge_punct: edge_punct.to_vec(),
        }
    }

    #[inline]
    fn is_separator(&self, c: char) -> bool {
        self.separators.contains(&c)
    }

    #[inline]
    fn is_edge(&self, c: char) -> bool {
        self.edge_punct.contains(&c)
    }

    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<RawToken<'a>> {
        let mut tokens = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            let ws_len = rest
                .char_indices()
                .find(|(_, c)| !c.is_whitespace())
                .map_or(rest.len(), |(i, _)| i);
            if ws_len > 0 {
                let ws = &rest[..ws_len];
                if ws != " " {
                    tokens.push(RawToken::new(ws, TokenKind::Space));
                }
                rest = &rest[ws_len..];
                continue;
            }
            let chunk_len = rest
                .char_indices()
                .find(|(_, c)| c.is_whitespace())
                .map_or(rest.len(), |(i, _)| i);
            self.split_chunk(&rest[..chunk_len], &mut tokens);
            rest = &rest[chunk_len..];
        }
        tokens
    }

    /// 空白を含まない塊を prefix / infix / suffix で分割する
    fn split_chunk<'a>(&self, chunk: &'a str, out: &mut Vec<RawToken<'a>>) {
        let mut start = 0;
        let mut end = chunk.len();

        // prefix
        let mut prefixes = Vec::new();
        while let Some(c) = chunk[start..end].chars().next() {
            if self.is_edge(c) || self.is_separator(c) {
                prefixes.push(RawToken::new(&chunk[start..start + c.len_utf8()], TokenKind::Punct));
                start += c.len_utf8();
            } else {
                break;
            }
        }
        // suffix (collected in reverse)
        let mut suffixes = Vec::new();
        while let Some(c) = chunk[start..end].chars().next_back() {
            if self.is_edge(c) || self.is_separator(c) {
                suffixes.push(RawToken::new(&chunk[end - c.len_utf8()..end], TokenKind::Punct));
                end -= c.len_utf8();
            } else {
                break;
            }
        }

        out.extend(prefixes);
        let core = &chunk[start..end];
        // infix: 区切り文字の左右はそれぞれ独立した塊として再分割する
        match core.char_indices().find(|&(_, c)| self.is_separator(c)) {
            Some((i, c)) => {
                let next = i + c.len_utf8();
                if i > 0 {
                    self.split_chunk(&core[..i], out);
                }
                out.push(RawToken::new(&core[i..next], TokenKind::Punct));
                if next < core.len() {
                    self.split_chunk(&core[next..], out);
                }
            }
            None if !core.is_empty() => out.push(Self::word_or_punct(core)),
            None => {}
        }
        out.extend(suffixes.into_iter().rev());
    }

    /// `-` や `+` だけの塊は記号として扱う
    fn word_or_punct(text: &str) -> RawToken<'_> {
        if text.chars().any(char::is_alphanumeric) {
            RawToken::new(text, TokenKind::Word)
        } else {
            RawToken::new(text, TokenKind::Punct)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<&str> {
        Tokenizer::default()
            .tokenize(text)
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn hyphenated_words_stay_whole() {
        assert_eq!(texts("state-of-the-art models"), vec!["state-of-the-art", "models"]);
    }

    #[test]
    fn separators_split_inside_and_around_words() {
        assert_eq!(texts("deep, (sparse) nets."), vec!["deep", ",", "(", "sparse", ")", "nets", "."]);
        assert_eq!(texts("e.g. \"it's\""), vec!["e", ".", "g", ".", "\"", "it", "'", "s", "\""]);
    }

    #[test]
    fn pieces_between_separators_are_peeled_too() {
        assert_eq!(texts("a.(A"), vec!["a", ".", "(", "A"]);
        assert_eq!(texts("x,[y].z"), vec!["x", ",", "[", "y", "]", ".", "z"]);
    }

    #[test]
    fn trailing_punctuation_peels_in_order() {
        assert_eq!(texts("(again)!"), vec!["(", "again", ")", "!"]);
    }

    #[test]
    fn irregular_whitespace_becomes_space_tokens() {
        let tokens = Tokenizer::default().tokenize("graph\n\nindex  x");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Word, TokenKind::Space, TokenKind::Word, TokenKind::Space, TokenKind::Word]
        );
    }

    #[test]
    fn lone_dashes_are_punctuation() {
        let tokens = Tokenizer::default().tokenize("a - b");
        assert_eq!(tokens[1], RawToken::new("-", TokenKind::Punct));
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(Tokenizer::default().tokenize("").is_empty());
    }
}
