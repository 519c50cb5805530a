use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

///  TokenFrequency 構造体
/// 1文書内の term の出現回数を管理します
///
/// # Examples
/// ```
/// use paper_sim::vectorizer::token::TokenFrequency;
/// let mut token_freq = TokenFrequency::new();
/// token_freq.add_token("graph");
/// token_freq.add_token("index");
/// token_freq.add_token("graph");
///
/// assert_eq!(token_freq.token_count("graph"), 2);
/// assert_eq!(token_freq.token_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TokenFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    token_count: IndexMap<String, u32>,
    total_token_count: u64,
}

/// Tokenの追加の実装
impl TokenFrequency {
    /// 新しいTokenFrequencyを作成するメソッド
    pub fn new() -> Self {
        TokenFrequency {
            token_count: IndexMap::new(),
            total_token_count: 0,
        }
    }

    /// tokenを追加する
    ///
    /// # Arguments
    /// * `token` - 追加するトークン
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        let count = self.token_count.entry(token.to_string()).or_insert(0);
        *count += 1;
        self.total_token_count += 1;
        self
    }

    /// 複数のtokenを追加する
    ///
    /// # Arguments
    /// * `tokens` - 追加するトークンのスライス
    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }
}

/// 参照系
impl TokenFrequency {
    /// tokenの出現回数 (無ければ 0)
    #[inline]
    pub fn token_count(&self, token: &str) -> u32 {
        self.token_count.get(token).copied().unwrap_or(0)
    }

    /// 全tokenの出現回数の合計
    #[inline]
    pub fn token_sum(&self) -> u64 {
        self.total_token_count
    }

    /// (token, count) を初出順に返す
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.token_count.iter().map(|(t, &c)| (t.as_str(), c))
    }

    /// ユニークなtokenの集合 (初出順)
    ///
    /// # Returns
    /// * `Vec<&str>` - トークンの参照のベクタ
    #[inline]
    pub fn token_set_ref_str(&self) -> Vec<&str> {
        self.token_count.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_totals() {
        let mut freq = TokenFrequency::new();
        freq.add_tokens(&["b", "a", "b", "c"]);
        assert_eq!(freq.token_count("b"), 2);
        assert_eq!(freq.token_count("zzz"), 0);
        assert_eq!(freq.token_sum(), 4);
        assert_eq!(freq.token_set_ref_str(), vec!["b", "a", "c"]);
    }

    #[test]
    fn iter_keeps_first_seen_order() {
        let mut freq = TokenFrequency::new();
        assert_eq!(freq.iter().count(), 0);
        freq.add_tokens(&["network", "graph", "network"]);
        assert_eq!(freq.iter().collect::<Vec<_>>(), vec![("network", 2), ("graph", 1)]);
    }
}
