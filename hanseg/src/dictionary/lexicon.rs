//! 辞書の語彙情報を管理するモジュール
//!
//! このモジュールは、単語の表層形と頻度を管理する語彙データ構造と、
//! テキスト形式の辞書（`単語 頻度 [品詞]`）のパーサーを提供します。

mod trie;

use std::collections::BTreeMap;
use std::io::Read;

use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::LexType;
use crate::dictionary::lexicon::trie::{RESERVED_CHAR, Trie};
use crate::errors::{HansegError, Result};
use crate::utils::{FromU32, parse_row};

/// 単語のパラメータ
#[derive(Clone, Copy, Eq, PartialEq, Debug, Archive, Serialize, Deserialize)]
pub struct WordParam {
    /// 出現頻度（常に正）
    pub freq: u64,
}

impl WordParam {
    /// 新しいインスタンスを作成します。
    #[inline(always)]
    pub const fn new(freq: u64) -> Self {
        Self { freq }
    }
}

/// 単語の語彙情報
///
/// 単語IDは表層形の辞書順に振られます。
pub struct Lexicon {
    trie: Trie,
    words: Vec<String>,
    params: Vec<WordParam>,
    lex_type: LexType,
    total_freq: u64,
    max_word_len: usize,
}

/// [`Lexicon`]のシリアライズ用表現
///
/// トライは読み込み時に単語列から再構築されます。
#[derive(Archive, Serialize, Deserialize)]
pub struct LexiconData {
    words: Vec<String>,
    params: Vec<WordParam>,
}

impl Lexicon {
    /// 入力文字列の共通接頭辞に一致する単語を返すイテレータを取得します。
    ///
    /// 一致は短い順に返されます。
    ///
    /// # 引数
    ///
    /// * `input` - 入力文字列
    ///
    /// # 戻り値
    ///
    /// 一致する単語のイテレータ
    #[inline(always)]
    pub fn common_prefix_iterator<'a>(
        &'a self,
        input: &'a [char],
    ) -> impl Iterator<Item = LexMatch> + 'a {
        self.trie.common_prefix_iterator(input).map(move |m| {
            LexMatch::new(self.params[usize::from_u32(m.value)], self.lex_type, m.end_char)
        })
    }

    /// 完全一致する単語のパラメータを取得します。
    ///
    /// # 引数
    ///
    /// * `input` - 検索する単語のコードポイント列
    ///
    /// # 戻り値
    ///
    /// 単語が登録されていれば `Some(WordParam)`
    #[inline(always)]
    pub fn exact_match<I>(&self, input: I) -> Option<WordParam>
    where
        I: IntoIterator<Item = char>,
    {
        self.trie
            .exact_match(input)
            .map(|word_id| self.params[usize::from_u32(word_id)])
    }

    /// 登録されている単語数を返します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// 全単語の頻度の合計を返します。
    #[inline(always)]
    pub const fn total_freq(&self) -> u64 {
        self.total_freq
    }

    /// 最長の単語のコードポイント数を返します。
    #[inline(always)]
    pub const fn max_word_len(&self) -> usize {
        self.max_word_len
    }

    /// 表層形と頻度の組を単語ID順に列挙します。
    pub fn iter(&self) -> impl Iterator<Item = (&str, WordParam)> + '_ {
        self.words
            .iter()
            .map(String::as_str)
            .zip(self.params.iter().copied())
    }

    /// エントリのリストから新しいインスタンスを構築します。
    ///
    /// 同じ表層形のエントリが複数ある場合、後のものが優先されます。
    ///
    /// # 引数
    ///
    /// * `entries` - 頻度が確定した単語エントリ
    /// * `lex_type` - 辞書の種類
    ///
    /// # エラー
    ///
    /// 頻度が0のエントリがある場合は [`HansegError::DictionaryInconsistent`]、
    /// 有効なエントリが1つもない場合は [`HansegError::InvalidArgument`] を返します。
    pub fn from_entries<I, S>(entries: I, lex_type: LexType) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self::try_from_entries(entries, lex_type)?.ok_or_else(|| {
            HansegError::invalid_argument("entries", "The lexicon must contain at least one word.")
        })
    }

    /// [`Self::from_entries`]と同じですが、有効なエントリが1つもない場合は
    /// `Ok(None)` を返します。
    ///
    /// # エラー
    ///
    /// 頻度が0のエントリがある場合、または頻度の合計がオーバーフローする場合に
    /// エラーを返します。
    pub(crate) fn try_from_entries<I, S>(entries: I, lex_type: LexType) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut merged = BTreeMap::new();
        for (surface, freq) in entries {
            let surface = surface.into();
            if freq == 0 {
                return Err(HansegError::inconsistent(surface, 0));
            }
            if surface.is_empty() {
                log::warn!("[hanseg] Skipped an empty surface");
                continue;
            }
            if surface.contains(RESERVED_CHAR) {
                log::warn!("[hanseg] Skipped a word with a reserved codepoint: {surface:?}");
                continue;
            }
            merged.insert(surface, WordParam::new(freq));
        }
        if merged.is_empty() {
            return Ok(None);
        }
        let (words, params): (Vec<_>, Vec<_>) = merged.into_iter().unzip();
        Self::from_parts(words, params, lex_type).map(Some)
    }

    fn from_parts(words: Vec<String>, params: Vec<WordParam>, lex_type: LexType) -> Result<Self> {
        let records = words
            .iter()
            .enumerate()
            .map(|(i, w)| Ok((w.as_str(), u32::try_from(i)?)))
            .collect::<Result<Vec<_>>>()?;
        let trie = Trie::from_records(&records)?;
        let total_freq = params
            .iter()
            .try_fold(0u64, |acc, p| acc.checked_add(p.freq))
            .ok_or_else(|| HansegError::invalid_argument("entries", "The total frequency overflows."))?;
        let max_word_len = words.iter().map(|w| w.chars().count()).max().unwrap_or(0);
        Ok(Self {
            trie,
            words,
            params,
            lex_type,
            total_freq,
            max_word_len,
        })
    }

    /// シリアライズ用の表現に変換します。
    pub fn to_data(&self) -> LexiconData {
        LexiconData {
            words: self.words.clone(),
            params: self.params.clone(),
        }
    }

    /// シリアライズ用の表現から語彙を復元します。
    ///
    /// # エラー
    ///
    /// データが壊れている（長さの不一致、重複、頻度0など）場合にエラーを返します。
    pub fn from_data(data: LexiconData, lex_type: LexType) -> Result<Self> {
        if data.words.len() != data.params.len() {
            return Err(HansegError::invalid_state(
                "The lexicon data is corrupted",
                "the numbers of words and parameters mismatch",
            ));
        }
        if let Some(i) = data.params.iter().position(|p| p.freq == 0) {
            return Err(HansegError::inconsistent(data.words[i].clone(), 0));
        }
        Self::from_parts(data.words, data.params, lex_type)
    }

    /// テキスト形式の辞書から新しいインスタンスを構築します。
    ///
    /// 各行は `単語 頻度 [品詞]` の形式で、頻度は必須です。
    ///
    /// # 引数
    ///
    /// * `rdr` - 辞書ファイルのリーダー
    /// * `lex_type` - 辞書の種類
    ///
    /// # エラー
    ///
    /// ファイルフォーマットが不正な場合、または頻度が0以下の場合にエラーを返します。
    pub fn from_reader<R>(mut rdr: R, lex_type: LexType) -> Result<Self>
    where
        R: Read,
    {
        let mut buf = String::new();
        rdr.read_to_string(&mut buf)?;

        let entries = Self::parse_text(&buf, "dict")?;
        let mut resolved = Vec::with_capacity(entries.len());
        for e in entries {
            let Some(freq) = e.freq else {
                return Err(HansegError::invalid_format(
                    "dict",
                    format!("line {}: the frequency is missing for {:?}", e.line, e.surface),
                ));
            };
            resolved.push((e.surface, freq));
        }
        Self::from_entries(resolved, lex_type)
    }

    /// テキスト形式の辞書を行ごとに解析します。
    ///
    /// 2番目のフィールドが整数として解釈できればそれを頻度とし、
    /// そうでなければ品詞として無視します。
    ///
    /// # 引数
    ///
    /// * `text` - 辞書全体のテキスト
    /// * `name` - エラーメッセージに使うフォーマット名
    ///
    /// # エラー
    ///
    /// 頻度が0以下の場合は [`HansegError::DictionaryInconsistent`] を返します。
    pub(crate) fn parse_text(text: &str, name: &'static str) -> Result<Vec<RawWordEntry>> {
        let mut entries = vec![];
        for (i, line) in text.lines().enumerate() {
            let line = line.strip_prefix('\u{feff}').unwrap_or(line);
            let mut fields = parse_row(line, b' ', name)?.into_iter();
            let Some(surface) = fields.next() else {
                continue;
            };
            let freq = match fields.next().map(|f| f.parse::<i64>()) {
                Some(Ok(freq)) if freq <= 0 => {
                    return Err(HansegError::inconsistent(surface, freq));
                }
                Some(Ok(freq)) => Some(u64::try_from(freq)?),
                Some(Err(_)) | None => None,
            };
            entries.push(RawWordEntry {
                surface,
                freq,
                line: i + 1,
            });
        }
        Ok(entries)
    }
}

/// 語彙マッチング結果
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct LexMatch {
    pub word_param: WordParam,
    pub lex_type: LexType,
    pub end_char: usize,
}

impl LexMatch {
    /// 新しいマッチング結果を作成します。
    #[inline(always)]
    pub const fn new(word_param: WordParam, lex_type: LexType, end_char: usize) -> Self {
        Self {
            word_param,
            lex_type,
            end_char,
        }
    }
}

/// 生の単語エントリ
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RawWordEntry {
    pub surface: String,
    pub freq: Option<u64>,
    pub line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_prefix_iterator() {
        let lexicon = Lexicon::from_entries(
            [("南京", 5), ("南京市", 3), ("市长", 2)],
            LexType::System,
        )
        .unwrap();
        let input: Vec<_> = "南京市长".chars().collect();
        let mut it = lexicon.common_prefix_iterator(&input);
        assert_eq!(
            it.next().unwrap(),
            LexMatch::new(WordParam::new(5), LexType::System, 2)
        );
        assert_eq!(
            it.next().unwrap(),
            LexMatch::new(WordParam::new(3), LexType::System, 3)
        );
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_stats() {
        let lexicon =
            Lexicon::from_entries([("南京", 5), ("长江大桥", 3), ("市", 2)], LexType::User)
                .unwrap();
        assert_eq!(lexicon.len(), 3);
        assert_eq!(lexicon.total_freq(), 10);
        assert_eq!(lexicon.max_word_len(), 4);
    }

    #[test]
    fn test_later_entry_wins() {
        let lexicon =
            Lexicon::from_entries([("云", 5), ("计算", 3), ("云", 9)], LexType::System).unwrap();
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.exact_match("云".chars()), Some(WordParam::new(9)));
        assert_eq!(lexicon.total_freq(), 12);
    }

    #[test]
    fn test_zero_frequency() {
        let result = Lexicon::from_entries([("云", 0)], LexType::System);
        assert!(matches!(
            result,
            Err(HansegError::DictionaryInconsistent { freq: 0, .. })
        ));
    }

    #[test]
    fn test_empty_lexicon() {
        let result = Lexicon::from_entries(Vec::<(String, u64)>::new(), LexType::System);
        assert!(matches!(result, Err(HansegError::InvalidArgument(_))));
    }

    #[test]
    fn test_from_reader() {
        let data = "北京 100 ns\n\n大学 20\n";
        let lex = Lexicon::from_reader(data.as_bytes(), LexType::System).unwrap();
        assert_eq!(lex.exact_match("北京".chars()), Some(WordParam::new(100)));
        assert_eq!(lex.exact_match("大学".chars()), Some(WordParam::new(20)));
        assert_eq!(lex.total_freq(), 120);
    }

    #[test]
    fn test_from_reader_missing_freq() {
        let data = "北京 100\n大学 n";
        let result = Lexicon::from_reader(data.as_bytes(), LexType::System);
        assert!(matches!(result, Err(HansegError::InvalidFormat(_))));
    }

    #[test]
    fn test_from_reader_negative_freq() {
        let data = "北京 -3";
        let result = Lexicon::from_reader(data.as_bytes(), LexType::System);
        assert!(matches!(
            result,
            Err(HansegError::DictionaryInconsistent { freq: -3, .. })
        ));
    }

    #[test]
    fn test_parse_text_optional_freq() {
        let entries = Lexicon::parse_text("云计算\n韩玉鉴赏 n\n蓝翔 8 nz", "user").unwrap();
        assert_eq!(
            entries,
            vec![
                RawWordEntry { surface: "云计算".into(), freq: None, line: 1 },
                RawWordEntry { surface: "韩玉鉴赏".into(), freq: None, line: 2 },
                RawWordEntry { surface: "蓝翔".into(), freq: Some(8), line: 3 },
            ]
        );
    }

    #[test]
    fn test_data_roundtrip_keeps_order() {
        let lex = Lexicon::from_entries([("b", 1), ("a", 2)], LexType::System).unwrap();
        let restored = Lexicon::from_data(lex.to_data(), LexType::System).unwrap();
        let words: Vec<_> = restored.iter().collect();
        assert_eq!(words, vec![("a", WordParam::new(2)), ("b", WordParam::new(1))]);
    }

    #[test]
    fn test_all_entries_skipped() {
        let entries = [(String::new(), 3), (format!("a{RESERVED_CHAR}b"), 2)];
        let result = Lexicon::try_from_entries(entries, LexType::User);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_total_frequency_overflow() {
        let max = i64::MAX as u64;
        let entries = [("a", max), ("b", max), ("c", max)];
        let result = Lexicon::try_from_entries(entries, LexType::User);
        assert!(matches!(result, Err(HansegError::InvalidArgument(_))));
    }
}
