//! 辞書構築のためのビルダー
//!
//! このモジュールは、テキスト形式の辞書とHMMモデルから [`DictionaryInner`] を構築するための
//! ビルダーを提供します。

use std::io::Read;
use std::str::FromStr;

use crate::dictionary::hmm::HmmModel;
use crate::dictionary::{DictionaryInner, LexType, Lexicon};
use crate::errors::Result;

/// 頻度が指定されていないユーザー単語に与える重み
///
/// システム辞書の頻度分布から値を決めます。
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub enum UserWordWeight {
    /// システム辞書の最小頻度
    Min,
    /// システム辞書の頻度の中央値
    #[default]
    Median,
    /// システム辞書の最大頻度
    Max,
}

impl UserWordWeight {
    /// 語彙の頻度分布から重みを決定します。
    pub(crate) fn resolve(self, lexicon: &Lexicon) -> u64 {
        let mut freqs: Vec<u64> = lexicon.iter().map(|(_, p)| p.freq).collect();
        freqs.sort_unstable();
        let picked = match self {
            Self::Min => freqs.first(),
            Self::Median => freqs.get(freqs.len() / 2),
            Self::Max => freqs.last(),
        };
        picked.copied().unwrap_or(1)
    }
}

impl FromStr for UserWordWeight {
    type Err = &'static str;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "min" => Ok(Self::Min),
            "median" => Ok(Self::Median),
            "max" => Ok(Self::Max),
            _ => Err("Could not parse a user word weight"),
        }
    }
}

/// システム辞書エントリから [`DictionaryInner`] を構築するビルダー
pub struct SystemDictionaryBuilder {}

impl SystemDictionaryBuilder {
    /// パース済みのエントリとHMMモデルから `DictionaryInner` を構築します。
    ///
    /// # 引数
    ///
    /// * `entries` - 単語と頻度の組。同じ単語が複数回現れた場合は後のものが優先されます。
    /// * `hmm` - 未知語認識用のHMMモデル
    ///
    /// # エラー
    ///
    /// 頻度が0のエントリがある場合や、エントリが空の場合にエラーを返します。
    pub fn from_entries<I, S>(entries: I, hmm: HmmModel) -> Result<DictionaryInner>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let system_lexicon = Lexicon::from_entries(entries, LexType::System)?;
        DictionaryInner::new(system_lexicon, None, hmm)
    }

    /// テキスト形式のソースから新しい [`DictionaryInner`] を作成します。
    ///
    /// # 引数
    ///
    ///  - `system_lexicon_rdr`: 辞書ファイル（`単語 頻度 [品詞]`）のリーダー
    ///  - `hmm_rdr`: HMMモデルファイルのリーダー
    ///
    /// # エラー
    ///
    /// 入力フォーマットが不正な場合に [`HansegError`](crate::errors::HansegError) を返します。
    pub fn from_readers<S, H>(system_lexicon_rdr: S, hmm_rdr: H) -> Result<DictionaryInner>
    where
        S: Read,
        H: Read,
    {
        let system_lexicon = Lexicon::from_reader(system_lexicon_rdr, LexType::System)?;
        let hmm = HmmModel::from_reader(hmm_rdr)?;
        log::debug!(
            "[hanseg] Loaded {} system words (total frequency {})",
            system_lexicon.len(),
            system_lexicon.total_freq(),
        );
        DictionaryInner::new(system_lexicon, None, hmm)
    }
}

impl DictionaryInner {
    /// 複数のリーダーからユーザー辞書をリセットします。
    ///
    /// ユーザー辞書は `単語 [頻度] [品詞]` 形式のテキストで、指定した順にマージされます。
    /// 同じ単語が複数回現れた場合は後のものが優先され、システム辞書の同じ単語も上書きします。
    /// 頻度のない単語には `weight` で決まる頻度が与えられます。
    ///
    /// # 引数
    ///
    /// * `rdrs` - ユーザー辞書のリーダー列。空の場合、ユーザー辞書が削除されます。
    /// * `weight` - 頻度のない単語に与える重み
    ///
    /// # エラー
    ///
    /// 読み込みに失敗した場合、または頻度が0以下の単語がある場合にエラーを返します。
    pub fn reset_user_lexicon_from_readers<I, R>(self, rdrs: I, weight: UserWordWeight) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: Read,
    {
        let mut entries = vec![];
        for mut rdr in rdrs {
            let mut buf = String::new();
            rdr.read_to_string(&mut buf)?;
            entries.extend(
                Lexicon::parse_text(&buf, "user_dict")?
                    .into_iter()
                    .map(|e| (e.surface, e.freq)),
            );
        }
        self.reset_user_lexicon_from_entries(entries, weight)
    }

    /// パース済みのエントリからユーザー辞書をリセットします。
    ///
    /// # 引数
    ///
    /// * `entries` - 単語と省略可能な頻度の組
    /// * `weight` - 頻度のない単語に与える重み
    ///
    /// # エラー
    ///
    /// 頻度0の単語がある場合に [`HansegError::DictionaryInconsistent`](crate::errors::HansegError::DictionaryInconsistent) を、
    /// 頻度の合計がオーバーフローする場合に [`HansegError::InvalidArgument`](crate::errors::HansegError::InvalidArgument) を返します。
    pub fn reset_user_lexicon_from_entries<I, S>(mut self, entries: I, weight: UserWordWeight) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Option<u64>)>,
        S: Into<String>,
    {
        let default_freq = weight.resolve(self.system_lexicon());
        let entries: Vec<(String, u64)> = entries
            .into_iter()
            .map(|(s, f)| (s.into(), f.unwrap_or(default_freq)))
            .collect();

        // None when every entry was skipped.
        let user_lexicon = Lexicon::try_from_entries(entries, LexType::User)?;
        if let Some(user_lexicon) = &user_lexicon {
            log::debug!("[hanseg] Loaded {} user words", user_lexicon.len());
        }
        self.set_user_lexicon(user_lexicon)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::errors::HansegError;
    use crate::test_utils::HMM_MODEL;

    fn hmm() -> HmmModel {
        HmmModel::from_reader(HMM_MODEL.as_bytes()).unwrap()
    }

    #[test]
    fn test_user_word_weight() {
        let lexicon = Lexicon::from_entries(
            [("a", 5), ("b", 1), ("c", 9), ("d", 3)],
            LexType::System,
        )
        .unwrap();
        assert_eq!(UserWordWeight::Min.resolve(&lexicon), 1);
        assert_eq!(UserWordWeight::Median.resolve(&lexicon), 5);
        assert_eq!(UserWordWeight::Max.resolve(&lexicon), 9);
    }

    #[test]
    fn test_user_overrides_system() {
        let dict = SystemDictionaryBuilder::from_entries([("云", 10), ("计算", 30)], hmm())
            .unwrap()
            .reset_user_lexicon_from_readers(
                ["云计算\n计算 5".as_bytes()],
                UserWordWeight::Max,
            )
            .unwrap();
        // 10 + 5 (overridden) + 30 (default weight)
        assert_eq!(dict.total_freq(), 45);
        assert_eq!(dict.max_word_len(), 3);
        assert_eq!(dict.frequency("计算").unwrap(), 5);
        assert_eq!(dict.frequency("云计算").unwrap(), 30);
    }

    #[test]
    fn test_later_user_dict_wins() {
        let dict = SystemDictionaryBuilder::from_entries([("云", 10)], hmm())
            .unwrap()
            .reset_user_lexicon_from_readers(
                ["云计算 7".as_bytes(), "云计算 2".as_bytes()],
                UserWordWeight::Median,
            )
            .unwrap();
        assert_eq!(dict.frequency("云计算").unwrap(), 2);
    }

    #[test]
    fn test_reset_to_none() {
        let dict = SystemDictionaryBuilder::from_entries([("云", 10)], hmm())
            .unwrap()
            .reset_user_lexicon_from_readers(["云计算 7".as_bytes()], UserWordWeight::Median)
            .unwrap()
            .reset_user_lexicon_from_readers(Vec::<&[u8]>::new(), UserWordWeight::Median)
            .unwrap();
        assert!(dict.user_lexicon().is_none());
        assert_eq!(dict.total_freq(), 10);
    }

    #[test]
    fn test_zero_user_frequency() {
        let result = SystemDictionaryBuilder::from_entries([("云", 10)], hmm())
            .unwrap()
            .reset_user_lexicon_from_readers(["云计算 0".as_bytes()], UserWordWeight::Median);
        assert!(matches!(
            result,
            Err(HansegError::DictionaryInconsistent { .. })
        ));
    }

    #[test]
    fn test_user_frequency_overflow() {
        let result = SystemDictionaryBuilder::from_entries([("云", 10)], hmm())
            .unwrap()
            .reset_user_lexicon_from_readers(
                ["云计算 9223372036854775807\n网易 9223372036854775807\n杭研 9223372036854775807".as_bytes()],
                UserWordWeight::Median,
            );
        assert!(matches!(result, Err(HansegError::InvalidArgument(_))));
    }

    #[test]
    fn test_skipped_user_words() {
        let dict = SystemDictionaryBuilder::from_entries([("云", 10)], hmm())
            .unwrap()
            .reset_user_lexicon_from_entries([("", Some(3))], UserWordWeight::Median)
            .unwrap();
        assert!(dict.user_lexicon().is_none());
        assert_eq!(dict.total_freq(), 10);
    }

    #[test]
    fn test_from_readers() {
        let dict = SystemDictionaryBuilder::from_readers(
            "北京 100 ns\n大学 20 n\n".as_bytes(),
            HMM_MODEL.as_bytes(),
        )
        .unwrap();
        assert_eq!(dict.total_freq(), 120);
        assert_eq!(dict.max_word_len(), 2);
    }
}
