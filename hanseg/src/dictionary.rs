//! 分かち書きのための辞書モジュール。
//!
//! このモジュールは、分かち書きに必要な辞書データの読み込み、構築、管理を行います。
//! 主な機能として以下を提供します:
//!
//! - システム辞書とユーザー辞書の読み込みと重ね合わせ
//! - 未知語認識用HMMモデルの保持
//! - rkyv形式でのコンパイル済み辞書の書き出しと読み込み
//! - メモリマップドファイルとZstandard圧縮辞書からの読み込み
//!
//! # 辞書の読み込み方法
//!
//! - [`Dictionary::from_path`]: ファイルパスから辞書を読み込む(推奨)
//! - [`Dictionary::read`]: リーダーから辞書を読み込む
//! - [`Dictionary::from_zstd`]: Zstandard圧縮辞書を読み込む
//!
//! # 辞書のビルド
//!
//! [`SystemDictionaryBuilder`]を使用して、テキスト形式のソースデータから辞書を構築できます。
//!
//! 構築後の辞書は読み取り専用です。辞書を差し替える場合は、新しい辞書を構築してから
//! `Arc<Dictionary>` ごと置き換えてください。
pub mod builder;
pub mod hmm;
pub(crate) mod lexicon;

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use memmap2::Mmap;
use rkyv::rancor::Error;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::hmm::{HmmData, HmmModel};
use crate::dictionary::lexicon::{LexMatch, Lexicon, LexiconData, WordParam};
use crate::errors::{HansegError, Result};

pub use crate::dictionary::builder::{SystemDictionaryBuilder, UserWordWeight};

/// コンパイル済み辞書を識別するマジックバイト。
///
/// "0.1" はファイルフォーマットのバージョンで、クレートのバージョンとは独立しています。
pub const MODEL_MAGIC: &[u8] = b"HansegDictionaryRkyv 0.1\n";

const MODEL_MAGIC_LEN: usize = MODEL_MAGIC.len();
const RKYV_ALIGNMENT: usize = 16;
const PADDING_LEN: usize = (RKYV_ALIGNMENT - (MODEL_MAGIC_LEN % RKYV_ALIGNMENT)) % RKYV_ALIGNMENT;
const DATA_START: usize = MODEL_MAGIC_LEN + PADDING_LEN;

/// 単語が由来する語彙の種類。
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default)]
#[repr(u8)]
pub enum LexType {
    /// システム辞書。
    #[default]
    System,
    /// ユーザー辞書。
    User,
    /// 未知語。
    ///
    /// システム辞書にもユーザー辞書にも見つからない単語です。
    Unknown,
}

/// 重ね合わせた語彙全体の統計量
#[derive(Clone, Copy, Debug)]
struct LexiconStats {
    total_freq: u64,
    log_total: f64,
    max_word_len: usize,
}

/// [`Dictionary`]の内部データ。
///
/// システム辞書、ユーザー辞書、HMMモデルを保持します。
/// 統計量（総頻度、最大単語長）はユーザー辞書を重ねた状態で計算されます。
pub struct DictionaryInner {
    system_lexicon: Lexicon,
    user_lexicon: Option<Lexicon>,
    hmm: HmmModel,
    stats: LexiconStats,
}

/// コンパイル済み辞書のシリアライズ用表現
#[derive(Archive, Serialize, Deserialize)]
struct DictionaryData {
    system_lexicon: LexiconData,
    user_lexicon: Option<LexiconData>,
    hmm: HmmData,
}

impl DictionaryInner {
    pub(crate) fn new(
        system_lexicon: Lexicon,
        user_lexicon: Option<Lexicon>,
        hmm: HmmModel,
    ) -> Result<Self> {
        let stats = Self::compute_stats(&system_lexicon, user_lexicon.as_ref())?;
        Ok(Self {
            system_lexicon,
            user_lexicon,
            hmm,
            stats,
        })
    }

    /// ユーザー辞書を差し替え、統計量を再計算します。
    pub(crate) fn set_user_lexicon(&mut self, user_lexicon: Option<Lexicon>) -> Result<()> {
        self.stats = Self::compute_stats(&self.system_lexicon, user_lexicon.as_ref())?;
        self.user_lexicon = user_lexicon;
        Ok(())
    }

    fn compute_stats(system: &Lexicon, user: Option<&Lexicon>) -> Result<LexiconStats> {
        let mut total_freq = system.total_freq();
        let mut max_word_len = system.max_word_len();
        if let Some(user) = user {
            for (word, param) in user.iter() {
                if let Some(overridden) = system.exact_match(word.chars()) {
                    total_freq -= overridden.freq;
                }
                total_freq = total_freq.checked_add(param.freq).ok_or_else(|| {
                    HansegError::invalid_argument("user_lexicon", "The total frequency overflows.")
                })?;
            }
            max_word_len = max_word_len.max(user.max_word_len());
        }
        #[allow(clippy::cast_precision_loss)]
        let log_total = (total_freq as f64).ln();
        log::debug!("[hanseg] total frequency = {total_freq}, max word length = {max_word_len}");
        Ok(LexiconStats {
            total_freq,
            log_total,
            max_word_len,
        })
    }

    /// システム辞書を取得します。
    #[inline(always)]
    pub(crate) const fn system_lexicon(&self) -> &Lexicon {
        &self.system_lexicon
    }

    /// ユーザー辞書を取得します。
    #[inline(always)]
    pub(crate) const fn user_lexicon(&self) -> Option<&Lexicon> {
        self.user_lexicon.as_ref()
    }

    /// HMMモデルを取得します。
    #[inline(always)]
    pub(crate) const fn hmm(&self) -> &HmmModel {
        &self.hmm
    }

    /// ユーザー辞書を重ねた語彙全体の総頻度を返します。
    #[inline(always)]
    pub const fn total_freq(&self) -> u64 {
        self.stats.total_freq
    }

    /// ユーザー辞書を重ねた語彙全体の最大単語長（コードポイント数）を返します。
    #[inline(always)]
    pub const fn max_word_len(&self) -> usize {
        self.stats.max_word_len
    }

    /// 頻度を対数確率 `ln(freq / total)` に変換します。
    #[inline(always)]
    pub(crate) fn log_prob(&self, freq: u64) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let f = freq as f64;
        f.ln() - self.stats.log_total
    }

    /// 辞書にない1コードポイントの対数確率 `ln(1 / total)` を返します。
    #[inline(always)]
    pub(crate) fn unknown_log_prob(&self) -> f64 {
        -self.stats.log_total
    }

    /// コードポイント列に完全一致する単語を検索します。
    ///
    /// ユーザー辞書が優先されます。
    pub(crate) fn exact_match(&self, input: &[char]) -> Option<(WordParam, LexType)> {
        if let Some(param) = self
            .user_lexicon
            .as_ref()
            .and_then(|l| l.exact_match(input.iter().copied()))
        {
            return Some((param, LexType::User));
        }
        self.system_lexicon
            .exact_match(input.iter().copied())
            .map(|param| (param, LexType::System))
    }

    /// 入力の接頭辞に一致する単語を、長さ `max_len` 以下に限って `out` に追加します。
    ///
    /// 結果は終了位置の昇順に並び、同じ長さの単語はユーザー辞書のものが優先されます。
    pub(crate) fn common_prefix_matches(&self, input: &[char], max_len: usize, out: &mut Vec<LexMatch>) {
        let start = out.len();
        out.extend(
            self.system_lexicon
                .common_prefix_iterator(input)
                .take_while(|m| m.end_char <= max_len),
        );
        let Some(user) = &self.user_lexicon else {
            return;
        };
        let mut dirty = false;
        for m in user
            .common_prefix_iterator(input)
            .take_while(|m| m.end_char <= max_len)
        {
            match out[start..].iter().position(|e| e.end_char == m.end_char) {
                Some(i) => out[start + i] = m,
                None => {
                    out.push(m);
                    dirty = true;
                }
            }
        }
        if dirty {
            out[start..].sort_unstable_by_key(|m| m.end_char);
        }
    }

    /// 単語の頻度を返します。
    ///
    /// # エラー
    ///
    /// 辞書にない複数コードポイントの語に対しては [`HansegError::NotFound`] を返します。
    /// 辞書にない1コードポイントの語の頻度は1です。
    pub fn frequency(&self, text: &str) -> Result<u64> {
        let chars: Vec<char> = text.chars().collect();
        if let Some((param, _)) = self.exact_match(&chars) {
            return Ok(param.freq);
        }
        if chars.len() == 1 {
            Ok(1)
        } else {
            Err(HansegError::NotFound(text.to_string()))
        }
    }

    /// 辞書データを`rkyv`フォーマットでライターにシリアライズします。
    ///
    /// この関数の出力バイナリは、`Dictionary::read`や`Dictionary::from_path`が
    /// 期待する形式です。
    ///
    /// # エラー
    ///
    /// 書き込みまたはシリアライゼーションに失敗した場合にエラーを返します。
    pub fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        let data = DictionaryData {
            system_lexicon: self.system_lexicon.to_data(),
            user_lexicon: self.user_lexicon.as_ref().map(Lexicon::to_data),
            hmm: self.hmm.to_data(),
        };
        let bytes = rkyv::to_bytes::<Error>(&data).map_err(|e| {
            HansegError::invalid_state("rkyv serialization failed".to_string(), e.to_string())
        })?;

        wtr.write_all(MODEL_MAGIC)?;
        let padding_bytes = vec![0xFF; PADDING_LEN];
        wtr.write_all(&padding_bytes)?;
        wtr.write_all(&bytes)?;
        Ok(())
    }

    /// アライメント済みのバイト列からデータを検証・復元します。
    fn from_archived_bytes(bytes: &[u8]) -> Result<Self> {
        let data = rkyv::from_bytes::<DictionaryData, Error>(bytes).map_err(|e| {
            HansegError::invalid_state(
                "rkyv validation failed. The dictionary file may be corrupted or incompatible."
                    .to_string(),
                e.to_string(),
            )
        })?;
        let system_lexicon = Lexicon::from_data(data.system_lexicon, LexType::System)?;
        let user_lexicon = data
            .user_lexicon
            .map(|d| Lexicon::from_data(d, LexType::User))
            .transpose()?;
        let hmm = HmmModel::from_data(data.hmm)?;
        Self::new(system_lexicon, user_lexicon, hmm)
    }
}

/// 分かち書きのための読み取り専用辞書。
///
/// 複数のスレッドから `Arc<Dictionary>` として共有できます。
pub struct Dictionary {
    inner: DictionaryInner,
}

impl Dictionary {
    /// `DictionaryInner`から辞書を作成します。
    pub const fn from_inner(dict: DictionaryInner) -> Self {
        Self { inner: dict }
    }

    /// 内部データを取り出します。
    ///
    /// 読み込んだ辞書にユーザー辞書を重ねる場合に使用します。
    pub fn into_inner(self) -> DictionaryInner {
        self.inner
    }

    #[inline(always)]
    pub(crate) const fn inner(&self) -> &DictionaryInner {
        &self.inner
    }

    /// 辞書データを`rkyv`フォーマットを使用してライターにシリアライズします。
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use std::fs::File;
    /// use hanseg::{Dictionary, SystemDictionaryBuilder};
    ///
    /// let dict = SystemDictionaryBuilder::from_readers(
    ///     File::open("dict.txt")?,
    ///     File::open("hmm_model.txt")?,
    /// )?;
    /// let dict = Dictionary::from_inner(dict);
    ///
    /// let mut file = File::create("system.dic")?;
    /// dict.write(&mut file)?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # エラー
    ///
    /// - 基礎となる`writer`への書き込みに失敗した場合(例: I/Oエラー)。
    /// - `rkyv`シリアライゼーションプロセスでエラーが発生した場合。
    pub fn write<W>(&self, wtr: W) -> Result<()>
    where
        W: Write,
    {
        self.inner.write(wtr)
    }

    /// すべてのデータをヒープバッファに読み込むことで、リーダーから辞書を作成します。
    ///
    /// # 引数
    ///
    /// * `rdr` - `std::io::Read`を実装するリーダー。
    ///
    /// # エラー
    ///
    /// - データを読み込めない場合。
    /// - マジックナンバーが一致しない場合。
    /// - コンテンツが無効な場合。
    pub fn read<R: Read>(mut rdr: R) -> Result<Self> {
        let mut magic = [0; MODEL_MAGIC_LEN];
        rdr.read_exact(&mut magic)?;
        if magic != MODEL_MAGIC {
            return Err(HansegError::invalid_argument(
                "rdr",
                "The magic number of the input model mismatches.",
            ));
        }

        let mut padding_buf = vec![0; PADDING_LEN];
        rdr.read_exact(&mut padding_buf)?;

        let mut buffer = Vec::new();
        rdr.read_to_end(&mut buffer)?;

        let mut aligned_bytes = AlignedVec::<RKYV_ALIGNMENT>::with_capacity(buffer.len());
        aligned_bytes.extend_from_slice(&buffer);

        Ok(Self::from_inner(DictionaryInner::from_archived_bytes(
            &aligned_bytes,
        )?))
    }

    /// メモリマッピングを使用してファイルパスから辞書を作成します。
    ///
    /// # 引数
    ///
    /// - `path` - 辞書ファイルへのパス。
    ///
    /// # エラー
    ///
    /// - ファイルを開けない、または読み込めない場合。
    /// - ファイルが破損している、またはマジックナンバーが一致しない場合。
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            HansegError::invalid_argument("path", format!("Failed to open dictionary file: {}", e))
        })?;

        // SAFETY: the mapping is read-only and dropped before this function returns.
        let mmap = unsafe { Mmap::map(&file)? };

        if !mmap.starts_with(MODEL_MAGIC) {
            return Err(HansegError::invalid_argument(
                "path",
                "The magic number of the input model mismatches.",
            ));
        }
        let Some(data_bytes) = mmap.get(DATA_START..) else {
            return Err(HansegError::invalid_argument(
                "path",
                "Dictionary file too small or corrupted.",
            ));
        };

        Ok(Self::from_inner(DictionaryInner::from_archived_bytes(
            data_bytes,
        )?))
    }

    /// Zstandardで圧縮された辞書ファイルを読み込みます。
    ///
    /// # 引数
    ///
    /// - `path` - 圧縮された辞書ファイルへのパス。
    ///
    /// # エラー
    ///
    /// 展開または読み込みに失敗した場合にエラーを返します。
    pub fn from_zstd<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            HansegError::invalid_argument("path", format!("Failed to open dictionary file: {}", e))
        })?;
        let decoder = zstd::Decoder::new(file)?;
        Self::read(decoder)
    }

    /// 単語の頻度を返します。
    ///
    /// 辞書にない1コードポイントの語の頻度は1です。
    ///
    /// # エラー
    ///
    /// 辞書にない複数コードポイントの語に対しては [`HansegError::NotFound`] を返します。
    pub fn get_frequency(&self, text: &str) -> Result<u64> {
        self.inner.frequency(text)
    }

    /// 総頻度を返します。
    pub const fn total_frequency(&self) -> u64 {
        self.inner.total_freq()
    }

    /// 最大単語長（コードポイント数）を返します。
    pub const fn max_word_len(&self) -> usize {
        self.inner.max_word_len()
    }

    /// 単語が辞書（システムまたはユーザー）に登録されているかを返します。
    pub fn contains(&self, text: &str) -> bool {
        let chars: Vec<char> = text.chars().collect();
        self.inner.exact_match(&chars).is_some()
    }

    /// システム辞書とユーザー辞書を重ねた語彙の単語数を返します。
    pub fn num_words(&self) -> usize {
        let system = self.inner.system_lexicon();
        let added = self.inner.user_lexicon().map_or(0, |user| {
            user.iter()
                .filter(|(w, _)| system.exact_match(w.chars()).is_none())
                .count()
        });
        system.len() + added
    }

    /// ユーザー辞書の単語数を返します。
    pub fn num_user_words(&self) -> usize {
        self.inner.user_lexicon().map_or(0, Lexicon::len)
    }
}
