//! 辞書DAGとHMMに基づく分かち書き器。
//!
//! このモジュールは、中国語テキストを単語列に分割するメインの分かち書き器を提供します。
//!
//! # 主要な構造体
//!
//! - [`Segmenter`]: 辞書とオプションを保持する分かち書き器
//! - [`Worker`]: 分かち書き器のワーカー。実際の解析処理を行う
//!
//! # 分割モード
//!
//! [`CutMode`]で以下のモードを選択できます。
//!
//! - `MaxProb`: 辞書DAG上の最大確率パス。辞書にないASCIIの一文字語の連続は規則でまとめます
//! - `Hmm`: HMMのみによる分割
//! - `Mix`: 最大確率パスに、辞書が一文字語しか与えなかった区間のHMM分割を組み合わせたもの
//! - `Full`: 辞書に一致するすべての部分文字列
//! - `Query`: `Mix`の結果の長い語をさらに辞書中の2文字語・3文字語に分解したもの
//!
//! # 例
//!
//! ```no_run
//! use hanseg::{CutMode, Dictionary, Segmenter};
//!
//! let dict = Dictionary::from_path("path/to/system.dic")?;
//! let segmenter = Segmenter::new(dict);
//! let mut worker = segmenter.new_worker();
//!
//! worker.reset_sentence("他来到了网易杭研大厦");
//! worker.cut(CutMode::Mix);
//!
//! for token in worker.token_iter() {
//!     println!("{}", token.surface());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub(crate) mod dag;
pub(crate) mod hmm;
pub mod worker;

use std::str::FromStr;
use std::sync::Arc;

use crate::Dictionary;
use crate::dictionary::{DictionaryInner, LexType};
use crate::errors::Result;
use crate::segmenter::worker::Worker;
use crate::token::TokenBuf;

/// 分割モード
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default)]
pub enum CutMode {
    /// 辞書DAG上の最大確率パス
    ///
    /// 辞書にないASCIIの一文字語の連続は英数字の規則でまとめます。
    MaxProb,
    /// HMMのみによる分割
    Hmm,
    /// 最大確率パスとHMMの組み合わせ
    #[default]
    Mix,
    /// 辞書に一致するすべての語の列挙
    Full,
    /// 検索クエリ向けの分割
    Query,
}

impl FromStr for CutMode {
    type Err = &'static str;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "mp" | "maxprob" => Ok(Self::MaxProb),
            "hmm" => Ok(Self::Hmm),
            "mix" => Ok(Self::Mix),
            "full" => Ok(Self::Full),
            "query" => Ok(Self::Query),
            _ => Err("Could not parse a cut mode"),
        }
    }
}

/// 1回の分割に適用するオプション
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct CutOptions {
    /// 辞書語の最大長（コードポイント数）。`None`の場合は辞書の最大単語長を使います。
    ///
    /// `Some(0)`を指定すると、最大確率パスはすべて一文字語になります。
    pub max_word_len: Option<usize>,

    /// `Mix`と`Query`で未知語区間にHMMを使うかどうか
    pub hmm: bool,
}

impl Default for CutOptions {
    fn default() -> Self {
        Self {
            max_word_len: None,
            hmm: true,
        }
    }
}

/// 文字位置で表した分割結果の区間
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub(crate) struct Span {
    pub start: usize,
    pub end: usize,
    pub lex_type: LexType,
}

impl Span {
    #[inline(always)]
    pub const fn new(start: usize, end: usize, lex_type: LexType) -> Self {
        Self {
            start,
            end,
            lex_type,
        }
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }
}

/// 区間`start..end`の語を辞書で引き、語彙種別付きの区間を作ります。
pub(crate) fn span_of(dict: &DictionaryInner, chars: &[char], start: usize, end: usize) -> Span {
    let lex_type = dict
        .exact_match(&chars[start..end])
        .map_or(LexType::Unknown, |(_, lex_type)| lex_type);
    Span::new(start, end, lex_type)
}

/// 中国語テキストの分かち書き器。
///
/// 辞書への共有参照と既定のオプションを保持し、複数の[`Worker`]を生成できます。
/// 辞書は読み取り専用のため、ワーカーは別々のスレッドで並列に使用できます。
///
/// # 例
///
/// ```no_run
/// use hanseg::{Dictionary, Segmenter};
///
/// let dict = Dictionary::from_path("path/to/system.dic")?;
/// let segmenter = Segmenter::new(dict).hmm(false).max_word_len(4);
/// let mut worker = segmenter.new_worker();
///
/// worker.reset_sentence("南京市长江大桥");
/// worker.cut(segmenter.default_mode());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct Segmenter {
    dict: Arc<Dictionary>,
    options: CutOptions,
    mode: CutMode,
}

impl Segmenter {
    /// 新しい分かち書き器を作成します。
    ///
    /// 辞書は分かち書き器に所有権が移動します。複数の分かち書き器間で辞書を共有する
    /// 必要がある場合は、[`Segmenter::from_shared_dictionary`]を使用してください。
    ///
    /// # 引数
    ///
    /// * `dict` - 分割に使用する辞書
    pub fn new(dict: Dictionary) -> Self {
        Self::from_shared_dictionary(Arc::new(dict))
    }

    /// `DictionaryInner`から新しい分かち書き器を作成します。
    pub fn from_inner(dict: DictionaryInner) -> Self {
        Self::new(Dictionary::from_inner(dict))
    }

    /// 共有された辞書から新しい分かち書き器を作成します。
    ///
    /// 辞書を差し替える場合は、新しい辞書で分かち書き器を作り直してください。
    /// 既存のワーカーは古い辞書を参照し続けます。
    ///
    /// # 例
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use hanseg::{Dictionary, Segmenter};
    ///
    /// let dict = Arc::new(Dictionary::from_path("path/to/system.dic")?);
    /// let segmenter1 = Segmenter::from_shared_dictionary(dict.clone());
    /// let segmenter2 = Segmenter::from_shared_dictionary(dict);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_shared_dictionary(dict: Arc<Dictionary>) -> Self {
        Self {
            dict,
            options: CutOptions::default(),
            mode: CutMode::default(),
        }
    }

    /// 未知語区間にHMMを使うかどうかを設定します。
    ///
    /// デフォルトは`true`です。
    pub const fn hmm(mut self, yes: bool) -> Self {
        self.options.hmm = yes;
        self
    }

    /// 辞書語の最大長（コードポイント数）を指定します。
    ///
    /// デフォルトは辞書の最大単語長です。`0`を指定すると、
    /// 最大確率パスはすべて一文字語になります。
    ///
    /// # 引数
    ///
    /// * `max_word_len` - 辞書語の最大長
    pub const fn max_word_len(mut self, max_word_len: usize) -> Self {
        self.options.max_word_len = Some(max_word_len);
        self
    }

    /// [`Segmenter::cut`]の外で使う既定の分割モードを設定します。
    pub const fn mode(mut self, mode: CutMode) -> Self {
        self.mode = mode;
        self
    }

    /// 既定の分割モードを返します。
    pub const fn default_mode(&self) -> CutMode {
        self.mode
    }

    /// 既定のオプションを返します。
    pub const fn options(&self) -> CutOptions {
        self.options
    }

    /// 辞書への参照を取得します。
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// 新しいワーカーを作成します。
    ///
    /// 各ワーカーは独立した作業領域を保持するため、複数のワーカーを
    /// 並列に使用して同時に複数の文を解析できます。
    pub fn new_worker(&self) -> Worker {
        Worker::new(self.clone())
    }

    /// 文字列を分割し、所有型のトークン列を返します。
    ///
    /// 繰り返し分割する場合は、作業領域を再利用できる[`Worker`]を使用してください。
    ///
    /// # 例
    ///
    /// ```no_run
    /// use hanseg::{CutMode, Dictionary, Segmenter};
    ///
    /// let segmenter = Segmenter::new(Dictionary::from_path("path/to/system.dic")?);
    /// let words: Vec<String> = segmenter
    ///     .cut("南京市长江大桥", CutMode::MaxProb)
    ///     .into_iter()
    ///     .map(|t| t.surface)
    ///     .collect();
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn cut(&self, text: &str, mode: CutMode) -> Vec<TokenBuf> {
        let mut worker = self.new_worker();
        worker.reset_sentence(text);
        worker.cut(mode);
        worker.token_iter().map(|t| t.to_buf()).collect()
    }

    /// UTF-8のバイト列を分割し、所有型のトークン列を返します。
    ///
    /// # エラー
    ///
    /// 入力がUTF-8として不正な場合、[`HansegError::MalformedInput`]を返します。
    ///
    /// [`HansegError::MalformedInput`]: crate::errors::HansegError::MalformedInput
    pub fn cut_bytes(&self, bytes: &[u8], mode: CutMode) -> Result<Vec<TokenBuf>> {
        let text = std::str::from_utf8(bytes)?;
        Ok(self.cut(text, mode))
    }
}
