//! トークンの結果コンテナ
//!
//! このモジュールは、分かち書きの結果として得られるトークンを表現する型を提供します。
//! トークンは入力文への参照を保持し、表層形、位置情報、語彙種別へのアクセスを提供します。

use std::ops::Range;

use crate::dictionary::LexType;
use crate::segmenter::Span;
use crate::segmenter::worker::Worker;

/// 分かち書きの結果トークン
///
/// このトークンは[`Worker`]への軽量な参照であり、実際のデータは
/// Workerが保持しています。トークンはWorkerが生存している間のみ有効です。
pub struct Token<'w> {
    worker: &'w Worker,
    index: usize,
}

impl<'w> Token<'w> {
    #[inline(always)]
    pub(crate) const fn new(worker: &'w Worker, index: usize) -> Self {
        Self { worker, index }
    }

    #[inline(always)]
    fn span(&self) -> &'w Span {
        &self.worker.tokens[self.index]
    }

    /// トークンの文字単位の位置範囲を取得します。
    ///
    /// # 戻り値
    ///
    /// トークンの開始位置から終了位置までのコードポイント単位の範囲を返します。
    #[inline(always)]
    pub fn range_char(&self) -> Range<usize> {
        let span = self.span();
        span.start..span.end
    }

    /// トークンのバイト単位の位置範囲を取得します。
    ///
    /// # 戻り値
    ///
    /// 元の入力文字列におけるバイト単位の範囲を返します。
    #[inline(always)]
    pub fn range_byte(&self) -> Range<usize> {
        let sent = &self.worker.sent;
        let span = self.span();
        sent.byte_position(span.start)..sent.byte_position(span.end)
    }

    /// トークンの表層形（元のテキスト中の文字列）を取得します。
    #[inline(always)]
    pub fn surface(&self) -> &'w str {
        let sent = &self.worker.sent;
        &sent.raw()[self.range_byte()]
    }

    /// トークンが由来する辞書のタイプを取得します。
    ///
    /// # 戻り値
    ///
    /// システム辞書、ユーザー辞書、未知語のいずれかを示す[`LexType`]を返します。
    #[inline(always)]
    pub fn lex_type(&self) -> LexType {
        self.span().lex_type
    }

    /// このトークンビューを所有型の[`TokenBuf`]に変換します。
    ///
    /// # 戻り値
    ///
    /// このトークンのすべての情報を含む所有型の[`TokenBuf`]を返します。
    /// スレッド間でトークン情報を送信したり、長期保存する際に有用です。
    pub fn to_buf(&self) -> TokenBuf {
        TokenBuf {
            surface: self.surface().to_string(),
            range_char: self.range_char(),
            range_byte: self.range_byte(),
            lex_type: self.lex_type(),
        }
    }
}

impl std::fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("surface", &self.surface())
            .field("range_char", &self.range_char())
            .field("range_byte", &self.range_byte())
            .field("lex_type", &self.lex_type())
            .finish()
    }
}

/// トークンのイテレータ
///
/// 前方および後方からの走査をサポートしています（[`DoubleEndedIterator`]を実装）。
pub struct TokenIter<'w> {
    worker: &'w Worker,
    front: usize,
    back: usize,
}

impl<'w> TokenIter<'w> {
    #[inline(always)]
    pub(crate) fn new(worker: &'w Worker) -> Self {
        let num_tokens = worker.num_tokens();
        Self {
            worker,
            front: 0,
            back: num_tokens,
        }
    }
}

impl<'w> Iterator for TokenIter<'w> {
    type Item = Token<'w>;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            let t = self.worker.token(self.front);
            self.front += 1;
            Some(t)
        } else {
            None
        }
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<'w> DoubleEndedIterator for TokenIter<'w> {
    #[inline(always)]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            self.back -= 1;
            let t = self.worker.token(self.back);
            Some(t)
        } else {
            None
        }
    }
}

impl ExactSizeIterator for TokenIter<'_> {}

/// 所有型の自己完結したトークン
///
/// このトークンは[`Token`]の所有型版です。分かち書きの結果を長期保存したり、
/// スレッド間で送信する際に有用です。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBuf {
    /// トークンの表層形（元のテキスト中の文字列）
    pub surface: String,

    /// トークンのコードポイント単位の位置範囲
    pub range_char: Range<usize>,

    /// トークンのバイト単位の位置範囲
    pub range_byte: Range<usize>,

    /// トークンが由来する辞書のタイプ
    pub lex_type: LexType,
}

impl TokenBuf {
    /// 元の入力文字列におけるバイト長を返します。
    #[inline(always)]
    pub fn byte_len(&self) -> usize {
        self.range_byte.len()
    }
}

impl<'w> From<Token<'w>> for TokenBuf {
    fn from(token: Token<'w>) -> Self {
        token.to_buf()
    }
}
