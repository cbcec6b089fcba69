//! 入力テキストの内部表現を提供するモジュール
//!
//! 入力文字列をコードポイント単位に分解し、バイト位置の対応表と文字種を保持します。
//! さらに、区切り文字（空白・句読点）で入力をブロックに分割します。
//! 区切り文字はそれぞれ1コードポイントのブロックとなり、
//! それ以外の連続するコードポイントが単語ブロックになります。

use std::ops::Range;

use crate::character::CharClass;

/// 入力文を分割したブロック
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Block {
    /// 開始文字位置
    pub start: usize,
    /// 終了文字位置（排他的）
    pub end: usize,
    /// 区切り文字のブロックかどうか
    pub separator: bool,
}

impl Block {
    #[inline(always)]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// 入力テキストの内部表現を保持する構造体
///
/// # フィールド
///
/// * `input` - 元の入力文字列
/// * `chars` - 入力文字列を文字単位に分割した配列
/// * `c2b` - 文字位置からバイト位置へのマッピング配列
/// * `classes` - 各文字の文字種
/// * `blocks` - 区切り文字で分割されたブロック列
#[derive(Default, Clone, Debug)]
pub struct Sentence {
    input: String,
    chars: Vec<char>,
    c2b: Vec<usize>,
    classes: Vec<CharClass>,
    blocks: Vec<Block>,
}

impl Sentence {
    /// 新しい空の `Sentence` インスタンスを生成します
    pub fn new() -> Self {
        Self::default()
    }

    /// 内部状態をクリアします
    ///
    /// 確保済みのバッファは再利用のために保持されます。
    #[inline(always)]
    pub fn clear(&mut self) {
        self.input.clear();
        self.chars.clear();
        self.c2b.clear();
        self.classes.clear();
        self.blocks.clear();
    }

    /// 入力文字列を設定します
    ///
    /// この時点では文字列の解析は行われません。解析を行うには [`compile`]
    /// を呼び出す必要があります。
    ///
    /// # 引数
    ///
    /// * `input` - 設定する入力文字列
    ///
    /// [`compile`]: Self::compile
    pub fn set_sentence<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.clear();
        self.input.push_str(input.as_ref());
    }

    /// 入力文字列を解析し、内部データ構造を構築します
    ///
    /// 1. 文字配列とバイト位置マッピングの計算
    /// 2. 各文字の文字種の計算
    /// 3. ブロック分割
    pub fn compile(&mut self) {
        self.compute_basic();
        self.compute_classes();
        self.compute_blocks();
    }

    fn compute_basic(&mut self) {
        for (bi, ch) in self.input.char_indices() {
            self.chars.push(ch);
            self.c2b.push(bi);
        }
        self.c2b.push(self.input.len());
    }

    fn compute_classes(&mut self) {
        self.classes.reserve(self.chars.len());
        for &c in &self.chars {
            self.classes.push(CharClass::of(c));
        }
    }

    fn compute_blocks(&mut self) {
        let mut start = 0;
        for (i, class) in self.classes.iter().enumerate() {
            if class.is_separator() {
                if start < i {
                    self.blocks.push(Block {
                        start,
                        end: i,
                        separator: false,
                    });
                }
                self.blocks.push(Block {
                    start: i,
                    end: i + 1,
                    separator: true,
                });
                start = i + 1;
            }
        }
        if start < self.chars.len() {
            self.blocks.push(Block {
                start,
                end: self.chars.len(),
                separator: false,
            });
        }
    }

    /// 元の入力文字列への参照を返します
    #[inline(always)]
    pub fn raw(&self) -> &str {
        &self.input
    }

    /// 文字配列への参照を返します
    #[inline(always)]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// 文字数を返します
    #[inline(always)]
    pub fn len_char(&self) -> usize {
        self.chars.len()
    }

    /// 指定された文字位置に対応するバイト位置を返します
    ///
    /// # 引数
    ///
    /// * `pos_char` - 文字位置（0始まり）。文字数と等しい値も受け付けます。
    #[inline(always)]
    pub fn byte_position(&self, pos_char: usize) -> usize {
        self.c2b[pos_char]
    }

    /// ブロック列を返します
    #[inline(always)]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}
