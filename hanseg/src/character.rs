//! コードポイントの文字種分類
//!
//! 入力文の各コードポイントを粗い文字種に分類し、
//! 区切り文字（空白・句読点）かどうかを判定します。

/// コードポイントの文字種
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum CharClass {
    /// 漢字（CJK統合漢字とその拡張）
    Han,
    /// ASCII英字
    Alpha,
    /// ASCII数字
    Digit,
    /// 空白文字
    Space,
    /// 句読点・記号
    Punct,
    /// その他（かな、絵文字、全角英数など）
    Other,
}

/// 英数字の単語の内部に現れてもよいASCII記号
///
/// これらは区切り文字として扱われず、"3.14" や "C++" のような語の一部になります。
pub const CONNECTORS: [char; 6] = ['+', '#', '&', '.', '_', '%'];

impl CharClass {
    /// コードポイントの文字種を判定します。
    ///
    /// # 引数
    ///
    /// * `c` - 判定するコードポイント
    ///
    /// # 戻り値
    ///
    /// 判定された文字種
    pub fn of(c: char) -> Self {
        if c.is_ascii() {
            return if c.is_ascii_alphabetic() {
                Self::Alpha
            } else if c.is_ascii_digit() {
                Self::Digit
            } else if c.is_ascii_whitespace() || c.is_ascii_control() {
                Self::Space
            } else if c.is_ascii_punctuation() && !CONNECTORS.contains(&c) {
                Self::Punct
            } else {
                Self::Other
            };
        }
        if is_han(c) {
            Self::Han
        } else if c.is_whitespace() {
            Self::Space
        } else if is_wide_punct(c) {
            Self::Punct
        } else {
            Self::Other
        }
    }

    /// 区切り文字かどうかを返します。
    ///
    /// 区切り文字は常に1コードポイントのトークンとしてそのまま出力され、
    /// 辞書検索やHMMには渡されません。
    #[inline(always)]
    pub const fn is_separator(self) -> bool {
        matches!(self, Self::Space | Self::Punct)
    }
}

#[inline]
fn is_han(c: char) -> bool {
    matches!(
        u32::from(c),
        0x3007
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xF900..=0xFAFF
            | 0x20000..=0x2A6DF
            | 0x2A700..=0x2EBEF
            | 0x30000..=0x3134F
    )
}

#[inline]
fn is_wide_punct(c: char) -> bool {
    matches!(
        u32::from(c),
        0x00A1..=0x00BF
            | 0x00D7
            | 0x00F7
            | 0x2010..=0x2027
            | 0x2030..=0x205E
            | 0x3001..=0x3003
            | 0x3008..=0x3011
            | 0x3014..=0x301F
            | 0xFE30..=0xFE4F
            | 0xFE50..=0xFE6B
            | 0xFF01..=0xFF0F
            | 0xFF1A..=0xFF20
            | 0xFF3B..=0xFF40
            | 0xFF5B..=0xFF65
    )
}
