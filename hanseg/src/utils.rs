//! ユーティリティ関数と型変換トレイトを提供するモジュール
//!
//! - `FromU32`: u32からの型変換トレイト
//! - 区切り文字付きテキスト行の解析
//! - テスト用のマクロ

use csv_core::ReadFieldResult;

use crate::errors::{HansegError, Result};

/// u32から他の型への変換を提供するトレイト
pub trait FromU32 {
    /// u32値から実装型を生成する
    fn from_u32(src: u32) -> Self;
}

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
impl FromU32 for usize {
    #[inline(always)]
    fn from_u32(src: u32) -> Self {
        // Since the pointer width is guaranteed to be 32 or 64,
        // the following process always succeeds.
        unsafe { Self::try_from(src).unwrap_unchecked() }
    }
}

/// 区切り文字で区切られた1行を解析してフィールドのベクターに分割する
///
/// 引用符は解釈せず、空のフィールドは取り除かれます。
/// 空白区切りの辞書行で連続する空白を1つの区切りとして扱うためです。
///
/// # 引数
///
/// * `row` - 解析する行
/// * `delimiter` - 区切り文字
/// * `name` - エラーメッセージに使うフォーマット名
///
/// # 戻り値
///
/// 空でないフィールドのベクター
///
/// # エラー
///
/// 1フィールドが内部バッファに収まらない場合に [`HansegError`] を返します。
///
/// # 例
///
/// ```
/// # use hanseg::utils::parse_row;
/// let fields = parse_row("北京  1000 ns", b' ', "dict").unwrap();
/// assert_eq!(fields, vec!["北京", "1000", "ns"]);
/// ```
pub fn parse_row(row: &str, delimiter: u8, name: &'static str) -> Result<Vec<String>> {
    let mut fields = vec![];
    let mut rdr = csv_core::ReaderBuilder::new()
        .delimiter(delimiter)
        .quoting(false)
        .build();
    let mut bytes = row.as_bytes();
    let mut output = [0; 4096];
    loop {
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        let end = match result {
            ReadFieldResult::InputEmpty | ReadFieldResult::End => true,
            ReadFieldResult::Field { .. } => false,
            ReadFieldResult::OutputFull => {
                return Err(HansegError::invalid_format(name, "Field too large"));
            }
        };
        if nout != 0 {
            fields.push(std::str::from_utf8(&output[..nout])?.to_string());
        }
        if end {
            break;
        }
        bytes = &bytes[nin..];
    }
    Ok(fields)
}

#[cfg(test)]
/// HashMapリテラルを簡潔に記述するためのマクロ
///
/// ```ignore
/// let map = hashmap! {
///     '杭' => -1.0,
///     '研' => -2.0,
/// };
/// ```
macro_rules! hashmap {
    ( $($k:expr => $v:expr,)* ) => {
        {
            #[allow(unused_mut)]
            let mut h = hashbrown::HashMap::new();
            $(
                h.insert($k, $v);
            )*
            h
        }
    };
    ( $($k:expr => $v:expr),* ) => {
        hashmap![$( $k => $v, )*]
    };
}

#[cfg(test)]
pub(crate) use hashmap;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row_space() {
        assert_eq!(
            &["云计算", "5"],
            parse_row("云计算 5", b' ', "test").unwrap().as_slice()
        );
    }

    #[test]
    fn test_parse_row_repeated_delimiters() {
        assert_eq!(
            &["a", "b"],
            parse_row("  a   b ", b' ', "test").unwrap().as_slice()
        );
    }

    #[test]
    fn test_parse_row_quote_is_literal() {
        assert_eq!(
            &["\"", "3"],
            parse_row("\" 3", b' ', "test").unwrap().as_slice()
        );
    }

    #[test]
    fn test_parse_row_comma() {
        assert_eq!(
            &["杭:-1.5", "研:-2.0"],
            parse_row("杭:-1.5,研:-2.0", b',', "test").unwrap().as_slice()
        );
    }
}
