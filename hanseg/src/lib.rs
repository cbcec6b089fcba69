//! # Hanseg
//!
//! Hansegは、辞書DAGと隠れマルコフモデルに基づく中国語の分かち書きの実装です。
//!
//! ## 概要
//!
//! このライブラリは、空白で区切られない中国語テキストを単語列に分割します。
//! rkyvシリアライゼーションフォーマットを使用することで、コンパイル済み辞書の
//! 読み込みを高速化しています。
//!
//! ## 主な機能
//!
//! - **最大確率分割**: 辞書の単語候補DAG上の動的計画法
//! - **未知語認識**: 4状態HMM（B/M/E/S）のビタビ復号
//! - **複数の分割モード**: `MaxProb`、`Hmm`、`Mix`、`Full`、`Query`
//! - **ユーザー辞書**: システム辞書に単語を追加・上書き
//! - **コンパイル済み辞書**: メモリマップとZstandard圧縮に対応
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use hanseg::{CutMode, Segmenter, SystemDictionaryBuilder};
//!
//! let dict_txt = "南京 800\n南京市 300\n市长 200\n长江 300\n长江大桥 100\n大桥 200";
//! let hmm_txt = "-0.26 -3.14e+100 -3.14e+100 -1.46
//! -3.14e+100 -0.51 -0.92 -3.14e+100
//! -0.59 -3.14e+100 -3.14e+100 -0.81
//! -3.14e+100 -0.33 -1.26 -3.14e+100
//! -0.72 -3.14e+100 -3.14e+100 -0.67
//! 南:-6.0
//! 京:-6.5
//! 长:-7.0
//! 市:-5.0";
//!
//! let dict = SystemDictionaryBuilder::from_readers(dict_txt.as_bytes(), hmm_txt.as_bytes())?;
//!
//! let segmenter = Segmenter::from_inner(dict);
//! let mut worker = segmenter.new_worker();
//!
//! worker.reset_sentence("南京市长江大桥");
//! worker.cut(CutMode::MaxProb);
//! assert_eq!(worker.num_tokens(), 2);
//!
//! let t0 = worker.token(0);
//! assert_eq!(t0.surface(), "南京市");
//! assert_eq!(t0.range_char(), 0..3);
//! assert_eq!(t0.range_byte(), 0..9);
//!
//! let t1 = worker.token(1);
//! assert_eq!(t1.surface(), "长江大桥");
//! assert_eq!(t1.range_char(), 3..7);
//! assert_eq!(t1.range_byte(), 9..21);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("`target_pointer_width` must be 32 or 64");

/// 文字種の分類
pub mod character;

/// 辞書データ構造とビルダー
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// 分かち書き器の実装
pub mod segmenter;

/// 文の内部表現
mod sentence;

/// ストップワード
pub mod stop_words;

/// トークン型の定義
pub mod token;

/// 内部ユーティリティ関数
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-exports
pub use dictionary::{Dictionary, LexType, SystemDictionaryBuilder, UserWordWeight};
pub use segmenter::{CutMode, CutOptions, Segmenter};
pub use stop_words::StopWords;
pub use token::TokenBuf;

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
