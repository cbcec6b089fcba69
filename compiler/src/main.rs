//! Hanseg 辞書コンパイラのメインエントリーポイント
//!
//! テキスト形式の辞書、HMMモデル、ユーザー辞書からコンパイル済み辞書を構築し、
//! コンパイル済み辞書の内容を確認するためのサブコマンドを提供します。

mod build;
mod inspect;

use clap::Parser;
use thiserror::Error;

use crate::{build::BuildError, inspect::InspectError};

/// コマンドライン引数の構造体
#[derive(Parser, Debug)]
#[clap(name = "compile", version)]
struct Cli {
    /// 実行するサブコマンド
    #[clap(subcommand)]
    command: Command,
}

/// 利用可能なサブコマンド
#[derive(Parser, Debug)]
enum Command {
    /// テキスト形式のソースからコンパイル済み辞書を構築します
    ///
    /// 出力パスが`.zst`で終わる場合、Zstandardで圧縮して書き出します。
    Build(build::Args),

    /// コンパイル済み辞書の統計と単語の頻度を表示します
    Inspect(inspect::Args),
}

/// コンパイラの実行中に発生する可能性のあるエラー
#[derive(Debug, Error)]
pub enum CompileError {
    /// 辞書ビルド中のエラー
    #[error(transparent)]
    BuildError(#[from] BuildError),
    /// 辞書の確認中のエラー
    #[error(transparent)]
    InspectError(#[from] InspectError),
}

/// メイン関数
///
/// コマンドライン引数をパースし、指定されたサブコマンドを実行します。
///
/// # エラー
///
/// 各サブコマンドの実行中にエラーが発生した場合、そのエラーが返されます。
fn main() -> Result<(), CompileError> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Build(args) => Ok(build::run(args)?),
        Command::Inspect(args) => Ok(inspect::run(args)?),
    }
}
