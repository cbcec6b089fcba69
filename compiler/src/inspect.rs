//! コンパイル済み辞書の確認モジュール

use std::path::PathBuf;
use std::time::Instant;

use hanseg::Dictionary;
use hanseg::errors::HansegError;

use clap::Parser;

/// 確認コマンドの引数
#[derive(Parser, Debug)]
#[clap(name = "inspect", about = "Shows statistics of a compiled dictionary.")]
pub struct Args {
    /// Compiled dictionary (zstd-compressed if the path ends with `.zst`).
    #[clap(short = 'i', long)]
    sysdic: PathBuf,

    /// Words whose frequencies are printed. Can be given multiple times.
    #[clap(short = 'w', long)]
    word: Vec<String>,
}

/// 確認処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    /// 辞書の読み込みエラー
    #[error("Failed to load the dictionary: {0}")]
    Hanseg(#[from] HansegError),
}

/// 確認コマンドを実行する
///
/// # エラー
///
/// 辞書の読み込みに失敗した場合、`InspectError`を返します。
pub fn run(args: Args) -> Result<(), InspectError> {
    eprintln!("Loading the dictionary...");
    let start = Instant::now();
    let dict = if args.sysdic.extension().is_some_and(|ext| ext == "zst") {
        Dictionary::from_zstd(&args.sysdic)?
    } else {
        Dictionary::from_path(&args.sysdic)?
    };
    eprintln!("{} seconds", start.elapsed().as_secs_f64());

    println!("num_words\t{}", dict.num_words());
    println!("num_user_words\t{}", dict.num_user_words());
    println!("total_frequency\t{}", dict.total_frequency());
    println!("max_word_len\t{}", dict.max_word_len());

    for word in &args.word {
        match dict.get_frequency(word) {
            Ok(freq) => println!("{word}\t{freq}"),
            Err(HansegError::NotFound(_)) => println!("{word}\tNOT_FOUND"),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
