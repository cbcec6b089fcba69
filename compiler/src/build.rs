//! コンパイル済み辞書のビルドモジュール
//!
//! テキスト形式の辞書（`単語 頻度 [品詞]`）、HMMモデル、ユーザー辞書から
//! コンパイル済み辞書を構築します。

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use hanseg::Dictionary;
use hanseg::dictionary::{DictionaryInner, SystemDictionaryBuilder, UserWordWeight};
use hanseg::errors::HansegError;

use clap::Parser;

/// ビルドコマンドの引数
#[derive(Parser, Debug)]
#[clap(name = "build", about = "A program to build the compiled dictionary.")]
pub struct Args {
    /// Dictionary file (one `word freq [tag]` entry per line).
    #[clap(short = 'd', long)]
    dict_in: PathBuf,

    /// HMM model file.
    #[clap(short = 'H', long)]
    hmm_in: PathBuf,

    /// User dictionary file (one `word [freq] [tag]` entry per line).
    /// Can be given multiple times; later files win.
    #[clap(short = 'u', long)]
    user_dict_in: Vec<PathBuf>,

    /// Frequency given to user words without one. Choices are min, median, and max.
    #[clap(long, default_value = "median")]
    user_word_weight: UserWordWeight,

    /// File to which the compiled dictionary is output.
    /// Compressed with zstd when the path ends with `.zst`.
    #[clap(short = 'o', long)]
    sysdic_out: PathBuf,
}

/// ビルド処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 辞書構築エラー
    #[error("Dictionary building failed: {0}")]
    Hanseg(#[from] HansegError),
}

/// ビルドコマンドを実行する
///
/// # エラー
///
/// ファイルの読み書きや辞書構築に失敗した場合、`BuildError`を返します。
pub fn run(args: Args) -> Result<(), BuildError> {
    eprintln!("Compiling the dictionary...");
    let start = Instant::now();
    let dict = Dictionary::from_inner(build_dictionary(
        &args.dict_in,
        &args.hmm_in,
        &args.user_dict_in,
        args.user_word_weight,
    )?);
    eprintln!("{} seconds", start.elapsed().as_secs_f64());

    eprintln!("Writing the dictionary...");
    write_dictionary(&dict, &args.sysdic_out)?;

    eprintln!(
        "Successfully built the dictionary to {} ({} words, total frequency {})",
        args.sysdic_out.display(),
        dict.num_words(),
        dict.total_frequency(),
    );
    Ok(())
}

/// テキスト形式のソースから辞書を構築する
///
/// # 引数
///
/// * `dict_in` - 辞書ファイルのパス
/// * `hmm_in` - HMMモデルファイルのパス
/// * `user_dicts` - ユーザー辞書ファイルのパス。空の場合はユーザー辞書なし
/// * `weight` - 頻度のないユーザー単語に与える重み
///
/// # エラー
///
/// ファイルの読み込みや辞書構築に失敗した場合、`BuildError`を返します。
pub fn build_dictionary(
    dict_in: &Path,
    hmm_in: &Path,
    user_dicts: &[PathBuf],
    weight: UserWordWeight,
) -> Result<DictionaryInner, BuildError> {
    let dict = SystemDictionaryBuilder::from_readers(
        BufReader::new(File::open(dict_in)?),
        BufReader::new(File::open(hmm_in)?),
    )?;
    if user_dicts.is_empty() {
        return Ok(dict);
    }
    let rdrs = user_dicts
        .iter()
        .map(|p| File::open(p).map(BufReader::new))
        .collect::<io::Result<Vec<_>>>()?;
    Ok(dict.reset_user_lexicon_from_readers(rdrs, weight)?)
}

fn write_dictionary(dict: &Dictionary, path: &Path) -> Result<(), BuildError> {
    let file = File::create(path)?;
    if path.extension().is_some_and(|ext| ext == "zst") {
        let mut encoder = zstd::Encoder::new(file, 19)?;
        dict.write(&mut encoder)?;
        encoder.finish()?;
    } else {
        let mut wtr = BufWriter::new(file);
        dict.write(&mut wtr)?;
        wtr.flush()?;
    }
    Ok(())
}
