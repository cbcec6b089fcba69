//! 分かち書きを実行するユーティリティ
//!
//! このバイナリは、標準入力から読み込んだテキストを1行ずつ分かち書きし、
//! 指定された出力形式（wakati、detail）で結果を出力します。

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use hanseg::errors::HansegError;
use hanseg::{CutMode, Dictionary, Segmenter, StopWords, UserWordWeight};

use clap::Parser;

/// 出力モード
#[derive(Clone, Debug)]
enum OutputMode {
    Wakati,
    Detail,
}

impl FromStr for OutputMode {
    type Err = &'static str;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "wakati" => Ok(Self::Wakati),
            "detail" => Ok(Self::Detail),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "segment", about = "Segments Chinese text into words")]
struct Args {
    /// Compiled dictionary (zstd-compressed if the path ends with `.zst`).
    #[clap(short = 'i', long)]
    sysdic: PathBuf,

    /// Cut mode. Choices are mp, hmm, mix, full, and query.
    #[clap(short = 'm', long, default_value = "mix")]
    mode: CutMode,

    /// Disables the HMM for runs of single codepoints in mix and query modes.
    #[clap(long)]
    no_hmm: bool,

    /// Maximum length of dictionary words in codepoints.
    #[clap(short = 'M', long)]
    max_word_len: Option<usize>,

    /// User dictionary file. Can be given multiple times, and each value may hold
    /// several paths separated by `;` or `|`.
    #[clap(short = 'u', long)]
    user_dict: Vec<String>,

    /// Stop word file (one word per line). Stop words are dropped from the output.
    #[clap(short = 's', long)]
    stop_words: Option<PathBuf>,

    /// Output mode. Choices are wakati and detail.
    #[clap(short = 'O', long, default_value = "wakati")]
    output_mode: OutputMode,

    /// Separator between words in wakati mode.
    #[clap(short = 'S', long, default_value = " ")]
    separator: String,
}

/// 実行中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
enum SegmentError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 辞書の読み込みエラー
    #[error("Failed to load the dictionary: {0}")]
    Hanseg(#[from] HansegError),
}

/// `a.txt;b.txt|c.txt`のように区切られたパスのリストを展開します。
fn split_paths(values: &[String]) -> Vec<PathBuf> {
    values
        .iter()
        .flat_map(|v| v.split([';', '|']))
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn load_dictionary(path: &Path, user_dicts: &[PathBuf]) -> Result<Dictionary, SegmentError> {
    let dict = if path.extension().is_some_and(|ext| ext == "zst") {
        Dictionary::from_zstd(path)?
    } else {
        Dictionary::from_path(path)?
    };
    if user_dicts.is_empty() {
        return Ok(dict);
    }
    let rdrs = user_dicts
        .iter()
        .map(|p| File::open(p).map(BufReader::new))
        .collect::<io::Result<Vec<_>>>()?;
    let inner = dict
        .into_inner()
        .reset_user_lexicon_from_readers(rdrs, UserWordWeight::default())?;
    Ok(Dictionary::from_inner(inner))
}

/// メイン関数
///
/// 辞書をロードし、標準入力から読み込んだテキストを分かち書きして、
/// 指定された形式で結果を標準出力に出力します。
fn main() -> Result<(), SegmentError> {
    env_logger::init();
    let args = Args::parse();

    eprintln!("Loading the dictionary...");
    let start = Instant::now();
    let dict = load_dictionary(&args.sysdic, &split_paths(&args.user_dict))?;
    let stop_words = match &args.stop_words {
        Some(path) => StopWords::from_reader(File::open(path)?)?,
        None => StopWords::default(),
    };
    eprintln!("{} seconds", start.elapsed().as_secs_f64());

    let mut segmenter = Segmenter::new(dict).hmm(!args.no_hmm).mode(args.mode);
    if let Some(max_word_len) = args.max_word_len {
        segmenter = segmenter.max_word_len(max_word_len);
    }
    let mut worker = segmenter.new_worker();

    eprintln!("Ready to segment");

    let is_tty = atty::is(atty::Stream::Stdout);

    let out = io::stdout();
    let mut out = BufWriter::new(out.lock());
    for line in io::stdin().lock().lines() {
        let line = line?;
        worker.reset_sentence(line);
        worker.cut(segmenter.default_mode());
        let tokens = stop_words.filter(worker.token_iter().map(|t| t.to_buf()));
        match args.output_mode {
            OutputMode::Wakati => {
                for (i, t) in tokens.iter().enumerate() {
                    if i != 0 {
                        out.write_all(args.separator.as_bytes())?;
                    }
                    out.write_all(t.surface.as_bytes())?;
                }
                out.write_all(b"\n")?;
            }
            OutputMode::Detail => {
                for t in &tokens {
                    writeln!(
                        &mut out,
                        "{}\tbyte_start={}\tbyte_len={}\tlex_type={:?}",
                        t.surface,
                        t.range_byte.start,
                        t.range_byte.len(),
                        t.lex_type,
                    )?;
                }
                out.write_all(b"EOS\n")?;
            }
        }
        if is_tty {
            out.flush()?;
        }
    }

    Ok(())
}
