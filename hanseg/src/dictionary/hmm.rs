//! 未知語認識用の隠れマルコフモデル
//!
//! 4状態（B: 語頭、E: 語末、M: 語中、S: 一文字語）のモデルパラメータを保持します。
//! すべての確率は自然対数で保持されます。
//!
//! テキスト形式は以下の通りです。`#` で始まる行と空行は無視されます。
//!
//! ```text
//! # 初期確率 (B E M S)
//! -0.26 -3.14e+100 -3.14e+100 -1.46
//! # 遷移確率 (4行4列)
//! ...
//! # 出力確率 (B, E, M, S の順に1行ずつ)
//! 杭:-5.1,我:-6.2
//! ...
//! ```

use std::io::Read;

use hashbrown::HashMap;
use rkyv::{Archive, Deserialize, Serialize};

use crate::errors::{HansegError, Result};
use crate::utils::parse_row;

/// 状態数
pub const NUM_STATES: usize = 4;

/// 学習時に観測されなかった出力の対数確率
pub const MIN_LOG_PROB: f64 = -3.14e100;

/// HMMの状態
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
#[repr(u8)]
pub enum HmmState {
    /// 語頭
    Begin = 0,
    /// 語末
    End = 1,
    /// 語中
    Middle = 2,
    /// 一文字語
    Single = 3,
}

impl HmmState {
    /// すべての状態（モデルファイル上の並び順）
    pub const ALL: [Self; NUM_STATES] = [Self::Begin, Self::End, Self::Middle, Self::Single];

    /// この状態の直前に来ることができる状態を返します。
    #[inline(always)]
    pub const fn prev_states(self) -> [Self; 2] {
        match self {
            Self::Begin | Self::Single => [Self::End, Self::Single],
            Self::Middle | Self::End => [Self::Begin, Self::Middle],
        }
    }

    /// 列の先頭に置ける状態かどうか
    #[inline(always)]
    pub const fn can_start(self) -> bool {
        matches!(self, Self::Begin | Self::Single)
    }

    /// 単語を閉じる状態かどうか
    #[inline(always)]
    pub const fn closes_word(self) -> bool {
        matches!(self, Self::End | Self::Single)
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// HMMのパラメータ
#[derive(Clone, Debug)]
pub struct HmmModel {
    start: [f64; NUM_STATES],
    trans: [[f64; NUM_STATES]; NUM_STATES],
    emit: [HashMap<char, f64>; NUM_STATES],
}

/// 出力確率の1エントリ
#[derive(Clone, Copy, Debug, Archive, Serialize, Deserialize)]
pub struct Emission {
    ch: char,
    log_prob: f64,
}

/// [`HmmModel`]のシリアライズ用表現
#[derive(Archive, Serialize, Deserialize)]
pub struct HmmData {
    start: [f64; NUM_STATES],
    trans: [[f64; NUM_STATES]; NUM_STATES],
    emit: [Vec<Emission>; NUM_STATES],
}

impl HmmModel {
    /// パース済みのパラメータからモデルを作成します。
    ///
    /// # 引数
    ///
    /// * `start` - 各状態の初期対数確率
    /// * `trans` - `trans[from][to]` の遷移対数確率
    /// * `emit` - 各状態の出力対数確率
    ///
    /// # エラー
    ///
    /// 対数確率として不正な値（NaN や正の値）が含まれる場合にエラーを返します。
    pub fn new(
        start: [f64; NUM_STATES],
        trans: [[f64; NUM_STATES]; NUM_STATES],
        emit: [HashMap<char, f64>; NUM_STATES],
    ) -> Result<Self> {
        let all = start
            .iter()
            .chain(trans.iter().flatten())
            .chain(emit.iter().flat_map(|m| m.values()));
        for &p in all {
            if p.is_nan() || p > 0.0 {
                return Err(HansegError::invalid_argument(
                    "hmm",
                    format!("{p} is not a log probability"),
                ));
            }
        }
        Ok(Self { start, trans, emit })
    }

    /// テキスト形式のモデルファイルから読み込みます。
    ///
    /// # 引数
    ///
    /// * `rdr` - モデルファイルのリーダー
    ///
    /// # エラー
    ///
    /// 行数や値の形式が不正な場合に [`HansegError::InvalidFormat`] を返します。
    pub fn from_reader<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut buf = String::new();
        rdr.read_to_string(&mut buf)?;

        let mut lines = buf
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

        let mut next_line = |what: &str| {
            lines.next().ok_or_else(|| {
                HansegError::invalid_format("hmm", format!("missing the {what} line"))
            })
        };

        let (lineno, line) = next_line("start probability")?;
        let start = parse_probs(line, lineno)?;

        let mut trans = [[0.0; NUM_STATES]; NUM_STATES];
        for row in trans.iter_mut() {
            let (lineno, line) = next_line("transition probability")?;
            *row = parse_probs(line, lineno)?;
        }

        let mut emit: [HashMap<char, f64>; NUM_STATES] = Default::default();
        for map in emit.iter_mut() {
            let (lineno, line) = next_line("emission probability")?;
            *map = parse_emissions(line, lineno)?;
        }

        if let Some((lineno, _)) = lines.next() {
            return Err(HansegError::invalid_format(
                "hmm",
                format!("line {lineno}: unexpected trailing data"),
            ));
        }

        Self::new(start, trans, emit)
    }

    /// 初期対数確率
    #[inline(always)]
    pub fn start(&self, s: HmmState) -> f64 {
        self.start[s.index()]
    }

    /// 遷移対数確率
    #[inline(always)]
    pub fn trans(&self, from: HmmState, to: HmmState) -> f64 {
        self.trans[from.index()][to.index()]
    }

    /// 出力対数確率
    ///
    /// 観測されなかったコードポイントには [`MIN_LOG_PROB`] を返します。
    #[inline(always)]
    pub fn emit(&self, s: HmmState, c: char) -> f64 {
        self.emit[s.index()].get(&c).copied().unwrap_or(MIN_LOG_PROB)
    }

    /// シリアライズ用の表現に変換します。
    pub fn to_data(&self) -> HmmData {
        let emit = self.emit.each_ref().map(|m| {
            let mut entries: Vec<_> = m
                .iter()
                .map(|(&ch, &log_prob)| Emission { ch, log_prob })
                .collect();
            entries.sort_unstable_by_key(|e| e.ch);
            entries
        });
        HmmData {
            start: self.start,
            trans: self.trans,
            emit,
        }
    }

    /// シリアライズ用の表現からモデルを復元します。
    pub fn from_data(data: HmmData) -> Result<Self> {
        let emit = data
            .emit
            .map(|entries| entries.into_iter().map(|e| (e.ch, e.log_prob)).collect());
        Self::new(data.start, data.trans, emit)
    }
}

fn parse_probs(line: &str, lineno: usize) -> Result<[f64; NUM_STATES]> {
    let fields = parse_row(line, b' ', "hmm")?;
    if fields.len() != NUM_STATES {
        return Err(HansegError::invalid_format(
            "hmm",
            format!("line {lineno}: expected {NUM_STATES} values, found {}", fields.len()),
        ));
    }
    let mut probs = [0.0; NUM_STATES];
    for (p, f) in probs.iter_mut().zip(&fields) {
        *p = f.parse()?;
    }
    Ok(probs)
}

fn parse_emissions(line: &str, lineno: usize) -> Result<HashMap<char, f64>> {
    let mut map = HashMap::new();
    for field in parse_row(line, b',', "hmm")? {
        let parsed = field.rsplit_once(':').and_then(|(key, prob)| {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some((c, prob)),
                _ => None,
            }
        });
        let Some((c, prob)) = parsed else {
            return Err(HansegError::invalid_format(
                "hmm",
                format!("line {lineno}: {field:?} is not a `char:prob` pair"),
            ));
        };
        map.insert(c, prob.parse()?);
    }
    Ok(map)
}
