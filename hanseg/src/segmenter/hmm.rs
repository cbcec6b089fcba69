//! HMMによる未知語の分割
//!
//! ASCIIの英字列と数字列は規則でまとめ、それ以外のコードポイント列は
//! 4状態HMMのビタビ復号で単語に分割します。

use crate::dictionary::DictionaryInner;
use crate::dictionary::hmm::{HmmModel, HmmState, NUM_STATES};
use crate::segmenter::{Span, span_of};

/// ビタビ復号の作業領域
#[derive(Default)]
pub struct Viterbi {
    weights: Vec<[f64; NUM_STATES]>,
    back: Vec<[HmmState; NUM_STATES]>,
    states: Vec<HmmState>,
}

impl Viterbi {
    /// コードポイント列の最尤状態列を求めます。
    ///
    /// 列は B または S で始まり、E または S で終わります。
    ///
    /// # 引数
    ///
    /// * `model` - HMMモデル
    /// * `chars` - 観測コードポイント列
    ///
    /// # 戻り値
    ///
    /// 各コードポイントの状態。入力が空の場合は空のスライス。
    pub fn decode(&mut self, model: &HmmModel, chars: &[char]) -> &[HmmState] {
        self.weights.clear();
        self.back.clear();
        self.states.clear();
        let Some(&first) = chars.first() else {
            return &self.states;
        };

        self.weights.push(HmmState::ALL.map(|s| {
            if s.can_start() {
                model.start(s) + model.emit(s, first)
            } else {
                f64::NEG_INFINITY
            }
        }));
        self.back.push([HmmState::Single; NUM_STATES]);

        for (t, &c) in chars.iter().enumerate().skip(1) {
            let prev = self.weights[t - 1];
            let mut weight = [f64::NEG_INFINITY; NUM_STATES];
            let mut back = [HmmState::Single; NUM_STATES];
            for s in HmmState::ALL {
                let candidates = s.prev_states();
                let mut best = candidates[0];
                let mut best_score = prev[best.index()] + model.trans(best, s);
                for &p in &candidates[1..] {
                    let score = prev[p.index()] + model.trans(p, s);
                    if score > best_score {
                        best = p;
                        best_score = score;
                    }
                }
                weight[s.index()] = best_score + model.emit(s, c);
                back[s.index()] = best;
            }
            self.weights.push(weight);
            self.back.push(back);
        }

        let last = self.weights[chars.len() - 1];
        let mut state = if last[HmmState::End.index()] > last[HmmState::Single.index()] {
            HmmState::End
        } else {
            HmmState::Single
        };
        self.states.resize(chars.len(), HmmState::Single);
        for t in (0..chars.len()).rev() {
            self.states[t] = state;
            state = self.back[t][state.index()];
        }
        &self.states
    }
}

/// ASCIIの語の終了位置を返します。
///
/// 英字で始まる場合は英数字が続く限り、数字で始まる場合は数字と`.`が続く限りを
/// 1語とします。それ以外のASCIIコードポイントは1文字で1語です。
fn ascii_word_end(chars: &[char], start: usize) -> usize {
    let rest = &chars[start + 1..];
    let len = match chars[start] {
        c if c.is_ascii_alphabetic() => rest
            .iter()
            .take_while(|c| c.is_ascii_alphanumeric())
            .count(),
        c if c.is_ascii_digit() => rest
            .iter()
            .take_while(|&&c| c.is_ascii_digit() || c == '.')
            .count(),
        _ => 0,
    };
    start + 1 + len
}

/// 区間`range`をHMMと規則で分割し、`out`に追加します。
///
/// # 引数
///
/// * `dict` - 辞書。トークンの語彙種別の判定とHMMモデルの取得に使います。
/// * `chars` - 文全体のコードポイント列
/// * `range` - 分割する区間
/// * `use_viterbi` - `false`の場合、非ASCII部分は一文字ずつに分割します
/// * `viterbi` - 作業領域
/// * `out` - 出力先
pub fn cut_range(
    dict: &DictionaryInner,
    chars: &[char],
    range: std::ops::Range<usize>,
    use_viterbi: bool,
    viterbi: &mut Viterbi,
    out: &mut Vec<Span>,
) {
    let end = range.end;
    let mut i = range.start;
    while i < end {
        if chars[i].is_ascii() {
            let j = ascii_word_end(&chars[..end], i);
            out.push(span_of(dict, chars, i, j));
            i = j;
            continue;
        }
        let j = chars[i..end]
            .iter()
            .position(char::is_ascii)
            .map_or(end, |p| i + p);
        if use_viterbi {
            let mut word_start = i;
            for (t, state) in viterbi.decode(dict.hmm(), &chars[i..j]).iter().enumerate() {
                if state.closes_word() {
                    out.push(span_of(dict, chars, word_start, i + t + 1));
                    word_start = i + t + 1;
                }
            }
        } else {
            for k in i..j {
                out.push(span_of(dict, chars, k, k + 1));
            }
        }
        i = j;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dictionary::LexType;
    use crate::dictionary::SystemDictionaryBuilder;
    use crate::test_utils::HMM_MODEL;

    fn dict() -> DictionaryInner {
        SystemDictionaryBuilder::from_readers("学号 10\n研 3".as_bytes(), HMM_MODEL.as_bytes())
            .unwrap()
    }

    fn cut(dict: &DictionaryInner, text: &str, use_viterbi: bool) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut out = vec![];
        cut_range(dict, &chars, 0..chars.len(), use_viterbi, &mut Viterbi::default(), &mut out);
        out.iter()
            .map(|s| chars[s.start..s.end].iter().collect())
            .collect()
    }

    #[test]
    fn test_decode_consistent_states() {
        let dict = dict();
        let mut viterbi = Viterbi::default();
        let chars: Vec<char> = "我来自北京邮电大学".chars().collect();
        let states = viterbi.decode(dict.hmm(), &chars).to_vec();
        assert_eq!(states.len(), chars.len());
        assert!(states[0].can_start());
        assert!(states[chars.len() - 1].closes_word());
        for w in states.windows(2) {
            assert!(w[1].prev_states().contains(&w[0]));
        }
    }

    #[test]
    fn test_decode_single_and_empty() {
        let dict = dict();
        let mut viterbi = Viterbi::default();
        assert_eq!(viterbi.decode(dict.hmm(), &['杭']), &[HmmState::Single]);
        assert!(viterbi.decode(dict.hmm(), &[]).is_empty());
    }

    #[test]
    fn test_cut_range() {
        let dict = dict();
        assert_eq!(
            cut(&dict, "我来自北京邮电大学", true),
            vec!["我来", "自北京", "邮电大学"]
        );
        assert_eq!(cut(&dict, "学号123456", true), vec!["学号", "123456"]);
        assert_eq!(cut(&dict, "杭研", true), vec!["杭研"]);
    }

    #[test]
    fn test_ascii_rules() {
        let dict = dict();
        assert_eq!(cut(&dict, "iPhone6", false), vec!["iPhone6"]);
        assert_eq!(cut(&dict, "3.14abc", false), vec!["3.14", "abc"]);
        assert_eq!(cut(&dict, "AK47", false), vec!["AK47"]);
        assert_eq!(cut(&dict, "a-b", false), vec!["a", "-", "b"]);
        assert_eq!(cut(&dict, "用AK47", false), vec!["用", "AK47"]);
    }

    #[test]
    fn test_lex_type_lookup() {
        let dict = dict();
        let chars: Vec<char> = "杭研".chars().collect();
        let mut out = vec![];
        cut_range(&dict, &chars, 0..2, false, &mut Viterbi::default(), &mut out);
        assert_eq!(out[0].lex_type, LexType::Unknown);
        assert_eq!(out[1].lex_type, LexType::System);
    }
}
