//! 単語候補の有向非巡回グラフ
//!
//! ブロック内の各位置から、辞書に一致する語の終了位置への辺を張ります。
//! 辺は位置ごとに連続した領域に格納され（CSR形式）、ワーカー間で再利用されます。

use crate::dictionary::lexicon::LexMatch;
use crate::dictionary::{DictionaryInner, LexType};
use crate::segmenter::Span;

/// DAGの辺
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    /// 語の長さ（コードポイント数）
    pub len: usize,
    /// 語の対数確率
    pub log_prob: f64,
    /// 語の由来する辞書の種類。辞書に一致しない一文字の辺は`Unknown`です。
    pub lex_type: LexType,
}

/// 最大確率パスの各位置での選択
#[derive(Clone, Copy, Debug, Default)]
struct RouteNode {
    score: f64,
    len: usize,
    lex_type: LexType,
}

#[derive(Default)]
pub struct Dag {
    offsets: Vec<usize>,
    edges: Vec<Edge>,
    route: Vec<RouteNode>,
    matches: Vec<LexMatch>,
}

impl Dag {
    /// ブロックのコードポイント列からDAGを構築します。
    ///
    /// # 引数
    ///
    /// * `dict` - 辞書
    /// * `chars` - ブロックのコードポイント列
    /// * `max_word_len` - 辞書語の最大長。`0`の場合も長さ1の辺は張られます。
    pub fn build(&mut self, dict: &DictionaryInner, chars: &[char], max_word_len: usize) {
        let limit = max_word_len.max(1);
        self.offsets.clear();
        self.edges.clear();
        self.offsets.push(0);
        for i in 0..chars.len() {
            self.matches.clear();
            dict.common_prefix_matches(&chars[i..], limit, &mut self.matches);
            if self.matches.first().is_none_or(|m| m.end_char != 1) {
                self.edges.push(Edge {
                    len: 1,
                    log_prob: dict.unknown_log_prob(),
                    lex_type: LexType::Unknown,
                });
            }
            for m in &self.matches {
                self.edges.push(Edge {
                    len: m.end_char,
                    log_prob: dict.log_prob(m.word_param.freq),
                    lex_type: m.lex_type,
                });
            }
            self.offsets.push(self.edges.len());
        }
    }

    /// 頂点数（ブロックのコードポイント数）を返します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// 位置`i`から出る辺を、短い順に返します。
    #[inline(always)]
    pub fn edges(&self, i: usize) -> &[Edge] {
        &self.edges[self.offsets[i]..self.offsets[i + 1]]
    }

    /// 右から左への動的計画法で、各位置から末尾までの最大確率の語を選びます。
    ///
    /// 得点が等しい場合は長い語を選びます。
    fn compute_route(&mut self) {
        let n = self.len();
        self.route.clear();
        self.route.resize(n + 1, RouteNode::default());
        for i in (0..n).rev() {
            let mut best = RouteNode {
                score: f64::NEG_INFINITY,
                len: 1,
                lex_type: LexType::Unknown,
            };
            for edge in &self.edges[self.offsets[i]..self.offsets[i + 1]] {
                let score = edge.log_prob + self.route[i + edge.len].score;
                if score >= best.score {
                    best = RouteNode {
                        score,
                        len: edge.len,
                        lex_type: edge.lex_type,
                    };
                }
            }
            self.route[i] = best;
        }
    }

    /// 最大確率パスを`out`に追加します。
    ///
    /// # 引数
    ///
    /// * `base` - ブロックの開始文字位置
    /// * `out` - 出力先
    pub fn best_path(&mut self, base: usize, out: &mut Vec<Span>) {
        self.compute_route();
        let mut i = 0;
        while i < self.len() {
            let node = self.route[i];
            out.push(Span::new(base + i, base + i + node.len, node.lex_type));
            i += node.len;
        }
    }

    /// 辞書に一致するすべての語を、開始位置順・長さ順に`out`に追加します。
    ///
    /// 一文字語は、その位置の唯一の候補であり、かつ既に出力した語に
    /// 覆われていない場合にのみ出力します。
    pub fn all_paths(&self, base: usize, out: &mut Vec<Span>) {
        let mut covered = 0;
        for i in 0..self.len() {
            let edges = self.edges(i);
            for edge in edges {
                if edge.len >= 2 || (edges.len() == 1 && covered <= i) {
                    out.push(Span::new(base + i, base + i + edge.len, edge.lex_type));
                }
                covered = covered.max(i + edge.len);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dictionary::SystemDictionaryBuilder;
    use crate::dictionary::hmm::HmmModel;
    use crate::test_utils::HMM_MODEL;

    fn dict(entries: &[(&str, u64)]) -> DictionaryInner {
        let hmm = HmmModel::from_reader(HMM_MODEL.as_bytes()).unwrap();
        SystemDictionaryBuilder::from_entries(entries.iter().copied(), hmm).unwrap()
    }

    fn surfaces(chars: &[char], spans: &[Span]) -> Vec<String> {
        spans
            .iter()
            .map(|s| chars[s.start..s.end].iter().collect())
            .collect()
    }

    #[test]
    fn test_build_inserts_fallback() {
        let dict = dict(&[("北京", 10), ("京", 5)]);
        let chars: Vec<char> = "北京".chars().collect();
        let mut dag = Dag::default();
        dag.build(&dict, &chars, 8);
        assert_eq!(dag.len(), 2);
        let e0: Vec<_> = dag.edges(0).iter().map(|e| (e.len, e.lex_type)).collect();
        assert_eq!(e0, vec![(1, LexType::Unknown), (2, LexType::System)]);
        let e1: Vec<_> = dag.edges(1).iter().map(|e| (e.len, e.lex_type)).collect();
        assert_eq!(e1, vec![(1, LexType::System)]);
    }

    #[test]
    fn test_build_respects_limit() {
        let dict = dict(&[("长江", 10), ("长江大桥", 5)]);
        let chars: Vec<char> = "长江大桥".chars().collect();
        let mut dag = Dag::default();
        dag.build(&dict, &chars, 3);
        assert_eq!(dag.edges(0).len(), 2);
        dag.build(&dict, &chars, 0);
        assert!((0..4).all(|i| dag.edges(i).len() == 1));
    }

    #[test]
    fn test_best_path_fewer_words() {
        let dict = dict(&[("ab", 1), ("a", 1), ("b", 1), ("c", 1)]);
        let chars: Vec<char> = "ab".chars().collect();
        let mut dag = Dag::default();
        dag.build(&dict, &chars, 8);
        let mut out = vec![];
        dag.best_path(0, &mut out);
        assert_eq!(surfaces(&chars, &out), vec!["ab"]);
    }

    #[test]
    fn test_best_path_base_offset() {
        let dict = dict(&[("南京", 10)]);
        let chars: Vec<char> = "南京市".chars().collect();
        let mut dag = Dag::default();
        dag.build(&dict, &chars, 8);
        let mut out = vec![];
        dag.best_path(5, &mut out);
        assert_eq!(
            out,
            vec![
                Span::new(5, 7, LexType::System),
                Span::new(7, 8, LexType::Unknown),
            ]
        );
    }

    #[test]
    fn test_all_paths() {
        let dict = dict(&[
            ("来自", 10),
            ("北京", 10),
            ("北京邮电大学", 10),
            ("邮电", 10),
            ("电大", 10),
            ("大学", 10),
        ]);
        let chars: Vec<char> = "我来自北京邮电大学".chars().collect();
        let mut dag = Dag::default();
        dag.build(&dict, &chars, 8);
        let mut out = vec![];
        dag.all_paths(0, &mut out);
        assert_eq!(
            surfaces(&chars, &out),
            vec!["我", "来自", "北京", "北京邮电大学", "邮电", "电大", "大学"]
        );
    }

    #[test]
    fn test_empty_block() {
        let dict = dict(&[("a", 1)]);
        let mut dag = Dag::default();
        dag.build(&dict, &[], 8);
        assert_eq!(dag.len(), 0);
        let mut out = vec![];
        dag.best_path(0, &mut out);
        assert!(out.is_empty());
    }
}
