//! 分割処理のためのルーチンを提供するモジュール。
//!
//! ワーカーは文、DAG、ビタビ表などの作業領域を保持し、再利用することで
//! 不要なメモリアロケーションを避けます。
use crate::dictionary::{DictionaryInner, LexType};
use crate::errors::Result;
use crate::segmenter::dag::Dag;
use crate::segmenter::hmm::{self, Viterbi};
use crate::segmenter::{CutMode, CutOptions, Segmenter, Span, span_of};
use crate::sentence::Sentence;
use crate::token::{Token, TokenIter};

/// 分割処理のためのルーチンを提供する構造体。
///
/// 分割に使用される内部データ構造を保持し、それらを再利用することで
/// 不要なメモリ再割り当てを回避します。
///
/// # 例
///
/// ```ignore
/// let mut worker = segmenter.new_worker();
/// worker.reset_sentence("他来到了网易杭研大厦");
/// worker.cut(CutMode::Mix);
/// for token in worker.token_iter() {
///     println!("{}", token.surface());
/// }
/// ```
pub struct Worker {
    pub(crate) segmenter: Segmenter,
    pub(crate) sent: Sentence,
    pub(crate) tokens: Vec<Span>,
    dag: Dag,
    viterbi: Viterbi,
    buf: Vec<Span>,
    mixed: Vec<Span>,
}

impl Worker {
    pub(crate) fn new(segmenter: Segmenter) -> Self {
        Self {
            segmenter,
            sent: Sentence::new(),
            tokens: vec![],
            dag: Dag::default(),
            viterbi: Viterbi::default(),
            buf: vec![],
            mixed: vec![],
        }
    }

    /// 分割する入力文をリセットします。
    ///
    /// 新しい文を設定し、以前の結果をクリアします。
    ///
    /// # 引数
    ///
    /// * `input` - 分割する入力文字列
    pub fn reset_sentence<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.sent.clear();
        self.tokens.clear();
        let input = input.as_ref();
        if !input.is_empty() {
            self.sent.set_sentence(input);
            self.sent.compile();
        }
    }

    /// UTF-8のバイト列で入力文をリセットします。
    ///
    /// # エラー
    ///
    /// 入力がUTF-8として不正な場合、[`HansegError::MalformedInput`]を返します。
    /// この場合、以前の文と結果はクリアされます。
    ///
    /// [`HansegError::MalformedInput`]: crate::errors::HansegError::MalformedInput
    pub fn reset_sentence_bytes(&mut self, input: &[u8]) -> Result<()> {
        match std::str::from_utf8(input) {
            Ok(text) => {
                self.reset_sentence(text);
                Ok(())
            }
            Err(e) => {
                self.reset_sentence("");
                Err(e.into())
            }
        }
    }

    /// 分かち書き器の既定のオプションで、設定された入力文を分割します。
    ///
    /// 分割結果は内部状態に保存され、`token_iter()`や`token()`メソッドで
    /// アクセスできます。
    pub fn cut(&mut self, mode: CutMode) {
        let options = self.segmenter.options();
        self.cut_with(mode, options);
    }

    /// 指定したオプションで、設定された入力文を分割します。
    ///
    /// 空白と句読点はそれぞれ1トークンとして出力され、`Full`と`Query`以外のモードでは
    /// トークンの表層形を連結すると入力文に一致します。
    ///
    /// # 引数
    ///
    /// * `mode` - 分割モード
    /// * `options` - 最大単語長とHMMの使用有無
    pub fn cut_with(&mut self, mode: CutMode, options: CutOptions) {
        self.tokens.clear();
        if self.sent.len_char() == 0 {
            return;
        }
        let dict = self.segmenter.dictionary().inner();
        let max_word_len = options.max_word_len.unwrap_or_else(|| dict.max_word_len());
        let chars = self.sent.chars();

        for block in self.sent.blocks() {
            if block.separator {
                self.tokens.push(span_of(dict, chars, block.start, block.end));
                continue;
            }
            match mode {
                CutMode::MaxProb => {
                    // Unknown ASCII singles are grouped unless the width is forced to 1.
                    self.dag.build(dict, &chars[block.range()], max_word_len);
                    if max_word_len == 0 {
                        self.dag.best_path(block.start, &mut self.tokens);
                        continue;
                    }
                    self.buf.clear();
                    self.dag.best_path(block.start, &mut self.buf);
                    regroup_runs(
                        dict,
                        chars,
                        &self.buf,
                        |s| {
                            s.len() == 1
                                && s.lex_type == LexType::Unknown
                                && chars[s.start].is_ascii()
                        },
                        false,
                        &mut self.viterbi,
                        &mut self.tokens,
                    );
                }
                CutMode::Hmm => {
                    hmm::cut_range(
                        dict,
                        chars,
                        block.range(),
                        true,
                        &mut self.viterbi,
                        &mut self.tokens,
                    );
                }
                CutMode::Mix => {
                    self.buf.clear();
                    self.dag.build(dict, &chars[block.range()], max_word_len);
                    self.dag.best_path(block.start, &mut self.buf);
                    regroup_singles(
                        dict,
                        chars,
                        &self.buf,
                        options.hmm,
                        &mut self.viterbi,
                        &mut self.tokens,
                    );
                }
                CutMode::Full => {
                    self.dag.build(dict, &chars[block.range()], max_word_len);
                    self.dag.all_paths(block.start, &mut self.tokens);
                }
                CutMode::Query => {
                    self.buf.clear();
                    self.mixed.clear();
                    self.dag.build(dict, &chars[block.range()], max_word_len);
                    self.dag.best_path(block.start, &mut self.buf);
                    regroup_singles(
                        dict,
                        chars,
                        &self.buf,
                        options.hmm,
                        &mut self.viterbi,
                        &mut self.mixed,
                    );
                    for &word in &self.mixed {
                        expand_query_word(dict, chars, word, &mut self.tokens);
                    }
                }
            }
        }
    }

    /// 分割結果のトークン数を取得します。
    #[inline(always)]
    pub fn num_tokens(&self) -> usize {
        self.tokens.len()
    }

    /// `i`番目のトークンを取得します。
    ///
    /// # 引数
    ///
    /// * `i` - トークンのインデックス（0から始まる）
    ///
    /// # パニック
    ///
    /// `i`がトークン数以上の場合、パニックします。
    #[inline(always)]
    pub fn token<'w>(&'w self, i: usize) -> Token<'w> {
        Token::new(self, i)
    }

    /// 分割結果のイテレータを作成します。
    #[inline(always)]
    pub fn token_iter<'w>(&'w self) -> TokenIter<'w> {
        TokenIter::new(self)
    }
}

/// 最大確率パスの一文字語の連続をまとめ直します。
///
/// 複数コードポイントの語とユーザー辞書の一文字語はそのまま出力します。
/// それ以外の一文字語が連続する区間は、HMMとASCII規則で分割し直します。
fn regroup_singles(
    dict: &DictionaryInner,
    chars: &[char],
    path: &[Span],
    use_hmm: bool,
    viterbi: &mut Viterbi,
    out: &mut Vec<Span>,
) {
    regroup_runs(
        dict,
        chars,
        path,
        |s| s.len() == 1 && s.lex_type != LexType::User,
        use_hmm,
        viterbi,
        out,
    );
}

/// `is_loose`を満たす区間が隣接して続く部分を[`hmm::cut_range`]で分割し直し、
/// それ以外の区間はそのまま出力します。
fn regroup_runs<F>(
    dict: &DictionaryInner,
    chars: &[char],
    path: &[Span],
    is_loose: F,
    use_hmm: bool,
    viterbi: &mut Viterbi,
    out: &mut Vec<Span>,
) where
    F: Fn(&Span) -> bool,
{
    let mut i = 0;
    while i < path.len() {
        if !is_loose(&path[i]) {
            out.push(path[i]);
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < path.len() && is_loose(&path[j]) && path[j].start == path[j - 1].end {
            j += 1;
        }
        hmm::cut_range(
            dict,
            chars,
            path[i].start..path[j - 1].end,
            use_hmm,
            viterbi,
            out,
        );
        i = j;
    }
}

/// 検索クエリ向けに、長い語の前にその中の辞書語を出力します。
///
/// 3コードポイント以上の語では長さ2の辞書語を、4コードポイント以上の語では
/// さらに長さ3の辞書語を左から順に出力し、最後に語自身を出力します。
fn expand_query_word(dict: &DictionaryInner, chars: &[char], word: Span, out: &mut Vec<Span>) {
    for n in [2, 3] {
        if word.len() <= n {
            break;
        }
        for start in word.start..=word.end - n {
            if let Some((_, lex_type)) = dict.exact_match(&chars[start..start + n]) {
                out.push(Span::new(start, start + n, lex_type));
            }
        }
    }
    out.push(word);
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dictionary::SystemDictionaryBuilder;
    use crate::errors::HansegError;
    use crate::test_utils::HMM_MODEL;

    fn segmenter() -> Segmenter {
        let dict = SystemDictionaryBuilder::from_readers(
            "中国 100\n科学 50\n学院 50\n科学院 30\n中国科学院 20".as_bytes(),
            HMM_MODEL.as_bytes(),
        )
        .unwrap();
        Segmenter::from_inner(dict)
    }

    fn surfaces(worker: &Worker) -> Vec<&str> {
        worker.token_iter().map(|t| t.surface()).collect()
    }

    #[test]
    fn test_expand_query_word() {
        let segmenter = segmenter();
        let mut worker = segmenter.new_worker();
        worker.reset_sentence("中国科学院");
        worker.cut(CutMode::Query);
        assert_eq!(
            surfaces(&worker),
            vec!["中国", "科学", "学院", "科学院", "中国科学院"]
        );
    }

    #[test]
    fn test_reset_clears_tokens() {
        let segmenter = segmenter();
        let mut worker = segmenter.new_worker();
        worker.reset_sentence("中国");
        worker.cut(CutMode::Mix);
        assert_eq!(worker.num_tokens(), 1);
        worker.reset_sentence("");
        worker.cut(CutMode::Mix);
        assert_eq!(worker.num_tokens(), 0);
    }

    #[test]
    fn test_reset_sentence_bytes() {
        let segmenter = segmenter();
        let mut worker = segmenter.new_worker();
        worker.reset_sentence_bytes("中国".as_bytes()).unwrap();
        worker.cut(CutMode::MaxProb);
        assert_eq!(surfaces(&worker), vec!["中国"]);

        let result = worker.reset_sentence_bytes(&[0xe4, 0xb8]);
        assert!(matches!(result, Err(HansegError::MalformedInput(_))));
        worker.cut(CutMode::MaxProb);
        assert_eq!(worker.num_tokens(), 0);
    }

    #[test]
    fn test_regroup_singles_keeps_user_words() {
        let dict = SystemDictionaryBuilder::from_readers("中国 10".as_bytes(), HMM_MODEL.as_bytes())
            .unwrap()
            .reset_user_lexicon_from_readers(["B".as_bytes()], Default::default())
            .unwrap();
        let chars: Vec<char> = "IBM".chars().collect();
        let path = [
            Span::new(0, 1, LexType::Unknown),
            Span::new(1, 2, LexType::User),
            Span::new(2, 3, LexType::Unknown),
        ];
        let mut out = vec![];
        regroup_singles(&dict, &chars, &path, true, &mut Viterbi::default(), &mut out);
        assert_eq!(out, path.to_vec());
    }
}
