//! テスト用ユーティリティ
//!
//! テストで共有する小さな辞書とHMMモデル、および分割結果を比較しやすい形にする関数を提供します。

use crate::dictionary::{DictionaryInner, SystemDictionaryBuilder, UserWordWeight};
use crate::segmenter::{CutMode, CutOptions, Segmenter};

/// システム辞書（`単語 頻度`）
pub(crate) const DICT: &str = "\
的 318825
了 88345
是 79620
在 59730
他 41350
我 28550
后 15400
于 14800
很 11200
好 10900
先 6800
去 6200
用 5800
开 3300
中国 24300
我们 21800
北京 12400
大学 10200
日本 8600
科学 6500
计算 5300
来自 4900
公司 4200
上市 3800
南京 3700
方面 3600
健康 3300
毕业 3000
长江 2800
大桥 2300
学院 2250
湖南 2100
心理 2000
天气 1900
京都 1800
交代 1700
专家 1600
来到 1500
长沙 1400
南京市 1300
市长 1200
硕士 1100
长沙市 1000
邮电 950
科学院 900
大厦 850
就职 800
深造 700
小明 650
亲口 600
网易 560
中国科学院 520
电大 480
计算所 420
天心区 380
北京邮电大学 350
令狐冲 330
郊游 300
学号 280
云 270
长江大桥 260
心理健康 240
日本京都大学 220
T恤 180
湖南长沙市 170
B超 150
";

/// `DICT`から"日本京都大学"を除き、"京都大学"を加えた辞書
pub(crate) const SMALL_DICT: &str = "\
的 318825
了 88345
是 79620
在 59730
他 41350
我 28550
后 15400
于 14800
很 11200
好 10900
先 6800
去 6200
用 5800
开 3300
中国 24300
我们 21800
北京 12400
大学 10200
日本 8600
科学 6500
计算 5300
来自 4900
公司 4200
上市 3800
南京 3700
方面 3600
健康 3300
毕业 3000
长江 2800
大桥 2300
学院 2250
湖南 2100
心理 2000
天气 1900
京都 1800
交代 1700
专家 1600
来到 1500
长沙 1400
南京市 1300
市长 1200
硕士 1100
长沙市 1000
邮电 950
科学院 900
大厦 850
就职 800
深造 700
小明 650
亲口 600
网易 560
中国科学院 520
电大 480
计算所 420
天心区 380
北京邮电大学 350
令狐冲 330
郊游 300
学号 280
云 270
长江大桥 260
心理健康 240
T恤 180
湖南长沙市 170
B超 150
京都大学 210
";

/// ユーザー辞書。頻度のない行と品詞だけの行を含む
pub(crate) const USER_DICT: &str = "\
云计算
I nz
B nz
M nz
忽如一夜春风来 3
千树
万树
梨花
";

/// `USER_DICT`の後に重ねるユーザー辞書
pub(crate) const USER_DICT_2: &str = "\
千树万树梨花开 nz
";

/// HMMモデル。出力確率は一部の漢字にのみ与えられています。
pub(crate) const HMM_MODEL: &str = "\
#prob_start
-0.26268660809250016 -3.14e+100 -3.14e+100 -1.4652633398537678
#prob_trans
-3.14e+100 -0.510825623765990 -0.916290731874155 -3.14e+100
-0.5897149736854513 -3.14e+100 -3.14e+100 -0.8085250474669937
-3.14e+100 -0.33344856811948514 -1.2603623820268226 -3.14e+100
-0.7211965654669841 -3.14e+100 -3.14e+100 -0.6658631448798212
#prob_emit
#B
我:-6.03,自:-6.51,邮:-8.02,学:-6.84,杭:-8.47,小:-5.52
#E
来:-6.21,京:-6.93,学:-6.62,号:-7.55,研:-8.13
#M
北:-7.04,电:-7.21,大:-6.40
#S
的:-2.98,了:-3.91,是:-4.21,在:-4.52,他:-5.03,后:-6.02,于:-5.81,先:-6.33,很:-5.51,好:-5.62,去:-6.14,用:-5.93,开:-6.71,云:-8.05
";

/// テキスト形式の辞書とユーザー辞書から`DictionaryInner`を構築します。
pub(crate) fn build_dict(dict: &str, user_dicts: &[&str]) -> DictionaryInner {
    let inner = SystemDictionaryBuilder::from_readers(dict.as_bytes(), HMM_MODEL.as_bytes()).unwrap();
    if user_dicts.is_empty() {
        return inner;
    }
    inner
        .reset_user_lexicon_from_readers(
            user_dicts.iter().map(|d| d.as_bytes()),
            UserWordWeight::Median,
        )
        .unwrap()
}

/// テキスト形式の辞書とユーザー辞書から`Segmenter`を構築します。
pub(crate) fn build_segmenter(dict: &str, user_dicts: &[&str]) -> Segmenter {
    Segmenter::from_inner(build_dict(dict, user_dicts))
}

/// 分割結果の表層形を`/`で連結します。
pub(crate) fn cut_joined(segmenter: &Segmenter, text: &str, mode: CutMode, options: CutOptions) -> String {
    let mut worker = segmenter.new_worker();
    worker.reset_sentence(text);
    worker.cut_with(mode, options);
    worker
        .token_iter()
        .map(|t| t.surface())
        .collect::<Vec<_>>()
        .join("/")
}
