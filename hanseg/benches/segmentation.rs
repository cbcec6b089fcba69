//! 分割モードごとの分かち書き速度のベンチマーク
//!
//! テスト用の小さな辞書を使い、同じコーパスを各モードで分割する速度を計測します。

use std::sync::Arc;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hanseg::{CutMode, Dictionary, Segmenter, SystemDictionaryBuilder, UserWordWeight};

const DICT: &str = include_str!("../tests/resources/dict.txt");
const USER_DICT: &str = include_str!("../tests/resources/user_dict.txt");
const HMM_MODEL: &str = include_str!("../tests/resources/hmm_model.txt");

const SENTENCES: &[&str] = &[
    "我来自北京邮电大学。。。学号123456，用AK47",
    "他来到了网易杭研大厦",
    "小明硕士毕业于中国科学院计算所，后在日本京都大学深造",
    "令狐冲是云计算方面的专家",
    "南京市长江大桥",
    "湖南长沙市天心区",
    "天气很好，🙋 我们去郊游。",
    "上市公司CEO",
];

fn load_dictionary() -> Dictionary {
    let inner = SystemDictionaryBuilder::from_readers(DICT.as_bytes(), HMM_MODEL.as_bytes())
        .and_then(|d| d.reset_user_lexicon_from_readers([USER_DICT.as_bytes()], UserWordWeight::Median))
        .unwrap_or_else(|e| panic!("Failed to build the dictionary: {e}"));
    let mut buffer = vec![];
    inner.write(&mut buffer).unwrap();
    Dictionary::read(buffer.as_slice()).unwrap()
}

fn benchmark_modes(c: &mut Criterion) {
    let dict = Arc::new(load_dictionary());
    let lines: Vec<&str> = SENTENCES.iter().copied().cycle().take(800).collect();
    let total_bytes: usize = lines.iter().map(|l| l.len()).sum();

    let mut group = c.benchmark_group("Segmentation Speed");
    group.throughput(Throughput::Bytes(total_bytes as u64));
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));

    for (name, mode) in [
        ("MaxProb", CutMode::MaxProb),
        ("Hmm", CutMode::Hmm),
        ("Mix", CutMode::Mix),
        ("Full", CutMode::Full),
        ("Query", CutMode::Query),
    ] {
        group.bench_function(BenchmarkId::new(name, "Corpus"), |b| {
            b.iter_with_setup(
                || Segmenter::from_shared_dictionary(dict.clone()).new_worker(),
                |mut worker| {
                    for line in &lines {
                        worker.reset_sentence(line);
                        worker.cut(mode);
                    }
                },
            );
        });
    }
    group.finish();
}

fn benchmark_loading(c: &mut Criterion) {
    let mut buffer = vec![];
    load_dictionary().write(&mut buffer).unwrap();

    c.bench_function("Dictionary::read", |b| {
        b.iter(|| Dictionary::read(buffer.as_slice()).unwrap());
    });
}

criterion_group!(benches, benchmark_modes, benchmark_loading);
criterion_main!(benches);
