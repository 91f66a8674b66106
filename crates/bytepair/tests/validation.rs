//! End-to-end validation of the tokenizer contract.

use bytepair::encoder::SpecialPolicy;
use bytepair::errors::BytepairError;
use bytepair::patterns::GPT2_SPLIT_PATTERN;
use bytepair::tokenizer::Tokenizer;
use tempdir::TempDir;

type T = u32;

const CORPUS: &str = "\
The quick brown fox jumps over the lazy dog. \
the quick brown fox, the quick brown fox! \
Numbers 123 4567 and punctuation... and indentation:
    like this
    like that
";

const SAMPLES: &[&str] = &[
    "",
    "hello world",
    "the quick brown fox",
    "    indented\n\ttabbed\n",
    "unicode: 안녕하세요 👋 (hello in Korean!)",
    "numbers 1234567890 and contractions don't it's we've",
];

fn trained(vocab_size: usize) -> Tokenizer<T> {
    let mut tokenizer: Tokenizer<T> = Tokenizer::new();
    tokenizer.train(CORPUS, vocab_size).unwrap();
    tokenizer
}

#[test]
fn test_round_trip_untrained() {
    let tokenizer: Tokenizer<T> = Tokenizer::new();
    for sample in SAMPLES {
        let ids = tokenizer.encode_ordinary(sample);
        assert_eq!(ids.len(), sample.len(), "one id per byte when untrained");
        assert_eq!(&tokenizer.decode(&ids).unwrap(), sample);
    }
}

#[test]
fn test_round_trip_trained() {
    let tokenizer = trained(256 + 64);
    for sample in SAMPLES {
        let ids = tokenizer.encode_ordinary(sample);
        assert_eq!(&tokenizer.decode(&ids).unwrap(), sample);
    }
}

#[test]
fn test_round_trip_gpt2_pattern() {
    let mut tokenizer: Tokenizer<T> = Tokenizer::with_pattern(GPT2_SPLIT_PATTERN.into()).unwrap();
    tokenizer.train(CORPUS, 256 + 32).unwrap();

    for sample in SAMPLES {
        let ids = tokenizer.encode_ordinary(sample);
        assert_eq!(&tokenizer.decode(&ids).unwrap(), sample);
    }
}

#[test]
fn test_merge_monotonicity() {
    let k = 24;
    let tokenizer = trained(256 + k);
    let merges = tokenizer.model().merges();

    assert_eq!(merges.len(), k);

    let ids: Vec<T> = merges.iter().map(|&(_, idx)| idx).collect();
    let expected: Vec<T> = (256..256 + k as T).collect();
    assert_eq!(ids, expected);

    assert_eq!(tokenizer.model().vocab().len(), 256 + k);
}

#[test]
fn test_trained_encoding_compresses() {
    let tokenizer = trained(256 + 64);

    let text = "the quick brown fox";
    let ids = tokenizer.encode_ordinary(text);
    assert!(ids.len() < text.len());
}

#[test]
fn test_chunk_isolation() {
    let tokenizer = trained(256 + 64);

    // "the" and " quick" split into separate chunks under the GPT
    // pattern; encoding the concatenation must equal the concatenation
    // of the encodings.
    let a = "the";
    let b = " quick";

    let mut expected = tokenizer.encode_ordinary(a);
    expected.extend(tokenizer.encode_ordinary(b));

    assert_eq!(tokenizer.encode_ordinary(&format!("{a}{b}")), expected);
}

#[test]
fn test_special_token_exactness() {
    let mut tokenizer = trained(256 + 32);
    tokenizer
        .register_special_tokens([("<END>", 100256)])
        .unwrap();

    let mut expected = tokenizer.encode_ordinary("hi");
    expected.push(100256);
    expected.extend(tokenizer.encode_ordinary("bye"));

    let ids = tokenizer.encode("hi<END>bye", &SpecialPolicy::All).unwrap();
    assert_eq!(ids, expected);

    assert_eq!(tokenizer.decode(&ids).unwrap(), "hi<END>bye");

    assert!(matches!(
        tokenizer.encode("hi<END>bye", &SpecialPolicy::Reject),
        Err(BytepairError::SpecialTokenConflict(_))
    ));

    // Under `None`, the special text encodes as ordinary bytes.
    let plain = tokenizer
        .encode("hi<END>bye", &SpecialPolicy::None)
        .unwrap();
    assert_eq!(plain, tokenizer.encode_ordinary("hi<END>bye"));
}

#[test]
fn test_persistence_idempotence() {
    let dir = TempDir::new("bytepair-validation").unwrap();
    let prefix = dir.path().join("model");
    let model_path = dir.path().join("model.model");

    let mut tokenizer = trained(256 + 48);
    tokenizer
        .register_special_tokens([("<|endoftext|>", 100257), ("<|fim_prefix|>", 100258)])
        .unwrap();
    tokenizer.save(&prefix).unwrap();

    let mut restored: Tokenizer<T> = Tokenizer::new();
    restored.load(&model_path).unwrap();

    assert_eq!(restored.model().pattern(), tokenizer.model().pattern());
    assert_eq!(restored.model().merges(), tokenizer.model().merges());
    assert_eq!(restored.model().specials(), tokenizer.model().specials());

    for sample in SAMPLES {
        assert_eq!(
            restored.encode_ordinary(sample),
            tokenizer.encode_ordinary(sample),
        );
    }
    let mixed = "some text<|endoftext|>more text";
    assert_eq!(
        restored.encode(mixed, &SpecialPolicy::All).unwrap(),
        tokenizer.encode(mixed, &SpecialPolicy::All).unwrap(),
    );
}

#[test]
fn test_decode_robustness() {
    let tokenizer: Tokenizer<T> = Tokenizer::new();

    // A lone continuation byte and a dangling prefix: replaced, not raised.
    let decoded = tokenizer.decode(&[0x80, b'x' as T, 0xC3]).unwrap();
    assert_eq!(decoded, "\u{FFFD}x\u{FFFD}");
}

#[test]
fn test_decode_rejects_unknown_ids() {
    let tokenizer = trained(256 + 8);
    assert!(matches!(
        tokenizer.decode(&[90000]),
        Err(BytepairError::InvalidToken(_))
    ));
}

#[test]
fn test_uses_trained_pattern_after_load() {
    let dir = TempDir::new("bytepair-validation").unwrap();
    let prefix = dir.path().join("gpt2");

    let mut tokenizer: Tokenizer<T> = Tokenizer::with_pattern(GPT2_SPLIT_PATTERN.into()).unwrap();
    tokenizer.train(CORPUS, 256 + 16).unwrap();
    tokenizer.save(&prefix).unwrap();

    // Loading replaces the default GPT-4 pattern with the persisted one.
    let mut restored: Tokenizer<T> = Tokenizer::new();
    restored.load(&dir.path().join("gpt2.model")).unwrap();
    assert_eq!(restored.model().pattern().as_str(), GPT2_SPLIT_PATTERN.as_str());
}
