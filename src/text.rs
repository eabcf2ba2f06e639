//! Text preparation: stopword lists, CJK filtering and word segmentation.
//!
//! [`Preprocessor::preprocess_file`] runs the whole chain on a corpus file:
//!
//! 1. decode the file as UTF-8,
//! 2. keep only CJK unified ideographs (U+4E00..=U+9FA5),
//! 3. drop whitespace-separated tokens that are stopwords,
//! 4. segment what is left into words.
//!
//! Step 2 removes all whitespace, so step 3 only ever sees a single token. It can
//! still remove the whole text when that token is itself a stopword.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use jieba_rs::Jieba;

use crate::{CorpusError, Result};

/// First and last code point treated as a Chinese character.
pub const CJK_FIRST: char = '\u{4E00}';
pub const CJK_LAST: char = '\u{9FA5}';

/// Anything that turns text into an ordered sequence of word tokens.
pub trait Segmenter {
    fn segment(&self, text: &str) -> Vec<String>;
}

impl<S: Segmenter + ?Sized> Segmenter for &S {
    fn segment(&self, text: &str) -> Vec<String> {
        (**self).segment(text)
    }
}

/// Dictionary-based Chinese word segmentation backed by `jieba-rs`.
pub struct JiebaSegmenter {
    jieba: Jieba,
    hmm: bool,
}

impl JiebaSegmenter {
    /// Load the embedded default dictionary. `hmm` enables HMM discovery of
    /// out-of-dictionary words.
    pub fn new(hmm: bool) -> Self {
        Self {
            jieba: Jieba::new(),
            hmm,
        }
    }
}

impl Default for JiebaSegmenter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Segmenter for JiebaSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        self.jieba
            .cut(text, self.hmm)
            .into_iter()
            .map(str::to_owned)
            .collect()
    }
}

/// One token per character.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharSegmenter;

impl Segmenter for CharSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        text.chars().map(String::from).collect()
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{1C}' | '\u{1D}' | '\u{1E}' | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

pub(crate) fn read_utf8(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| CorpusError::file_access(path, e))?;
    String::from_utf8(bytes).map_err(|_| CorpusError::Encoding {
        path: path.to_path_buf(),
    })
}

/// Read a stopword file: one entry per non-empty line, in file order.
///
/// Lines are split on every Unicode line boundary (`\n`, `\r\n`, `\r`, ...). Entries
/// are not trimmed and duplicates are kept.
///
/// # Errors
///
/// [`CorpusError::FileAccess`] if the file cannot be read, [`CorpusError::Encoding`]
/// if it is not UTF-8.
pub fn load_stopwords(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = read_utf8(path)?;
    let words: Vec<String> = text
        .split(is_line_break)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect();
    log::debug!("loaded {} stopwords from {}", words.len(), path.display());
    Ok(words)
}

/// Membership-testable stopword collection.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(load_stopwords(path)?.into_iter().collect())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StopwordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Keep only CJK unified ideographs; everything else (punctuation, whitespace,
/// Latin letters, digits) is dropped without a separator.
///
/// ```
/// use corpus_entropy::text::filter_cjk;
///
/// assert_eq!(filter_cjk("你好，世界！你好。"), "你好世界你好");
/// assert_eq!(filter_cjk("abc 123"), "");
/// ```
pub fn filter_cjk(text: &str) -> String {
    text.chars()
        .filter(|c| (CJK_FIRST..=CJK_LAST).contains(c))
        .collect()
}

/// Split on whitespace, drop exact stopword matches, rejoin with single spaces.
pub fn remove_stopwords(text: &str, stopwords: &StopwordSet) -> String {
    text.split_whitespace()
        .filter(|word| !stopwords.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Output of preprocessing one corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessed {
    /// Word tokens from the segmenter.
    pub tokens: Vec<String>,
    /// Filtered, stopword-stripped text before segmentation.
    pub text: String,
}

/// Corpus preprocessing with a loaded stopword set and a segmenter.
pub struct Preprocessor<S> {
    stopwords: StopwordSet,
    segmenter: S,
}

impl<S: Segmenter> Preprocessor<S> {
    pub fn new(stopwords: StopwordSet, segmenter: S) -> Self {
        Self {
            stopwords,
            segmenter,
        }
    }

    /// Load the stopword file once and keep it for every later call.
    ///
    /// # Errors
    ///
    /// [`CorpusError::FileAccess`] / [`CorpusError::Encoding`] for the stopword file.
    pub fn from_stopword_file(path: impl AsRef<Path>, segmenter: S) -> Result<Self> {
        Ok(Self::new(StopwordSet::load(path)?, segmenter))
    }

    pub fn segmenter(&self) -> &S {
        &self.segmenter
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    /// Preprocess already-decoded text.
    pub fn preprocess_text(&self, raw: &str) -> Preprocessed {
        let filtered = filter_cjk(raw);
        let text = remove_stopwords(&filtered, &self.stopwords);
        if text.is_empty() {
            log::warn!("no Chinese text left after filtering");
        }
        let tokens = self.segmenter.segment(&text);
        log::debug!(
            "preprocessed {} chars -> {} chars, {} tokens",
            raw.chars().count(),
            text.chars().count(),
            tokens.len()
        );
        Preprocessed { tokens, text }
    }

    /// Read `path` and preprocess it.
    ///
    /// # Errors
    ///
    /// [`CorpusError::FileAccess`] / [`CorpusError::Encoding`] for the corpus file.
    pub fn preprocess_file(&self, path: impl AsRef<Path>) -> Result<Preprocessed> {
        let raw = read_utf8(path.as_ref())?;
        Ok(self.preprocess_text(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::OnceLock;

    fn jieba() -> &'static JiebaSegmenter {
        static SEG: OnceLock<JiebaSegmenter> = OnceLock::new();
        SEG.get_or_init(JiebaSegmenter::default)
    }

    fn cjk_string() -> impl Strategy<Value = String> {
        prop::collection::vec(0x4E00u32..=0x9FA5, 1..40)
            .prop_map(|cps| cps.into_iter().filter_map(char::from_u32).collect())
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

        #[test]
        fn segmentation_preserves_filtered_text(text in cjk_string()) {
            let pre = Preprocessor::new(StopwordSet::empty(), jieba());
            let out = pre.preprocess_text(&text);
            prop_assert_eq!(&out.text, &text);
            prop_assert_eq!(out.tokens.concat(), text);
        }

        #[test]
        fn filter_keeps_only_cjk(raw in "\\PC{0,60}") {
            let filtered = filter_cjk(&raw);
            prop_assert!(filtered.chars().all(|c| (CJK_FIRST..=CJK_LAST).contains(&c)));
            prop_assert!(!filtered.chars().any(char::is_whitespace));
        }
    }

    #[test]
    fn greeting_is_filtered_and_segmented() {
        let pre = Preprocessor::new(StopwordSet::empty(), CharSegmenter);
        let out = pre.preprocess_text("你好，世界！你好。");
        assert_eq!(out.text, "你好世界你好");
        assert_eq!(out.tokens, ["你", "好", "世", "界", "你", "好"]);
    }

    #[test]
    fn filter_bounds_are_inclusive() {
        assert_eq!(filter_cjk("\u{4DFF}\u{4E00}\u{9FA5}\u{9FA6}"), "\u{4E00}\u{9FA5}");
    }

    #[test]
    fn no_cjk_gives_empty_stream() {
        let pre = Preprocessor::new(StopwordSet::empty(), jieba());
        let out = pre.preprocess_text("Hello, world! 2024");
        assert!(out.text.is_empty());
        assert!(out.tokens.is_empty());
    }

    #[test]
    fn stopwords_only_match_whole_whitespace_tokens() {
        let stop: StopwordSet = ["的", "了"].into_iter().collect();
        // After CJK filtering the text is one token, so inner stopwords survive.
        assert_eq!(remove_stopwords("我 的 书", &stop), "我 书");
        assert_eq!(remove_stopwords("  的  ", &stop), "");

        let pre = Preprocessor::new(stop, CharSegmenter);
        let out = pre.preprocess_text("我的书，了");
        assert_eq!(out.text, "我的书了");
    }

    #[test]
    fn text_equal_to_a_stopword_is_removed() {
        let stop: StopwordSet = ["的"].into_iter().collect();
        let pre = Preprocessor::new(stop, CharSegmenter);
        let out = pre.preprocess_text("的。");
        assert!(out.text.is_empty());
        assert!(out.tokens.is_empty());
    }

    #[test]
    fn stopword_file_splits_on_universal_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stop.txt");
        fs::write(&path, "的\r\n了\r在\n\n 是 \n和").unwrap();
        let words = load_stopwords(&path).unwrap();
        assert_eq!(words, ["的", "了", "在", " 是 ", "和"]);

        let set = StopwordSet::load(&path).unwrap();
        assert_eq!(set.len(), 5);
        assert!(set.contains(" 是 "));
        assert!(!set.contains("是"));
    }

    #[test]
    fn stopword_duplicates_are_kept_by_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stop.txt");
        fs::write(&path, "的\n的\n").unwrap();
        assert_eq!(load_stopwords(&path).unwrap().len(), 2);
        assert_eq!(StopwordSet::load(&path).unwrap().len(), 1);
    }

    #[test]
    fn missing_stopword_file_is_file_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_stopwords(dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, CorpusError::FileAccess { .. }));
    }

    #[test]
    fn invalid_utf8_corpus_is_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let stop = dir.path().join("stop.txt");
        fs::write(&stop, "").unwrap();
        let corpus = dir.path().join("book.txt");
        fs::write(&corpus, [0xE4u8, 0xBD, 0xFF, 0xFE]).unwrap();

        let pre = Preprocessor::from_stopword_file(&stop, CharSegmenter).unwrap();
        let err = pre.preprocess_file(&corpus).unwrap_err();
        assert!(matches!(err, CorpusError::Encoding { .. }));
    }

    #[test]
    fn preprocess_file_reads_corpus_and_stopwords() {
        let dir = tempfile::tempdir().unwrap();
        let stop = dir.path().join("stop.txt");
        fs::write(&stop, "江湖\n").unwrap();
        let corpus = dir.path().join("book.txt");
        fs::write(&corpus, "第一回 江湖。\n").unwrap();

        let pre = Preprocessor::from_stopword_file(&stop, CharSegmenter).unwrap();
        assert!(pre.stopwords().contains("江湖"));
        let out = pre.preprocess_file(&corpus).unwrap();
        assert_eq!(out.text, "第一回江湖");
        assert_eq!(out.tokens.len(), 5);
    }

    #[test]
    fn missing_stopword_file_fails_construction() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Preprocessor::from_stopword_file(dir.path().join("missing.txt"), CharSegmenter),
            Err(CorpusError::FileAccess { .. })
        ));
    }

    #[test]
    fn stopwords_are_read_once() {
        let dir = tempfile::tempdir().unwrap();
        let stop = dir.path().join("stop.txt");
        fs::write(&stop, "江湖\n").unwrap();
        let pre = Preprocessor::from_stopword_file(&stop, CharSegmenter).unwrap();
        fs::remove_file(&stop).unwrap();

        assert!(pre.preprocess_text("江湖").text.is_empty());
        assert_eq!(pre.preprocess_text("刀剑").text, "刀剑");
    }

    #[test]
    fn jieba_segments_common_words() {
        let tokens = jieba().segment("我们中出了一个叛徒");
        assert_eq!(tokens.concat(), "我们中出了一个叛徒");
        assert!(tokens.len() > 1);
        assert!(jieba().segment("").is_empty());
    }
}
