//! `corpus-entropy`: frequency, entropy and Zipf statistics over Chinese text corpora.
//!
//! The pipeline is small and linear:
//!
//! ```text
//! raw file -> text::Preprocessor (CJK filter, stopwords, segmentation)
//!          -> token stream -> FrequencyTable -> { ranked list, average entropy }
//!          -> zipf (optional fit + SVG plot)
//! ```
//!
//! ## Entropy conventions
//!
//! Two scalars are computed from a token stream with per-distinct-token counts
//! \(c_1, \dots, c_m\) and \(n = \sum_i c_i\):
//!
//! 1. **Shannon entropy** (bits): \(H = -\sum_i \frac{c_i}{n} \log_2 \frac{c_i}{n}\).
//! 2. **Average entropy** (bits per distinct token): \(H / m\).
//!
//! The corpus report uses the second one. It is *not* the textbook entropy of the
//! distribution; [`shannon_entropy_bits_from_counts`] is kept alongside it for comparison.
//!
//! ## Quick example
//!
//! ```rust
//! use corpus_entropy::{calculate_average_entropy, text::CharSegmenter, Unit};
//!
//! let h = calculate_average_entropy("你好世界你好", Unit::Char, &CharSegmenter).unwrap();
//! assert!((h - 0.4796).abs() < 1e-4);
//! ```

#![forbid(unsafe_code)]

use core::fmt;
use core::str::FromStr;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

pub mod driver;
pub mod text;
pub mod zipf;

pub use driver::{BookReport, Config, OutputMode};
pub use text::{JiebaSegmenter, Preprocessed, Preprocessor, Segmenter, StopwordSet};
pub use zipf::{RankFrequency, ZipfFit};

/// Errors for corpus loading and statistics.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8", path.display())]
    Encoding { path: PathBuf },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("empty token stream")]
    EmptySample,

    #[error("plot failed: {0}")]
    Plot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = core::result::Result<T, CorpusError>;

impl CorpusError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CorpusError::FileAccess {
            path: path.into(),
            source,
        }
    }
}

/// Token granularity for entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Word tokens produced by a [`Segmenter`].
    Word,
    /// Single characters, no segmentation.
    Char,
}

impl FromStr for Unit {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "word" => Ok(Unit::Word),
            "char" => Ok(Unit::Char),
            other => Err(CorpusError::InvalidArgument(format!(
                "unit must be 'word' or 'char', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Word => f.write_str("word"),
            Unit::Char => f.write_str("char"),
        }
    }
}

/// Occurrence counts per distinct token.
///
/// Tokens keep the order in which they were first seen; [`FrequencyTable::ranked`] relies
/// on this to break ties between equal counts.
///
/// Invariant: `total() == sum of all counts == number of tokens consumed`.
///
/// # Examples
///
/// ```
/// use corpus_entropy::FrequencyTable;
///
/// let table = FrequencyTable::from_tokens(["你", "好", "世", "界", "你", "好"]);
/// assert_eq!(table.total(), 6);
/// assert_eq!(table.distinct(), 4);
/// assert_eq!(table.get("你"), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
    total: usize,
}

impl FrequencyTable {
    /// Count every token of a stream.
    pub fn from_tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut table = Self::default();
        for token in tokens {
            table.add(token.as_ref());
        }
        table
    }

    fn add(&mut self, token: &str) {
        match self.index.get(token) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(token.to_owned(), self.entries.len());
                self.entries.push((token.to_owned(), 1));
            }
        }
        self.total += 1;
    }

    /// Number of tokens counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct tokens.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count for `token`, 0 if never seen.
    #[must_use]
    pub fn get(&self, token: &str) -> usize {
        self.index
            .get(token)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    /// Per-distinct-token counts in first-occurrence order.
    #[must_use]
    pub fn counts(&self) -> Vec<usize> {
        self.entries.iter().map(|(_, c)| *c).collect()
    }

    /// `(token, count)` sorted by count, descending.
    ///
    /// The sort is stable, so among equal counts the token seen first in the input
    /// comes first.
    #[must_use]
    pub fn ranked(&self) -> Vec<(String, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Count a token stream and return `(token, count)` pairs by descending count.
///
/// # Examples
///
/// ```
/// use corpus_entropy::calculate_word_frequencies;
///
/// let ranked = calculate_word_frequencies(["江湖", "剑", "江湖", "刀", "剑", "江湖"]);
/// assert_eq!(ranked[0], ("江湖".to_string(), 3));
/// assert_eq!(ranked[1], ("剑".to_string(), 2));
/// ```
pub fn calculate_word_frequencies<I, T>(tokens: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    FrequencyTable::from_tokens(tokens).ranked()
}

/// Empirical probabilities `c_i / n` over the positive counts, in input order.
///
/// Zero counts are unseen tokens; they are neither distinct nor part of `n`.
///
/// # Errors
///
/// Returns [`CorpusError::EmptySample`] if there is no positive count.
///
/// # Examples
///
/// ```
/// use corpus_entropy::empirical_simplex_from_counts;
///
/// assert_eq!(empirical_simplex_from_counts(&[1, 0, 3]).unwrap(), vec![0.25, 0.75]);
/// ```
pub fn empirical_simplex_from_counts(counts: &[usize]) -> Result<Vec<f64>> {
    let observed: Vec<usize> = counts.iter().copied().filter(|&c| c > 0).collect();
    if observed.is_empty() {
        return Err(CorpusError::EmptySample);
    }
    let n = observed.iter().sum::<usize>() as f64;
    Ok(observed.into_iter().map(|c| (c as f64) / n).collect())
}

/// Shannon entropy (bits) of the empirical distribution given by per-token counts.
///
/// \[
/// H = -\sum_i \frac{c_i}{n} \log_2 \frac{c_i}{n}
/// \]
///
/// # Errors
///
/// Returns [`CorpusError::EmptySample`] if there is no positive count.
///
/// # Examples
///
/// ```
/// use corpus_entropy::shannon_entropy_bits_from_counts;
///
/// let h = shannon_entropy_bits_from_counts(&[4, 4]).unwrap();
/// assert!((h - 1.0).abs() < 1e-12);
/// ```
pub fn shannon_entropy_bits_from_counts(counts: &[usize]) -> Result<f64> {
    let p = empirical_simplex_from_counts(counts)?;
    Ok(logp::entropy_unchecked(&p) / std::f64::consts::LN_2)
}

/// Average entropy (bits per distinct token) from per-token counts.
///
/// The Shannon entropy of the counts divided by the number of distinct tokens `m`:
///
/// \[
/// \bar H = \frac{1}{m} \sum_{i=1}^{m} -\frac{c_i}{n} \log_2 \frac{c_i}{n}
/// \]
///
/// # Errors
///
/// Returns [`CorpusError::EmptySample`] when there are no distinct tokens, where the
/// average is undefined.
///
/// # Examples
///
/// ```
/// use corpus_entropy::average_entropy_bits_from_counts;
///
/// // Uniform over 4 tokens: H = 2 bits, averaged over 4 tokens.
/// let h = average_entropy_bits_from_counts(&[3, 3, 3, 3]).unwrap();
/// assert!((h - 0.5).abs() < 1e-12);
/// ```
pub fn average_entropy_bits_from_counts(counts: &[usize]) -> Result<f64> {
    let p = empirical_simplex_from_counts(counts)?;
    Ok(logp::entropy_unchecked(&p) / std::f64::consts::LN_2 / p.len() as f64)
}

/// Split `text` into the token stream for `unit`.
pub fn tokens_for_unit<S>(text: &str, unit: Unit, segmenter: &S) -> Vec<String>
where
    S: Segmenter + ?Sized,
{
    match unit {
        Unit::Word => segmenter.segment(text),
        Unit::Char => text.chars().map(String::from).collect(),
    }
}

/// Average entropy (bits per distinct token) of `text` at the given granularity.
///
/// # Errors
///
/// Returns [`CorpusError::EmptySample`] if `text` produces no tokens.
pub fn calculate_average_entropy<S>(text: &str, unit: Unit, segmenter: &S) -> Result<f64>
where
    S: Segmenter + ?Sized,
{
    let tokens = tokens_for_unit(text, unit, segmenter);
    let table = FrequencyTable::from_tokens(&tokens);
    log::debug!(
        "{unit}-level stream: {} tokens, {} distinct",
        table.total(),
        table.distinct()
    );
    average_entropy_bits_from_counts(&table.counts())
}

/// Like [`calculate_average_entropy`] with the unit given by name (`"word"` or `"char"`).
///
/// # Errors
///
/// Returns [`CorpusError::InvalidArgument`] for any other unit name, before any
/// segmentation happens.
pub fn calculate_average_entropy_named<S>(text: &str, unit: &str, segmenter: &S) -> Result<f64>
where
    S: Segmenter + ?Sized,
{
    let unit: Unit = unit.parse()?;
    calculate_average_entropy(text, unit, segmenter)
}
