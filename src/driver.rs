//! Corpus report: run the pipeline over a list of titles and print entropies.
//!
//! For every title, in order:
//!
//! 1. copy `<corpus_dir>/<title>.txt` into the output file,
//! 2. preprocess it,
//! 3. fit the Zipf exponent and, when enabled, write `<plot_dir>/<title>_zipf.svg`,
//! 4. print word-level and character-level average entropy.
//!
//! The first failure stops the run; titles after it are not attempted.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::text::{read_utf8, Preprocessed, Preprocessor, Segmenter};
use crate::zipf::{self, ZipfFit, DEFAULT_MAX_RANK};
use crate::{calculate_average_entropy, calculate_word_frequencies, CorpusError, Result, Unit};

pub const DEFAULT_CORPUS_DIR: &str = "jyxstxtqj_downcc.com";
pub const DEFAULT_STOPWORDS_PATH: &str = "cn_stopwords.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "jyxstxtqj_downcc.com/all.txt";
pub const DEFAULT_TITLES: &str = "白马啸西风,碧血剑,飞狐外传,连城诀,鹿鼎记,三十三剑客图,射雕英雄传,神雕侠侣,书剑恩仇录,天龙八部,侠客行,笑傲江湖,雪山飞狐,倚天屠龙记,鸳鸯刀,越女剑";

/// How each title's raw text lands in the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Truncate on every title: the file ends up holding only the last title.
    #[default]
    Overwrite,
    /// Concatenate all titles in run order.
    Append,
}

/// Everything the report needs to know about where things live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub corpus_dir: PathBuf,
    pub stopwords_path: PathBuf,
    pub output_path: PathBuf,
    pub titles: Vec<String>,
    pub output_mode: OutputMode,
    /// Write a Zipf SVG per title.
    pub plot: bool,
    pub plot_dir: PathBuf,
    pub max_rank: usize,
    /// HMM discovery of unknown words in the jieba segmenter.
    pub hmm: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from(DEFAULT_CORPUS_DIR),
            stopwords_path: PathBuf::from(DEFAULT_STOPWORDS_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            titles: Self::parse_titles(DEFAULT_TITLES),
            output_mode: OutputMode::Overwrite,
            plot: false,
            plot_dir: PathBuf::from("."),
            max_rank: DEFAULT_MAX_RANK,
            hmm: true,
        }
    }
}

impl Config {
    /// Split a comma-separated title list, trimming each entry and skipping blanks.
    ///
    /// ```
    /// use corpus_entropy::Config;
    ///
    /// assert_eq!(Config::parse_titles(" 碧血剑, 鹿鼎记 ,"), ["碧血剑", "鹿鼎记"]);
    /// ```
    pub fn parse_titles(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .collect()
    }

    pub fn corpus_path(&self, title: &str) -> PathBuf {
        self.corpus_dir.join(format!("{title}.txt"))
    }

    pub fn plot_path(&self, title: &str) -> PathBuf {
        self.plot_dir.join(format!("{title}_zipf.svg"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_rank == 0 {
            return Err(CorpusError::InvalidArgument(
                "max_rank must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Results for one title.
#[derive(Debug, Clone, PartialEq)]
pub struct BookReport {
    pub title: String,
    pub word_entropy: f64,
    pub char_entropy: f64,
    /// Word tokens after preprocessing.
    pub tokens: usize,
    /// `None` when fewer than two distinct words were found.
    pub zipf: Option<ZipfFit>,
}

fn mirror_to_output(source: &Path, output: &Path, mode: OutputMode) -> Result<()> {
    let content = read_utf8(source)?;
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        OutputMode::Overwrite => options.write(true).truncate(true),
        OutputMode::Append => options.append(true),
    };
    let mut file = options
        .open(output)
        .map_err(|e| CorpusError::file_access(output, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| CorpusError::file_access(output, e))
}

fn process_title<S, W>(
    config: &Config,
    preprocessor: &Preprocessor<S>,
    title: &str,
    out: &mut W,
) -> Result<BookReport>
where
    S: Segmenter,
    W: Write,
{
    let corpus = config.corpus_path(title);
    log::info!("processing {title} ({})", corpus.display());

    mirror_to_output(&corpus, &config.output_path, config.output_mode)?;
    let Preprocessed { tokens, text } = preprocessor.preprocess_file(&corpus)?;

    let ranked = calculate_word_frequencies(&tokens);
    let fit = match zipf::fit_exponent(&zipf::rank_frequency(&ranked, config.max_rank)) {
        Ok(fit) => {
            log::info!(
                "{title}: zipf exponent {:.3} (R² {:.3})",
                fit.exponent,
                fit.r_squared
            );
            Some(fit)
        }
        Err(e) => {
            log::debug!("{title}: no zipf fit: {e}");
            None
        }
    };
    if config.plot {
        zipf::plot_zipf(&ranked, config.max_rank, config.plot_path(title))?;
    }

    let word_entropy = calculate_average_entropy(&text, Unit::Word, preprocessor.segmenter())?;
    writeln!(out, "Average entropy (word level): {word_entropy:.4} bits")?;
    let char_entropy = calculate_average_entropy(&text, Unit::Char, preprocessor.segmenter())?;
    writeln!(out, "Average entropy (character level): {char_entropy:.4} bits")?;

    Ok(BookReport {
        title: title.to_owned(),
        word_entropy,
        char_entropy,
        tokens: tokens.len(),
        zipf: fit,
    })
}

/// Run the report over `config.titles`, writing two lines per title to `out`.
///
/// # Errors
///
/// A missing or undecodable stopword file fails before any title is touched. After that,
/// the first error from any title is returned as is; nothing after it runs.
pub fn run<S, W>(config: &Config, segmenter: S, out: &mut W) -> Result<Vec<BookReport>>
where
    S: Segmenter,
    W: Write,
{
    config.validate()?;
    let preprocessor = Preprocessor::from_stopword_file(&config.stopwords_path, segmenter)?;
    let mut reports = Vec::with_capacity(config.titles.len());
    for title in &config.titles {
        reports.push(process_title(config, &preprocessor, title, out)?);
    }
    log::info!("processed {} titles", reports.len());
    Ok(reports)
}
