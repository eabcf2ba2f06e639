use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use corpus_entropy::driver::{
    DEFAULT_CORPUS_DIR, DEFAULT_OUTPUT_PATH, DEFAULT_STOPWORDS_PATH, DEFAULT_TITLES,
};
use corpus_entropy::zipf::DEFAULT_MAX_RANK;
use corpus_entropy::{driver, Config, JiebaSegmenter, OutputMode};

#[derive(Debug, Parser)]
#[command(name = "corpus-entropy")]
#[command(about = "Average word/character entropy and Zipf statistics for Chinese corpora", long_about = None)]
struct Args {
    /// Directory holding `<title>.txt` files
    #[arg(long, default_value = DEFAULT_CORPUS_DIR)]
    corpus_dir: PathBuf,

    /// Stopword list, one entry per line
    #[arg(long, default_value = DEFAULT_STOPWORDS_PATH)]
    stopwords: PathBuf,

    /// File that receives each title's raw text
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Comma-separated titles, processed in order
    #[arg(long, default_value = DEFAULT_TITLES)]
    titles: String,

    /// Append to the output file instead of overwriting it per title
    #[arg(long, default_value_t = false)]
    append: bool,

    /// Write `<plot-dir>/<title>_zipf.svg` for every title
    #[arg(long, default_value_t = false)]
    plot: bool,

    #[arg(long, default_value = ".")]
    plot_dir: PathBuf,

    /// Highest rank shown in plots and used for the Zipf fit
    #[arg(long, default_value_t = DEFAULT_MAX_RANK)]
    max_rank: usize,

    /// Disable HMM discovery of unknown words during segmentation
    #[arg(long, default_value_t = false)]
    no_hmm: bool,

    /// Log filter when RUST_LOG is unset (error/warn/info/debug/trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            corpus_dir: args.corpus_dir,
            stopwords_path: args.stopwords,
            output_path: args.output,
            titles: Config::parse_titles(&args.titles),
            output_mode: if args.append {
                OutputMode::Append
            } else {
                OutputMode::Overwrite
            },
            plot: args.plot,
            plot_dir: args.plot_dir,
            max_rank: args.max_rank,
            hmm: !args.no_hmm,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let config = Config::from(args);
    log::debug!("config: {config:?}");

    let segmenter = JiebaSegmenter::new(config.hmm);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    driver::run(&config, segmenter, &mut out).with_context(|| {
        format!(
            "corpus report failed (corpus dir {})",
            config.corpus_dir.display()
        )
    })?;
    out.flush()?;
    Ok(())
}
