use corpus_entropy::text::StopwordSet;
use corpus_entropy::zipf::{
    fit_exponent, plot_zipf, rank_frequency, theoretical_frequency, DEFAULT_MAX_RANK,
};
use corpus_entropy::{calculate_word_frequencies, JiebaSegmenter, Preprocessor};

fn usage() -> ! {
    eprintln!(
        "Usage:\n  cargo run --example zipf_report -- <corpus.txt> [stopwords.txt] [out.svg]\n\n\
Prints the top-ranked words, the fitted Zipf exponent, and writes a log-log plot\n\
(default out.svg: zipf.svg)."
    );
    std::process::exit(2);
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        usage();
    }
    let corpus = &args[0];
    let out = args.get(2).map(String::as_str).unwrap_or("zipf.svg");

    let stopwords = match args.get(1) {
        Some(path) => StopwordSet::load(path).unwrap(),
        None => StopwordSet::empty(),
    };
    let preprocessor = Preprocessor::new(stopwords, JiebaSegmenter::default());
    let pre = preprocessor.preprocess_file(corpus).unwrap();

    let ranked = calculate_word_frequencies(&pre.tokens);
    println!(
        "{} tokens, {} distinct words",
        pre.tokens.len(),
        ranked.len()
    );
    println!("{:>5} {:>8} {:>10}  word", "rank", "freq", "1/log10 r");
    for (i, (word, freq)) in ranked.iter().take(20).enumerate() {
        println!(
            "{:>5} {:>8} {:>10.4}  {}",
            i + 1,
            freq,
            theoretical_frequency(i + 1),
            word
        );
    }

    match fit_exponent(&rank_frequency(&ranked, DEFAULT_MAX_RANK)) {
        Ok(fit) => println!(
            "zipf fit: s={:.3} log10(C)={:.3} R²={:.3}",
            fit.exponent, fit.intercept, fit.r_squared
        ),
        Err(e) => println!("zipf fit unavailable: {e}"),
    }

    plot_zipf(&ranked, DEFAULT_MAX_RANK, out).unwrap();
    println!("plot written to {out}");
}
