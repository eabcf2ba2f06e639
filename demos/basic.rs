use corpus_entropy::text::{filter_cjk, CharSegmenter};
use corpus_entropy::{
    average_entropy_bits_from_counts, calculate_average_entropy, shannon_entropy_bits_from_counts,
    FrequencyTable, JiebaSegmenter, Unit,
};

fn main() {
    let raw = "郭靖道：“为国为民，侠之大者。”黄蓉笑道：“靖哥哥，侠之大者。”";
    let text = filter_cjk(raw);

    let jieba = JiebaSegmenter::default();
    let h_word = calculate_average_entropy(&text, Unit::Word, &jieba).unwrap();
    let h_char = calculate_average_entropy(&text, Unit::Char, &CharSegmenter).unwrap();

    let chars = FrequencyTable::from_tokens(text.chars().map(String::from));
    let h_shannon = shannon_entropy_bits_from_counts(&chars.counts()).unwrap();
    let h_avg = average_entropy_bits_from_counts(&chars.counts()).unwrap();

    assert!(h_word >= 0.0 && h_char >= 0.0);
    assert!((h_avg - h_char).abs() < 1e-12);
    assert!((h_avg * chars.distinct() as f64 - h_shannon).abs() < 1e-9);

    println!("text: {text}");
    println!(
        "n={} distinct={} H={:.4} bits",
        chars.total(),
        chars.distinct(),
        h_shannon
    );
    println!("Average entropy (word level): {h_word:.4} bits");
    println!("Average entropy (character level): {h_char:.4} bits");
}
