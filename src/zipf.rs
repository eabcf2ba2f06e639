//! Zipf rank-frequency view of a ranked frequency list.
//!
//! Zipf's law says the frequency of the `r`-th most common token is roughly proportional to
//! \(r^{-s}\) with \(s \approx 1\). On log-log axes that is a straight line of slope \(-s\).
//!
//! - [`rank_frequency`]: rank the observed counts.
//! - [`theoretical_frequency`]: the reference curve drawn next to the data.
//! - [`fit_exponent`]: least-squares slope of the observed points in log-log space.
//! - [`plot_zipf`]: render both series as an SVG chart.

use std::path::Path;

use plotters::prelude::*;

use crate::{CorpusError, Result};

/// Rank cutoff used by the corpus report.
pub const DEFAULT_MAX_RANK: usize = 1000;

pub const PLOT_TITLE: &str = "Zipf Law for Chinese Corpus";
pub const THEORY_LABEL: &str = "Theoretical Zipf Law (α=1)";

/// A 1-based rank and the frequency observed at that rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankFrequency {
    pub rank: usize,
    pub frequency: usize,
}

/// Rank the first `max_rank` entries of a list already sorted by descending count.
pub fn rank_frequency<T>(ranked: &[(T, usize)], max_rank: usize) -> Vec<RankFrequency> {
    ranked
        .iter()
        .take(max_rank)
        .enumerate()
        .map(|(i, (_, frequency))| RankFrequency {
            rank: i + 1,
            frequency: *frequency,
        })
        .collect()
}

/// Reference curve: 1 at rank 1, \(1 / \log_{10} r\) above it.
///
/// ```
/// use corpus_entropy::zipf::theoretical_frequency;
///
/// assert_eq!(theoretical_frequency(1), 1.0);
/// assert!((theoretical_frequency(10) - 1.0).abs() < 1e-12);
/// assert!((theoretical_frequency(100) - 0.5).abs() < 1e-12);
/// ```
#[must_use]
pub fn theoretical_frequency(rank: usize) -> f64 {
    if rank <= 1 {
        1.0
    } else {
        1.0 / (rank as f64).log10()
    }
}

/// Least-squares line through \((\log_{10} r, \log_{10} f)\).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZipfFit {
    /// Zipf exponent \(s\): the negated slope.
    pub exponent: f64,
    /// \(\log_{10}\) of the fitted frequency at rank 1.
    pub intercept: f64,
    /// Coefficient of determination of the fit.
    pub r_squared: f64,
}

impl ZipfFit {
    /// Fitted frequency at `rank`.
    #[must_use]
    pub fn predict(&self, rank: usize) -> f64 {
        10f64.powf(self.intercept - self.exponent * (rank as f64).log10())
    }
}

/// Fit \(\log_{10} f = b - s \log_{10} r\) by ordinary least squares.
///
/// # Errors
///
/// [`CorpusError::InvalidArgument`] with fewer than two points, a zero rank or frequency,
/// or when every point has the same rank.
///
/// # Examples
///
/// ```
/// use corpus_entropy::zipf::{fit_exponent, RankFrequency};
///
/// let points: Vec<RankFrequency> = (1..=50)
///     .map(|r| RankFrequency { rank: r, frequency: 1_000_000 / (r * r) })
///     .collect();
/// let fit = fit_exponent(&points).unwrap();
/// assert!((fit.exponent - 2.0).abs() < 0.01);
/// ```
pub fn fit_exponent(points: &[RankFrequency]) -> Result<ZipfFit> {
    if points.len() < 2 {
        return Err(CorpusError::InvalidArgument(format!(
            "zipf fit needs at least 2 ranks, got {}",
            points.len()
        )));
    }
    if points.iter().any(|p| p.frequency == 0 || p.rank == 0) {
        return Err(CorpusError::InvalidArgument(
            "zipf fit needs positive ranks and frequencies".to_string(),
        ));
    }

    let xs: Vec<f64> = points.iter().map(|p| (p.rank as f64).log10()).collect();
    let ys: Vec<f64> = points.iter().map(|p| (p.frequency as f64).log10()).collect();
    let n = points.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(&ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    if sxx == 0.0 {
        return Err(CorpusError::InvalidArgument(
            "zipf fit needs at least 2 distinct ranks".to_string(),
        ));
    }
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    // All frequencies equal: the flat line explains everything there is.
    let r_squared = if syy > 0.0 {
        (sxy * sxy) / (sxx * syy)
    } else {
        1.0
    };
    Ok(ZipfFit {
        exponent: -slope,
        intercept,
        r_squared,
    })
}

fn plot_err<E: std::fmt::Display>(e: E) -> CorpusError {
    CorpusError::Plot(e.to_string())
}

/// Draw observed frequencies and the reference curve on log-log axes into an SVG file.
///
/// The observed series covers ranks `1..=min(ranked.len(), max_rank)`; the reference
/// curve always covers `1..=max_rank`.
///
/// # Errors
///
/// [`CorpusError::InvalidArgument`] if `max_rank` is 0, [`CorpusError::Plot`] if the
/// backend fails to draw or write the file.
pub fn plot_zipf<T>(ranked: &[(T, usize)], max_rank: usize, path: impl AsRef<Path>) -> Result<()> {
    if max_rank == 0 {
        return Err(CorpusError::InvalidArgument(
            "max_rank must be at least 1".to_string(),
        ));
    }
    let path = path.as_ref();
    let observed: Vec<(f64, f64)> = rank_frequency(ranked, max_rank)
        .into_iter()
        .filter(|p| p.frequency > 0)
        .map(|p| (p.rank as f64, p.frequency as f64))
        .collect();
    let theory: Vec<(f64, f64)> = (1..=max_rank)
        .map(|r| (r as f64, theoretical_frequency(r)))
        .collect();

    let (y_min, y_max) = observed
        .iter()
        .chain(&theory)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });
    let x_range = 1.0..(max_rank as f64).max(2.0);
    let y_range = (y_min * 0.8)..(y_max * 1.25);

    let root = SVGBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(PLOT_TITLE, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.log_scale(), y_range.log_scale())
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Rank")
        .y_desc("Frequency")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(
            observed
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, BLUE.mix(0.5).filled())),
        )
        .map_err(plot_err)?;

    chart
        .draw_series(DashedLineSeries::new(theory, 6, 4, RED.stroke_width(2)))
        .map_err(plot_err)?
        .label(THEORY_LABEL)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    log::info!(
        "wrote zipf plot ({} observed ranks) to {}",
        observed.len(),
        path.display()
    );
    Ok(())
}
