//! Descriptive statistics and fixed-width histograms over a lift sample.
//!
//! The histogram covers `[0, domain_max)` with `bucket_count` buckets of
//! width `floor(domain_max / bucket_count)`. Values at or beyond the end of
//! the last bucket are clamped into it; negative and non-finite values are
//! not bucketed.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DOMAIN_MAX: u32 = 500;
pub const DEFAULT_BUCKET_COUNT: usize = 32;

// ---------------------------------------------------------------------------
// Histogram configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramConfig {
    domain_max: u32,
    bucket_count: usize,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN_MAX, DEFAULT_BUCKET_COUNT)
    }
}

impl HistogramConfig {
    /// Zero values are raised to 1 so the width is always positive.
    pub fn new(domain_max: u32, bucket_count: usize) -> Self {
        Self {
            domain_max: domain_max.max(1),
            bucket_count: bucket_count.max(1),
        }
    }

    pub fn domain_max(&self) -> u32 {
        self.domain_max
    }

    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// `floor(domain_max / bucket_count)`, at least 1.
    pub fn bucket_width(&self) -> f64 {
        (self.domain_max as usize / self.bucket_count).max(1) as f64
    }

    /// Bucket a value falls into, clamped to the last bucket.
    pub fn bucket_index(&self, value: f64) -> Option<usize> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let raw = (value / self.bucket_width()).floor() as usize;
        Some(raw.min(self.bucket_count - 1))
    }
}

// ---------------------------------------------------------------------------
// Buckets and summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub index: usize,
    /// Lower edge of the bucket's range (`index * width`).
    pub start: f64,
    pub width: f64,
    pub count: usize,
    /// Smallest member, absent when empty.
    pub min: Option<f64>,
    /// Largest member, absent when empty.
    pub max: Option<f64>,
    /// Mean of the members, absent when empty.
    pub mean: Option<f64>,
}

impl Bucket {
    pub fn end(&self) -> f64 {
        self.start + self.width
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Summary of one filtered sample. An empty sample is all zeros with no
/// buckets; that is a normal "no data" result, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Population variance (divisor `count`).
    pub variance: f64,
    pub std_dev: f64,
    pub buckets: Vec<Bucket>,
}

impl Summary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_data(&self) -> bool {
        !self.buckets.is_empty()
    }
}

/// Mean, population variance, standard deviation and histogram of `values`.
///
/// Non-finite values are ignored. The sample is sorted first, so the result
/// does not depend on input order.
pub fn summarize(values: &[f64], config: &HistogramConfig) -> Summary {
    let mut sample: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sample.is_empty() {
        return Summary::empty();
    }
    sample.sort_by(f64::total_cmp);

    let count = sample.len();
    let mean = sample.iter().sum::<f64>() / count as f64;
    let variance = sample.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

    Summary {
        count,
        mean,
        variance,
        std_dev: variance.sqrt(),
        buckets: bucketize(&sample, config),
    }
}

/// Histogram of `values`. Returns no buckets for an empty input, otherwise
/// exactly `config.bucket_count()` buckets (empty ones included).
pub fn histogram(values: &[f64], config: &HistogramConfig) -> Vec<Bucket> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    bucketize(&sorted, config)
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

/// `sorted` must be in ascending order.
fn bucketize(sorted: &[f64], config: &HistogramConfig) -> Vec<Bucket> {
    let width = config.bucket_width();
    let mut acc: Vec<Accumulator> = (0..config.bucket_count())
        .map(|_| Accumulator::default())
        .collect();

    for &v in sorted {
        let Some(i) = config.bucket_index(v) else {
            continue;
        };
        let a = &mut acc[i];
        a.count += 1;
        a.sum += v;
        a.min.get_or_insert(v);
        a.max = Some(v);
    }

    acc.into_iter()
        .enumerate()
        .map(|(index, a)| Bucket {
            index,
            start: index as f64 * width,
            width,
            count: a.count,
            min: a.min,
            max: a.max,
            mean: (a.count > 0).then(|| a.sum / a.count as f64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn empty_sample_is_all_zero() {
        let s = summarize(&[], &HistogramConfig::default());
        assert_eq!(s, Summary::empty());
        assert_eq!(s.mean, 0.0);
        assert_eq!(s.variance, 0.0);
        assert_eq!(s.std_dev, 0.0);
        assert!(s.buckets.is_empty());
        assert!(!s.has_data());
    }

    #[test]
    fn population_variance() {
        let s = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], &HistogramConfig::default());
        assert!((s.mean - 5.0).abs() < EPS);
        assert!((s.variance - 4.0).abs() < EPS);
        assert!((s.std_dev - 2.0).abs() < EPS);
        assert_eq!(s.count, 8);
    }

    #[test]
    fn single_value_lands_in_one_bucket() {
        let s = summarize(&[100.0], &HistogramConfig::default());
        assert_eq!(s.mean, 100.0);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.buckets.len(), DEFAULT_BUCKET_COUNT);

        let nonzero: Vec<&Bucket> = s.buckets.iter().filter(|b| !b.is_empty()).collect();
        assert_eq!(nonzero.len(), 1);
        // width 15: 100 / 15 = 6.67 → bucket 6
        assert_eq!(nonzero[0].index, 6);
        assert_eq!(nonzero[0].start, 90.0);
        assert_eq!(nonzero[0].min, Some(100.0));
        assert_eq!(nonzero[0].max, Some(100.0));
        assert_eq!(nonzero[0].mean, Some(100.0));
    }

    #[test]
    fn default_width_is_floored() {
        let config = HistogramConfig::default();
        assert_eq!(config.bucket_width(), 15.0);
        assert_eq!(HistogramConfig::new(520, 32).bucket_width(), 16.0);
        assert_eq!(HistogramConfig::new(0, 0).bucket_width(), 1.0);
    }

    #[test]
    fn overflow_is_clamped_into_last_bucket() {
        let config = HistogramConfig::default();
        // 32 * 15 = 480: everything from 480 upwards goes to bucket 31.
        assert_eq!(config.bucket_index(479.9), Some(31));
        assert_eq!(config.bucket_index(480.0), Some(31));
        assert_eq!(config.bucket_index(650.0), Some(31));
        assert_eq!(config.bucket_index(0.0), Some(0));
        assert_eq!(config.bucket_index(-1.0), None);
        assert_eq!(config.bucket_index(f64::NAN), None);

        let buckets = histogram(&[10.0, 495.0, 700.0], &config);
        assert_eq!(buckets[31].count, 2);
        assert_eq!(buckets[31].max, Some(700.0));
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn bucket_members_summary() {
        let buckets = histogram(&[31.0, 30.0, 44.0], &HistogramConfig::default());
        let b = &buckets[2];
        assert_eq!(b.count, 3);
        assert_eq!(b.min, Some(30.0));
        assert_eq!(b.max, Some(44.0));
        assert!((b.mean.unwrap() - 35.0).abs() < EPS);
        assert_eq!(b.end(), 45.0);
        assert!(buckets[0].is_empty());
        assert_eq!(buckets[0].max, None);
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let s = summarize(&[f64::NAN, 10.0, f64::INFINITY, 20.0], &HistogramConfig::default());
        assert_eq!(s.count, 2);
        assert!((s.mean - 15.0).abs() < EPS);
    }
}
