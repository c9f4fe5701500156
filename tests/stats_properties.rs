use lift_stats::stats::{histogram, summarize, HistogramConfig};
use proptest::prelude::*;

fn sample() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..700.0, 1..200)
}

proptest! {
    #[test]
    fn variance_is_mean_squared_deviation(values in sample()) {
        let s = summarize(&values, &HistogramConfig::default());
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        prop_assert!((s.mean - mean).abs() < 1e-6);
        prop_assert!((s.variance - var).abs() < 1e-6 * var.max(1.0));
        prop_assert!((s.std_dev - s.variance.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn bucket_counts_cover_every_value(values in sample(), buckets in 1usize..64) {
        let config = HistogramConfig::new(500, buckets);
        let hist = histogram(&values, &config);
        prop_assert_eq!(hist.len(), buckets);
        // Every value is non-negative, so clamping keeps all of them.
        prop_assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), values.len());
    }

    #[test]
    fn bucketing_ignores_input_order(values in sample(), seed in any::<u64>()) {
        let mut shuffled = values.clone();
        // Fisher-Yates driven by a simple LCG.
        let mut x = seed;
        for i in (1..shuffled.len()).rev() {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (x >> 33) as usize % (i + 1);
            shuffled.swap(i, j);
        }

        let config = HistogramConfig::default();
        prop_assert_eq!(summarize(&values, &config), summarize(&shuffled, &config));
    }
}
