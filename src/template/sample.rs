use rand::Rng;

pub const SAMPLE_BASE: f64 = 24.0;

/// `24.0 + uniform(0, 1)` rounded to one decimal place, so always within
/// `[24.0, 25.0]`.
pub fn random_sample_value<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let v = SAMPLE_BASE + rng.random_range(0.0..=1.0);
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn values_stay_in_range_with_one_decimal() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let v = random_sample_value(&mut rng);
            assert!((24.0..=25.0).contains(&v), "{v} out of range");
            let text = v.to_string();
            let decimals = text.split_once('.').map_or(0, |(_, d)| d.len());
            assert!(decimals <= 1, "{text} has more than one decimal");
        }
    }

    #[test]
    fn same_seed_same_values() {
        let a: Vec<f64> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..20).map(|_| random_sample_value(&mut rng)).collect()
        };
        let b: Vec<f64> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..20).map(|_| random_sample_value(&mut rng)).collect()
        };
        assert_eq!(a, b);
    }
}
