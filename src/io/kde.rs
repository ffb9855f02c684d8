// src/io/kde.rs

//! One-dimensional Gaussian kernel density estimation.
//!
//! Bandwidth follows Scott's rule: the kernel standard deviation is the
//! sample standard deviation (n - 1 denominator) scaled by `n^(-1/5)`.

use rand::Rng;
use rand_distr::{Distribution, Normal};

#[derive(Debug, Clone)]
pub struct GaussianKde {
    dataset: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Fits a density to `data`.
    ///
    /// A single observation or a constant series has no spread; the kernel
    /// then collapses to the data points themselves (bandwidth 0).
    pub fn fit(data: &[f64]) -> Self {
        let n = data.len();
        let bandwidth = if n < 2 {
            0.0
        } else {
            let variance = sample_variance(data);
            let factor = (n as f64).powf(-1.0 / 5.0);
            variance.sqrt() * factor
        };

        Self {
            dataset: data.to_vec(),
            bandwidth,
        }
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Draws `size` samples: pick an observation uniformly, then add kernel noise.
    pub fn resample<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Vec<f64> {
        if self.dataset.is_empty() {
            return Vec::new();
        }
        let kernel = Normal::new(0.0, self.bandwidth).ok();

        (0..size)
            .map(|_| {
                let centre = self.dataset[rng.gen_range(0..self.dataset.len())];
                match &kernel {
                    Some(k) if self.bandwidth > 0.0 => centre + k.sample(rng),
                    _ => centre,
                }
            })
            .collect()
    }
}

fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

fn sample_variance(data: &[f64]) -> f64 {
    let m = mean(data);
    data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64
}

/// Population standard deviation (n denominator). Zero for an empty series.
pub fn std_dev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    (data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / data.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use std::f64::consts::PI;

    fn density(kde: &GaussianKde, x: f64) -> f64 {
        let h = kde.bandwidth;
        let norm = 1.0 / (h * (2.0 * PI).sqrt() * kde.dataset.len() as f64);
        kde.dataset
            .iter()
            .map(|xi| {
                let z = (x - xi) / h;
                (-0.5 * z * z).exp()
            })
            .sum::<f64>()
            * norm
    }

    #[test]
    fn scott_bandwidth() {
        let data: Vec<f64> = (1..=32).map(|v| v as f64).collect();
        let kde = GaussianKde::fit(&data);
        let expected = sample_variance(&data).sqrt() * 32f64.powf(-0.2);
        assert!((kde.bandwidth() - expected).abs() < 1e-12);
    }

    #[test]
    fn constant_series_resamples_to_itself() {
        let kde = GaussianKde::fit(&[5.0, 5.0, 5.0, 5.0]);
        assert_eq!(kde.bandwidth(), 0.0);
        let mut rng = Pcg64::seed_from_u64(1);
        let draws = kde.resample(4, &mut rng);
        assert_eq!(draws, vec![5.0; 4]);
        assert_eq!(std_dev(&draws), 0.0);
    }

    #[test]
    fn density_integrates_to_one() {
        let kde = GaussianKde::fit(&[2.0, 3.0, 3.0, 4.0, 8.0, 9.0]);
        let step = 0.01;
        let area: f64 = (0..4000)
            .map(|i| density(&kde, -10.0 + i as f64 * step) * step)
            .sum();
        assert!((area - 1.0).abs() < 1e-3, "area was {}", area);
    }

    #[test]
    fn resample_is_reproducible() {
        let kde = GaussianKde::fit(&[1.0, 4.0, 9.0, 16.0]);
        let a = kde.resample(20, &mut Pcg64::seed_from_u64(7));
        let b = kde.resample(20, &mut Pcg64::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
    }

    #[test]
    fn population_std_dev() {
        // mean 5, squared deviations sum to 32, n = 8
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&data) - 2.0).abs() < 1e-12);
    }
}
