//! NaN-aware aggregate helpers shared by the metric modules

/// Arithmetic mean of the finite values; `NaN` when there are none
pub fn finite_mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), &v| (sum + v, count + 1));

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Population variance `mean(x^2) - mean(x)^2` of the finite values; `NaN` when there are none
pub fn population_variance(values: &[f64]) -> f64 {
    let (sum, sum_sq, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0.0, 0usize), |(s, sq, n), &v| (s + v, sq + v * v, n + 1));

    if count == 0 {
        return f64::NAN;
    }

    let mean = sum / count as f64;
    sum_sq / count as f64 - mean * mean
}

/// Min and max of the finite values, for chart scales
pub fn finite_extent(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |extent, v| match extent {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_mean_skips_nan() {
        assert_eq!(finite_mean(&[1.0, f64::NAN, 3.0]), 2.0);
        assert!(finite_mean(&[f64::NAN, f64::INFINITY]).is_nan());
        assert!(finite_mean(&[]).is_nan());
    }

    #[test]
    fn test_population_variance() {
        assert_eq!(population_variance(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 4.0);
        assert_eq!(population_variance(&[3.0]), 0.0);
        assert!(population_variance(&[]).is_nan());
    }

    #[test]
    fn test_finite_extent() {
        assert_eq!(finite_extent(&[3.0, f64::NAN, -1.0, 2.0]), Some((-1.0, 3.0)));
        assert_eq!(finite_extent(&[f64::NAN]), None);
    }
}
