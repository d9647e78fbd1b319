//! Small descriptive statistics over prediction samples.

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Standard deviation with divisor `n`.
pub fn population_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Standard deviation with divisor `n - 1`; undefined below two samples.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptive_stats() {
        let v = [10.0, 12.0, 14.0, 16.0, 18.0];
        assert_eq!(mean(&v), Some(14.0));
        assert_eq!(median(&v), Some(14.0));
        assert!((population_std(&v).unwrap() - 8.0_f64.sqrt()).abs() < 1e-12);
        assert!((sample_std(&v).unwrap() - 10.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(min(&v), Some(10.0));
        assert_eq!(max(&v), Some(18.0));
    }

    #[test]
    fn even_median_and_empty_inputs() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std(&[1.0]), None);
    }
}
