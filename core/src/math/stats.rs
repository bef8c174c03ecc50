use crate::prelude::{BeamError, BeamResult};

pub struct StatsHelper;

impl StatsHelper {
    /// Maximum and arithmetic mean of a non-empty sequence.
    pub fn max_and_average(samples: &[f64]) -> BeamResult<(f64, f64)> {
        if samples.is_empty() {
            return Err(BeamError::Parameter(
                "max/average of an empty sequence".into(),
            ));
        }
        let (max, sum) = samples
            .iter()
            .fold((f64::NEG_INFINITY, 0.0), |(max, sum), &value| {
                (if value > max { value } else { max }, sum + value)
            });
        Ok((max, sum / samples.len() as f64))
    }

    pub fn rms(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = samples.iter().map(|&v| v * v).sum();
        (sum_sq / samples.len() as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_and_average_of_small_sequence() {
        assert_eq!(
            StatsHelper::max_and_average(&[1.0, 2.0, 3.0, 4.0]).unwrap(),
            (4.0, 2.5)
        );
    }

    #[test]
    fn max_and_average_handles_all_negative_values() {
        assert_eq!(
            StatsHelper::max_and_average(&[-3.0, -1.0, -2.0]).unwrap(),
            (-1.0, -2.0)
        );
    }

    #[test]
    fn max_and_average_rejects_empty_input() {
        assert!(matches!(
            StatsHelper::max_and_average(&[]),
            Err(BeamError::Parameter(_))
        ));
    }

    #[test]
    fn rms_zero_sequence_yields_zero() {
        assert_eq!(StatsHelper::rms(&[]), 0.0);
        assert_eq!(StatsHelper::rms(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn rms_handles_single_value() {
        assert_eq!(StatsHelper::rms(&[4.0]), 4.0);
    }
}
