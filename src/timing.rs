/// Device-clock timestamps of one kernel execution, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSample {
    pub start_ns: u64,
    pub end_ns: u64,
}

impl TimingSample {
    pub fn new(start_ns: u64, end_ns: u64) -> Self {
        Self { start_ns, end_ns }
    }

    pub fn elapsed_ns(&self) -> u64 {
        self.end_ns.saturating_sub(self.start_ns)
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ns() as f64 / 1_000_000.0
    }
}

pub fn mean_ms(samples: &[TimingSample]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let total: f64 = samples.iter().map(TimingSample::elapsed_ms).sum();
    Some(total / samples.len() as f64)
}

pub fn min_ms(samples: &[TimingSample]) -> Option<f64> {
    samples
        .iter()
        .map(TimingSample::elapsed_ms)
        .reduce(f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_milliseconds() {
        assert_eq!(TimingSample::new(1_000, 2_501_000).elapsed_ms(), 2.5);
    }

    #[test]
    fn clock_going_backwards_is_zero() {
        assert_eq!(TimingSample::new(10, 5).elapsed_ns(), 0);
    }

    #[test]
    fn summaries() {
        let samples = [
            TimingSample::new(0, 2_000_000),
            TimingSample::new(0, 4_000_000),
        ];
        assert_eq!(mean_ms(&samples), Some(3.0));
        assert_eq!(min_ms(&samples), Some(2.0));
        assert_eq!(mean_ms(&[]), None);
        assert_eq!(min_ms(&[]), None);
    }
}
