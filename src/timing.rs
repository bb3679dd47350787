use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub avg: Duration,
    pub min: Duration,
    pub max: Duration,
}

#[derive(Debug, Default, Clone)]
pub struct Timings {
    samples: Vec<Duration>,
}

impl Timings {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            samples: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, sample: Duration) {
        self.samples.push(sample);
    }

    /// Runs `f` and records how long it took.
    pub fn time<T, F: FnOnce() -> T>(&mut self, f: F) -> T {
        let start = Instant::now();
        let result = f();
        self.samples.push(start.elapsed());
        result
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn summary(&self) -> Option<Summary> {
        let min = self.samples.iter().min()?;
        let max = self.samples.iter().max()?;
        let total: Duration = self.samples.iter().sum();
        Some(Summary {
            avg: total / self.samples.len() as u32,
            min: *min,
            max: *max,
        })
    }

    pub fn report(&self, precision: usize) -> Report<'_> {
        Report {
            timings: self,
            precision,
        }
    }
}

fn as_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// `avg: .. ms	min: .. ms	max: .. ms` at a fixed number of decimals.
pub struct Report<'a> {
    timings: &'a Timings,
    precision: usize,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.precision;
        match self.timings.summary() {
            Some(s) => write!(
                f,
                "avg: {:.p$} ms\tmin: {:.p$} ms\tmax: {:.p$} ms",
                as_ms(s.avg),
                as_ms(s.min),
                as_ms(s.max),
            ),
            None => write!(f, "no samples"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Timings;
    use std::time::Duration;

    #[test]
    fn test_summary() {
        let mut timings = Timings::default();
        assert!(timings.summary().is_none());
        for ms in [3, 1, 2, 6] {
            timings.push(Duration::from_millis(ms));
        }
        let s = timings.summary().unwrap();
        assert_eq!(s.min, Duration::from_millis(1));
        assert_eq!(s.max, Duration::from_millis(6));
        assert_eq!(s.avg, Duration::from_millis(3));
    }

    #[test]
    fn test_report() {
        let mut timings = Timings::default();
        timings.push(Duration::from_micros(1500));
        timings.push(Duration::from_micros(2500));
        assert_eq!(
            timings.report(2).to_string(),
            "avg: 2.00 ms\tmin: 1.50 ms\tmax: 2.50 ms"
        );
        assert_eq!(
            timings.report(6).to_string(),
            "avg: 2.000000 ms\tmin: 1.500000 ms\tmax: 2.500000 ms"
        );
        assert_eq!(Timings::default().report(2).to_string(), "no samples");
    }

    #[test]
    fn test_time() {
        let mut timings = Timings::with_capacity(1);
        let v = timings.time(|| 40 + 2);
        assert_eq!(v, 42);
        assert_eq!(timings.len(), 1);
    }
}
