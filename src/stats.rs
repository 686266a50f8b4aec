//! Streaming summary statistics for per-family outcomes.

/// Welford running mean and variance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance (n - 1 denominator); zero with fewer than two values.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        self.m2 / (self.count - 1) as f64
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn standard_error(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.std_dev() / (self.count as f64).sqrt()
    }
}

/// Observed outcomes for the selected embryo, a random embryo, and their
/// per-family difference.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OutcomeTally {
    pub selected: RunningStats,
    pub random: RunningStats,
    pub difference: RunningStats,
}

impl OutcomeTally {
    pub fn record(&mut self, selected: f64, random: f64) {
        self.selected.push(selected);
        self.random.push(random);
        self.difference.push(selected - random);
    }
}
