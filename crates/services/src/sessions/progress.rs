/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub current: usize,
    pub answered: usize,
    pub remaining_secs: u64,
}

impl SessionProgress {
    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.total
    }

    #[must_use]
    pub fn is_first_question(&self) -> bool {
        self.current == 0
    }

    /// Position through the test, `(current + 1) / total * 100`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_through(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.current + 1) as f64 / self.total as f64 * 100.0
    }
}
