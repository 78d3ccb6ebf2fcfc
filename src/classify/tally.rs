/// Per-class member counts for one batch of classified values.
///
/// Every recorded value lands in exactly one slot, so
/// `unclassified() + counts().iter().sum() == total()`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassTally {
    counts: Vec<usize>,
    unclassified: usize,
}

impl ClassTally {
    pub fn new(num_classes: usize) -> Self {
        Self { counts: vec![0; num_classes], unclassified: 0 }
    }

    /// Record one classification result. Indices past the class list are
    /// treated as unclassified.
    pub fn record(&mut self, index: Option<usize>) {
        match index.and_then(|i| self.counts.get_mut(i)) {
            Some(count) => *count += 1,
            None => self.unclassified += 1,
        }
    }

    #[inline] pub fn count(&self, index: usize) -> usize { self.counts.get(index).copied().unwrap_or(0) }

    #[inline] pub fn counts(&self) -> &[usize] { &self.counts }

    #[inline] pub fn unclassified(&self) -> usize { self.unclassified }

    #[inline] pub fn classified(&self) -> usize { self.counts.iter().sum() }

    #[inline] pub fn total(&self) -> usize { self.classified() + self.unclassified }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_into_slots() {
        let mut tally = ClassTally::new(3);
        for index in [Some(0), Some(2), Some(2), None, Some(7)] {
            tally.record(index);
        }
        assert_eq!(tally.counts(), &[1, 0, 2]);
        assert_eq!(tally.unclassified(), 2);
        assert_eq!(tally.total(), 5);
        assert_eq!(tally.count(9), 0);
    }
}
