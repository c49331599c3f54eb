use std::sync::Mutex;

/// Deduplicating accumulator shared by every concurrent lookup task.
/// Values keep first-seen order so output is stable for whichever insertion
/// order actually happened at runtime.
#[derive(Debug, Default)]
pub struct ResultSet {
    values: Mutex<Vec<String>>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value unless it is already present. Returns whether it was
    /// newly added. A linear scan is plenty at the scale of one listing
    /// page of accounts.
    pub fn record(&self, value: impl Into<String>) -> bool {
        let value = value.into();
        let mut values = self.values.lock().unwrap();
        if values.iter().any(|existing| *existing == value) {
            false
        } else {
            values.push(value);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().unwrap().is_empty()
    }

    /// Snapshot of the accumulated values in insertion order. Meant to be
    /// called once all producers have finished.
    pub fn values(&self) -> Vec<String> {
        self.values.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn record_is_idempotent() {
        let set = ResultSet::new();
        assert!(set.record("a@x.com"));
        assert!(!set.record("a@x.com"));
        assert_eq!(set.values(), vec!["a@x.com"]);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let set = ResultSet::new();
        set.record("c@x.com");
        set.record("a@x.com");
        set.record("b@x.com");
        set.record("a@x.com");
        assert_eq!(set.values(), vec!["c@x.com", "a@x.com", "b@x.com"]);
    }

    #[test]
    fn no_case_folding_or_normalization() {
        let set = ResultSet::new();
        set.record("A@x.com");
        set.record("a@x.com");
        assert_eq!(set.len(), 2);
    }

    #[tokio::test]
    async fn concurrent_writers_never_duplicate() {
        let set = Arc::new(ResultSet::new());
        let mut handles = Vec::new();
        for _ in 0..32 {
            let set = set.clone();
            handles.push(tokio::spawn(async move {
                set.record("same@x.com");
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(set.values(), vec!["same@x.com"]);
    }
}
