//! Per-engine id generation for edges and nodes created by gestures.
//!
//! Each engine owns its own generator, so two engines never share a counter.

/// Monotonic `"{prefix}-{n}"` id source.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: &'static str,
    next: u64,
}

impl IdGenerator {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    /// Next id whose text is not claimed by `taken`.
    ///
    /// Host-supplied scenes may already contain ids like `edge-3`; those are
    /// skipped rather than reused.
    pub fn next_unique(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let candidate = format!("{}-{}", self.prefix, self.next);
            self.next += 1;
            if !taken(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let mut ids = IdGenerator::new("edge");
        assert_eq!(ids.next_unique(|_| false), "edge-1");
        assert_eq!(ids.next_unique(|_| false), "edge-2");
    }

    #[test]
    fn taken_ids_are_skipped() {
        let mut ids = IdGenerator::new("edge");
        let id = ids.next_unique(|s| s == "edge-1" || s == "edge-2");
        assert_eq!(id, "edge-3");
    }

    #[test]
    fn generators_are_independent() {
        let mut a = IdGenerator::new("node");
        let mut b = IdGenerator::new("node");
        assert_eq!(a.next_unique(|_| false), b.next_unique(|_| false));
    }
}
