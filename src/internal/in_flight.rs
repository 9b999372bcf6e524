//! Per-name construction gates.
//!
//! A cached service must be built at most once per container even when
//! several resolutions for it overlap at the factory's await points.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Default)]
pub(crate) struct InFlight {
    gates: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl InFlight {
    /// Gate serializing construction of `name` in one container.
    pub(crate) fn gate(&self, name: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.gates
            .lock()
            .entry(name.to_string())
            .or_default()
            .clone()
    }

    /// Forgets all gates. Holders of an existing gate keep it alive.
    pub(crate) fn clear(&self) {
        self.gates.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_shares_a_gate() {
        let in_flight = InFlight::default();
        let a = in_flight.gate("db");
        let b = in_flight.gate("db");
        let c = in_flight.gate("cache");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));

        in_flight.clear();
        assert!(!Arc::ptr_eq(&a, &in_flight.gate("db")));
    }
}
