use std::fmt;

use crate::EmergencyStore;

/// Human-readable dump of every record, in insertion order.
pub struct Listing<'a> {
    store: &'a EmergencyStore,
}

impl<'a> Listing<'a> {
    pub(crate) fn new(store: &'a EmergencyStore) -> Self {
        Listing { store }
    }
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stations:")?;
        for station in self.store.stations() {
            writeln!(f, "{station}")?;
        }
        writeln!(f, "Incidents:")?;
        for incident in self.store.incidents() {
            writeln!(f, "{incident}")?;
        }
        writeln!(f, "Dispatchers:")?;
        for dispatcher in self.store.dispatchers() {
            writeln!(f, "{dispatcher}")?;
        }
        Ok(())
    }
}
