/// Viewer session state
///
/// Holds the current and comparison stores together with the dates they were
/// loaded for. Every selection hands out a [`SelectionToken`]; a load outcome
/// is only applied when it carries the latest token of its slot, so a slow
/// load for an earlier selection can never overwrite a newer one.
use crate::loader::LoadOutcome;
use crate::store::ResultStore;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Current,
    Compare,
}

/// Identifies one selection of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionToken {
    pub slot: Slot,
    seq: u64,
}

#[derive(Debug, Default)]
pub struct Session {
    current: ResultStore,
    compare: ResultStore,
    current_date: Option<String>,
    compare_date: Option<String>,
    next_seq: u64,
    latest_current: Option<u64>,
    latest_compare: Option<u64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&mut self, slot: Slot) -> SelectionToken {
        self.next_seq += 1;
        let seq = self.next_seq;
        match slot {
            Slot::Current => self.latest_current = Some(seq),
            Slot::Compare => self.latest_compare = Some(seq),
        }
        SelectionToken { slot, seq }
    }

    fn clear_compare(&mut self) {
        self.compare.clear();
        self.compare_date = None;
        // pending comparison loads become stale
        self.latest_compare = None;
    }

    /// Select the current date. The current store is emptied until the
    /// matching load is applied; a comparison on the same date is dropped.
    pub fn select_date(&mut self, date: &str) -> SelectionToken {
        self.current.clear();
        self.current_date = Some(date.to_string());
        if self.compare_date.as_deref() == Some(date) {
            debug!("comparison date {} equals the new current date, clearing it", date);
            self.clear_compare();
        }
        self.issue(Slot::Current)
    }

    /// Select the comparison date, or clear the comparison with `None`
    ///
    /// Returns `None` (and clears the comparison) for an empty date or one
    /// equal to the current date; nothing needs to be loaded then.
    pub fn select_compare(&mut self, date: Option<&str>) -> Option<SelectionToken> {
        let date = date.filter(|d| !d.is_empty());
        match date {
            Some(d) if self.current_date.as_deref() != Some(d) => {
                self.compare.clear();
                self.compare_date = Some(d.to_string());
                Some(self.issue(Slot::Compare))
            }
            _ => {
                self.clear_compare();
                None
            }
        }
    }

    /// Install a finished load. Returns false when the token is stale.
    pub fn apply(&mut self, token: SelectionToken, outcome: LoadOutcome) -> bool {
        let (latest, date, store) = match token.slot {
            Slot::Current => (self.latest_current, &self.current_date, &mut self.current),
            Slot::Compare => (self.latest_compare, &self.compare_date, &mut self.compare),
        };
        if latest != Some(token.seq) || date.as_deref() != Some(outcome.date.as_str()) {
            debug!("discarding stale {:?} load for {} (token {})", token.slot, outcome.date, token.seq);
            return false;
        }
        *store = outcome.store;
        true
    }

    pub fn current(&self) -> &ResultStore {
        &self.current
    }

    pub fn compare(&self) -> &ResultStore {
        &self.compare
    }

    pub fn current_date(&self) -> Option<&str> {
        self.current_date.as_deref()
    }

    pub fn compare_date(&self) -> Option<&str> {
        self.compare_date.as_deref()
    }

    /// A comparison date is selected
    pub fn has_compare(&self) -> bool {
        self.compare_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;
    use crate::types::VALID_SOLID_OUTPUT;

    fn outcome(date: &str, rows: &[(&str, &str, &str, &[&str])]) -> LoadOutcome {
        LoadOutcome { date: date.to_string(), store: store_of(rows), failures: Vec::new() }
    }

    #[test]
    fn test_apply_latest_selection() {
        let mut session = Session::new();
        let token = session.select_date("2024-01-02");
        assert!(session.apply(token, outcome("2024-01-02", &[("A", "D", "f", &[VALID_SOLID_OUTPUT])])));
        assert!(session.current().get("A", "D", "f").is_some());
        assert_eq!(session.current_date(), Some("2024-01-02"));
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut session = Session::new();
        let first = session.select_date("2024-01-01");
        let second = session.select_date("2024-01-02");

        // the second load finishes first, then the slow first one arrives
        assert!(session.apply(second, outcome("2024-01-02", &[("A", "D", "new", &[])])));
        assert!(!session.apply(first, outcome("2024-01-01", &[("A", "D", "old", &[])])));

        assert!(session.current().get("A", "D", "new").is_some());
        assert!(session.current().get("A", "D", "old").is_none());
    }

    #[test]
    fn test_tokens_are_per_slot() {
        let mut session = Session::new();
        let current = session.select_date("2024-01-02");
        let compare = session.select_compare(Some("2024-01-01")).unwrap();
        assert_eq!(compare.slot, Slot::Compare);
        assert!(session.apply(compare, outcome("2024-01-01", &[("A", "D", "f", &[])])));
        assert!(session.apply(current, outcome("2024-01-02", &[("A", "D", "g", &[])])));
        assert!(session.has_compare());
        assert!(session.compare().get("A", "D", "f").is_some());
    }

    #[test]
    fn test_compare_equal_to_current_is_cleared() {
        let mut session = Session::new();
        session.select_date("2024-01-02");
        assert!(session.select_compare(Some("2024-01-02")).is_none());
        assert!(!session.has_compare());
        assert!(session.select_compare(Some("")).is_none());
        assert!(session.select_compare(None).is_none());
    }

    #[test]
    fn test_selecting_compare_date_as_current_drops_compare() {
        let mut session = Session::new();
        session.select_date("2024-01-02");
        let compare = session.select_compare(Some("2024-01-01")).unwrap();
        session.select_date("2024-01-01");
        assert!(!session.has_compare());
        // the pending comparison load no longer applies
        assert!(!session.apply(compare, outcome("2024-01-01", &[])));
        assert!(session.compare().is_empty());
    }
}
