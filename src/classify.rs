/// Robustness classification
///
/// Maps a record's robustness flags to the subset of {valid, error, timeout}
/// it belongs to. Classes are not mutually exclusive: a record that sets
/// several flags matches every class that applies.
use crate::types::*;

/// Set of classifications matched by one record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassSet {
    valid: bool,
    error: bool,
    timeout: bool,
}

impl ClassSet {
    pub fn contains(&self, class: Classification) -> bool {
        match class {
            Classification::Valid => self.valid,
            Classification::Error => self.error,
            Classification::Timeout => self.timeout,
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        !(self.valid || self.error || self.timeout)
    }

    pub fn iter(&self) -> impl Iterator<Item = Classification> + '_ {
        Classification::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

/// Classify a record from its robustness flags
pub fn classify(record: &ResultRecord) -> ClassSet {
    match record.robustness.as_ref() {
        Some(flags) => ClassSet {
            valid: flags.flag(VALID_SOLID_OUTPUT),
            error: flags.flag(INPUT_IS_INVALID) || flags.flag(OUTPUT_DISTANCE_IS_TOO_LARGE),
            timeout: flags.flag(TIMEOUT),
        },
        None => ClassSet::default(),
    }
}

/// Whether a record passes a drill-down filter
pub fn matches_type(record: &ResultRecord, filter: TypeFilter) -> bool {
    match filter.classification() {
        None => true,
        Some(class) => classify(record).contains(class),
    }
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod classify_test;
