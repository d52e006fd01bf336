//! Weather readings as they move through the pipeline.

pub mod clean;
pub mod raw;
pub mod units;

use std::collections::HashSet;

pub use clean::CleanReading;
pub use raw::RawReading;

/// `(city, timestamp)`: at most one reading per key survives cleaning and storing.
pub type NaturalKey = (String, String);

pub trait Reading {
    fn city(&self) -> &str;
    fn time(&self) -> &str;

    fn key(&self) -> NaturalKey {
        (self.city().to_string(), self.time().to_string())
    }
}

/// Splits `incoming` into readings whose key is not yet in `existing` (kept in
/// order, first occurrence wins) and a count of those already present.
pub fn retain_new<R: Reading>(existing: &[R], incoming: Vec<R>) -> (Vec<R>, usize) {
    let mut seen: HashSet<NaturalKey> = existing.iter().map(Reading::key).collect();
    let mut skipped = 0;

    let fresh = incoming
        .into_iter()
        .filter(|r| {
            let is_new = seen.insert(r.key());
            if !is_new {
                skipped += 1;
            }
            is_new
        })
        .collect();

    (fresh, skipped)
}

pub fn has_unique_keys<R: Reading>(readings: &[R]) -> bool {
    let mut seen = HashSet::new();
    readings.iter().all(|r| seen.insert(r.key()))
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn raw(time: &str, temp: &str) -> RawReading {
        RawReading {
            city: "Washington, DC".to_string(),
            time: time.to_string(),
            temperature: temp.to_string(),
            ..RawReading::default()
        }
    }

    #[test]
    fn should_skip_existing_and_repeated_keys() {
        let existing = vec![raw("2024-01-01 14:00", "50 °F")];
        let incoming = vec![
            raw("2024-01-01 14:00", "51 °F"),
            raw("2024-01-01 15:00", "52 °F"),
            raw("2024-01-01 15:00", "53 °F"),
        ];

        let (fresh, skipped) = retain_new(&existing, incoming);

        assert_eq!(skipped, 2);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].temperature, "52 °F");
    }

    #[test]
    fn should_detect_duplicate_keys() {
        let unique = vec![raw("2024-01-01 14:00", "50 °F"), raw("2024-01-01 15:00", "50 °F")];
        let repeated = vec![raw("2024-01-01 14:00", "50 °F"), raw("2024-01-01 14:00", "51 °F")];

        assert!(has_unique_keys(&unique));
        assert!(!has_unique_keys(&repeated));
    }
}
