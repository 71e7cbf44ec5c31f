use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Storage and display format of `registered_at`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A stored participant entry, normalized to its four display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    full_name: String,
    member_number: String,
    fee_acknowledged: bool,
    registered_at: String,
}

impl Registration {
    pub fn new(
        full_name: String,
        member_number: String,
        fee_acknowledged: bool,
        registered_at: String,
    ) -> Self {
        Self {
            full_name,
            member_number,
            fee_acknowledged,
            registered_at,
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn member_number(&self) -> &str {
        &self.member_number
    }

    pub fn fee_acknowledged(&self) -> bool {
        self.fee_acknowledged
    }

    pub fn registered_at(&self) -> &str {
        &self.registered_at
    }

    /// Best-effort parse of the stored timestamp; `None` when unreadable.
    pub fn registered_at_parsed(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.registered_at)
    }
}

/// Values accepted for insertion. Constructed already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    full_name: String,
    member_number: String,
    fee_acknowledged: bool,
}

impl NewRegistration {
    pub fn new(full_name: &str, member_number: &str, fee_acknowledged: bool) -> Self {
        Self {
            full_name: full_name.trim().to_string(),
            member_number: member_number.trim().to_string(),
            fee_acknowledged,
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn member_number(&self) -> &str {
        &self.member_number
    }

    pub fn fee_acknowledged(&self) -> bool {
        self.fee_acknowledged
    }
}

/// What the form view needs to decide whether to accept submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSummary {
    pub total: u64,
    pub capacity: u64,
    pub remaining: u64,
    pub is_open: bool,
}

impl RegistrationSummary {
    pub fn new(total: u64, capacity: u64) -> Self {
        let remaining = capacity.saturating_sub(total);
        Self {
            total,
            capacity,
            remaining,
            is_open: remaining > 0,
        }
    }
}

/// Persisted form of the fee flag.
pub fn fee_flag_to_cell(fee_acknowledged: bool) -> &'static str {
    if fee_acknowledged { "1" } else { "0" }
}

/// Reads a persisted fee flag. Legacy `True`/`False` cells are accepted.
pub fn fee_flag_from_cell(cell: &str) -> bool {
    let cell = cell.trim();
    cell == "1" || cell.eq_ignore_ascii_case("true")
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT) {
        return Some(parsed);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Sorts newest first. Unparsable timestamps go last, keeping their order.
pub fn sort_newest_first(registrations: &mut [Registration]) {
    registrations.sort_by(|a, b| {
        match (a.registered_at_parsed(), b.registered_at_parsed()) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(member: &str, registered_at: &str) -> Registration {
        Registration::new("Someone".into(), member.into(), true, registered_at.into())
    }

    #[rstest]
    #[case("1", true)]
    #[case(" 1 ", true)]
    #[case("True", true)]
    #[case("0", false)]
    #[case("False", false)]
    #[case("", false)]
    fn test_fee_flag_from_cell(#[case] cell: &str, #[case] expected: bool) {
        assert_eq!(expected, fee_flag_from_cell(cell));
    }

    #[test]
    fn test_new_registration_trims_fields() {
        let new = NewRegistration::new("  Jane Doe ", " JD-42  ", true);
        assert_eq!("Jane Doe", new.full_name());
        assert_eq!("JD-42", new.member_number());
    }

    #[test]
    fn test_summary_saturates_remaining() {
        let summary = RegistrationSummary::new(25, 20);
        assert_eq!(0, summary.remaining);
        assert!(!summary.is_open);

        let summary = RegistrationSummary::new(19, 20);
        assert_eq!(1, summary.remaining);
        assert!(summary.is_open);
    }

    #[test]
    fn test_sort_newest_first_puts_unparsable_last() {
        let mut registrations = vec![
            at("A1", "not a date"),
            at("B2", "2026-03-01 10:00:00"),
            at("C3", ""),
            at("D4", "2026-03-02T09:00:00Z"),
            at("E5", "2026-02-28"),
        ];
        sort_newest_first(&mut registrations);

        let order: Vec<&str> = registrations.iter().map(|r| r.member_number()).collect();
        assert_eq!(vec!["D4", "B2", "E5", "A1", "C3"], order);
    }
}
