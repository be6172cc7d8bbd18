use crate::data::miqaat::{DayRecord, MiqaatEntry, Phase};

/// Priorities above this never produce a visible indicator.
pub const INDICATOR_PRIORITY_CUTOFF: u32 = 3;

/// The single highest-priority, year-eligible miqaat for a cell: what the
/// calendar shows as the cell's icon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Indicator {
    pub priority: u32,
    pub phase: Option<Phase>,
}

/// All entries in effect for the given Hijri date: exact `(month, date)`
/// match, flattened in store order, with not-yet-effective years dropped.
pub fn applicable_miqaats<'a>(
    records: &'a [DayRecord],
    year: i32,
    month: u32,
    day: u32,
) -> impl Iterator<Item = &'a MiqaatEntry> {
    records
        .iter()
        .filter(move |r| r.month == month && r.date == day)
        .flat_map(|r| r.miqaats.iter())
        .filter(move |m| m.applies_in_year(year))
}

/// Resolves the indicator for a cell's own Hijri date.
///
/// Entries without a usable priority are skipped; among the rest the
/// numerically smallest priority wins, first-encountered on ties, and only
/// priorities 1..=3 yield an indicator. The phase carried is that of the
/// winning entry alone.
pub fn resolve_indicator(
    records: &[DayRecord],
    year: i32,
    month: u32,
    day: u32,
) -> Option<Indicator> {
    let mut best: Option<Indicator> = None;
    for entry in applicable_miqaats(records, year, month, day) {
        let Some(priority) = entry.priority else {
            continue;
        };
        if best.is_none_or(|b| priority < b.priority) {
            best = Some(Indicator {
                priority,
                phase: entry.phase,
            });
        }
    }
    best.filter(|b| b.priority <= INDICATOR_PRIORITY_CUTOFF)
}

/// Every applicable entry for the popup, sorted ascending by priority.
/// Entries without a usable priority sort last; the sort is stable, so
/// store order is preserved within equal priorities.
pub fn assemble_popup<'a>(
    records: &'a [DayRecord],
    year: i32,
    month: u32,
    day: u32,
) -> Vec<&'a MiqaatEntry> {
    let mut entries: Vec<&MiqaatEntry> =
        applicable_miqaats(records, year, month, day).collect();
    entries.sort_by_key(|m| m.priority.unwrap_or(u32::MAX));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, priority: Option<u32>, phase: Option<Phase>, year: Option<i32>) -> MiqaatEntry {
        MiqaatEntry {
            title: title.to_string(),
            description: None,
            priority,
            phase,
            year,
        }
    }

    fn record(month: u32, date: u32, miqaats: Vec<MiqaatEntry>) -> DayRecord {
        DayRecord { month, date, miqaats }
    }

    #[test]
    fn test_eid_on_first_of_shawwal() {
        let records = vec![record(
            9,
            1,
            vec![entry("Eid", Some(1), Some(Phase::Day), None)],
        )];
        assert_eq!(
            resolve_indicator(&records, 1446, 9, 1),
            Some(Indicator {
                priority: 1,
                phase: Some(Phase::Day)
            })
        );
        assert_eq!(resolve_indicator(&records, 1446, 9, 2), None);
    }

    #[test]
    fn test_lowest_priority_wins() {
        let records = vec![record(
            0,
            10,
            vec![
                entry("minor", Some(2), Some(Phase::Night), None),
                entry("major", Some(1), Some(Phase::Day), None),
            ],
        )];
        let ind = resolve_indicator(&records, 1446, 0, 10).unwrap();
        assert_eq!(ind.priority, 1);
        assert_eq!(ind.phase, Some(Phase::Day));
    }

    #[test]
    fn test_tie_keeps_first_encountered() {
        let records = vec![record(
            0,
            10,
            vec![
                entry("first", Some(2), Some(Phase::Day), None),
                entry("second", Some(2), Some(Phase::Night), None),
            ],
        )];
        let ind = resolve_indicator(&records, 1446, 0, 10).unwrap();
        assert_eq!(ind.phase, Some(Phase::Day));
    }

    #[test]
    fn test_entries_flatten_across_records() {
        // Two records for the same (month, date): entries from both compete.
        let records = vec![
            record(3, 5, vec![entry("a", Some(3), None, None)]),
            record(3, 5, vec![entry("b", Some(1), Some(Phase::Night), None)]),
        ];
        let ind = resolve_indicator(&records, 1446, 3, 5).unwrap();
        assert_eq!(ind.priority, 1);
        assert_eq!(ind.phase, Some(Phase::Night));
    }

    #[test]
    fn test_year_effective_rule() {
        let records = vec![record(
            7,
            4,
            vec![entry("gated", Some(1), Some(Phase::Day), Some(1440))],
        )];
        assert_eq!(resolve_indicator(&records, 1439, 7, 4), None);
        assert!(resolve_indicator(&records, 1440, 7, 4).is_some());
        assert!(resolve_indicator(&records, 1446, 7, 4).is_some());
    }

    #[test]
    fn test_priority_cutoff() {
        let records = vec![record(2, 12, vec![entry("low", Some(4), None, None)])];
        assert_eq!(resolve_indicator(&records, 1446, 2, 12), None);
        let records = vec![record(2, 12, vec![entry("edge", Some(3), None, None)])];
        assert_eq!(
            resolve_indicator(&records, 1446, 2, 12).map(|i| i.priority),
            Some(3)
        );
    }

    #[test]
    fn test_invalid_priority_never_wins() {
        let records = vec![record(
            2,
            12,
            vec![
                entry("no priority", None, Some(Phase::Day), None),
                entry("ranked", Some(2), Some(Phase::Night), None),
            ],
        )];
        let ind = resolve_indicator(&records, 1446, 2, 12).unwrap();
        assert_eq!(ind.priority, 2);
        // With only the invalid entry, there is no indicator at all.
        let records = vec![record(2, 12, vec![entry("no priority", None, None, None)])];
        assert_eq!(resolve_indicator(&records, 1446, 2, 12), None);
    }

    #[test]
    fn test_lookup_is_by_cell_date_only() {
        let records = vec![record(9, 1, vec![entry("Eid", Some(1), None, None)])];
        // Same (month, day) matches whatever year is being displayed.
        assert!(resolve_indicator(&records, 1200, 9, 1).is_some());
        assert!(resolve_indicator(&records, 1500, 9, 1).is_some());
        // Other months and days never match.
        assert_eq!(resolve_indicator(&records, 1446, 8, 1), None);
        assert_eq!(resolve_indicator(&records, 1446, 9, 30), None);
    }

    #[test]
    fn test_popup_includes_all_applicable() {
        let records = vec![record(
            0,
            10,
            vec![
                entry("below cutoff", Some(5), None, None),
                entry("winner", Some(1), Some(Phase::Day), None),
                entry("unranked", None, None, None),
            ],
        )];
        let popup = assemble_popup(&records, 1446, 0, 10);
        let titles: Vec<&str> = popup.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["winner", "below cutoff", "unranked"]);
    }

    #[test]
    fn test_popup_respects_year_rule() {
        let records = vec![record(
            0,
            10,
            vec![
                entry("always", Some(2), None, None),
                entry("gated", Some(1), None, Some(1450)),
            ],
        )];
        let before: Vec<&str> = assemble_popup(&records, 1446, 0, 10)
            .iter()
            .map(|m| m.title.as_str())
            .collect();
        assert_eq!(before, vec!["always"]);
        let after: Vec<&str> = assemble_popup(&records, 1450, 0, 10)
            .iter()
            .map(|m| m.title.as_str())
            .collect();
        assert_eq!(after, vec!["gated", "always"]);
    }

    #[test]
    fn test_popup_sort_is_stable() {
        let records = vec![record(
            0,
            10,
            vec![
                entry("a", Some(2), None, None),
                entry("b", Some(2), None, None),
                entry("c", None, None, None),
                entry("d", None, None, None),
            ],
        )];
        let titles: Vec<&str> = assemble_popup(&records, 1446, 0, 10)
            .iter()
            .map(|m| m.title.as_str())
            .collect();
        assert_eq!(titles, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_popup_empty_for_unmatched_date() {
        let records = vec![record(9, 1, vec![entry("Eid", Some(1), None, None)])];
        assert!(assemble_popup(&records, 1446, 9, 2).is_empty());
        assert!(assemble_popup(&[], 1446, 9, 1).is_empty());
    }
}
