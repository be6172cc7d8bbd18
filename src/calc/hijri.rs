use chrono::{Datelike, NaiveDate};

/// Days from 0001-01-01 CE (proleptic Gregorian, day 1) to 1 Moharram 1 AH,
/// which falls on 19 July 622 CE.
const HIJRI_EPOCH: i64 = 227_015;

/// Kabisa (leap) year remainders within the 30-year Fatimid cycle.
const KABISA_REMAINDERS: [i64; 11] = [2, 5, 8, 10, 13, 16, 19, 21, 24, 27, 29];

/// A date in the tabular Fatimid (Misri) reckoning. Months are 0-indexed
/// (0 = Moharram .. 11 = Zilhajjah), days are 1-indexed.
///
/// Field order makes the derived `Ord` chronological.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct HijriDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl HijriDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        debug_assert!(month < 12, "hijri month index out of range: {month}");
        debug_assert!((1..=30).contains(&day), "hijri day out of range: {day}");
        HijriDate { year, month, day }
    }

    /// Converts an arbitrary Gregorian date to its Hijri equivalent.
    pub fn from_gregorian(date: NaiveDate) -> Self {
        let days = date.num_days_from_ce() as i64 - HIJRI_EPOCH;

        // First estimate from the mean year length (10631/30 days), then
        // settle on the year whose span actually contains the day number.
        let mut year = ((30 * days + 10_646).div_euclid(10_631)) as i32;
        while days < year_start(year) {
            year -= 1;
        }
        while days >= year_start(year + 1) {
            year += 1;
        }

        let mut day_of_year = days - year_start(year);
        let mut month = 0u32;
        while month < 11 && day_of_year >= days_in_month(year, month) as i64 {
            day_of_year -= days_in_month(year, month) as i64;
            month += 1;
        }

        HijriDate {
            year,
            month,
            day: day_of_year as u32 + 1,
        }
    }

    /// Converts this Hijri date to its Gregorian equivalent.
    pub fn to_gregorian(&self) -> NaiveDate {
        let days = year_start(self.year) + month_offset(self.month) + self.day as i64 - 1;
        NaiveDate::from_num_days_from_ce_opt((HIJRI_EPOCH + days) as i32).unwrap()
    }
}

impl std::fmt::Display for HijriDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}H",
            self.day,
            month_name_short(self.month),
            self.year
        )
    }
}

/// Day number of 1 Moharram of `year`, counted from the epoch.
fn year_start(year: i32) -> i64 {
    354 * (year as i64 - 1) + kabisa_years_before(year)
}

/// Number of kabisa years strictly before `year`.
fn kabisa_years_before(year: i32) -> i64 {
    let elapsed = year as i64 - 1;
    let cycles = elapsed.div_euclid(30);
    let rem = elapsed.rem_euclid(30);
    cycles * 11 + KABISA_REMAINDERS.iter().filter(|&&r| r <= rem).count() as i64
}

/// Days before month `month` within a year (months alternate 30/29).
fn month_offset(month: u32) -> i64 {
    (59 * (month / 2) + 30 * (month % 2)) as i64
}

pub fn is_kabisa(year: i32) -> bool {
    KABISA_REMAINDERS.contains(&(year as i64).rem_euclid(30))
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 11 {
        if is_kabisa(year) { 30 } else { 29 }
    } else if month % 2 == 0 {
        30
    } else {
        29
    }
}

pub fn days_in_year(year: i32) -> u32 {
    if is_kabisa(year) { 355 } else { 354 }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        0 => "Moharram al-Haraam",
        1 => "Safar al-Muzaffar",
        2 => "Rabi al-Awwal",
        3 => "Rabi al-Aakhar",
        4 => "Jumada al-Ula",
        5 => "Jumada al-Ukhra",
        6 => "Rajab al-Asab",
        7 => "Shabaan al-Karim",
        8 => "Ramadaan al-Moazzam",
        9 => "Shawwal al-Mukarram",
        10 => "Zilqadah al-Haraam",
        11 => "Zilhajjah al-Haraam",
        _ => "Unknown",
    }
}

pub fn month_name_short(month: u32) -> &'static str {
    match month {
        0 => "Moharram",
        1 => "Safar",
        2 => "Rabi I",
        3 => "Rabi II",
        4 => "Jumada I",
        5 => "Jumada II",
        6 => "Rajab",
        7 => "Shabaan",
        8 => "Ramadaan",
        9 => "Shawwal",
        10 => "Zilqadah",
        11 => "Zilhajjah",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_epoch_is_19_july_622() {
        assert_eq!(HijriDate::new(1, 0, 1).to_gregorian(), g(622, 7, 19));
    }

    #[test]
    fn test_known_anchor_dates() {
        // 1 Shawwal 1446 (Eid al-Fitr) fell on 31 March 2025.
        assert_eq!(HijriDate::new(1446, 9, 1).to_gregorian(), g(2025, 3, 31));
        // 1 Moharram 1447 fell on 27 June 2025.
        assert_eq!(HijriDate::new(1447, 0, 1).to_gregorian(), g(2025, 6, 27));
        // 1 Moharram 1446 fell on 8 July 2024.
        assert_eq!(HijriDate::new(1446, 0, 1).to_gregorian(), g(2024, 7, 8));
    }

    #[test]
    fn test_from_gregorian_anchor_dates() {
        assert_eq!(
            HijriDate::from_gregorian(g(2025, 3, 31)),
            HijriDate::new(1446, 9, 1)
        );
        assert_eq!(
            HijriDate::from_gregorian(g(2025, 6, 27)),
            HijriDate::new(1447, 0, 1)
        );
        // Day before a year boundary lands on 29 Zilhajjah of the prior year.
        assert_eq!(
            HijriDate::from_gregorian(g(2025, 6, 26)),
            HijriDate::new(1446, 11, 29)
        );
    }

    #[test]
    fn test_kabisa_cycle() {
        assert!(is_kabisa(2));
        assert!(is_kabisa(5));
        assert!(is_kabisa(8));
        assert!(!is_kabisa(1));
        assert!(!is_kabisa(3));
        assert!(is_kabisa(1445));
        assert!(!is_kabisa(1446));
        // Eleven kabisa years per 30-year cycle.
        let count = (1..=30).filter(|&y| is_kabisa(y)).count();
        assert_eq!(count, 11);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(1446, 0), 30);
        assert_eq!(days_in_month(1446, 1), 29);
        assert_eq!(days_in_month(1446, 9), 29);
        assert_eq!(days_in_month(1446, 10), 30);
        assert_eq!(days_in_month(1445, 11), 30); // kabisa
        assert_eq!(days_in_month(1446, 11), 29);
    }

    #[test]
    fn test_days_in_year() {
        assert_eq!(days_in_year(1445), 355);
        assert_eq!(days_in_year(1446), 354);
        let cycle_days: u32 = (1..=30).map(days_in_year).sum();
        assert_eq!(cycle_days, 10_631);
    }

    #[test]
    fn test_months_sum_to_year_length() {
        for year in [1445, 1446] {
            let total: u32 = (0..12).map(|m| days_in_month(year, m)).sum();
            assert_eq!(total, days_in_year(year));
        }
    }

    #[test]
    fn test_round_trip_gregorian() {
        let mut date = g(1950, 1, 1);
        let end = g(2150, 1, 1);
        while date < end {
            let hijri = HijriDate::from_gregorian(date);
            assert_eq!(hijri.to_gregorian(), date, "round trip failed for {date}");
            assert!(hijri.month < 12);
            assert!((1..=days_in_month(hijri.year, hijri.month)).contains(&hijri.day));
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_round_trip_hijri() {
        for year in 1440..1460 {
            for month in 0..12 {
                for day in 1..=days_in_month(year, month) {
                    let h = HijriDate::new(year, month, day);
                    assert_eq!(HijriDate::from_gregorian(h.to_gregorian()), h);
                }
            }
        }
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(HijriDate::new(1446, 9, 1) < HijriDate::new(1446, 9, 2));
        assert!(HijriDate::new(1446, 9, 29) < HijriDate::new(1446, 10, 1));
        assert!(HijriDate::new(1446, 11, 29) < HijriDate::new(1447, 0, 1));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(0), "Moharram al-Haraam");
        assert_eq!(month_name(9), "Shawwal al-Mukarram");
        assert_eq!(month_name(12), "Unknown");
        assert_eq!(month_name_short(9), "Shawwal");
        assert_eq!(month_name_short(11), "Zilhajjah");
    }

    #[test]
    fn test_display_format() {
        let h = HijriDate::new(1446, 9, 1);
        assert_eq!(h.to_string(), "1 Shawwal 1446H");
    }
}
