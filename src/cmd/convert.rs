use crate::calc::hijri::{self, HijriDate};
use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};

pub fn run(gregorian: Option<&str>, hijri: Option<&str>) -> Result<()> {
    let (hijri_date, gregorian_date) = match (gregorian, hijri) {
        (Some(g), None) => {
            let date = NaiveDate::parse_from_str(g, "%Y-%m-%d")
                .with_context(|| format!("failed to parse Gregorian date '{g}' as YYYY-MM-DD"))?;
            (HijriDate::from_gregorian(date), date)
        }
        (None, Some(h)) => {
            let date = parse_hijri(h)?;
            (date, date.to_gregorian())
        }
        _ => bail!("pass exactly one of --gregorian or --hijri"),
    };
    write_conversion(hijri_date, gregorian_date, &mut std::io::stdout())
}

/// Parses "YYYY-MM-DD" with a 1-based Hijri month.
pub(crate) fn parse_hijri(s: &str) -> Result<HijriDate> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 3 {
        bail!("failed to parse Hijri date '{s}' as YYYY-MM-DD");
    }
    let year: i32 = parts[0]
        .parse()
        .with_context(|| format!("bad Hijri year in '{s}'"))?;
    let month: u32 = parts[1]
        .parse()
        .with_context(|| format!("bad Hijri month in '{s}'"))?;
    let day: u32 = parts[2]
        .parse()
        .with_context(|| format!("bad Hijri day in '{s}'"))?;
    if !(1..=12).contains(&month) {
        bail!("Hijri month must be 1..=12, got {month}");
    }
    let month = month - 1;
    if !(1..=hijri::days_in_month(year, month)).contains(&day) {
        bail!(
            "{} {year}H has {} days, got day {day}",
            hijri::month_name_short(month),
            hijri::days_in_month(year, month)
        );
    }
    Ok(HijriDate::new(year, month, day))
}

pub(crate) fn write_conversion<W: std::io::Write>(
    hijri_date: HijriDate,
    gregorian_date: NaiveDate,
    out: &mut W,
) -> Result<()> {
    writeln!(
        out,
        "Hijri:     {} {} {}H",
        hijri_date.day,
        hijri::month_name(hijri_date.month),
        hijri_date.year
    )?;
    writeln!(
        out,
        "Gregorian: {} ({})",
        gregorian_date.format("%Y-%m-%d"),
        gregorian_date.weekday()
    )?;
    Ok(())
}
