use crate::calc::hijri::{self, HijriDate};
use crate::calc::resolve::assemble_popup;
use crate::data::miqaat::{DayRecord, Phase};
use crate::data::{AppSettings, store};
use anyhow::{Result, bail};

pub fn run(
    source_override: Option<&str>,
    year: i32,
    month: u32,
    day: Option<u32>,
) -> Result<()> {
    if !(1..=12).contains(&month) {
        bail!("month must be 1..=12, got {month}");
    }
    let month = month - 1;
    if let Some(d) = day {
        if !(1..=hijri::days_in_month(year, month)).contains(&d) {
            bail!(
                "{} {year}H has {} days, got day {d}",
                hijri::month_name_short(month),
                hijri::days_in_month(year, month)
            );
        }
    }

    let settings = AppSettings::load()?;
    let source = source_override.unwrap_or(&settings.source);
    let outcome = store::load(source)?;
    if outcome.is_empty_data() {
        eprintln!("warning: miqaat store is empty");
    }
    let records = outcome.records();

    match day {
        Some(d) => write_day(&records, year, month, d, &mut std::io::stdout()),
        None => write_month(&records, year, month, &mut std::io::stdout()),
    }
}

pub(crate) fn write_day<W: std::io::Write>(
    records: &[DayRecord],
    year: i32,
    month: u32,
    day: u32,
    out: &mut W,
) -> Result<()> {
    let hijri = HijriDate::new(year, month, day);
    writeln!(
        out,
        "{} ({})",
        hijri,
        hijri.to_gregorian().format("%-d %b %Y")
    )?;
    writeln!(out, "---")?;
    let entries = assemble_popup(records, year, month, day);
    if entries.is_empty() {
        writeln!(out, "No miqaats.")?;
        return Ok(());
    }
    for entry in &entries {
        write_entry_line(entry, out)?;
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} miqaat(s)", entries.len())?;
    Ok(())
}

pub(crate) fn write_month<W: std::io::Write>(
    records: &[DayRecord],
    year: i32,
    month: u32,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "{} {}H", hijri::month_name(month), year)?;
    writeln!(out, "---")?;
    let mut total = 0;
    for day in 1..=hijri::days_in_month(year, month) {
        let entries = assemble_popup(records, year, month, day);
        if entries.is_empty() {
            continue;
        }
        let hijri = HijriDate::new(year, month, day);
        writeln!(
            out,
            "{} ({})",
            hijri,
            hijri.to_gregorian().format("%-d %b %Y")
        )?;
        for entry in &entries {
            write_entry_line(entry, out)?;
        }
        total += entries.len();
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {total} miqaat(s)")?;
    Ok(())
}

fn write_entry_line<W: std::io::Write>(
    entry: &crate::data::miqaat::MiqaatEntry,
    out: &mut W,
) -> Result<()> {
    let phase = match entry.phase {
        Some(Phase::Night) => " [night]",
        _ => "",
    };
    let priority = match entry.priority {
        Some(p) => format!("p{p}"),
        None => "p-".to_string(),
    };
    write!(out, "  {:<4} {}{}", priority, entry.title, phase)?;
    if let Some(desc) = &entry.description {
        write!(out, " — {desc}")?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::miqaat::MiqaatEntry;

    fn entry(title: &str, priority: Option<u32>, phase: Option<Phase>) -> MiqaatEntry {
        MiqaatEntry {
            title: title.to_string(),
            description: None,
            priority,
            phase,
            year: None,
        }
    }

    fn records() -> Vec<DayRecord> {
        vec![
            DayRecord {
                month: 9,
                date: 1,
                miqaats: vec![
                    entry("Eid al-Fitr", Some(1), Some(Phase::Day)),
                    entry("Local urus", None, None),
                ],
            },
            DayRecord {
                month: 9,
                date: 8,
                miqaats: vec![entry("Washeq", Some(4), Some(Phase::Night))],
            },
        ]
    }

    #[test]
    fn test_write_day_lists_sorted_entries() {
        let mut buf = Vec::new();
        write_day(&records(), 1446, 9, 1, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("1 Shawwal 1446H (31 Mar 2025)"));
        let eid = out.find("Eid al-Fitr").unwrap();
        let urus = out.find("Local urus").unwrap();
        assert!(eid < urus, "unranked entries should sort last");
        assert!(out.contains("p1"));
        assert!(out.contains("p-"));
        assert!(out.contains("Total: 2 miqaat(s)"));
    }

    #[test]
    fn test_write_day_empty() {
        let mut buf = Vec::new();
        write_day(&records(), 1446, 9, 3, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("No miqaats."));
    }

    #[test]
    fn test_write_day_includes_below_cutoff_entries() {
        // Priority 4 never shows as an indicator but the listing includes it.
        let mut buf = Vec::new();
        write_day(&records(), 1446, 9, 8, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Washeq"));
        assert!(out.contains("[night]"));
        assert!(out.contains("p4"));
    }

    #[test]
    fn test_write_month_agenda() {
        let mut buf = Vec::new();
        write_month(&records(), 1446, 9, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Shawwal al-Mukarram 1446H"));
        assert!(out.contains("Eid al-Fitr"));
        assert!(out.contains("Washeq"));
        assert!(out.contains("Total: 3 miqaat(s)"));
        // Days without entries are skipped entirely.
        assert!(!out.contains("2 Shawwal"));
    }

    #[test]
    fn test_run_rejects_out_of_range_month() {
        assert!(run(None, 1446, 0, None).is_err());
        assert!(run(None, 1446, 13, None).is_err());
    }
}
