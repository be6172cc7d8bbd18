use crate::calc::grid::{MonthGrid, ViewMonth, build_grid};
use crate::calc::hijri::{self, HijriDate};
use crate::data::miqaat::Phase;
use crate::data::{AppSettings, store};
use anyhow::{Result, bail};
use chrono::Local;

pub fn run(source_override: Option<&str>, year: Option<i32>, month: Option<u32>) -> Result<()> {
    let settings = AppSettings::load()?;
    let source = source_override.unwrap_or(&settings.source);
    let outcome = store::load(source)?;
    if outcome.is_empty_data() {
        eprintln!("warning: miqaat store is empty — no indicators will be shown");
    }
    let records = outcome.records();

    let today = Local::now().date_naive();
    let view = target_view(year, month, today)?;
    let grid = build_grid(&records, view.year, view.month, today);
    write_grid(&grid, &mut std::io::stdout())
}

/// Resolves the requested Hijri month, defaulting missing pieces from
/// today's date. CLI months are 1-based.
pub(crate) fn target_view(
    year: Option<i32>,
    month: Option<u32>,
    today: chrono::NaiveDate,
) -> Result<ViewMonth> {
    let current = ViewMonth::of(today);
    let month = match month {
        None => current.month,
        Some(m) if (1..=12).contains(&m) => m - 1,
        Some(m) => bail!("month must be 1..=12, got {m}"),
    };
    Ok(ViewMonth {
        year: year.unwrap_or(current.year),
        month,
    })
}

pub(crate) fn write_grid<W: std::io::Write>(grid: &MonthGrid, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "{} {}H   ({} – {})",
        hijri::month_name(grid.month),
        grid.year,
        grid.start.format("%-d %b %Y"),
        grid.last().format("%-d %b %Y")
    )?;
    for day in ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"] {
        write!(out, "{day:>5}")?;
    }
    writeln!(out)?;

    for week in &grid.weeks {
        for cell in week {
            if !cell.in_view_month {
                write!(out, "     ")?;
                continue;
            }
            let marker = match cell.indicator {
                Some(ind) if ind.phase == Some(Phase::Night) => 'o',
                Some(_) => '*',
                None => ' ',
            };
            write!(out, "{:>4}{marker}", cell.hijri.day)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "---")?;
    writeln!(out, "* day miqaat   o night miqaat")?;
    let first = HijriDate::new(grid.year, grid.month, 1);
    writeln!(
        out,
        "1 {} = {}",
        hijri::month_name_short(grid.month),
        first.to_gregorian().format("%-d %b %Y")
    )?;
    Ok(())
}
