use crate::data::app_settings::SettingsFile;
use crate::data::miqaat::{DayRecord, MiqaatEntry, Phase};
use crate::data::persistence::{Persistable, get_data_dir};
use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn run() -> Result<()> {
    let dir = get_data_dir()?;
    fs::create_dir_all(&dir)?;
    run_in_dir(&dir)?;
    println!("Data files initialized in {}.", dir.display());
    Ok(())
}

/// Writes the default config and a sample store into `dir`. Exposed for
/// unit testing.
pub(crate) fn run_in_dir(dir: &Path) -> Result<()> {
    write_config(dir)?;
    write_sample_store(dir)?;
    Ok(())
}

fn write_config(dir: &Path) -> Result<()> {
    SettingsFile::default().save_to(dir)
}

fn write_sample_store(dir: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&sample_records())?;
    fs::write(dir.join("miqaats.json"), json)?;
    Ok(())
}

fn miqaat(
    title: &str,
    description: Option<&str>,
    priority: u32,
    phase: Phase,
    year: Option<i32>,
) -> MiqaatEntry {
    MiqaatEntry {
        title: title.to_string(),
        description: description.map(str::to_string),
        priority: Some(priority),
        phase: Some(phase),
        year,
    }
}

fn record(month: u32, date: u32, miqaats: Vec<MiqaatEntry>) -> DayRecord {
    DayRecord {
        month,
        date,
        miqaats,
    }
}

/// A starter set of well-known observances so a fresh install renders
/// something meaningful before the user points `source` elsewhere.
fn sample_records() -> Vec<DayRecord> {
    vec![
        record(
            0,
            1,
            vec![miqaat(
                "Raas al-Sanah",
                Some("First day of the new Hijri year"),
                3,
                Phase::Day,
                None,
            )],
        ),
        record(
            0,
            10,
            vec![miqaat(
                "Aashura",
                Some("Shahadat of Imam Husain AS"),
                1,
                Phase::Day,
                None,
            )],
        ),
        record(
            1,
            20,
            vec![miqaat(
                "Chehlum",
                Some("Fortieth day after Aashura"),
                2,
                Phase::Day,
                None,
            )],
        ),
        record(
            2,
            12,
            vec![miqaat(
                "Milad al-Nabi",
                Some("Birth of Rasulullah SAW"),
                1,
                Phase::Day,
                None,
            )],
        ),
        record(
            6,
            27,
            vec![miqaat(
                "Meraj al-Nabi",
                Some("The night journey"),
                2,
                Phase::Night,
                None,
            )],
        ),
        record(
            7,
            15,
            vec![miqaat(
                "Lailat al-Nisf",
                Some("Mid-Shabaan night of ibadat"),
                2,
                Phase::Night,
                None,
            )],
        ),
        record(
            8,
            1,
            vec![miqaat(
                "First of Ramadaan",
                Some("Fasting begins"),
                3,
                Phase::Day,
                None,
            )],
        ),
        record(
            8,
            19,
            vec![miqaat(
                "Urus Syedna Taher Saifuddin RA",
                None,
                3,
                Phase::Day,
                Some(1386),
            )],
        ),
        record(
            8,
            23,
            vec![miqaat(
                "Lailat al-Qadr",
                Some("The night of power"),
                1,
                Phase::Night,
                None,
            )],
        ),
        record(
            9,
            1,
            vec![miqaat(
                "Eid al-Fitr",
                Some("First of Shawwal"),
                1,
                Phase::Day,
                None,
            )],
        ),
        record(
            11,
            9,
            vec![miqaat("Yaum-e-Arafa", None, 2, Phase::Day, None)],
        ),
        record(
            11,
            10,
            vec![miqaat(
                "Eid al-Adha",
                Some("Feast of the sacrifice"),
                1,
                Phase::Day,
                None,
            )],
        ),
        record(
            11,
            18,
            vec![miqaat(
                "Eid-e-Ghadeer-e-Khum",
                None,
                2,
                Phase::Day,
                None,
            )],
        ),
    ]
}
