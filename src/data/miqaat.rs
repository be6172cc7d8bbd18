use serde::{Deserialize, Deserializer, Serialize};

/// Whether an observance falls on the day or the preceding night.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Day,
    Night,
}

/// A single named observance tied to a (month, day) pair.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MiqaatEntry {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lower value = higher precedence. `None` means the entry carries no
    /// usable priority and can never produce an indicator.
    #[serde(default, deserialize_with = "de_priority")]
    pub priority: Option<u32>,
    #[serde(default, deserialize_with = "de_phase")]
    pub phase: Option<Phase>,
    /// Effective-from Hijri year: the entry applies to this year onwards.
    /// `None` means always applicable.
    #[serde(default)]
    pub year: Option<i32>,
}

impl MiqaatEntry {
    /// True when the entry is in effect for `hijri_year` ("year X onwards").
    pub fn applies_in_year(&self, hijri_year: i32) -> bool {
        self.year.is_none_or(|from| hijri_year >= from)
    }
}

/// One store element: every observance for a single (Hijri month, day).
/// `month` is 0-indexed, `date` is 1-indexed, matching the store format.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DayRecord {
    pub month: u32,
    pub date: u32,
    #[serde(default)]
    pub miqaats: Vec<MiqaatEntry>,
}

/// Accepts integers, integral floats, and numeric strings; anything else
/// (and anything below 1) decodes to `None` rather than failing the load.
fn de_priority<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(parse_priority))
}

pub(crate) fn parse_priority(value: &serde_json::Value) -> Option<u32> {
    let parsed = match value {
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u32::try_from(u).ok()
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
                    .map(|f| f as u32)
            }
        }
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    parsed.filter(|&p| p >= 1)
}

/// Unknown phase strings decode to `None` instead of failing the load.
fn de_phase<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Phase>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(|v| match v.as_str() {
        Some("day") => Some(Phase::Day),
        Some("night") => Some(Phase::Night),
        _ => None,
    }))
}
