use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::CalendarId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holiday {
    pub id: String,
    pub calendar: CalendarId,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHoliday {
    pub calendar: CalendarId,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HolidayPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
