use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{DayFilter, OccupancyView};

/// How far `next_valid_day` looks before giving up.
pub const MAX_LOOKAHEAD_DAYS: u64 = 14;

/// Number of working days a single installation request occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WorkDays {
    One = 1,
    Two = 2,
    Three = 3,
}

impl WorkDays {
    pub const ALL: [WorkDays; 3] = [WorkDays::One, WorkDays::Two, WorkDays::Three];

    pub fn count(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for WorkDays {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(WorkDays::One),
            2 => Ok(WorkDays::Two),
            3 => Ok(WorkDays::Three),
            other => Err(format!("duration must be 1, 2 or 3 days, got {other}")),
        }
    }
}

impl From<WorkDays> for u8 {
    fn from(value: WorkDays) -> Self {
        value as u8
    }
}

/// First working day strictly after `from`, skipping Sundays and holidays.
pub fn next_valid_day(from: NaiveDate, filter: &DayFilter) -> Option<NaiveDate> {
    (1..=MAX_LOOKAHEAD_DAYS)
        .filter_map(|step| from.checked_add_days(Days::new(step)))
        .find(|date| filter.is_valid_day(*date))
}

/// The dates a request starting on `start` occupies, or `None` when a following working day
/// cannot be found.
pub fn expand_duration(
    start: NaiveDate,
    days: WorkDays,
    filter: &DayFilter,
) -> Option<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(days.count());
    dates.push(start);
    while dates.len() < days.count() {
        let last = *dates.last()?;
        dates.push(next_valid_day(last, filter)?);
    }
    Some(dates)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationOption {
    pub days: WorkDays,
    pub dates: Vec<NaiveDate>,
    pub offered: bool,
}

/// Whether `days` can be offered from `start` given the last occupancy snapshot.
///
/// Advisory only: admission checks every date again when the request is submitted.
pub fn duration_option(
    start: NaiveDate,
    days: WorkDays,
    view: &OccupancyView,
    filter: &DayFilter,
) -> DurationOption {
    match expand_duration(start, days, filter) {
        Some(dates) => {
            let offered = view.is_loaded()
                && dates
                    .iter()
                    .all(|date| filter.is_bookable(*date) && !view.is_full(*date));
            DurationOption {
                days,
                dates,
                offered,
            }
        }
        None => DurationOption {
            days,
            dates: Vec::new(),
            offered: false,
        },
    }
}

pub fn duration_options(
    start: NaiveDate,
    view: &OccupancyView,
    filter: &DayFilter,
) -> Vec<DurationOption> {
    WorkDays::ALL
        .iter()
        .map(|days| duration_option(start, *days, view, filter))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Booking, CalendarId};
    use crate::services::occupancy::compute_occupancy;
    use chrono::NaiveDateTime;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn filter(holidays: &[&str]) -> DayFilter {
        DayFilter::new(
            CalendarId::Pose,
            d("2025-11-17"),
            holidays.iter().map(|h| d(h)),
        )
    }

    fn pose_booking(id: &str, date: &str) -> Booking {
        Booking {
            id: id.to_string(),
            calendar: CalendarId::Pose,
            date: d(date),
            slot: "journee".to_string(),
            client_name: "Durand".to_string(),
            client_phone: "0611111111".to_string(),
            designer_name: "Claire".to_string(),
            message: None,
            created_at: NaiveDateTime::parse_from_str("2025-11-01 08:00", "%Y-%m-%d %H:%M")
                .unwrap(),
        }
    }

    #[test]
    fn test_one_day_is_the_start() {
        let dates = expand_duration(d("2025-11-18"), WorkDays::One, &filter(&[])).unwrap();
        assert_eq!(dates, vec![d("2025-11-18")]);
    }

    #[test]
    fn test_two_days_consecutive() {
        let dates = expand_duration(d("2025-11-18"), WorkDays::Two, &filter(&[])).unwrap();
        assert_eq!(dates, vec![d("2025-11-18"), d("2025-11-19")]);
    }

    #[test]
    fn test_two_days_skips_sunday() {
        // Saturday start, Sunday skipped
        let dates = expand_duration(d("2025-11-22"), WorkDays::Two, &filter(&[])).unwrap();
        assert_eq!(dates, vec![d("2025-11-22"), d("2025-11-24")]);
    }

    #[test]
    fn test_three_days_skips_holiday() {
        let dates =
            expand_duration(d("2025-11-18"), WorkDays::Three, &filter(&["2025-11-19"])).unwrap();
        assert_eq!(dates, vec![d("2025-11-18"), d("2025-11-20"), d("2025-11-21")]);
    }

    #[test]
    fn test_three_days_over_the_weekend() {
        let dates = expand_duration(d("2025-11-21"), WorkDays::Three, &filter(&[])).unwrap();
        assert_eq!(dates, vec![d("2025-11-21"), d("2025-11-22"), d("2025-11-24")]);
    }

    #[test]
    fn test_lookahead_is_bounded() {
        // Two solid weeks of holidays after the start
        let holidays: Vec<String> = (1..=14)
            .map(|i| {
                (d("2025-11-18") + Days::new(i))
                    .format("%Y-%m-%d")
                    .to_string()
            })
            .collect();
        let refs: Vec<&str> = holidays.iter().map(|s| s.as_str()).collect();
        let f = filter(&refs);
        assert_eq!(next_valid_day(d("2025-11-18"), &f), None);
        assert_eq!(expand_duration(d("2025-11-18"), WorkDays::Two, &f), None);
        assert_eq!(
            expand_duration(d("2025-11-18"), WorkDays::One, &f),
            Some(vec![d("2025-11-18")])
        );
    }

    #[test]
    fn test_option_offered_when_every_day_has_room() {
        let f = filter(&[]);
        let view = compute_occupancy(
            CalendarId::Pose,
            &[pose_booking("1", "2025-11-19")],
            f.today(),
        );
        let option = duration_option(d("2025-11-18"), WorkDays::Two, &view, &f);
        assert!(option.offered);
        assert_eq!(option.dates, vec![d("2025-11-18"), d("2025-11-19")]);
    }

    #[test]
    fn test_option_withheld_when_a_later_day_is_full() {
        let f = filter(&[]);
        let view = compute_occupancy(
            CalendarId::Pose,
            &[
                pose_booking("1", "2025-11-20"),
                pose_booking("2", "2025-11-20"),
            ],
            f.today(),
        );
        let options = duration_options(d("2025-11-18"), &view, &f);
        let offered: Vec<bool> = options.iter().map(|o| o.offered).collect();
        assert_eq!(offered, vec![true, true, false]);
    }

    #[test]
    fn test_no_option_on_closed_start() {
        let f = filter(&[]);
        let view = compute_occupancy(CalendarId::Pose, &[], f.today());
        assert!(!duration_option(d("2025-11-16"), WorkDays::One, &view, &f).offered);
        assert!(!duration_option(d("2025-11-23"), WorkDays::Two, &view, &f).offered);
    }

    #[test]
    fn test_no_option_before_data_loaded() {
        let f = filter(&[]);
        let view = OccupancyView::pending(CalendarId::Pose);
        assert!(!duration_option(d("2025-11-18"), WorkDays::One, &view, &f).offered);
    }

    #[test]
    fn test_work_days_from_wire() {
        let parsed: WorkDays = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, WorkDays::Two);
        assert!(serde_json::from_str::<WorkDays>("4").is_err());
        assert_eq!(serde_json::to_string(&WorkDays::Three).unwrap(), "3");
    }
}
