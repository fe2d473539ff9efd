use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDateTime};

use crate::models::CalendarId;
use crate::services::clock::Clock;
use crate::store::DateRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub calendar: CalendarId,
    pub range: DateRange,
}

/// Short-lived read cache keyed by calendar and requested date range.
pub struct TtlCache<V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<CacheKey, (NaiveDateTime, V)>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((stored_at, value)) if now - *stored_at < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `value` and drop every entry that has outlived the TTL.
    pub fn insert(&self, key: CacheKey, value: V) {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, (stored_at, _)| now - *stored_at < self.ttl);
        entries.insert(key, (now, value));
    }

    pub fn invalidate_calendar(&self, calendar: CalendarId) {
        self.entries
            .lock()
            .unwrap()
            .retain(|key, _| key.calendar != calendar);
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clock::ManualClock;
    use chrono::NaiveDate;

    fn key(calendar: CalendarId) -> CacheKey {
        CacheKey {
            calendar,
            range: DateRange::default(),
        }
    }

    fn setup() -> (Arc<ManualClock>, TtlCache<u32>) {
        let clock = Arc::new(ManualClock::at_date(
            NaiveDate::from_ymd_opt(2025, 11, 17).unwrap(),
        ));
        let cache = TtlCache::new(Duration::seconds(30), clock.clone());
        (clock, cache)
    }

    #[test]
    fn test_hit_within_ttl() {
        let (clock, cache) = setup();
        cache.insert(key(CalendarId::Pose), 7);
        clock.advance(Duration::seconds(29));
        assert_eq!(cache.get(&key(CalendarId::Pose)), Some(7));
    }

    #[test]
    fn test_expires_after_ttl() {
        let (clock, cache) = setup();
        cache.insert(key(CalendarId::Pose), 7);
        clock.advance(Duration::seconds(30));
        assert_eq!(cache.get(&key(CalendarId::Pose)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_evicts_expired_keys() {
        let (clock, cache) = setup();
        let start = NaiveDate::from_ymd_opt(2025, 11, 17).unwrap();
        for offset in 0..100 {
            let day = start + Duration::days(offset);
            cache.insert(
                CacheKey {
                    calendar: CalendarId::Pose,
                    range: DateRange::day(day),
                },
                offset as u32,
            );
            clock.advance(Duration::seconds(60));
        }
        // Only the entry written last can still be live
        assert_eq!(cache.len(), 1);

        cache.insert(key(CalendarId::Sav), 1);
        clock.advance(Duration::seconds(10));
        cache.insert(key(CalendarId::Metre), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_invalidate_calendar_keeps_others() {
        let (_clock, cache) = setup();
        cache.insert(key(CalendarId::Pose), 1);
        cache.insert(key(CalendarId::Sav), 2);
        cache.invalidate_calendar(CalendarId::Pose);
        assert_eq!(cache.get(&key(CalendarId::Pose)), None);
        assert_eq!(cache.get(&key(CalendarId::Sav)), Some(2));
    }

    #[test]
    fn test_ranges_are_distinct_keys() {
        let (_clock, cache) = setup();
        let day = NaiveDate::from_ymd_opt(2025, 11, 18).unwrap();
        cache.insert(key(CalendarId::Metre), 1);
        let narrowed = CacheKey {
            calendar: CalendarId::Metre,
            range: DateRange::day(day),
        };
        assert_eq!(cache.get(&narrowed), None);
    }
}
