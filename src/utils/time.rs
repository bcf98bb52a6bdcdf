use chrono::{DateTime, NaiveTime, TimeZone};

/// Next instant strictly after `now` whose local wall-clock time is `at`.
/// Days where `at` falls into a DST gap are skipped.
pub fn next_occurrence<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let mut day = now.date_naive();

    loop {
        if let Some(candidate) = tz.from_local_datetime(&day.and_time(at)).earliest() {
            if candidate > *now {
                return candidate;
            }
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => return now.clone(),
        };
    }
}

/// Next daily fire time. Counts from the last fire when the wall clock is
/// still behind it, so an early wake-up never fires twice on one day.
pub fn next_fire_time<Tz: TimeZone>(
    now: &DateTime<Tz>,
    last_fired: Option<&DateTime<Tz>>,
    at: NaiveTime,
) -> DateTime<Tz> {
    match last_fired {
        Some(fired) if fired > now => next_occurrence(fired, at),
        _ => next_occurrence(now, at),
    }
}

/// Format a duration as `Xh Ym Zs` for logs
pub fn format_wait(wait: std::time::Duration) -> String {
    let secs = wait.as_secs();
    format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_later_today() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 9, 15, 0).unwrap();
        let next = next_occurrence(&now, at(22, 0));
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 3, 10, 22, 0, 0).unwrap());
    }

    #[test]
    fn test_already_passed_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 22, 0, 0).unwrap();
        let next = next_occurrence(&now, at(22, 0));
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 1, 1, 22, 0, 0).unwrap());
    }

    #[test]
    fn test_uses_local_wall_clock() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2024, 6, 1, 23, 30, 0).unwrap();
        let next = next_occurrence(&now, at(22, 0));
        assert_eq!(next, tz.with_ymd_and_hms(2024, 6, 2, 22, 0, 0).unwrap());
        assert_eq!((next - now).num_minutes(), 22 * 60 + 30);
    }

    #[test]
    fn test_early_wake_after_fire_waits_for_tomorrow() {
        let fired = Utc.with_ymd_and_hms(2024, 3, 10, 22, 0, 0).unwrap();
        let woke = Utc.with_ymd_and_hms(2024, 3, 10, 21, 59, 59).unwrap();

        let next = next_fire_time(&woke, Some(&fired), at(22, 0));
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 3, 11, 22, 0, 0).unwrap());
    }

    #[test]
    fn test_fire_time_after_normal_wake() {
        let fired = Utc.with_ymd_and_hms(2024, 3, 10, 22, 0, 0).unwrap();
        let woke = Utc.with_ymd_and_hms(2024, 3, 10, 22, 0, 3).unwrap();
        assert_eq!(
            next_fire_time(&woke, Some(&fired), at(22, 0)),
            Utc.with_ymd_and_hms(2024, 3, 11, 22, 0, 0).unwrap()
        );

        let start = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
        assert_eq!(
            next_fire_time(&start, None, at(22, 0)),
            Utc.with_ymd_and_hms(2024, 3, 10, 22, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_format_wait() {
        assert_eq!(format_wait(std::time::Duration::from_secs(3665)), "1h 1m 5s");
    }
}
