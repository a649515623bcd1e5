//! Calendar week view: seven Monday-first day slots with at most one workout
//! each.

use anyhow::Result;
use chrono::{DateTime, Datelike, Days, Duration, FixedOffset, NaiveDate, NaiveTime, Utc, Weekday};
use serde::Serialize;

use super::range::query_range;
use crate::db::{
    models::{DateRange, SortOrder},
    Database, Workout,
};

const DAYS_PER_WEEK: usize = 7;

/// A Monday-start week as seen from one UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    monday: NaiveDate,
    offset: FixedOffset,
    bounds: DateRange,
}

impl Week {
    /// The week containing `anchor`, whatever weekday the anchor is. `None`
    /// when the week falls outside the representable calendar.
    pub fn containing(anchor: NaiveDate, offset: FixedOffset) -> Option<Self> {
        let monday = anchor.checked_sub_days(Days::new(u64::from(
            anchor.weekday().num_days_from_monday(),
        )))?;
        let next_monday = monday.checked_add_days(Days::new(DAYS_PER_WEEK as u64))?;

        let start = local_midnight(monday, offset)?;
        let end = local_midnight(next_monday, offset)? - Duration::nanoseconds(1);

        Some(Self {
            monday,
            offset,
            bounds: DateRange::new(start, end)?,
        })
    }

    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    pub fn sunday(&self) -> NaiveDate {
        self.monday + Days::new(DAYS_PER_WEEK as u64 - 1)
    }

    /// Monday 00:00 through Sunday 23:59:59.999999999 local time, as UTC instants.
    pub fn bounds(&self) -> DateRange {
        self.bounds
    }

    pub fn days(&self) -> [NaiveDate; DAYS_PER_WEEK] {
        std::array::from_fn(|i| self.monday + Days::new(i as u64))
    }

    fn local_day(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// Place `workouts` into this week's day slots.
    ///
    /// A workout lands in the slot whose calendar day equals its own date in
    /// this week's offset; time of day is ignored. When several workouts share
    /// a day the first one in `workouts` order is kept and the rest are only
    /// counted in `extra_workouts`.
    pub fn bucketize(&self, workouts: &[Workout]) -> WeekView {
        let days = self.days().map(|date| {
            let mut same_day = workouts.iter().filter(|w| self.local_day(w.date) == date);
            let workout = same_day.next().cloned();
            DaySlot {
                date,
                day_name: day_name(date.weekday()),
                workout,
                extra_workouts: same_day.count(),
            }
        });

        WeekView {
            week_start: self.monday,
            week_end: self.sunday(),
            utc_offset_minutes: self.offset.local_minus_utc() / 60,
            days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlot {
    pub date: NaiveDate,
    pub day_name: &'static str,
    pub workout: Option<Workout>,
    pub extra_workouts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekView {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub utc_offset_minutes: i32,
    pub days: [DaySlot; DAYS_PER_WEEK],
}

/// Free-function form of [`Week::bucketize`].
pub fn bucketize(anchor: NaiveDate, offset: FixedOffset, workouts: &[Workout]) -> Option<WeekView> {
    Week::containing(anchor, offset).map(|week| week.bucketize(workouts))
}

/// Load the owner's workouts for `week` and lay them out by day.
///
/// The range is read newest first, so on a day with several workouts the slot
/// shows the latest one.
pub async fn week_view(db: &Database, owner_id: &str, week: &Week) -> Result<WeekView> {
    let workouts = query_range(db, owner_id, Some(week.bounds()), SortOrder::Descending).await?;
    Ok(week.bucketize(&workouts))
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> Option<DateTime<Utc>> {
    date.and_time(NaiveTime::MIN)
        .and_local_timezone(offset)
        .single()
        .map(|local| local.with_timezone(&Utc))
}

fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::db::models::WorkoutDraft;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn workout_at(instant: DateTime<Utc>) -> Workout {
        Workout::new(
            "u1",
            WorkoutDraft {
                date: Some(instant),
                ..WorkoutDraft::default()
            },
            instant,
        )
    }

    #[test]
    fn week_is_monday_to_sunday_for_any_anchor() {
        for d in 8..=14 {
            let week = Week::containing(date(2024, 1, d), utc()).unwrap();
            assert_eq!(week.monday(), date(2024, 1, 8));
            assert_eq!(week.sunday(), date(2024, 1, 14));
        }

        let week = Week::containing(date(2024, 1, 10), utc()).unwrap();
        assert_eq!(
            week.bounds().start(),
            Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap()
        );
        assert_eq!(
            week.bounds().end(),
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap() - Duration::nanoseconds(1)
        );
    }

    #[test]
    fn bounds_follow_the_offset() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let week = Week::containing(date(2024, 1, 8), plus_two).unwrap();
        assert_eq!(
            week.bounds().start(),
            Utc.with_ymd_and_hms(2024, 1, 7, 22, 0, 0).unwrap()
        );
    }

    #[test]
    fn monday_workout_fills_only_monday() {
        let monday_workout = workout_at(Utc.with_ymd_and_hms(2024, 1, 8, 18, 45, 0).unwrap());
        let view = bucketize(date(2024, 1, 8), utc(), &[monday_workout.clone()]).unwrap();

        assert_eq!(view.days.len(), 7);
        assert_eq!(view.days[0].day_name, "Monday");
        assert_eq!(view.days[6].day_name, "Sunday");
        assert_eq!(view.days[0].workout.as_ref(), Some(&monday_workout));
        assert!(view.days[1..].iter().all(|slot| slot.workout.is_none()));
    }

    #[test]
    fn calendar_day_is_judged_in_the_offset() {
        // 23:30 UTC on Monday is already Tuesday at UTC+1.
        let late = workout_at(Utc.with_ymd_and_hms(2024, 1, 8, 23, 30, 0).unwrap());
        let plus_one = FixedOffset::east_opt(3600).unwrap();

        let view = bucketize(date(2024, 1, 8), plus_one, &[late]).unwrap();
        assert!(view.days[0].workout.is_none());
        assert!(view.days[1].workout.is_some());
    }

    #[test]
    fn first_same_day_workout_wins_and_rest_are_counted() {
        let morning = workout_at(Utc.with_ymd_and_hms(2024, 1, 10, 7, 0, 0).unwrap());
        let evening = workout_at(Utc.with_ymd_and_hms(2024, 1, 10, 19, 0, 0).unwrap());

        let view = bucketize(date(2024, 1, 8), utc(), &[evening.clone(), morning]).unwrap();
        let wednesday = &view.days[2];
        assert_eq!(wednesday.workout.as_ref().map(|w| &w.id), Some(&evening.id));
        assert_eq!(wednesday.extra_workouts, 1);
    }

    #[test]
    fn workouts_outside_the_week_are_ignored() {
        let outside = workout_at(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
        let view = bucketize(date(2024, 1, 8), utc(), &[outside]).unwrap();
        assert!(view.days.iter().all(|slot| slot.workout.is_none()));
    }

    #[tokio::test]
    async fn week_view_reads_the_store() {
        let db = Database::in_memory().unwrap();
        let inside = workout_at(Utc.with_ymd_and_hms(2024, 1, 12, 6, 0, 0).unwrap());
        db.insert_workout(&inside).await.unwrap();
        db.insert_workout(&workout_at(Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap()))
            .await
            .unwrap();

        let week = Week::containing(date(2024, 1, 8), utc()).unwrap();
        let view = week_view(&db, "u1", &week).await.unwrap();

        let filled: Vec<_> = view
            .days
            .iter()
            .filter_map(|slot| slot.workout.as_ref().map(|w| (slot.day_name, w.id.clone())))
            .collect();
        assert_eq!(filled, vec![("Friday", inside.id)]);
    }
}
