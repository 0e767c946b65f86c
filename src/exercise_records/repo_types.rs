use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::validation::{
    in_range, in_range_exclusive_min, max_chars, not_after_now, not_blank, ValidationError,
};

pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_DURATION_MINUTES: i32 = 24 * 60;
pub const MAX_CALORIES: i32 = 10_000;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ExerciseRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_name: String,
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<i32>,
    pub recorded_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExerciseRecord {
    pub exercise_name: String,
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<i32>,
    pub recorded_at: OffsetDateTime,
}

impl NewExerciseRecord {
    pub fn validate(&self, now: OffsetDateTime) -> Result<(), ValidationError> {
        not_blank("exercise_name", &self.exercise_name)?;
        max_chars("exercise_name", &self.exercise_name, MAX_NAME_CHARS)?;
        if let Some(d) = self.duration_minutes {
            in_range_exclusive_min("duration_minutes", d, 0, MAX_DURATION_MINUTES)?;
        }
        if let Some(c) = self.calories_burned {
            in_range("calories_burned", c, 0, MAX_CALORIES)?;
        }
        not_after_now("recorded_at", self.recorded_at, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::{macros::datetime, Duration};

    const NOW: OffsetDateTime = datetime!(2024-07-01 12:00 UTC);

    fn valid() -> NewExerciseRecord {
        NewExerciseRecord {
            exercise_name: "Running".into(),
            duration_minutes: Some(30),
            calories_burned: Some(250),
            recorded_at: NOW - Duration::hours(1),
        }
    }

    #[test]
    fn accepts_boundaries() {
        let mut r = valid();
        r.exercise_name = "x".repeat(MAX_NAME_CHARS);
        r.duration_minutes = Some(MAX_DURATION_MINUTES);
        r.calories_burned = Some(0);
        r.recorded_at = NOW;
        assert!(r.validate(NOW).is_ok());

        r.duration_minutes = None;
        r.calories_burned = Some(MAX_CALORIES);
        assert!(r.validate(NOW).is_ok());
    }

    #[rstest]
    #[case::blank_name(|r: &mut NewExerciseRecord| r.exercise_name = "  ".into(), "exercise_name")]
    #[case::long_name(|r: &mut NewExerciseRecord| r.exercise_name = "x".repeat(101), "exercise_name")]
    #[case::zero_duration(|r: &mut NewExerciseRecord| r.duration_minutes = Some(0), "duration_minutes")]
    #[case::long_duration(|r: &mut NewExerciseRecord| r.duration_minutes = Some(1441), "duration_minutes")]
    #[case::negative_calories(|r: &mut NewExerciseRecord| r.calories_burned = Some(-1), "calories_burned")]
    #[case::too_many_calories(|r: &mut NewExerciseRecord| r.calories_burned = Some(10_001), "calories_burned")]
    #[case::future(|r: &mut NewExerciseRecord| r.recorded_at = NOW + Duration::seconds(1), "recorded_at")]
    fn rejects(#[case] mutate: fn(&mut NewExerciseRecord), #[case] field: &str) {
        let mut r = valid();
        mutate(&mut r);
        assert_eq!(r.validate(NOW).unwrap_err().field, field);
    }
}
