use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::validation::{in_range, in_range_exclusive_min, ValidationError};

pub const MAX_WEIGHT_KG: f64 = 500.0;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct BodyRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub weight_kg: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Measurements for one day; saving twice for the same day overwrites.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBodyRecord {
    pub date: Date,
    pub weight_kg: Option<f64>,
    pub body_fat_percentage: Option<f64>,
}

impl NewBodyRecord {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(w) = self.weight_kg {
            in_range_exclusive_min("weight_kg", w, 0.0, MAX_WEIGHT_KG)?;
        }
        if let Some(p) = self.body_fat_percentage {
            in_range("body_fat_percentage", p, 0.0, 100.0)?;
        }
        Ok(())
    }
}
