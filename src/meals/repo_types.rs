use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Meal record in the database.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    #[sqlx(rename = "date")]
    pub occurred_at: OffsetDateTime, // when the meal was eaten
    pub is_on_diet: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Validated input for a new meal.
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub name: String,
    pub description: String,
    pub occurred_at: OffsetDateTime,
    pub is_on_diet: bool,
}

/// Validated partial update; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default)]
pub struct MealChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub occurred_at: Option<OffsetDateTime>,
    pub is_on_diet: Option<bool>,
}
