use serde::{Deserialize, Serialize};

use super::repo_types::Meal;

/// Diet adherence summary over a user's meal history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealMetrics {
    pub total_meals: usize,
    pub meals_on_diet: usize,
    #[serde(rename = "mealsNotOnDiet")]
    pub meals_off_diet: usize,
    /// Longest run of consecutive on-diet meals, chronologically.
    #[serde(rename = "bestOnDietSequence")]
    pub best_streak: usize,
}

/// Summarize meals. Input order only matters for meals eaten at the same
/// instant: the sort is stable, so those keep the order they were given in.
pub fn summarize(meals: &[Meal]) -> MealMetrics {
    let mut chronological: Vec<&Meal> = meals.iter().collect();
    chronological.sort_by_key(|m| m.occurred_at);

    let mut metrics = MealMetrics {
        total_meals: meals.len(),
        ..MealMetrics::default()
    };
    let mut current = 0;
    for meal in chronological {
        if meal.is_on_diet {
            metrics.meals_on_diet += 1;
            current += 1;
            metrics.best_streak = metrics.best_streak.max(current);
        } else {
            metrics.meals_off_diet += 1;
            current = 0;
        }
    }
    metrics
}
