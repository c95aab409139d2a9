use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Meal, MealChanges, NewMeal};

/// Meal storage. Every operation is scoped to the owning user: a meal that
/// exists but belongs to someone else behaves exactly like a missing one.
#[async_trait]
pub trait MealRepo: Send + Sync {
    async fn create(&self, user_id: Uuid, new: NewMeal) -> anyhow::Result<Meal>;

    /// All of a user's meals in creation order.
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>>;

    async fn get(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>>;

    async fn update(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        changes: MealChanges,
    ) -> anyhow::Result<Option<Meal>>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgMealRepo {
    db: PgPool,
}

impl PgMealRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealRepo for PgMealRepo {
    async fn create(&self, user_id: Uuid, new: NewMeal) -> anyhow::Result<Meal> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (id, user_id, name, description, date, is_on_diet)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, name, description, date, is_on_diet, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.occurred_at)
        .bind(new.is_on_diet)
        .fetch_one(&self.db)
        .await
        .context("insert meal")?;
        Ok(meal)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, date, is_on_diet, created_at, updated_at
            FROM meals
            WHERE user_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list meals by user")?;
        Ok(rows)
    }

    async fn get(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, date, is_on_diet, created_at, updated_at
            FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("get meal")?;
        Ok(meal)
    }

    async fn update(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        changes: MealChanges,
    ) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            UPDATE meals
               SET name        = COALESCE($3, name),
                   description = COALESCE($4, description),
                   date        = COALESCE($5, date),
                   is_on_diet  = COALESCE($6, is_on_diet),
                   updated_at  = now()
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, description, date, is_on_diet, created_at, updated_at
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.occurred_at)
        .bind(changes.is_on_diet)
        .fetch_optional(&self.db)
        .await
        .context("update meal")?;
        Ok(meal)
    }

    async fn delete(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM meals WHERE id = $1 AND user_id = $2"#)
            .bind(meal_id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete meal")?;
        Ok(res.rows_affected() > 0)
    }
}
