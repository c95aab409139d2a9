//! In-memory repositories for tests.

use axum::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    meals::{
        repo::MealRepo,
        repo_types::{Meal, MealChanges, NewMeal},
    },
    users::{
        repo::UserRepo,
        repo_types::{NewUser, User},
    },
};

fn apply_changes(changes: MealChanges, meal: &mut Meal) {
    if let Some(name) = changes.name {
        meal.name = name;
    }
    if let Some(description) = changes.description {
        meal.description = description;
    }
    if let Some(occurred_at) = changes.occurred_at {
        meal.occurred_at = occurred_at;
    }
    if let Some(is_on_diet) = changes.is_on_diet {
        meal.is_on_diet = is_on_diet;
    }
}

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    meals: RwLock<Vec<Meal>>, // insertion order == creation order
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_session(&self, session_id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.session_id == session_id).cloned())
    }

    async fn create(&self, new: NewUser) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == new.email) {
            return Ok(None);
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            session_id: new.session_id,
            name: new.name,
            email: new.email,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(Some(user))
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.users.read().await.clone())
    }
}

#[async_trait]
impl MealRepo for MemoryStore {
    async fn create(&self, user_id: Uuid, new: NewMeal) -> anyhow::Result<Meal> {
        let now = OffsetDateTime::now_utc();
        let meal = Meal {
            id: Uuid::new_v4(),
            user_id,
            name: new.name,
            description: new.description,
            occurred_at: new.occurred_at,
            is_on_diet: new.is_on_diet,
            created_at: now,
            updated_at: now,
        };
        self.meals.write().await.push(meal.clone());
        Ok(meal)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let meals = self.meals.read().await;
        Ok(meals.iter().filter(|m| m.user_id == user_id).cloned().collect())
    }

    async fn get(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meals = self.meals.read().await;
        Ok(meals
            .iter()
            .find(|m| m.id == meal_id && m.user_id == user_id)
            .cloned())
    }

    async fn update(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        changes: MealChanges,
    ) -> anyhow::Result<Option<Meal>> {
        let mut meals = self.meals.write().await;
        let Some(meal) = meals
            .iter_mut()
            .find(|m| m.id == meal_id && m.user_id == user_id)
        else {
            return Ok(None);
        };
        apply_changes(changes, meal);
        meal.updated_at = OffsetDateTime::now_utc();
        Ok(Some(meal.clone()))
    }

    async fn delete(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<bool> {
        let mut meals = self.meals.write().await;
        let before = meals.len();
        meals.retain(|m| !(m.id == meal_id && m.user_id == user_id));
        Ok(meals.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn breakfast() -> NewMeal {
        NewMeal {
            name: "Breakfast".into(),
            description: "Bread and coffee".into(),
            occurred_at: datetime!(2024-10-01 07:00:00 UTC),
            is_on_diet: false,
        }
    }

    #[tokio::test]
    async fn meals_are_scoped_to_their_owner() {
        let store = MemoryStore::default();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let meal = MealRepo::create(&store, alice, breakfast()).await.unwrap();

        assert!(store.get(bob, meal.id).await.unwrap().is_none());
        assert!(store.list_by_user(bob).await.unwrap().is_empty());
        assert!(store
            .update(bob, meal.id, MealChanges::default())
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete(bob, meal.id).await.unwrap());
        assert_eq!(store.get(alice, meal.id).await.unwrap(), Some(meal));
    }

    #[tokio::test]
    async fn repeated_delete_reports_nothing_deleted() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let meal = MealRepo::create(&store, owner, breakfast()).await.unwrap();
        assert!(store.delete(owner, meal.id).await.unwrap());
        assert!(!store.delete(owner, meal.id).await.unwrap());
    }

    #[tokio::test]
    async fn partial_update_touches_only_given_fields() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let meal = MealRepo::create(&store, owner, breakfast()).await.unwrap();

        let updated = store
            .update(
                owner,
                meal.id,
                MealChanges {
                    name: Some("Brunch".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Brunch");
        assert_eq!(updated.description, meal.description);
        assert_eq!(updated.occurred_at, meal.occurred_at);
        assert_eq!(updated.is_on_diet, meal.is_on_diet);
        assert!(updated.updated_at >= meal.updated_at);
    }
}
