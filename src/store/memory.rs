use std::collections::BTreeMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::auth::{repo_types::User, services::normalize_email};
use crate::ingredients::repo_types::{normalize_name, sort_for_listing, Ingredient, IngredientFilter};
use crate::recipes::repo_types::{NewRecipe, Recipe};

/// Process-local store used by tests and local tooling.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<Uuid, User>,
    ingredients: BTreeMap<i64, Ingredient>,
    recipes: BTreeMap<i64, Recipe>,
    next_ingredient_id: i64,
    next_recipe_id: i64,
}

impl Tables {
    fn is_assigned(&self, ingredient_id: i64) -> bool {
        self.recipes
            .values()
            .any(|r| r.ingredients.contains(&ingredient_id))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, email: &str) -> StoreResult<User> {
        let email = normalize_email(email)?;
        let mut t = self.inner.write().await;
        if t.users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict("email already registered".into()));
        }
        let user = User {
            id: Uuid::new_v4(),
            email,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn list_ingredients(
        &self,
        owner: Uuid,
        filter: IngredientFilter,
    ) -> StoreResult<Vec<Ingredient>> {
        let t = self.inner.read().await;
        let mut items: Vec<Ingredient> = t
            .ingredients
            .values()
            .filter(|i| i.user_id == owner)
            .filter(|i| !filter.assigned_only || t.is_assigned(i.id))
            .cloned()
            .collect();
        sort_for_listing(&mut items);
        Ok(items)
    }

    async fn create_ingredient(&self, owner: Uuid, name: &str) -> StoreResult<Ingredient> {
        let name = normalize_name(name)?;
        let mut t = self.inner.write().await;
        if !t.users.contains_key(&owner) {
            return Err(StoreError::NotFound("user"));
        }
        t.next_ingredient_id += 1;
        let ingredient = Ingredient {
            id: t.next_ingredient_id,
            user_id: owner,
            name,
        };
        t.ingredients.insert(ingredient.id, ingredient.clone());
        Ok(ingredient)
    }

    async fn create_recipe(&self, owner: Uuid, recipe: NewRecipe) -> StoreResult<Recipe> {
        recipe.validate()?;
        let mut t = self.inner.write().await;
        if !t.users.contains_key(&owner) {
            return Err(StoreError::NotFound("user"));
        }
        if let Some(missing) = recipe
            .ingredients
            .iter()
            .find(|id| !t.ingredients.contains_key(*id))
        {
            return Err(StoreError::Validation(format!(
                "unknown ingredient id {missing}"
            )));
        }
        t.next_recipe_id += 1;
        let stored = Recipe {
            id: t.next_recipe_id,
            user_id: owner,
            title: recipe.title.trim().to_string(),
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            ingredients: recipe.ingredients,
        };
        t.recipes.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list_recipes(&self, owner: Uuid) -> StoreResult<Vec<Recipe>> {
        let t = self.inner.read().await;
        Ok(t.recipes
            .values()
            .rev()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect())
    }
}
