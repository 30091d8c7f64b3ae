use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::auth::{repo_types::User, services::normalize_email};
use crate::ingredients::repo_types::{normalize_name, Ingredient, IngredientFilter};
use crate::recipes::repo_types::{NewRecipe, Recipe, RecipeRow};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_write_err(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::Conflict(db.message().to_string());
        }
        if db.is_foreign_key_violation() {
            return StoreError::NotFound("user");
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, email: &str) -> StoreResult<User> {
        let email = normalize_email(email)?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email)
            VALUES ($1, $2)
            RETURNING id, email, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&email)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match map_write_err(e) {
            StoreError::Conflict(_) => StoreError::Conflict("email already registered".into()),
            other => other,
        })?;
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, email, created_at FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn list_ingredients(
        &self,
        owner: Uuid,
        filter: IngredientFilter,
    ) -> StoreResult<Vec<Ingredient>> {
        // EXISTS yields each ingredient once however many recipes use it
        let rows = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT i.id, i.user_id, i.name
              FROM ingredients i
             WHERE i.user_id = $1
               AND (NOT $2 OR EXISTS (
                    SELECT 1 FROM recipe_ingredients ri WHERE ri.ingredient_id = i.id
               ))
             ORDER BY i.name DESC, i.id DESC
            "#,
        )
        .bind(owner)
        .bind(filter.assigned_only)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create_ingredient(&self, owner: Uuid, name: &str) -> StoreResult<Ingredient> {
        let name = normalize_name(name)?;
        let row = sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients (user_id, name)
            VALUES ($1, $2)
            RETURNING id, user_id, name
            "#,
        )
        .bind(owner)
        .bind(&name)
        .fetch_one(&self.db)
        .await
        .map_err(map_write_err)?;
        Ok(row)
    }

    async fn create_recipe(&self, owner: Uuid, recipe: NewRecipe) -> StoreResult<Recipe> {
        recipe.validate()?;
        let ids: Vec<i64> = recipe.ingredients.iter().copied().collect();

        let mut tx = self.db.begin().await?;

        let (found,): (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM ingredients WHERE id = ANY($1)"#)
                .bind(&ids)
                .fetch_one(&mut *tx)
                .await?;
        if found != ids.len() as i64 {
            return Err(StoreError::Validation("unknown ingredient id".into()));
        }

        let row = sqlx::query_as::<_, RecipeRow>(
            r#"
            INSERT INTO recipes (user_id, title, time_minutes, price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, time_minutes, price
            "#,
        )
        .bind(owner)
        .bind(recipe.title.trim())
        .bind(recipe.time_minutes)
        .bind(recipe.price)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_err)?;

        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id)
            SELECT $1, UNNEST($2::BIGINT[])
            "#,
        )
        .bind(row.id)
        .bind(&ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.with_ingredients(recipe.ingredients))
    }

    async fn list_recipes(&self, owner: Uuid) -> StoreResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            r#"
            SELECT id, user_id, title, time_minutes, price
              FROM recipes
             WHERE user_id = $1
             ORDER BY id DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.db)
        .await?;

        let recipe_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let links: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT recipe_id, ingredient_id
              FROM recipe_ingredients
             WHERE recipe_id = ANY($1)
            "#,
        )
        .bind(&recipe_ids)
        .fetch_all(&self.db)
        .await?;

        let mut by_recipe: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();
        for (recipe_id, ingredient_id) in links {
            by_recipe.entry(recipe_id).or_default().insert(ingredient_id);
        }

        Ok(rows
            .into_iter()
            .map(|r| {
                let ingredients = by_recipe.remove(&r.id).unwrap_or_default();
                r.with_ingredients(ingredients)
            })
            .collect())
    }
}
