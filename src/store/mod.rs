//! Persistence seam for users, ingredients and recipes.
//!
//! Every ingredient read takes the owning user as a required argument; there
//! is no store call that lists ingredients across owners.

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::ingredients::repo_types::{Ingredient, IngredientFilter};
use crate::recipes::repo_types::{NewRecipe, Recipe};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, email: &str) -> StoreResult<User>;
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Ingredients owned by `owner`, ordered by name descending.
    async fn list_ingredients(
        &self,
        owner: Uuid,
        filter: IngredientFilter,
    ) -> StoreResult<Vec<Ingredient>>;
    /// Trims `name` and rejects it when blank or too long.
    async fn create_ingredient(&self, owner: Uuid, name: &str) -> StoreResult<Ingredient>;

    async fn create_recipe(&self, owner: Uuid, recipe: NewRecipe) -> StoreResult<Recipe>;
    async fn list_recipes(&self, owner: Uuid) -> StoreResult<Vec<Recipe>>;
}
