use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::store::StoreError;

pub const NAME_MAX_LEN: usize = 255;

/// Ingredient record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: i64,
    pub user_id: Uuid, // owner, fixed at creation
    pub name: String,
}

/// Optional narrowing applied on top of the mandatory owner predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngredientFilter {
    /// Only ingredients referenced by at least one recipe.
    pub assigned_only: bool,
}

/// Trimmed, non-blank name of at most [`NAME_MAX_LEN`] characters.
pub fn normalize_name(raw: &str) -> Result<String, StoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(StoreError::Validation("name may not be blank".into()));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(StoreError::Validation(format!(
            "name must be at most {NAME_MAX_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Name descending, id descending on ties.
pub fn sort_for_listing(items: &mut [Ingredient]) {
    items.sort_by(|a, b| b.name.cmp(&a.name).then(b.id.cmp(&a.id)));
}
