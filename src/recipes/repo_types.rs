use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::StoreError;

pub const TITLE_MAX_LEN: usize = 255;

/// Exclusive upper bound of a `NUMERIC(8, 2)` price.
pub fn price_limit() -> Decimal {
    Decimal::new(1_000_000, 0)
}

/// Recipe record with the set of ingredient ids it references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub ingredients: BTreeSet<i64>,
}

/// Row shape of the `recipes` table, without the join.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRow {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
}

impl RecipeRow {
    pub fn with_ingredients(self, ingredients: BTreeSet<i64>) -> Recipe {
        Recipe {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            time_minutes: self.time_minutes,
            price: self.price,
            ingredients,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    #[serde(default)]
    pub ingredients: BTreeSet<i64>,
}

impl NewRecipe {
    pub fn validate(&self) -> Result<(), StoreError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(StoreError::Validation("title may not be blank".into()));
        }
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(StoreError::Validation(format!(
                "title must be at most {TITLE_MAX_LEN} characters"
            )));
        }
        if self.time_minutes <= 0 {
            return Err(StoreError::Validation("time_minutes must be positive".into()));
        }
        if self.price < Decimal::ZERO {
            return Err(StoreError::Validation("price may not be negative".into()));
        }
        // stored rounded to cents
        let limit = price_limit();
        if self.price.round_dp(2) >= limit {
            return Err(StoreError::Validation(format!("price must be below {limit}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(title: &str, minutes: i32, price: Decimal) -> NewRecipe {
        NewRecipe {
            title: title.into(),
            time_minutes: minutes,
            price,
            ingredients: BTreeSet::new(),
        }
    }

    #[test]
    fn validate_accepts_free_recipe() {
        assert!(recipe("Toast", 5, Decimal::ZERO).validate().is_ok());
        assert!(recipe("Stew", 90, Decimal::new(1250, 2)).validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_fields() {
        assert!(recipe(" ", 5, Decimal::ONE).validate().is_err());
        assert!(recipe("Toast", 0, Decimal::ONE).validate().is_err());
        assert!(recipe("Toast", 5, Decimal::new(-1, 2)).validate().is_err());
    }

    #[test]
    fn validate_enforces_column_limits() {
        let long_title = "t".repeat(TITLE_MAX_LEN + 1);
        assert!(matches!(
            recipe(&long_title, 5, Decimal::ONE).validate(),
            Err(StoreError::Validation(_))
        ));
        assert!(recipe(&"t".repeat(TITLE_MAX_LEN), 5, Decimal::ONE).validate().is_ok());

        assert!(matches!(
            recipe("Caviar", 5, Decimal::new(1_000_000, 0)).validate(),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            recipe("Caviar", 5, Decimal::new(999_999_995, 3)).validate(),
            Err(StoreError::Validation(_))
        ));
        assert!(recipe("Caviar", 5, Decimal::new(99_999_999, 2)).validate().is_ok());
    }

    #[test]
    fn price_deserializes_from_string() {
        let r: NewRecipe =
            serde_json::from_str(r#"{"title":"Soup","time_minutes":10,"price":"4.50","ingredients":[2,1,2]}"#)
                .unwrap();
        assert_eq!(r.price, Decimal::new(450, 2));
        assert_eq!(r.ingredients.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }
}
