use serde::{Deserialize, Serialize};

use super::repo_types::{Ingredient, IngredientFilter};
use crate::error::ApiError;

/// Wire representation of an ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientResponse {
    pub id: i64,
    pub name: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(i: Ingredient) -> Self {
        Self { id: i.id, name: i.name }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateIngredientRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListIngredientsQuery {
    #[serde(default)]
    pub assigned_only: Option<String>,
}

impl ListIngredientsQuery {
    pub fn filter(&self) -> Result<IngredientFilter, ApiError> {
        let assigned_only = match self.assigned_only.as_deref() {
            None => false,
            Some(raw) => parse_flag(raw).ok_or_else(|| {
                ApiError::BadRequest(format!("assigned_only: invalid flag {raw:?}"))
            })?,
        };
        Ok(IngredientFilter { assigned_only })
    }
}

/// Integers (non-zero is true), `true`/`false`, or empty for false.
fn parse_flag(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(false);
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n != 0);
    }
    match raw.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(v: Option<&str>) -> ListIngredientsQuery {
        ListIngredientsQuery {
            assigned_only: v.map(str::to_string),
        }
    }

    #[test]
    fn assigned_only_flag_values() {
        assert!(!query(None).filter().unwrap().assigned_only);
        assert!(!query(Some("")).filter().unwrap().assigned_only);
        assert!(!query(Some("0")).filter().unwrap().assigned_only);
        assert!(query(Some("1")).filter().unwrap().assigned_only);
        assert!(query(Some("2")).filter().unwrap().assigned_only);
        assert!(query(Some("TRUE")).filter().unwrap().assigned_only);
        assert!(!query(Some("false")).filter().unwrap().assigned_only);
    }

    #[test]
    fn assigned_only_rejects_garbage() {
        assert!(matches!(
            query(Some("yes please")).filter(),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn response_exposes_only_id_and_name() {
        let ingredient = Ingredient {
            id: 7,
            user_id: uuid::Uuid::new_v4(),
            name: "Salt".into(),
        };
        let json = serde_json::to_value(IngredientResponse::from(ingredient)).unwrap();
        assert_eq!(json, serde_json::json!({"id": 7, "name": "Salt"}));
    }
}
