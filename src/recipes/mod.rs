//! Recipes are only reachable through the store; they own the ingredient
//! references that `assigned_only` looks at.

pub mod repo_types;
