use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a recipe content section.
///
/// `level` is reserved for nested lists; the parser always emits 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeLine {
    pub text: String,
    #[serde(default)]
    pub level: u32,
}

impl RecipeLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: 0,
        }
    }
}

/// A recipe as parsed from one markdown document.
///
/// Contains no timestamps, so parsing the same text twice yields equal values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDocument {
    pub name: String,
    pub category: String,
    /// Star count from the difficulty line. `None` means unknown, not easiest.
    pub difficulty: Option<u32>,
    pub description: Option<String>,
    #[serde(default)]
    pub materials: Vec<RecipeLine>,
    #[serde(default)]
    pub quantities: Vec<RecipeLine>,
    #[serde(default)]
    pub procedure: Vec<RecipeLine>,
    #[serde(default)]
    pub notes: Vec<RecipeLine>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub all_image_urls: Vec<String>,
    /// Canonical upstream URL, used as the upsert key.
    pub source_url: String,
}

/// A recipe as held by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecipe {
    pub id: i64,
    #[serde(flatten)]
    pub recipe: RecipeDocument,
    pub last_updated: DateTime<Utc>,
}

/// Condensed listing entry, the shape returned by paginated queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub difficulty: Option<u32>,
    pub description: Option<String>,
    pub image_url: String,
}

impl From<&StoredRecipe> for RecipeSummary {
    fn from(stored: &StoredRecipe) -> Self {
        Self {
            id: stored.id,
            name: stored.recipe.name.clone(),
            category: stored.recipe.category.clone(),
            difficulty: stored.recipe.difficulty,
            description: stored.recipe.description.clone(),
            image_url: stored.recipe.image_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecipeDocument {
        RecipeDocument {
            name: "红烧肉".to_string(),
            category: "meat_dish".to_string(),
            difficulty: None,
            description: None,
            materials: vec![RecipeLine::new("猪肉")],
            quantities: vec![],
            procedure: vec![],
            notes: vec![],
            image_url: String::new(),
            all_image_urls: vec![],
            source_url: "https://example.com/dishes/meat_dish/红烧肉.md".to_string(),
        }
    }

    #[test]
    fn test_serializes_camel_case_with_null_difficulty() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json["difficulty"].is_null());
        assert!(json["description"].is_null());
        assert_eq!(json["imageUrl"], "");
        assert!(json["allImageUrls"].as_array().unwrap().is_empty());
        assert!(json["notes"].as_array().unwrap().is_empty());
        assert_eq!(json["materials"][0]["level"], 0);
    }

    #[test]
    fn test_stored_recipe_flattens_document() {
        let stored = StoredRecipe {
            id: 7,
            recipe: sample(),
            last_updated: Utc::now(),
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "红烧肉");
        assert!(json.get("lastUpdated").is_some());

        let back: StoredRecipe = serde_json::from_value(json).unwrap();
        assert_eq!(back.recipe, stored.recipe);
    }

    #[test]
    fn test_missing_level_defaults_to_zero() {
        let line: RecipeLine = serde_json::from_str(r#"{"text":"生姜"}"#).unwrap();
        assert_eq!(line, RecipeLine::new("生姜"));
    }
}
