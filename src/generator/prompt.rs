use serde::{Deserialize, Serialize};

/// The prompt used for generating recipes from user selections.
///
/// It asks the model for markdown in the same layout as the upstream recipe
/// repository so the regular parser can read the answer. The template is
/// loaded from `prompt.txt` at compile time using `include_str!`.
pub const RECIPE_PROMPT_TEMPLATE: &str = include_str!("prompt.txt");

/// Ingredients, cookware and matching mode chosen by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selections {
    #[serde(default)]
    pub vegetables: Vec<String>,
    #[serde(default)]
    pub meats: Vec<String>,
    #[serde(default)]
    pub staples: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub mode: Vec<String>,
}

fn join_or(items: &[String], fallback: &str) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

/// Fill the template with `selections`; empty lists get neutral defaults.
pub fn build_recipe_prompt(selections: &Selections) -> String {
    RECIPE_PROMPT_TEMPLATE
        .replace("{vegetables}", &join_or(&selections.vegetables, "无"))
        .replace("{meats}", &join_or(&selections.meats, "无"))
        .replace("{staples}", &join_or(&selections.staples, "无"))
        .replace("{equipment}", &join_or(&selections.equipment, "基本厨具"))
        .replace("{mode}", &join_or(&selections.mode, "模糊匹配"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_embedded() {
        assert!(!RECIPE_PROMPT_TEMPLATE.is_empty());
        assert!(RECIPE_PROMPT_TEMPLATE.contains("## 必备原料和工具"));
        assert!(RECIPE_PROMPT_TEMPLATE.contains("预估烹饪难度"));
        assert!(RECIPE_PROMPT_TEMPLATE.contains("{vegetables}"));
    }

    #[test]
    fn test_build_prompt_fills_selections() {
        let selections = Selections {
            vegetables: vec!["土豆".to_string(), "青椒".to_string()],
            meats: vec!["牛肉".to_string()],
            mode: vec!["严格匹配".to_string()],
            ..Default::default()
        };
        let prompt = build_recipe_prompt(&selections);
        assert!(prompt.contains("蔬菜：土豆, 青椒"));
        assert!(prompt.contains("肉类：牛肉"));
        assert!(prompt.contains("主食：无"));
        assert!(prompt.contains("厨具：基本厨具"));
        assert!(prompt.contains("模式：严格匹配"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_blank_entries_fall_back() {
        let selections = Selections {
            equipment: vec!["  ".to_string()],
            ..Default::default()
        };
        assert!(build_recipe_prompt(&selections).contains("厨具：基本厨具"));
    }
}
