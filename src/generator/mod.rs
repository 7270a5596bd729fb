mod gemini;
mod prompt;

pub use gemini::GeminiGenerator;
pub use prompt::{build_recipe_prompt, Selections, RECIPE_PROMPT_TEMPLATE};

use crate::error::GenerateError;
use crate::model::RecipeDocument;
use crate::parser::RecipeParser;
use async_trait::async_trait;
use log::info;

/// Category assigned to every generated recipe.
pub const GENERATED_CATEGORY: &str = "AI生成";
/// Generated recipes have no upstream document.
pub const GENERATED_SOURCE_URL: &str = "#";
/// Name used when the model omits the title heading.
pub const GENERATED_FALLBACK_NAME: &str = "AI生成菜谱";

/// A text model that answers a prompt with markdown.
#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    /// Get the provider name (e.g., "google")
    fn provider_name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Ask `generator` for a recipe using `selections` and parse the answer.
///
/// The markdown goes through the same parser as repository documents. The
/// result is not persisted and carries no images.
pub async fn generate_recipe(
    generator: &dyn RecipeGenerator,
    parser: &RecipeParser,
    selections: &Selections,
) -> Result<RecipeDocument, GenerateError> {
    info!(
        "Generating recipe with {} for {:?}",
        generator.provider_name(),
        selections
    );
    let markdown = generator.generate(&build_recipe_prompt(selections)).await?;
    info!("Recipe generated successfully");
    Ok(recipe_from_markdown(parser, &markdown))
}

fn recipe_from_markdown(parser: &RecipeParser, markdown: &str) -> RecipeDocument {
    let fallback_path = format!("{GENERATED_FALLBACK_NAME}.md");
    let mut recipe = parser.parse(markdown, &fallback_path);
    recipe.category = GENERATED_CATEGORY.to_string();
    recipe.source_url = GENERATED_SOURCE_URL.to_string();
    recipe.image_url.clear();
    recipe.all_image_urls.clear();
    recipe
}
