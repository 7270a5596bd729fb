mod conventions;
mod images;
mod sections;

pub use conventions::Conventions;
pub use images::extract_images;
pub use sections::extract_section;

use crate::model::{RecipeDocument, RecipeLine};
use log::{debug, warn};
use std::path::{Component, Path};

/// Turns HowToCook markdown documents into [`RecipeDocument`]s.
///
/// Parsing is line-oriented and only understands the headings and markers
/// listed in [`Conventions`]. Anything it does not recognise degrades to an
/// empty or `None` field instead of an error.
#[derive(Debug, Clone, Default)]
pub struct RecipeParser {
    conventions: Conventions,
}

impl RecipeParser {
    pub fn new(conventions: Conventions) -> Self {
        Self { conventions }
    }

    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Parse `text`, located at `relative_path` inside the repository.
    pub fn parse(&self, text: &str, relative_path: &str) -> RecipeDocument {
        let c = &self.conventions;
        let relative_path = relative_path.replace('\\', "/");
        let lines: Vec<&str> = text.lines().collect();

        let all_image_urls = extract_images(text, &relative_path, &c.media_base);
        let image_url = all_image_urls.first().cloned().unwrap_or_default();

        RecipeDocument {
            name: self.title(&lines, &relative_path),
            category: self.category(&relative_path),
            difficulty: self.difficulty(text),
            description: self.description(&lines),
            materials: section_lines(text, &c.materials_heading),
            quantities: section_lines(text, &c.quantities_heading),
            procedure: section_lines(text, &c.procedure_heading),
            notes: section_lines(text, &c.notes_heading),
            image_url,
            all_image_urls,
            source_url: format!("{}{}", c.source_base, relative_path),
        }
    }

    /// Read and parse the document at `path`, a file below the repository `root`.
    ///
    /// Returns `None` when the file cannot be read or is not UTF-8; the
    /// failure is logged and the caller skips the file.
    pub async fn parse_file(&self, root: &Path, path: &Path) -> Option<RecipeDocument> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return None;
            }
        };
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!("{} is not valid UTF-8: {}", path.display(), e);
                return None;
            }
        };

        let relative = relative_path(root, path);
        debug!("Parsing {}", relative);
        Some(self.parse(&text, &relative))
    }

    fn title(&self, lines: &[&str], relative_path: &str) -> String {
        let heading = lines
            .iter()
            .find_map(|line| line.trim().strip_prefix("# "))
            .map(|title| {
                let title = title.trim();
                title
                    .strip_suffix(self.conventions.title_suffix.as_str())
                    .unwrap_or(title)
                    .trim()
                    .to_string()
            })
            .filter(|title| !title.is_empty());

        heading.unwrap_or_else(|| file_stem(relative_path))
    }

    fn category(&self, relative_path: &str) -> String {
        let segments: Vec<&str> = relative_path.split('/').collect();
        segments
            .iter()
            .position(|segment| *segment == self.conventions.root_folder)
            .filter(|idx| idx + 1 < segments.len())
            .map(|idx| segments[idx + 1].to_string())
            .unwrap_or_else(|| self.conventions.uncategorized.clone())
    }

    /// Length of the first non-empty star run after the difficulty label.
    fn difficulty(&self, text: &str) -> Option<u32> {
        let c = &self.conventions;
        text.match_indices(c.difficulty_label.as_str())
            .map(|(idx, label)| {
                text[idx + label.len()..]
                    .chars()
                    .take_while(|ch| *ch == c.difficulty_glyph)
                    .count()
            })
            .find(|stars| *stars > 0)
            .map(|stars| u32::try_from(stars).unwrap_or(u32::MAX))
    }

    fn description(&self, lines: &[&str]) -> Option<String> {
        let c = &self.conventions;
        let start = lines.iter().position(|line| {
            line.contains(c.title_suffix.as_str()) || line.trim().starts_with("# ")
        })? + 1;

        let end = lines[start..]
            .iter()
            .position(|line| {
                line.contains(c.difficulty_label.trim_end_matches('：'))
                    || line.contains(c.materials_heading.as_str())
                    || line.trim().starts_with('#')
            })
            .map_or(lines.len(), |offset| start + offset);

        let paragraphs: Vec<&str> = lines[start..end]
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty() && !images::is_image_line(line))
            .collect();

        (!paragraphs.is_empty()).then(|| paragraphs.join("\n\n"))
    }
}

/// Parse `text` with the default HowToCook conventions.
pub fn parse_document(text: &str, relative_path: &str) -> RecipeDocument {
    RecipeParser::default().parse(text, relative_path)
}

fn section_lines(text: &str, label: &str) -> Vec<RecipeLine> {
    extract_section(text, label)
        .iter()
        .map(|line| RecipeLine::new(strip_bullet(line)))
        .collect()
}

/// Drops a leading `-`, `*` or `+` list marker.
fn strip_bullet(line: &str) -> &str {
    match line.strip_prefix(['-', '*', '+']) {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => line,
    }
}

/// `path` relative to `root`, joined with forward slashes.
pub fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn file_stem(relative_path: &str) -> String {
    let file_name = relative_path.rsplit('/').next().unwrap_or(relative_path);
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PORK: &str = "# 红烧肉的做法

![红烧肉](./红烧肉.jpg)

红烧肉是一道著名的汉族名菜。

肥而不腻，入口即化。

预估烹饪难度：★★★

## 必备原料和工具

- 猪肉
- 生姜

## 计算

- 猪肉 500g

## 操作

- 切块
- 焯水

## 附加内容

如果您遵循本指南的制作流程而发现有问题或可以改进的流程，请提出 Issue 或 Pull request 。
";

    #[test]
    fn test_parses_full_document() {
        let recipe = parse_document(PORK, "dishes/meat_dish/红烧肉/红烧肉.md");

        assert_eq!(recipe.name, "红烧肉");
        assert_eq!(recipe.category, "meat_dish");
        assert_eq!(recipe.difficulty, Some(3));
        assert_eq!(
            recipe.description.as_deref(),
            Some("红烧肉是一道著名的汉族名菜。\n\n肥而不腻，入口即化。")
        );
        assert_eq!(
            recipe.materials,
            vec![RecipeLine::new("猪肉"), RecipeLine::new("生姜")]
        );
        assert_eq!(recipe.quantities, vec![RecipeLine::new("猪肉 500g")]);
        assert_eq!(recipe.procedure.len(), 2);
        assert_eq!(recipe.notes.len(), 1);
        assert_eq!(
            recipe.image_url,
            "https://media.githubusercontent.com/media/Anduin2017/HowToCook/master/dishes/meat_dish/红烧肉/红烧肉.jpg"
        );
        assert_eq!(recipe.all_image_urls, vec![recipe.image_url.clone()]);
        assert_eq!(
            recipe.source_url,
            "https://github.com/Anduin2017/HowToCook/blob/master/dishes/meat_dish/红烧肉/红烧肉.md"
        );
    }

    #[test]
    fn test_title_falls_back_to_file_stem() {
        let recipe = parse_document("没有标题的菜谱", "dishes/vegetable_dish/拍黄瓜.md");
        assert_eq!(recipe.name, "拍黄瓜");
    }

    #[test]
    fn test_level_two_heading_is_not_a_title() {
        let recipe = parse_document("## 操作\n- 炒", "dishes/soup/汤.md");
        assert_eq!(recipe.name, "汤");
    }

    #[test]
    fn test_category_is_segment_after_root() {
        let parser = RecipeParser::default();
        assert_eq!(parser.category("dishes/soup/汤.md"), "soup");
        assert_eq!(parser.category("dishes/汤.md"), "汤.md");
        assert_eq!(parser.category("tips/learn/汤.md"), "其他");
        assert_eq!(parser.category("dishes"), "其他");
    }

    #[test]
    fn test_long_star_run_is_counted_in_full() {
        let stars = "★".repeat(300);
        let recipe = parse_document(&format!("# 满汉全席\n\n预估烹饪难度：{stars}\n"), "dishes/x/y.md");
        assert_eq!(recipe.difficulty, Some(300));
    }

    #[test]
    fn test_difficulty_absent_is_none() {
        let recipe = parse_document("# 白米饭\n\n简单。", "dishes/staple/白米饭.md");
        assert_eq!(recipe.difficulty, None);
    }

    #[test]
    fn test_difficulty_label_without_stars_is_skipped() {
        let parser = RecipeParser::default();
        assert_eq!(parser.difficulty("预估烹饪难度：未知"), None);
        assert_eq!(parser.difficulty("预估烹饪难度：\n预估烹饪难度：★★"), Some(2));
    }

    #[test]
    fn test_description_none_when_section_follows_title() {
        let recipe = parse_document("# 凉拌\n## 必备原料和工具\n- 黄瓜", "dishes/a/b.md");
        assert_eq!(recipe.description, None);
    }

    #[test]
    fn test_description_none_without_start_line() {
        let recipe = parse_document("只有正文\n第二行", "dishes/a/b.md");
        assert_eq!(recipe.description, None);
    }

    #[test]
    fn test_description_skips_image_lines() {
        let text = "# 汤\n![图](./a.jpg)\n清淡可口\n预估烹饪难度：★";
        let recipe = parse_document(text, "dishes/soup/汤.md");
        assert_eq!(recipe.description.as_deref(), Some("清淡可口"));
    }

    #[test]
    fn test_custom_conventions() {
        let parser = RecipeParser::new(Conventions {
            root_folder: "recipes".to_string(),
            materials_heading: "Ingredients".to_string(),
            difficulty_label: "Difficulty: ".to_string(),
            difficulty_glyph: '*',
            source_base: "https://example.com/".to_string(),
            ..Conventions::default()
        });
        let text = "# Pancakes\n\nFluffy.\n\nDifficulty: **\n\n## Ingredients\n- flour\n";
        let recipe = parser.parse(text, "recipes/breakfast/pancakes.md");

        assert_eq!(recipe.category, "breakfast");
        assert_eq!(recipe.difficulty, Some(2));
        assert_eq!(recipe.description.as_deref(), Some("Fluffy."));
        assert_eq!(recipe.materials, vec![RecipeLine::new("flour")]);
        assert_eq!(recipe.source_url, "https://example.com/recipes/breakfast/pancakes.md");
    }

    #[test]
    fn test_strip_bullet() {
        assert_eq!(strip_bullet("- 猪肉"), "猪肉");
        assert_eq!(strip_bullet("*  生姜"), "生姜");
        assert_eq!(strip_bullet("-5 度"), "-5 度");
        assert_eq!(strip_bullet("1. 切块"), "1. 切块");
    }

    #[test]
    fn test_relative_path_uses_forward_slashes() {
        let root = Path::new("/tmp/mirror");
        let path = root.join("dishes").join("soup").join("汤.md");
        assert_eq!(relative_path(root, &path), "dishes/soup/汤.md");
    }
}
