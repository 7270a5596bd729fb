use serde::Deserialize;

/// Heading labels, markers and URL bases used by the HowToCook corpus.
///
/// Every field can be overridden from the `[conventions]` table of the
/// configuration file; the defaults describe the upstream repository.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Conventions {
    /// Folder holding every recipe; the segment after it is the category.
    #[serde(default = "default_root_folder")]
    pub root_folder: String,
    /// Category used when a document sits outside a category folder.
    #[serde(default = "default_uncategorized")]
    pub uncategorized: String,
    /// Trailing phrase removed from titles, also opens the description.
    #[serde(default = "default_title_suffix")]
    pub title_suffix: String,
    /// Label preceding the star run, e.g. `预估烹饪难度：★★`.
    #[serde(default = "default_difficulty_label")]
    pub difficulty_label: String,
    #[serde(default = "default_difficulty_glyph")]
    pub difficulty_glyph: char,
    #[serde(default = "default_materials_heading")]
    pub materials_heading: String,
    #[serde(default = "default_quantities_heading")]
    pub quantities_heading: String,
    #[serde(default = "default_procedure_heading")]
    pub procedure_heading: String,
    #[serde(default = "default_notes_heading")]
    pub notes_heading: String,
    /// Prefix of `sourceUrl`, followed by the repository-relative path.
    #[serde(default = "default_source_base")]
    pub source_base: String,
    /// Prefix of every resolved relative image path.
    #[serde(default = "default_media_base")]
    pub media_base: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            root_folder: default_root_folder(),
            uncategorized: default_uncategorized(),
            title_suffix: default_title_suffix(),
            difficulty_label: default_difficulty_label(),
            difficulty_glyph: default_difficulty_glyph(),
            materials_heading: default_materials_heading(),
            quantities_heading: default_quantities_heading(),
            procedure_heading: default_procedure_heading(),
            notes_heading: default_notes_heading(),
            source_base: default_source_base(),
            media_base: default_media_base(),
        }
    }
}

fn default_root_folder() -> String {
    "dishes".to_string()
}

fn default_uncategorized() -> String {
    "其他".to_string()
}

fn default_title_suffix() -> String {
    "的做法".to_string()
}

fn default_difficulty_label() -> String {
    "预估烹饪难度：".to_string()
}

fn default_difficulty_glyph() -> char {
    '★'
}

fn default_materials_heading() -> String {
    "必备原料和工具".to_string()
}

fn default_quantities_heading() -> String {
    "计算".to_string()
}

fn default_procedure_heading() -> String {
    "操作".to_string()
}

fn default_notes_heading() -> String {
    "附加内容".to_string()
}

fn default_source_base() -> String {
    "https://github.com/Anduin2017/HowToCook/blob/master/".to_string()
}

fn default_media_base() -> String {
    "https://media.githubusercontent.com/media/Anduin2017/HowToCook/master/".to_string()
}
