use howtocook_catalog::{parse_document, RecipeLine};

const MEDIA_BASE: &str = "https://media.githubusercontent.com/media/Anduin2017/HowToCook/master/";

const BRAISED_PORK: &str = "# 红烧肉的做法

![成品](./红烧肉.jpg)

红烧肉是家常硬菜，色泽红亮。

预估烹饪难度：★★★

## 必备原料和工具

- 猪肉
- 生姜
- 冰糖

## 计算

每份：

- 五花肉 500g
- 冰糖 15g

## 操作

- 五花肉切块，冷水下锅焯水
- 小火炒糖色
- ![炒糖色](./糖色.jpg)
- 加水炖煮 60 分钟

## 附加内容

如果您遵循本指南的制作流程而发现有问题或可以改进的流程，请提出 Issue 或 Pull request 。
";

#[test]
fn test_title_and_difficulty() {
    let recipe = parse_document("# 红烧肉\n\n预估烹饪难度：★★★\n", "dishes/meat_dish/红烧肉.md");
    assert!(recipe.name.starts_with("红烧肉"));
    assert_eq!(recipe.difficulty, Some(3));
}

#[test]
fn test_materials_section() {
    let recipe = parse_document(
        "# 红烧肉\n## 必备原料和工具\n- 猪肉\n- 生姜\n",
        "dishes/meat_dish/红烧肉.md",
    );
    assert_eq!(
        recipe.materials,
        vec![
            RecipeLine {
                text: "猪肉".to_string(),
                level: 0
            },
            RecipeLine {
                text: "生姜".to_string(),
                level: 0
            },
        ]
    );
}

#[test]
fn test_relative_image_resolves_against_document_directory() {
    let recipe = parse_document("# 红烧肉\n![封面](./cover.jpg)\n", "dishes/meat/pork.md");
    assert_eq!(recipe.image_url, format!("{MEDIA_BASE}dishes/meat/cover.jpg"));
}

#[test]
fn test_no_difficulty_marker_is_none() {
    let recipe = parse_document("# 清炒时蔬\n\n简单快手。\n", "dishes/vegetable_dish/时蔬.md");
    assert_eq!(recipe.difficulty, None);
}

#[test]
fn test_parsing_is_deterministic() {
    let path = "dishes/meat_dish/红烧肉/红烧肉.md";
    let first = parse_document(BRAISED_PORK, path);
    let second = parse_document(BRAISED_PORK, path);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_image_list_matches_references_in_order() {
    let recipe = parse_document(BRAISED_PORK, "dishes/meat_dish/红烧肉/红烧肉.md");
    assert_eq!(
        recipe.all_image_urls,
        vec![
            format!("{MEDIA_BASE}dishes/meat_dish/红烧肉/红烧肉.jpg"),
            format!("{MEDIA_BASE}dishes/meat_dish/红烧肉/糖色.jpg"),
        ]
    );
    assert_eq!(recipe.image_url, recipe.all_image_urls[0]);
}

#[test]
fn test_no_images_gives_empty_image_url() {
    let recipe = parse_document("# 白粥\n\n## 操作\n- 煮\n", "dishes/staple/白粥.md");
    assert!(recipe.all_image_urls.is_empty());
    assert_eq!(recipe.image_url, "");
}

#[test]
fn test_full_document_fields() {
    let recipe = parse_document(BRAISED_PORK, "dishes/meat_dish/红烧肉/红烧肉.md");

    assert_eq!(recipe.name, "红烧肉");
    assert_eq!(recipe.category, "meat_dish");
    assert_eq!(
        recipe.description.as_deref(),
        Some("红烧肉是家常硬菜，色泽红亮。")
    );
    assert_eq!(recipe.materials.len(), 3);
    assert_eq!(
        recipe.quantities,
        vec![
            RecipeLine::new("每份："),
            RecipeLine::new("五花肉 500g"),
            RecipeLine::new("冰糖 15g"),
        ]
    );
    assert_eq!(recipe.procedure.len(), 4);
    assert_eq!(recipe.procedure[0].text, "五花肉切块，冷水下锅焯水");
    assert_eq!(recipe.notes.len(), 1);
    assert!(recipe.notes.iter().all(|line| line.level == 0));
    assert_eq!(
        recipe.source_url,
        "https://github.com/Anduin2017/HowToCook/blob/master/dishes/meat_dish/红烧肉/红烧肉.md"
    );
}

#[test]
fn test_unstructured_document_degrades_gracefully() {
    let recipe = parse_document("随手记：今天吃了面。", "notes.md");

    assert_eq!(recipe.name, "notes");
    assert_eq!(recipe.category, "其他");
    assert_eq!(recipe.difficulty, None);
    assert_eq!(recipe.description, None);
    assert!(recipe.materials.is_empty());
    assert!(recipe.quantities.is_empty());
    assert!(recipe.procedure.is_empty());
    assert!(recipe.notes.is_empty());
    assert_eq!(recipe.image_url, "");

    let json = serde_json::to_value(&recipe).unwrap();
    for field in ["materials", "quantities", "procedure", "notes", "allImageUrls"] {
        assert!(json[field].is_array(), "{field} should serialize as an array");
    }
    assert!(json["difficulty"].is_null());
}
