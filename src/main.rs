use clap::{Parser, Subcommand};
use howtocook_catalog::parser::relative_path;
use howtocook_catalog::{
    generate_with_config, load_config, open_store, sync_recipes, Error, RecipeParser,
    RecipeQuery, Selections,
};
use log::debug;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "howtocook", version, about = "HowToCook recipe catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clone or update the recipe repository and upsert every recipe
    Sync {
        /// Use the existing checkout without running git
        #[arg(long)]
        offline: bool,
    },
    /// Parse one markdown file and print the structured recipe
    Parse {
        file: PathBuf,
        /// Path of the file inside the repository (defaults to the path
        /// relative to the configured mirror directory)
        #[arg(long)]
        path: Option<String>,
    },
    /// List stored recipes sorted by name
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Search stored recipes by name and category
    Search {
        query: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one stored recipe
    Show { id: i64 },
    /// List distinct categories
    Categories,
    /// Generate a recipe from selected ingredients with the configured model
    Generate {
        #[arg(long = "vegetable")]
        vegetables: Vec<String>,
        #[arg(long = "meat")]
        meats: Vec<String>,
        #[arg(long = "staple")]
        staples: Vec<String>,
        #[arg(long)]
        equipment: Vec<String>,
        #[arg(long)]
        mode: Vec<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = load_config()?;
    debug!("{:#?}", config);

    match cli.command {
        Command::Sync { offline } => {
            config.sync.offline |= offline;
            let store = open_store(&config)?;
            let report = sync_recipes(&config, store).await?;
            print_json(&report)?;
        }
        Command::Parse { file, path } => {
            let text = tokio::fs::read_to_string(&file).await?;
            let path = path.unwrap_or_else(|| relative_path(&config.sync.mirror_dir, &file));
            let recipe = RecipeParser::new(config.conventions.clone()).parse(&text, &path);
            print_json(&recipe)?;
        }
        Command::List { page, limit } => {
            let store = open_store(&config)?;
            let page = store
                .list(&RecipeQuery::new(None, None, page, limit))
                .await?;
            print_json(&page)?;
        }
        Command::Search {
            query,
            category,
            page,
            limit,
        } => {
            let store = open_store(&config)?;
            let page = store
                .list(&RecipeQuery::new(query, category, page, limit))
                .await?;
            print_json(&page)?;
        }
        Command::Show { id } => {
            let store = open_store(&config)?;
            let recipe = store
                .find_by_id(id)
                .await?
                .ok_or_else(|| Error::NotFound(id.to_string()))?;
            print_json(&recipe)?;
        }
        Command::Categories => {
            let store = open_store(&config)?;
            print_json(&store.categories().await?)?;
        }
        Command::Generate {
            vegetables,
            meats,
            staples,
            equipment,
            mode,
        } => {
            let selections = Selections {
                vegetables,
                meats,
                staples,
                equipment,
                mode,
            };
            let recipe = generate_with_config(&config, &selections).await?;
            print_json(&recipe)?;
        }
    }

    Ok(())
}
