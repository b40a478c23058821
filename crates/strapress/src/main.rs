use crate::prelude::{eprintln, *};
use clap::Parser;
use strapress::{ContentManager, StrapiClient, StrapiConfig};

mod health;
mod post;
mod posts;
mod prelude;
mod taxonomy;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Query the Strapi backend that powers the blog"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Strapi base URL (defaults to http://localhost:1337)
    #[clap(long, env = "STRAPI_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Strapi API token; requests are unauthenticated without one
    #[clap(long, env = "STRAPI_API_TOKEN", global = true, hide_env_values = true)]
    api_token: Option<String>,

    /// Whether to display additional information.
    #[clap(long, env = "STRAPRESS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

impl Global {
    /// Environment configuration with the CLI flags applied on top
    pub fn config(&self) -> StrapiConfig {
        StrapiConfig::from_env().with_overrides(self.base_url.clone(), self.api_token.clone())
    }

    pub fn content_manager(&self) -> Result<ContentManager> {
        let config = self.config();
        if self.verbose {
            eprintln!("Strapi base URL: {}", config.base_url);
        }
        let client = StrapiClient::new(&config)?;
        Ok(ContentManager::new(client))
    }
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Published posts for the home page, newest first
    Posts(posts::HomeOptions),

    /// Read a single post by slug
    Post(post::ReadOptions),

    /// Posts in a category
    Category(posts::CategoryOptions),

    /// Posts related to a given post
    Related(posts::RelatedOptions),

    /// Search posts by title or description
    Search(posts::SearchOptions),

    /// Featured posts
    Featured(posts::FeaturedOptions),

    /// Most recent posts
    Recent(posts::RecentOptions),

    /// List categories
    Categories(taxonomy::TaxonomyOptions),

    /// List authors
    Authors(taxonomy::TaxonomyOptions),

    /// List tags
    Tags(taxonomy::TaxonomyOptions),

    /// Check that the Strapi backend is reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();
    let global = app.global;

    match app.command {
        SubCommands::Posts(options) => posts::home_handler(options, global).await,
        SubCommands::Post(options) => post::handler(options, global).await,
        SubCommands::Category(options) => posts::category_handler(options, global).await,
        SubCommands::Related(options) => posts::related_handler(options, global).await,
        SubCommands::Search(options) => posts::search_handler(options, global).await,
        SubCommands::Featured(options) => posts::featured_handler(options, global).await,
        SubCommands::Recent(options) => posts::recent_handler(options, global).await,
        SubCommands::Categories(options) => taxonomy::categories_handler(options, global).await,
        SubCommands::Authors(options) => taxonomy::authors_handler(options, global).await,
        SubCommands::Tags(options) => taxonomy::tags_handler(options, global).await,
        SubCommands::Health => health::handler(global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
