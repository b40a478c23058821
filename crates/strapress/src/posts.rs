use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use strapress_core::display::{format_date, post_reading_time};
use strapress_core::requests::{
    Outcome, PostPage, DEFAULT_FEATURED_LIMIT, DEFAULT_PAGE_SIZE, DEFAULT_RECENT_LIMIT,
    DEFAULT_RELATED_LIMIT,
};
use strapress_core::types::Post;

#[derive(Debug, clap::Args, Clone)]
pub struct HomeOptions {
    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Number of posts per page
    #[arg(short = 's', long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct CategoryOptions {
    /// Category ID
    #[arg(value_name = "ID")]
    pub category_id: u64,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct SearchOptions {
    /// Text to look for in titles and descriptions (case-insensitive)
    pub query: String,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Number of posts per page
    #[arg(short = 's', long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct RelatedOptions {
    /// ID of the post to find related posts for
    #[arg(value_name = "POST_ID")]
    pub post_id: u64,

    /// Maximum number of posts
    #[arg(short, long, default_value_t = DEFAULT_RELATED_LIMIT)]
    pub limit: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct FeaturedOptions {
    /// Maximum number of posts
    #[arg(short, long, default_value_t = DEFAULT_FEATURED_LIMIT)]
    pub limit: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct RecentOptions {
    /// Maximum number of posts
    #[arg(short, long, default_value_t = DEFAULT_RECENT_LIMIT)]
    pub limit: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn home_handler(options: HomeOptions, global: crate::Global) -> Result<()> {
    let content = global.content_manager()?;
    let page = content
        .posts_for_home(options.page, options.page_size)
        .await?;

    let command = f!("strapress posts --page-size {}", options.page_size);
    output_page(&page, "LATEST POSTS", &command, options.json)
}

pub async fn category_handler(options: CategoryOptions, global: crate::Global) -> Result<()> {
    let content = global.content_manager()?;
    let page = content
        .posts_by_category(options.category_id, options.page)
        .await?;

    let title = f!("CATEGORY {}", options.category_id);
    let command = f!("strapress category {}", options.category_id);
    output_page(&page, &title, &command, options.json)
}

pub async fn search_handler(options: SearchOptions, global: crate::Global) -> Result<()> {
    let content = global.content_manager()?;
    let page = content
        .search_posts(&options.query, options.page, options.page_size)
        .await?;

    let title = f!("SEARCH \"{}\"", options.query);
    let command = f!(
        "strapress search '{}' --page-size {}",
        options.query,
        options.page_size
    );
    output_page(&page, &title, &command, options.json)
}

pub async fn related_handler(options: RelatedOptions, global: crate::Global) -> Result<()> {
    let content = global.content_manager()?;
    let outcome = content.related_posts(options.post_id, options.limit).await;

    let title = f!("RELATED TO POST {}", options.post_id);
    output_list(outcome, &title, options.json)
}

pub async fn featured_handler(options: FeaturedOptions, global: crate::Global) -> Result<()> {
    let content = global.content_manager()?;
    let outcome = content.featured_posts(options.limit).await;
    output_list(outcome, "FEATURED POSTS", options.json)
}

pub async fn recent_handler(options: RecentOptions, global: crate::Global) -> Result<()> {
    let content = global.content_manager()?;
    let outcome = content.recent_posts(options.limit).await;
    output_list(outcome, "RECENT POSTS", options.json)
}

/// Print a warning for a degraded outcome and return its (possibly empty) value
pub fn warn_if_degraded<T: Default>(outcome: Outcome<T>, what: &str) -> T {
    if let Some(cause) = outcome.cause() {
        eprintln!(
            "{} {} unavailable: {}",
            "Warning:".yellow().bold(),
            what,
            cause
        );
    }
    outcome.into_value()
}

fn output_page(page: &PostPage, title: &str, command: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", format_page_json(page)?);
    } else {
        println!("{}", format_page_text(page, title, command));
    }
    Ok(())
}

fn output_list(outcome: Outcome<Vec<Post>>, title: &str, json: bool) -> Result<()> {
    let posts = warn_if_degraded(outcome, "posts");

    if json {
        let json = serde_json::to_string_pretty(&posts)
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json);
    } else {
        println!("{}", format_posts_text(&posts, title));
    }
    Ok(())
}

/// Convert a page of posts to JSON string
fn format_page_json(page: &PostPage) -> Result<String> {
    serde_json::to_string_pretty(page).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn format_post_entry(index: usize, post: &Post) -> String {
    let mut result = String::new();

    let title = if post.title.is_empty() {
        "(No title)"
    } else {
        post.title.as_str()
    };

    result.push_str(&f!(
        "\n{} {}\n",
        f!("[{index}]").yellow().bold(),
        title.white().bold()
    ));

    if !post.description.is_empty() {
        result.push_str(&f!("    {}\n", post.description.bright_black()));
    }

    let author = post
        .author
        .as_ref()
        .map(|a| a.name.as_str())
        .unwrap_or("unknown");

    result.push_str(&f!(
        "    {}: {} | {}: {} | {}: {} min\n",
        "By".green(),
        author.bright_white(),
        "Date".green(),
        format_date(&post.published_date).bright_black(),
        "Reading".green(),
        post_reading_time(post).to_string().bright_yellow()
    ));

    result.push_str(&f!(
        "    {}: {} | {}: {}\n",
        "ID".green(),
        post.id.to_string().bright_white(),
        "Read".green(),
        f!("strapress post {}", post.slug).cyan()
    ));

    result
}

/// Convert a list of posts to formatted text with colors
fn format_posts_text(posts: &[Post], title: &str) -> String {
    let mut result = String::new();

    result.push_str(&f!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&f!("{}\n", title.bright_cyan().bold()));
    result.push_str(&f!("{}\n", "=".repeat(80).bright_cyan()));

    if posts.is_empty() {
        result.push_str(&f!("\n{}\n", "No posts found.".yellow()));
    }

    for (idx, post) in posts.iter().enumerate() {
        result.push_str(&format_post_entry(idx + 1, post));
    }

    result
}

/// Convert a page of posts to formatted text with navigation hints
fn format_page_text(page: &PostPage, title: &str, command: &str) -> String {
    let info = &page.pagination;
    let header = f!("{} (Page {} of {})", title, info.page, info.total_pages);
    let mut result = format_posts_text(&page.posts, &header);

    result.push_str(&f!("\n{}\n", "=".repeat(80).bright_yellow()));
    result.push_str(&f!("{}\n", "NAVIGATION".bright_yellow().bold()));
    result.push_str(&f!("{}\n", "=".repeat(80).bright_yellow()));

    result.push_str(&f!(
        "\n{} {} {} {} ({} {})\n",
        "Showing page".bright_white(),
        info.page.to_string().bright_cyan().bold(),
        "of".bright_white(),
        info.total_pages.to_string().bright_cyan().bold(),
        info.total_posts.to_string().bright_cyan().bold(),
        "total posts".bright_white()
    ));

    if info.page < info.total_pages {
        result.push_str(&f!(
            "  {}: {}\n",
            "Next page".green(),
            f!("{} --page {}", command, info.page + 1).cyan()
        ));
    }
    if info.page > 1 {
        result.push_str(&f!(
            "  {}: {}\n",
            "Previous page".green(),
            f!("{} --page {}", command, info.page - 1).cyan()
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use strapress_core::requests::PageInfo;
    use strapress_core::types::Author;

    fn create_test_post(id: u64, title: &str) -> Post {
        Post {
            id,
            title: title.to_string(),
            slug: f!("post-{id}"),
            description: "A short summary".to_string(),
            content: "one two three".to_string(),
            published_date: "2024-01-15T10:00:00.000Z".to_string(),
            author: Some(Author {
                id: 1,
                name: "Gabriel".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn create_test_page(posts: Vec<Post>, page: u32, total_pages: u32) -> PostPage {
        PostPage {
            pagination: PageInfo {
                page,
                total_pages,
                total_posts: posts.len() as u64,
            },
            posts,
        }
    }

    #[test]
    fn test_format_page_json_structure() {
        let page = create_test_page(vec![create_test_post(1, "Hello")], 1, 1);

        let json = format_page_json(&page).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["posts"][0]["title"], "Hello");
        assert_eq!(parsed["posts"][0]["publishedDate"], "2024-01-15T10:00:00.000Z");
        assert_eq!(parsed["pagination"]["totalPages"], 1);
        assert_eq!(parsed["pagination"]["totalPosts"], 1);
    }

    #[test]
    fn test_format_posts_text_basic() {
        let formatted = format_posts_text(&[create_test_post(7, "Astro e Strapi")], "LATEST");

        assert!(formatted.contains("LATEST"));
        assert!(formatted.contains("Astro e Strapi"));
        assert!(formatted.contains("Gabriel"));
        assert!(formatted.contains("15 de janeiro de 2024"));
        assert!(formatted.contains("strapress post post-7"));
    }

    #[test]
    fn test_format_posts_text_empty() {
        let formatted = format_posts_text(&[], "FEATURED POSTS");
        assert!(formatted.contains("No posts found."));
    }

    #[test]
    fn test_format_posts_text_missing_fields() {
        let post = Post {
            id: 3,
            ..Default::default()
        };
        let formatted = format_posts_text(&[post], "RECENT");
        assert!(formatted.contains("(No title)"));
        assert!(formatted.contains("unknown"));
    }

    #[test]
    fn test_format_page_text_navigation() {
        let page = create_test_page(vec![create_test_post(1, "Middle")], 2, 3);
        let formatted = format_page_text(&page, "LATEST POSTS", "strapress posts");

        assert!(formatted.contains("Page 2 of 3"));
        assert!(formatted.contains("strapress posts --page 3"));
        assert!(formatted.contains("strapress posts --page 1"));
    }

    #[test]
    fn test_format_page_text_single_page_has_no_links() {
        let page = create_test_page(vec![], 1, 1);
        let formatted = format_page_text(&page, "SEARCH", "strapress search 'x'");

        assert!(!formatted.contains("Next page"));
        assert!(!formatted.contains("Previous page"));
    }

    #[test]
    fn test_warn_if_degraded_returns_empty() {
        let posts: Vec<Post> = warn_if_degraded(Outcome::Degraded("down".to_string()), "posts");
        assert!(posts.is_empty());

        let posts = warn_if_degraded(Outcome::Ok(vec![create_test_post(1, "x")]), "posts");
        assert_eq!(posts.len(), 1);
    }
}
