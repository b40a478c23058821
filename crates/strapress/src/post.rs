use crate::posts::warn_if_degraded;
use crate::prelude::{println, *};
use colored::Colorize;
use serde::Serialize;
use strapress_core::display::PostView;
use strapress_core::requests::DEFAULT_RELATED_LIMIT;
use strapress_core::types::Post;

#[derive(Debug, clap::Args, Clone)]
pub struct ReadOptions {
    /// Post slug
    pub slug: String,

    /// Also list related posts
    #[arg(long)]
    pub related: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct PostWithRelated {
    post: PostView,
    related: Vec<Post>,
}

/// Handle the post command
pub async fn handler(options: ReadOptions, global: crate::Global) -> Result<()> {
    let content = global.content_manager()?;

    let post = match content.post_by_slug(&options.slug).await {
        Ok(post) => post,
        Err(Error::NotFound(slug)) => return Err(eyre!("No post found with slug '{}'", slug)),
        Err(err) => return Err(err).wrap_err_with(|| f!("Failed to load post '{}'", options.slug)),
    };

    let related = if options.related {
        let outcome = content.related_posts(post.id, DEFAULT_RELATED_LIMIT).await;
        Some(warn_if_degraded(outcome, "related posts"))
    } else {
        None
    };

    let view = content.format_post_for_display(post);

    if options.json {
        let json = match related {
            Some(related) => serde_json::to_string_pretty(&PostWithRelated {
                post: view,
                related,
            })?,
            None => serde_json::to_string_pretty(&view)?,
        };
        println!("{}", json);
        return Ok(());
    }

    print_post(&view);

    if let Some(related) = related {
        println!("\n{}", "Related posts:".bright_cyan().bold());
        if related.is_empty() {
            println!("  {}", "None".bright_black());
        }
        for post in &related {
            println!("  {} {}", "-".yellow(), post_link(post));
        }
    }

    println!();
    Ok(())
}

fn post_link(post: &Post) -> String {
    f!("{} ({})", post.title, f!("strapress post {}", post.slug).cyan())
}

fn print_post(view: &PostView) {
    println!("\n{}\n", view.post.title.white().bold());
    post_table(view).printstd();

    if !view.post.description.is_empty() {
        println!("\n{}", view.post.description.bright_black());
    }

    if !view.post.content.is_empty() {
        println!("\n{}", view.post.content);
    }
}

fn post_table(view: &PostView) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(prettytable::row!["Slug", view.post.slug]);
    table.add_row(prettytable::row!["Date", view.formatted_date]);
    table.add_row(prettytable::row!["Author", view.author_name]);
    table.add_row(prettytable::row![
        "Reading time",
        f!("{} min", view.reading_minutes)
    ]);

    if !view.category_names.is_empty() {
        table.add_row(prettytable::row!["Categories", view.category_names.join(", ")]);
    }

    if !view.tag_names.is_empty() {
        table.add_row(prettytable::row!["Tags", view.tag_names.join(", ")]);
    }

    if !view.hero_image_url.is_empty() {
        table.add_row(prettytable::row!["Hero image", view.hero_image_url]);
    }

    if view.post.featured {
        table.add_row(prettytable::row!["Featured", "yes"]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use strapress_core::display::format_post_for_display;
    use strapress_core::types::{Category, Image};

    fn create_test_view() -> PostView {
        let post = Post {
            id: 4,
            title: "Deploying Astro".to_string(),
            slug: "deploying-astro".to_string(),
            content: "deploy it".to_string(),
            published_date: "2024-02-03".to_string(),
            hero_image: Some(Image {
                url: Some("/uploads/hero.png".to_string()),
                ..Default::default()
            }),
            categories: vec![Category {
                id: 1,
                name: "DevOps".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        format_post_for_display("http://cms.local", post)
    }

    fn table_text(view: &PostView) -> String {
        post_table(view).to_string()
    }

    #[test]
    fn test_post_table_rows() {
        let text = table_text(&create_test_view());

        assert!(text.contains("deploying-astro"));
        assert!(text.contains("3 de fevereiro de 2024"));
        assert!(text.contains("Autor desconhecido"));
        assert!(text.contains("1 min"));
        assert!(text.contains("DevOps"));
        assert!(text.contains("http://cms.local/uploads/hero.png"));
        assert!(!text.contains("Tags"));
        assert!(!text.contains("Featured"));
    }

    #[test]
    fn test_related_json_shape() {
        let payload = PostWithRelated {
            post: create_test_view(),
            related: vec![Post {
                id: 5,
                slug: "next".to_string(),
                ..Default::default()
            }],
        };
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["post"]["slug"], "deploying-astro");
        assert_eq!(json["post"]["heroImageUrl"], "http://cms.local/uploads/hero.png");
        assert_eq!(json["related"][0]["slug"], "next");
    }

    #[test]
    fn test_post_link() {
        let post = Post {
            title: "Next".to_string(),
            slug: "next".to_string(),
            ..Default::default()
        };
        let link = post_link(&post);
        assert!(link.contains("Next"));
        assert!(link.contains("strapress post next"));
    }
}
