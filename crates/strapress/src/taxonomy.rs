use crate::posts::warn_if_degraded;
use crate::prelude::{println, *};
use serde::Serialize;
use strapress::StrapiClient;
use strapress_core::types::{Author, Category, ImageSize, Tag};

#[derive(Debug, clap::Args, Clone)]
pub struct TaxonomyOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_table(table: prettytable::Table, count: usize, what: &str) {
    println!("Found {} {}:\n", count, what);
    if count > 0 {
        table.printstd();
    }
}

pub async fn categories_handler(options: TaxonomyOptions, global: crate::Global) -> Result<()> {
    let content = global.content_manager()?;
    let categories = warn_if_degraded(content.categories().await, "categories");

    if options.json {
        return print_json(&categories);
    }

    print_table(categories_table(&categories), categories.len(), "category(ies)");
    Ok(())
}

pub async fn authors_handler(options: TaxonomyOptions, global: crate::Global) -> Result<()> {
    let content = global.content_manager()?;
    let authors = warn_if_degraded(content.authors().await, "authors");

    if options.json {
        return print_json(&authors);
    }

    let table = authors_table(content.client(), &authors);
    print_table(table, authors.len(), "author(s)");
    Ok(())
}

pub async fn tags_handler(options: TaxonomyOptions, global: crate::Global) -> Result<()> {
    let content = global.content_manager()?;
    let tags = warn_if_degraded(content.tags().await, "tags");

    if options.json {
        return print_json(&tags);
    }

    print_table(tags_table(&tags), tags.len(), "tag(s)");
    Ok(())
}

fn categories_table(categories: &[Category]) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(prettytable::row!["ID", "Name", "Slug", "Description"]);

    for category in categories {
        table.add_row(prettytable::row![
            category.id,
            category.name,
            category.slug,
            category.description.as_deref().unwrap_or("")
        ]);
    }

    table
}

fn authors_table(client: &StrapiClient, authors: &[Author]) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(prettytable::row!["ID", "Name", "Email", "Avatar"]);

    for author in authors {
        let avatar = client.optimized_image_url(author.avatar.as_ref(), ImageSize::Thumbnail);
        table.add_row(prettytable::row![author.id, author.name, author.email, avatar]);
    }

    table
}

fn tags_table(tags: &[Tag]) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(prettytable::row!["ID", "Name", "Slug"]);

    for tag in tags {
        table.add_row(prettytable::row![tag.id, tag.name, tag.slug]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use strapress::StrapiConfig;
    use strapress_core::types::{Image, ImageFormat, ImageFormats};

    fn create_test_client() -> StrapiClient {
        let config = StrapiConfig {
            base_url: "http://cms.local".to_string(),
            ..Default::default()
        };
        StrapiClient::new(&config).unwrap()
    }

    #[test]
    fn test_categories_table() {
        let categories = vec![
            Category {
                id: 1,
                name: "Tech".to_string(),
                slug: "tech".to_string(),
                description: Some("Software".to_string()),
                ..Default::default()
            },
            Category {
                id: 2,
                name: "Life".to_string(),
                slug: "life".to_string(),
                ..Default::default()
            },
        ];

        let text = categories_table(&categories).to_string();
        assert!(text.contains("Description"));
        assert!(text.contains("Software"));
        assert!(text.contains("life"));
        assert_eq!(categories_table(&categories).len(), 3);
    }

    #[test]
    fn test_authors_table_resolves_avatar_thumbnail() {
        let authors = vec![Author {
            id: 1,
            name: "Gabriel".to_string(),
            avatar: Some(Image {
                url: Some("https://cdn.example.com/me.png".to_string()),
                formats: ImageFormats {
                    thumbnail: Some(ImageFormat {
                        url: "https://cdn.example.com/thumbnail_me.png".to_string(),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        }];

        let text = authors_table(&create_test_client(), &authors).to_string();
        assert!(text.contains("Gabriel"));
        assert!(text.contains("https://cdn.example.com/thumbnail_me.png"));
    }

    #[test]
    fn test_tags_table_header_only_when_empty() {
        assert_eq!(tags_table(&[]).len(), 1);
    }
}
