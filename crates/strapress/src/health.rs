use crate::prelude::{println, *};
use colored::Colorize;

/// Handle the health command; fails when the backend does not answer
pub async fn handler(global: crate::Global) -> Result<()> {
    let content = global.content_manager()?;
    let base_url = content.client().base_url().to_string();

    if content.health_check().await {
        println!("{} {}", "Strapi is reachable at".green(), base_url.bright_white());
        Ok(())
    } else {
        Err(eyre!("Strapi is unreachable at {}", base_url))
    }
}
