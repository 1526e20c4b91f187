use crate::api::{ApiClient, Resource, ResourceQuery};
use crate::error::Result;
use colored::Colorize;
use prettytable::{format, Table};

use super::truncate;

/// List support resources matching the filters
pub async fn list_resources(client: &ApiClient, query: ResourceQuery) -> Result<()> {
    let resources = client.resources(&query).await?;
    tracing::debug!(count = resources.len(), "Fetched resources");

    if resources.is_empty() {
        println!("{}", "No resources match these filters.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "Title".bold(),
        "Category".bold(),
        "Location".bold(),
        "Contact".bold()
    ]);

    for resource in &resources {
        table.add_row(prettytable::row![
            truncate(&resource.title, 40).cyan(),
            or_dash(&resource.category),
            or_dash(&resource.location_tag),
            contact_line(resource)
        ]);
    }

    println!("\nSupport Resources:");
    table.printstd();
    println!();
    println!(
        "{}",
        "If you are in immediate danger, call your local emergency number.".yellow()
    );
    println!();
    Ok(())
}

fn or_dash(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("-")
        .to_string()
}

fn contact_line(resource: &Resource) -> String {
    match (&resource.contact_info, &resource.url) {
        (Some(contact), _) if !contact.trim().is_empty() => contact.clone(),
        (_, Some(url)) if !url.trim().is_empty() => url.clone(),
        _ => "-".to_string(),
    }
}
