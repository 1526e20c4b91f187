//! Browsing commands for psychologists, orders and articles

use super::{parse_record, truncate};
use crate::api::{ApiClient, Article, Order, PageQuery, Psychologist, RecordId};
use crate::cli::{ArticleCommand, OrderCommand, PsychologistCommand};
use crate::error::Result;
use colored::Colorize;
use prettytable::{format, Table};
use serde_json::Value;

/// Handle psychologist commands
pub async fn handle_psychologists(
    client: &ApiClient,
    command: PsychologistCommand,
) -> Result<()> {
    match command {
        PsychologistCommand::List { paging } => {
            let psychologists = client.psychologists(&PageQuery::from(paging)).await?;
            print_psychologists("Psychologists", &psychologists);
        }
        PsychologistCommand::Show { id } => {
            let psychologist = client.psychologist(&RecordId::from(id.as_str())).await?;
            println!("ID:        {}", psychologist.id.to_string().cyan());
            println!("Name:      {}", or_dash(&psychologist.name));
            println!("Title:     {}", or_dash(&psychologist.title));
            println!("Specialty: {}", or_dash(&psychologist.specialty));
            print_extra(&psychologist.extra);
        }
        PsychologistCommand::Recommend => {
            let psychologists = client.recommended_psychologists().await?;
            print_psychologists("Recommended for you", &psychologists);
        }
    }
    Ok(())
}

/// Handle order commands
pub async fn handle_orders(client: &ApiClient, command: OrderCommand) -> Result<()> {
    match command {
        OrderCommand::List { paging } => {
            let orders = client.orders(&PageQuery::from(paging)).await?;
            print_orders(&orders);
        }
        OrderCommand::Show { id } => {
            let order = client.order(&RecordId::from(id.as_str())).await?;
            print_order(&order);
        }
        OrderCommand::Create { json } => {
            let fields = parse_record(&json)?;
            let order = client.create_order(&fields).await?;
            println!("{}", format!("Booked order {}", order.id).green());
            print_order(&order);
        }
        OrderCommand::Cancel { id } => {
            let id = RecordId::from(id.as_str());
            client.cancel_order(&id).await?;
            println!("{}", format!("Cancelled order {}", id).green());
        }
    }
    Ok(())
}

/// Handle article commands
pub async fn handle_articles(client: &ApiClient, command: ArticleCommand) -> Result<()> {
    match command {
        ArticleCommand::List { paging } => {
            let articles = client.articles(&PageQuery::from(paging)).await?;
            print_articles(&articles);
        }
        ArticleCommand::Show { id } => {
            let article = client.article(&RecordId::from(id.as_str())).await?;
            print_article(&article);
        }
    }
    Ok(())
}

fn print_psychologists(heading: &str, psychologists: &[Psychologist]) {
    if psychologists.is_empty() {
        println!("{}", "No psychologists found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "ID".bold(),
        "Name".bold(),
        "Title".bold(),
        "Specialty".bold()
    ]);
    for p in psychologists {
        table.add_row(prettytable::row![
            p.id.to_string().cyan(),
            truncate(&or_dash(&p.name), 30),
            truncate(&or_dash(&p.title), 20),
            truncate(&or_dash(&p.specialty), 30)
        ]);
    }

    println!("\n{}:", heading);
    table.printstd();
    println!();
}

fn print_orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("{}", "No orders found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "ID".bold(),
        "Status".bold(),
        "Psychologist".bold()
    ]);
    for order in orders {
        table.add_row(prettytable::row![
            order.id.to_string().cyan(),
            or_dash(&order.status),
            order
                .psychologist_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string())
        ]);
    }

    println!("\nYour Orders:");
    table.printstd();
    println!();
}

fn print_order(order: &Order) {
    println!("Order:        {}", order.id.to_string().cyan());
    println!("Status:       {}", or_dash(&order.status));
    if let Some(psychologist) = &order.psychologist_id {
        println!("Psychologist: {}", psychologist);
    }
    print_extra(&order.extra);
}

fn print_articles(articles: &[Article]) {
    if articles.is_empty() {
        println!("{}", "No articles found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row!["ID".bold(), "Title".bold()]);
    for article in articles {
        table.add_row(prettytable::row![
            article.id.to_string().cyan(),
            truncate(&or_dash(&article.title), 60)
        ]);
    }

    println!("\nArticles:");
    table.printstd();
    println!();
    println!("Use {} to read one.", "solace articles show <ID>".cyan());
    println!();
}

fn print_article(article: &Article) {
    println!("\n{}\n", or_dash(&article.title).bold());
    println!("{}\n", article.content.as_deref().unwrap_or(""));
}

/// Print fields the typed record does not model, scalar values only
fn print_extra(extra: &serde_json::Map<String, Value>) {
    for (key, value) in extra {
        match value {
            Value::String(s) => println!("{}: {}", key, s),
            Value::Number(_) | Value::Bool(_) => println!("{}: {}", key, value),
            _ => {}
        }
    }
}

fn or_dash(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("-")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(&None), "-");
        assert_eq!(or_dash(&Some("  ".to_string())), "-");
        assert_eq!(or_dash(&Some("Dr. Li".to_string())), "Dr. Li");
    }

    #[test]
    fn test_print_empty_listings() {
        print_psychologists("Psychologists", &[]);
        print_orders(&[]);
        print_articles(&[]);
    }
}
