use crate::api::{AdminResource, ApiClient, PageQuery, RecordId};
use crate::cli::AdminCommand;
use crate::error::Result;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};
use serde_json::Value;

use super::{parse_record, print_json, truncate};

/// Most columns shown when listing admin records
const MAX_COLUMNS: usize = 6;

/// Handle admin commands for one kind of record
pub async fn handle_admin(
    client: &ApiClient,
    resource: AdminResource,
    command: AdminCommand,
) -> Result<()> {
    match command {
        AdminCommand::List { paging } => {
            let query = PageQuery::from(paging);
            let records = client.admin_list(resource, &query).await?;
            print_records(resource, &records);
        }
        AdminCommand::Add { json } => {
            let record = parse_record(&json)?;
            let created = client.admin_add(resource, &record).await?;
            println!("{}", format!("Added {}", resource).green());
            print_json(&created)?;
        }
        AdminCommand::Update { id, json } => {
            let record = parse_record(&json)?;
            let id = RecordId::from(id.as_str());
            let updated = client.admin_update(resource, &id, &record).await?;
            println!("{}", format!("Updated {} {}", resource, id).green());
            print_json(&updated)?;
        }
        AdminCommand::Delete { id } => {
            let id = RecordId::from(id.as_str());
            client.admin_delete(resource, &id).await?;
            println!("{}", format!("Deleted {} {}", resource, id).green());
        }
    }
    Ok(())
}

/// Column names for a record listing: `id` first, then keys in first-seen order
fn record_columns(records: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    if records.iter().any(|r| r.get("id").is_some()) {
        columns.push("id".to_string());
    }
    for record in records {
        if let Some(object) = record.as_object() {
            for key in object.keys() {
                if columns.len() >= MAX_COLUMNS {
                    return columns;
                }
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
    }
    columns
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => truncate(s, 30),
        Some(other) => truncate(&other.to_string(), 30),
    }
}

fn print_records(resource: AdminResource, records: &[Value]) {
    if records.is_empty() {
        println!("{}", format!("No {} records found.", resource).yellow());
        return;
    }

    let columns = record_columns(records);
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(Row::new(
        columns
            .iter()
            .map(|c| Cell::new(&c.bold().to_string()))
            .collect(),
    ));
    for record in records {
        table.add_row(Row::new(
            columns
                .iter()
                .map(|c| Cell::new(&cell_text(record.get(c))))
                .collect(),
        ));
    }

    println!("\n{} records ({}):", resource, records.len());
    table.printstd();
    println!();
}
