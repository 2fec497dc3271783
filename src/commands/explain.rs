// src/commands/explain.rs
use crate::elasticsearch::client::connect;
use crate::elasticsearch::indices::get_lifecycle_date_millis;
use crate::utils::*;
use chrono::DateTime;
use clap::Args;

#[derive(Args)]
pub struct ExplainArgs {
    /// Index to read the lifecycle date of
    #[arg(value_name = "index")]
    pub index: String,
}

fn describe(index: &str, millis: Option<i64>) -> String {
    match millis {
        Some(millis) => match DateTime::from_timestamp_millis(millis) {
            Some(date) => format!("{}: {} ({})", index, millis, date.to_rfc3339()),
            None => format!("{}: {}", index, millis),
        },
        None => format!("{}: no lifecycle_date_millis", index),
    }
}

pub fn handle_explain_command(settings: Settings, args: &ExplainArgs) -> Result<(), DsmError> {
    let client = connect(settings).ok_or_else(|| {
        DsmError::ESError("Failed to connect to Elasticsearch. Cannot explain lifecycle.".to_string())
    })?;

    let millis = get_lifecycle_date_millis(&args.index, &client);
    println!("{}", describe(&args.index, millis));
    Ok(())
}
