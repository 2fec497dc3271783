// src/commands/ls.rs
use crate::elasticsearch::client::connect;
use crate::elasticsearch::indices::get_partial_indices;
use crate::utils::*;
use clap::Args;

#[derive(Args)]
pub struct LsArgs {
    /// Data stream to inspect
    #[arg(value_name = "data_stream")]
    #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub data_stream: String,
}

fn display_indices(indices: &[String]) {
    for index in indices {
        println!("- {}", index);
    }
}

pub fn handle_ls_command(settings: Settings, args: &LsArgs) -> Result<(), DsmError> {
    let client = connect(settings).ok_or_else(|| {
        DsmError::ESError("Failed to connect to Elasticsearch. Cannot list indices.".to_string())
    })?;

    let mut indices = get_partial_indices(&args.data_stream, &client);
    indices.sort();
    if indices.is_empty() {
        println!("No partial indices found for {}", args.data_stream);
    } else {
        display_indices(&indices);
    }

    Ok(())
}
