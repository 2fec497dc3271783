// src/commands/plan.rs
use crate::elasticsearch::builder::*;
use crate::elasticsearch::client::{Cluster, connect};
use crate::elasticsearch::indices::{get_lifecycle_date_millis, get_partial_indices};
use crate::naming::*;
use crate::report::{Block, Report, Section};
use crate::utils::*;
use chrono::{Local, NaiveDate};
use clap::Args;
use tracing::{error, info};

#[derive(Args)]
pub struct PlanArgs {
    /// Data stream whose partial backing indices get consolidated
    #[arg(value_name = "data_stream")]
    #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub data_stream: String,

    /// Date used in the consolidated index name (defaults to today)
    #[arg(long, value_name = "date")]
    #[arg(short = 'd')]
    pub date: Option<String>,
}

const NOT_CONNECTED: &str = "Elasticsearch client is not connected. Please ensure your configuration (.env file, environment or config file) is correct and the connection is successful.";

fn reindex_partials_step(partials: &[String], pairs: &[ReindexPair], unparsed: &[&str]) -> Section {
    let mut section = Section::new("## Step 3: Reindex Individual Partial Indices (Run these in sequence)");

    if partials.is_empty() {
        section.push(Block::warning("No partial indices found for the specified data stream. Please ensure the data stream name is correct and partial indices exist."));
        return section;
    }

    section.push(Block::text(
        "Here are the commands to reindex each `partial-` index into a temporary `reindex-` prefixed index:",
    ));
    for index in unparsed {
        section.push(Block::warning(format!(
            "Could not parse index name format for: {}. Skipping reindex command for this index.",
            index
        )));
    }
    for pair in pairs {
        let body = ReindexBuilder::new(&pair.dest)
            .with_source(&pair.source)
            .create_only(true)
            .build();
        section.push(Block::request_with_body(
            "POST /_reindex?wait_for_completion=false",
            body,
        ));
    }
    section
}

fn compare_counts_step(pairs: &[ReindexPair]) -> Section {
    let mut section = Section::new("## Step 4: Compare Document Counts");

    if pairs.is_empty() {
        section.push(Block::warning(
            "No indices to compare. Please ensure Step 3 generated temporary indices successfully.",
        ));
        return section;
    }

    section.push(Block::text("Use these commands to compare document counts between the original and newly reindexed temporary indices. Look for matching `docs.count`:"));
    for pair in pairs {
        section.push(Block::request(format!(
            "GET _cat/indices/{},{}?v&expand_wildcards=all",
            pair.source, pair.dest
        )));
    }
    section
}

fn lifecycle_step<C: Cluster + ?Sized>(partials: &[String], client: &C) -> (Section, Option<i64>) {
    let mut section = Section::new("## Step 5: Obtain `lifecycle_date_millis` for the Most Recent Index");

    let Some(latest) = most_recent(partials) else {
        section.push(Block::warning(
            "Cannot obtain `lifecycle_date_millis` as no partial indices were found.",
        ));
        return (section, None);
    };

    section.push(Block::text(format!(
        "We'll fetch the `lifecycle_date_millis` for the most recent partial index: `{}`.",
        latest
    )));

    let lifecycle_date_millis = get_lifecycle_date_millis(latest, client);
    match lifecycle_date_millis {
        Some(millis) => section.push(Block::text(format!(
            "The `lifecycle_date_millis` obtained is: `{}`. This value is crucial for Step 7.",
            millis
        ))),
        None => section.push(Block::warning(
            "Could not retrieve `lifecycle_date_millis`. This value is required for subsequent steps.",
        )),
    }

    section.push(Block::text(
        "Use the command below to manually verify the `lifecycle_date_millis` value:",
    ));
    section.push(Block::request(format!("GET {}/_ilm/explain", latest)));
    (section, lifecycle_date_millis)
}

fn consolidate_step(pairs: &[ReindexPair], large_index: &str) -> Section {
    let mut section = Section::new("## Step 6: Consolidate Temporary Indices into a New Large Index");

    if pairs.is_empty() {
        section.push(Block::warning(
            "No temporary reindex indices to consolidate. Please ensure Step 3 was successful.",
        ));
        return section;
    }

    let temp_indices: Vec<&str> = pairs.iter().map(|pair| pair.dest.as_str()).collect();
    let body = ReindexBuilder::new(large_index)
        .with_sources(&temp_indices)
        .build();
    section.push(Block::text(format!(
        "The temporary indices will be reindexed into a new, consolidated index named `{}`:",
        large_index
    )));
    section.push(Block::request_with_body(
        "POST _reindex?wait_for_completion=false",
        body,
    ));
    section
}

fn lifecycle_settings_step(lifecycle_date_millis: Option<i64>, large_index: &str) -> Section {
    let mut section = Section::new("## Step 7: Adjust Rollover Age and Manually Resolve ILM Error");

    let Some(millis) = lifecycle_date_millis else {
        section.push(Block::warning("Cannot generate Step 7 commands without a valid `lifecycle_date_millis` or the large index name."));
        return section;
    };

    section.push(Block::text(format!(
        "First, apply the `lifecycle_date_millis` to the new large index (`{}`) and mark it as complete for indexing. This is crucial for ILM to correctly manage its age:",
        large_index
    )));
    section.push(Block::request_with_body(
        format!("PUT {}/_settings", large_index),
        lifecycle_settings(millis),
    ));
    section.push(Block::text("If, after the settings update, the index enters an ILM ERROR state (which is expected as it doesn't have a traditional write alias), use this command to manually move it past the error phase and allow ILM to continue its lifecycle:"));
    section.push(Block::request_with_body(
        format!("POST _ilm/move/{}", large_index),
        ilm_move_past_rollover_error(),
    ));
    section
}

fn modify_data_stream_step(data_stream: &str, partials: &[String], large_index: &str) -> Section {
    let mut section = Section::new("## Step 8: Modify Data Stream (Add/Remove Backing Indices) and Confirm");

    if partials.is_empty() {
        section.push(Block::warning(
            "Cannot generate Step 8 commands without partial indices or a large index name.",
        ));
        return section;
    }

    let body = partials
        .iter()
        .fold(ModifyDataStreamBuilder::new(data_stream), |builder, index| {
            builder.remove_backing_index(index)
        })
        .add_backing_index(large_index)
        .build();

    section.push(Block::text(format!(
        "Now, replace the old `partial-` indices with the new large index (`{}`) within data stream `{}`. This will make the new index part of your data stream:",
        large_index, data_stream
    )));
    section.push(Block::request_with_body("POST _data_stream/_modify", body));
    section.push(Block::text("Confirm the swap was successful and that the new large index is listed under your data stream's indices using this command:"));
    section.push(Block::request(format!("GET _data_stream/{}", data_stream)));
    section
}

fn delete_step(partials: &[String], pairs: &[ReindexPair]) -> Section {
    let mut section = Section::new("## Step 9: Delete Old and Temporary Indices");

    let to_delete: Vec<&str> = partials
        .iter()
        .map(String::as_str)
        .chain(pairs.iter().map(|pair| pair.dest.as_str()))
        .collect();

    if to_delete.is_empty() {
        section.push(Block::Success(
            "No old or temporary indices found to delete. If this is unexpected, verify previous steps.".to_string(),
        ));
        return section;
    }

    section.push(Block::text("Once you have confirmed that all steps are successful and your data stream is functioning correctly with the new large index, you can safely delete the old `partial-` indices and the temporary `reindex-` indices (but NOT the `reindex-.ds-<data-stream-name>-large` index!):"));
    section.push(Block::request(format!("DELETE {}", to_delete.join(","))));
    section
}

/// Build the consolidation runbook for `data_stream`, naming the large
/// index after `date`.
pub fn generate_report<C: Cluster + ?Sized>(
    data_stream: &str,
    client: Option<&C>,
    date: NaiveDate,
) -> Report {
    let Some(client) = client.filter(|client| client.ping().is_ok()) else {
        return Report::Unavailable(NOT_CONNECTED.to_string());
    };

    let mut partials = get_partial_indices(data_stream, client);
    partials.sort();
    info!(data_stream, count = partials.len(), "found partial indices");

    let (pairs, unparsed) = pair_partials(&partials);
    let large_index = consolidated_index_name(data_stream, date);

    let (lifecycle, lifecycle_date_millis) = lifecycle_step(&partials, client);

    let sections = vec![
        reindex_partials_step(&partials, &pairs, &unparsed),
        compare_counts_step(&pairs),
        lifecycle,
        consolidate_step(&pairs, &large_index),
        lifecycle_settings_step(lifecycle_date_millis, &large_index),
        modify_data_stream_step(data_stream, &partials, &large_index),
        delete_step(&partials, &pairs),
    ];

    Report::Plan {
        title: format!("# Commands for Data Stream: `{}`", data_stream),
        sections,
    }
}

/// Same as `generate_report`, dated with the local calendar day.
pub fn generate_commands<C: Cluster + ?Sized>(data_stream: &str, client: Option<&C>) -> Report {
    generate_report(data_stream, client, Local::now().date_naive())
}

fn parse_date(date: &str) -> Result<NaiveDate, DsmError> {
    dateparser::parse(date)
        .map(|dt| dt.with_timezone(&Local).date_naive())
        .map_err(|e| DsmError::DateParseError(format!("Invalid date {}: {}", date, e)))
}

/// A configuration error still produces a report, the not-connected one.
pub fn handle_plan_command(
    settings: Result<Settings, DsmError>,
    args: &PlanArgs,
) -> Result<(), DsmError> {
    let date = args.date.as_deref().map(parse_date).transpose()?;

    let client = match settings {
        Ok(settings) => connect(settings),
        Err(e) => {
            error!("{}", e);
            None
        }
    };
    let report = match date {
        Some(date) => generate_report(&args.data_stream, client.as_ref(), date),
        None => generate_commands(&args.data_stream, client.as_ref()),
    };
    println!("{}", report);
    Ok(())
}
