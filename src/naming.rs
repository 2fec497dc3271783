// src/naming.rs
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

pub const PARTIAL_PREFIX: &str = "partial-";
pub const REINDEX_PREFIX: &str = "reindex-";
const PARTIAL_REINDEX_PREFIX: &str = "partial-reindex-";

// partial-.ds-<data-stream>-YYYY.MM.DD-NNNNNN
static PARTIAL_BASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^partial-(\.ds-.+-\d{4}\.\d{2}\.\d{2}-\d{6})").expect("valid regex")
});

static GENERATION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(\d{6})$").expect("valid regex"));

/// A partial index and the temporary index it gets reindexed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReindexPair {
    pub source: String,
    pub dest: String,
}

/// Mounted backing index, leftovers of an earlier consolidation excluded.
pub fn is_partial(index: &str) -> bool {
    index.starts_with(PARTIAL_PREFIX) && !index.starts_with(PARTIAL_REINDEX_PREFIX)
}

/// The `.ds-...` part of a partial index name.
pub fn partial_base(index: &str) -> Option<&str> {
    PARTIAL_BASE
        .captures(index)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn reindex_pair(index: &str) -> Option<ReindexPair> {
    partial_base(index).map(|base| ReindexPair {
        source: index.to_string(),
        dest: format!("{}{}", REINDEX_PREFIX, base),
    })
}

/// Split partial indices into reindex pairs and names that do not follow
/// the backing index convention, keeping input order in both.
pub fn pair_partials(indices: &[String]) -> (Vec<ReindexPair>, Vec<&str>) {
    let mut pairs = Vec::new();
    let mut unparsed = Vec::new();
    for index in indices {
        match reindex_pair(index) {
            Some(pair) => pairs.push(pair),
            None => unparsed.push(index.as_str()),
        }
    }
    (pairs, unparsed)
}

/// Trailing `-NNNNNN` rollover generation, -1 when there is none.
pub fn generation(index: &str) -> i64 {
    GENERATION_SUFFIX
        .captures(index)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(-1)
}

/// Index with the highest generation. The first one wins a tie.
pub fn most_recent(indices: &[String]) -> Option<&String> {
    indices.iter().reduce(|best, candidate| {
        if generation(candidate) > generation(best) {
            candidate
        } else {
            best
        }
    })
}

pub fn consolidated_index_name(data_stream: &str, date: NaiveDate) -> String {
    format!(
        "{}.ds-{}-large-{}",
        REINDEX_PREFIX,
        data_stream,
        date.format("%Y.%m.%d")
    )
}
