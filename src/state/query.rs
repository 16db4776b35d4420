//! Translates a `FilterState` into one parameterized scan of the `games` table
use super::data::{FilterState, RegionFilter};

/// Columns projected by a browse scan, in `GameSummary` order
const SELECT_SUMMARY: &str =
    "SELECT GameId, COALESCE(GameTitle, 'Unknown'), IconBlob FROM games WHERE 1 = 1";

/// A ready-to-run SQL statement and its positional parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub sql: String,
    pub params: Vec<String>,
}

/// Build the scan for `filter`.
///
/// Active conditions are AND-combined after an always-true base clause.
/// Text search is a literal, case-insensitive substring match on id or title
/// (SQLite `LIKE` folds ASCII case). Results are ordered by title, with
/// rowid breaking ties.
pub fn build(filter: &FilterState) -> Query {
    let mut sql = String::from(SELECT_SUMMARY);
    let mut params = Vec::new();

    let text = filter.search_text();
    if !text.is_empty() {
        sql.push_str(" AND (GameId LIKE ? ESCAPE '\\' OR GameTitle LIKE ? ESCAPE '\\')");
        let pattern = format!("%{}%", escape_like(text));
        params.push(pattern.clone());
        params.push(pattern);
    }

    if filter.arcade_only {
        sql.push_str(" AND ArcadeGame = 1");
    }

    if filter.psn_only {
        sql.push_str(" AND PSN = 1");
    }

    if let RegionFilter::Only(region) = filter.region {
        sql.push_str(" AND Region = ?");
        params.push(region.code().to_string());
    }

    sql.push_str(" ORDER BY COALESCE(GameTitle, 'Unknown'), rowid");

    Query { sql, params }
}

/// Escape LIKE wildcards so user text only ever matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
