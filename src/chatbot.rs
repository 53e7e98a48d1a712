//! Rule-based chatbot pipeline: classify the query, compute the matching
//! aggregate, render it with fixed labels.
//!
//! The classifier path never fails out to the caller for user-facing
//! reasons; an empty dataset degrades to a readable message and an
//! unrecognized query gets the fixed help text.

use crate::aggregate::{self, DatasetSummary, YearCount};
use crate::dataset::Dataset;
use crate::error::{DashError, Result};
use crate::intent::{classify, Intent};
use serde::{Deserialize, Serialize};

/// Help text shown for queries no rule matches. Lists every recognized
/// phrase.
pub const HELP_MESSAGE: &str =
    "Try: total games, average price, top genre, top developer, games per year, summary";

/// Aggregator output, tagged so the formatter can dispatch exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AggregateResult {
    Count(usize),
    Amount(f64),
    Label(String),
    Overview(DatasetSummary),
    YearCounts(Vec<YearCount>),
    Nothing,
}

/// What a surface renders: plain text or a small year-count table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Reply {
    Text(String),
    Table(Vec<YearCount>),
}

/// Compute the aggregate backing `intent`.
pub fn compute(dataset: &Dataset, intent: Intent) -> Result<AggregateResult> {
    match intent {
        Intent::TotalGames => Ok(AggregateResult::Count(aggregate::total_games(dataset))),
        Intent::AveragePrice => Ok(AggregateResult::Amount(aggregate::average_price(dataset)?)),
        Intent::TopGenre => Ok(AggregateResult::Label(aggregate::top_genre(dataset)?)),
        Intent::TopDeveloper => Ok(AggregateResult::Label(aggregate::top_developer(dataset)?)),
        Intent::GamesPerYear => Ok(AggregateResult::YearCounts(aggregate::games_per_year(
            dataset,
        )?)),
        Intent::Summary => Ok(AggregateResult::Overview(aggregate::summary(dataset)?)),
        Intent::Unrecognized => Ok(AggregateResult::Nothing),
    }
}

/// Render an aggregate result for its intent. Trusts the result shape; any
/// intent/result pairing `compute` cannot produce falls back to the help
/// text.
pub fn render(intent: Intent, result: &AggregateResult) -> Reply {
    match (intent, result) {
        (Intent::TotalGames, AggregateResult::Count(n)) => {
            Reply::Text(format!("Total Games: {}", n))
        }
        (Intent::AveragePrice, AggregateResult::Amount(price)) => {
            Reply::Text(format!("Average Price: ${:.2}", price))
        }
        (Intent::TopGenre, AggregateResult::Label(genre)) => {
            Reply::Text(format!("Top Genre: {}", genre))
        }
        (Intent::TopDeveloper, AggregateResult::Label(developer)) => {
            Reply::Text(format!("Top Developer: {}", developer))
        }
        (Intent::GamesPerYear, AggregateResult::YearCounts(rows)) => Reply::Table(rows.clone()),
        (Intent::Summary, AggregateResult::Overview(summary)) => {
            Reply::Text(summary_block(summary))
        }
        _ => Reply::Text(HELP_MESSAGE.to_string()),
    }
}

fn summary_block(summary: &DatasetSummary) -> String {
    format!(
        "Steam Dataset Summary:\n\
         - Total Games: {}\n\
         - Average Price: ${:.2}\n\
         - Top Genre: {}\n\
         - Top Developer: {}",
        summary.total_games, summary.average_price, summary.top_genre, summary.top_developer
    )
}

/// One classifier-driven reply for a query. Empty-dataset failures become
/// user-visible text here; anything else that escapes is an internal error.
pub fn respond(dataset: &Dataset, query: &str) -> Result<Reply> {
    let intent = classify(query);
    match compute(dataset, intent) {
        Ok(result) => Ok(render(intent, &result)),
        Err(DashError::EmptyDataset(reason)) => {
            Ok(Reply::Text(format!("No data to answer that: {}", reason)))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_labels() {
        assert_eq!(
            render(Intent::TotalGames, &AggregateResult::Count(128)),
            Reply::Text("Total Games: 128".to_string())
        );
        assert_eq!(
            render(Intent::AveragePrice, &AggregateResult::Amount(20.0)),
            Reply::Text("Average Price: $20.00".to_string())
        );
        assert_eq!(
            render(Intent::TopGenre, &AggregateResult::Label("Action".to_string())),
            Reply::Text("Top Genre: Action".to_string())
        );
        assert_eq!(
            render(
                Intent::TopDeveloper,
                &AggregateResult::Label("Valve".to_string())
            ),
            Reply::Text("Top Developer: Valve".to_string())
        );
    }

    #[test]
    fn test_render_price_two_decimals() {
        assert_eq!(
            render(Intent::AveragePrice, &AggregateResult::Amount(12.345)),
            Reply::Text("Average Price: $12.35".to_string())
        );
        assert_eq!(
            render(Intent::AveragePrice, &AggregateResult::Amount(7.0)),
            Reply::Text("Average Price: $7.00".to_string())
        );
    }

    #[test]
    fn test_render_unrecognized_is_help() {
        assert_eq!(
            render(Intent::Unrecognized, &AggregateResult::Nothing),
            Reply::Text(HELP_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_render_summary_block() {
        let summary = DatasetSummary {
            total_games: 3,
            average_price: 20.0,
            top_genre: "Action".to_string(),
            top_developer: "Valve".to_string(),
        };
        let Reply::Text(text) = render(Intent::Summary, &AggregateResult::Overview(summary)) else {
            panic!("summary must render as text");
        };
        assert!(text.contains("- Total Games: 3"));
        assert!(text.contains("- Average Price: $20.00"));
        assert!(text.contains("- Top Genre: Action"));
        assert!(text.contains("- Top Developer: Valve"));
    }

    #[test]
    fn test_reply_serializes_tagged() {
        let json = serde_json::to_value(Reply::Text("hi".to_string())).unwrap();
        assert_eq!(json["kind"], "text");
        let json = serde_json::to_value(Reply::Table(vec![])).unwrap();
        assert_eq!(json["kind"], "table");
    }
}
