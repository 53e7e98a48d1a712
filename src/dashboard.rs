//! Dashboard view: the headline metric tiles plus the per-year release
//! series backing the bar chart, bundled for the HTTP surface.

use crate::aggregate::{self, YearCount};
use crate::dataset::Dataset;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub total_games: usize,
    /// Pre-formatted to two decimals with a currency sign, e.g. "$12.34".
    pub average_price: String,
    pub top_genre: String,
    pub top_developer: String,
    pub games_per_year: Vec<YearCount>,
}

impl DashboardView {
    pub fn build(dataset: &Dataset) -> Result<Self> {
        let summary = aggregate::summary(dataset)?;
        Ok(Self {
            total_games: summary.total_games,
            average_price: format!("${:.2}", summary.average_price),
            top_genre: summary.top_genre,
            top_developer: summary.top_developer,
            games_per_year: aggregate::games_per_year(dataset)?,
        })
    }
}
