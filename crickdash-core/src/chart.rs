//! Chart classification: which visual encodings a result gets.
//!
//! Each [`Analysis`] maps to zero, one, or two fixed chart shapes. The
//! mapping is keyed on analysis identity, so relabeling an analysis never
//! changes its chart. Analyses with no entry get a tabular preview only.

use crate::catalog::Analysis;

/// Chart family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Pie,
}

/// A single chart's column bindings.
///
/// For bars, `category`/`value` are the x and y columns; for pies they are
/// the names and values columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub kind: ChartKind,
    /// Category axis column (bar x, pie names)
    pub category: &'static str,
    /// Numeric column (bar y, pie values)
    pub value: &'static str,
    /// Column that drives a color gradient, when the shape uses one
    pub color: Option<&'static str>,
    /// Chart title
    pub title: &'static str,
    /// Cap on plotted rows, when the shape limits itself
    pub limit: Option<usize>,
}

impl Chart {
    fn bar(category: &'static str, value: &'static str, title: &'static str) -> Self {
        Chart {
            kind: ChartKind::Bar,
            category,
            value,
            color: None,
            title,
            limit: None,
        }
    }

    fn pie(category: &'static str, value: &'static str, title: &'static str) -> Self {
        Chart {
            kind: ChartKind::Pie,
            category,
            value,
            color: None,
            title,
            limit: None,
        }
    }

    fn colored(mut self, column: &'static str) -> Self {
        self.color = Some(column);
        self
    }

    fn limited(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// The fixed chart shapes for an analysis; empty means preview only.
pub fn chart_specs(analysis: Analysis) -> Vec<Chart> {
    match analysis {
        Analysis::TeamRuns => vec![
            Chart::bar("team", "total_runs", "Total runs scored by each team"),
            Chart::pie("team", "total_runs", "Team Run Distribution"),
        ],
        Analysis::BatterRuns => vec![
            Chart::bar("batter", "total_runs", "Total runs scored by each batter")
                .colored("total_runs"),
        ],
        Analysis::WicketsByKind => {
            vec![Chart::pie("wicket_kind", "count", "Number of wickets by kind")]
        }
        Analysis::TopBowlers => vec![
            Chart::bar("bowler", "wickets", "Top bowlers by number of wickets taken")
                .colored("wickets"),
        ],
        Analysis::DismissalTypes => {
            vec![Chart::bar("wicket_kind", "frequency", "Most common dismissal types")]
        }
        Analysis::BowlerDeliveries => vec![
            Chart::bar("bowler", "deliveries_bowled", "Top 20 Bowlers by Deliveries")
                .limited(20),
        ],
        Analysis::TeamExtras => {
            vec![Chart::bar("team", "extras_conceded", "Total extras conceded by each team")]
        }
        // Preview-only analyses: raw listings and leaderboards whose rows
        // speak for themselves.
        Analysis::TeamWickets
        | Analysis::CaughtByFielder
        | Analysis::FielderCatches
        | Analysis::AllFormatCatches => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_runs_gets_bar_and_pie() {
        let specs = chart_specs(Analysis::TeamRuns);
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].kind, ChartKind::Bar);
        assert_eq!(specs[0].category, "team");
        assert_eq!(specs[0].value, "total_runs");
        assert_eq!(specs[1].kind, ChartKind::Pie);
        assert_eq!(specs[1].category, "team");
        assert_eq!(specs[1].value, "total_runs");
    }

    #[test]
    fn test_preview_only_analyses_have_no_chart() {
        for analysis in [
            Analysis::TeamWickets,
            Analysis::CaughtByFielder,
            Analysis::FielderCatches,
            Analysis::AllFormatCatches,
        ] {
            assert!(chart_specs(analysis).is_empty(), "{:?}", analysis);
        }
    }

    #[test]
    fn test_single_chart_shapes() {
        let specs = chart_specs(Analysis::WicketsByKind);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].kind, ChartKind::Pie);

        let specs = chart_specs(Analysis::TopBowlers);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].color, Some("wickets"));

        let specs = chart_specs(Analysis::BowlerDeliveries);
        assert_eq!(specs[0].limit, Some(20));
    }

    #[test]
    fn test_every_analysis_classifies() {
        // Exhaustive: classification is total over the catalog, even when
        // the answer is "no chart".
        for analysis in Analysis::ALL {
            let specs = chart_specs(analysis);
            assert!(specs.len() <= 2);
        }
    }
}
