//! Query catalog: the fixed menu of canned analyses.
//!
//! Every dataset gets the same eleven analyses. Ten of them operate on the
//! selected dataset's table only; [`Analysis::AllFormatCatches`] is the one
//! deliberate exception and always unions all four format tables, whichever
//! tab invoked it.
//!
//! Analyses are keyed by [`Analysis`] identity, not by their display label,
//! so rewording a label cannot change which SQL runs or which chart is
//! drawn. The fielder filter is bound as a driver-level parameter rather
//! than spliced into the SQL text.

use crate::types::Dataset;

/// Default fielder name bound when the user supplies no override.
pub const DEFAULT_FIELDER: &str = "Smith";

/// The eleven canned analyses, identical across datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Analysis {
    /// Runs scored per team, highest first
    TeamRuns,
    /// Top 10 run scorers
    BatterRuns,
    /// Wickets fallen per team
    TeamWickets,
    /// Dismissal count per wicket kind
    WicketsByKind,
    /// Top 10 wicket takers
    TopBowlers,
    /// Dismissal kinds by frequency
    DismissalTypes,
    /// Deliveries bowled per bowler
    BowlerDeliveries,
    /// Batters caught out by a named fielder (parameterized)
    CaughtByFielder,
    /// Extras conceded per team
    TeamExtras,
    /// Top 20 catchers within the dataset
    FielderCatches,
    /// Top 10 catchers across all four formats.
    ///
    /// Ignores the invoking dataset entirely: the union over the four fixed
    /// tables is the point (a cross-format leaderboard), not an oversight.
    AllFormatCatches,
}

impl Analysis {
    /// All analyses, in menu order.
    pub const ALL: [Analysis; 11] = [
        Analysis::TeamRuns,
        Analysis::BatterRuns,
        Analysis::TeamWickets,
        Analysis::WicketsByKind,
        Analysis::TopBowlers,
        Analysis::DismissalTypes,
        Analysis::BowlerDeliveries,
        Analysis::CaughtByFielder,
        Analysis::TeamExtras,
        Analysis::FielderCatches,
        Analysis::AllFormatCatches,
    ];

    /// Human-readable label shown in the analysis menu.
    pub fn label(&self) -> &'static str {
        match self {
            Analysis::TeamRuns => "Total runs scored by each team",
            Analysis::BatterRuns => "Total runs scored by each batter",
            Analysis::TeamWickets => "Total wickets fallen for each team",
            Analysis::WicketsByKind => "Number of wickets by kind",
            Analysis::TopBowlers => "Top bowlers by number of wickets taken",
            Analysis::DismissalTypes => "Most common dismissal types",
            Analysis::BowlerDeliveries => "Number of deliveries bowled by each bowler",
            Analysis::CaughtByFielder => "Batters caught out by specific fielder",
            Analysis::TeamExtras => "Total extras conceded by each team",
            Analysis::FielderCatches => "Highest catches taken by fielder",
            Analysis::AllFormatCatches => "Highest catches taken cricketer",
        }
    }

    /// True for the one analysis that accepts a fielder-name parameter.
    pub fn takes_fielder(&self) -> bool {
        matches!(self, Analysis::CaughtByFielder)
    }

    /// SQL template for this analysis against the given dataset.
    ///
    /// `?` placeholders are bound at execution time; see
    /// [`AnalysisQuery::params`].
    fn sql(&self, dataset: Dataset) -> String {
        let t = dataset.table();
        match self {
            Analysis::TeamRuns => format!(
                "SELECT team, SUM(runs_total) AS total_runs \
                 FROM {t} \
                 GROUP BY team \
                 ORDER BY total_runs DESC"
            ),
            Analysis::BatterRuns => format!(
                "SELECT batter, SUM(runs_batter) AS total_runs \
                 FROM {t} \
                 GROUP BY batter \
                 ORDER BY total_runs DESC \
                 LIMIT 10"
            ),
            Analysis::TeamWickets => format!(
                "SELECT team, COUNT(wicket_player_out) AS total_wickets \
                 FROM {t} \
                 WHERE wicket_player_out IS NOT NULL \
                 GROUP BY team \
                 ORDER BY total_wickets DESC"
            ),
            Analysis::WicketsByKind => format!(
                "SELECT wicket_kind, COUNT(*) AS count \
                 FROM {t} \
                 WHERE wicket_kind IS NOT NULL \
                 GROUP BY wicket_kind \
                 ORDER BY count DESC"
            ),
            Analysis::TopBowlers => format!(
                "SELECT bowler, COUNT(wicket_player_out) AS wickets \
                 FROM {t} \
                 WHERE wicket_player_out IS NOT NULL \
                 GROUP BY bowler \
                 ORDER BY wickets DESC \
                 LIMIT 10"
            ),
            Analysis::DismissalTypes => format!(
                "SELECT wicket_kind, COUNT(*) AS frequency \
                 FROM {t} \
                 WHERE wicket_kind IS NOT NULL \
                 GROUP BY wicket_kind \
                 ORDER BY frequency DESC"
            ),
            Analysis::BowlerDeliveries => format!(
                "SELECT bowler, COUNT(*) AS deliveries_bowled \
                 FROM {t} \
                 GROUP BY bowler \
                 ORDER BY deliveries_bowled DESC"
            ),
            Analysis::CaughtByFielder => format!(
                "SELECT wicket_player_out, wicket_fielders \
                 FROM {t} \
                 WHERE wicket_kind = 'caught' \
                 AND wicket_fielders LIKE ?"
            ),
            Analysis::TeamExtras => format!(
                "SELECT team, SUM(runs_extras) AS extras_conceded \
                 FROM {t} \
                 GROUP BY team \
                 ORDER BY extras_conceded DESC"
            ),
            Analysis::FielderCatches => format!(
                "SELECT TRIM(wicket_fielders) AS fielder, COUNT(*) AS catches \
                 FROM {t} \
                 WHERE wicket_kind = 'caught' \
                 AND COALESCE(wicket_fielders, '') <> '' \
                 GROUP BY fielder \
                 ORDER BY catches DESC \
                 LIMIT 20"
            ),
            Analysis::AllFormatCatches => {
                let unions: Vec<String> = Dataset::ALL
                    .iter()
                    .map(|d| {
                        format!(
                            "SELECT TRIM(wicket_fielders) AS fielder FROM {} \
                             WHERE wicket_kind = 'caught' \
                             AND COALESCE(wicket_fielders, '') <> ''",
                            d.table()
                        )
                    })
                    .collect();
                format!(
                    "SELECT fielder, COUNT(*) AS catches \
                     FROM ({}) x \
                     GROUP BY fielder \
                     ORDER BY catches DESC \
                     LIMIT 10",
                    unions.join(" UNION ALL ")
                )
            }
        }
    }
}

/// An immutable, ready-to-run analysis query: the SQL text plus the values
/// to bind to its `?` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisQuery {
    /// Which analysis this is
    pub analysis: Analysis,
    /// The dataset tab that produced it
    pub dataset: Dataset,
    /// SQL text with driver placeholders
    pub sql: String,
    /// Bind values, positional
    pub params: Vec<String>,
}

impl AnalysisQuery {
    /// Title for previews and charts.
    pub fn title(&self) -> &'static str {
        self.analysis.label()
    }
}

/// Build an analysis query for a dataset, with an optional fielder
/// override.
///
/// Only [`Analysis::CaughtByFielder`] takes the override; for it the bound
/// `LIKE` pattern is `%<name>%`, defaulting to [`DEFAULT_FIELDER`]. Every
/// other analysis ignores the override.
pub fn select(analysis: Analysis, dataset: Dataset, fielder: Option<&str>) -> AnalysisQuery {
    let params = if analysis.takes_fielder() {
        let name = match fielder {
            Some(f) if !f.trim().is_empty() => f.trim(),
            _ => DEFAULT_FIELDER,
        };
        vec![format!("%{}%", name)]
    } else {
        Vec::new()
    };

    AnalysisQuery {
        analysis,
        dataset,
        sql: analysis.sql(dataset),
        params,
    }
}

/// The full fixed catalog for a dataset: exactly eleven analyses, in menu
/// order, with default parameters. Pure, no I/O.
pub fn catalog_for(dataset: Dataset) -> Vec<AnalysisQuery> {
    Analysis::ALL
        .iter()
        .map(|a| select(*a, dataset, None))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_eleven_analyses_per_dataset() {
        for dataset in Dataset::ALL {
            let catalog = catalog_for(dataset);
            assert_eq!(catalog.len(), 11, "{} catalog size", dataset);
        }
    }

    #[test]
    fn test_ten_analyses_are_dataset_isolated() {
        for dataset in Dataset::ALL {
            for query in catalog_for(dataset) {
                if query.analysis == Analysis::AllFormatCatches {
                    continue;
                }
                let others = Dataset::ALL.iter().filter(|d| **d != dataset);
                for other in others {
                    assert!(
                        !query.sql.contains(other.table()),
                        "{:?} on {} references {}",
                        query.analysis,
                        dataset.table(),
                        other.table()
                    );
                }
                assert!(query.sql.contains(dataset.table()));
            }
        }
    }

    #[test]
    fn test_all_format_catches_unions_every_table() {
        // Same union regardless of which dataset tab asked for it.
        for dataset in Dataset::ALL {
            let query = select(Analysis::AllFormatCatches, dataset, None);
            for d in Dataset::ALL {
                assert!(query.sql.contains(d.table()), "missing {}", d.table());
            }
            assert_eq!(query.sql.matches("UNION ALL").count(), 3);
        }
    }

    #[test]
    fn test_fielder_override_is_bound_not_spliced() {
        let query = select(Analysis::CaughtByFielder, Dataset::Test, Some("Root"));
        assert_eq!(query.params, vec!["%Root%".to_string()]);
        assert!(!query.sql.contains("Root"));
        assert!(!query.sql.contains("Smith"));
        assert!(query.sql.contains("LIKE ?"));
    }

    #[test]
    fn test_fielder_default_is_smith() {
        let query = select(Analysis::CaughtByFielder, Dataset::Odi, None);
        assert_eq!(query.params, vec!["%Smith%".to_string()]);

        // Blank input falls back to the default too.
        let query = select(Analysis::CaughtByFielder, Dataset::Odi, Some("  "));
        assert_eq!(query.params, vec!["%Smith%".to_string()]);
    }

    #[test]
    fn test_fielder_override_ignored_elsewhere() {
        let query = select(Analysis::TeamRuns, Dataset::Ipl, Some("Root"));
        assert!(query.params.is_empty());
        assert!(!query.sql.contains("Root"));
    }

    #[test]
    fn test_team_runs_groups_and_orders() {
        let query = select(Analysis::TeamRuns, Dataset::Test, None);
        assert!(query.sql.contains("SUM(runs_total) AS total_runs"));
        assert!(query.sql.contains("GROUP BY team"));
        assert!(query.sql.contains("ORDER BY total_runs DESC"));
        assert!(query.sql.contains("FROM test_matches"));
    }

    #[test]
    fn test_only_caught_by_fielder_takes_a_parameter() {
        for analysis in Analysis::ALL {
            assert_eq!(
                analysis.takes_fielder(),
                analysis == Analysis::CaughtByFielder
            );
        }
    }

    #[test]
    fn test_labels_are_unique() {
        let mut labels: Vec<&str> = Analysis::ALL.iter().map(|a| a.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 11);
    }
}
