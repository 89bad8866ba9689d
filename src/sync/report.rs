use std::fmt;

/// How the day row itself fared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayStatus {
    Created,
    /// The create was rejected (the date already exists) and the update went
    /// through.
    Updated,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MealOutcome {
    Synced {
        name: String,
        remote_id: i64,
        items_synced: usize,
        items_failed: usize,
    },
    /// The meal insert failed; its items had no id to attach to.
    Failed {
        name: String,
        error: String,
        items_skipped: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayOutcome {
    pub date: String,
    pub status: DayStatus,
    pub meals: Vec<MealOutcome>,
}

impl DayOutcome {
    pub fn items_synced(&self) -> usize {
        self.meals
            .iter()
            .map(|m| match m {
                MealOutcome::Synced { items_synced, .. } => *items_synced,
                _ => 0,
            })
            .sum()
    }
}

/// Per-record results of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub days: Vec<DayOutcome>,
}

impl SyncReport {
    fn count_days(&self, pred: impl Fn(&DayStatus) -> bool) -> usize {
        self.days.iter().filter(|d| pred(&d.status)).count()
    }

    fn meals(&self) -> impl Iterator<Item = &MealOutcome> {
        self.days.iter().flat_map(|d| d.meals.iter())
    }

    pub fn days_created(&self) -> usize {
        self.count_days(|s| matches!(s, DayStatus::Created))
    }

    pub fn days_updated(&self) -> usize {
        self.count_days(|s| matches!(s, DayStatus::Updated))
    }

    pub fn days_failed(&self) -> usize {
        self.count_days(|s| matches!(s, DayStatus::Failed(_)))
    }

    pub fn meals_synced(&self) -> usize {
        self.meals()
            .filter(|m| matches!(m, MealOutcome::Synced { .. }))
            .count()
    }

    pub fn meals_failed(&self) -> usize {
        self.meals()
            .filter(|m| matches!(m, MealOutcome::Failed { .. }))
            .count()
    }

    pub fn items_synced(&self) -> usize {
        self.days.iter().map(DayOutcome::items_synced).sum()
    }

    pub fn items_failed(&self) -> usize {
        self.meals()
            .map(|m| match m {
                MealOutcome::Synced { items_failed, .. } => *items_failed,
                _ => 0,
            })
            .sum()
    }

    /// Items never sent because their meal did not make it.
    pub fn items_skipped(&self) -> usize {
        self.meals()
            .map(|m| match m {
                MealOutcome::Failed { items_skipped, .. } => *items_skipped,
                MealOutcome::Synced { .. } => 0,
            })
            .sum()
    }

    pub fn has_failures(&self) -> bool {
        self.days_failed() > 0 || self.meals_failed() > 0 || self.items_failed() > 0
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Days:  {} created, {} updated, {} failed",
            self.days_created(),
            self.days_updated(),
            self.days_failed()
        )?;
        writeln!(
            f,
            "Meals: {} synced, {} failed",
            self.meals_synced(),
            self.meals_failed()
        )?;
        write!(
            f,
            "Items: {} synced, {} failed, {} skipped",
            self.items_synced(),
            self.items_failed(),
            self.items_skipped()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let report = SyncReport {
            days: vec![
                DayOutcome {
                    date: "2024-01-01".into(),
                    status: DayStatus::Created,
                    meals: vec![
                        MealOutcome::Synced {
                            name: "A".into(),
                            remote_id: 1,
                            items_synced: 2,
                            items_failed: 1,
                        },
                        MealOutcome::Failed {
                            name: "B".into(),
                            error: "status 400".into(),
                            items_skipped: 3,
                        },
                    ],
                },
                DayOutcome {
                    date: "2024-01-02".into(),
                    status: DayStatus::Updated,
                    meals: vec![],
                },
                DayOutcome {
                    date: "2024-01-03".into(),
                    status: DayStatus::Failed("timeout".into()),
                    meals: vec![MealOutcome::Synced {
                        name: "C".into(),
                        remote_id: 7,
                        items_synced: 1,
                        items_failed: 0,
                    }],
                },
            ],
        };

        assert_eq!(report.days_created(), 1);
        assert_eq!(report.days_updated(), 1);
        assert_eq!(report.days_failed(), 1);
        assert_eq!(report.meals_synced(), 2);
        assert_eq!(report.meals_failed(), 1);
        assert_eq!(report.items_synced(), 3);
        assert_eq!(report.items_failed(), 1);
        assert_eq!(report.items_skipped(), 3);
        assert!(report.has_failures());

        let text = report.to_string();
        assert!(text.contains("Days:  1 created, 1 updated, 1 failed"));
        assert!(text.contains("Items: 3 synced, 1 failed, 3 skipped"));
    }

    #[test]
    fn test_empty_report_has_no_failures() {
        assert!(!SyncReport::default().has_failures());
    }
}
