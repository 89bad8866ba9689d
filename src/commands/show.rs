use clap::Args;

use super::OutputFormat;
use healthlog::aggregate::{aggregate_days, keyed_by_date};
use healthlog::db::DayRepository;

/// Show stored days with their meals
#[derive(Args)]
pub struct ShowCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Only show the most recent N days
    #[arg(long, short = 'n')]
    limit: Option<usize>,
}

impl ShowCommand {
    pub async fn run(&self, repo: &DayRepository) -> Result<(), Box<dyn std::error::Error>> {
        let mut views = aggregate_days(repo).await?;
        if let Some(limit) = self.limit {
            views.truncate(limit);
        }

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&keyed_by_date(views)?)?);
            }
            OutputFormat::Text => {
                if views.is_empty() {
                    println!("No days stored.");
                    return Ok(());
                }
                for view in &views {
                    println!(
                        "{}  {} kcal, {}g ptn, {}g carb, {}g fat",
                        view.date,
                        view.summary.kcal,
                        view.summary.ptn,
                        view.summary.carb,
                        view.summary.fat
                    );
                    if let (Some(start), Some(end)) = (&view.sleep.start, &view.sleep.end) {
                        println!(
                            "  sleep: {} -> {} ({})",
                            start,
                            end,
                            view.sleep.quality.as_deref().unwrap_or("-")
                        );
                    }
                    for meal in &view.meals {
                        println!("  {} ({} kcal, {}g ptn)", meal.name, meal.kcal, meal.ptn);
                        for item in &meal.items {
                            println!("    - {} ({} kcal, {}g ptn)", item.name, item.kcal, item.ptn);
                        }
                    }
                    for note in &view.notes {
                        println!("  notes: {}", note);
                    }
                    println!();
                }
            }
        }

        Ok(())
    }
}
