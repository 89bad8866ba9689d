//! Parser for the daily sleep and nutrition log.
//!
//! The log is a markdown file made of day sections:
//!
//! ```text
//! ## 2024-01-01
//! - sleep: deitei 23:00 -> acordou 07:00; qualidade: BOA
//! - summary: 2000 kcal, 150g ptn, 200g carb, 60g fat
//! - notes: treino leve
//!   - Breakfast (500 kcal, 30g ptn): Eggs (200 kcal, 15g ptn), Toast (300 kcal, 15g ptn)
//! ```
//!
//! Every line is matched on its own against a fixed set of shapes. A line that
//! matches none of them, or that matches but carries a number that does not
//! fit, is dropped and parsing carries on. Parsing never fails.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::models::{Day, Item, Meal};

/// Delimiter that opens every day section.
pub const SECTION_MARKER: &str = "## ";

const SLEEP_PREFIX: &str = "- sleep:";
const SUMMARY_PREFIX: &str = "- summary:";
const NOTES_PREFIX: &str = "- notes:";
const MEAL_PREFIX: &str = "  -";

/// A partial update extracted from a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineUpdate {
    Sleep {
        start: String,
        end: String,
        quality: String,
    },
    Summary {
        kcal: u32,
        ptn: u32,
        carb: u32,
        fat: u32,
    },
    Notes(String),
    Meal(Meal),
}

fn sleep_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"deitei (\d{2}:\d{2}) -> acordou (\d{2}:\d{2}); qualidade: ([^;]+)")
            .expect("sleep pattern is valid")
    })
}

fn summary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"summary: (\d+) kcal, (\d+)g ptn, (\d+)g carb, (\d+)g fat")
            .expect("summary pattern is valid")
    })
}

fn meal_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([^(]+)\s*\((\d+)\s*kcal,\s*(\d+)g\s*ptn\)")
            .expect("meal header pattern is valid")
    })
}

fn meal_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([^,]+?)\s*\((\d+)\s*kcal,\s*(\d+)g\s*ptn\)")
            .expect("meal item pattern is valid")
    })
}

/// Reads and parses a log file. Only the read itself can fail.
pub fn parse_file(path: &Path) -> std::io::Result<Vec<Day>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_log(&content))
}

/// Parses a whole log into days, in the order the sections appear.
///
/// Text before the first marker is discarded. Dates are not validated,
/// sorted or deduplicated.
pub fn parse_log(content: &str) -> Vec<Day> {
    content
        .split(SECTION_MARKER)
        .skip(1)
        .map(parse_section)
        .collect()
}

/// Parses one section. Its first line, trimmed, is the date label.
pub fn parse_section(section: &str) -> Day {
    let mut lines = section.lines();
    let date = lines.next().unwrap_or_default().trim();
    let mut day = Day::new(date);

    for (idx, line) in lines.enumerate() {
        match parse_line(line) {
            Some(update) => apply(&mut day, update),
            None => {
                if is_recognized_prefix(line) {
                    tracing::debug!(
                        date = %day.date,
                        line = idx + 2,
                        "skipping malformed line: {}",
                        line.trim()
                    );
                }
            }
        }
    }

    day
}

/// Runs every line rule. At most one rule can match a given line since they
/// are gated on distinct prefixes.
pub fn parse_line(line: &str) -> Option<LineUpdate> {
    parse_meal(line)
        .or_else(|| parse_sleep(line))
        .or_else(|| parse_summary(line))
        .or_else(|| parse_notes(line))
}

fn is_recognized_prefix(line: &str) -> bool {
    let trimmed = line.trim();
    line.starts_with(MEAL_PREFIX)
        || trimmed.starts_with(SLEEP_PREFIX)
        || trimmed.starts_with(SUMMARY_PREFIX)
        || trimmed.starts_with(NOTES_PREFIX)
}

fn apply(day: &mut Day, update: LineUpdate) {
    match update {
        LineUpdate::Sleep {
            start,
            end,
            quality,
        } => {
            day.sleep_start = Some(start);
            day.sleep_end = Some(end);
            day.sleep_quality = quality;
        }
        LineUpdate::Summary {
            kcal,
            ptn,
            carb,
            fat,
        } => {
            day.kcal_total = kcal;
            day.ptn_total = ptn;
            day.carb_total = carb;
            day.fat_total = fat;
        }
        LineUpdate::Notes(notes) => day.notes = notes,
        LineUpdate::Meal(meal) => day.meals.push(meal),
    }
}

pub fn parse_sleep(line: &str) -> Option<LineUpdate> {
    let line = line.trim();
    if !line.starts_with(SLEEP_PREFIX) {
        return None;
    }
    let caps = sleep_re().captures(line)?;
    Some(LineUpdate::Sleep {
        start: caps[1].to_string(),
        end: caps[2].to_string(),
        quality: caps[3].trim().to_string(),
    })
}

pub fn parse_summary(line: &str) -> Option<LineUpdate> {
    let line = line.trim();
    if !line.starts_with(SUMMARY_PREFIX) {
        return None;
    }
    let caps = summary_re().captures(line)?;
    Some(LineUpdate::Summary {
        kcal: caps[1].parse().ok()?,
        ptn: caps[2].parse().ok()?,
        carb: caps[3].parse().ok()?,
        fat: caps[4].parse().ok()?,
    })
}

pub fn parse_notes(line: &str) -> Option<LineUpdate> {
    let rest = line.trim().strip_prefix(NOTES_PREFIX)?;
    Some(LineUpdate::Notes(rest.trim().to_string()))
}

/// Meal lines sit one level below the top-level bullets. The header is
/// mandatory; items after the first colon are optional and any that do not
/// match the item shape are ignored. A number that does not fit drops the
/// whole line.
pub fn parse_meal(line: &str) -> Option<LineUpdate> {
    let text = line.strip_prefix(MEAL_PREFIX)?.trim();
    let caps = meal_header_re().captures(text)?;

    let mut meal = Meal::new(
        caps[1].trim(),
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    );

    if let Some((_, details)) = text.split_once(':') {
        for item in meal_item_re().captures_iter(details) {
            meal.items.push(Item::new(
                item[1].trim(),
                item[2].parse().ok()?,
                item[3].parse().ok()?,
            ));
        }
    }

    Some(LineUpdate::Meal(meal))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "## 2024-01-01\n- sleep: deitei 23:00 -> acordou 07:00; qualidade: BOA\n- summary: 2000 kcal, 150g ptn, 200g carb, 60g fat\n  - Breakfast (500 kcal, 30g ptn): Eggs (200 kcal, 15g ptn), Toast (300 kcal, 15g ptn)";

    #[test]
    fn test_parse_example_section() {
        let days = parse_log(EXAMPLE);
        assert_eq!(days.len(), 1);

        let day = &days[0];
        assert_eq!(day.date, "2024-01-01");
        assert_eq!(day.kcal_total, 2000);
        assert_eq!(day.ptn_total, 150);
        assert_eq!(day.carb_total, 200);
        assert_eq!(day.fat_total, 60);
        assert_eq!(day.sleep_start.as_deref(), Some("23:00"));
        assert_eq!(day.sleep_end.as_deref(), Some("07:00"));
        assert_eq!(day.sleep_quality, "BOA");

        assert_eq!(day.meals.len(), 1);
        let meal = &day.meals[0];
        assert_eq!(meal.name, "Breakfast");
        assert_eq!(meal.kcal, 500);
        assert_eq!(meal.ptn, 30);
        assert_eq!(
            meal.items,
            vec![Item::new("Eggs", 200, 15), Item::new("Toast", 300, 15)]
        );
    }

    #[test]
    fn test_preamble_before_first_marker_is_discarded() {
        let log = "# Sleep & nutrition\n- summary: 1 kcal, 1g ptn, 1g carb, 1g fat\n## 2024-01-02\n";
        let days = parse_log(log);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, "2024-01-02");
        assert_eq!(days[0].kcal_total, 0);
    }

    #[test]
    fn test_sections_keep_source_order_and_duplicates() {
        let log = "## 2024-01-03\n## 2024-01-01\n## 2024-01-03\n";
        let dates: Vec<String> = parse_log(log).into_iter().map(|d| d.date).collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-01", "2024-01-03"]);
    }

    #[test]
    fn test_missing_lines_leave_defaults() {
        let day = parse_section("2024-01-01\n- something else entirely\n");

        assert_eq!(day.kcal_total, 0);
        assert_eq!(day.sleep_start, None);
        assert_eq!(day.sleep_end, None);
        assert_eq!(day.sleep_quality, "BOA");
        assert!(day.notes.is_empty());
        assert!(day.meals.is_empty());
    }

    #[test]
    fn test_unmatched_sleep_line_sets_nothing() {
        let day = parse_section("2024-01-01\n- sleep: dormi mal\n");
        assert_eq!(day.sleep_start, None);
        assert_eq!(day.sleep_quality, "BOA");
    }

    #[test]
    fn test_sleep_quality_stops_at_semicolon() {
        let update = parse_sleep("- sleep: deitei 00:30 -> acordou 08:15; qualidade: RUIM ; acordou 2x");
        assert_eq!(
            update,
            Some(LineUpdate::Sleep {
                start: "00:30".into(),
                end: "08:15".into(),
                quality: "RUIM".into(),
            })
        );
    }

    #[test]
    fn test_notes_are_trimmed() {
        let day = parse_section("2024-01-01\n- notes:   dor de cabeça leve  \n");
        assert_eq!(day.notes, "dor de cabeça leve");
    }

    #[test]
    fn test_malformed_meal_line_is_dropped() {
        let section = "2024-01-01\n  - Lunch (700 kcal, 40g ptn)\n  - Dinner (abc kcal, 30g ptn): Rice (200 kcal, 4g ptn)\n";
        let day = parse_section(section);

        assert_eq!(day.meals.len(), 1);
        assert_eq!(day.meals[0].name, "Lunch");
        assert!(day.meals[0].items.is_empty());
    }

    #[test]
    fn test_overflowing_number_drops_only_that_line() {
        let section = "2024-01-01\n  - Lunch (99999999999 kcal, 40g ptn)\n  - Dinner (600 kcal, 30g ptn)\n";
        let day = parse_section(section);

        assert_eq!(day.meals.len(), 1);
        assert_eq!(day.meals[0].name, "Dinner");
    }

    #[test]
    fn test_overflowing_item_drops_whole_meal() {
        let line = "  - Lunch (700 kcal, 40g ptn): Rice (99999999999 kcal, 4g ptn)";
        assert_eq!(parse_meal(line), None);
    }

    #[test]
    fn test_overflowing_summary_keeps_defaults() {
        let day = parse_section("2024-01-01\n- summary: 99999999999 kcal, 1g ptn, 1g carb, 1g fat\n");
        assert_eq!(day.kcal_total, 0);
        assert_eq!(day.ptn_total, 0);
    }

    #[test]
    fn test_top_level_bullet_is_not_a_meal() {
        let day = parse_section("2024-01-01\n- Lunch (700 kcal, 40g ptn)\n");
        assert!(day.meals.is_empty());
    }

    #[test]
    fn test_meal_items_skip_unmatched_entries() {
        let line = "  - Lunch (700 kcal, 40g ptn): Rice (200 kcal, 4g ptn), salad, Beans (150 kcal, 9g ptn)";
        let Some(LineUpdate::Meal(meal)) = parse_meal(line) else {
            panic!("expected a meal");
        };
        assert_eq!(meal.items.len(), 2);
        assert_eq!(meal.items[0].name, "Rice");
        assert_eq!(meal.items[1].name, "Beans");
    }

    #[test]
    fn test_meals_and_items_keep_encounter_order() {
        let section = "2024-01-01\n  - A (1 kcal, 1g ptn): x (1 kcal, 1g ptn), y (1 kcal, 1g ptn)\n- notes: n\n  - B (2 kcal, 2g ptn)\n  - C (3 kcal, 3g ptn)\n";
        let day = parse_section(section);

        let names: Vec<&str> = day.meals.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(day.meals[0].items[0].name, "x");
        assert_eq!(day.meals[0].items[1].name, "y");
    }

    #[test]
    fn test_totals_are_not_recomputed_from_meals() {
        let section = "2024-01-01\n- summary: 100 kcal, 10g ptn, 10g carb, 1g fat\n  - A (900 kcal, 90g ptn)\n";
        let day = parse_section(section);
        assert_eq!(day.kcal_total, 100);
        assert_eq!(day.ptn_total, 10);
    }

    #[test]
    fn test_crlf_line_endings() {
        let log = "## 2024-01-01\r\n- notes: ok\r\n  - A (1 kcal, 2g ptn)\r\n";
        let days = parse_log(log);
        assert_eq!(days[0].date, "2024-01-01");
        assert_eq!(days[0].notes, "ok");
        assert_eq!(days[0].meals.len(), 1);
    }

    #[test]
    fn test_rendered_day_reparses_to_same_structure() {
        let log = "## 2024-01-02\n- sleep: deitei 22:45 -> acordou 06:30; qualidade: OTIMA\n- summary: 2500 kcal, 180g ptn, 250g carb, 70g fat\n- notes: treino de perna\n  - Almoço (900 kcal, 60g ptn): Arroz (300 kcal, 6g ptn), Frango (400 kcal, 50g ptn), Feijão (200 kcal, 4g ptn)\n  - Jantar (700 kcal, 45g ptn): Omelete (400 kcal, 30g ptn)\n  - Lanche (300 kcal, 20g ptn)\n";
        let days = parse_log(log);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].meals.len(), 3);
        assert_eq!(days[0].item_count(), 4);

        let rendered: String = days.iter().map(|d| d.to_string()).collect();
        let reparsed = parse_log(&rendered);
        assert_eq!(reparsed, days);
    }

    #[test]
    fn test_parse_file_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(parse_file(&dir.path().join("missing.md")).is_err());
    }
}
