use std::fmt::Write;

use chrono::NaiveDate;

use crate::filter::RosterFilter;
use crate::models::{Phase, ScoreField, Student};
use crate::roster::Roster;
use crate::scoring;
use crate::stats;

const NO_DATA: &str = "No data to display.";

pub fn shorten_name(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    if parts.len() > 2 {
        let initial = parts[1].chars().next().map(String::from).unwrap_or_default();
        return format!("{} {}.", parts[0], initial);
    }
    name.to_string()
}

pub fn build_report(
    roster: &Roster,
    phase: Phase,
    filter: &RosterFilter,
    generated_on: NaiveDate,
) -> String {
    let selected: Vec<Student> = filter.apply(roster.students()).into_iter().cloned().collect();

    let mut output = String::new();
    let _ = writeln!(output, "# SEGAK Fitness Report");
    let _ = writeln!(
        output,
        "Generated on {} for {} ({})",
        generated_on,
        phase,
        filter_label(filter)
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let headcount = stats::headcount(&selected);
    let _ = writeln!(output, "- Students: {}", headcount.total);
    let _ = writeln!(output, "- Male: {}", headcount.male);
    let _ = writeln!(output, "- Female: {}", headcount.female);
    match stats::average_total_score(&selected, phase) {
        Ok(average) => {
            let _ = writeln!(output, "- Average score ({}): {:.1}", phase, average);
        }
        Err(_) => {
            let _ = writeln!(output, "- Average score ({}): -", phase);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Performance Summary ({})", phase);
    match stats::aggregate_roster_statistics(&selected, phase) {
        Ok(summary) => {
            let _ = writeln!(output, "- Overall average: {:.1}", summary.average_total_score);
            let _ = writeln!(
                output,
                "- Best: {} ({})",
                summary.best_performer.total_score,
                shorten_name(&summary.best_performer.name)
            );
            let _ = writeln!(
                output,
                "- Weakest: {} ({})",
                summary.worst_performer.total_score,
                shorten_name(&summary.worst_performer.name)
            );

            let _ = writeln!(output);
            let _ = writeln!(output, "## Fitness Level Distribution ({})", phase);
            for entry in summary.distribution.iter() {
                let _ = writeln!(
                    output,
                    "- {} ({}): {}",
                    entry.level.label(),
                    entry.level.english(),
                    entry.count
                );
            }
        }
        Err(_) => {
            let _ = writeln!(output, "{}", NO_DATA);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Phase Comparison");
    match stats::compare_phases(&selected) {
        Ok(comparison) => {
            let _ = writeln!(output, "| Item | Fasa 1 | Fasa 2 | Change |");
            let _ = writeln!(output, "|---|---|---|---|");
            for field in comparison.fields.iter() {
                let _ = writeln!(
                    output,
                    "| {} | {:.1} | {:.1} | {:+.1} |",
                    field.field.label(),
                    field.phase1,
                    field.phase2,
                    field.delta
                );
            }
            let _ = writeln!(
                output,
                "| Average total | {:.1} ({}) | {:.1} ({}) | {:+.1} |",
                comparison.phase1.total(),
                comparison.phase1.level().label(),
                comparison.phase2.total(),
                comparison.phase2.level().label(),
                comparison.average_total_delta
            );
            let _ = writeln!(output);
            let _ = writeln!(
                output,
                "Improved: {}, declined: {}, unchanged: {}",
                comparison.improved, comparison.declined, comparison.unchanged
            );
        }
        Err(_) => {
            let _ = writeln!(output, "{}", NO_DATA);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Students");
    if selected.is_empty() {
        let _ = writeln!(output, "No students match this filter.");
    } else {
        let _ = writeln!(
            output,
            "| Status | Name | Class | Age | Gender | IC | Score ({}) | Level |",
            phase
        );
        let _ = writeln!(output, "|---|---|---|---|---|---|---|---|");
        for student in selected.iter() {
            let total = scoring::total_score(student.scores(phase));
            let level = scoring::classify_fitness_level(f64::from(total));
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} | {} | {} |",
                level.status().marker(),
                student.name,
                student.class,
                student.age,
                student.gender,
                student.ic_number,
                total,
                level.label()
            );
        }
    }

    output
}

fn filter_label(filter: &RosterFilter) -> String {
    if filter.is_empty() {
        return "all students".to_string();
    }

    let mut parts = Vec::new();
    if let Some(class) = filter.class {
        parts.push(class.to_string());
    }
    if let Some(gender) = filter.gender {
        parts.push(gender.to_string());
    }
    if let Some(name) = filter.name.as_deref().filter(|n| !n.is_empty()) {
        parts.push(format!("name contains \"{}\"", name));
    }
    parts.join(", ")
}

pub fn student_detail(student: &Student) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{} (id {})", student.name, student.id);
    let _ = writeln!(
        output,
        "{} | {} | age {} | IC {}",
        student.class, student.gender, student.age, student.ic_number
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "{:<22} {:>6} {:>6}", "Item", "Fasa 1", "Fasa 2");
    for field in ScoreField::ALL {
        let _ = writeln!(
            output,
            "{:<22} {:>6} {:>6}",
            field.label(),
            student.phase1.get(field),
            student.phase2.get(field)
        );
    }

    let total1 = scoring::total_score(&student.phase1);
    let total2 = scoring::total_score(&student.phase2);
    let _ = writeln!(output, "{:<22} {:>6} {:>6}", "Total", total1, total2);
    let _ = writeln!(
        output,
        "{:<22} {:>6} {:>6}",
        "Level",
        scoring::level_for(&student.phase1).label(),
        scoring::level_for(&student.phase2).label()
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClassLevel;

    fn report_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn shortens_long_names_only() {
        assert_eq!(shorten_name("Ahmad Faris bin Azman"), "Ahmad F.");
        assert_eq!(shorten_name("Tan Wei Ling"), "Tan W.");
        assert_eq!(shorten_name("Arjun Kumar"), "Arjun Kumar");
        assert_eq!(shorten_name("Mei"), "Mei");
    }

    #[test]
    fn report_covers_every_section() {
        let roster = Roster::seeded();
        let report = build_report(&roster, Phase::Phase1, &RosterFilter::new(), report_date());

        assert!(report.contains("Generated on 2026-03-02 for Fasa 1 (all students)"));
        assert!(report.contains("- Students: 6"));
        assert!(report.contains("## Fitness Level Distribution (Fasa 1)"));
        assert!(report.contains("| Naik Turun Bangku |"));
        assert!(report.contains("Nur Aisyah binti Rahman"));
        assert!(report.contains("- Best: 6 (Nur A.)"));
        assert!(report.contains("- Cemerlang (Excellent): 1"));
        assert!(report.contains("- Tidak Cergas (Not Fit): 1"));
    }

    #[test]
    fn filtered_report_only_lists_matching_students() {
        let roster = Roster::seeded();
        let filter = RosterFilter::new().with_class(ClassLevel::Year6);
        let report = build_report(&roster, Phase::Phase2, &filter, report_date());

        assert!(report.contains("(Tahun 6)"));
        assert!(report.contains("- Students: 2"));
        assert!(report.contains("Arjun a/l Kumar"));
        assert!(!report.contains("Tan Wei Ling"));
    }

    #[test]
    fn empty_selection_reports_no_data() {
        let roster = Roster::seeded();
        let filter = RosterFilter::new().with_name("nobody");
        let report = build_report(&roster, Phase::Phase1, &filter, report_date());

        assert!(report.contains("- Students: 0"));
        assert!(report.contains(NO_DATA));
        assert!(report.contains("No students match this filter."));
        assert!(!report.contains("- Best:"));
    }

    #[test]
    fn detail_lists_items_and_levels() {
        let roster = Roster::seeded();
        let detail = student_detail(roster.get(2).unwrap());
        assert!(detail.contains("Nur Aisyah binti Rahman (id 2)"));
        assert!(detail.contains("Ringkuk Tubi Separa"));
        assert!(detail.contains("Cemerlang"));
    }
}
