use serde::Serialize;

use crate::error::{SegakError, SegakResult};
use crate::models::{Gender, Phase, ScoreField, Student};
use crate::scoring::{self, FitnessLevel};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformerSummary {
    pub id: u64,
    pub name: String,
    pub total_score: i32,
    pub level: FitnessLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelCount {
    pub level: FitnessLevel,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldAverages {
    pub bmi: f64,
    pub naik_turun_bangku: f64,
    pub tekan_tubi: f64,
    pub ringkuk_tubi: f64,
    pub jangkauan_melunjur: f64,
}

impl FieldAverages {
    pub fn get(&self, field: ScoreField) -> f64 {
        match field {
            ScoreField::Bmi => self.bmi,
            ScoreField::NaikTurunBangku => self.naik_turun_bangku,
            ScoreField::TekanTubi => self.tekan_tubi,
            ScoreField::RingkukTubi => self.ringkuk_tubi,
            ScoreField::JangkauanMelunjur => self.jangkauan_melunjur,
        }
    }

    pub fn total(&self) -> f64 {
        scoring::round_1dp(ScoreField::ALL.iter().map(|f| self.get(*f)).sum())
    }

    pub fn level(&self) -> FitnessLevel {
        scoring::classify_fitness_level(self.total())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterSummary {
    pub phase: Phase,
    pub student_count: usize,
    pub average_total_score: f64,
    pub best_performer: PerformerSummary,
    pub worst_performer: PerformerSummary,
    pub distribution: Vec<LevelCount>,
    pub field_averages: FieldAverages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Headcount {
    pub total: usize,
    pub male: usize,
    pub female: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDelta {
    pub field: ScoreField,
    pub phase1: f64,
    pub phase2: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseComparison {
    pub phase1: FieldAverages,
    pub phase2: FieldAverages,
    pub fields: Vec<FieldDelta>,
    pub average_total_delta: f64,
    pub improved: usize,
    pub declined: usize,
    pub unchanged: usize,
}

pub fn aggregate_roster_statistics(students: &[Student], phase: Phase) -> SegakResult<RosterSummary> {
    let best = best_performer(students, phase).ok_or(SegakError::NoData)?;
    let worst = worst_performer(students, phase).ok_or(SegakError::NoData)?;

    Ok(RosterSummary {
        phase,
        student_count: students.len(),
        average_total_score: average_total_score(students, phase)?,
        best_performer: performer(best, phase),
        worst_performer: performer(worst, phase),
        distribution: level_distribution(students, phase),
        field_averages: field_averages(students, phase)?,
    })
}

pub fn average_total_score(students: &[Student], phase: Phase) -> SegakResult<f64> {
    if students.is_empty() {
        return Err(SegakError::NoData);
    }
    Ok(scoring::round_1dp(raw_average_total(students, phase)))
}

fn raw_average_total(students: &[Student], phase: Phase) -> f64 {
    let sum: i64 = students
        .iter()
        .map(|s| i64::from(scoring::total_score(s.scores(phase))))
        .sum();
    sum as f64 / students.len() as f64
}

// Lowest total wins; ties go to whoever appears first.
pub fn best_performer(students: &[Student], phase: Phase) -> Option<&Student> {
    select_first_by(students, phase, |candidate, current| candidate < current)
}

pub fn worst_performer(students: &[Student], phase: Phase) -> Option<&Student> {
    select_first_by(students, phase, |candidate, current| candidate > current)
}

fn select_first_by<F>(students: &[Student], phase: Phase, replaces: F) -> Option<&Student>
where
    F: Fn(i32, i32) -> bool,
{
    let mut iter = students.iter();
    let first = iter.next()?;
    let mut selected = (first, scoring::total_score(first.scores(phase)));

    for student in iter {
        let total = scoring::total_score(student.scores(phase));
        if replaces(total, selected.1) {
            selected = (student, total);
        }
    }

    Some(selected.0)
}

fn performer(student: &Student, phase: Phase) -> PerformerSummary {
    let total_score = scoring::total_score(student.scores(phase));
    PerformerSummary {
        id: student.id,
        name: student.name.clone(),
        total_score,
        level: scoring::classify_fitness_level(f64::from(total_score)),
    }
}

pub fn level_distribution(students: &[Student], phase: Phase) -> Vec<LevelCount> {
    let mut counts = [0usize; 5];
    for student in students {
        let level = scoring::level_for(student.scores(phase));
        counts[level as usize] += 1;
    }

    FitnessLevel::ALL
        .into_iter()
        .zip(counts)
        .map(|(level, count)| LevelCount { level, count })
        .collect()
}

pub fn field_averages(students: &[Student], phase: Phase) -> SegakResult<FieldAverages> {
    if students.is_empty() {
        return Err(SegakError::NoData);
    }

    let count = students.len() as f64;
    let mean = |field: ScoreField| {
        let sum: u64 = students
            .iter()
            .map(|s| u64::from(s.scores(phase).get(field)))
            .sum();
        scoring::round_1dp(sum as f64 / count)
    };

    Ok(FieldAverages {
        bmi: mean(ScoreField::Bmi),
        naik_turun_bangku: mean(ScoreField::NaikTurunBangku),
        tekan_tubi: mean(ScoreField::TekanTubi),
        ringkuk_tubi: mean(ScoreField::RingkukTubi),
        jangkauan_melunjur: mean(ScoreField::JangkauanMelunjur),
    })
}

pub fn compare_phases(students: &[Student]) -> SegakResult<PhaseComparison> {
    let phase1 = field_averages(students, Phase::Phase1)?;
    let phase2 = field_averages(students, Phase::Phase2)?;

    let fields = ScoreField::ALL
        .into_iter()
        .map(|field| FieldDelta {
            field,
            phase1: phase1.get(field),
            phase2: phase2.get(field),
            delta: scoring::round_1dp(phase2.get(field) - phase1.get(field)),
        })
        .collect();

    let (mut improved, mut declined, mut unchanged) = (0, 0, 0);
    for student in students {
        let before = scoring::total_score(&student.phase1);
        let after = scoring::total_score(&student.phase2);
        match after.cmp(&before) {
            std::cmp::Ordering::Less => improved += 1,
            std::cmp::Ordering::Greater => declined += 1,
            std::cmp::Ordering::Equal => unchanged += 1,
        }
    }

    let average_total_delta = scoring::round_1dp(phase2.total() - phase1.total());

    Ok(PhaseComparison {
        phase1,
        phase2,
        fields,
        average_total_delta,
        improved,
        declined,
        unchanged,
    })
}

pub fn headcount(students: &[Student]) -> Headcount {
    let male = students.iter().filter(|s| s.gender == Gender::Male).count();
    let female = students.iter().filter(|s| s.gender == Gender::Female).count();
    Headcount {
        total: students.len(),
        male,
        female,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassLevel, SegakScore};

    fn student(id: u64, name: &str, phase1: [i64; 5], phase2: [i64; 5]) -> Student {
        Student {
            id,
            name: name.to_string(),
            age: 10,
            gender: if id % 2 == 0 { Gender::Female } else { Gender::Male },
            ic_number: format!("150101-10-{:04}", id),
            class: ClassLevel::Year4,
            phase1: SegakScore::new(phase1).unwrap(),
            phase2: SegakScore::new(phase2).unwrap(),
        }
    }

    fn three_tier_roster() -> Vec<Student> {
        vec![
            student(1, "Aina", [1; 5], [1; 5]),
            student(2, "Badrul", [2; 5], [1; 5]),
            student(3, "Chong", [5; 5], [4; 5]),
        ]
    }

    #[test]
    fn summary_matches_worked_example() {
        let roster = three_tier_roster();
        let summary = aggregate_roster_statistics(&roster, Phase::Phase1).unwrap();

        assert_eq!(summary.student_count, 3);
        assert_eq!(summary.average_total_score, 13.3);
        assert_eq!(summary.best_performer.id, 1);
        assert_eq!(summary.best_performer.total_score, 5);
        assert_eq!(summary.worst_performer.id, 3);
        assert_eq!(summary.worst_performer.total_score, 25);

        let counts: Vec<usize> = summary.distribution.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![1, 1, 0, 0, 1]);
    }

    #[test]
    fn empty_roster_signals_no_data() {
        assert_eq!(
            aggregate_roster_statistics(&[], Phase::Phase1),
            Err(SegakError::NoData)
        );
        assert_eq!(best_performer(&[], Phase::Phase1), None);
        assert_eq!(worst_performer(&[], Phase::Phase2), None);
        assert_eq!(field_averages(&[], Phase::Phase1), Err(SegakError::NoData));
        assert_eq!(compare_phases(&[]), Err(SegakError::NoData));
    }

    #[test]
    fn ties_resolve_to_earliest_student() {
        let roster = vec![
            student(10, "First", [3; 5], [3; 5]),
            student(11, "Second", [1; 5], [3; 5]),
            student(12, "Third", [5; 5], [3; 5]),
            student(13, "Fourth", [1; 5], [3; 5]),
            student(14, "Fifth", [5; 5], [3; 5]),
        ];

        assert_eq!(best_performer(&roster, Phase::Phase1).unwrap().id, 11);
        assert_eq!(worst_performer(&roster, Phase::Phase1).unwrap().id, 12);
        assert_eq!(best_performer(&roster, Phase::Phase2).unwrap().id, 10);
        assert_eq!(worst_performer(&roster, Phase::Phase2).unwrap().id, 10);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let roster = three_tier_roster();
        let first = aggregate_roster_statistics(&roster, Phase::Phase2).unwrap();
        let second = aggregate_roster_statistics(&roster, Phase::Phase2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn distribution_always_lists_every_tier() {
        let roster = vec![student(1, "Solo", [3; 5], [3; 5])];
        let distribution = level_distribution(&roster, Phase::Phase1);
        assert_eq!(distribution.len(), 5);
        assert_eq!(distribution[2].level, FitnessLevel::Baik);
        assert_eq!(distribution[2].count, 1);
        assert_eq!(distribution.iter().map(|c| c.count).sum::<usize>(), 1);
    }

    #[test]
    fn field_averages_round_each_item() {
        let roster = vec![
            student(1, "A", [1, 2, 3, 4, 5], [1; 5]),
            student(2, "B", [2, 2, 3, 5, 5], [1; 5]),
            student(3, "C", [2, 3, 4, 5, 5], [1; 5]),
        ];
        let averages = field_averages(&roster, Phase::Phase1).unwrap();
        assert_eq!(averages.bmi, 1.7);
        assert_eq!(averages.naik_turun_bangku, 2.3);
        assert_eq!(averages.tekan_tubi, 3.3);
        assert_eq!(averages.ringkuk_tubi, 4.7);
        assert_eq!(averages.jangkauan_melunjur, 5.0);
        assert_eq!(averages.total(), 17.0);
        assert_eq!(averages.level(), FitnessLevel::KurangCergas);
    }

    #[test]
    fn compare_phases_counts_direction_of_change() {
        let mut roster = three_tier_roster();
        roster.push(student(4, "Devi", [2; 5], [3; 5]));

        let comparison = compare_phases(&roster).unwrap();
        assert_eq!(comparison.improved, 2);
        assert_eq!(comparison.declined, 1);
        assert_eq!(comparison.unchanged, 1);
        assert_eq!(comparison.fields.len(), 5);
        assert_eq!(comparison.fields[0].phase1, 2.5);
        assert_eq!(comparison.fields[0].phase2, 2.3);
        assert_eq!(comparison.fields[0].delta, -0.2);
        assert_eq!(comparison.phase1.total(), 12.5);
        assert_eq!(comparison.phase2.total(), 11.5);
        assert_eq!(comparison.average_total_delta, -1.0);
    }

    #[test]
    fn headcount_splits_by_gender() {
        let roster = three_tier_roster();
        assert_eq!(
            headcount(&roster),
            Headcount {
                total: 3,
                male: 2,
                female: 1
            }
        );
        assert_eq!(headcount(&[]).total, 0);
    }
}
