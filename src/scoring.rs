use serde::Serialize;

use crate::models::{ScoreField, SegakScore};

pub fn total_score(scores: &SegakScore) -> i32 {
    ScoreField::ALL
        .into_iter()
        .map(|field| i32::from(scores.get(field)))
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FitnessLevel {
    Cemerlang,
    SangatBaik,
    Baik,
    KurangCergas,
    TidakCergas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Good,
    Watch,
    Concern,
}

impl FitnessLevel {
    pub const ALL: [FitnessLevel; 5] = [
        FitnessLevel::Cemerlang,
        FitnessLevel::SangatBaik,
        FitnessLevel::Baik,
        FitnessLevel::KurangCergas,
        FitnessLevel::TidakCergas,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FitnessLevel::Cemerlang => "Cemerlang",
            FitnessLevel::SangatBaik => "Sangat Baik",
            FitnessLevel::Baik => "Baik",
            FitnessLevel::KurangCergas => "Kurang Cergas",
            FitnessLevel::TidakCergas => "Tidak Cergas",
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            FitnessLevel::Cemerlang => "Excellent",
            FitnessLevel::SangatBaik => "Very Good",
            FitnessLevel::Baik => "Good",
            FitnessLevel::KurangCergas => "Less Fit",
            FitnessLevel::TidakCergas => "Not Fit",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            FitnessLevel::Cemerlang => "#3B82F6",
            FitnessLevel::SangatBaik => "#10B981",
            FitnessLevel::Baik => "#F59E0B",
            FitnessLevel::KurangCergas => "#F97316",
            FitnessLevel::TidakCergas => "#EF4444",
        }
    }

    pub fn status(self) -> Status {
        match self {
            FitnessLevel::Cemerlang | FitnessLevel::SangatBaik => Status::Good,
            FitnessLevel::Baik => Status::Watch,
            FitnessLevel::KurangCergas | FitnessLevel::TidakCergas => Status::Concern,
        }
    }
}

impl Status {
    pub fn marker(self) -> &'static str {
        match self {
            Status::Good => "OK",
            Status::Watch => "~",
            Status::Concern => "!",
        }
    }
}

// Inclusive upper bounds; outer bands are open-ended and NaN lands in the
// worst tier.
pub fn classify_fitness_level(total: f64) -> FitnessLevel {
    if total <= 8.0 {
        FitnessLevel::Cemerlang
    } else if total <= 12.0 {
        FitnessLevel::SangatBaik
    } else if total <= 16.0 {
        FitnessLevel::Baik
    } else if total <= 20.0 {
        FitnessLevel::KurangCergas
    } else {
        FitnessLevel::TidakCergas
    }
}

pub fn level_for(scores: &SegakScore) -> FitnessLevel {
    classify_fitness_level(f64::from(total_score(scores)))
}

pub fn round_1dp(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
