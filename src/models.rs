use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SegakError, SegakResult};

pub const MIN_ITEM_SCORE: i64 = 1;
pub const MAX_ITEM_SCORE: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegakScore {
    pub bmi: u8,
    pub naik_turun_bangku: u8,
    pub tekan_tubi: u8,
    pub ringkuk_tubi: u8,
    pub jangkauan_melunjur: u8,
}

impl SegakScore {
    pub fn new(values: [i64; 5]) -> SegakResult<Self> {
        let mut score = Self::lowest();
        for (field, value) in ScoreField::ALL.into_iter().zip(values) {
            score = score.with_field(field, value)?;
        }
        Ok(score)
    }

    pub const fn lowest() -> Self {
        Self {
            bmi: 1,
            naik_turun_bangku: 1,
            tekan_tubi: 1,
            ringkuk_tubi: 1,
            jangkauan_melunjur: 1,
        }
    }

    pub fn get(&self, field: ScoreField) -> u8 {
        match field {
            ScoreField::Bmi => self.bmi,
            ScoreField::NaikTurunBangku => self.naik_turun_bangku,
            ScoreField::TekanTubi => self.tekan_tubi,
            ScoreField::RingkukTubi => self.ringkuk_tubi,
            ScoreField::JangkauanMelunjur => self.jangkauan_melunjur,
        }
    }

    pub fn with_field(&self, field: ScoreField, value: i64) -> SegakResult<Self> {
        let value = validate_item(field, value)?;
        let mut next = *self;
        match field {
            ScoreField::Bmi => next.bmi = value,
            ScoreField::NaikTurunBangku => next.naik_turun_bangku = value,
            ScoreField::TekanTubi => next.tekan_tubi = value,
            ScoreField::RingkukTubi => next.ringkuk_tubi = value,
            ScoreField::JangkauanMelunjur => next.jangkauan_melunjur = value,
        }
        Ok(next)
    }

    pub fn validate(&self) -> SegakResult<()> {
        for field in ScoreField::ALL {
            validate_item(field, i64::from(self.get(field)))?;
        }
        Ok(())
    }

    pub fn values(&self) -> [u8; 5] {
        ScoreField::ALL.map(|field| self.get(field))
    }
}

fn validate_item(field: ScoreField, value: i64) -> SegakResult<u8> {
    if !(MIN_ITEM_SCORE..=MAX_ITEM_SCORE).contains(&value) {
        return Err(SegakError::ScoreOutOfRange {
            field: field.key(),
            value,
        });
    }
    Ok(value as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreField {
    Bmi,
    NaikTurunBangku,
    TekanTubi,
    RingkukTubi,
    JangkauanMelunjur,
}

impl ScoreField {
    pub const ALL: [ScoreField; 5] = [
        ScoreField::Bmi,
        ScoreField::NaikTurunBangku,
        ScoreField::TekanTubi,
        ScoreField::RingkukTubi,
        ScoreField::JangkauanMelunjur,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ScoreField::Bmi => "bmi",
            ScoreField::NaikTurunBangku => "naikTurunBangku",
            ScoreField::TekanTubi => "tekanTubi",
            ScoreField::RingkukTubi => "ringkukTubi",
            ScoreField::JangkauanMelunjur => "jangkauanMelunjur",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreField::Bmi => "BMI",
            ScoreField::NaikTurunBangku => "Naik Turun Bangku",
            ScoreField::TekanTubi => "Tekan Tubi",
            ScoreField::RingkukTubi => "Ringkuk Tubi Separa",
            ScoreField::JangkauanMelunjur => "Jangkauan Melunjur",
        }
    }
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScoreField {
    type Err = SegakError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "bmi" => Ok(ScoreField::Bmi),
            "naikturunbangku" | "stepup" | "steptest" => Ok(ScoreField::NaikTurunBangku),
            "tekantubi" | "pushup" | "pushups" => Ok(ScoreField::TekanTubi),
            "ringkuktubi" | "ringkuktubisepara" | "curlup" | "curlups" => {
                Ok(ScoreField::RingkukTubi)
            }
            "jangkauanmelunjur" | "sitandreach" => Ok(ScoreField::JangkauanMelunjur),
            _ => Err(SegakError::InvalidField {
                field: "score field",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "Lelaki", alias = "Male")]
    Male,
    #[serde(rename = "Perempuan", alias = "Female")]
    Female,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Lelaki",
            Gender::Female => "Perempuan",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gender {
    type Err = SegakError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lelaki" | "male" | "m" | "l" => Ok(Gender::Male),
            "perempuan" | "female" | "f" | "p" => Ok(Gender::Female),
            _ => Err(SegakError::InvalidField {
                field: "gender",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassLevel {
    #[serde(rename = "Tahun 4")]
    Year4,
    #[serde(rename = "Tahun 5")]
    Year5,
    #[serde(rename = "Tahun 6")]
    Year6,
}

impl ClassLevel {
    pub fn label(self) -> &'static str {
        match self {
            ClassLevel::Year4 => "Tahun 4",
            ClassLevel::Year5 => "Tahun 5",
            ClassLevel::Year6 => "Tahun 6",
        }
    }
}

impl fmt::Display for ClassLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ClassLevel {
    type Err = SegakError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "4" | "t4" | "y4" | "tahun4" | "year4" => Ok(ClassLevel::Year4),
            "5" | "t5" | "y5" | "tahun5" | "year5" => Ok(ClassLevel::Year5),
            "6" | "t6" | "y6" | "tahun6" | "year6" => Ok(ClassLevel::Year6),
            _ => Err(SegakError::InvalidField {
                field: "class",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Phase1,
    Phase2,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Phase1 => "Fasa 1",
            Phase::Phase2 => "Fasa 2",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Phase {
    type Err = SegakError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "1" | "phase1" | "fasa1" | "p1" => Ok(Phase::Phase1),
            "2" | "phase2" | "fasa2" | "p2" => Ok(Phase::Phase2),
            _ => Err(SegakError::InvalidField {
                field: "phase",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub ic_number: String,
    pub class: ClassLevel,
    pub phase1: SegakScore,
    pub phase2: SegakScore,
}

impl Student {
    pub fn scores(&self, phase: Phase) -> &SegakScore {
        match phase {
            Phase::Phase1 => &self.phase1,
            Phase::Phase2 => &self.phase2,
        }
    }

    pub fn scores_mut(&mut self, phase: Phase) -> &mut SegakScore {
        match phase {
            Phase::Phase1 => &mut self.phase1,
            Phase::Phase2 => &mut self.phase2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub ic_number: String,
    pub class: ClassLevel,
    pub phase1: SegakScore,
    pub phase2: SegakScore,
}

impl NewStudent {
    pub fn into_student(self, id: u64) -> Student {
        Student {
            id,
            name: self.name,
            age: self.age,
            gender: self.gender,
            ic_number: self.ic_number,
            class: self.class,
            phase1: self.phase1,
            phase2: self.phase2,
        }
    }
}
