use chrono::Utc;
use tracing::{debug, info, warn};

use crate::auth::AdminSession;
use crate::error::{SegakError, SegakResult};
use crate::models::{ClassLevel, Gender, NewStudent, Phase, ScoreField, SegakScore, Student};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        let students = seed_students()
            .into_iter()
            .enumerate()
            .map(|(index, student)| student.into_student(index as u64 + 1))
            .collect();
        Self { students }
    }

    pub(crate) fn from_students(students: Vec<Student>) -> Self {
        Self { students }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn add(&mut self, _session: &AdminSession, student: NewStudent) -> SegakResult<u64> {
        student.phase1.validate()?;
        student.phase2.validate()?;

        let id = self.next_id()?;
        info!(id, name = %student.name, "student added");
        self.students.push(student.into_student(id));
        Ok(id)
    }

    pub fn update(&mut self, _session: &AdminSession, student: Student) -> SegakResult<()> {
        student.phase1.validate()?;
        student.phase2.validate()?;

        let slot = self
            .students
            .iter_mut()
            .find(|s| s.id == student.id)
            .ok_or(SegakError::StudentNotFound { id: student.id })?;
        debug!(id = student.id, "student updated");
        *slot = student;
        Ok(())
    }

    pub fn set_score(
        &mut self,
        _session: &AdminSession,
        id: u64,
        phase: Phase,
        field: ScoreField,
        value: i64,
    ) -> SegakResult<&Student> {
        let student = self
            .students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SegakError::StudentNotFound { id })?;

        let updated = match student.scores(phase).with_field(field, value) {
            Ok(updated) => updated,
            Err(err) => {
                warn!(id, %phase, field = field.key(), value, "score edit rejected");
                return Err(err);
            }
        };
        *student.scores_mut(phase) = updated;
        debug!(id, %phase, field = field.key(), value, "score updated");
        Ok(&*student)
    }

    // Wall-clock millis, bumped past the largest id in use.
    fn next_id(&self) -> SegakResult<u64> {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let after_last = match self.students.iter().map(|s| s.id).max() {
            Some(last) => last
                .checked_add(1)
                .ok_or(SegakError::IdExhausted { last })?,
            None => 0,
        };
        Ok(now.max(after_last))
    }
}

fn seed_students() -> Vec<NewStudent> {
    let students = vec![
        (
            "Ahmad Faris bin Azman",
            10,
            Gender::Male,
            "140312-10-5531",
            ClassLevel::Year4,
            [2, 2, 3, 2, 1],
            [2, 1, 2, 2, 1],
        ),
        (
            "Nur Aisyah binti Rahman",
            10,
            Gender::Female,
            "140807-14-6212",
            ClassLevel::Year4,
            [1, 1, 2, 1, 1],
            [1, 1, 1, 1, 1],
        ),
        (
            "Tan Wei Ling",
            11,
            Gender::Female,
            "130221-08-4418",
            ClassLevel::Year5,
            [3, 3, 4, 3, 2],
            [3, 2, 3, 3, 2],
        ),
        (
            "Muhammad Hakim bin Yusof",
            11,
            Gender::Male,
            "130915-03-6057",
            ClassLevel::Year5,
            [4, 4, 5, 4, 3],
            [4, 3, 4, 4, 3],
        ),
        (
            "Arjun a/l Kumar",
            12,
            Gender::Male,
            "120530-07-5193",
            ClassLevel::Year6,
            [2, 3, 2, 3, 3],
            [2, 3, 2, 2, 3],
        ),
        (
            "Siti Khadijah binti Omar",
            12,
            Gender::Female,
            "121104-01-6640",
            ClassLevel::Year6,
            [5, 4, 5, 5, 4],
            [5, 4, 4, 5, 4],
        ),
    ];

    students
        .into_iter()
        .map(
            |(name, age, gender, ic_number, class, phase1, phase2)| NewStudent {
                name: name.to_string(),
                age,
                gender,
                ic_number: ic_number.to_string(),
                class,
                phase1: seed_score(phase1),
                phase2: seed_score(phase2),
            },
        )
        .collect()
}

fn seed_score(values: [u8; 5]) -> SegakScore {
    SegakScore {
        bmi: values[0],
        naik_turun_bangku: values[1],
        tekan_tubi: values[2],
        ringkuk_tubi: values[3],
        jangkauan_melunjur: values[4],
    }
}
