use crate::models::{ClassLevel, Gender, Student};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterFilter {
    pub class: Option<ClassLevel>,
    pub gender: Option<Gender>,
    pub name: Option<String>,
}

impl RosterFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: ClassLevel) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_name(mut self, term: impl Into<String>) -> Self {
        self.name = Some(term.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.class.is_none()
            && self.gender.is_none()
            && self.name.as_deref().map_or(true, |term| term.is_empty())
    }

    pub fn matches(&self, student: &Student) -> bool {
        matches_class(self.class, student)
            && matches_gender(self.gender, student)
            && matches_name(self.name.as_deref(), student)
    }

    pub fn apply<'a>(&self, students: &'a [Student]) -> Vec<&'a Student> {
        students.iter().filter(|s| self.matches(s)).collect()
    }
}

pub fn matches_class(class: Option<ClassLevel>, student: &Student) -> bool {
    class.map_or(true, |c| student.class == c)
}

pub fn matches_gender(gender: Option<Gender>, student: &Student) -> bool {
    gender.map_or(true, |g| student.gender == g)
}

pub fn matches_name(term: Option<&str>, student: &Student) -> bool {
    match term {
        None => true,
        Some(term) => student.name.to_lowercase().contains(&term.to_lowercase()),
    }
}
