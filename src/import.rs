use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};
use serde::Deserialize;
use tracing::info;

use crate::auth::AdminSession;
use crate::models::{ClassLevel, Gender, NewStudent, SegakScore, Student};
use crate::roster::Roster;

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: Option<u64>,
    name: String,
    age: u32,
    gender: String,
    ic_number: String,
    class: String,
    p1_bmi: i64,
    p1_naik_turun_bangku: i64,
    p1_tekan_tubi: i64,
    p1_ringkuk_tubi: i64,
    p1_jangkauan_melunjur: i64,
    p2_bmi: i64,
    p2_naik_turun_bangku: i64,
    p2_tekan_tubi: i64,
    p2_ringkuk_tubi: i64,
    p2_jangkauan_melunjur: i64,
}

impl CsvRow {
    fn into_new_student(self) -> anyhow::Result<(Option<u64>, NewStudent)> {
        if self.name.trim().is_empty() {
            bail!("name must not be empty");
        }
        let gender: Gender = self.gender.parse()?;
        let class: ClassLevel = self.class.parse()?;
        let phase1 = SegakScore::new([
            self.p1_bmi,
            self.p1_naik_turun_bangku,
            self.p1_tekan_tubi,
            self.p1_ringkuk_tubi,
            self.p1_jangkauan_melunjur,
        ])
        .context("phase 1")?;
        let phase2 = SegakScore::new([
            self.p2_bmi,
            self.p2_naik_turun_bangku,
            self.p2_tekan_tubi,
            self.p2_ringkuk_tubi,
            self.p2_jangkauan_melunjur,
        ])
        .context("phase 2")?;

        Ok((
            self.id,
            NewStudent {
                name: self.name.trim().to_string(),
                age: self.age,
                gender,
                ic_number: self.ic_number.trim().to_string(),
                class,
                phase1,
                phase2,
            },
        ))
    }
}

fn read_rows<R: Read>(reader: R) -> anyhow::Result<Vec<(Option<u64>, NewStudent)>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();

    // Row numbers count the header as line 1.
    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let line = index + 2;
        let row = result.with_context(|| format!("row {line}: malformed record"))?;
        let parsed = row
            .into_new_student()
            .with_context(|| format!("row {line}: invalid student"))?;
        rows.push(parsed);
    }

    Ok(rows)
}

pub fn read_roster<R: Read>(reader: R) -> anyhow::Result<Vec<NewStudent>> {
    Ok(read_rows(reader)?.into_iter().map(|(_, student)| student).collect())
}

// Nothing is added unless the whole file parses.
pub fn import_csv(csv_path: &Path, session: &AdminSession, roster: &mut Roster) -> anyhow::Result<usize> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let students = read_roster(file)?;

    let mut inserted = 0usize;
    for student in students {
        roster.add(session, student)?;
        inserted += 1;
    }

    info!(inserted, path = %csv_path.display(), by = session.username(), "roster imported");
    Ok(inserted)
}

pub fn load_roster(csv_path: &Path) -> anyhow::Result<Roster> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let roster = roster_from_reader(file)?;
    info!(students = roster.len(), path = %csv_path.display(), "roster loaded");
    Ok(roster)
}

fn roster_from_reader<R: Read>(reader: R) -> anyhow::Result<Roster> {
    let rows = read_rows(reader)?;

    let mut ids: Vec<u64> = rows.iter().filter_map(|(id, _)| *id).collect();
    ids.sort_unstable();
    ids.dedup();
    let keep_ids = ids.len() == rows.len();

    let students: Vec<Student> = rows
        .into_iter()
        .enumerate()
        .map(|(index, (id, student))| {
            let id = match id {
                Some(id) if keep_ids => id,
                _ => index as u64 + 1,
            };
            student.into_student(id)
        })
        .collect();

    Ok(Roster::from_students(students))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_session;
    use crate::error::SegakError;

    const HEADER: &str = "id,name,age,gender,ic_number,class,\
        p1_bmi,p1_naik_turun_bangku,p1_tekan_tubi,p1_ringkuk_tubi,p1_jangkauan_melunjur,\
        p2_bmi,p2_naik_turun_bangku,p2_tekan_tubi,p2_ringkuk_tubi,p2_jangkauan_melunjur\n";

    fn csv_with(rows: &[&str]) -> String {
        let mut data = HEADER.to_string();
        for row in rows {
            data.push_str(row);
            data.push('\n');
        }
        data
    }

    #[test]
    fn reads_rows_with_display_and_short_names() {
        let data = csv_with(&[
            "7,Nur Aisyah,10,Perempuan,140807-14-6212,Tahun 4,1,1,2,1,1,1,1,1,1,1",
            ",Arjun a/l Kumar,12,male,120530-07-5193,6,2,3,2,3,3,2,3,2,2,3",
        ]);
        let students = read_roster(data.as_bytes()).unwrap();

        assert_eq!(students.len(), 2);
        assert_eq!(students[0].gender, Gender::Female);
        assert_eq!(students[0].class, ClassLevel::Year4);
        assert_eq!(students[1].class, ClassLevel::Year6);
        assert_eq!(students[1].phase2.ringkuk_tubi, 2);
    }

    #[test]
    fn out_of_range_score_names_the_row() {
        let data = csv_with(&[
            ",Ok,10,Lelaki,x,4,1,1,1,1,1,1,1,1,1,1",
            ",Bad,10,Lelaki,x,4,1,1,1,1,1,1,1,9,1,1",
        ]);
        let err = read_roster(data.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("row 3"));
        assert!(format!("{err:#}").contains("between 1 and 5"));
    }

    #[test]
    fn rejects_unknown_class_and_blank_name() {
        let bad_class = csv_with(&[",A,10,Lelaki,x,Tahun 9,1,1,1,1,1,1,1,1,1,1"]);
        assert!(read_roster(bad_class.as_bytes()).is_err());

        let blank_name = csv_with(&[",  ,10,Lelaki,x,4,1,1,1,1,1,1,1,1,1,1"]);
        assert!(read_roster(blank_name.as_bytes()).is_err());
    }

    #[test]
    fn loaded_roster_keeps_unique_file_ids() {
        let data = csv_with(&[
            "7,A,10,Lelaki,x,4,1,1,1,1,1,1,1,1,1,1",
            "3,B,10,Lelaki,x,4,1,1,1,1,1,1,1,1,1,1",
        ]);
        let roster = roster_from_reader(data.as_bytes()).unwrap();
        let ids: Vec<u64> = roster.students().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![7, 3]);

        let partial = csv_with(&[
            "7,A,10,Lelaki,x,4,1,1,1,1,1,1,1,1,1,1",
            ",B,10,Lelaki,x,4,1,1,1,1,1,1,1,1,1,1",
        ]);
        let roster = roster_from_reader(partial.as_bytes()).unwrap();
        let ids: Vec<u64> = roster.students().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn add_after_loading_max_file_id_returns_error() {
        let data = csv_with(&["18446744073709551615,A,10,Lelaki,x,4,1,1,1,1,1,1,1,1,1,1"]);
        let mut roster = roster_from_reader(data.as_bytes()).unwrap();
        let student = read_roster(csv_with(&[",B,10,Lelaki,x,4,1,1,1,1,1,1,1,1,1,1"]).as_bytes())
            .unwrap()
            .remove(0);

        let result = roster.add(&test_session(), student);
        assert_eq!(result, Err(SegakError::IdExhausted { last: u64::MAX }));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn import_appends_to_existing_roster() {
        let path = std::env::temp_dir().join(format!("segak-import-{}.csv", std::process::id()));
        std::fs::write(
            &path,
            csv_with(&[
                ",Lim,11,Perempuan,x,5,2,2,2,2,2,2,2,2,2,2",
                ",Lee,11,Lelaki,x,5,3,3,3,3,3,3,3,3,3,3",
            ]),
        )
        .unwrap();

        let session = test_session();
        let mut roster = Roster::seeded();
        let inserted = import_csv(&path, &session, &mut roster).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(inserted, 2);
        assert_eq!(roster.len(), 8);
        assert_eq!(roster.students()[7].name, "Lee");
    }
}
