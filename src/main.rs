use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use segak_dashboard::auth::{self, Credentials};
use segak_dashboard::config::AppConfig;
use segak_dashboard::error::SegakError;
use segak_dashboard::filter::RosterFilter;
use segak_dashboard::models::{ClassLevel, Gender, NewStudent, Phase, ScoreField, SegakScore};
use segak_dashboard::roster::Roster;
use segak_dashboard::{import, report, scoring, stats};

#[derive(Parser)]
#[command(name = "segak-dashboard")]
#[command(about = "SEGAK fitness score tracker for primary-school classes", long_about = None)]
struct Cli {
    /// Roster CSV to load instead of the demo roster
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    class: Option<ClassLevel>,
    #[arg(long)]
    gender: Option<Gender>,
    /// Case-insensitive name search
    #[arg(long)]
    name: Option<String>,
}

impl FilterArgs {
    fn into_filter(self) -> RosterFilter {
        RosterFilter {
            class: self.class,
            gender: self.gender,
            name: self.name,
        }
    }
}

#[derive(Args)]
struct LoginArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Headcount and aggregate statistics for one phase
    Summary {
        #[arg(long, default_value = "1")]
        phase: Phase,
        #[arg(long)]
        json: bool,
    },
    /// List students with their total score and fitness level
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = "1")]
        phase: Phase,
    },
    /// Compare item averages between phase 1 and phase 2
    Compare {
        #[arg(long)]
        json: bool,
    },
    /// Show one student's scores for both phases
    Show {
        #[arg(long)]
        id: u64,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = "1")]
        phase: Phase,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Change one item score (admin only)
    Edit {
        #[command(flatten)]
        login: LoginArgs,
        #[arg(long)]
        id: u64,
        #[arg(long)]
        phase: Phase,
        #[arg(long)]
        field: ScoreField,
        #[arg(long, allow_negative_numbers = true)]
        value: i64,
    },
    /// Add a student to the session roster (admin only)
    Add {
        #[command(flatten)]
        login: LoginArgs,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 10)]
        age: u32,
        #[arg(long)]
        gender: Gender,
        #[arg(long, default_value = "")]
        ic: String,
        #[arg(long)]
        class: ClassLevel,
        /// Five comma-separated item scores; defaults to all 1
        #[arg(long, value_delimiter = ',')]
        phase1: Option<Vec<i64>>,
        #[arg(long, value_delimiter = ',')]
        phase2: Option<Vec<i64>>,
    },
    /// Append students from a CSV to the session roster (admin only)
    Import {
        #[command(flatten)]
        login: LoginArgs,
        #[arg(long)]
        from: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    let mut roster = match cli.csv.as_ref().or(config.roster_csv.as_ref()) {
        Some(path) => import::load_roster(path)?,
        None => Roster::seeded(),
    };

    match cli.command {
        Commands::Summary { phase, json } => {
            let headcount = stats::headcount(roster.students());
            let summary = match stats::aggregate_roster_statistics(roster.students(), phase) {
                Ok(summary) => summary,
                Err(SegakError::NoData) => {
                    println!("No data to display.");
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            };

            if json {
                let value = serde_json::json!({
                    "headcount": headcount,
                    "summary": summary,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(());
            }

            println!(
                "Students: {} ({} male, {} female)",
                headcount.total, headcount.male, headcount.female
            );
            println!("{} average score: {:.1}", phase, summary.average_total_score);
            println!(
                "Best: {} score {} ({})",
                summary.best_performer.name,
                summary.best_performer.total_score,
                summary.best_performer.level.label()
            );
            println!(
                "Weakest: {} score {} ({})",
                summary.worst_performer.name,
                summary.worst_performer.total_score,
                summary.worst_performer.level.label()
            );
            println!("Fitness levels:");
            for entry in summary.distribution.iter() {
                println!(
                    "- {} ({}): {}",
                    entry.level.label(),
                    entry.level.english(),
                    entry.count
                );
            }
            println!("Item averages:");
            for field in ScoreField::ALL {
                println!("- {}: {:.1}", field.label(), summary.field_averages.get(field));
            }
        }
        Commands::List { filter, phase } => {
            let filter = filter.into_filter();
            let students = filter.apply(roster.students());

            if students.is_empty() {
                println!("No students match this filter.");
                return Ok(());
            }

            for student in students {
                let total = scoring::total_score(student.scores(phase));
                let level = scoring::classify_fitness_level(f64::from(total));
                println!(
                    "{:>2} [{}] {} ({}, {}, age {}) score {} {}",
                    level.status().marker(),
                    student.id,
                    student.name,
                    student.class,
                    student.gender,
                    student.age,
                    total,
                    level.label()
                );
            }
        }
        Commands::Compare { json } => {
            let comparison = match stats::compare_phases(roster.students()) {
                Ok(comparison) => comparison,
                Err(SegakError::NoData) => {
                    println!("No data to display.");
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&comparison)?);
                return Ok(());
            }

            for field in comparison.fields.iter() {
                println!(
                    "- {}: {:.1} -> {:.1} ({:+.1})",
                    field.field.label(),
                    field.phase1,
                    field.phase2,
                    field.delta
                );
            }
            println!(
                "Average total: {:.1} ({}) -> {:.1} ({})",
                comparison.phase1.total(),
                comparison.phase1.level().label(),
                comparison.phase2.total(),
                comparison.phase2.level().label()
            );
            println!(
                "Improved {}, declined {}, unchanged {}.",
                comparison.improved, comparison.declined, comparison.unchanged
            );
        }
        Commands::Show { id } => {
            let student = roster
                .get(id)
                .ok_or(SegakError::StudentNotFound { id })?;
            print!("{}", report::student_detail(student));
        }
        Commands::Report {
            filter,
            phase,
            out,
        } => {
            let filter = filter.into_filter();
            let report = report::build_report(
                &roster,
                phase,
                &filter,
                chrono::Local::now().date_naive(),
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Edit {
            login,
            id,
            phase,
            field,
            value,
        } => {
            let session = auth::login(
                &config.authenticator(),
                &Credentials::new(login.username, login.password),
            )?;
            let student = roster
                .set_score(&session, id, phase, field, value)
                .context("score not changed")?;
            print!("{}", report::student_detail(student));
        }
        Commands::Add {
            login,
            name,
            age,
            gender,
            ic,
            class,
            phase1,
            phase2,
        } => {
            let session = auth::login(
                &config.authenticator(),
                &Credentials::new(login.username, login.password),
            )?;
            let student = NewStudent {
                name,
                age,
                gender,
                ic_number: ic,
                class,
                phase1: parse_scores(phase1).context("phase 1")?,
                phase2: parse_scores(phase2).context("phase 2")?,
            };
            let id = roster.add(&session, student)?;
            let added = roster
                .get(id)
                .context("added student missing from roster")?;
            print!("{}", report::student_detail(added));
            println!("Roster now has {} students.", roster.len());
        }
        Commands::Import { login, from } => {
            let session = auth::login(
                &config.authenticator(),
                &Credentials::new(login.username, login.password),
            )?;
            let inserted = import::import_csv(&from, &session, &mut roster)?;
            println!("Inserted {inserted} students from {}.", from.display());
            let headcount = stats::headcount(roster.students());
            println!(
                "Roster now has {} students ({} male, {} female).",
                headcount.total, headcount.male, headcount.female
            );
        }
    }

    Ok(())
}

fn parse_scores(values: Option<Vec<i64>>) -> anyhow::Result<SegakScore> {
    let Some(values) = values else {
        return Ok(SegakScore::lowest());
    };
    let values: [i64; 5] = values
        .try_into()
        .map_err(|v: Vec<i64>| anyhow::anyhow!("expected 5 scores, got {}", v.len()))?;
    Ok(SegakScore::new(values)?)
}
