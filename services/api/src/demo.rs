use crate::infra::{parse_date, parse_timestamp, InMemoryAssignmentRepository};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use work_readiness::assignments::{
    AssignmentId, AssignmentRecord, AssignmentStatus, BatchAssignmentOutcome,
    BatchAssignmentRequest, WorkReadinessService, WorkerId,
};
use work_readiness::clock::FixedClock;
use work_readiness::config::AssignmentConfig;
use work_readiness::error::AppError;
use work_readiness::kpi::{
    calculate_assignment_kpi, calculate_completion_rate_kpi, calculate_kpi, calculate_streaks,
    calculate_weekly_team_kpi, AssessmentSubmission, AssignmentKpiInput, OverdueAssignment,
    WeeklyTeamKpi,
};

#[derive(Subcommand, Debug)]
pub(crate) enum KpiCommand {
    /// Rate a run of consecutive daily completions
    ConsecutiveDays {
        #[arg(allow_hyphen_values = true)]
        days: i64,
    },
    /// Rate a completion percentage (0-100)
    CompletionRate { rate: f64 },
    /// Rate a team's weekly submission rate
    WeeklyTeam(WeeklyTeamArgs),
    /// Score a worker's assignment history
    Assignment(AssignmentKpiArgs),
    /// Compute current and longest submission streaks
    Streaks {
        /// RFC 3339 submission timestamps, in any order
        #[arg(value_parser = parse_timestamp)]
        submitted_at: Vec<DateTime<Utc>>,
    },
}

#[derive(Args, Debug)]
pub(crate) struct WeeklyTeamArgs {
    #[arg(long)]
    submitted: u32,
    #[arg(long)]
    total: u32,
    /// Submission rate percentage; derived from the counts when omitted
    #[arg(long)]
    rate: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct AssignmentKpiArgs {
    #[arg(long)]
    completed: u32,
    #[arg(long)]
    total: u32,
    #[arg(long, default_value_t = 0)]
    on_time_completed: u32,
    #[arg(long, default_value_t = 0.0)]
    on_time_rate: f64,
    #[arg(long, default_value_t = 0)]
    pending: u32,
    #[arg(long, default_value_t = 0)]
    overdue: u32,
    /// Due time of an overdue assignment that is still open (repeatable)
    #[arg(long = "overdue-due", value_parser = parse_timestamp)]
    overdue_due: Vec<DateTime<Utc>>,
    /// Late completion as DUE,COMPLETED RFC 3339 timestamps (repeatable)
    #[arg(long = "late-completion", value_parser = parse_late_completion)]
    late_completions: Vec<OverdueAssignment>,
    /// Evaluation instant (defaults to now)
    #[arg(long, value_parser = parse_timestamp)]
    now: Option<DateTime<Utc>>,
}

fn parse_late_completion(raw: &str) -> Result<OverdueAssignment, String> {
    let (due, completed) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected DUE,COMPLETED but got '{raw}'"))?;
    Ok(OverdueAssignment {
        due_time: parse_timestamp(due)?,
        completed_at: Some(parse_timestamp(completed)?),
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_kpi(command: KpiCommand) -> Result<(), AppError> {
    match command {
        KpiCommand::ConsecutiveDays { days } => print_json(&calculate_kpi(days)),
        KpiCommand::CompletionRate { rate } => print_json(&calculate_completion_rate_kpi(rate)),
        KpiCommand::WeeklyTeam(args) => {
            let kpi = match args.rate {
                Some(rate) => calculate_weekly_team_kpi(rate, args.submitted, args.total),
                None => WeeklyTeamKpi::from_counts(args.submitted, args.total),
            };
            print_json(&kpi)
        }
        KpiCommand::Assignment(args) => {
            let mut dated: Vec<OverdueAssignment> = args
                .overdue_due
                .into_iter()
                .map(|due_time| OverdueAssignment {
                    due_time,
                    completed_at: None,
                })
                .collect();
            dated.extend(args.late_completions);

            let input = AssignmentKpiInput {
                completed: args.completed,
                total: args.total,
                on_time_completed: args.on_time_completed,
                on_time_rate: args.on_time_rate,
                pending_count: args.pending,
                overdue_count: args.overdue,
                overdue_assignments: if dated.is_empty() { None } else { Some(dated) },
            };
            let now = args.now.unwrap_or_else(Utc::now);
            print_json(&calculate_assignment_kpi(&input, now))
        }
        KpiCommand::Streaks { submitted_at } => {
            let submissions: Vec<AssessmentSubmission> = submitted_at
                .into_iter()
                .map(|submitted_at| AssessmentSubmission { submitted_at })
                .collect();
            print_json(&calculate_streaks(&submissions))
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date to schedule the demo batches for (YYYY-MM-DD). Defaults to tomorrow.
    #[arg(long, value_parser = parse_date)]
    pub(crate) assigned_date: Option<NaiveDate>,
    /// Evaluation instant for the demo clock (RFC 3339). Defaults to now.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = args.now.unwrap_or_else(Utc::now);
    let assigned_date = args
        .assigned_date
        .unwrap_or_else(|| now.date_naive() + Duration::days(1));
    let config = AssignmentConfig::default();

    let repository = Arc::new(InMemoryAssignmentRepository::default());
    repository.seed(seed_records(now, assigned_date, &config));
    let service = WorkReadinessService::with_clock(
        repository.clone(),
        config,
        Arc::new(FixedClock(now)),
    );

    println!("Work-readiness scheduling demo");
    println!("- clock {now} | target date {assigned_date}");

    let batches = [
        ("Batch including a worker with overdue work", vec!["w-ortiz", "w-patel"]),
        ("Batch including a worker already scheduled", vec!["w-chen", "w-patel"]),
        ("Batch with clear workers", vec!["w-patel", "w-singh"]),
    ];

    for (title, workers) in batches {
        println!("\n{title}: {}", workers.join(", "));
        let request = BatchAssignmentRequest {
            worker_ids: workers.into_iter().map(WorkerId::new).collect(),
            assigned_date,
            due_time: None,
            team: Some("Night Shift".to_string()),
            assigned_by: Some("tl-demo".to_string()),
            notes: None,
        };

        match service.create_assignments(request)? {
            BatchAssignmentOutcome::Created(records) => {
                for record in records {
                    println!(
                        "  created {} for {} ({}) due {}",
                        record.id.0,
                        record.worker_id.0,
                        record.status.label(),
                        record.due_time
                    );
                }
            }
            BatchAssignmentOutcome::Rejected(rejection) => {
                let blocked: Vec<&str> = rejection
                    .offending_workers()
                    .iter()
                    .map(|worker| worker.0.as_str())
                    .collect();
                println!("  rejected: {}", rejection.error);
                println!("  {}", rejection.message);
                println!("  blocked workers: {}", blocked.join(", "));
            }
        }
    }

    println!("\nWorker assignment KPIs");
    for worker in ["w-ortiz", "w-chen", "w-patel", "w-singh"] {
        let kpi = service.worker_kpi(&WorkerId::new(worker))?;
        println!(
            "- {worker}: {} ({}) score {:.1}",
            kpi.rating,
            kpi.letter_grade.unwrap_or("-"),
            kpi.score
        );
    }

    let team = WeeklyTeamKpi::from_counts(17, 20);
    println!(
        "\nWeekly team submissions: {}/{} -> {} ({:.0}%)",
        team.submitted_count, team.total_count, team.kpi.rating, team.kpi.score
    );

    Ok(())
}

fn seed_records(
    now: DateTime<Utc>,
    assigned_date: NaiveDate,
    config: &AssignmentConfig,
) -> Vec<AssignmentRecord> {
    let due_on = |date: NaiveDate| date.and_time(config.due_time_of_day).and_utc();
    let seeded = |id: &str, worker: &str, date: NaiveDate, status: AssignmentStatus| {
        AssignmentRecord {
            id: AssignmentId(id.to_string()),
            worker_id: WorkerId::new(worker),
            team: Some("Night Shift".to_string()),
            assigned_by: Some("tl-demo".to_string()),
            assigned_date: date,
            due_time: due_on(date),
            status,
            created_at: now - Duration::days(7),
            completed_at: None,
            notes: None,
        }
    };

    let three_days_ago = now.date_naive() - Duration::days(3);
    let two_days_ago = now.date_naive() - Duration::days(2);

    vec![
        seeded("seed-1", "w-ortiz", three_days_ago, AssignmentStatus::Overdue),
        seeded("seed-2", "w-chen", assigned_date, AssignmentStatus::Pending),
        AssignmentRecord {
            completed_at: Some(due_on(two_days_ago) + Duration::hours(6)),
            ..seeded("seed-3", "w-patel", two_days_ago, AssignmentStatus::Completed)
        },
        AssignmentRecord {
            completed_at: Some(due_on(three_days_ago) - Duration::hours(2)),
            ..seeded("seed-4", "w-singh", three_days_ago, AssignmentStatus::Completed)
        },
    ]
}
