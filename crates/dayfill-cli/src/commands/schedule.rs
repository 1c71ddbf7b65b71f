use chrono::NaiveDateTime;
use clap::{Args, Subcommand};
use dayfill_core::{
    wall_clock, AutoScheduler, Clock, Config, CursorStrategy, FixedClock, ScheduleResult,
    SchedulerConfig, Snapshot, SystemClock, Task,
};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct RunArgs {
    /// Snapshot JSON with "tasks" and "events" ("-" for stdin)
    snapshot: PathBuf,
    /// Work window start hour (overrides config)
    #[arg(long)]
    start_hour: Option<u32>,
    /// Work window end hour (overrides config)
    #[arg(long)]
    end_hour: Option<u32>,
    /// Plan as if it were this moment (e.g. 2026-10-18T08:00)
    #[arg(long)]
    now: Option<String>,
    /// Scan every task from the window start
    #[arg(long)]
    restart_cursor: bool,
    /// Print JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Place open tasks into today's free time
    Run {
        #[command(flatten)]
        args: RunArgs,
        /// Write the snapshot with placements applied ("-" for stdout, which
        /// replaces the placement report)
        #[arg(long)]
        write: Option<PathBuf>,
    },
    /// Show placements, skipped tasks and leftover free time
    Plan {
        #[command(flatten)]
        args: RunArgs,
    },
}

struct Prepared {
    snapshot: Snapshot,
    scheduler: AutoScheduler<FixedClock>,
    json: bool,
    time_format: String,
}

fn prepare(args: RunArgs) -> Result<Prepared, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let scheduler_config = SchedulerConfig {
        work_start_hour: args.start_hour.unwrap_or(config.scheduler.work_start_hour),
        work_end_hour: args.end_hour.unwrap_or(config.scheduler.work_end_hour),
        cursor_strategy: if args.restart_cursor {
            CursorStrategy::Restart
        } else {
            config.scheduler.cursor_strategy
        },
        ..config.scheduler.clone()
    };
    scheduler_config.validate()?;

    let now: NaiveDateTime = match args.now.as_deref() {
        Some(raw) => wall_clock::parse(raw).ok_or_else(|| format!("invalid --now: {raw}"))?,
        None => SystemClock.now(),
    };

    Ok(Prepared {
        snapshot: Snapshot::load(&args.snapshot)?,
        scheduler: AutoScheduler::with_clock(scheduler_config, FixedClock(now)),
        json: args.json || config.output.json,
        time_format: config.output.time_format,
    })
}

fn label<'a>(tasks: &'a [Task], id: &'a str) -> &'a str {
    tasks.iter().find(|t| t.id == id).map(Task::label).unwrap_or(id)
}

fn print_placements(tasks: &[Task], placements: &[ScheduleResult], time_format: &str) {
    for p in placements {
        println!(
            "{}-{}  {:>4}m  {}",
            p.start_date.format(time_format),
            p.end_date.format(time_format),
            p.duration_minutes(),
            label(tasks, &p.task_id)
        );
    }
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScheduleAction::Run { args, write } => {
            let Prepared {
                mut snapshot,
                scheduler,
                json,
                time_format,
            } = prepare(args)?;
            let placements = scheduler.schedule(&snapshot.tasks, &snapshot.events);

            // The snapshot owns stdout when written there.
            let snapshot_to_stdout = write.as_deref() == Some(Path::new("-"));
            if snapshot_to_stdout {
                tracing::info!(placed = placements.len(), "placement report suppressed");
            } else if json {
                println!("{}", serde_json::to_string_pretty(&placements)?);
            } else if placements.is_empty() {
                println!("nothing scheduled");
            } else {
                print_placements(&snapshot.tasks, &placements, &time_format);
            }

            if let Some(out) = write {
                let updated = snapshot.apply(&placements);
                snapshot.save(&out)?;
                tracing::info!(updated, path = %out.display(), "snapshot written");
            }
        }
        ScheduleAction::Plan { args } => {
            let Prepared {
                snapshot,
                scheduler,
                json,
                time_format,
            } = prepare(args)?;
            let plan = scheduler.plan(&snapshot.tasks, &snapshot.events);

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
                return Ok(());
            }

            match &plan.window {
                Some(window) => println!(
                    "window: {}-{}{}",
                    window.start.format(&time_format),
                    window.end.format(&time_format),
                    if window.late_start { " (late start)" } else { "" }
                ),
                None => println!("window: closed for today"),
            }

            println!("placed ({} min):", plan.placed_minutes());
            print_placements(&snapshot.tasks, &plan.placements, &time_format);

            if !plan.skipped.is_empty() {
                println!("skipped:");
                for s in &plan.skipped {
                    println!("  {}: {}", label(&snapshot.tasks, &s.task_id), s.reason.as_str());
                }
            }

            println!("free ({} min):", plan.free_minutes());
            for gap in &plan.free_gaps {
                println!(
                    "{}-{}  {:>4}m",
                    gap.start_time.format(&time_format),
                    gap.end_time.format(&time_format),
                    gap.duration_minutes()
                );
            }
        }
    }
    Ok(())
}
