//! Schedule commands handled locally, without calling the model.

use classmate_schedule::{ScheduleError, ScheduleStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Generate { week_offset: i64 },
    Analyze,
    Week { week_offset: i64 },
}

/// Parses a console line into a schedule command.
///
/// Returns `None` for lines that are not schedule commands (they go to
/// the model instead), and `Some(Err(..))` for a recognized command
/// with malformed arguments.
pub fn parse(line: &str) -> Option<Result<Command, String>> {
    let mut parts = line.split_whitespace();
    let head = parts.next()?;

    let parsed = match head {
        "!generate" => parse_offset(parts.next())
            .map(|week_offset| Command::Generate { week_offset }),
        "!analyze" => Ok(Command::Analyze),
        "!week" => parse_offset(parts.next())
            .map(|week_offset| Command::Week { week_offset }),
        _ => return None,
    };
    Some(parsed)
}

fn parse_offset(arg: Option<&str>) -> Result<i64, String> {
    match arg {
        None => Ok(0),
        Some(raw) => raw
            .parse()
            .map_err(|_| format!("Invalid week offset: {raw}")),
    }
}

/// Runs `line` as a schedule command if it is one.
///
/// Returns `true` when the line was consumed (including malformed
/// commands, which print a diagnostic instead of going to the model).
pub fn handle(store: &ScheduleStore, line: &str) -> bool {
    let Some(parsed) = parse(line) else {
        return false;
    };
    match parsed {
        Ok(command) => run(store, command),
        Err(message) => println!("{message}"),
    }
    true
}

fn run(store: &ScheduleStore, command: Command) {
    match command {
        Command::Generate { week_offset } => {
            match store.generate(week_offset) {
                Ok(summary) => println!(
                    "Generated {} sessions for the week of {}.",
                    summary.total_classes, summary.week_start
                ),
                Err(err) => report_error(&err),
            }
        }
        Command::Analyze => match store.analyze() {
            Ok(report) => {
                println!(
                    "{} sessions across {} days.",
                    report.total_classes, report.days_scheduled
                );
                for (teacher, count) in &report.teacher_stats {
                    println!("  {teacher}: {count}");
                }
            }
            Err(err) => report_error(&err),
        },
        Command::Week { week_offset } => match store.week(week_offset) {
            Ok(week) => {
                println!(
                    "Week of {}: {} sessions.",
                    week.week_start, week.total_classes
                );
                for (date, sessions) in &week.schedule {
                    println!("{date}:");
                    for session in sessions {
                        println!(
                            "  {} {} ({})",
                            session.time, session.title, session.teacher
                        );
                    }
                }
            }
            Err(err) => report_error(&err),
        },
    }
}

fn report_error(err: &ScheduleError) {
    match err {
        ScheduleError::Missing => {
            println!("No schedule yet. Run !generate first.");
        }
        other => println!("Schedule error: {other}"),
    }
}
