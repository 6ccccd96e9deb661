use std::path::Path;

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::cli::Invocation;
use crate::config::{Config, resolve_schedule_file};
use crate::datetime::parse_date_expr;
use crate::render::Renderer;
use crate::source;
use crate::view::ScheduleView;

pub fn known_command_names() -> Vec<&'static str> {
    vec!["show", "next", "days", "export", "help", "version"]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

pub fn dispatch(
    cfg: &Config,
    renderer: &mut Renderer,
    inv: Invocation,
    file_override: Option<&Path>,
    at: Option<&str>,
) -> anyhow::Result<()> {
    let now = resolve_now(at)?;
    let command = inv.command.as_str();

    debug!(command, args = ?inv.command_args, now = %now, "dispatching command");

    match command {
        "show" => cmd_show(cfg, renderer, file_override, &inv.command_args, now),
        "next" => cmd_next(cfg, renderer, file_override, now),
        "days" => cmd_days(cfg, renderer, file_override, now),
        "export" => cmd_export(cfg, file_override, &inv.command_args, now),
        "help" => cmd_help(),
        "version" => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => Err(anyhow!("unknown command: {other}")),
    }
}

fn resolve_now(at: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match at {
        Some(expr) => {
            parse_date_expr(expr, Utc::now()).context("invalid --at date expression")
        }
        None => Ok(Utc::now()),
    }
}

fn load_view(
    cfg: &Config,
    file_override: Option<&Path>,
    now: DateTime<Utc>,
) -> anyhow::Result<ScheduleView> {
    let path = resolve_schedule_file(cfg, file_override)?;
    let schedule = source::load_schedule(&path)?;

    let mut view = ScheduleView::new();
    view.load(&schedule, now);
    Ok(view)
}

/// Extra expansion steps requested on the command line, e.g.
/// `show earlier 2 later 1`. A bare `earlier`/`later` means one step.
fn parse_expansions(args: &[String]) -> anyhow::Result<Vec<(bool, usize)>> {
    let mut out = Vec::new();
    let mut idx = 0;

    while idx < args.len() {
        let earlier = match args[idx].as_str() {
            "earlier" => true,
            "later" => false,
            other => return Err(anyhow!("unexpected show argument: {other}")),
        };

        let mut count = 1usize;
        if let Some(next) = args.get(idx + 1) {
            if let Ok(parsed) = next.parse::<usize>() {
                count = parsed;
                idx += 1;
            }
        }
        idx += 1;

        out.push((earlier, count));
    }

    Ok(out)
}

fn apply_expansions(view: &mut ScheduleView, expansions: &[(bool, usize)]) {
    for &(earlier, count) in expansions {
        for _ in 0..count {
            if earlier {
                view.expand_earlier();
            } else {
                view.expand_later();
            }
        }
    }
}

#[tracing::instrument(skip(cfg, renderer, file_override, args, now))]
fn cmd_show(
    cfg: &Config,
    renderer: &mut Renderer,
    file_override: Option<&Path>,
    args: &[String],
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command show");

    let expansions = parse_expansions(args)?;
    let mut view = load_view(cfg, file_override, now)?;
    apply_expansions(&mut view, &expansions);

    let Some(state) = view.loaded() else {
        println!("No schedule loaded.");
        return Ok(());
    };
    renderer.print_schedule(state)
}

#[tracing::instrument(skip(cfg, renderer, file_override, now))]
fn cmd_next(
    cfg: &Config,
    renderer: &mut Renderer,
    file_override: Option<&Path>,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command next");

    let view = load_view(cfg, file_override, now)?;
    let Some(state) = view.loaded() else {
        println!("No schedule loaded.");
        return Ok(());
    };

    let Some(anchor) = state.anchor.as_deref() else {
        println!("No upcoming classes.");
        return Ok(());
    };

    match state.days.index_of(anchor) {
        Some(idx) => {
            let day = &state.days.days[idx];
            let label = state.days.label_for(anchor).unwrap_or(anchor);
            renderer.print_day_info(day, label)
        }
        None => {
            // The anchor can point at a day the semester filter dropped
            // (a future day just across the bucket boundary).
            println!("Next day with classes is outside the current semester: {anchor}");
            Ok(())
        }
    }
}

#[tracing::instrument(skip(cfg, renderer, file_override, now))]
fn cmd_days(
    cfg: &Config,
    renderer: &mut Renderer,
    file_override: Option<&Path>,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command days");

    let view = load_view(cfg, file_override, now)?;
    let Some(state) = view.loaded() else {
        println!("No schedule loaded.");
        return Ok(());
    };
    renderer.print_day_list(state)
}

#[tracing::instrument(skip(cfg, file_override, args, now))]
fn cmd_export(
    cfg: &Config,
    file_override: Option<&Path>,
    args: &[String],
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command export");

    let expansions = parse_expansions(args)?;
    let mut view = load_view(cfg, file_override, now)?;
    apply_expansions(&mut view, &expansions);

    let out = serde_json::to_string(view.visible())?;
    println!("{out}");
    Ok(())
}

fn cmd_help() -> anyhow::Result<()> {
    println!("usage: lectio [--file PATH] [--at EXPR] [rc.key=value] COMMAND [ARGS]");
    println!();
    println!("commands:");
    println!("  show [earlier N] [later N]   render the visible window of days");
    println!("  next                         the day to look at first: today, or the");
    println!("                               nearest future day with classes");
    println!("  days                         list every day of the current semester");
    println!("  export [earlier N] [later N] visible window as JSON");
    println!("  help                         this text");
    println!("  version                      print the version");
    Ok(())
}
