use anyhow::anyhow;
use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::cli::Invocation;
use crate::config::Config;
use crate::datetime;
use crate::error::Error;
use crate::grid;
use crate::render::Renderer;
use crate::session::Planner;

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "grid",
        "show",
        "add",
        "done",
        "undone",
        "delete",
        "template",
        "projects",
        "project",
        "version",
    ]
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

#[instrument(skip(planner, cfg, renderer, inv))]
pub fn dispatch(
    planner: &mut Planner,
    cfg: &Config,
    renderer: &mut Renderer,
    inv: Invocation,
) -> anyhow::Result<()> {
    let today = datetime::today(cfg);

    match inv.command.as_str() {
        "grid" => cmd_grid(planner, renderer, today),
        "show" => cmd_show(planner, renderer, today, &inv.args),
        "add" => cmd_add(planner, today, &inv.args),
        "done" => cmd_toggle(planner, today, &inv.args, true),
        "undone" => cmd_toggle(planner, today, &inv.args, false),
        "delete" => cmd_delete(planner, today, &inv.args),
        "template" => cmd_template(planner, &inv.args),
        "projects" => cmd_projects(planner, renderer),
        "project" => cmd_project(planner, &inv.args),
        "version" => {
            println!("gridplan {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => Err(anyhow!("unknown command: {other}")),
    }
}

#[instrument(skip(planner, renderer))]
fn cmd_grid(planner: &mut Planner, renderer: &mut Renderer, today: NaiveDate) -> anyhow::Result<()> {
    info!("command grid");

    let tiles = grid::rolling_window(planner.doc(), today);
    renderer.print_grid(&tiles)
}

#[instrument(skip(planner, renderer, args))]
fn cmd_show(
    planner: &mut Planner,
    renderer: &mut Renderer,
    today: NaiveDate,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command show");

    let date = match args.first() {
        Some(raw) => parse_date_arg(raw, today)?,
        None => today,
    };

    planner.select(date);
    let tasks = planner.doc().day(date).to_vec();
    renderer.print_day(date, &tasks)
}

#[instrument(skip(planner, args))]
fn cmd_add(planner: &mut Planner, today: NaiveDate, args: &[String]) -> anyhow::Result<()> {
    info!("command add");

    if args.is_empty() {
        return Err(anyhow!("add requires a task name"));
    }

    // an optional leading date; a task whose name starts with a date needs
    // the date spelled out first
    let (date, name_parts) = match args.split_first() {
        Some((first, rest)) => match parse_date_arg(first, today) {
            Ok(date) if rest.is_empty() => {
                // a lone date is a forgotten name, not a task called "2024-03-05"
                return Err(anyhow!("add requires a task name after {date}"));
            }
            Ok(date) => (date, rest),
            Err(_) => (today, args),
        },
        None => (today, args),
    };

    let name = name_parts.join(" ");
    planner.add_task(date, &name)?;
    println!("Added \"{}\" to {date}.", name.trim());
    Ok(())
}

#[instrument(skip(planner, args))]
fn cmd_toggle(
    planner: &mut Planner,
    today: NaiveDate,
    args: &[String],
    value: bool,
) -> anyhow::Result<()> {
    info!(value, "command toggle");

    let (date, index) = parse_date_and_index(args, today)?;
    planner.toggle_task(date, index, value)?;
    println!(
        "Marked task {} on {date} as {}.",
        index + 1,
        if value { "done" } else { "not done" }
    );
    Ok(())
}

#[instrument(skip(planner, args))]
fn cmd_delete(planner: &mut Planner, today: NaiveDate, args: &[String]) -> anyhow::Result<()> {
    info!("command delete");

    let (date, index) = parse_date_and_index(args, today)?;
    planner.delete_task(date, index)?;
    println!("Deleted task {} from {date}.", index + 1);
    Ok(())
}

#[instrument(skip(planner, args))]
fn cmd_template(planner: &mut Planner, args: &[String]) -> anyhow::Result<()> {
    info!("command template");

    if args.len() < 3 {
        return Err(anyhow!("template requires: NAME... START END"));
    }

    let (name_parts, dates) = args.split_at(args.len() - 2);
    let start = datetime::parse_date_key(&dates[0])?;
    let end = datetime::parse_date_key(&dates[1])?;
    let name = name_parts.join(" ");

    let added = planner.apply_template(&name, start, end)?;
    println!(
        "Added \"{}\" to {added} day(s) between {start} and {end}.",
        name.trim()
    );
    Ok(())
}

#[instrument(skip(planner, renderer))]
fn cmd_projects(planner: &mut Planner, renderer: &mut Renderer) -> anyhow::Result<()> {
    info!("command projects");

    let projects = planner.doc().projects.clone();
    renderer.print_projects(&projects)
}

#[instrument(skip(planner, args))]
fn cmd_project(planner: &mut Planner, args: &[String]) -> anyhow::Result<()> {
    info!("command project");

    let Some((sub, rest)) = args.split_first() else {
        return Err(anyhow!(
            "project requires a subcommand: add, rename, format, status, or delete"
        ));
    };

    match sub.as_str() {
        "add" => {
            if rest.is_empty() {
                return Err(anyhow!("project add requires a name"));
            }
            let name = rest.join(" ");
            planner.add_project(&name, None)?;
            println!("Added project \"{}\" (parked).", name.trim());
            Ok(())
        }
        "rename" => {
            let (index, name_parts) = parse_index_then_rest(rest, "project rename")?;
            let name = name_parts.join(" ");
            planner.rename_project(index, &name)?;
            println!("Renamed project {} to \"{}\".", index + 1, name.trim());
            Ok(())
        }
        "format" => {
            let (index, format_parts) = parse_index_then_rest(rest, "project format")?;
            let format = format_parts.join(" ");
            planner.set_project_format(index, &format)?;
            println!("Set format of project {}.", index + 1);
            Ok(())
        }
        "status" => {
            let (index, status_parts) = parse_index_then_rest(rest, "project status")?;
            let raw = status_parts.join(" ");
            let status = raw.parse()?;
            planner.set_project_status(index, status)?;
            println!("Project {} is now {status}.", index + 1);
            Ok(())
        }
        "delete" => {
            let Some(raw) = rest.first() else {
                return Err(anyhow!("project delete requires an index"));
            };
            let index = parse_index(raw)?;
            planner.delete_project(index)?;
            println!("Deleted project {}.", index + 1);
            Ok(())
        }
        other => Err(anyhow!("unknown project subcommand: {other}")),
    }
}

fn parse_date_arg(raw: &str, today: NaiveDate) -> Result<NaiveDate, Error> {
    if raw.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    datetime::parse_date_key(raw)
}

/// CLI indices are 1-based; everything behind the boundary is 0-based.
fn parse_index(raw: &str) -> Result<usize, Error> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|idx| *idx >= 1)
        .map(|idx| idx - 1)
        .ok_or_else(|| {
            Error::InvalidInput(format!("expected a 1-based position, got: {raw}"))
        })
}

fn parse_date_and_index(args: &[String], today: NaiveDate) -> anyhow::Result<(NaiveDate, usize)> {
    match args {
        [raw_date, raw_index] => {
            let date = parse_date_arg(raw_date, today)?;
            let index = parse_index(raw_index)?;
            Ok((date, index))
        }
        _ => Err(anyhow!("expected: DATE INDEX")),
    }
}

fn parse_index_then_rest<'a>(
    args: &'a [String],
    what: &str,
) -> anyhow::Result<(usize, &'a [String])> {
    let Some((raw_index, rest)) = args.split_first() else {
        return Err(anyhow!("{what} requires an index"));
    };
    if rest.is_empty() {
        return Err(anyhow!("{what} requires a value after the index"));
    }
    Ok((parse_index(raw_index)?, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("date")
    }

    #[test]
    fn abbreviations_expand_only_when_unambiguous() {
        let known = known_command_names();
        assert_eq!(expand_command_abbrev("g", &known), Some("grid"));
        assert_eq!(expand_command_abbrev("del", &known), Some("delete"));
        assert_eq!(expand_command_abbrev("project", &known), Some("project"));
        assert_eq!(expand_command_abbrev("proj", &known), None);
        assert_eq!(expand_command_abbrev("zap", &known), None);
    }

    #[test]
    fn indices_are_one_based_at_the_boundary() {
        assert_eq!(parse_index("1").expect("parse"), 0);
        assert_eq!(parse_index("12").expect("parse"), 11);
        assert!(parse_index("0").is_err());
        assert!(parse_index("-3").is_err());
        assert!(parse_index("first").is_err());
    }

    #[test]
    fn add_with_a_lone_date_is_missing_its_name() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = crate::store::DataStore::open(temp.path()).expect("open datastore");
        let mut planner = Planner::new(store, date("2024-03-01"));

        let err = cmd_add(&mut planner, date("2024-03-01"), &["2024-03-05".to_string()])
            .expect_err("lone date");
        assert!(err.to_string().contains("task name"));
        assert!(planner.doc().day(date("2024-03-05")).is_empty());
        assert!(planner.doc().day(date("2024-03-01")).is_empty());

        let err = cmd_add(&mut planner, date("2024-03-01"), &["today".to_string()])
            .expect_err("lone today");
        assert!(err.to_string().contains("task name"));

        cmd_add(
            &mut planner,
            date("2024-03-01"),
            &["2024-03-05".to_string(), "ink".to_string()],
        )
        .expect("dated add");
        assert_eq!(planner.doc().day(date("2024-03-05"))[0].name, "ink");
    }

    #[test]
    fn today_keyword_resolves_to_the_current_date() {
        let today = date("2024-03-01");
        assert_eq!(parse_date_arg("today", today).expect("parse"), today);
        assert_eq!(parse_date_arg("TODAY", today).expect("parse"), today);
        assert_eq!(
            parse_date_arg("2024-04-01", today).expect("parse"),
            date("2024-04-01")
        );
    }
}
