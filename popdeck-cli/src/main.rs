//! Command-line interface for popdeck
//! This binary reads a grid document, a pop-up stack template, and a rooms
//! payload, and rewrites the grid so every room has an up-to-date stack.
//!
//! Usage:
//!   popdeck --grid-in grid.deck --rooms rooms.json --template popup.deck --grid-out out.deck
//!   popdeck --grid-in grid.deck --rooms rooms.json --template popup.deck --dry-run
//!   popdeck --template popup.deck --validate-template-only

use clap::{Arg, ArgAction, ArgMatches, Command};
use popdeck_config::{Loader, PopdeckConfig};
use popdeck_engine::{
    check_template_source, parse_icon_map, parse_rooms, rewrite_document, DetectStrategy,
    InsertMode, Report,
};
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    let matches = Command::new("popdeck")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage templated pop-up stacks inside dashboard markup documents")
        .arg_required_else_help(true)
        .arg(
            Arg::new("grid-in")
                .long("grid-in")
                .value_name("PATH")
                .help("Grid document to edit")
                .required_unless_present("validate-template-only"),
        )
        .arg(
            Arg::new("rooms")
                .long("rooms")
                .value_name("PATH")
                .help("Rooms payload (JSON array of strings)")
                .required_unless_present("validate-template-only"),
        )
        .arg(
            Arg::new("template")
                .long("template")
                .value_name("PATH")
                .help("Pop-up stack template")
                .required(true),
        )
        .arg(
            Arg::new("grid-out")
                .long("grid-out")
                .value_name("PATH")
                .help("Where to write the rewritten document (stdout when omitted)"),
        )
        .arg(
            Arg::new("detect-by")
                .long("detect-by")
                .value_name("STRATEGY")
                .help("How existing stacks are recognized: name, hash, or area"),
        )
        .arg(
            Arg::new("insert-mode")
                .long("insert-mode")
                .value_name("MODE")
                .help("Slot placement without a match: append, keep-index, or replace"),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .value_name("N")
                .help("Indent width for the rewritten document"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("icon-map")
                .long("icon-map")
                .value_name("JSON")
                .help("JSON object mapping room names to icons"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Print reports and the rewritten document without writing"),
        )
        .arg(
            Arg::new("backup")
                .long("backup")
                .action(ArgAction::SetTrue)
                .help("Keep a .bak copy when overwriting the input document"),
        )
        .arg(
            Arg::new("report-json")
                .long("report-json")
                .action(ArgAction::SetTrue)
                .help("Emit per-room reports as JSON"),
        )
        .arg(
            Arg::new("validate-template-only")
                .long("validate-template-only")
                .action(ArgAction::SetTrue)
                .help("Validate the template (structure and placeholders) and exit"),
        )
        .get_matches();

    let template_path = matches
        .get_one::<String>("template")
        .expect("template is required");

    if matches.get_flag("validate-template-only") {
        handle_validate_template(template_path);
        return;
    }
    handle_rewrite(&matches, template_path);
}

/// Handle the template-validation command path
fn handle_validate_template(path: &str) {
    let text = read_file(path);
    match check_template_source(&text) {
        Ok(()) => println!("OK {}", path),
        Err(err) => {
            eprintln!("Validation failed: {}", err);
            process::exit(1);
        }
    }
}

/// Handle the rewrite command path
fn handle_rewrite(matches: &ArgMatches, template_path: &str) {
    let grid_in = matches
        .get_one::<String>("grid-in")
        .expect("grid-in is required unless validating a template");
    let rooms_path = matches
        .get_one::<String>("rooms")
        .expect("rooms is required unless validating a template");

    let config = load_config(matches);
    let icon_map = matches.get_one::<String>("icon-map").map(|payload| {
        parse_icon_map(payload).unwrap_or_else(|err| {
            eprintln!("Error: {}", err);
            process::exit(1);
        })
    });
    let options = config.edit_options(icon_map);

    let document = read_file(grid_in);
    let template = read_file(template_path);
    let rooms_payload = read_file(rooms_path);
    let rooms = parse_rooms(&rooms_payload).unwrap_or_else(|err| {
        eprintln!("Error: {}", err);
        process::exit(1);
    });

    let outcome = rewrite_document(&document, &template, &rooms, &options).unwrap_or_else(|err| {
        eprintln!("Error: {}", err);
        process::exit(1);
    });

    warn_duplicates(&outcome.reports);

    if matches.get_flag("dry-run") {
        print_reports(&outcome.reports, matches.get_flag("report-json"));
        if outcome.before == outcome.after {
            println!("No changes detected.");
        } else {
            println!("{}", outcome.after);
        }
        return;
    }

    match matches.get_one::<String>("grid-out") {
        Some(grid_out) => {
            handle_backup(grid_in, grid_out, matches.get_flag("backup"));
            write_file(grid_out, &outcome.after);
            print_reports(&outcome.reports, matches.get_flag("report-json"));
        }
        None => {
            // stdout carries the document; reports go to stderr
            println!("{}", outcome.after);
            for report in &outcome.reports {
                eprintln!("{}: {} at index {}", report.room, report.action, report.index);
            }
        }
    }
}

fn load_config(matches: &ArgMatches) -> PopdeckConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(value) = matches.get_one::<String>("detect-by") {
        // surface the engine's taxonomy for unknown names before the
        // layered config turns it into a deserialization error
        if let Err(err) = value.parse::<DetectStrategy>() {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
        loader = loader
            .set_override("edit.detect_by", value.as_str())
            .unwrap_or_else(|err| {
                eprintln!("Configuration error: {}", err);
                process::exit(1);
            });
    }
    if let Some(value) = matches.get_one::<String>("insert-mode") {
        if let Err(err) = value.parse::<InsertMode>() {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
        loader = loader
            .set_override("edit.insert_mode", value.as_str())
            .unwrap_or_else(|err| {
                eprintln!("Configuration error: {}", err);
                process::exit(1);
            });
    }
    if let Some(value) = matches.get_one::<String>("indent") {
        let indent: i64 = value.parse().unwrap_or_else(|_| {
            eprintln!("Error: --indent expects a non-negative integer");
            process::exit(1);
        });
        if indent < 0 {
            eprintln!("Error: --indent expects a non-negative integer");
            process::exit(1);
        }
        loader = loader
            .set_override("edit.indent", indent)
            .unwrap_or_else(|err| {
                eprintln!("Configuration error: {}", err);
                process::exit(1);
            });
    }
    loader.build().unwrap_or_else(|err| {
        eprintln!("Configuration error: {}", err);
        process::exit(1);
    })
}

fn warn_duplicates(reports: &[Report]) {
    for report in reports {
        if !report.duplicates.is_empty() {
            eprintln!(
                "Warning: multiple stacks match room '{}' (indices {:?}); only index {} was rewritten.",
                report.room, report.duplicates, report.index
            );
        }
    }
}

fn print_reports(reports: &[Report], as_json: bool) {
    if as_json {
        let rendered = serde_json::to_string_pretty(reports).unwrap_or_else(|err| {
            eprintln!("Error rendering reports: {}", err);
            process::exit(1);
        });
        println!("{}", rendered);
    } else {
        for report in reports {
            println!("{}: {} at index {}", report.room, report.action, report.index);
        }
    }
}

/// Copy the input aside before an in-place rewrite. Never clobbers an
/// existing backup.
fn handle_backup(grid_in: &str, grid_out: &str, backup: bool) {
    if !backup {
        return;
    }
    let same_target = match (fs::canonicalize(grid_in), fs::canonicalize(grid_out)) {
        (Ok(input), Ok(output)) => input == output,
        // the output may not exist yet; only an in-place rewrite needs a backup
        _ => Path::new(grid_in) == Path::new(grid_out),
    };
    if !same_target {
        return;
    }
    let backup_path = format!("{}.bak", grid_in);
    if Path::new(&backup_path).exists() {
        eprintln!("Backup file already exists: {}", backup_path);
        return;
    }
    if let Err(err) = fs::copy(grid_in, &backup_path) {
        eprintln!("Failed to create backup {}: {}", backup_path, err);
        process::exit(1);
    }
    eprintln!("Created backup at {}", backup_path);
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("Failed to read {}: {}", path, err);
        process::exit(1);
    })
}

fn write_file(path: &str, content: &str) {
    let mut text = content.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    fs::write(path, text).unwrap_or_else(|err| {
        eprintln!("Failed to write {}: {}", path, err);
        process::exit(1);
    });
}
