//! Shared output formatting for taskdeck CLI commands.
//!
//! Every command reports through [`emit_success`] or [`emit_error`]: either a
//! JSON envelope on stdout or a rendered [`Report`] (title, then the
//! non-empty Summary/Details/Warnings sections).

use serde::Serialize;

use crate::error::{exit_codes, Error, Result};

pub const SCHEMA_VERSION: &str = "taskdeck.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Human-readable report for one command: a title line followed by
/// `key: value` facts, free-form lines and notes.
#[derive(Debug, Clone, Default)]
pub struct Report {
    title: String,
    facts: Vec<(String, String)>,
    lines: Vec<String>,
    notes: Vec<String>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn fact(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.facts.push((key.into(), value.into()));
    }

    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Notes are rendered under "Warnings" and carried in the JSON envelope.
    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Success,
    Error,
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'static str>,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    code: i32,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    report: Option<&Report>,
) -> Result<()> {
    if options.json {
        let envelope = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: Status::Success,
            data: Some(data),
            error: None,
            warnings: report.map(|r| r.notes.clone()).unwrap_or_default(),
            hint: None,
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else if let Some(report) = report.filter(|_| !options.quiet) {
        println!("{}", render_report(report));
    }
    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hint = error_hint(err);
    if !json {
        eprintln!("error: {err}");
        if let Some(hint) = hint {
            eprintln!("hint: {hint}");
        }
        return Ok(());
    }

    let envelope: Envelope<'_, ()> = Envelope {
        schema_version: SCHEMA_VERSION,
        command,
        status: Status::Error,
        data: None,
        error: Some(ErrorBody {
            message: err.to_string(),
            code: err.exit_code(),
            kind: error_kind(err),
            details: err.details(),
        }),
        warnings: Vec::new(),
        hint,
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

pub fn render_report(report: &Report) -> String {
    let facts: Vec<String> = report
        .facts
        .iter()
        .map(|(key, value)| match value.as_str() {
            "" => key.clone(),
            value => format!("{key}: {value}"),
        })
        .collect();

    let sections = [
        ("Summary", facts.as_slice()),
        ("Details", report.lines.as_slice()),
        ("Warnings", report.notes.as_slice()),
    ];
    let mut out = report.title.clone();
    for (heading, entries) in sections.iter().filter(|(_, entries)| !entries.is_empty()) {
        out.push_str("\n\n");
        out.push_str(heading);
        out.push(':');
        for entry in entries.iter() {
            out.push_str("\n- ");
            out.push_str(entry);
        }
    }
    out
}

/// Command label for error envelopes, read before clap parses the args.
pub fn infer_command_name_from_args() -> String {
    let mut positional = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--data-dir" {
            args.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        positional.push(arg);
        if positional.len() == 2 {
            break;
        }
    }

    match positional.as_slice() {
        [] => "taskdeck".to_string(),
        [command, sub] if matches!(command.as_str(), "task" | "project") => {
            format!("{command} {sub}")
        }
        [command, ..] => command.clone(),
    }
}

fn error_kind(err: &Error) -> &'static str {
    if err.is_validation() {
        "validation"
    } else if err.exit_code() == exit_codes::USER_ERROR {
        "user_error"
    } else {
        "operation_failed"
    }
}

fn error_hint(err: &Error) -> Option<&'static str> {
    match err {
        Error::ProjectNotFound(_) | Error::InvalidTransferTarget { .. } => {
            Some("taskdeck project list")
        }
        Error::NoCurrentProject => Some("taskdeck project use <id>"),
        Error::UnknownTaskState(_) | Error::MissingTaskState => Some("taskdeck states"),
        Error::TaskToUpdateNotFound(_) | Error::TaskToDeleteNotFound(_) => {
            Some("taskdeck task list")
        }
        Error::InvalidConfig(_) => Some("fix taskdeck.toml then retry"),
        Error::LockFailed(_) => Some("another taskdeck process holds the board; retry"),
        _ => None,
    }
}
