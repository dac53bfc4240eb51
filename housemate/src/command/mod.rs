//! Command processor - drives the model service from command lines.
//!
//! Each line is echoed to the output, parsed into a [`Command`] and applied
//! to the [`HouseMateService`]. `show` and `query` write their results after
//! the echo.

mod parse;

pub use parse::*;

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::{info, warn};

use knowledge_engine::{ErrorPolicy, SourceLines};

use crate::error::{HouseMateError, Result};
use crate::service::HouseMateService;

/// Summary of a command file run.
#[derive(Debug, Default)]
pub struct CommandReport {
    /// Commands applied successfully.
    pub executed: usize,

    /// Lines skipped under the tolerant policy.
    pub errors: Vec<HouseMateError>,
}

impl CommandReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Applies command lines to a model service.
#[derive(Debug)]
pub struct CommandProcessor {
    service: HouseMateService,
    policy: ErrorPolicy,
}

impl CommandProcessor {
    pub fn new(service: HouseMateService, policy: ErrorPolicy) -> Self {
        Self { service, policy }
    }

    pub fn service(&self) -> &HouseMateService {
        &self.service
    }

    pub fn into_service(self) -> HouseMateService {
        self.service
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Run one command line. Returns whether the line held a command.
    pub fn execute_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<bool> {
        let Some(command) = Command::parse(line)? else {
            return Ok(false);
        };
        writeln!(out, "{}", line.trim()).map_err(|err| HouseMateError::io(line.trim(), err))?;
        self.execute(command, out).map_err(|err| with_input(err, line))?;
        Ok(true)
    }

    /// Apply a parsed command.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<()> {
        let service = &mut self.service;
        match command {
            Command::DefineHouse { id } => service.create_house(&id),
            Command::DefineRoom {
                id,
                floor,
                room_type,
                house,
            } => service.create_room(&id, floor, &room_type, &house),
            Command::DefineSensor {
                id,
                sensor_type,
                room,
            } => service.create_sensor(&id, &sensor_type, &room),
            Command::DefineAppliance {
                id,
                appliance_type,
                room,
            } => service.create_appliance(&id, &appliance_type, &room),
            Command::DefineOccupant { id, occupant_type } => {
                service.create_occupant(&id, &occupant_type)
            }
            Command::AddOccupant {
                occupant,
                house,
                relation,
            } => service.add_occupant(&occupant, &house, &relation),
            Command::SetStatus {
                target_kind,
                target,
                status,
                value,
            } => {
                let mismatch = service.kind_of(&target).filter(|actual| *actual != target_kind);
                if let Some(actual) = mismatch {
                    let expected = format!("a {target_kind}");
                    return Err(HouseMateError::wrong_kind(target, expected, actual));
                }
                service.set_status(&target, &status, &value).map(|_| ())
            }
            Command::SetOptions { status, params } => service.set_status_options(&status, &params),
            Command::Show { id } => {
                let lines = service.show_configuration(id.as_deref())?;
                write_lines(out, &lines)
            }
            Command::Query { pattern } => match service.query(&pattern)? {
                Some(outcome) => write_lines(out, &outcome.render(service.sentinel())),
                None => Ok(()),
            },
        }
    }

    /// Run every command in `reader`, honoring the error policy.
    pub fn execute_reader<R: BufRead, W: Write>(
        &mut self,
        reader: R,
        source: &str,
        out: &mut W,
    ) -> Result<CommandReport> {
        let mut report = CommandReport::default();

        for (line_number, line) in SourceLines::new(reader) {
            let line = line.map_err(|err| HouseMateError::io(source, err).at(line_number, source))?;
            let executed = line
                .into_text()
                .map_err(HouseMateError::from)
                .and_then(|text| self.execute_line(&text, out));

            match executed {
                Ok(true) => report.executed += 1,
                Ok(false) => {}
                Err(err @ HouseMateError::Io { .. }) => return Err(err.at(line_number, source)),
                Err(err) => {
                    let err = err.at(line_number, source);
                    if self.policy.is_fail_fast() {
                        return Err(err);
                    }
                    warn!(error = %err, "skipping command");
                    report.errors.push(err);
                }
            }
        }

        info!(
            source,
            executed = report.executed,
            skipped = report.errors.len(),
            entities = self.service.entity_count(),
            "ran commands"
        );
        Ok(report)
    }

    /// Run a command file.
    pub fn execute_file<W: Write>(
        &mut self,
        path: impl AsRef<Path>,
        out: &mut W,
    ) -> Result<CommandReport> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let file = File::open(path).map_err(|err| HouseMateError::io(&source, err))?;
        self.execute_reader(BufReader::new(file), &source, out)
    }
}

fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> Result<()> {
    for line in lines {
        writeln!(out, "{line}").map_err(|err| HouseMateError::io(line.as_str(), err))?;
    }
    Ok(())
}

/// Point a command-level error at the whole failing line.
fn with_input(err: HouseMateError, line: &str) -> HouseMateError {
    match err {
        HouseMateError::InvalidCommand {
            description,
            location,
            ..
        } => HouseMateError::InvalidCommand {
            description,
            input: line.trim().to_string(),
            location,
        },
        other => other,
    }
}
