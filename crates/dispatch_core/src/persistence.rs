//! Line-oriented text format for a whole store.
//!
//! ```text
//! Stations:
//! <id> <x> <y> <name>
//!
//! Incidents:
//! <id> <x> <y> <reportTime> <responseTime> <reportedFromStationId>
//!
//! Dispatchers:
//! <id> <x> <y>
//!
//! ```
//!
//! The station name is the rest of its line. An unreported incident is
//! written with `-1` as its station reference.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::{Dispatcher, EmergencyStore, Incident, Location, Station};

pub const UNREPORTED_SENTINEL: i32 = -1;

const STATIONS_HEADER: &str = "Stations:";
const INCIDENTS_HEADER: &str = "Incidents:";
const DISPATCHERS_HEADER: &str = "Dispatchers:";
const HEADERS: [&str; 3] = [STATIONS_HEADER, INCIDENTS_HEADER, DISPATCHERS_HEADER];

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Could not access file {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("I/O error: {0}")]
    Stream(#[from] io::Error),
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FieldError {
    #[error("missing {field}")]
    Missing { field: &'static str },
    #[error("invalid {field} '{value}'")]
    Invalid { field: &'static str, value: String },
    #[error("unexpected trailing text '{text}'")]
    Trailing { text: String },
}

/// Whitespace-separated fields of a single line.
pub struct LineFields<'a> {
    rest: &'a str,
}

impl<'a> LineFields<'a> {
    pub fn new(line: &'a str) -> Self {
        LineFields { rest: line }
    }

    pub fn next_int(&mut self, field: &'static str) -> Result<i32, FieldError> {
        let trimmed = self.rest.trim_start();
        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (token, rest) = trimmed.split_at(end);
        self.rest = rest;
        if token.is_empty() {
            return Err(FieldError::Missing { field });
        }
        token.parse().map_err(|_| FieldError::Invalid {
            field,
            value: token.to_string(),
        })
    }

    /// Everything after the fields read so far, leading whitespace removed.
    pub fn remainder(self) -> &'a str {
        self.rest.trim_start()
    }

    /// Fails when anything but whitespace is left on the line.
    pub fn finish(self) -> Result<(), FieldError> {
        let text = self.rest.trim();
        if text.is_empty() {
            Ok(())
        } else {
            Err(FieldError::Trailing {
                text: text.to_string(),
            })
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Snapshot {
    pub(crate) stations: Vec<Station>,
    pub(crate) incidents: Vec<Incident>,
    pub(crate) dispatchers: Vec<Dispatcher>,
}

pub(crate) fn write_store<W: Write>(store: &EmergencyStore, mut out: W) -> io::Result<()> {
    writeln!(out, "{STATIONS_HEADER}")?;
    for station in store.stations() {
        writeln!(
            out,
            "{} {} {} {}",
            station.id, station.location.x, station.location.y, station.name
        )?;
    }
    writeln!(out)?;

    writeln!(out, "{INCIDENTS_HEADER}")?;
    for incident in store.incidents() {
        writeln!(
            out,
            "{} {} {} {} {} {}",
            incident.id,
            incident.location.x,
            incident.location.y,
            incident.report_time,
            incident.response_time,
            incident.reported_from.unwrap_or(UNREPORTED_SENTINEL)
        )?;
    }
    writeln!(out)?;

    writeln!(out, "{DISPATCHERS_HEADER}")?;
    for dispatcher in store.dispatchers() {
        writeln!(
            out,
            "{} {} {}",
            dispatcher.id, dispatcher.location.x, dispatcher.location.y
        )?;
    }
    writeln!(out)?;
    out.flush()
}

pub(crate) fn read_snapshot<R: BufRead>(reader: R) -> Result<Snapshot, PersistenceError> {
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    let mut sections = Sections {
        lines: &lines,
        next: 0,
    };
    let mut snapshot = Snapshot::default();

    for (line, text) in sections.section(STATIONS_HEADER)? {
        snapshot
            .stations
            .push(parse_station(text).map_err(|e| parse_error(line, e))?);
    }
    for (line, text) in sections.section(INCIDENTS_HEADER)? {
        snapshot
            .incidents
            .push(parse_incident(text).map_err(|e| parse_error(line, e))?);
    }
    for (line, text) in sections.section(DISPATCHERS_HEADER)? {
        snapshot
            .dispatchers
            .push(parse_dispatcher(text).map_err(|e| parse_error(line, e))?);
    }

    if let Some((line, text)) = sections.remaining_content() {
        return Err(PersistenceError::Parse {
            line,
            message: format!("unexpected content after dispatchers '{text}'"),
        });
    }
    Ok(snapshot)
}

fn parse_error(line: usize, error: FieldError) -> PersistenceError {
    PersistenceError::Parse {
        line,
        message: error.to_string(),
    }
}

fn parse_station(text: &str) -> Result<Station, FieldError> {
    let mut fields = LineFields::new(text);
    let id = fields.next_int("station id")?;
    let x = fields.next_int("x")?;
    let y = fields.next_int("y")?;
    Ok(Station {
        id,
        location: Location::new(x, y),
        name: fields.remainder().to_string(),
    })
}

fn parse_incident(text: &str) -> Result<Incident, FieldError> {
    let mut fields = LineFields::new(text);
    let id = fields.next_int("incident id")?;
    let x = fields.next_int("x")?;
    let y = fields.next_int("y")?;
    let report_time = fields.next_int("report time")?;
    let response_time = fields.next_int("response time")?;
    let reported_from = fields.next_int("reporting station id")?;
    fields.finish()?;

    let mut incident = Incident::new(id, Location::new(x, y), report_time, response_time);
    incident.reported_from = (reported_from != UNREPORTED_SENTINEL).then_some(reported_from);
    Ok(incident)
}

fn parse_dispatcher(text: &str) -> Result<Dispatcher, FieldError> {
    let mut fields = LineFields::new(text);
    let id = fields.next_int("dispatcher id")?;
    let x = fields.next_int("x")?;
    let y = fields.next_int("y")?;
    fields.finish()?;
    Ok(Dispatcher {
        id,
        location: Location::new(x, y),
    })
}

struct Sections<'a> {
    lines: &'a [String],
    next: usize,
}

impl<'a> Sections<'a> {
    /// Lines of the section opened by `header`, paired with 1-based line numbers.
    ///
    /// A section ends at a blank line, at any section header or at the end
    /// of the input.
    fn section(&mut self, header: &str) -> Result<Vec<(usize, &'a str)>, PersistenceError> {
        let lines = self.lines;
        self.skip_blank();
        match lines.get(self.next) {
            Some(line) if line.trim() == header => self.next += 1,
            Some(line) => {
                return Err(PersistenceError::Parse {
                    line: self.next + 1,
                    message: format!("expected '{header}', found '{line}'"),
                });
            }
            None => {
                return Err(PersistenceError::Parse {
                    line: self.next + 1,
                    message: format!("expected '{header}', found end of file"),
                });
            }
        }

        let mut records = Vec::new();
        while let Some(line) = lines.get(self.next) {
            let trimmed = line.trim();
            if trimmed.is_empty() || HEADERS.contains(&trimmed) {
                break;
            }
            records.push((self.next + 1, line.as_str()));
            self.next += 1;
        }
        Ok(records)
    }

    fn skip_blank(&mut self) {
        while self
            .lines
            .get(self.next)
            .is_some_and(|line| line.trim().is_empty())
        {
            self.next += 1;
        }
    }

    fn remaining_content(&mut self) -> Option<(usize, &'a str)> {
        let lines = self.lines;
        self.skip_blank();
        lines
            .get(self.next)
            .map(|line| (self.next + 1, line.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_store() -> EmergencyStore {
        let mut store = EmergencyStore::new();
        store.add_station(1, 0, 0, "Central").unwrap();
        store.add_station(7, 4, -2, "North Gate Hospital").unwrap();
        store.add_incident(1, 3, 3, 12, 13).unwrap();
        store.add_incident(2, 1, 4, 20, 25).unwrap();
        store.report_incident(2, 2).unwrap();
        store.add_dispatcher(5, 2, 2).unwrap();
        store
    }

    fn written(store: &EmergencyStore) -> String {
        let mut out = Vec::new();
        write_store(store, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_write_format() {
        let expected = "Stations:\n\
                        1 0 0 Central\n\
                        7 4 -2 North Gate Hospital\n\
                        \n\
                        Incidents:\n\
                        1 3 3 12 13 -1\n\
                        2 1 4 20 25 7\n\
                        \n\
                        Dispatchers:\n\
                        5 2 2\n\
                        \n";
        assert_eq!(written(&sample_store()), expected);
    }

    #[test]
    fn test_read_back_written_store() {
        let store = sample_store();
        let snapshot = read_snapshot(Cursor::new(written(&store))).unwrap();
        assert_eq!(snapshot.stations, store.stations());
        assert_eq!(snapshot.incidents, store.incidents());
        assert_eq!(snapshot.dispatchers, store.dispatchers());
    }

    #[test]
    fn test_read_empty_sections() {
        let text = "Stations:\n\nIncidents:\n\nDispatchers:\n\n";
        let snapshot = read_snapshot(Cursor::new(text)).unwrap();
        assert!(snapshot.stations.is_empty());
        assert!(snapshot.incidents.is_empty());
        assert!(snapshot.dispatchers.is_empty());
    }

    #[test]
    fn test_read_without_blank_separators() {
        let text = "Stations:\n2 1 1 West\nIncidents:\n3 0 1 5 6 2\nDispatchers:\n4 3 3";
        let snapshot = read_snapshot(Cursor::new(text)).unwrap();
        assert_eq!(snapshot.stations.len(), 1);
        assert_eq!(snapshot.stations[0].name, "West");
        assert_eq!(snapshot.incidents[0].reported_from, Some(2));
        assert_eq!(snapshot.dispatchers[0].id, 4);
    }

    #[test]
    fn test_station_name_keeps_inner_spaces() {
        let snapshot =
            read_snapshot(Cursor::new("Stations:\n1 0 0   Fire  Dept \nIncidents:\nDispatchers:\n"))
                .unwrap();
        assert_eq!(snapshot.stations[0].name, "Fire  Dept ");
    }

    #[test]
    fn test_missing_header() {
        let error = read_snapshot(Cursor::new("Stations:\n\nDispatchers:\n")).unwrap_err();
        match error {
            PersistenceError::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("Incidents:"));
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_incident() {
        let text = "Stations:\n\nIncidents:\n1 3 x 12 13 -1\n\nDispatchers:\n\n";
        let error = read_snapshot(Cursor::new(text)).unwrap_err();
        match error {
            PersistenceError::Parse { line, message } => {
                assert_eq!(line, 4);
                assert_eq!(message, "invalid y 'x'");
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_dispatcher() {
        let text = "Stations:\nIncidents:\nDispatchers:\n1 2\n";
        let error = read_snapshot(Cursor::new(text)).unwrap_err();
        assert!(matches!(error, PersistenceError::Parse { line: 4, .. }));
    }

    #[test]
    fn test_line_fields() {
        let mut fields = LineFields::new("  12 -3\t7 rest of it ");
        assert_eq!(fields.next_int("a"), Ok(12));
        assert_eq!(fields.next_int("b"), Ok(-3));
        assert_eq!(fields.next_int("c"), Ok(7));
        assert_eq!(fields.remainder(), "rest of it ");

        let mut fields = LineFields::new("4");
        assert_eq!(fields.next_int("id"), Ok(4));
        assert_eq!(
            fields.next_int("x"),
            Err(FieldError::Missing { field: "x" })
        );

        let mut fields = LineFields::new("4 5 6");
        fields.next_int("id").unwrap();
        assert_eq!(
            fields.finish(),
            Err(FieldError::Trailing {
                text: "5 6".into()
            })
        );
    }
}
