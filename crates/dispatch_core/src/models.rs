use std::fmt;

use serde::{Deserialize, Serialize};

pub type StationId = i32;
pub type IncidentId = i32;
pub type DispatcherId = i32;

/// Manhattan distance between `(x1, y1)` and `(x2, y2)`.
///
/// Computed on `u64` so that any pair of `i32` coordinates fits.
pub fn distance(x1: i32, y1: i32, x2: i32, y2: i32) -> u64 {
    u64::from(x1.abs_diff(x2)) + u64::from(y1.abs_diff(y2))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub fn new(x: i32, y: i32) -> Self {
        Location { x, y }
    }

    pub fn distance_to(&self, other: &Location) -> u64 {
        distance(self.x, self.y, other.x, other.y)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: StationId,
    pub location: Location,
    pub name: String,
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Coordinates: {}",
            self.id, self.name, self.location
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: IncidentId,
    pub location: Location,
    pub report_time: i32,
    pub response_time: i32,
    /// Station the incident was reported from, `None` until a report is made.
    pub(crate) reported_from: Option<StationId>,
}

impl Incident {
    pub(crate) fn new(
        id: IncidentId,
        location: Location,
        report_time: i32,
        response_time: i32,
    ) -> Self {
        Incident {
            id,
            location,
            report_time,
            response_time,
            reported_from: None,
        }
    }

    pub fn reported_from(&self) -> Option<StationId> {
        self.reported_from
    }
}

impl fmt::Display for Incident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {}, Coordinates: {}", self.id, self.location)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dispatcher {
    pub id: DispatcherId,
    pub location: Location,
}

impl fmt::Display for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {}, Coordinates: {}", self.id, self.location)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    Station,
    Incident,
    Dispatcher,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Station => "station",
            RecordKind::Incident => "incident",
            RecordKind::Dispatcher => "dispatcher",
        };
        f.write_str(name)
    }
}
