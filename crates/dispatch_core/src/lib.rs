mod grid;
mod listing;
mod models;
mod nearest;
mod persistence;

pub use crate::grid::{DEFAULT_GRID_SIZE, GridView};
pub use crate::listing::Listing;
pub use crate::models::*;
pub use crate::persistence::{FieldError, LineFields, PersistenceError, UNREPORTED_SENTINEL};

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of records of each kind the classic console tool accepts.
pub const DEFAULT_RECORD_LIMIT: usize = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Incident with ID {incident_id} not found")]
    IncidentNotFound { incident_id: IncidentId },
    #[error("Station with ID {station_id} not found")]
    StationNotFound { station_id: StationId },
    #[error("Incident with ID {incident_id} has not been reported from any station")]
    IncidentNotReported { incident_id: IncidentId },
    #[error("Max {kind}s limit reached ({limit})")]
    CapacityExceeded { kind: RecordKind, limit: usize },
    #[error("Invalid station index {position} (expected 1 to {station_count})")]
    InvalidSelection {
        position: usize,
        station_count: usize,
    },
    #[error("No available dispatchers")]
    NoDispatchers,
    #[error("Station name must not contain line breaks")]
    InvalidName,
    #[error("Station ID {station_id} is reserved for unreported incidents")]
    ReservedStationId { station_id: StationId },
}

/// Dispatcher picked for an incident by [`EmergencyStore::assign_dispatcher`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub incident_id: IncidentId,
    pub dispatcher_id: DispatcherId,
    pub distance: u64,
}

/// In-memory registry of stations, incidents and dispatchers.
///
/// Each record kind is kept in insertion order. Ids are caller-assigned and
/// never checked for uniqueness: lookups return the first match.
#[derive(Debug, Clone, Default)]
pub struct EmergencyStore {
    stations: Vec<Station>,
    incidents: Vec<Incident>,
    dispatchers: Vec<Dispatcher>,
    record_limit: Option<usize>,
}

impl EmergencyStore {
    /// Store without any bound on the number of records.
    pub fn new() -> Self {
        EmergencyStore::default()
    }

    /// Store holding at most `limit` records of each kind.
    pub fn with_record_limit(limit: usize) -> Self {
        EmergencyStore {
            record_limit: Some(limit),
            ..EmergencyStore::default()
        }
    }

    pub fn record_limit(&self) -> Option<usize> {
        self.record_limit
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn dispatchers(&self) -> &[Dispatcher] {
        &self.dispatchers
    }

    pub fn station(&self, station_id: StationId) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == station_id)
    }

    pub fn incident(&self, incident_id: IncidentId) -> Option<&Incident> {
        self.incidents.iter().find(|i| i.id == incident_id)
    }

    fn find_incident(&self, incident_id: IncidentId) -> Result<&Incident, StoreError> {
        self.incident(incident_id).ok_or_else(|| {
            tracing::debug!("Incident {} not found", incident_id);
            StoreError::IncidentNotFound { incident_id }
        })
    }

    fn check_capacity(&self, kind: RecordKind, len: usize) -> Result<(), StoreError> {
        match self.record_limit {
            Some(limit) if len >= limit => {
                tracing::debug!("Rejecting {}: limit of {} reached", kind, limit);
                Err(StoreError::CapacityExceeded { kind, limit })
            }
            _ => Ok(()),
        }
    }

    pub fn add_station(
        &mut self,
        id: StationId,
        x: i32,
        y: i32,
        name: impl Into<String>,
    ) -> Result<(), StoreError> {
        let name = name.into();
        if name.contains(['\n', '\r']) {
            return Err(StoreError::InvalidName);
        }
        self.push_station(Station {
            id,
            location: Location::new(x, y),
            name,
        })
    }

    fn push_station(&mut self, station: Station) -> Result<(), StoreError> {
        // The saved form of an unreported incident would point at this station.
        if station.id == UNREPORTED_SENTINEL {
            tracing::debug!("Rejecting station with reserved id {}", station.id);
            return Err(StoreError::ReservedStationId {
                station_id: station.id,
            });
        }
        self.check_capacity(RecordKind::Station, self.stations.len())?;
        tracing::info!("Adding station {} ({})", station.id, station.name);
        self.stations.push(station);
        Ok(())
    }

    /// Adds an incident that has not been reported from any station yet.
    pub fn add_incident(
        &mut self,
        id: IncidentId,
        x: i32,
        y: i32,
        report_time: i32,
        response_time: i32,
    ) -> Result<(), StoreError> {
        self.push_incident(Incident::new(
            id,
            Location::new(x, y),
            report_time,
            response_time,
        ))
    }

    fn push_incident(&mut self, incident: Incident) -> Result<(), StoreError> {
        self.check_capacity(RecordKind::Incident, self.incidents.len())?;
        tracing::info!("Adding incident {} at {}", incident.id, incident.location);
        self.incidents.push(incident);
        Ok(())
    }

    pub fn add_dispatcher(&mut self, id: DispatcherId, x: i32, y: i32) -> Result<(), StoreError> {
        self.push_dispatcher(Dispatcher {
            id,
            location: Location::new(x, y),
        })
    }

    fn push_dispatcher(&mut self, dispatcher: Dispatcher) -> Result<(), StoreError> {
        self.check_capacity(RecordKind::Dispatcher, self.dispatchers.len())?;
        tracing::info!(
            "Adding dispatcher {} at {}",
            dispatcher.id,
            dispatcher.location
        );
        self.dispatchers.push(dispatcher);
        Ok(())
    }

    pub fn list_all(&self) -> Listing<'_> {
        Listing::new(self)
    }

    /// The classic 5x5 map.
    pub fn render_grid(&self) -> GridView<'_> {
        self.grid(DEFAULT_GRID_SIZE)
    }

    pub fn grid(&self, size: u32) -> GridView<'_> {
        GridView::new(self, size)
    }

    /// Records that the incident was reported from the station at the
    /// 1-based `position` of the station list.
    ///
    /// The incident is left unchanged when the position is out of range.
    pub fn report_incident(
        &mut self,
        incident_id: IncidentId,
        position: usize,
    ) -> Result<&Station, StoreError> {
        let Some(incident_idx) = self.incidents.iter().position(|i| i.id == incident_id) else {
            tracing::debug!("Incident {} not found", incident_id);
            return Err(StoreError::IncidentNotFound { incident_id });
        };

        let station_count = self.stations.len();
        if position == 0 || position > station_count {
            tracing::debug!(
                "Invalid station index {} for incident {}",
                position,
                incident_id
            );
            return Err(StoreError::InvalidSelection {
                position,
                station_count,
            });
        }

        let station = &self.stations[position - 1];
        self.incidents[incident_idx].reported_from = Some(station.id);
        tracing::info!(
            "Incident {} reported from station {}",
            incident_id,
            station.id
        );
        Ok(station)
    }

    /// Picks the dispatcher closest to the incident.
    ///
    /// Nothing is stored: the incident record is not modified.
    pub fn assign_dispatcher(&self, incident_id: IncidentId) -> Result<Assignment, StoreError> {
        let incident = self.find_incident(incident_id)?;
        let (dispatcher, distance) =
            nearest::nearest_dispatcher(&self.dispatchers, &incident.location)
                .ok_or(StoreError::NoDispatchers)?;
        tracing::info!(
            "Incident {} assigned to dispatcher {} (distance {})",
            incident_id,
            dispatcher.id,
            distance
        );
        Ok(Assignment {
            incident_id,
            dispatcher_id: dispatcher.id,
            distance,
        })
    }

    /// Distance between the incident and the station it was reported from.
    pub fn distance_to_station(&self, incident_id: IncidentId) -> Result<u64, StoreError> {
        let incident = self.find_incident(incident_id)?;
        let station_id = incident
            .reported_from
            .ok_or(StoreError::IncidentNotReported { incident_id })?;
        let station = self.station(station_id).ok_or_else(|| {
            tracing::debug!("Station {} not found", station_id);
            StoreError::StationNotFound { station_id }
        })?;
        Ok(incident.location.distance_to(&station.location))
    }

    /// Drops every record. The record limit is kept.
    pub fn clear(&mut self) {
        self.stations.clear();
        self.incidents.clear();
        self.dispatchers.clear();
    }

    pub fn write_to<W: Write>(&self, out: W) -> Result<(), PersistenceError> {
        persistence::write_store(self, out)?;
        Ok(())
    }

    /// Replaces the whole content of the store with the records read from
    /// `reader`.
    ///
    /// The store is only touched once the input has been fully parsed.
    /// Records past the record limit and stations using the reserved id
    /// `-1` are skipped.
    pub fn read_from<R: BufRead>(&mut self, reader: R) -> Result<(), PersistenceError> {
        let snapshot = persistence::read_snapshot(reader)?;
        self.clear();
        let mut skipped = 0;
        for station in snapshot.stations {
            skipped += usize::from(self.push_station(station).is_err());
        }
        for incident in snapshot.incidents {
            skipped += usize::from(self.push_incident(incident).is_err());
        }
        for dispatcher in snapshot.dispatchers {
            skipped += usize::from(self.push_dispatcher(dispatcher).is_err());
        }
        if skipped > 0 {
            tracing::warn!("Skipped {} records that could not be stored", skipped);
        }
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_to(BufWriter::new(file))?;
        tracing::info!("Data saved to {}", path.display());
        Ok(())
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.read_from(BufReader::new(file))?;
        tracing::info!("Data loaded from {}", path.display());
        Ok(())
    }
}
