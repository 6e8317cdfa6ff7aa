use std::io::{BufRead, Write};
use std::path::PathBuf;

use dispatch_core::{EmergencyStore, FieldError, IncidentId, LineFields};

use crate::config::ShellConfig;
use crate::menu::MenuChoice;

enum Flow {
    Continue,
    Exit,
}

/// Menu-driven session over an [`EmergencyStore`].
///
/// Reads one line per prompt from `input` and writes everything the user
/// sees to `output`. Failed store operations are reported on `output` and
/// never end the session.
pub struct Shell<R, W> {
    store: EmergencyStore,
    config: ShellConfig,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(config: ShellConfig, input: R, output: W) -> Self {
        Shell {
            store: config.new_store(),
            config,
            input,
            output,
        }
    }

    pub fn store(&self) -> &EmergencyStore {
        &self.store
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the menu loop until "Exit" is chosen or the input ends.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            for choice in MenuChoice::ALL {
                writeln!(self.output, "{choice}")?;
            }
            let Some(line) = self.prompt("Enter your choice: ")? else {
                break;
            };
            let choice = match MenuChoice::parse(&line) {
                Ok(choice) => choice,
                Err(e) => {
                    tracing::debug!("Rejected menu input: {:#}", e);
                    writeln!(self.output, "Invalid choice. Try again.")?;
                    continue;
                }
            };

            match self.execute(choice) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) if e.is::<FieldError>() => {
                    writeln!(self.output, "Invalid input: {e}")?;
                }
                Err(e) => return Err(e),
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn execute(&mut self, choice: MenuChoice) -> anyhow::Result<Flow> {
        tracing::debug!("Menu choice: {}", choice.label());
        match choice {
            MenuChoice::AddStation => self.add_station(),
            MenuChoice::AddIncident => self.add_incident(),
            MenuChoice::AddDispatcher => self.add_dispatcher(),
            MenuChoice::PrintLocations => {
                write!(self.output, "{}", self.store.list_all())?;
                Ok(Flow::Continue)
            }
            MenuChoice::DisplayMap => {
                write!(self.output, "{}", self.store.grid(self.config.grid_size))?;
                Ok(Flow::Continue)
            }
            MenuChoice::ReportIncident => {
                let Some(incident_id) = self.prompt_incident_id("Enter Incident ID to report: ")?
                else {
                    return Ok(Flow::Exit);
                };
                self.report_incident(incident_id)
            }
            MenuChoice::AssignDispatcher => {
                let Some(incident_id) =
                    self.prompt_incident_id("Enter Incident ID to assign dispatcher: ")?
                else {
                    return Ok(Flow::Exit);
                };
                self.assign_dispatcher(incident_id)?;
                Ok(Flow::Continue)
            }
            MenuChoice::CalculateDistance => {
                let Some(incident_id) =
                    self.prompt_incident_id("Enter Incident ID to calculate distance: ")?
                else {
                    return Ok(Flow::Exit);
                };
                self.distance_to_station(incident_id)?;
                Ok(Flow::Continue)
            }
            MenuChoice::Demo => self.demo(),
            MenuChoice::Save => self.save(),
            MenuChoice::Load => self.load(),
            MenuChoice::Exit => Ok(Flow::Exit),
        }
    }

    /// Writes `message` and reads one line, `None` once the input is exhausted.
    fn prompt(&mut self, message: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn prompt_incident_id(&mut self, message: &str) -> anyhow::Result<Option<IncidentId>> {
        let Some(line) = self.prompt(message)? else {
            return Ok(None);
        };
        let mut fields = LineFields::new(&line);
        let incident_id = fields.next_int("incident id")?;
        fields.finish()?;
        Ok(Some(incident_id))
    }

    fn add_station(&mut self) -> anyhow::Result<Flow> {
        let Some(line) = self.prompt("Enter Station ID, X, Y, Name: ")? else {
            return Ok(Flow::Exit);
        };
        let mut fields = LineFields::new(&line);
        let id = fields.next_int("station id")?;
        let x = fields.next_int("x")?;
        let y = fields.next_int("y")?;
        let name = fields.remainder().to_string();
        if let Err(e) = self.store.add_station(id, x, y, name) {
            writeln!(self.output, "{e}.")?;
        }
        Ok(Flow::Continue)
    }

    fn add_incident(&mut self) -> anyhow::Result<Flow> {
        let Some(line) = self.prompt("Enter Incident ID, X, Y, Report Time, Response Time: ")?
        else {
            return Ok(Flow::Exit);
        };
        let mut fields = LineFields::new(&line);
        let id = fields.next_int("incident id")?;
        let x = fields.next_int("x")?;
        let y = fields.next_int("y")?;
        let report_time = fields.next_int("report time")?;
        let response_time = fields.next_int("response time")?;
        fields.finish()?;
        if let Err(e) = self
            .store
            .add_incident(id, x, y, report_time, response_time)
        {
            writeln!(self.output, "{e}.")?;
        }
        Ok(Flow::Continue)
    }

    fn add_dispatcher(&mut self) -> anyhow::Result<Flow> {
        let Some(line) = self.prompt("Enter Dispatcher ID, X, Y: ")? else {
            return Ok(Flow::Exit);
        };
        let mut fields = LineFields::new(&line);
        let id = fields.next_int("dispatcher id")?;
        let x = fields.next_int("x")?;
        let y = fields.next_int("y")?;
        fields.finish()?;
        if let Err(e) = self.store.add_dispatcher(id, x, y) {
            writeln!(self.output, "{e}.")?;
        }
        Ok(Flow::Continue)
    }

    /// Lists the stations, asks for a 1-based index and records the report.
    fn report_incident(&mut self, incident_id: IncidentId) -> anyhow::Result<Flow> {
        if self.store.incident(incident_id).is_none() {
            writeln!(self.output, "Incident with ID {incident_id} not found.")?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output, "Select a station:")?;
        for (idx, station) in self.store.stations().iter().enumerate() {
            writeln!(self.output, "{}. {}", idx + 1, station.name)?;
        }
        let Some(line) = self.prompt("Enter station index: ")? else {
            return Ok(Flow::Exit);
        };
        let mut fields = LineFields::new(&line);
        let index = fields.next_int("station index")?;
        fields.finish()?;

        // Negative indexes are as invalid as 0.
        let position = usize::try_from(index).unwrap_or(0);
        match self.store.report_incident(incident_id, position) {
            Ok(station) => {
                let station_id = station.id;
                writeln!(
                    self.output,
                    "Incident reported from station ID {station_id}."
                )?;
            }
            Err(e) => writeln!(self.output, "{e}.")?,
        }
        Ok(Flow::Continue)
    }

    fn assign_dispatcher(&mut self, incident_id: IncidentId) -> anyhow::Result<()> {
        match self.store.assign_dispatcher(incident_id) {
            Ok(assignment) => writeln!(
                self.output,
                "Incident assigned to dispatcher ID {}.",
                assignment.dispatcher_id
            )?,
            Err(e) => writeln!(self.output, "{e}.")?,
        }
        Ok(())
    }

    fn distance_to_station(&mut self, incident_id: IncidentId) -> anyhow::Result<()> {
        match self.store.distance_to_station(incident_id) {
            Ok(distance) => writeln!(
                self.output,
                "Shortest distance to station for incident with ID {incident_id} is: {distance}"
            )?,
            Err(e) => writeln!(self.output, "{e}.")?,
        }
        Ok(())
    }

    /// Scripted walk through add, report, assign and distance for a canned incident.
    fn demo(&mut self) -> anyhow::Result<Flow> {
        const DEMO_INCIDENT: IncidentId = 1;

        if let Err(e) = self.store.add_station(1, 0, 0, "Central") {
            writeln!(self.output, "{e}.")?;
        }
        if let Err(e) = self.store.add_incident(DEMO_INCIDENT, 3, 3, 12, 13) {
            writeln!(self.output, "{e}.")?;
        }
        if let Flow::Exit = self.report_incident(DEMO_INCIDENT)? {
            return Ok(Flow::Exit);
        }
        self.assign_dispatcher(DEMO_INCIDENT)?;
        self.distance_to_station(DEMO_INCIDENT)?;
        Ok(Flow::Continue)
    }

    fn prompt_path(&mut self, message: &str) -> anyhow::Result<Option<PathBuf>> {
        let Some(line) = self.prompt(message)? else {
            return Ok(None);
        };
        let name = line.trim();
        if name.is_empty() {
            Ok(Some(self.config.data_file.clone()))
        } else {
            Ok(Some(PathBuf::from(name)))
        }
    }

    fn save(&mut self) -> anyhow::Result<Flow> {
        let Some(path) = self.prompt_path("Enter filename to save data: ")? else {
            return Ok(Flow::Exit);
        };
        match self.store.save(&path) {
            Ok(()) => writeln!(self.output, "Data saved to {}", path.display())?,
            Err(e) => writeln!(self.output, "Error saving data: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn load(&mut self) -> anyhow::Result<Flow> {
        let Some(path) = self.prompt_path("Enter filename to load data: ")? else {
            return Ok(Flow::Exit);
        };
        match self.store.load(&path) {
            Ok(()) => writeln!(self.output, "Data loaded from {}", path.display())?,
            Err(e) => writeln!(self.output, "Error loading data: {e}")?,
        }
        Ok(Flow::Continue)
    }
}
