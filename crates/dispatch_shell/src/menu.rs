use std::fmt;

use anyhow::bail;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddStation,
    AddIncident,
    AddDispatcher,
    PrintLocations,
    DisplayMap,
    ReportIncident,
    AssignDispatcher,
    CalculateDistance,
    Demo,
    Save,
    Load,
    Exit,
}

impl MenuChoice {
    /// Entries in the order they are printed.
    pub const ALL: [MenuChoice; 12] = [
        MenuChoice::AddStation,
        MenuChoice::AddIncident,
        MenuChoice::AddDispatcher,
        MenuChoice::PrintLocations,
        MenuChoice::DisplayMap,
        MenuChoice::ReportIncident,
        MenuChoice::AssignDispatcher,
        MenuChoice::CalculateDistance,
        MenuChoice::Demo,
        MenuChoice::Save,
        MenuChoice::Load,
        MenuChoice::Exit,
    ];

    pub fn number(self) -> u8 {
        match self {
            MenuChoice::Exit => 0,
            MenuChoice::AddStation => 1,
            MenuChoice::AddIncident => 2,
            MenuChoice::AddDispatcher => 3,
            MenuChoice::PrintLocations => 4,
            MenuChoice::DisplayMap => 5,
            MenuChoice::ReportIncident => 6,
            MenuChoice::AssignDispatcher => 7,
            MenuChoice::CalculateDistance => 8,
            MenuChoice::Demo => 9,
            MenuChoice::Save => 10,
            MenuChoice::Load => 11,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::AddStation => "Add Station",
            MenuChoice::AddIncident => "Add Incident",
            MenuChoice::AddDispatcher => "Add Dispatcher",
            MenuChoice::PrintLocations => "Print Locations",
            MenuChoice::DisplayMap => "Display Map",
            MenuChoice::ReportIncident => "Report Incident",
            MenuChoice::AssignDispatcher => "Assign Dispatcher",
            MenuChoice::CalculateDistance => "Calculate Shortest Distance",
            MenuChoice::Demo => "Auto Add and Assign Incident",
            MenuChoice::Save => "Save Data to File",
            MenuChoice::Load => "Load Data from File",
            MenuChoice::Exit => "Exit",
        }
    }

    pub fn parse(input: &str) -> anyhow::Result<MenuChoice> {
        let number: u8 = match input.trim().parse() {
            Ok(number) => number,
            Err(_) => bail!("choice '{}' is not a number", input.trim()),
        };
        match MenuChoice::ALL.into_iter().find(|c| c.number() == number) {
            Some(choice) => Ok(choice),
            None => bail!("no menu entry {}", number),
        }
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}
