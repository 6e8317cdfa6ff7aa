use std::fmt;

use crate::EmergencyStore;

pub const DEFAULT_GRID_SIZE: u32 = 5;

/// Map of the square grid `0..size` in both axes.
///
/// Rows follow `x`, columns follow `y`. A cell shows `S` when a station
/// sits on it, `I` when only an incident does, and `.` otherwise.
/// Dispatchers are not drawn.
pub struct GridView<'a> {
    store: &'a EmergencyStore,
    size: u32,
}

impl<'a> GridView<'a> {
    pub(crate) fn new(store: &'a EmergencyStore, size: u32) -> Self {
        GridView { store, size }
    }

    pub fn marker(&self, x: i32, y: i32) -> char {
        let occupied = |location: &crate::Location| location.x == x && location.y == y;
        if self.store.stations().iter().any(|s| occupied(&s.location)) {
            'S'
        } else if self.store.incidents().iter().any(|i| occupied(&i.location)) {
            'I'
        } else {
            '.'
        }
    }
}

impl fmt::Display for GridView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Visual Representation:")?;
        // Coordinates are i32, so larger grids cannot hold anything beyond that.
        let size = i32::try_from(self.size).unwrap_or(i32::MAX);
        for x in 0..size {
            for y in 0..size {
                if y > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", self.marker(x, y))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
