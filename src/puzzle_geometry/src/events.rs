//! Competition events and the puzzles they are held on

use phf::phf_map;

use crate::shapes::puzzle_description;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventInfo {
    pub puzzle_id: &'static str,
    pub event_name: &'static str,
}

impl EventInfo {
    /// The geometric description of the event's puzzle, for puzzles that
    /// are cut from a solid
    #[must_use]
    pub fn puzzle_description(&self) -> Option<&'static str> {
        puzzle_description(self.puzzle_id)
    }
}

const fn event(puzzle_id: &'static str, event_name: &'static str) -> EventInfo {
    EventInfo {
        puzzle_id,
        event_name,
    }
}

static WCA_EVENTS: phf::Map<&'static str, EventInfo> = phf_map! {
    "333" => event("3x3x3", "3x3x3 Cube"),
    "222" => event("2x2x2", "2x2x2 Cube"),
    "444" => event("4x4x4", "4x4x4 Cube"),
    "555" => event("5x5x5", "5x5x5 Cube"),
    "666" => event("6x6x6", "6x6x6 Cube"),
    "777" => event("7x7x7", "7x7x7 Cube"),
    "333bf" => event("3x3x3", "3x3x3 Blindfolded"),
    "333fm" => event("3x3x3", "3x3x3 Fewest Moves"),
    "333oh" => event("3x3x3", "3x3x3 One-Handed"),
    "clock" => event("clock", "Clock"),
    "minx" => event("megaminx", "Megaminx"),
    "pyram" => event("pyraminx", "Pyraminx"),
    "skewb" => event("skewb", "Skewb"),
    "sq1" => event("square1", "Square-1"),
    "444bf" => event("4x4x4", "4x4x4 Blindfolded"),
    "555bf" => event("5x5x5", "5x5x5 Blindfolded"),
    "333mb" => event("3x3x3", "3x3x3 Multi-Blind"),
};

static TWIZZLE_EVENTS: phf::Map<&'static str, EventInfo> = phf_map! {
    "fto" => event("fto", "Face-Turning Octahedron"),
    "master_tetraminx" => event("master_tetraminx", "Master Tetraminx"),
    "kilominx" => event("kilominx", "Kilominx"),
    "redi_cube" => event("redi_cube", "Redi Cube"),
};

/// Looks up an official WCA event id such as `333` or `minx`
#[must_use]
pub fn wca_event_info(event_id: &str) -> Option<EventInfo> {
    WCA_EVENTS.get(event_id).copied()
}

/// Looks up a WCA event, falling back to the unofficial events
#[must_use]
pub fn event_info(event_id: &str) -> Option<EventInfo> {
    wca_event_info(event_id).or_else(|| TWIZZLE_EVENTS.get(event_id).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wca_events() {
        let minx = wca_event_info("minx").unwrap();
        assert_eq!(minx.puzzle_id, "megaminx");
        assert_eq!(minx.puzzle_description(), Some("d f 0.7"));
        assert_eq!(wca_event_info("333oh").unwrap().event_name, "3x3x3 One-Handed");
        assert!(wca_event_info("fto").is_none());
    }

    #[test]
    fn unofficial_events() {
        let fto = event_info("fto").unwrap();
        assert_eq!(fto.event_name, "Face-Turning Octahedron");
        assert_eq!(fto.puzzle_description(), Some("o f 0.333333333333333"));
        assert_eq!(event_info("sq1").unwrap().puzzle_description(), None);
        assert!(event_info("444444").is_none());
    }
}
