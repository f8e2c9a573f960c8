//! Transport mode type.

use std::fmt;

/// A transport mode recognised by the journey service.
///
/// The wire encoding (`as_str`) is the mode id the routing API uses both in
/// the `mode` request parameter and in journey leg payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Tube,
    Dlr,
    Overground,
    ElizabethLine,
    NationalRail,
    Tram,
    Bus,
    Walking,
}

impl Mode {
    /// Every mode, in the order they are requested from the service.
    pub const ALL: [Mode; 8] = [
        Mode::Tube,
        Mode::Dlr,
        Mode::Overground,
        Mode::ElizabethLine,
        Mode::NationalRail,
        Mode::Tram,
        Mode::Bus,
        Mode::Walking,
    ];

    /// The service's wire id for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Tube => "tube",
            Mode::Dlr => "dlr",
            Mode::Overground => "overground",
            Mode::ElizabethLine => "elizabeth-line",
            Mode::NationalRail => "national-rail",
            Mode::Tram => "tram",
            Mode::Bus => "bus",
            Mode::Walking => "walking",
        }
    }

    /// Parse a wire id back into a mode. Unknown ids return `None`.
    pub fn parse(s: &str) -> Option<Mode> {
        Mode::ALL.into_iter().find(|mode| mode.as_str() == s)
    }

    /// True for track-bound modes, which rank above bus and walking when
    /// picking a journey's primary mode.
    pub fn is_rail(&self) -> bool {
        !matches!(self, Mode::Bus | Mode::Walking)
    }

    /// Pick the primary mode of a journey from its legs' modes.
    ///
    /// Ranking: the first rail-like leg wins; otherwise bus if any leg is a
    /// bus; otherwise walking.
    pub fn primary(leg_modes: &[Mode]) -> Mode {
        leg_modes
            .iter()
            .copied()
            .find(Mode::is_rail)
            .or_else(|| leg_modes.contains(&Mode::Bus).then_some(Mode::Bus))
            .unwrap_or(Mode::Walking)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_ids_roundtrip() {
        for mode in Mode::ALL {
            assert_eq!(Mode::parse(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn unknown_id_is_none() {
        assert_eq!(Mode::parse("cable-car"), None);
        assert_eq!(Mode::parse(""), None);
    }

    #[test]
    fn rail_ranking() {
        assert!(Mode::Tube.is_rail());
        assert!(Mode::NationalRail.is_rail());
        assert!(Mode::ElizabethLine.is_rail());
        assert!(!Mode::Bus.is_rail());
        assert!(!Mode::Walking.is_rail());
    }

    #[test]
    fn primary_prefers_first_rail_leg() {
        let legs = [Mode::Walking, Mode::Bus, Mode::Overground, Mode::Tube];
        assert_eq!(Mode::primary(&legs), Mode::Overground);
    }

    #[test]
    fn primary_falls_back_to_bus() {
        let legs = [Mode::Walking, Mode::Bus, Mode::Walking];
        assert_eq!(Mode::primary(&legs), Mode::Bus);
    }

    #[test]
    fn primary_of_walk_only_is_walking() {
        assert_eq!(Mode::primary(&[Mode::Walking]), Mode::Walking);
        assert_eq!(Mode::primary(&[]), Mode::Walking);
    }
}
