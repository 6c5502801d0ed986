//! Track type table (contiguous d100 bands).

use super::RangeEntry;

const fn band(min: u32, max: u32, value: &'static str) -> RangeEntry<&'static str> {
    RangeEntry { min, max, value }
}

/// The kind of track a room asks the player to make.
pub static TRACK_TYPES: [RangeEntry<&str>; 12] = [
    band(1, 12, "Drums"),
    band(13, 24, "Bass"),
    band(25, 36, "Melody"),
    band(37, 46, "Chords"),
    band(47, 56, "Vocal Chop"),
    band(57, 64, "Pad"),
    band(65, 72, "Lead"),
    band(73, 80, "Arpeggio"),
    band(81, 86, "Texture"),
    band(87, 92, "Sample Flip"),
    band(93, 97, "Percussion"),
    band(98, 100, "Wildcard"),
];

/// Names of every track type, in table order.
pub fn track_type_names() -> impl Iterator<Item = &'static str> {
    TRACK_TYPES.iter().map(|e| e.value)
}

/// Look up the canonical spelling of a track type (case-insensitive).
pub fn find_track_type(name: &str) -> Option<&'static str> {
    let name = name.trim();
    track_type_names().find(|t| t.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::super::resolve_range;
    use super::*;

    #[test]
    fn bands_are_contiguous() {
        let mut expected = 1;
        for entry in &TRACK_TYPES {
            assert_eq!(entry.min, expected, "gap before {}", entry.value);
            assert!(entry.max >= entry.min);
            expected = entry.max + 1;
        }
        assert_eq!(expected, 101);
    }

    #[test]
    fn lookup_by_roll() {
        assert_eq!(resolve_range(&TRACK_TYPES, 1).value, "Drums");
        assert_eq!(resolve_range(&TRACK_TYPES, 13).value, "Bass");
        assert_eq!(resolve_range(&TRACK_TYPES, 100).value, "Wildcard");
    }

    #[test]
    fn find_is_case_insensitive() {
        assert_eq!(find_track_type("vocal chop"), Some("Vocal Chop"));
        assert_eq!(find_track_type(" BASS "), Some("Bass"));
        assert_eq!(find_track_type("Kazoo"), None);
    }
}
