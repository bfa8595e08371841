/// Latin letters and the Cyrillic/Greek glyphs that pass for them in a hostname.
pub const HOMOGRAPH_CHARS: &[(char, &[char])] = &[
    ('a', &['\u{0430}', '\u{0251}', '\u{03B1}']), // Cyrillic а, Latin ɑ, Greek α
    ('e', &['\u{0435}', '\u{03B5}']),             // Cyrillic е, Greek ε
    ('o', &['\u{043E}', '\u{03BF}']),             // Cyrillic о, Greek ο
    ('p', &['\u{0440}', '\u{03C1}']),             // Cyrillic р, Greek ρ
    ('c', &['\u{0441}', '\u{03F2}']),             // Cyrillic с, Greek ϲ
    ('x', &['\u{0445}', '\u{03C7}']),             // Cyrillic х, Greek χ
    ('y', &['\u{0443}', '\u{03B3}']),             // Cyrillic у, Greek γ
    ('n', &['\u{03B7}']),                         // Greek η
    ('i', &['\u{0456}', '\u{03B9}']),             // Cyrillic і, Greek ι
    ('s', &['\u{0455}']),                         // Cyrillic ѕ
];

pub struct HomographAnalyzer;

impl HomographAnalyzer {
    /// First confusable glyph in the host and the Latin letter it imitates
    pub fn find_confusable(host: &str) -> Option<(char, char)> {
        host.chars().find_map(|ch| {
            HOMOGRAPH_CHARS
                .iter()
                .find(|(_, glyphs)| glyphs.contains(&ch))
                .map(|(latin, _)| (ch, *latin))
        })
    }

    pub fn has_confusable(host: &str) -> bool {
        Self::find_confusable(host).is_some()
    }
}
