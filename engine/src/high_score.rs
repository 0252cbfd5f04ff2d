//! volatile table of session winners, keyed by three initials. it lives as long as the process.

use std::fmt::Display;

use log::debug;

use crate::EngineError;

pub const NUM_HIGH_SCORES: usize = 50;
/// number of entries shown on the high-score screen.
pub const TOP_SHOWN: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Initials([u8; 3]);

impl Initials {
    pub fn new(initials: [u8; 3]) -> Result<Self, EngineError> {
        if let Some(c) = initials.iter().find(|c| !c.is_ascii_uppercase()) {
            return Err(EngineError::InvalidInitial(*c as char));
        }
        Ok(Self(initials))
    }

    pub fn as_bytes(&self) -> &[u8; 3] {
        &self.0
    }
}

impl TryFrom<&str> for Initials {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        let mut initials = [0; 3];
        for initial in initials.iter_mut() {
            let c = chars.next().unwrap_or(' ');
            if !c.is_ascii_uppercase() {
                return Err(EngineError::InvalidInitial(c));
            }
            *initial = c as u8;
        }
        if let Some(c) = chars.next() {
            return Err(EngineError::InvalidInitial(c));
        }
        Ok(Self(initials))
    }
}

impl Display for Initials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in self.0 {
            write!(f, "{}", c as char)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighScoreEntry {
    pub initials: Initials,
    pub score: u16,
}

impl HighScoreEntry {
    /// formats the entry as a menu line, e.g. `"ABC:  12 "`. scores are shown with up to three
    /// digits.
    pub fn format_entry(&self) -> String {
        format!("{}: {:>3} ", self.initials, self.score.min(999))
    }
}

#[derive(Clone, Debug, Default)]
pub struct HighScoreTable {
    entries: Vec<HighScoreEntry>,
}

impl HighScoreTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(NUM_HIGH_SCORES),
        }
    }

    /// credits a won session to `initials`, adding them to the table on their first win.
    /// returns the new score.
    pub fn record_win(&mut self, initials: Initials) -> Result<u16, EngineError> {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.initials == initials)
        {
            entry.score = entry.score.saturating_add(1);
            debug!("{initials} now has {} wins", entry.score);
            return Ok(entry.score);
        }
        if self.entries.len() == NUM_HIGH_SCORES {
            return Err(EngineError::HighScoreTableFull);
        }
        self.entries.push(HighScoreEntry { initials, score: 1 });
        debug!("{initials} added to the high-score table");
        Ok(1)
    }

    /// the best `n` entries, highest score first. equal scores keep the order they were
    /// first recorded in.
    pub fn top(&self, n: usize) -> Vec<&HighScoreEntry> {
        let mut sorted: Vec<&HighScoreEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted.truncate(n);
        sorted
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{HighScoreEntry, HighScoreTable, Initials, NUM_HIGH_SCORES};
    use crate::EngineError;

    fn initials(value: &str) -> Initials {
        Initials::try_from(value).unwrap()
    }

    #[test]
    fn initials_validation() {
        assert_eq!(initials("ABC").to_string(), "ABC");
        assert_eq!(
            Initials::try_from("AB"),
            Err(EngineError::InvalidInitial(' '))
        );
        assert_eq!(
            Initials::try_from("ABCD"),
            Err(EngineError::InvalidInitial('D'))
        );
        assert_eq!(
            Initials::try_from("aBC"),
            Err(EngineError::InvalidInitial('a'))
        );
        assert_eq!(
            Initials::new(*b"A1C"),
            Err(EngineError::InvalidInitial('1'))
        );
        assert_eq!(Initials::new(*b"XYZ"), Ok(initials("XYZ")));
    }

    #[test]
    fn record_win() {
        let mut table = HighScoreTable::new();
        assert!(table.is_empty());
        assert_eq!(table.record_win(initials("ABC")), Ok(1));
        assert_eq!(table.record_win(initials("XYZ")), Ok(1));
        assert_eq!(table.record_win(initials("ABC")), Ok(2));
        assert_eq!(table.top(10).len(), 2);
    }

    #[test]
    fn top_is_sorted() {
        let mut table = HighScoreTable::new();
        for name in ["AAA", "BBB", "BBB", "CCC", "DDD", "DDD", "DDD", "EEE"] {
            table.record_win(initials(name)).unwrap();
        }
        let top: Vec<String> = table.top(3).iter().map(|entry| entry.format_entry()).collect();
        assert_eq!(top, vec!["DDD:   3 ", "BBB:   2 ", "AAA:   1 "]);
        assert_eq!(table.top(10).len(), 5);
        assert!(HighScoreTable::new().top(3).is_empty());
    }

    #[test]
    fn full_table() {
        let mut table = HighScoreTable::new();
        let letters = b'A'..=b'Z';
        let names = letters
            .clone()
            .flat_map(|a| letters.clone().map(move |b| [a, b, b'Z']))
            .take(NUM_HIGH_SCORES);
        for name in names {
            table.record_win(Initials::new(name).unwrap()).unwrap();
        }
        assert_eq!(
            table.record_win(initials("QQQ")),
            Err(EngineError::HighScoreTableFull)
        );
        // existing entries can still be credited.
        assert_eq!(table.record_win(initials("AAZ")), Ok(2));
    }

    #[test]
    fn line_format() {
        let entry = HighScoreEntry {
            initials: initials("JOE"),
            score: 42,
        };
        assert_eq!(entry.format_entry(), "JOE:  42 ");
        let entry = HighScoreEntry {
            initials: initials("MAX"),
            score: 1500,
        };
        assert_eq!(entry.format_entry(), "MAX: 999 ");
    }
}
