use super::error::{MapError, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// A run of characters copied unchanged from the grammar into generated output.
///
/// `line`/`column` locate the run in the generated file, `target_line`/`target_column` in the
/// grammar it came from. All coordinates are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapEntry {
    pub line: usize,
    pub column: usize,
    pub target_line: usize,
    pub target_column: usize,
    pub length: usize,
}

impl MapEntry {
    fn abuts(&self, line: usize, column: usize, target_line: usize, target_column: usize) -> bool {
        self.line == line
            && self.column + self.length == column
            && self.target_line == target_line
            && self.target_column + self.length == target_column
    }

    fn covers(&self, line: usize, column: usize) -> bool {
        self.line == line && self.column <= column && column < self.column + self.length
    }
}

/// Generated-output to grammar position map for one generated file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PositionMap {
    grammar: String,
    entries: Vec<MapEntry>,
}

impl PositionMap {
    /// `grammar` identifies the grammar file the runs point into.
    pub fn new(grammar: impl Into<String>) -> Self {
        Self {
            grammar: grammar.into(),
            entries: Vec::new(),
        }
    }

    pub fn grammar(&self) -> &str {
        &self.grammar
    }

    pub fn entries(&self) -> &[MapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a run, extending the previous one when both coordinate spaces continue it.
    pub fn record(
        &mut self,
        line: usize,
        column: usize,
        target_line: usize,
        target_column: usize,
        length: usize,
    ) {
        if let Some(last) = self.entries.last_mut() {
            if last.abuts(line, column, target_line, target_column) {
                last.length += length;
                return;
            }
        }
        self.entries.push(MapEntry {
            line,
            column,
            target_line,
            target_column,
            length,
        });
    }

    /// Grammar position for a generated-file position, if some run covers it.
    pub fn lookup(&self, line: usize, column: usize) -> Option<(usize, usize)> {
        self.entries
            .iter()
            .find(|entry| entry.covers(line, column))
            .map(|entry| (entry.target_line, entry.target_column + (column - entry.column)))
    }

    /// Text form: the grammar identifier, then `line,column,targetLine,targetColumn,length`
    /// per run, generated position first.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.grammar.len() + 1 + self.entries.len() * 16);
        out.push_str(&self.grammar);
        out.push('\n');
        for entry in &self.entries {
            // Writing to a String cannot fail
            let _ = writeln!(
                out,
                "{},{},{},{},{}",
                entry.line, entry.column, entry.target_line, entry.target_column, entry.length
            );
        }
        out
    }

    /// Parse the text form. Runs are kept exactly as stored; blank lines are ignored.
    pub fn deserialize(text: &str) -> Result<Self> {
        let mut lines = text.lines();
        let grammar = lines.next().ok_or(MapError::MissingHeader)?;
        let mut map = PositionMap::new(grammar);
        for (index, raw) in lines.enumerate() {
            // header is line 1
            let line_number = index + 2;
            if raw.trim().is_empty() {
                continue;
            }
            map.entries.push(parse_entry(raw, line_number)?);
        }
        Ok(map)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.serialize()).map_err(|err| MapError::io(path, err))
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| MapError::io(path, err))?;
        Self::deserialize(&text)
    }
}

fn parse_entry(raw: &str, line: usize) -> Result<MapEntry> {
    let fields: Vec<&str> = raw.trim().split(',').collect();
    if fields.len() != 5 {
        return Err(MapError::Format {
            line,
            reason: format!("expected 5 fields, found {}", fields.len()),
        });
    }
    let mut values = [0usize; 5];
    for (value, field) in values.iter_mut().zip(&fields) {
        *value = field.parse().map_err(|_| MapError::Format {
            line,
            reason: format!("invalid number {field:?}"),
        })?;
    }
    let [line_, column, target_line, target_column, length] = values;
    Ok(MapEntry {
        line: line_,
        column,
        target_line,
        target_column,
        length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_runs_merge() {
        let mut map = PositionMap::new("Taste.atg");
        map.record(3, 10, 40, 4, 5);
        map.record(3, 15, 40, 9, 2);
        assert_eq!(map.len(), 1);
        assert_eq!(map.entries()[0].length, 7);
    }

    #[test]
    fn merge_requires_line_equality_in_both_spaces() {
        let mut map = PositionMap::new("g.atg");
        map.record(3, 0, 40, 0, 4);
        // columns abut but the generated line changed
        map.record(4, 4, 40, 4, 4);
        // columns abut but the grammar line changed
        map.record(4, 8, 41, 8, 4);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn lookup_offsets_into_the_run() {
        let mut map = PositionMap::new("g.atg");
        map.record(100, 8, 7, 12, 20);
        assert_eq!(map.lookup(100, 8), Some((7, 12)));
        assert_eq!(map.lookup(100, 15), Some((7, 19)));
        assert_eq!(map.lookup(100, 28), None);
        assert_eq!(map.lookup(100, 7), None);
        assert_eq!(map.lookup(101, 10), None);
        // grammar coordinates are never a lookup key
        assert_eq!(map.lookup(7, 12), None);
    }

    #[test]
    fn first_covering_run_wins() {
        let mut map = PositionMap::new("g.atg");
        map.record(5, 0, 1, 0, 10);
        map.record(5, 2, 9, 0, 3);
        assert_eq!(map.lookup(5, 3), Some((1, 3)));
    }

    #[test]
    fn serialized_form() {
        let mut map = PositionMap::new("Taste.atg");
        map.record(3, 10, 40, 4, 5);
        map.record(8, 2, 52, 6, 11);
        insta::assert_snapshot!(map.serialize().replace('\n', "|"), @"Taste.atg|3,10,40,4,5|8,2,52,6,11|");
    }

    #[test]
    fn deserialize_keeps_stored_runs() {
        let map = PositionMap::deserialize("g.atg\n0,0,0,0,2\n0,2,0,2,2\n").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.grammar(), "g.atg");
    }

    #[test]
    fn deserialize_accepts_crlf_and_blank_lines() {
        let map = PositionMap::deserialize("g.atg\r\n1,2,3,4,5\r\n\r\n").unwrap();
        assert_eq!(map.lookup(1, 3), Some((3, 5)));
    }

    #[test]
    fn generator_written_rows_map_generated_to_grammar() {
        // generated 99:8 came from grammar 9:4
        let map = PositionMap::deserialize("Calc.atg\n99,8,9,4,12\n").unwrap();
        assert_eq!(map.lookup(99, 10), Some((9, 6)));
        assert_eq!(map.lookup(9, 4), None);
    }

    #[test]
    fn empty_text_has_no_header() {
        assert!(matches!(
            PositionMap::deserialize(""),
            Err(MapError::MissingHeader)
        ));
    }

    #[test]
    fn wrong_field_count_is_a_format_error() {
        let err = PositionMap::deserialize("g.atg\n1,2,3,4,5\n1,2,3\n").unwrap_err();
        match err {
            MapError::Format { line, reason } => {
                assert_eq!(line, 3);
                assert_eq!(reason, "expected 5 fields, found 3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_integer_is_a_format_error() {
        let err = PositionMap::deserialize("g.atg\n1,2,x,4,5\n").unwrap_err();
        assert!(matches!(err, MapError::Format { line: 2, .. }));
        assert_eq!(
            err.to_string(),
            "malformed map entry on line 2: invalid number \"x\""
        );
    }
}
