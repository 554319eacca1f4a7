//! Parsing of diagnostic lines printed by the C# compiler and by the grammar generator.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// `file(line,col): message`, optionally preceded by a build prefix such as `  1>`.
///
/// The file name may itself contain parentheses (`Program Files (x86)`); the first
/// `(line,col):` group ends it.
static COMPILER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\d+>)?(?P<file>.+?)\((?P<line>\d+),(?P<column>\d+)\)\s*:\s*(?P<message>.*?)\s*$")
        .unwrap()
});

/// `-- line N col M: message`
static GENERATOR_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*--\s*line\s+(?P<line>\d+)\s+col\s+(?P<column>\d+)\s*:\s*(?P<message>.*?)\s*$")
        .unwrap()
});

/// Diagnostic reported against a generated source file. Positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilerDiagnostic {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Diagnostic printed by the generator against the grammar itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorDiagnostic {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

pub fn parse_compiler_line(line: &str) -> Option<CompilerDiagnostic> {
    let captures = COMPILER_LINE.captures(line)?;
    Some(CompilerDiagnostic {
        file: captures["file"].trim().to_string(),
        line: captures["line"].parse().ok()?,
        column: captures["column"].parse().ok()?,
        message: captures["message"].to_string(),
    })
}

/// Every recognisable compiler diagnostic in `text`; other lines are skipped.
pub fn parse_compiler_output(text: &str) -> Vec<CompilerDiagnostic> {
    text.lines().filter_map(parse_compiler_line).collect()
}

pub fn parse_generator_line(line: &str) -> Option<GeneratorDiagnostic> {
    let captures = GENERATOR_LINE.captures(line)?;
    Some(GeneratorDiagnostic {
        line: captures["line"].parse().ok()?,
        column: captures["column"].parse().ok()?,
        message: captures["message"].to_string(),
    })
}

pub fn parse_generator_output(text: &str) -> Vec<GeneratorDiagnostic> {
    text.lines().filter_map(parse_generator_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiler_lines() {
        let output = "\
Microsoft (R) Visual C# Compiler
Parser.cs(120,17): error CS0103: The name 'x' does not exist in the current context
  3>C:\\work\\Scanner.cs(7,1): warning CS0168: unused variable
";
        let found = parse_compiler_output(output);
        assert_eq!(found.len(), 2);
        assert_eq!(
            found[0],
            CompilerDiagnostic {
                file: "Parser.cs".into(),
                line: 120,
                column: 17,
                message: "error CS0103: The name 'x' does not exist in the current context".into(),
            }
        );
        assert_eq!(found[1].file, "C:\\work\\Scanner.cs");
        assert_eq!((found[1].line, found[1].column), (7, 1));
    }

    #[test]
    fn file_names_may_contain_parentheses() {
        let line = r"C:\Program Files (x86)\Calc\Parser.cs(12,3): error CS1525: Invalid expression term ')'";
        let found = parse_compiler_line(line).unwrap();
        assert_eq!(found.file, r"C:\Program Files (x86)\Calc\Parser.cs");
        assert_eq!((found.line, found.column), (12, 3));
        assert_eq!(found.message, "error CS1525: Invalid expression term ')'");
    }

    #[test]
    fn lines_without_a_position_are_skipped() {
        assert_eq!(parse_compiler_line("Build FAILED."), None);
        assert_eq!(parse_compiler_line("  Time Elapsed (00:00:01.25)"), None);
    }

    #[test]
    fn generator_lines() {
        let output = "Coco/R (Apr 19, 2011)\n-- line 4 col 1: \".\" expected\n-- line 12 col 9: undefined string in production\n2 errors detected\n";
        let found = parse_generator_output(output);
        assert_eq!(
            found,
            vec![
                GeneratorDiagnostic {
                    line: 4,
                    column: 1,
                    message: "\".\" expected".into()
                },
                GeneratorDiagnostic {
                    line: 12,
                    column: 9,
                    message: "undefined string in production".into()
                },
            ]
        );
    }

    #[test]
    fn parse_driver_messages_round_trip_through_the_generator_format() {
        use coco_parser::coco::parsing::ParseDiagnostic;
        use coco_parser::coco::source::SourcePosition;

        let diagnostic = ParseDiagnostic::new(SourcePosition::new(3, 14), "\"=\" expected");
        let parsed = parse_generator_line(&diagnostic.to_string()).unwrap();
        assert_eq!((parsed.line, parsed.column), (3, 14));
        assert_eq!(parsed.message, "\"=\" expected");
    }
}
