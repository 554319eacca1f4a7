//! Tracing compiler diagnostics in generated files back to the grammar.
//!
//! The generator leaves a position map next to the files it writes (see
//! [`RemapConfig::map_file`]). For a diagnostic in one of the configured generated files the
//! remapper loads that map once, caches it, and looks the position up. Map coordinates are
//! zero-based; everything on this API is 1-based like compiler output.

use crate::diagnostics::CompilerDiagnostic;
use coco_config::RemapConfig;
use coco_parser::coco::mapping::{MapError, PositionMap};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// A grammar position. `grammar` is resolved against the map file's directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemappedLocation {
    pub grammar: PathBuf,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemappedDiagnostic {
    #[serde(flatten)]
    pub diagnostic: CompilerDiagnostic,
    pub origin: Option<RemappedLocation>,
}

#[derive(Debug)]
pub struct DiagnosticRemapper {
    settings: RemapConfig,
    cache: Mutex<HashMap<PathBuf, Arc<PositionMap>>>,
}

impl DiagnosticRemapper {
    pub fn new(settings: RemapConfig) -> Self {
        Self {
            settings,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> &RemapConfig {
        &self.settings
    }

    /// Path of the map file that covers `generated`.
    pub fn map_path_for(&self, generated: &Path) -> PathBuf {
        generated.with_file_name(&self.settings.map_file)
    }

    /// Grammar position for a 1-based position in a generated file.
    ///
    /// `Ok(None)` when the file is not one of the generated files, the position is zero, or no
    /// run of the map covers it.
    pub fn remap(
        &self,
        generated: &Path,
        line: usize,
        column: usize,
    ) -> Result<Option<RemappedLocation>, MapError> {
        if line == 0 || column == 0 {
            return Ok(None);
        }
        let is_generated = generated
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.settings.is_generated_file(name));
        if !is_generated {
            return Ok(None);
        }

        let map_path = self.map_path_for(generated);
        let map = self.load(&map_path)?;
        let Some((grammar_line, grammar_column)) = map.lookup(line - 1, column - 1) else {
            return Ok(None);
        };
        Ok(Some(RemappedLocation {
            grammar: resolve_grammar(&map_path, map.grammar()),
            line: grammar_line + 1,
            column: grammar_column + 1,
        }))
    }

    /// Remap each diagnostic; files relative in the compiler output are resolved against
    /// `base_dir`. A map that cannot be read leaves the affected diagnostics unmapped.
    pub fn remap_diagnostics(
        &self,
        diagnostics: Vec<CompilerDiagnostic>,
        base_dir: &Path,
    ) -> Vec<RemappedDiagnostic> {
        diagnostics
            .into_iter()
            .map(|diagnostic| {
                let generated = base_dir.join(&diagnostic.file);
                let origin = match self.remap(&generated, diagnostic.line, diagnostic.column) {
                    Ok(origin) => origin,
                    Err(err) => {
                        warn!(file = %generated.display(), error = %err, "skipping diagnostic remap");
                        None
                    }
                };
                RemappedDiagnostic { diagnostic, origin }
            })
            .collect()
    }

    /// Forget a cached map, e.g. after the generator ran again.
    pub fn invalidate(&self, map_path: &Path) {
        self.lock().remove(map_path);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn load(&self, map_path: &Path) -> Result<Arc<PositionMap>, MapError> {
        if let Some(map) = self.lock().get(map_path) {
            return Ok(map.clone());
        }
        // Read outside the lock; a concurrent load of the same file just wins the insert race
        let map = Arc::new(PositionMap::read_from(map_path)?);
        debug!(path = %map_path.display(), runs = map.len(), "loaded position map");
        Ok(self
            .lock()
            .entry(map_path.to_path_buf())
            .or_insert(map)
            .clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Arc<PositionMap>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn resolve_grammar(map_path: &Path, grammar: &str) -> PathBuf {
    let grammar = PathBuf::from(grammar);
    match map_path.parent() {
        Some(dir) if grammar.is_relative() => dir.join(grammar),
        _ => grammar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn settings() -> RemapConfig {
        RemapConfig {
            map_file: "parser.atgmap".into(),
            generated_files: vec!["Parser.cs".into()],
        }
    }

    fn write_map(dir: &Path) {
        let mut map = PositionMap::new("Calc.atg");
        // generated 99:8 came from grammar 9:4, 12 bytes
        map.record(99, 8, 9, 4, 12);
        map.write_to(dir.join("parser.atgmap")).unwrap();
    }

    #[test]
    fn remaps_covered_positions() {
        let dir = tempdir().unwrap();
        write_map(dir.path());
        let remapper = DiagnosticRemapper::new(settings());

        let location = remapper
            .remap(&dir.path().join("parser.cs"), 100, 12)
            .unwrap()
            .unwrap();
        assert_eq!(location.grammar, dir.path().join("Calc.atg"));
        assert_eq!((location.line, location.column), (10, 8));

        assert_eq!(remapper.remap(&dir.path().join("Parser.cs"), 100, 8).unwrap(), None);
        assert_eq!(remapper.remap(&dir.path().join("Parser.cs"), 0, 9).unwrap(), None);
    }

    #[test]
    fn reads_map_files_in_generator_field_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("parser.atgmap"), "Calc.atg\n99,8,9,4,12\n").unwrap();
        let remapper = DiagnosticRemapper::new(settings());

        let location = remapper
            .remap(&dir.path().join("Parser.cs"), 100, 10)
            .unwrap()
            .unwrap();
        assert_eq!((location.line, location.column), (10, 6));
        // the grammar side of a run is not a generated position
        assert_eq!(remapper.remap(&dir.path().join("Parser.cs"), 10, 5).unwrap(), None);
    }

    #[test]
    fn other_files_are_left_alone() {
        let dir = tempdir().unwrap();
        let remapper = DiagnosticRemapper::new(settings());
        // no map file exists, but it is never consulted
        assert_eq!(remapper.remap(&dir.path().join("Scanner.cs"), 1, 1).unwrap(), None);
    }

    #[test]
    fn missing_map_is_an_error() {
        let dir = tempdir().unwrap();
        let remapper = DiagnosticRemapper::new(settings());
        let err = remapper.remap(&dir.path().join("Parser.cs"), 1, 1).unwrap_err();
        assert!(matches!(err, MapError::NotFound(_)));
    }

    #[test]
    fn maps_are_cached_until_invalidated() {
        let dir = tempdir().unwrap();
        write_map(dir.path());
        let remapper = DiagnosticRemapper::new(settings());
        let generated = dir.path().join("Parser.cs");
        assert!(remapper.remap(&generated, 100, 9).unwrap().is_some());

        fs::remove_file(dir.path().join("parser.atgmap")).unwrap();
        assert!(remapper.remap(&generated, 100, 9).unwrap().is_some());

        remapper.invalidate(&remapper.map_path_for(&generated));
        assert!(remapper.remap(&generated, 100, 9).is_err());
    }

    #[test]
    fn diagnostics_keep_going_past_unreadable_maps() {
        let dir = tempdir().unwrap();
        write_map(dir.path());
        let remapper = DiagnosticRemapper::new(settings());
        let diagnostics = vec![
            CompilerDiagnostic {
                file: "Parser.cs".into(),
                line: 100,
                column: 9,
                message: "error CS1002: ; expected".into(),
            },
            CompilerDiagnostic {
                file: "sub/Parser.cs".into(),
                line: 1,
                column: 1,
                message: "error CS0246".into(),
            },
        ];
        let remapped = remapper.remap_diagnostics(diagnostics, dir.path());
        assert_eq!(remapped.len(), 2);
        assert_eq!(remapped[0].origin.as_ref().map(|o| (o.line, o.column)), Some((10, 5)));
        assert_eq!(remapped[1].origin, None);
    }
}
