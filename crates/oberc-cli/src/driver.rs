//! The two-pass driver: parse and register every file, then run the backends.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::{debug, info};
use oberc_compiler::Compiler;
use oberc_fmt::print_functions;
use oberc_parser::parse_source;
use oberc_sema::FunctionTable;
use oberc_syntax::error::{Error, ErrorKind, Result};

use crate::options::Config;

/// Source text of every file loaded in this run, keyed by the name used in
/// positions.
#[derive(Debug, Default)]
pub struct SourceMap {
    files: HashMap<String, String>,
}

impl SourceMap {
    pub fn load(&mut self, path: &Path) -> Result<(String, &str)> {
        let name = path.display().to_string();
        let src = fs::read_to_string(path)
            .map_err(|e| Error::new(ErrorKind::Io(format!("Failed to read {}: {}", name, e))))?;
        let text = self.files.entry(name.clone()).or_insert(src);
        Ok((name, text.as_str()))
    }

    /// One 1-based line of a loaded file.
    pub fn line(&self, file: &str, line: usize) -> Option<&str> {
        self.files.get(file)?.lines().nth(line.checked_sub(1)?)
    }
}

/// Runs both passes. Nothing is written until every requested output has
/// been built, so a failing run leaves stdout and the output file untouched.
pub fn run(config: &Config, sources: &mut SourceMap) -> Result<()> {
    let mut units = Vec::with_capacity(config.files.len());
    for path in &config.files {
        let (name, src) = sources.load(path)?;
        units.push(parse_source(&name, src)?);
    }

    let mut table = FunctionTable::new();
    for unit in &units {
        table.register_unit(unit)?;
    }
    info!("registered {} functions from {} files", table.len(), units.len());

    let dump = if config.dump_ast {
        Some(print_functions(units.iter().flatten(), &table, config.print_options())?)
    } else {
        None
    };

    let listing = if config.wants_listing() {
        let mut compiler = Compiler::new(&table, config.codegen_options());
        let listing = compiler.compile(units.iter().flatten())?.to_string();
        debug!("{} labels issued", compiler.labels_issued());
        Some(listing)
    } else {
        None
    };

    if let Some(text) = dump {
        write_stdout(&text)?;
    }
    if let Some(listing) = listing {
        match &config.output {
            Some(path) => fs::write(path, listing).map_err(|e| {
                Error::new(ErrorKind::Io(format!("Failed to write {}: {}", path.display(), e)))
            })?,
            None => write_stdout(&listing)?,
        }
    }
    Ok(())
}

fn write_stdout(text: &str) -> Result<()> {
    io::stdout()
        .lock()
        .write_all(text.as_bytes())
        .map_err(|e| Error::new(ErrorKind::Io(format!("Failed to write to stdout: {}", e))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_map_serves_loaded_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.ob");
        fs::write(&path, "FUNCTION f() {\n    RETURN;\n}\n").unwrap();
        let mut sources = SourceMap::default();
        let (name, _) = sources.load(&path).unwrap();
        assert_eq!(sources.line(&name, 2), Some("    RETURN;"));
        assert_eq!(sources.line(&name, 0), None);
        assert_eq!(sources.line(&name, 9), None);
        assert_eq!(sources.line("other.ob", 1), None);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let mut sources = SourceMap::default();
        let err = sources.load(Path::new("/definitely/not/here.ob")).unwrap_err();
        assert!(err.pos.is_none());
        assert!(matches!(err.kind, ErrorKind::Io(_)));
    }
}
