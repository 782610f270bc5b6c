use owo_colors::OwoColorize;
use oberc_syntax::error::{Error, ErrorKind};

use crate::driver::SourceMap;

/// Prints the diagnostic line, then a source excerpt when the file was loaded.
pub fn render_error(err: &Error, sources: &SourceMap) {
    eprintln!("{}", err);
    if let Some(pos) = &err.pos {
        if let Some(src_line) = sources.line(&pos.file, pos.line) {
            let line_num_str = format!("{:3} | ", pos.line);
            eprintln!("     |");
            eprintln!("{}{}", line_num_str.bright_black(), src_line);
            let mut marker = " ".repeat(line_num_str.len());
            marker.push_str(&" ".repeat(pos.col.saturating_sub(1)));
            marker.push('^');
            eprintln!("{}{}", marker.red(), " error here".red());
            eprintln!("     |");
        }
    }
    if let Some(help) = help_for(&err.kind) {
        eprintln!("{}", help.yellow());
    }
}

fn help_for(kind: &ErrorKind) -> Option<&'static str> {
    match kind {
        ErrorKind::DuplicateDefinition { .. } => {
            Some("Help: overloads must differ in their parameter types; the return type is not part of the signature.")
        }
        ErrorKind::Lookup(_) => {
            Some("Help: arguments must match a definition exactly; INTEGER is never widened to DOUBLE.")
        }
        ErrorKind::IncompatibleType(msg) if msg.contains("STRING") => {
            Some("Help: only '+' works on STRING, and the STRING must be the left operand.")
        }
        _ => None,
    }
}
