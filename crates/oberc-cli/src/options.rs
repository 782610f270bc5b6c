//! Command-line options.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use oberc_compiler::CodegenOptions;
use oberc_fmt::PrintOptions;
use oberc_sema::{FrameLayout, DEFAULT_BYTES_PER_BOOLEAN};

/// Oberc compiler
#[derive(Parser, Debug)]
#[command(name = "oberc")]
#[command(version)]
#[command(about = "Compiles Oberon-style sources to a stack-machine instruction listing")]
pub struct Cli {
    /// Source files, registered in the order given
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Write the instruction listing here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Re-print the parsed sources to stdout
    #[arg(long)]
    pub dump_ast: bool,

    /// Frame bytes reserved per BOOLEAN variable
    #[arg(
        long,
        env = "OBERC_BYTES_PER_BOOLEAN",
        default_value_t = DEFAULT_BYTES_PER_BOOLEAN as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub bytes_per_boolean: u64,

    /// Use overload keys (e.g. max$ii) for labels and call targets
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    pub use_mangled_names: bool,
}

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub files: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub dump_ast: bool,
    pub layout: FrameLayout,
    pub use_mangled_names: bool,
}

impl Cli {
    pub fn into_config(self) -> Config {
        Config {
            files: self.files,
            output: self.output,
            dump_ast: self.dump_ast,
            layout: FrameLayout::new(self.bytes_per_boolean as usize),
            use_mangled_names: self.use_mangled_names,
        }
    }
}

impl Config {
    pub fn codegen_options(&self) -> CodegenOptions {
        CodegenOptions { use_mangled_names: self.use_mangled_names, layout: self.layout }
    }

    pub fn print_options(&self) -> PrintOptions {
        PrintOptions { use_mangled_names: self.use_mangled_names, layout: self.layout }
    }

    /// The listing is produced unless only a re-print was asked for.
    pub fn wants_listing(&self) -> bool {
        !self.dump_ast || self.output.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let config = Cli::try_parse_from(["oberc", "a.ob"]).unwrap().into_config();
        assert_eq!(config.layout, FrameLayout::default());
        assert!(config.use_mangled_names);
        assert!(config.wants_listing());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "oberc",
            "--dump-ast",
            "--bytes-per-boolean",
            "1",
            "--use-mangled-names",
            "false",
            "a.ob",
            "b.ob",
        ])
        .unwrap();
        let config = cli.into_config();
        assert_eq!(config.files.len(), 2);
        assert_eq!(config.layout.bytes_per_boolean, 1);
        assert!(!config.codegen_options().use_mangled_names);
        assert!(!config.wants_listing());
    }

    #[test]
    fn test_rejects_zero_width_booleans_and_missing_files() {
        assert!(Cli::try_parse_from(["oberc", "--bytes-per-boolean", "0", "a.ob"]).is_err());
        assert!(Cli::try_parse_from(["oberc"]).is_err());
    }
}
