//! Command line surface.
//!
//! Thin: parses flags into [`RunOptions`]. Plugin flags come from the fixed
//! [`Plugin`] set; each takes an optional `=VALUE` and a bare flag means `true`.

use camino::Utf8PathBuf;
use clap::{Args, Parser};

use crate::models::{OverrideMap, Plugin};
use crate::runner::RunOptions;
use crate::services::{DEFAULT_EXTENSION, WalkOptions};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "syntux",
    version,
    about = "Rewrite source files in place according to a syntax configuration"
)]
pub struct Cli {
    /// Files or directories to rewrite (defaults to the current directory)
    #[arg(value_name = "PATHS")]
    pub paths: Vec<Utf8PathBuf>,

    /// The path to a syntax.json file to use
    #[arg(short, long, value_name = "FILE")]
    pub syntax: Option<Utf8PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Extension of the files to rewrite
    #[arg(long, value_name = "EXT", default_value = DEFAULT_EXTENSION)]
    pub ext: String,

    /// Also write logs to daily-rotated files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub plugins: PluginArgs,
}

/// One optional flag per [`Plugin`]
#[derive(Args, Debug, Clone, Default)]
#[command(next_help_heading = "Plugins")]
pub struct PluginArgs {
    /// Replace leading tabs with N spaces, or with a literal string
    #[arg(long, value_name = "VALUE", num_args = 0..=1, require_equals = true)]
    pub indent: Option<Option<String>>,

    /// Strip whitespace at the end of lines
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true)]
    pub trailing_whitespace: Option<Option<String>>,

    /// Normalise line breaks: lf or crlf
    #[arg(long, value_name = "STYLE", num_args = 0..=1, require_equals = true)]
    pub line_endings: Option<Option<String>>,

    /// End files with exactly one line break (or none with =false)
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true)]
    pub final_newline: Option<Option<String>>,
}

impl PluginArgs {
    fn raw(&self, plugin: Plugin) -> Option<Option<&str>> {
        let raw = match plugin {
            Plugin::Indent => &self.indent,
            Plugin::TrailingWhitespace => &self.trailing_whitespace,
            Plugin::LineEndings => &self.line_endings,
            Plugin::FinalNewline => &self.final_newline,
        };
        raw.as_ref().map(Option::as_deref)
    }

    /// Plugin values given on the command line, in [`Plugin::ALL`] order
    pub fn overrides(&self) -> OverrideMap {
        let mut overrides = OverrideMap::new();
        for plugin in Plugin::ALL {
            if let Some(raw) = self.raw(plugin) {
                overrides.set(plugin, Plugin::flag_value(raw));
            }
        }
        overrides
    }
}

impl Cli {
    /// Build run options; `cwd` resolves relative paths and starts discovery
    pub fn into_options(self, cwd: Utf8PathBuf) -> RunOptions {
        RunOptions {
            cwd,
            overrides: self.plugins.overrides(),
            paths: self.paths,
            syntax_file: self.syntax,
            walk: WalkOptions {
                extension: self.ext,
            },
        }
    }
}
