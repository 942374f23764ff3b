//! CLI argument definitions for the terminology dictionary engine.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "termdict",
    version,
    about = "Coded terminology dictionary engine",
    long_about = "Query coded terminology and anatomic context dictionaries.\n\n\
                  Loads the built-in category/type/modifier and anatomic region\n\
                  dictionaries, plus any *.json dictionaries from a user directory,\n\
                  and answers lookup, search, and conversion queries against them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Override the built-in dictionaries directory.
    #[arg(long = "dictionaries-dir", value_name = "DIR", global = true)]
    pub dictionaries_dir: Option<PathBuf>,

    /// Additional dictionary directory scanned for *.json files.
    #[arg(long = "user-dir", value_name = "DIR", global = true)]
    pub user_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the loaded terminology and anatomic contexts.
    Contexts,

    /// List (or search) the categories of a terminology context.
    Categories(CategoriesArgs),

    /// List (or search) the types of a category.
    Types(TypesArgs),

    /// Merge a segment descriptor file into a named context.
    Import(ImportArgs),

    /// Decode a serialized terminology entry string.
    Decode(DecodeArgs),

    /// Look up an entry by its legacy short label.
    Label(LabelArgs),
}

#[derive(Parser)]
pub struct CategoriesArgs {
    /// Name of the terminology context.
    #[arg(value_name = "TERMINOLOGY")]
    pub terminology: String,

    /// Case-insensitive substring filter on the code meaning.
    #[arg(long = "search", value_name = "TEXT", default_value = "")]
    pub search: String,
}

#[derive(Parser)]
pub struct TypesArgs {
    /// Name of the terminology context.
    #[arg(value_name = "TERMINOLOGY")]
    pub terminology: String,

    /// Coding scheme designator of the category (e.g., SCT).
    #[arg(value_name = "CATEGORY_DESIGNATOR")]
    pub category_designator: String,

    /// Code value of the category (e.g., 85756007).
    #[arg(value_name = "CATEGORY_VALUE")]
    pub category_value: String,

    /// Case-insensitive substring filter on the code meaning.
    #[arg(long = "search", value_name = "TEXT", default_value = "")]
    pub search: String,
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Path to the segment descriptor JSON file.
    #[arg(value_name = "DESCRIPTOR")]
    pub descriptor: PathBuf,

    /// Context name to merge into (created when absent).
    #[arg(long = "name", value_name = "NAME")]
    pub name: String,

    /// Write the merged terminology context to a JSON file.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct DecodeArgs {
    /// Serialized entry (7 '~'-delimited fields).
    #[arg(value_name = "ENTRY")]
    pub entry: String,
}

#[derive(Parser)]
pub struct LabelArgs {
    /// Name of the terminology context.
    #[arg(value_name = "TERMINOLOGY")]
    pub terminology: String,

    /// Legacy short label (e.g., "left kidney").
    #[arg(value_name = "LABEL")]
    pub label: String,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
