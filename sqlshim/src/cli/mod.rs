#![cfg(not(target_family = "wasm"))]

use std::env;
use std::io::{self, Read, Write};
use std::process::exit;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueHint};
use clio::{Input, Output};
use schemars::schema_for;

use sqlshim::ir::Statement;
use sqlshim::{compile, json, CompiledSql, ErrorMessages, Options, ParamStyle, Target};

/// Entrypoint called by [`crate::main`]
pub fn main() -> color_eyre::eyre::Result<()> {
    env_logger::builder().format_timestamp(None).init();
    color_eyre::install()?;

    let mut cli = Cli::parse();

    if let Err(error) = cli.command.run() {
        eprintln!("{error}");
        // Copied from
        // https://doc.rust-lang.org/src/std/backtrace.rs.html#1-504, since it's private
        fn backtrace_enabled() -> bool {
            match env::var("RUST_LIB_BACKTRACE") {
                Ok(s) => s != "0",
                Err(_) => match env::var("RUST_BACKTRACE") {
                    Ok(s) => s != "0",
                    Err(_) => false,
                },
            }
        }
        if backtrace_enabled() {
            eprintln!("{:#}", error.backtrace());
        }

        exit(1)
    }

    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about, version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a JSON statement tree to SQL
    #[command(name = "compile")]
    Compile {
        #[command(flatten)]
        io_args: IoArgs,

        /// Exclude the signature comment containing the sqlshim version
        #[arg(long = "hide-signature-comment", action = clap::ArgAction::SetFalse)]
        signature_comment: bool,

        /// Emit unformatted, dense SQL
        #[arg(long = "no-format", action = clap::ArgAction::SetFalse)]
        format: bool,

        /// Target to compile to
        #[arg(short, long, default_value = "sql.any", env = "SQLSHIM_TARGET")]
        target: String,

        /// Placeholder style of bound parameters [possible values: inline,
        /// question_mark, colon, dollar]
        #[arg(long, value_parser = ParamStyle::from_str)]
        param_style: Option<ParamStyle>,

        /// Major version of the database server, selects what it supports
        #[arg(long)]
        server_version: Option<u32>,

        /// Maximum number of values in a single `IN` list
        #[arg(long)]
        max_in_list: Option<usize>,

        /// Whether the database supports `LIMIT` / `OFFSET`
        #[arg(long)]
        native_offset_limit: Option<bool>,

        /// Whether the database supports `FETCH FIRST n ROWS ONLY`
        #[arg(long)]
        fetch_first: Option<bool>,

        /// Write booleans as `1` / `0`
        #[arg(long)]
        emulate_booleans: Option<bool>,

        /// Output SQL, or JSON with the SQL and its bound parameters
        #[arg(value_enum, long, default_value = "sql")]
        emit: Emit,
    },

    /// Show available compile target names
    #[command(name = "list-targets")]
    ListTargets,

    #[command(subcommand)]
    Debug(DebugCommand),
}

/// Commands meant for debugging, prone to change
#[derive(Subcommand, Debug)]
enum DebugCommand {
    /// Print JSON Schema
    JsonSchema {
        #[arg(value_enum, long, default_value = "statement")]
        schema_type: SchemaType,
    },
}

#[derive(clap::Args, Debug)]
struct IoArgs {
    #[arg(value_parser, default_value = "-", value_hint(ValueHint::AnyPath))]
    input: Input,

    #[arg(value_parser, default_value = "-", value_hint(ValueHint::FilePath))]
    output: Output,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum Emit {
    Sql,
    Json,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum SchemaType {
    Statement,
    Options,
    Compiled,
}

impl Command {
    fn run(&mut self) -> Result<()> {
        match self {
            Command::ListTargets => {
                println!("{}", Target::names().join("\n"));
                Ok(())
            }
            Command::Debug(DebugCommand::JsonSchema { schema_type }) => {
                let schema = match schema_type {
                    SchemaType::Statement => schema_for!(Statement),
                    SchemaType::Options => schema_for!(Options),
                    SchemaType::Compiled => schema_for!(CompiledSql),
                };
                io::stdout().write_all(&serde_json::to_string_pretty(&schema)?.into_bytes())?;
                Ok(())
            }
            Command::Compile { io_args, .. } => {
                let mut source = String::new();
                io_args.input.read_to_string(&mut source)?;

                let buf = self.execute(&source)?;
                self.write_output(&buf)?;
                Ok(())
            }
        }
    }

    fn execute(&self, source: &str) -> Result<Vec<u8>> {
        let Command::Compile { emit, .. } = self else {
            unreachable!()
        };

        let statement = json::to_statement(source)?;
        let compiled = compile(&statement, &self.options()?)?;
        log::debug!("compiled with {} bound parameters", compiled.params.len());

        Ok(match emit {
            Emit::Sql => compiled.sql.into_bytes(),
            Emit::Json => serde_json::to_string_pretty(&compiled)?.into_bytes(),
        })
    }

    fn options(&self) -> Result<Options> {
        let Command::Compile {
            signature_comment,
            format,
            target,
            param_style,
            server_version,
            max_in_list,
            native_offset_limit,
            fetch_first,
            emulate_booleans,
            ..
        } = self
        else {
            unreachable!()
        };

        let target = Target::from_str(target).map_err(ErrorMessages::from)?;
        let Target::Sql(dialect) = &target;
        let dialect = dialect.unwrap_or_default();

        let mut capabilities = match (dialect, server_version) {
            (sqlshim::sql::Dialect::Oracle, Some(version)) => {
                sqlshim::Capabilities::oracle(*version)
            }
            _ => dialect.capabilities(),
        };
        let overridden = max_in_list.is_some()
            || native_offset_limit.is_some()
            || fetch_first.is_some()
            || server_version.is_some();
        if let Some(max) = max_in_list {
            capabilities.max_in_list = Some(*max);
        }
        if let Some(native) = native_offset_limit {
            capabilities.offset_limit = *native;
        }
        if let Some(fetch_first) = fetch_first {
            capabilities.fetch_first = *fetch_first;
        }

        let mut options = Options::default()
            .with_target(target)
            .with_format(*format)
            .with_signature_comment(*signature_comment);
        if overridden {
            options = options.with_capabilities(capabilities);
        }
        if let Some(style) = param_style {
            options = options.with_param_style(*style);
        }
        if let Some(emulate) = emulate_booleans {
            options = options.with_emulate_booleans(*emulate);
        }
        Ok(options)
    }

    fn write_output(&mut self, data: &[u8]) -> std::io::Result<()> {
        let Command::Compile { io_args, .. } = self else {
            unreachable!()
        };
        io_args.output.write_all(data)?;
        io_args.output.write_all(b"\n")
    }
}
