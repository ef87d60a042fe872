mod test_runner;

use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use stackscript::block::BlockInstance;
use stackscript::parser::{ParseError, Transpiler};
use stackscript::registry::Registry;
use stackscript::writer;

#[derive(Parser)]
#[command(name = "stackscript", version, about = "Stack script transpiler")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transpile a script and report errors
    Check(CheckArgs),

    /// Transpile a script and print its canonical serialized form
    Format(FormatArgs),

    /// List the registered block types
    Types,

    /// Run .test.script test files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Script file to transpile
    file: String,

    /// Dump the transpiled stack
    #[arg(long)]
    ast: bool,
}

#[derive(clap::Args)]
struct FormatArgs {
    /// Script file to transpile and rewrite
    file: String,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.script file or a directory containing them
    path: String,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Check(args) => do_check(args, cli.no_color),
        Command::Format(args) => do_format(args, cli.no_color),
        Command::Types => {
            for id in Registry::standard().ids() {
                println!("{}", id);
            }
        }
        Command::Test(args) => {
            let exit_code = test_runner::run_tests(Path::new(&args.path), cli.no_color);
            process::exit(exit_code);
        }
    }
}

fn do_check(args: CheckArgs, no_color: bool) {
    let stack = transpile_file(&args.file, no_color);

    if args.ast {
        println!("{:#?}", stack);
        return;
    }

    let structured = stack
        .blocks
        .iter()
        .filter(|b| matches!(b, BlockInstance::Structured(_)))
        .count();
    let raw = stack.blocks.len() - structured;
    eprintln!("ok: {} ({} structured, {} raw)", args.file, structured, raw);
}

fn do_format(args: FormatArgs, no_color: bool) {
    let stack = transpile_file(&args.file, no_color);
    print!("{}", writer::write_stack(&stack.blocks));
}

/// Read and transpile a script file, exiting with a rendered diagnostic
/// on any failure.
fn transpile_file(file: &str, no_color: bool) -> stackscript::Stack {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", file, e);
            process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(file.to_string(), source.clone());

    let registry = Registry::standard();
    let transpiler = Transpiler::new(source, file_id, &registry);
    match transpiler.transpile() {
        Ok(stack) => stack,
        Err(error) => {
            emit_parse_error(&files, &error, no_color);
            process::exit(1);
        }
    }
}

fn emit_parse_error(files: &SimpleFiles<String, String>, error: &ParseError, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    let diagnostic = error.to_diagnostic();
    let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &diagnostic);
}
