use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::{LevelFilter, debug, warn};
use simple_core::{Compilation, Diagnostic, SourceText, WasmArtifact};
use simple_logger::SimpleLogger;
use wasmi::{Caller, Engine, Extern, Linker, Module, Store};

/// Command line front end for the Simple compiler.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(long, global = true, help = "Log compiler phases at debug level")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a source file to a wasm module.
    Build {
        input: PathBuf,
        #[arg(
            short,
            long,
            value_name = "PATH",
            help = "Output path (defaults to the input with a .wasm extension)"
        )]
        output: Option<PathBuf>,
    },
    /// Report diagnostics without generating code.
    Check { input: PathBuf },
    /// Compile a source file and execute its `main`.
    Run { input: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    SimpleLogger::new()
        .with_level(level)
        .env()
        .init()
        .context("failed to install logger")?;
    execute(cli.command)
}

fn execute(command: Command) -> Result<()> {
    match command {
        Command::Build { input, output } => {
            let output = output.unwrap_or_else(|| input.with_extension("wasm"));
            let compilation = load(&input)?;
            let result = compilation.emit(&output);
            report(&input, compilation.text(), &result.diagnostics);
            if !result.success {
                bail!("build failed with {} error(s)", result.diagnostics.len());
            }
            println!("Wrote {}", output.display());
        }
        Command::Check { input } => {
            let compilation = load(&input)?;
            let diagnostics = compilation.check();
            report(&input, compilation.text(), &diagnostics);
            if !diagnostics.is_empty() {
                bail!("check failed with {} error(s)", diagnostics.len());
            }
            println!("No errors found in {}", input.display());
        }
        Command::Run { input } => {
            let compilation = load(&input)?;
            let result = compilation.compile_wasm();
            report(&input, compilation.text(), &result.diagnostics);
            let Some(artifact) = result.artifact.filter(|_| result.success) else {
                bail!("compilation failed with {} error(s)", result.diagnostics.len());
            };
            let code = run_wasm(&artifact)?;
            println!("Program exited with {code}");
        }
    }
    Ok(())
}

fn load(input: &Path) -> Result<Compilation> {
    Compilation::from_file(input)
        .with_context(|| format!("failed to read input file {}", input.display()))
}

/// Print diagnostics to stderr, one block per diagnostic with the offending
/// source line.
fn report(input: &Path, text: &SourceText, diagnostics: &[Diagnostic]) {
    let mut stderr = io::stderr().lock();
    for diagnostic in diagnostics {
        let (line, column) = text.line_column(diagnostic.span.start);
        let _ = writeln!(stderr, "error[{}]: {}", diagnostic.code, diagnostic.message);
        let _ = writeln!(
            stderr,
            "  --> {}:{}:{}",
            input.display(),
            line + 1,
            column + 1
        );
        let _ = writeln!(stderr, "   | {}", text.line_text(line));
    }
}

fn run_wasm(artifact: &WasmArtifact) -> Result<i32> {
    let engine = Engine::default();
    let module = Module::new(&engine, &artifact.wasm).context("failed to compile wasm artifact")?;
    let mut linker = Linker::<()>::new(&engine);
    linker
        .func_wrap("env", "print", |caller: Caller<'_, ()>, ptr: i32| {
            if let Some(text) = read_string(&caller, ptr) {
                print!("{text}");
            }
        })
        .context("failed to link env.print")?;
    linker
        .func_wrap("env", "println", |caller: Caller<'_, ()>, ptr: i32| {
            if let Some(text) = read_string(&caller, ptr) {
                println!("{text}");
            }
        })
        .context("failed to link env.println")?;

    let mut store = Store::new(&engine, ());
    let instance = linker
        .instantiate_and_start(&mut store, &module)
        .context("failed to instantiate module")?;
    let main = instance
        .get_typed_func::<(), i32>(&store, "main")
        .context("exported main function missing or has wrong type")?;
    debug!("running {} ({} bytes)", simple_core::ENTRY_POINT, artifact.wasm.len());
    let result = main
        .call(&mut store, ())
        .context("failed to execute main")?;
    io::stdout().flush().context("failed to flush program output")?;
    Ok(result)
}

/// Strings live in linear memory as a little-endian `u32` length followed by
/// the UTF-8 bytes.
fn read_string(caller: &Caller<'_, ()>, ptr: i32) -> Option<String> {
    let Some(memory) = caller.get_export("memory").and_then(Extern::into_memory) else {
        warn!("module does not export its memory");
        return None;
    };
    let mut len = [0u8; 4];
    let offset = ptr as u32 as usize;
    if let Err(err) = memory.read(caller, offset, &mut len) {
        warn!("bad string pointer {ptr}: {err}");
        return None;
    }
    let mut bytes = vec![0u8; u32::from_le_bytes(len) as usize];
    if let Err(err) = memory.read(caller, offset + 4, &mut bytes) {
        warn!("string at {ptr} runs past memory: {err}");
        return None;
    }
    Some(String::from_utf8_lossy(&bytes).into_owned())
}
