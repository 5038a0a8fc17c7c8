use std::{collections::HashSet, fs, io, time::Instant};

use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use brainfold::{
    brackets::JumpTable,
    codegen::{CodeGen, CodegenOptions, X86_64Codegen},
    interpreter::{CursorPolicy, EofBehavior, Executor, ExecutorOptions, Runtime, RuntimeOptions},
    lexer::{to_symbols, Program},
    optimizer::{classify, OptimizationFlags},
    profiler::{write_report, Profiler},
    Error,
};

/// Brainf**k interpreter/profiler/AOT compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to operate on
    #[arg()]
    file: String,

    #[arg(value_enum)]
    commands: Vec<Commands>,

    #[arg(short, long, value_enum)]
    optimizations: Vec<Optimizations>,

    #[arg(short, long)]
    all_optimizations: bool,

    /// Number of cells on the tape
    #[arg(short, long, default_value_t = brainfold::interpreter::DEFAULT_TAPE_SIZE)]
    tape_size: usize,

    #[arg(long, value_enum, default_value_t = CursorPolicy::Wrap)]
    cursor: CursorPolicy,

    #[arg(long, value_enum, default_value_t = EofBehavior::Unchanged)]
    eof: EofBehavior,

    /// Run idiom loops in closed form
    #[arg(long)]
    fast_idioms: bool,

    /// Don't wrap the cursor in generated assembly
    #[arg(long)]
    no_wrap: bool,

    /// Where `compile` writes the assembly
    #[arg(long, default_value = "a.s")]
    output: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Optimizations {
    /// Replace known loop idioms with their closed form
    Idioms,
    /// Drop a loop at the very start of the program
    CommentBlock,
}

#[derive(ValueEnum, Debug, Clone, Hash, PartialEq, Eq)]
enum Commands {
    /// Output the filtered program
    Tokens,
    /// Output the loop classification
    Loops,
    /// Run the program
    Run,
    /// Run the program and report what executed
    Profile,
    /// Write x86-64 assembly
    Compile,
}

fn optimization_flags(optimizations: &HashSet<Optimizations>) -> OptimizationFlags {
    optimizations
        .iter()
        .fold(OptimizationFlags::empty(), |flags, optimization| {
            flags
                | match optimization {
                    Optimizations::Idioms => OptimizationFlags::IDIOMS,
                    Optimizations::CommentBlock => OptimizationFlags::COMMENT_BLOCK,
                }
        })
}

/// Attach the source location of the failing instruction
fn locate(err: impl Into<Error>, program: &Program) -> anyhow::Error {
    let err = err.into();
    match err.position().and_then(|position| program.location(position)) {
        Some(location) => anyhow!("{} {}", location.to_string().red(), err),
        None => anyhow!(err),
    }
}

fn print_loops(program: &Program, jumps: &JumpTable) {
    let classification = classify(program, jumps);
    for info in classification.iter() {
        println!(
            "[{}..{}] {} : {:?} {:?}",
            info.open,
            info.close,
            to_symbols(program.span(info.open, info.close)),
            info.class,
            info.flags
        );
    }
    println!(
        "{} loops, {} simple",
        classification.len(),
        classification.simple_count()
    );
}

fn execute(
    args: &Args,
    program: &Program,
    jumps: &JumpTable,
    profiler: &mut Profiler,
) -> anyhow::Result<()> {
    let options = RuntimeOptions {
        tape_size: args.tape_size,
        cursor: args.cursor,
        eof: args.eof,
    };
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut runtime = Runtime::new(options, Box::new(stdin.lock()), Box::new(stdout.lock()));
    let executor = Executor::new(ExecutorOptions {
        fast_idioms: args.fast_idioms,
    });

    eprintln!("{}", "Starting run".blue());
    let now = Instant::now();
    executor
        .run(&mut runtime, program, jumps, profiler)
        .map_err(|err| locate(err, program))?;
    eprintln!();
    eprintln!("{} {:.2?}", "Finished run in".green(), now.elapsed());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let commands: HashSet<Commands> = HashSet::from_iter(args.commands.iter().cloned());
    let mut optimizations: HashSet<Optimizations> =
        HashSet::from_iter(args.optimizations.iter().copied());
    if args.all_optimizations {
        optimizations.extend(Optimizations::value_variants().iter().copied());
    }

    eprintln!("Running {}", args.file);

    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Couldn't read {}", args.file))?;

    eprintln!("{}", "Starting lexing".blue());
    let now = Instant::now();
    let program = brainfold::filter(&text);
    eprintln!("{} {:.2?}", "Finished lexing in".green(), now.elapsed());
    eprintln!("{} {}", "Program Length".green(), program.len());

    if commands.contains(&Commands::Tokens) {
        println!("{}", program);
    }

    eprintln!("{}", "Starting bracket resolution".blue());
    let now = Instant::now();
    let jumps = brainfold::resolve(&program).map_err(|err| locate(err, &program))?;
    eprintln!(
        "{} {} loops in {:.2?}",
        "Finished bracket resolution with".green(),
        jumps.loop_count(),
        now.elapsed()
    );

    if commands.contains(&Commands::Loops) {
        print_loops(&program, &jumps);
    }

    if commands.contains(&Commands::Run) {
        execute(&args, &program, &jumps, &mut Profiler::disabled())?;
    }

    if commands.contains(&Commands::Profile) {
        let mut profiler = Profiler::new(classify(&program, &jumps));
        execute(&args, &program, &jumps, &mut profiler)?;
        write_report(&profiler, &program, &mut io::stderr().lock())
            .context("Couldn't write the profile report")?;
    }

    if commands.contains(&Commands::Compile) {
        let flags = optimization_flags(&optimizations);
        eprintln!("{} {:?}", "Starting codegen with".blue(), flags);
        let now = Instant::now();
        let mut codegen = X86_64Codegen::new(CodegenOptions {
            tape_size: args.tape_size,
            wrap_pointer: !args.no_wrap,
            optimizations: flags,
        });
        codegen
            .load(&program, &jumps)
            .map_err(|err| locate(err, &program))?;

        let mut file = fs::File::create(&args.output)
            .with_context(|| format!("Couldn't create {}", args.output))?;
        codegen
            .write_to(&mut file)
            .with_context(|| format!("Couldn't write {}", args.output))?;
        eprintln!(
            "{} {} in {:.2?}",
            "Assembly code generated and written to".green(),
            args.output,
            now.elapsed()
        );
    }

    Ok(())
}
