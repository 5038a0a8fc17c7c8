use std::io::Cursor;

use brainfold::{
    classify, compile, filter,
    interpreter::{Executor, ExecutorOptions, Runtime, RuntimeOptions},
    profiler::{write_report, Profiler},
    resolve, CodegenOptions, Error, OptimizationFlags, ResolveError,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

struct Outcome {
    output: Vec<u8>,
    tape: Vec<u8>,
    cursor: usize,
}

fn execute(source: &str, input: &[u8], fast_idioms: bool) -> Result<Outcome, Error> {
    execute_with(source, input, fast_idioms, false)
}

fn execute_with(
    source: &str,
    input: &[u8],
    fast_idioms: bool,
    profiled: bool,
) -> Result<Outcome, Error> {
    let program = filter(source);
    let jumps = resolve(&program)?;
    let mut profiler = if profiled {
        Profiler::new(classify(&program, &jumps))
    } else {
        Profiler::disabled()
    };
    let mut output = vec![];
    let (tape, cursor) = {
        let mut runtime = Runtime::new(
            RuntimeOptions::default(),
            Box::new(Cursor::new(input.to_vec())),
            Box::new(&mut output),
        );
        Executor::new(ExecutorOptions { fast_idioms }).run(
            &mut runtime,
            &program,
            &jumps,
            &mut profiler,
        )?;
        (runtime.tape().to_vec(), runtime.cursor())
    };
    Ok(Outcome {
        output,
        tape,
        cursor,
    })
}

#[test]
fn multiplies_four_by_four() {
    let outcome = execute("++++[>++++<-]>.", b"", false).unwrap();
    assert_eq!(outcome.output, vec![16]);
    assert_eq!(outcome.cursor, 1);
    assert_eq!(&outcome.tape[..2], &[0, 16]);
}

#[test]
fn bounded_loop_terminates() {
    let outcome = execute("+[>+++<-]", b"", false).unwrap();
    assert_eq!(&outcome.tape[..2], &[0, 3]);
    assert!(outcome.output.is_empty());
}

#[test]
fn hello_world() {
    let source = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
    let outcome = execute(source, b"", false).unwrap();
    assert_eq!(outcome.output, b"Hello World!\n");
}

#[test]
fn reversing_input_with_comments() {
    // read until EOF leaves a zero, then print backwards
    let source = "read: >,[>,] print: <[.<]";
    let outcome = execute(source, b"abc", false).unwrap();
    assert_eq!(outcome.output, b"cba");
}

#[test]
fn bracket_errors_surface_through_the_crate_error() {
    let err = execute("+]", b"", false).err().unwrap();
    assert_eq!(err.position(), Some(1));
    assert!(matches!(
        err,
        Error::Resolve(ResolveError::UnmatchedClose { position: 1 })
    ));

    let err = execute("[[]", b"", false).err().unwrap();
    assert_eq!(err.position(), Some(0));
}

#[test]
fn error_positions_map_back_to_source() {
    let program = filter("+\n  +]");
    let err = resolve(&program).unwrap_err();
    let location = program.location(err.position()).unwrap();
    assert_eq!(location.to_string(), "2:4");
}

#[test]
fn profile_report_for_a_nested_program() {
    let program = filter("++[>+[-]<-]");
    let jumps = resolve(&program).unwrap();
    let mut profiler = Profiler::new(classify(&program, &jumps));
    let mut runtime = Runtime::new(
        RuntimeOptions::default(),
        Box::new(Cursor::new(vec![])),
        Box::new(Vec::new()),
    );
    Executor::default()
        .run(&mut runtime, &program, &jumps, &mut profiler)
        .unwrap();

    let mut report = vec![];
    write_report(&profiler, &program, &mut report).unwrap();
    let report = String::from_utf8(report).unwrap();

    assert!(report.starts_with("Instruction counts (19 total):\n"));
    assert!(report.contains("Simple loops:\n  [5..7] [-] : 2 entries, 0 iterations\n"));
    assert!(report.contains("Non-simple loops:\n  [2..10] [>+[-]<-] : 1 entries, 1 iterations\n"));
}

#[test]
fn profiling_does_not_change_the_run() {
    let sources = [
        ",.,.++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..",
        "+++++[->+<]>.",
        "+>+>+>+>+[<]>.",
    ];
    for source in sources {
        for fast_idioms in [false, true] {
            let plain = execute_with(source, b"echo", fast_idioms, false).unwrap();
            let profiled = execute_with(source, b"echo", fast_idioms, true).unwrap();
            assert_eq!(plain.output, profiled.output, "{source} fast={fast_idioms}");
            assert_eq!(plain.tape, profiled.tape, "{source} fast={fast_idioms}");
            assert_eq!(plain.cursor, profiled.cursor, "{source} fast={fast_idioms}");
        }
    }
}

#[test]
fn compiles_increment_and_write() {
    let program = filter("+.");
    let jumps = resolve(&program).unwrap();
    let options = CodegenOptions {
        wrap_pointer: false,
        optimizations: OptimizationFlags::empty(),
        ..CodegenOptions::default()
    };
    let expected = "\
section .bss
    tape resb 30000
section .text
global _start
_start:
    mov rsi, tape ; cursor
    inc byte [rsi]
    mov rax, 1
    mov rdi, 1
    mov rdx, 1
    syscall
end_program:
    mov rax, 60
    xor rdi, rdi ; exit code 0
    syscall
";
    assert_eq!(compile(&program, &jumps, options).unwrap(), expected);
}

#[test]
fn compiled_loops_are_balanced() {
    let program = filter("++[>+[-]<-][.[,]]");
    let jumps = resolve(&program).unwrap();
    let assembly = compile(&program, &jumps, CodegenOptions::default()).unwrap();

    let starts = assembly.matches("_start:\n").count() - 1;
    let ends = assembly
        .lines()
        .filter(|line| line.starts_with("loop_") && line.ends_with("_end:"))
        .count();
    // `[-]` becomes a clear, the other three stay loops
    assert_eq!(starts, 3);
    assert_eq!(ends, 3);
    assert!(assembly.contains("    mov byte [rsi], 0\n"));
}

fn program_source() -> impl Strategy<Value = String> {
    let leaf = prop::sample::select(vec!['>', '<', '+', '-', '.']).prop_map(|c| c.to_string());
    leaf.prop_recursive(3, 24, 6, |inner| {
        prop::collection::vec(inner, 0..6).prop_map(|parts| {
            // bodies only print or run nested loops, which exit on a zero cell, so the
            // leading `-` makes every generated loop terminate
            let body: String = parts
                .into_iter()
                .filter(|part| part.len() > 1 || part == ".")
                .collect();
            format!("[-{}]", body)
        })
    })
}

proptest! {
    #[test]
    fn runs_are_deterministic(parts in prop::collection::vec(program_source(), 0..4)) {
        let source = parts.concat();
        let first = execute(&source, b"", false).unwrap();
        let second = execute(&source, b"", false).unwrap();
        prop_assert_eq!(&first.output, &second.output);
        prop_assert_eq!(&first.tape, &second.tape);
        prop_assert_eq!(first.cursor, second.cursor);
    }

    #[test]
    fn profiling_only_observes(
        parts in prop::collection::vec(program_source(), 0..4),
        fast_idioms in any::<bool>(),
    ) {
        let source = parts.concat();
        let plain = execute_with(&source, b"", fast_idioms, false).unwrap();
        let profiled = execute_with(&source, b"", fast_idioms, true).unwrap();
        prop_assert_eq!(plain.output, profiled.output);
        prop_assert_eq!(plain.tape, profiled.tape);
        prop_assert_eq!(plain.cursor, profiled.cursor);
    }

    #[test]
    fn fast_idioms_agree_with_stepping(parts in prop::collection::vec(
        prop::sample::select(vec!["+", "++", "-", ">", "<", ".", "[-]", "[->+<]", "[-<->]", "[>]", "[<]"]),
        0..16,
    )) {
        let source = parts.concat();
        let slow = execute(&source, b"", false).unwrap();
        let fast = execute(&source, b"", true).unwrap();
        prop_assert_eq!(slow.output, fast.output);
        prop_assert_eq!(slow.tape, fast.tape);
        prop_assert_eq!(slow.cursor, fast.cursor);
    }
}
