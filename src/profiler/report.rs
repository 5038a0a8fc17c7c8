use std::io::{self, Write};

use crate::{
    lexer::{to_symbols, Instruction, Program},
    optimizer::LoopInfo,
};

use super::{LoopCounts, Profiler};

/// Loop bodies longer than this are cut short in the report
const MAX_BODY_WIDTH: usize = 40;

fn loop_label(program: &Program, info: &LoopInfo) -> String {
    let body = to_symbols(program.span(info.open, info.close));
    if body.len() > MAX_BODY_WIDTH {
        format!("{}...", &body[..MAX_BODY_WIDTH])
    } else {
        body
    }
}

fn write_loops(
    out: &mut dyn Write,
    program: &Program,
    mut loops: Vec<(&LoopInfo, LoopCounts)>,
) -> io::Result<()> {
    // most frequently entered first, ties in source order
    loops.sort_by(|(a, a_counts), (b, b_counts)| {
        b_counts
            .entries
            .cmp(&a_counts.entries)
            .then(b_counts.iterations.cmp(&a_counts.iterations))
            .then(a.open.cmp(&b.open))
    });

    if loops.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (info, counts) in loops {
        writeln!(
            out,
            "  [{}..{}] {} : {} entries, {} iterations",
            info.open,
            info.close,
            loop_label(program, info),
            counts.entries,
            counts.iterations
        )?;
    }
    Ok(())
}

/// Render the counters collected during a run.
///
/// Everything is sorted by count (highest first) with ties broken by symbol or source
/// order, so two runs with the same counts produce byte-identical reports.
pub fn write_report(profiler: &Profiler, program: &Program, out: &mut dyn Write) -> io::Result<()> {
    let mut instructions: Vec<(Instruction, u64)> = Instruction::ALL
        .iter()
        .map(|&instruction| (instruction, profiler.instruction_count(instruction)))
        .collect();
    instructions.sort_by(|(a, a_count), (b, b_count)| b_count.cmp(a_count).then(a.cmp(b)));

    writeln!(
        out,
        "Instruction counts ({} total):",
        profiler.total_instructions()
    )?;
    for (instruction, count) in instructions {
        writeln!(out, "  {} : {}", instruction, count)?;
    }

    let (simple, non_simple): (Vec<_>, Vec<_>) = profiler
        .classification()
        .iter()
        .map(|info| (info, profiler.loop_counts(info.open)))
        .partition(|(info, _)| info.is_simple());

    writeln!(out, "Simple loops:")?;
    write_loops(out, program, simple)?;
    writeln!(out, "Non-simple loops:")?;
    write_loops(out, program, non_simple)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{brackets::resolve, lexer::filter, optimizer::classify};
    use pretty_assertions::assert_eq;

    fn render(profiler: &Profiler, program: &Program) -> String {
        let mut out = vec![];
        write_report(profiler, program, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn sorted_report() {
        let program = filter("[-][.][->+<]");
        let jumps = resolve(&program).unwrap();
        let mut profiler = Profiler::new(classify(&program, &jumps));

        for _ in 0..3 {
            profiler.record_instruction(Instruction::Decrement);
        }
        profiler.record_instruction(Instruction::Output);
        profiler.record_loop_entry(0);
        profiler.record_loop_entry(6);
        profiler.record_loop_entry(6);
        profiler.record_loop_iteration(6);

        let expected = "\
Instruction counts (4 total):
  - : 3
  . : 1
  > : 0
  < : 0
  + : 0
  , : 0
  [ : 0
  ] : 0
Simple loops:
  [6..11] [->+<] : 2 entries, 1 iterations
  [0..2] [-] : 1 entries, 0 iterations
Non-simple loops:
  [3..5] [.] : 0 entries, 0 iterations
";
        assert_eq!(render(&profiler, &program), expected);
    }

    #[test]
    fn long_loops_are_truncated() {
        let source = format!("[{}]", ".".repeat(60));
        let program = filter(&source);
        let jumps = resolve(&program).unwrap();
        let profiler = Profiler::new(classify(&program, &jumps));

        let report = render(&profiler, &program);
        assert!(report.contains(&format!("[0..61] [{}... : 0 entries", ".".repeat(39))));
        assert!(report.contains("Simple loops:\n  (none)\n"));
    }
}
