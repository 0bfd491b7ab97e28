#![no_main]

use fuzz_helpers::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: SequenceInput| {
    let report = run_sequence(&input);
    println!(
        "✓ PASS - peg={}, ops={}, accepted={}, rejected={}, all invariants ✓",
        input.peg,
        input.operations.len(),
        report.accepted,
        report.rejected
    );
});
