use arbitrary::{Arbitrary, Unstructured};
use fuzz_helpers::*;
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let mut unstructured = Unstructured::new(data);
            if let Ok(input) = SequenceInput::arbitrary(&mut unstructured) {
                run_sequence(&input);
            }
        });
    }
}
