mod common;

use bfopt::interpreter::RuntimeError;
use bfopt::lexer::SourceLocation;
use bfopt::parser::ParseError;
use bfopt::{compile, Error, TapeConfig};

use common::{run_program, run_with_input, SharedBuffer};

const HELLO_WORLD: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

#[test]
fn hello_world() {
    let (_, output) = run_program(HELLO_WORLD).unwrap();
    assert_eq!(output, b"Hello World!\n");
}

#[test]
fn echo_one_byte() {
    let (_, output) = run_with_input(",.", b"A").unwrap();
    assert_eq!(output, b"A");
}

#[test]
fn cat_until_zero_byte() {
    let (_, output) = run_with_input(",[.,]", b"hi\0").unwrap();
    assert_eq!(output, b"hi");
}

#[test]
fn empty_source_touches_nothing() {
    let (runtime, output) = run_program("").unwrap();
    assert!(output.is_empty());
    assert_eq!(runtime.cell(0), 0);
    assert_eq!(runtime.ptr(), 0);
    assert_eq!(runtime.high_water(), 0);
}

#[test]
fn clear_loop() {
    let source = format!("{}[-]", "+".repeat(42));
    let (runtime, _) = run_program(&source).unwrap();
    assert_eq!(runtime.cell(0), 0);
}

#[test]
fn clear_loop_on_zero_is_a_noop() {
    let (runtime, _) = run_program("[+]").unwrap();
    assert_eq!(runtime.cell(0), 0);
    assert_eq!(runtime.ptr(), 0);
}

#[test]
fn scan_to_zero() {
    let (runtime, _) = run_program("+>+>+<<[>]").unwrap();
    assert_eq!(runtime.ptr(), 3);
}

#[test]
fn counted_multiply() {
    let (runtime, _) = run_program("++++[>++++<-]").unwrap();
    assert_eq!(runtime.cell(0), 0);
    assert_eq!(runtime.cell(1), 16);
    assert_eq!(runtime.ptr(), 0);
}

#[test]
fn additions_wrap() {
    let (runtime, _) = run_program(&"+".repeat(256)).unwrap();
    assert_eq!(runtime.cell(0), 0);
}

#[test]
fn odd_step_always_terminates() {
    // 1 + 255 * 1 wraps to zero
    let (runtime, _) = run_program("+[+]").unwrap();
    assert_eq!(runtime.cell(0), 0);
}

#[test]
fn even_step_from_even_flag_terminates() {
    let (runtime, _) = run_program("++[++]").unwrap();
    assert_eq!(runtime.cell(0), 0);
}

#[test]
fn even_step_from_odd_flag_is_dead() {
    let err = run_program("+[++]").unwrap_err();
    assert!(matches!(
        err,
        Error::Runtime(RuntimeError::DeadLoop { value: 1 })
    ));
}

#[test]
fn empty_loop_with_nonzero_flag_is_dead() {
    let err = run_program("+[]").unwrap_err();
    assert!(matches!(
        err,
        Error::Runtime(RuntimeError::DeadLoop { value: 1 })
    ));
}

#[test]
fn wide_counted_loop_uses_the_vector_path() {
    // two passes of a 40-cell spread: cells 1..=40 each end at 2
    let source = format!("++[-{}{}]", ">+".repeat(40), "<".repeat(40));
    let (runtime, _) = run_program(&source).unwrap();
    assert_eq!(runtime.cell(0), 0);
    for cell in 1..=40 {
        assert_eq!(runtime.cell(cell), 2, "cell {cell}");
    }
    assert_eq!(runtime.ptr(), 0);
}

#[test]
fn negative_offsets_use_the_segmented_tape() {
    let (runtime, _) = run_program("<+<++").unwrap();
    assert_eq!(runtime.cell(-1), 1);
    assert_eq!(runtime.cell(-2), 2);
    assert_eq!(runtime.ptr(), -2);
}

#[test]
fn flat_tape_underflows() {
    // the top level never goes negative, so the run gets the flat tape;
    // the scan inside then walks off its left edge
    let err = run_program("+[<]").unwrap_err();
    assert!(matches!(
        err,
        Error::Runtime(RuntimeError::PointerUnderflow { index: -1 })
    ));
}

#[test]
fn growth_exposes_zeroed_cells() {
    let source = format!("{}+", ">".repeat(5000));
    let (runtime, _) = run_program(&source).unwrap();
    assert_eq!(runtime.cell(5000), 1);
    assert_eq!(runtime.cell(4999), 0);
    assert_eq!(runtime.high_water(), 5000);
    assert!(runtime.allocated() > 5000);
}

#[test]
fn memory_limit_is_enforced() {
    let program = compile(&">".repeat(16)).unwrap();
    let err = program
        .execute(
            Box::new(std::io::Cursor::new(Vec::<u8>::new())),
            Box::new(SharedBuffer::default()),
            TapeConfig {
                initial_size: 4,
                limit: 16,
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::MemoryLimitExceeded { index: 16 }
    ));
}

#[test]
fn reading_past_the_end_of_input_fails() {
    let err = run_with_input(",,", b"A").unwrap_err();
    assert!(matches!(err, Error::Runtime(RuntimeError::InputExhausted)));
}

#[test]
fn unmatched_brackets_report_their_location() {
    let err = run_program("++\n  [-").unwrap_err();
    let Error::Parse(ParseError::UnmatchedLeftBracket(loc)) = err else {
        panic!("expected an unmatched `[`: {err}");
    };
    assert_eq!(loc, SourceLocation { line: 2, col: 3 });

    let err = run_program("+]+").unwrap_err();
    let Error::Parse(ParseError::UnmatchedRightBracket(loc)) = err else {
        panic!("expected an unmatched `]`: {err}");
    };
    assert_eq!(loc, SourceLocation { line: 1, col: 2 });
}

#[test]
fn output_is_deterministic() {
    let (_, first) = run_program(HELLO_WORLD).unwrap();
    let (_, second) = run_program(HELLO_WORLD).unwrap();
    assert_eq!(first, second);
}
