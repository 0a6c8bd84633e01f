//! Integration tests for the interrupt controller state machine.

use paranut_soc::soc::intc::{
    compute_next, compute_outputs, select, IntcInputs, IntcRegs, IntcState, SelectedId,
};

const LINES: u32 = 4;

fn regs(state: IntcState, pending: u64, latched: SelectedId) -> IntcRegs {
    IntcRegs {
        state,
        pending,
        latched,
    }
}

fn inputs(ex_int: u64, ack: bool, enable: bool) -> IntcInputs {
    IntcInputs { ex_int, ack, enable }
}

/// Tests that the lowest set line wins for every non-zero vector up to 8 lines.
#[test]
fn test_priority_exhaustive() {
    for lines in 1..=8u32 {
        for v in 1..(1u64 << lines) {
            let id = select(v, lines);
            assert!(id.is_valid());
            let k = id.index();
            assert!(v & (1 << k) != 0, "selected line {} not set in {:#b}", k, v);
            assert_eq!(v & ((1 << k) - 1), 0, "lower line set in {:#b}", v);
        }
    }
}

/// Tests that an empty vector selects nothing.
#[test]
fn test_priority_empty_vector() {
    assert_eq!(select(0, 8), SelectedId::NONE);
    assert!(!select(0, 8).is_valid());
}

/// Tests that bits above the configured line count are ignored.
#[test]
fn test_priority_ignores_unconfigured_lines() {
    assert_eq!(select(0b1_0000, 4), SelectedId::NONE);
    assert_eq!(select(0b1_1000, 4).index(), 3);
}

/// Tests priority at the full 64-line width.
#[test]
fn test_priority_wide_vector() {
    let id = select(1 << 63, 64);
    assert!(id.is_valid());
    assert_eq!(id.index(), 63);

    assert_eq!(select((1 << 63) | (1 << 40), 64).index(), 40);
}

/// Tests the Idle row: pending lines with enable move to Pending and latch the id.
#[test]
fn test_idle_to_pending() {
    let next = compute_next(&IntcRegs::RESET, &inputs(0b0100, false, true), false, LINES);
    assert_eq!(next.state, IntcState::Pending);
    assert_eq!(next.pending, 0b0100);
    assert_eq!(next.latched, SelectedId::new(2));
}

/// Tests that Idle keeps latching the current selection while enable is low.
#[test]
fn test_idle_latches_every_cycle() {
    let a = compute_next(&IntcRegs::RESET, &inputs(0b1000, false, false), false, LINES);
    assert_eq!(a.state, IntcState::Idle);
    assert_eq!(a.latched, SelectedId::new(3));

    let b = compute_next(&a, &inputs(0b0010, false, false), false, LINES);
    assert_eq!(b.state, IntcState::Idle);
    assert_eq!(b.pending, 0b1010);
    assert_eq!(b.latched, SelectedId::new(1));
}

/// Tests that Idle with nothing pending stays Idle even when enabled.
#[test]
fn test_idle_without_pending_lines() {
    let next = compute_next(&IntcRegs::RESET, &inputs(0, false, true), false, LINES);
    assert_eq!(next, IntcRegs::RESET);
}

/// Tests that the Pending state waits for ack with a frozen id.
#[test]
fn test_pending_holds_until_ack() {
    let cur = regs(IntcState::Pending, 0b0100, SelectedId::new(2));

    let next = compute_next(&cur, &inputs(0b0001, false, true), false, LINES);
    assert_eq!(next.state, IntcState::Pending);
    assert_eq!(next.latched, SelectedId::new(2));
    assert_eq!(next.pending, 0b0101);

    let acked = compute_next(&next, &inputs(0, true, true), false, LINES);
    assert_eq!(acked.state, IntcState::Handled);
    assert_eq!(acked.latched, SelectedId::new(2));
}

/// Tests that Handled clears exactly the latched line and returns to Idle.
#[test]
fn test_handled_clears_latched_line() {
    let cur = regs(IntcState::Handled, 0b0110, SelectedId::new(1));
    let next = compute_next(&cur, &inputs(0, false, false), false, LINES);
    assert_eq!(next.state, IntcState::Idle);
    assert_eq!(next.pending, 0b0100);
}

/// Tests that Handled is left unconditionally, whatever ack and enable do.
#[test]
fn test_handled_is_unconditional() {
    let cur = regs(IntcState::Handled, 0b0001, SelectedId::new(0));
    for (ack, enable) in [(false, false), (false, true), (true, false), (true, true)] {
        let next = compute_next(&cur, &inputs(0, ack, enable), false, LINES);
        assert_eq!(next.state, IntcState::Idle);
        assert_eq!(next.pending, 0);
    }
}

/// Tests that reset wins from every state and every input combination.
#[test]
fn test_reset_dominance() {
    let states = [IntcState::Idle, IntcState::Pending, IntcState::Handled];
    for state in states {
        for ex_int in [0u64, 0b0001, 0b1111] {
            for ack in [false, true] {
                for enable in [false, true] {
                    let cur = regs(state, 0b1010, SelectedId::new(1));
                    let next = compute_next(&cur, &inputs(ex_int, ack, enable), true, LINES);
                    assert_eq!(next, IntcRegs::RESET, "state {:?}", state);
                }
            }
        }
    }
}

/// Tests that no pending line is dropped while enable is withheld.
#[test]
fn test_non_loss_under_withheld_enable() {
    let mut cur = IntcRegs::RESET;
    let mut asserted = 0u64;
    for cycle in 0..100u64 {
        let line = if cycle % 7 == 0 { 1 << (cycle % 4) } else { 0 };
        asserted |= line;
        cur = compute_next(&cur, &inputs(line, cycle % 3 == 0, false), false, LINES);
        assert_eq!(cur.state, IntcState::Idle);
        assert_eq!(cur.pending, asserted);
    }
    assert_eq!(cur.pending, 0b1111);
}

/// Tests a complete single round trip through the three states.
#[test]
fn test_single_round_trip() {
    let k = 3;
    let s1 = compute_next(&IntcRegs::RESET, &inputs(1 << k, false, true), false, LINES);
    let out = compute_outputs(&s1);
    assert!(out.request);
    assert_eq!(out.id, SelectedId::new(k));

    let s2 = compute_next(&s1, &inputs(0, true, true), false, LINES);
    assert_eq!(s2.state, IntcState::Handled);
    assert!(!compute_outputs(&s2).request);

    let s3 = compute_next(&s2, &inputs(0, false, true), false, LINES);
    assert_eq!(s3.state, IntcState::Idle);
    assert_eq!(s3.pending, 0);
    assert!(!compute_outputs(&s3).request);
}

/// Tests that lines are serviced in priority order.
#[test]
fn test_multiple_lines_serviced_in_order() {
    let mut cur = compute_next(&IntcRegs::RESET, &inputs(0b1010, false, true), false, LINES);
    let mut served = Vec::new();

    for _ in 0..16 {
        let out = compute_outputs(&cur);
        if out.request {
            served.push(out.id.index());
        }
        cur = compute_next(&cur, &inputs(0, out.request, true), false, LINES);
    }

    assert_eq!(served, vec![1, 3]);
    assert_eq!(cur.pending, 0);
}

/// Tests that outputs depend only on committed state.
#[test]
fn test_outputs_idempotent() {
    let cur = regs(IntcState::Pending, 0b0010, SelectedId::new(1));
    assert_eq!(compute_outputs(&cur), compute_outputs(&cur));
    assert!(compute_outputs(&cur).request);
    assert!(!compute_outputs(&IntcRegs::RESET).request);
}

/// Tests the id field packing with the valid flag in the MSB.
#[test]
fn test_selected_id_encoding() {
    let id = SelectedId::new(3);
    assert_eq!(id.encode(5), 0b1_0011);
    assert_eq!(SelectedId::decode(0b1_0011, 5), id);
    assert_eq!(SelectedId::NONE.encode(5), 0);
    assert!(!SelectedId::decode(0b0_0011, 5).is_valid());
}

/// Tests that state encodings are distinct.
#[test]
fn test_state_encoding() {
    assert_eq!(IntcState::Idle.encode(), 0);
    assert_eq!(IntcState::Pending.encode(), 1);
    assert_eq!(IntcState::Handled.encode(), 2);
}
