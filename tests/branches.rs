use marie_rs::io::BufferDevice;
use marie_rs::{Machine, MachineConfig, Op, Status};

fn machine(words: &[u16]) -> Machine<BufferDevice> {
    Machine::with_device(words, BufferDevice::new(), MachineConfig::default())
}

#[test]
fn skipcond_lt_skips_next_instruction() {
    // AC = 0xFFFF (-1); skipcond 000; clear is skipped
    let mut m = machine(&[0x1004, 0x8000, 0xA000, 0x7000, 0xFFFF]);
    m.step().unwrap(); // load
    m.step().unwrap(); // skipcond
    assert!(m.cpu().skip_armed());
    m.step().unwrap(); // clear, discarded
    assert!(!m.cpu().skip_armed());
    assert_eq!(m.cpu().ac, 0xFFFF);
    assert_eq!(m.cpu().pc, 3);
    assert_eq!(m.run().unwrap(), 0xFFFF);
}

#[test]
fn skipcond_not_taken_executes_next() {
    // AC = 1; skipcond 000 (AC < 0) is false
    let mut m = machine(&[0x1004, 0x8000, 0xA000, 0x7000, 0x0001]);
    assert_eq!(m.run().unwrap(), 0);
}

#[test]
fn skipcond_eq_and_gt() {
    let mut m = machine(&[0x8400, 0x7000, 0x1004, 0x7000, 0x0005]);
    // AC == 0 skips the first halt, then loads 5 and stops on the second
    m.run().unwrap();
    assert_eq!(m.cpu().ac, 5);
    assert_eq!(m.cpu().pc, 4);
    assert!(m.faults().is_empty());

    let mut m = machine(&[0x1004, 0x8800, 0xA000, 0x7000, 0x0002]);
    assert_eq!(m.run().unwrap(), 2);
}

#[test]
fn skipcond_reserved_bits_never_skip() {
    let mut m = machine(&[0x8C00, 0x7000, 0xA000]);
    m.run().unwrap();
    assert!(m.cpu().is_halted());
    assert_eq!(m.cpu().pc, 2);
}

#[test]
fn skip_flag_is_consumed_even_by_a_halt() {
    let mut m = machine(&[0x8400, 0x7000, 0x7000]);
    m.step().unwrap();
    m.step().unwrap();
    assert!(!m.cpu().is_halted());
    assert_eq!(m.cpu().status, Status::empty());
    m.step().unwrap();
    assert!(m.cpu().is_halted());
}

#[test]
fn jump_sets_pc() {
    let mut m = machine(&[0x9002, 0x7000, 0xA000]);
    m.step().unwrap();
    assert_eq!(m.cpu().pc, 2);
}

#[test]
fn jns_stores_return_address_and_enters_subroutine() {
    // 0: jns 3 ; 1: halt ; 2: data ; 3: return slot ; 4: load 2 ; 5: jumpi 3
    let words = [
        Op::Jns.encode(3),
        Op::Halt.encode(0),
        0x0042,
        0x0000,
        Op::Load.encode(2),
        Op::JumpI.encode(3),
    ];
    let mut m = machine(&words);
    m.step().unwrap();
    assert_eq!(m.memory().mem[3], 1);
    assert_eq!(m.cpu().pc, 4);
    assert_eq!(m.cpu().ac, 4);
    assert_eq!(m.run().unwrap(), 0x42);
    assert_eq!(m.cpu().pc, 2);
}

#[test]
fn jumpi_masks_target_to_twelve_bits() {
    let mut m = machine(&[0xC001, 0xF002, 0x7000]);
    m.step().unwrap();
    assert_eq!(m.cpu().pc, 2);
}
