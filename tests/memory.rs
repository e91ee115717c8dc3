use marie_rs::io::BufferDevice;
use marie_rs::{Machine, MachineConfig, Trap, MAX_MEMORY};

fn machine(words: &[u16]) -> Machine<BufferDevice> {
    Machine::with_device(words, BufferDevice::new(), MachineConfig::default())
}

#[test]
fn out_of_bounds_load_halts_with_zero() {
    let mut m = machine(&[0x1FFF]);
    assert_eq!(m.run().unwrap(), 0);
    assert!(m.cpu().is_halted());
    assert!(matches!(
        m.faults(),
        [Trap::OutOfBounds { addr: 0xFFF, limit: 1 }]
    ));
}

#[test]
fn out_of_bounds_store_is_dropped() {
    let mut m = machine(&[0x1003, 0x2010, 0x7000, 0x0007]);
    assert_eq!(m.run().unwrap(), 7);
    assert_eq!(m.memory().mem[0x10], 0);
    assert_eq!(m.faults().len(), 1);
    // halted by the fault, not by the halt instruction
    assert_eq!(m.cpu().pc, 2);
}

#[test]
fn out_of_bounds_add_uses_zero() {
    let mut m = machine(&[0x1003, 0x3100, 0x7000, 0x0005]);
    assert_eq!(m.run().unwrap(), 5);
    assert_eq!(m.faults().len(), 1);
}

#[test]
fn add_and_subt_wrap() {
    let mut m = machine(&[0x1004, 0x3005, 0x7000, 0x0000, 0xFFFF, 0x0002]);
    assert_eq!(m.run().unwrap(), 0x0001);

    let mut m = machine(&[0xA000, 0x4003, 0x7000, 0x0001]);
    assert_eq!(m.run().unwrap(), 0xFFFF);
}

#[test]
fn indirect_load_store_add() {
    // 5: ptr -> 6 ; 6: value 0x10 ; 7: ptr -> 8 ; 8: dest
    let words = [
        0xE005, // loadi 5   AC = 0x10
        0xB005, // addi 5    AC = 0x20
        0xD007, // storei 7  mem[8] = 0x20
        0x7000,
        0x0000,
        0x0006,
        0x0010,
        0x0008,
        0x0000,
    ];
    let mut m = machine(&words);
    assert_eq!(m.run().unwrap(), 0x20);
    assert_eq!(m.memory().mem[8], 0x20);
    assert!(m.faults().is_empty());
}

#[test]
fn indirect_through_bad_pointer_faults() {
    let mut m = machine(&[0xE002, 0x7000, 0x0FFF]);
    assert_eq!(m.run().unwrap(), 0);
    assert!(matches!(m.faults(), [Trap::OutOfBounds { addr: 0xFFF, .. }]));
}

#[test]
fn invalid_opcode_is_reported_without_halting() {
    let mut m = machine(&[0xF123, 0x1002, 0x0009]);
    m.step().unwrap();
    m.step().unwrap();
    assert_eq!(m.cpu().ac, 9);
    assert_eq!(m.cpu().pc, 2);
    assert!(matches!(
        m.faults(),
        [Trap::InvalidInstruction { opcode: 0xF, pc: 0 }]
    ));
    assert!(!m.cpu().is_halted());
}

#[test]
fn oversized_image_is_truncated_to_address_space() {
    let mut words = vec![0xA000; MAX_MEMORY + 1];
    words[MAX_MEMORY - 1] = 0x7000;
    let mut m = machine(&words);
    m.run().unwrap();
    assert_eq!(m.memory().image_len, MAX_MEMORY);
    assert!(m.cpu().is_halted());
}

#[test]
fn empty_image_runs_nothing() {
    let mut m = machine(&[]);
    assert_eq!(m.run().unwrap(), 0);
    assert_eq!(m.cpu().steps, 0);
}
