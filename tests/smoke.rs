use marie_rs::image::{read_image, write_image};
use marie_rs::io::BufferDevice;
use marie_rs::{assemble, Machine, MachineConfig};

#[test]
fn load_then_halt_returns_accumulator() {
    // word 2 holds the data; the image must cover it to be addressable
    let mut m = Machine::with_device(
        &[0x1002, 0x7000, 0x0009],
        BufferDevice::new(),
        MachineConfig::default(),
    );
    assert_eq!(m.run().unwrap(), 0x0009);
    assert!(m.cpu().is_halted());
    assert!(m.faults().is_empty());
    assert_eq!(m.cpu().pc, 2);
}

#[test]
fn running_off_the_end_of_the_image_stops() {
    let mut m = Machine::with_device(
        &[0xA000, 0x1000],
        BufferDevice::new(),
        MachineConfig::default(),
    );
    assert_eq!(m.run().unwrap(), 0xA000);
    assert!(!m.cpu().is_halted());
    assert_eq!(m.cpu().steps, 2);
}

#[test]
fn assemble_persist_reload_execute() {
    let src = "\
        load a
        add b
        output
        halt
a,      0x0020
b,      0x0002
";
    let asm = assemble(src).unwrap();
    let path = std::env::temp_dir().join("_marie_smoke.bin");
    write_image(&path, &asm.words).unwrap();
    let words = read_image(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(words, asm.words);

    let mut m = Machine::with_device(&words, BufferDevice::new(), MachineConfig::default());
    assert_eq!(m.run().unwrap(), 0x22);
    assert_eq!(m.device().output, vec!["22".to_string()]);
}

#[test]
fn countdown_loop() {
    // prints 3, 2, 1 then halts with AC = 0
    let src = "\
loop,   load n
        skipcond 0x800
        jump done
        output
        subt one
        store n
        jump loop
done,   halt
n,      3
one,    1
";
    let asm = assemble(src).unwrap();
    let mut m = Machine::with_device(&asm.words, BufferDevice::new(), MachineConfig::default());
    assert_eq!(m.run().unwrap(), 0);
    assert_eq!(m.into_device().output, vec!["3", "2", "1"]);
}

#[test]
fn step_limit_stops_an_infinite_loop() {
    let asm = assemble("top, jump top").unwrap();
    let cfg = MachineConfig { max_steps: Some(100) };
    let mut m = Machine::with_device(&asm.words, BufferDevice::new(), cfg);
    assert_eq!(m.run().unwrap(), 0);
    assert_eq!(m.cpu().steps, 100);
    assert!(!m.cpu().is_halted());
}

#[test]
fn input_reads_hex_lines() {
    let asm = assemble("input\nstore x\ninput\nadd x\noutput\nhalt\nx, 0").unwrap();
    let dev = BufferDevice::with_input(["1f", "0x01"]);
    let mut m = Machine::with_device(&asm.words, dev, MachineConfig::default());
    assert_eq!(m.run().unwrap(), 0x20);
    assert_eq!(m.device().output, vec!["20".to_string()]);
}

#[test]
fn exhausted_input_reads_zero() {
    let mut m = Machine::with_device(
        &[0x5000, 0x7000],
        BufferDevice::new(),
        MachineConfig::default(),
    );
    assert_eq!(m.run().unwrap(), 0);
    assert!(m.faults().is_empty());
}
