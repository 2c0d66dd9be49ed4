use chip_8_core::{
    Chip8, Chip8Builder, Chip8Mode, Fault, IndexAfterTransfer, Quirks, ShiftSource, Status,
    DEFAULT_FONT, PROGRAM_CAPACITY,
};

fn boot(rom: &[u8]) -> Chip8 {
    let mut chip = Chip8Builder::new().with_rng_seed(7).build();
    assert_eq!(chip.load_program(rom), Status::Ok);
    chip
}

fn run(chip: &mut Chip8, steps: usize) -> Status {
    let mut status = chip.status();
    for _ in 0..steps {
        status = chip.step(0);
    }
    status
}

#[test]
fn memory_outside_program_untouched() {
    let rom = [0x60, 0x01, 0x61, 0x02, 0x80, 0x14, 0x12, 0x06];
    let mut chip = boot(&rom);

    run(&mut chip, 50);

    let memory = chip.memory();
    assert_eq!(&memory[..80], &DEFAULT_FONT[..]);
    assert!(memory[80..0x200].iter().all(|b| *b == 0));
    assert_eq!(&memory[0x200..0x208], &rom[..]);
    assert!(memory[0x208..].iter().all(|b| *b == 0));
}

#[test]
fn program_capacity_boundary() {
    let mut chip = Chip8Builder::new().build();

    assert_eq!(chip.load_program(&vec![0u8; PROGRAM_CAPACITY]), Status::Ok);

    let status = chip.load_program(&vec![0x11u8; PROGRAM_CAPACITY + 1]);
    assert_eq!(status.fault(), Some(Fault::ProgramTooBig { size: 3585 }));
    assert!(chip.memory()[0x200..].iter().all(|b| *b == 0));

    // Still halted, stepping does nothing
    assert_eq!(chip.step(1), status);
}

#[test]
fn fatal_status_is_sticky_until_reload() {
    let mut chip = boot(&[0x00, 0xEE]);

    let status = chip.step(0);
    assert_eq!(status, Status::Halted(Fault::StackUnderflow));
    let pc = chip.pc();
    for _ in 0..10 {
        assert_eq!(chip.step(5), status);
    }
    assert_eq!(chip.pc(), pc);

    assert_eq!(chip.load_program(&[0x12, 0x00]), Status::Ok);
    assert_eq!(chip.step(0), Status::Ok);
}

#[test]
fn add_and_sub_flags() {
    // V0 = 0xFF, V1 = 0x01, V0 += V1
    let mut chip = boot(&[0x60, 0xFF, 0x61, 0x01, 0x80, 0x14]);
    run(&mut chip, 3);
    assert_eq!(chip.registers()[0x0], 0x00);
    assert_eq!(chip.registers()[0xF], 1);

    // V0 = 0x01, V1 = 0x02, V0 -= V1
    let mut chip = boot(&[0x60, 0x01, 0x61, 0x02, 0x80, 0x15]);
    run(&mut chip, 3);
    assert_eq!(chip.registers()[0x0], 0xFF);
    assert_eq!(chip.registers()[0xF], 0);
}

#[test]
fn sprite_drawn_twice_collides() {
    // I = 0x20A, draw 2 rows at (V0, V1) twice, then loop
    let rom = [
        0xA2, 0x0A, 0x60, 0x08, 0x61, 0x04, 0xD0, 0x12, 0xD0, 0x12, 0xFF, 0x81,
    ];
    let mut chip = boot(&rom);

    run(&mut chip, 4);
    assert!(chip.consume_dirty_flag());
    assert!(!chip.consume_dirty_flag());
    assert_eq!(chip.registers()[0xF], 0);
    assert!(chip.get_pixel(8, 4));
    assert!(chip.get_pixel(15, 4));
    assert!(chip.get_pixel(8, 5));
    assert!(!chip.get_pixel(9, 5));

    run(&mut chip, 1);
    assert!(chip.consume_dirty_flag());
    assert_eq!(chip.registers()[0xF], 1);
    assert!(!chip.get_pixel(8, 4));
    assert!(!chip.get_pixel(8, 5));
    assert_eq!(chip.index(), 0x20A);
}

#[test]
fn key_wait_round_trip() {
    let mut chip = boot(&[0xF4, 0x0A, 0x12, 0x02]);

    for _ in 0..3 {
        assert_eq!(chip.step(1), Status::Ok);
        assert_eq!(chip.pc(), 0x200);
    }

    chip.set_key_down(5);
    assert_eq!(chip.step(1), Status::Ok);
    assert!(chip.is_awaiting_key());
    assert!(chip.is_sound_active());
    assert_eq!(chip.pc(), 0x200);

    chip.set_key_up(5);
    assert_eq!(chip.step(1), Status::Ok);
    assert_eq!(chip.registers()[0x4], 5);
    assert!(!chip.is_sound_active());
    assert_eq!(chip.pc(), 0x202);
}

#[test]
fn out_of_range_keys_ignored() {
    let mut chip = boot(&[0xF0, 0x0A]);

    chip.set_key_down(16);
    chip.set_key_down(200);
    chip.step(0);

    assert!(!chip.is_awaiting_key());
    assert!(!chip.get_pixel(64, 0));
    assert!(!chip.get_pixel(0, 32));
}

#[test]
fn sixteen_nested_calls() {
    // Each call lands on the next instruction, which calls again
    let mut rom = Vec::new();
    for i in 0..17u16 {
        let target = 0x202 + i * 2;
        rom.extend_from_slice(&(0x2000 | target).to_be_bytes());
    }
    let mut chip = boot(&rom);

    assert_eq!(run(&mut chip, 16), Status::Ok);
    assert_eq!(chip.stack_depth(), 16);

    assert_eq!(chip.step(0), Status::Halted(Fault::StackOverflow));
}

#[test]
fn call_and_return() {
    // CALL 0x206; JP 0x204 (spin); RET
    let mut chip = boot(&[0x22, 0x06, 0x12, 0x02, 0x12, 0x04, 0x00, 0xEE]);

    run(&mut chip, 2);
    assert_eq!(chip.pc(), 0x202);
    assert_eq!(chip.stack_depth(), 0);
}

#[test]
fn index_one_past_memory() {
    // I = 0xFFF; V0 = 1; I += V0; V3 = 0x33; LD V3, [I]
    let rom = [0xAF, 0xFF, 0x60, 0x01, 0xF0, 0x1E, 0x63, 0x33, 0xF3, 0x65];
    let mut chip = boot(&rom);

    let status = run(&mut chip, 5);

    assert_eq!(status, Status::Halted(Fault::OutOfBounds { addr: 0x1000 }));
    assert_eq!(chip.index(), 0x1000);
    assert_eq!(chip.registers()[0x3], 0x33);
    assert_eq!(chip.registers()[0x0], 0x01);
    assert_eq!(chip.pc(), 0x208);
}

#[test]
fn store_through_index_past_memory() {
    // I = 0xFFF; V0 = 1; I += V0; LD [I], V0
    let rom = [0xAF, 0xFF, 0x60, 0x01, 0xF0, 0x1E, 0xF0, 0x55];
    let mut chip = boot(&rom);

    let status = run(&mut chip, 4);

    assert_eq!(status, Status::Halted(Fault::OutOfBounds { addr: 0x1000 }));
    assert_eq!(chip.memory()[0xFFF], 0);
}

#[test]
fn running_off_the_end_of_memory() {
    // Jump to the last instruction slot, a zeroed word follows nothing
    let mut chip = boot(&[0x1F, 0xFE]);

    let status = run(&mut chip, 2);

    assert_eq!(status, Status::Halted(Fault::InstructionNotRecognized(0x0000)));
}

#[test]
fn fetch_straddling_end_of_memory() {
    // V0 = 0xFF; JP V0, 0xF00 lands on 0xFFF
    let mut chip = boot(&[0x60, 0xFF, 0xBF, 0x00]);

    let status = run(&mut chip, 3);

    assert_eq!(status, Status::Halted(Fault::OutOfBounds { addr: 0x1000 }));
}

#[test]
fn quirk_modes() {
    // V1 = 0x03, V2 = 0x10, V1 >>= 1 via 8126; I = 0x300; LD [I], V1
    let rom = [0x61, 0x03, 0x62, 0x10, 0x81, 0x26, 0xA3, 0x00, 0xF1, 0x55];

    let mut vip = boot(&rom);
    run(&mut vip, 5);
    assert_eq!(vip.quirks(), Quirks::default());
    assert_eq!(vip.registers()[0x1], 0x08);
    assert_eq!(vip.index(), 0x302);

    let mut schip = Chip8Builder::new().with_mode(Chip8Mode::SUPER_CHIP).build();
    schip.load_program(&rom);
    run(&mut schip, 5);
    assert_eq!(schip.registers()[0x1], 0x01);
    assert_eq!(schip.registers()[0xF], 0x01);
    assert_eq!(schip.index(), 0x300);

    let mixed = Quirks {
        shift: ShiftSource::VX,
        transfer: IndexAfterTransfer::Advanced,
    };
    let mut chip = Chip8Builder::new().with_quirks(mixed).build();
    chip.load_program(&rom);
    run(&mut chip, 5);
    assert_eq!(chip.registers()[0x1], 0x01);
    assert_eq!(chip.index(), 0x302);
}

#[test]
fn timers_decay_per_tick() {
    // V0 = 0x10; DT = V0; ST = V0; spin
    let mut chip = boot(&[0x60, 0x10, 0xF0, 0x15, 0xF0, 0x18, 0x12, 0x06]);
    run(&mut chip, 3);
    assert!(chip.is_sound_active());

    chip.step(5);
    assert_eq!(chip.delay_timer(), 0x0B);
    assert_eq!(chip.sound_timer(), 0x0B);

    chip.step(0x0B);
    assert_eq!(chip.delay_timer(), 0);
    assert_eq!(chip.sound_timer(), 0);
    assert!(!chip.is_sound_active());
}
