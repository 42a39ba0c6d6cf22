use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::component::{Component, Slot};
use crate::cpu::state::ExecutionState::{self, *};
use crate::cpu::{Core, Registers, CPU};
use crate::dispatch::{Handler, InstructionTable};
use crate::port::{InterruptPort, MemoryPort};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Access {
  Load(u16),
  Store(u16, u8),
}

struct TestMemory {
  data: Vec<u8>,
  log: Vec<Access>,
}

impl MemoryPort for TestMemory {
  fn rb(&mut self, _: &Core, addr: u16) -> u8 {
    self.log.push(Access::Load(addr));
    self.data[addr as usize]
  }

  fn wb(&mut self, _: &Core, addr: u16, value: u8) {
    self.log.push(Access::Store(addr, value));
    self.data[addr as usize] = value;
  }
}

#[derive(Default)]
struct TestIrq {
  resets: u32,
  enables: Vec<bool>,
  events: Vec<u32>,
  /// Deadline distance set after every event; 0 means every tick.
  period: u32,
  raise_on_event: Option<u8>,
}

impl InterruptPort for TestIrq {
  fn reset(&mut self, _: &mut Core) {
    self.resets += 1;
  }

  fn set_interrupts(&mut self, _: &mut Core, enabled: bool) {
    self.enables.push(enabled);
  }

  fn process_events(&mut self, core: &mut Core) {
    self.events.push(core.cycles);
    if let Some(vector) = self.raise_on_event.take() {
      core.raise_irq(vector);
    }
    core.next_event = core.cycles.wrapping_add(self.period);
  }
}

struct Probe {
  name: &'static str,
  log: Rc<RefCell<Vec<String>>>,
}

impl Component for Probe {
  fn name(&self) -> &str {
    self.name
  }

  fn init(&mut self, core: &mut Core) {
    self.log.borrow_mut().push(format!("init {}", self.name));
    core.index = core.index.wrapping_add(1);
  }

  fn deinit(&mut self) {
    self.log.borrow_mut().push(format!("deinit {}", self.name));
  }
}

/// A component with no hooks of its own.
struct Inert;

impl Component for Inert {}

fn nop(_: &mut Core) {}

fn load_1234(core: &mut Core) {
  core.index = 0x1234;
  core.execution_state = MemoryLoad;
}

fn read_pc(core: &mut Core) {
  core.execution_state = ReadPc;
}

fn move_store(core: &mut Core) {
  core.index = 0xc000;
  core.bus = 0x5a;
  core.execution_state = MemoryMoveIndexStore;
}

fn move_load(core: &mut Core) {
  core.index = 0x8000;
  core.execution_state = MemoryMoveIndexLoad;
}

fn mark(core: &mut Core) {
  core.halted = true;
}

fn probe(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Slot {
  Some(Box::new(Probe {
    name,
    log: log.clone(),
  }))
}

fn init_with(table: InstructionTable) -> CPU<TestMemory, TestIrq> {
  let memory = TestMemory {
    data: vec![0; 0x10000],
    log: Vec::new(),
  };
  let mut cpu =
    CPU::new(memory, TestIrq::default(), Arc::new(table), Box::new(Inert));
  cpu.reset();
  cpu
}

fn init() -> CPU<TestMemory, TestIrq> {
  init_with(InstructionTable::filled(nop))
}

/// Tick once and return the state the engine will run next.
fn step(cpu: &mut CPU<TestMemory, TestIrq>) -> ExecutionState {
  cpu.tick();
  cpu.core.execution_state
}

#[test]
fn default_state_cycle() {
  let mut cpu = init();
  let states: Vec<_> = (0..9).map(|_| step(&mut cpu)).collect();
  assert_eq!(
    states,
    vec![
      Decode, Execute, MemoryLoad, Fetch, Decode, Execute, MemoryLoad,
      Fetch, Decode,
    ]
  );
}

#[test]
fn cycles_count_ticks() {
  let mut cpu = init();
  cpu.run(1000);
  assert_eq!(cpu.core.cycles, 1000);
}

#[test]
fn cycles_wrap() {
  let mut cpu = init();
  cpu.irq.period = 1;
  cpu.core.cycles = u32::MAX;
  cpu.core.next_event = 0;
  cpu.tick();
  assert_eq!(cpu.core.cycles, 0);
  assert_eq!(cpu.irq.events, vec![0]);
  assert_eq!(cpu.core.next_event, 1);
}

#[test]
fn reset_then_tick() {
  let mut cpu = init();
  assert_eq!(cpu.irq.resets, 1);
  cpu.tick();
  assert_eq!(cpu.core.cycles, 1);
  assert_eq!(cpu.core.execution_state, Decode);
  assert_eq!(cpu.memory.log, vec![Access::Load(0)]);
}

#[test]
fn reset_zeroes_state() {
  let mut cpu = init();
  cpu.run(7);
  cpu.core.regs.af = 0x12f0;
  cpu.core.regs.bc = 0x3456;
  cpu.core.regs.sp = 0xfffe;
  cpu.core.regs.pc = 0x0150;
  cpu.core.next_event = 99;
  cpu.core.halted = true;
  cpu.raise_irq(0x40);

  cpu.reset();
  assert_eq!(cpu.core.regs, Registers::default());
  assert!(cpu.core.instruction.is_none());
  assert_eq!(cpu.core.cycles, 0);
  assert_eq!(cpu.core.next_event, 0);
  assert_eq!(cpu.core.execution_state, Fetch);
  assert!(!cpu.core.halted);
  assert_eq!(cpu.irq.resets, 2);
  // The interrupt latch survives a reset.
  assert!(cpu.core.irq_pending);
  assert_eq!(cpu.core.irq_vector, 0x40);
}

#[test]
fn nop_takes_four_cycles() {
  let mut cpu = init();
  cpu.run(4);
  assert_eq!(cpu.core.regs.pc, 1);
  assert_eq!(cpu.core.cycles, 4);
  assert_eq!(cpu.core.execution_state, Fetch);
  // FETCH at 0, then the default fourth slot loads from the index latch.
  assert_eq!(cpu.memory.log, vec![Access::Load(0), Access::Load(0)]);

  cpu.tick();
  assert_eq!(cpu.memory.log.last(), Some(&Access::Load(1)));
}

#[test]
fn raise_irq_last_wins() {
  let mut cpu = init();
  cpu.raise_irq(0x40);
  cpu.raise_irq(0x50);
  assert!(cpu.core.irq_pending);
  assert_eq!(cpu.core.irq_vector, 0x50);
  assert_eq!(cpu.core.regs.pc, 0);
}

#[test]
fn irq_taken_at_fetch() {
  let mut cpu = init();
  cpu.run(2);
  cpu.raise_irq(0x48);

  // EXECUTE and the fourth slot do not look at the latch.
  cpu.run(2);
  assert!(cpu.core.irq_pending);
  assert!(cpu.irq.enables.is_empty());

  cpu.tick();
  assert_eq!(cpu.core.regs.pc, 0x48);
  assert!(!cpu.core.irq_pending);
  assert_eq!(cpu.irq.enables, vec![false]);
  assert_eq!(cpu.memory.log.last(), Some(&Access::Load(0x48)));
  assert_eq!(cpu.core.execution_state, Decode);
}

#[test]
fn irq_raised_by_event_hook() {
  let mut cpu = init();
  cpu.irq.raise_on_event = Some(0x60);
  cpu.irq.period = 100;

  // The event runs after the first FETCH, so the vector waits.
  cpu.tick();
  assert!(cpu.core.irq_pending);
  assert_eq!(cpu.core.regs.pc, 0);

  cpu.run(3);
  cpu.tick();
  assert_eq!(cpu.core.regs.pc, 0x60);
  assert!(!cpu.core.irq_pending);
}

#[test]
fn events_wait_for_deadline() {
  let mut cpu = init();
  cpu.irq.period = 3;
  cpu.run(10);
  assert_eq!(cpu.irq.events, vec![1, 4, 7, 10]);
  assert_eq!(cpu.core.next_event, 13);
}

#[test]
fn decode_latches_handler_for_bus_byte() {
  let mut cpu =
    init_with(InstructionTable::from_fn(|op| if op == 0xab { mark } else { nop }));
  cpu.memory.data[0] = 0xab;
  cpu.run(2);
  assert_eq!(cpu.core.bus, 0xab);
  assert_eq!(cpu.core.regs.pc, 1);
  assert!(!cpu.core.halted);
  cpu.tick();
  assert!(cpu.core.halted);
}

#[test]
fn execute_forces_memory_load() {
  let mut cpu = init_with(InstructionTable::filled(load_1234));
  cpu.memory.data[0x1234] = 0x77;
  cpu.run(3);
  let before = cpu.memory.log.len();
  cpu.tick();
  assert_eq!(&cpu.memory.log[before..], &[Access::Load(0x1234)]);
  assert_eq!(cpu.core.bus, 0x77);
}

#[test]
fn read_pc_settles_for_one_cycle() {
  let mut cpu = init_with(InstructionTable::filled(read_pc));
  cpu.memory.data[1] = 0x42;
  cpu.run(3);
  assert_eq!(cpu.core.execution_state, ReadPc);

  let before = cpu.memory.log.len();
  assert_eq!(step(&mut cpu), ReadPcStall);
  assert_eq!(cpu.core.bus, 0x42);
  assert_eq!(cpu.core.regs.pc, 2);
  assert_eq!(&cpu.memory.log[before..], &[Access::Load(1)]);

  // The stall does no bus work and falls into the default sequence.
  assert_eq!(step(&mut cpu), Decode);
  assert_eq!(cpu.memory.log.len(), before + 1);
}

#[test]
fn move_index_store_takes_a_setup_cycle() {
  let mut cpu = init_with(InstructionTable::filled(move_store));
  cpu.run(3);

  let before = cpu.memory.log.len();
  assert_eq!(step(&mut cpu), MemoryStore);
  assert_eq!(cpu.memory.log.len(), before);

  assert_eq!(step(&mut cpu), Decode);
  assert_eq!(&cpu.memory.log[before..], &[Access::Store(0xc000, 0x5a)]);
  assert_eq!(cpu.memory.data[0xc000], 0x5a);
}

#[test]
fn move_index_load_takes_a_setup_cycle() {
  let mut cpu = init_with(InstructionTable::filled(move_load));
  cpu.memory.data[0x8000] = 0x3c;
  cpu.run(3);

  let before = cpu.memory.log.len();
  assert_eq!(step(&mut cpu), MemoryLoad);
  assert_eq!(cpu.memory.log.len(), before);

  assert_eq!(step(&mut cpu), Fetch);
  assert_eq!(&cpu.memory.log[before..], &[Access::Load(0x8000)]);
  assert_eq!(cpu.core.bus, 0x3c);
}

#[test]
#[should_panic(expected = "no instruction latched")]
fn execute_without_decode_is_fatal() {
  let mut cpu = init();
  cpu.core.execution_state = Execute;
  cpu.tick();
}

#[test]
fn stall_does_nothing() {
  let mut cpu = init();
  cpu.core.execution_state = Stall;
  let pc = cpu.core.regs.pc;
  assert_eq!(step(&mut cpu), Execute);
  assert!(cpu.memory.log.is_empty());
  assert_eq!(cpu.core.regs.pc, pc);
  assert_eq!(cpu.core.cycles, 1);
}

#[test]
fn lifecycle_order() {
  let log = Rc::new(RefCell::new(Vec::new()));
  let mut cpu = init();
  cpu.set_components(
    Box::new(Probe {
      name: "master",
      log: log.clone(),
    }),
    vec![
      probe("a", &log),
      None,
      Some(Box::new(Inert) as Box<dyn Component>),
      probe("b", &log),
    ],
  );
  assert!(log.borrow().is_empty());
  assert_eq!(cpu.num_components(), 4);

  cpu.init();
  cpu.deinit();
  assert_eq!(
    *log.borrow(),
    vec![
      "init master",
      "init a",
      "init b",
      "deinit master",
      "deinit a",
      "deinit b",
    ]
  );
  // Every init hook saw the core.
  assert_eq!(cpu.core.index, 3);
}

#[test]
fn hotplug_single_slot() {
  let log = Rc::new(RefCell::new(Vec::new()));
  let mut cpu = init();
  cpu.set_components(
    Box::new(Inert),
    vec![probe("a", &log), probe("b", &log), None],
  );

  cpu.hotplug_attach(1);
  cpu.hotplug_detach(1);
  cpu.hotplug_attach(2);
  assert_eq!(*log.borrow(), vec!["init b", "deinit b"]);
}

#[test]
fn hotplug_out_of_range_is_ignored() {
  let log = Rc::new(RefCell::new(Vec::new()));
  let mut cpu = init();
  cpu.set_components(Box::new(Inert), vec![probe("a", &log)]);
  let before = cpu.core.clone();

  cpu.hotplug_attach(1);
  cpu.hotplug_detach(1);
  cpu.hotplug_attach(usize::MAX);
  assert!(log.borrow().is_empty());
  assert_eq!(cpu.core.index, before.index);
  assert_eq!(cpu.core.cycles, before.cycles);
  assert_eq!(cpu.core.regs, before.regs);
}

#[test]
fn reset_leaves_components_alone() {
  let log = Rc::new(RefCell::new(Vec::new()));
  let mut cpu = init();
  cpu.set_components(Box::new(Inert), vec![probe("a", &log)]);
  cpu.reset();
  assert!(log.borrow().is_empty());
  assert_eq!(cpu.num_components(), 1);
}

#[test]
fn cores_share_a_table() {
  let table = Arc::new(InstructionTable::filled(nop as Handler));
  let mem = || TestMemory {
    data: vec![0; 0x10000],
    log: Vec::new(),
  };
  let mut a = CPU::new(mem(), TestIrq::default(), table.clone(), Box::new(Inert));
  let mut b = CPU::new(mem(), TestIrq::default(), table.clone(), Box::new(Inert));
  a.reset();
  b.reset();
  a.run(8);
  b.run(3);
  assert_eq!(a.core.regs.pc, 2);
  assert_eq!(b.core.regs.pc, 1);
  assert!(Arc::ptr_eq(a.table(), b.table()));
}
