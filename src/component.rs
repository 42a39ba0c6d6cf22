use crate::cpu::Core;

/// Something attached to the core's lifecycle.
///
/// Both hooks are optional; a component that does not override one simply
/// has nothing to do at that point.
pub trait Component {
  fn name(&self) -> &str {
    "component"
  }

  /// Called when the core is initialized or the component is hotplugged.
  fn init(&mut self, _core: &mut Core) {}

  /// Called when the core shuts down or the component is unplugged.
  fn deinit(&mut self) {}
}

/// A peripheral bus slot. Empty slots are skipped by every lifecycle call.
pub type Slot = Option<Box<dyn Component>>;

/// Master component that only reports its lifecycle.
#[derive(Debug, Default)]
pub struct Board;

impl Component for Board {
  fn name(&self) -> &str {
    "board"
  }

  fn init(&mut self, core: &mut Core) {
    debug!("board attached at cycle {}", core.cycles);
  }

  fn deinit(&mut self) {
    debug!("board detached");
  }
}
