//! Test helpers for sysdef-lib.
//!
//! [`RecordingKind`] stands in for a compiler: instead of producing artifacts
//! it appends every build and load it is asked to perform to a shared log, so
//! tests can assert on pipeline ordering.

use std::cell::RefCell;
use std::rc::Rc;

use crate::component::{Kind, KindRegistry};
use crate::pipeline::{PipelineError, Unit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Generate,
  Build,
  Load,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
  pub phase: Phase,
  pub system: String,
  pub component: String,
}

impl Event {
  pub fn new(phase: Phase, system: &str, component: &str) -> Self {
    Self {
      phase,
      system: system.to_string(),
      component: component.to_string(),
    }
  }

  pub fn generate(system: &str, component: &str) -> Self {
    Self::new(Phase::Generate, system, component)
  }

  pub fn build(system: &str, component: &str) -> Self {
    Self::new(Phase::Build, system, component)
  }

  pub fn load(system: &str, component: &str) -> Self {
    Self::new(Phase::Load, system, component)
  }
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

#[derive(Debug)]
pub struct RecordingKind {
  log: EventLog,
}

impl RecordingKind {
  pub fn new(log: EventLog) -> Self {
    Self { log }
  }

  fn record(&self, phase: Phase, unit: &Unit<'_>) {
    let component = unit.component().path().to_string_lossy().replace('\\', "/");
    self
      .log
      .borrow_mut()
      .push(Event::new(phase, unit.system().canonical_name(), &component));
  }
}

impl Kind for RecordingKind {
  fn name(&self) -> &str {
    "recording"
  }

  fn build(&self, unit: &Unit<'_>) -> Result<(), PipelineError> {
    self.record(Phase::Build, unit);
    Ok(())
  }

  fn load(&self, unit: &Unit<'_>) -> Result<(), PipelineError> {
    self.record(Phase::Load, unit);
    Ok(())
  }
}

/// A kind registry mapping `file_type` to a [`RecordingKind`], plus its log.
pub fn recording_kinds(file_type: &str) -> (KindRegistry, EventLog) {
  let log: EventLog = Rc::new(RefCell::new(Vec::new()));
  let mut kinds = KindRegistry::new();
  kinds.register(file_type, Rc::new(RecordingKind::new(log.clone())));
  (kinds, log)
}
