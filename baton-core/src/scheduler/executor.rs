//! Scheduler state and the per-tick loop
//!
//! One explicitly owned `Scheduler` holds the registered subsystems,
//! commands and bindings. Commands are stored in a slab indexed by
//! [`CommandId`]; the running set is kept in scheduling order.
//!
//! Tick order while enabled:
//! 1. Sample every binding's trigger, in registration order
//! 2. Execute running commands, end the ones that finished or faulted
//! 3. Schedule default commands for subsystems left without a holder
//! 4. Run every subsystem's periodic hook
//!
//! While disabled only triggers (1) and periodic hooks (4) run.

use alloc::boxed::Box;
use alloc::vec::Vec;
use heapless::Deque;

use super::report::{CommandFault, FaultPhase, TickReport, FAULT_LOG_LEN};
use crate::command::{Command, CommandError, CommandId, CommandState};
use crate::state::{ModeEvent, RobotMode};
use crate::subsystem::{Requirements, SubsystemId, Subsystems, MAX_SUBSYSTEMS};
use crate::trigger::{Binding, BindingAction, BindingKind, Trigger};

/// Maximum number of registered commands
pub const MAX_COMMANDS: usize = u16::MAX as usize;

/// Maximum number of trigger bindings
pub const MAX_BINDINGS: usize = 64;

/// Successful scheduling outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Scheduled {
    /// Command initialized and now holds its requirements
    Started,
    /// Command was already running; nothing changed
    AlreadyRunning,
}

/// Scheduler errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// Robot is disabled
    #[error("robot is disabled")]
    Disabled,
    /// Command id was not issued by this scheduler
    #[error("unknown command")]
    UnknownCommand,
    /// Subsystem id was not issued by this scheduler
    #[error("unknown subsystem")]
    UnknownSubsystem,
    /// Subsystem table is full
    #[error("too many subsystems")]
    TooManySubsystems,
    /// Command slab is full
    #[error("too many commands")]
    TooManyCommands,
    /// Binding table is full
    #[error("too many bindings")]
    TooManyBindings,
    /// A non-interruptible command holds a required subsystem
    #[error("required subsystem held by a non-interruptible command")]
    Conflict { holder: CommandId },
    /// Default command must require exactly its own subsystem
    #[error("default command must require exactly its subsystem")]
    InvalidDefault,
    /// Command failed to initialize and was ended
    #[error("command failed to initialize: {0}")]
    Fault(CommandError),
}

struct SubsystemSlot {
    name: &'static str,
    default: Option<CommandId>,
    /// Replacement default waiting for the subsystem to go idle
    pending_default: Option<CommandId>,
    current: Option<CommandId>,
}

struct CommandSlot<C> {
    command: Box<dyn Command<C>>,
    requirements: Requirements,
    state: CommandState,
}

/// Command scheduler over an application context `C`
pub struct Scheduler<C> {
    subsystems: heapless::Vec<SubsystemSlot, MAX_SUBSYSTEMS>,
    commands: Vec<CommandSlot<C>>,
    /// Active commands in scheduling order
    running: Vec<CommandId>,
    bindings: Vec<Binding<C>>,
    mode: RobotMode,
    tick: u64,
    /// Report accumulating for the next `run`
    report: TickReport,
    faults: Deque<CommandFault, FAULT_LOG_LEN>,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Scheduler<C> {
    /// Create an empty scheduler in the disabled mode
    pub fn new() -> Self {
        Self {
            subsystems: heapless::Vec::new(),
            commands: Vec::new(),
            running: Vec::new(),
            bindings: Vec::new(),
            mode: RobotMode::Disabled,
            tick: 0,
            report: TickReport::default(),
            faults: Deque::new(),
        }
    }

    // ---- registration ----

    /// Register a subsystem and return its handle
    ///
    /// Handles are issued in registration order starting at index 0; the
    /// context's [`Subsystems::subsystem_mut`] must resolve them.
    pub fn register_subsystem(&mut self, name: &'static str) -> Result<SubsystemId, ScheduleError> {
        let id = SubsystemId::from_index(self.subsystems.len())
            .ok_or(ScheduleError::TooManySubsystems)?;
        self.subsystems
            .push(SubsystemSlot {
                name,
                default: None,
                pending_default: None,
                current: None,
            })
            .map_err(|_| ScheduleError::TooManySubsystems)?;
        debug!("registered subsystem {} as {}", name, id.index());
        Ok(id)
    }

    /// Register a command and return its handle
    pub fn register<T>(&mut self, command: T) -> Result<CommandId, ScheduleError>
    where
        T: Command<C> + 'static,
    {
        self.register_boxed(Box::new(command))
    }

    /// Register an already boxed command
    pub fn register_boxed(&mut self, command: Box<dyn Command<C>>) -> Result<CommandId, ScheduleError> {
        let requirements = command.requirements();
        if requirements.iter().any(|sub| sub.index() >= self.subsystems.len()) {
            return Err(ScheduleError::UnknownSubsystem);
        }
        if self.commands.len() >= MAX_COMMANDS {
            return Err(ScheduleError::TooManyCommands);
        }

        let id = CommandId::new(self.commands.len());
        trace!("registered command {} as {}", command.name(), id.index());
        self.commands.push(CommandSlot {
            command,
            requirements,
            state: CommandState::Idle,
        });
        Ok(id)
    }

    /// Set the command a subsystem runs when nothing else holds it
    ///
    /// The most recent registration wins. While a non-default command holds
    /// the subsystem the replacement is queued and installed once the
    /// subsystem goes idle. A running previous default is ended unless it is
    /// non-interruptible, in which case the replacement waits for it too.
    pub fn set_default_command(
        &mut self,
        subsystem: SubsystemId,
        command: CommandId,
        ctx: &mut C,
    ) -> Result<(), ScheduleError> {
        let requirements = self.slot(command)?.requirements;
        let slot = self
            .subsystems
            .get(subsystem.index())
            .ok_or(ScheduleError::UnknownSubsystem)?;
        if requirements != Requirements::of(subsystem) {
            return Err(ScheduleError::InvalidDefault);
        }
        let (current, default) = (slot.current, slot.default);

        match current {
            Some(holder) if Some(holder) != default => {
                debug!("default for {} queued behind running command", slot.name);
                self.subsystems[subsystem.index()].pending_default = Some(command);
            }
            Some(old_default)
                if old_default != command && !self.commands[old_default.index()].command.interruptible() =>
            {
                debug!("default for {} queued behind non-interruptible default", slot.name);
                self.subsystems[subsystem.index()].pending_default = Some(command);
            }
            Some(old_default) => {
                if old_default != command {
                    self.finish(old_default, ctx, true);
                }
                self.install_default(subsystem, command);
            }
            None => self.install_default(subsystem, command),
        }
        Ok(())
    }

    /// Bind a trigger to a command
    ///
    /// Bindings are evaluated in registration order every tick.
    pub fn bind(&mut self, trigger: Trigger<C>, kind: BindingKind, command: CommandId) -> Result<(), ScheduleError> {
        self.slot(command)?;
        if self.bindings.len() >= MAX_BINDINGS {
            return Err(ScheduleError::TooManyBindings);
        }
        self.bindings.push(Binding {
            trigger,
            kind,
            command,
        });
        Ok(())
    }

    // ---- scheduling ----

    /// Schedule a command, displacing interruptible conflicting commands
    pub fn schedule(&mut self, id: CommandId, ctx: &mut C) -> Result<Scheduled, ScheduleError> {
        if !self.mode.is_enabled() {
            return Err(ScheduleError::Disabled);
        }
        let slot = self.slot(id)?;
        if slot.state.is_active() {
            return Ok(Scheduled::AlreadyRunning);
        }
        let requirements = slot.requirements;

        // At most one holder per required subsystem
        let mut conflicts: heapless::Vec<CommandId, MAX_SUBSYSTEMS> = heapless::Vec::new();
        for sub in requirements.iter() {
            let Some(holder) = self.subsystems[sub.index()].current else {
                continue;
            };
            if conflicts.contains(&holder) {
                continue;
            }
            if !self.commands[holder.index()].command.interruptible() {
                debug!(
                    "{} rejected: {} is not interruptible",
                    self.commands[id.index()].command.name(),
                    self.commands[holder.index()].command.name()
                );
                return Err(ScheduleError::Conflict { holder });
            }
            let _ = conflicts.push(holder);
        }

        for holder in conflicts {
            self.finish(holder, ctx, true);
        }

        for sub in requirements.iter() {
            self.subsystems[sub.index()].current = Some(id);
        }
        self.commands[id.index()].state = CommandState::Scheduled;
        self.running.push(id);

        let slot = &mut self.commands[id.index()];
        match slot.command.initialize(ctx) {
            Ok(()) => {
                slot.state = CommandState::Running;
                debug!("{} started", slot.command.name());
                self.report.started = self.report.started.saturating_add(1);
                Ok(Scheduled::Started)
            }
            Err(error) => {
                self.finish(id, ctx, true);
                self.record_fault(id, FaultPhase::Initialize, error);
                Err(ScheduleError::Fault(error))
            }
        }
    }

    /// End a running command as interrupted
    ///
    /// Returns `false` if the command was not running.
    pub fn cancel(&mut self, id: CommandId, ctx: &mut C) -> bool {
        let active = self
            .commands
            .get(id.index())
            .is_some_and(|slot| slot.state.is_active());
        if active {
            self.finish(id, ctx, true);
        }
        active
    }

    /// End every running command as interrupted, in scheduling order
    pub fn cancel_all(&mut self, ctx: &mut C) {
        while let Some(&id) = self.running.first() {
            self.finish(id, ctx, true);
        }
    }

    /// Apply a mode event and return the resulting mode
    ///
    /// Entering `Disabled` cancels every running command.
    pub fn handle_mode_event(&mut self, event: ModeEvent, ctx: &mut C) -> RobotMode {
        let next = self.mode.transition(event);
        if next != self.mode {
            info!("mode {} -> {}", self.mode, next);
            if !next.is_enabled() {
                self.cancel_all(ctx);
            }
            self.mode = next;
        }
        next
    }

    // ---- queries ----

    /// Current robot mode
    pub fn mode(&self) -> RobotMode {
        self.mode
    }

    /// Number of completed ticks
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Lifecycle state of a command
    pub fn state(&self, id: CommandId) -> Option<CommandState> {
        self.commands.get(id.index()).map(|slot| slot.state)
    }

    /// Check if a command holds its requirements
    pub fn is_scheduled(&self, id: CommandId) -> bool {
        self.state(id).is_some_and(|state| state.is_active())
    }

    /// Command currently holding a subsystem
    pub fn current_command(&self, subsystem: SubsystemId) -> Option<CommandId> {
        self.subsystems.get(subsystem.index()).and_then(|slot| slot.current)
    }

    /// Installed default command of a subsystem
    pub fn default_command(&self, subsystem: SubsystemId) -> Option<CommandId> {
        self.subsystems.get(subsystem.index()).and_then(|slot| slot.default)
    }

    /// Active commands in scheduling order
    pub fn running(&self) -> &[CommandId] {
        &self.running
    }

    /// Requirements a command was registered with
    pub fn requirements(&self, id: CommandId) -> Option<Requirements> {
        self.commands.get(id.index()).map(|slot| slot.requirements)
    }

    /// Name of a registered command
    pub fn command_name(&self, id: CommandId) -> Option<&'static str> {
        self.commands.get(id.index()).map(|slot| slot.command.name())
    }

    /// Name of a registered subsystem
    pub fn subsystem_name(&self, id: SubsystemId) -> Option<&'static str> {
        self.subsystems.get(id.index()).map(|slot| slot.name)
    }

    /// Number of registered subsystems
    pub fn subsystem_count(&self) -> usize {
        self.subsystems.len()
    }

    /// Number of registered bindings
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Most recent faults, oldest first
    pub fn faults(&self) -> impl Iterator<Item = &CommandFault> {
        self.faults.iter()
    }

    // ---- internals ----

    fn slot(&self, id: CommandId) -> Result<&CommandSlot<C>, ScheduleError> {
        self.commands.get(id.index()).ok_or(ScheduleError::UnknownCommand)
    }

    fn install_default(&mut self, subsystem: SubsystemId, command: CommandId) {
        let slot = &mut self.subsystems[subsystem.index()];
        slot.default = Some(command);
        slot.pending_default = None;
    }

    /// Run `end`, release requirements and drop from the running set
    fn finish(&mut self, id: CommandId, ctx: &mut C, interrupted: bool) {
        let slot = &mut self.commands[id.index()];
        slot.command.end(ctx, interrupted);
        slot.state = CommandState::Ended;
        debug!("{} ended (interrupted: {})", slot.command.name(), interrupted);

        for sub in slot.requirements.iter() {
            if let Some(sub) = self.subsystems.get_mut(sub.index()) {
                if sub.current == Some(id) {
                    sub.current = None;
                }
            }
        }
        if let Some(position) = self.running.iter().position(|&r| r == id) {
            self.running.remove(position);
        }
        self.report.ended = self.report.ended.saturating_add(1);
    }

    fn record_fault(&mut self, command: CommandId, phase: FaultPhase, error: CommandError) {
        warn!(
            "{} faulted in {}: {}",
            self.commands[command.index()].command.name(),
            phase,
            error
        );
        let fault = CommandFault {
            command,
            phase,
            error,
        };
        self.report.record(fault);
        if self.faults.is_full() {
            self.faults.pop_front();
        }
        let _ = self.faults.push_back(fault);
    }

    fn poll_bindings(&mut self, ctx: &mut C) {
        let enabled = self.mode.is_enabled();
        for index in 0..self.bindings.len() {
            let binding = &mut self.bindings[index];
            let edge = binding.trigger.sample(ctx);
            if !enabled {
                continue;
            }
            let command = binding.command;
            match binding.kind.action(edge) {
                BindingAction::None => {}
                BindingAction::Schedule => self.schedule_from_binding(command, ctx),
                BindingAction::Cancel => {
                    self.cancel(command, ctx);
                }
                BindingAction::Toggle => {
                    if !self.cancel(command, ctx) {
                        self.schedule_from_binding(command, ctx);
                    }
                }
            }
        }
    }

    fn schedule_from_binding(&mut self, command: CommandId, ctx: &mut C) {
        if let Err(_error) = self.schedule(command, ctx) {
            debug!("binding dropped: {}", _error);
        }
    }

    fn step_commands(&mut self, ctx: &mut C) {
        let mut index = 0;
        while index < self.running.len() {
            let id = self.running[index];
            let command = &mut self.commands[id.index()].command;
            let outcome = match command.execute(ctx) {
                Ok(()) => Ok(command.is_finished(ctx)),
                Err(error) => Err(error),
            };

            match outcome {
                Ok(false) => index += 1,
                // `finish` removes `id` at `index`
                Ok(true) => self.finish(id, ctx, false),
                Err(error) => {
                    self.finish(id, ctx, true);
                    self.record_fault(id, FaultPhase::Execute, error);
                }
            }
        }
    }

    fn fallback_defaults(&mut self, ctx: &mut C) {
        for index in 0..self.subsystems.len() {
            let slot = &mut self.subsystems[index];
            if slot.current.is_some() {
                continue;
            }
            if let Some(pending) = slot.pending_default.take() {
                slot.default = Some(pending);
            }
            if let Some(default) = slot.default {
                if let Err(_error) = self.schedule(default, ctx) {
                    debug!("default for {} not started: {}", self.subsystems[index].name, _error);
                }
            }
        }
    }
}

impl<C: Subsystems> Scheduler<C> {
    /// Run one tick and report what changed
    pub fn run(&mut self, ctx: &mut C) -> TickReport {
        self.tick += 1;
        self.report.tick = self.tick;

        self.poll_bindings(ctx);
        if self.mode.is_enabled() {
            self.step_commands(ctx);
            self.fallback_defaults(ctx);
        }

        for index in 0..self.subsystems.len() {
            let Some(id) = SubsystemId::from_index(index) else {
                continue;
            };
            if let Some(subsystem) = ctx.subsystem_mut(id) {
                subsystem.periodic();
            }
        }

        core::mem::take(&mut self.report)
    }
}
