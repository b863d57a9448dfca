//! Triggers and bindings
//!
//! A trigger samples a boolean condition once per tick and remembers the
//! previous sample. The pair (previous, current) is reduced to an [`Edge`]
//! by an explicit state machine; bindings map edges to scheduler actions.

use alloc::boxed::Box;

use baton_hal::ButtonInput;

/// Result of comparing two consecutive samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// false → true
    Rising,
    /// true → true
    High,
    /// true → false
    Falling,
    /// false → false
    Low,
}

impl Edge {
    /// Classify a transition between two samples
    pub const fn from_samples(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => Edge::Rising,
            (true, true) => Edge::High,
            (true, false) => Edge::Falling,
            (false, false) => Edge::Low,
        }
    }

    /// Check if the condition is currently true
    pub const fn is_active(&self) -> bool {
        matches!(self, Edge::Rising | Edge::High)
    }
}

/// How a binding reacts to its trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BindingKind {
    /// Schedule on the rising edge
    OnPress,
    /// Schedule on the falling edge
    OnRelease,
    /// Schedule every tick while true, cancel on the falling edge
    WhileHeld,
    /// Rising edge cancels the command if running, schedules it otherwise
    Toggle,
}

/// Scheduler action requested by a binding for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BindingAction {
    /// Nothing to do this tick
    None,
    /// Attempt to schedule the command
    Schedule,
    /// Cancel the command
    Cancel,
    /// Cancel if running, otherwise schedule
    Toggle,
}

impl BindingKind {
    /// Action to take for an edge
    pub const fn action(&self, edge: Edge) -> BindingAction {
        match (self, edge) {
            (BindingKind::OnPress, Edge::Rising) => BindingAction::Schedule,
            (BindingKind::OnRelease, Edge::Falling) => BindingAction::Schedule,
            (BindingKind::WhileHeld, Edge::Rising | Edge::High) => BindingAction::Schedule,
            (BindingKind::WhileHeld, Edge::Falling) => BindingAction::Cancel,
            (BindingKind::Toggle, Edge::Rising) => BindingAction::Toggle,
            _ => BindingAction::None,
        }
    }
}

type Condition<C> = Box<dyn Fn(&C) -> bool>;

/// Edge-detecting boolean condition over the context
pub struct Trigger<C> {
    condition: Condition<C>,
    previous: bool,
}

impl<C> Trigger<C> {
    /// Create a trigger from a condition; the initial previous sample is false
    pub fn new<F>(condition: F) -> Self
    where
        F: Fn(&C) -> bool + 'static,
    {
        Self {
            condition: Box::new(condition),
            previous: false,
        }
    }

    /// Sample the condition and classify the transition
    ///
    /// Call exactly once per tick.
    pub fn sample(&mut self, ctx: &C) -> Edge {
        let current = (self.condition)(ctx);
        let edge = Edge::from_samples(self.previous, current);
        self.previous = current;
        edge
    }

    /// Value seen by the last sample
    pub fn last(&self) -> bool {
        self.previous
    }
}

impl<C: 'static> Trigger<C> {
    /// True when both triggers' conditions are true
    pub fn and(self, other: Trigger<C>) -> Trigger<C> {
        let (a, b) = (self.condition, other.condition);
        Trigger::new(move |ctx| a(ctx) && b(ctx))
    }

    /// True when either trigger's condition is true
    pub fn or(self, other: Trigger<C>) -> Trigger<C> {
        let (a, b) = (self.condition, other.condition);
        Trigger::new(move |ctx| a(ctx) || b(ctx))
    }
}

impl<C: 'static> core::ops::Not for Trigger<C> {
    type Output = Trigger<C>;

    fn not(self) -> Trigger<C> {
        let a = self.condition;
        Trigger::new(move |ctx| !a(ctx))
    }
}

impl<C: ButtonInput + 'static> Trigger<C> {
    /// Trigger on a 1-based button port of the context's input device
    pub fn button(port: u8) -> Self {
        Self::new(move |ctx: &C| ctx.button(port))
    }
}

/// Association of a trigger with a registered command
pub(crate) struct Binding<C> {
    pub trigger: Trigger<C>,
    pub kind: BindingKind,
    pub command: crate::command::CommandId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn test_edge_table() {
        assert_eq!(Edge::from_samples(false, true), Edge::Rising);
        assert_eq!(Edge::from_samples(true, true), Edge::High);
        assert_eq!(Edge::from_samples(true, false), Edge::Falling);
        assert_eq!(Edge::from_samples(false, false), Edge::Low);
    }

    #[test]
    fn test_press_hold_release_sequence() {
        let mut trigger = Trigger::new(|pressed: &Cell<bool>| pressed.get());
        let input = Cell::new(false);

        assert_eq!(trigger.sample(&input), Edge::Low);
        input.set(true);
        assert_eq!(trigger.sample(&input), Edge::Rising);
        assert_eq!(trigger.sample(&input), Edge::High);
        input.set(false);
        assert_eq!(trigger.sample(&input), Edge::Falling);
        assert_eq!(trigger.sample(&input), Edge::Low);
    }

    #[test]
    fn test_held_at_start_reads_as_rising() {
        let mut trigger = Trigger::new(|_: &()| true);
        assert_eq!(trigger.sample(&()), Edge::Rising);
        assert!(trigger.last());
    }

    #[test]
    fn test_binding_actions() {
        use BindingAction::*;

        assert_eq!(BindingKind::OnPress.action(Edge::Rising), Schedule);
        assert_eq!(BindingKind::OnPress.action(Edge::High), None);
        assert_eq!(BindingKind::OnRelease.action(Edge::Falling), Schedule);
        assert_eq!(BindingKind::OnRelease.action(Edge::Rising), None);
        assert_eq!(BindingKind::WhileHeld.action(Edge::Rising), Schedule);
        assert_eq!(BindingKind::WhileHeld.action(Edge::High), Schedule);
        assert_eq!(BindingKind::WhileHeld.action(Edge::Falling), Cancel);
        assert_eq!(BindingKind::WhileHeld.action(Edge::Low), None);
        assert_eq!(BindingKind::Toggle.action(Edge::Rising), Toggle);
        assert_eq!(BindingKind::Toggle.action(Edge::Falling), None);
    }

    #[test]
    fn test_combinators() {
        let both = Trigger::new(|v: &(bool, bool)| v.0).and(Trigger::new(|v: &(bool, bool)| v.1));
        let either = Trigger::new(|v: &(bool, bool)| v.0).or(Trigger::new(|v: &(bool, bool)| v.1));
        let neither = !Trigger::new(|v: &(bool, bool)| v.0 || v.1);

        let (mut both, mut either, mut neither) = (both, either, neither);
        assert_eq!(both.sample(&(true, false)), Edge::Low);
        assert_eq!(either.sample(&(true, false)), Edge::Rising);
        assert_eq!(neither.sample(&(false, false)), Edge::Rising);
        assert_eq!(both.sample(&(true, true)), Edge::Rising);
    }

    struct Pad([bool; 4]);

    impl ButtonInput for Pad {
        fn button_count(&self) -> u8 {
            4
        }

        fn button(&self, port: u8) -> bool {
            port >= 1 && self.0.get(usize::from(port) - 1).copied().unwrap_or(false)
        }
    }

    #[test]
    fn test_button_trigger_reads_port() {
        let mut trigger = Trigger::button(2);
        assert_eq!(trigger.sample(&Pad([true, false, false, false])), Edge::Low);
        assert_eq!(trigger.sample(&Pad([false, true, false, false])), Edge::Rising);
    }
}
