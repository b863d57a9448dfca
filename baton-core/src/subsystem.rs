//! Subsystems and requirement sets
//!
//! A subsystem is the exclusive owner of one hardware resource group. The
//! scheduler only ever sees subsystems through their [`SubsystemId`]; the
//! objects themselves live in the application context, which hands them
//! out through [`Subsystems`].

use core::fmt;

/// Maximum subsystems per scheduler (one bit each in [`Requirements`])
pub const MAX_SUBSYSTEMS: usize = 32;

/// Handle to a registered subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SubsystemId(u8);

impl SubsystemId {
    /// Create a handle from a registration index
    ///
    /// Returns `None` if the index does not fit in a requirement set.
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < MAX_SUBSYSTEMS {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Registration index
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    const fn bit(self) -> u32 {
        1 << self.0
    }
}

/// Set of subsystems a command needs exclusive access to
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Requirements(u32);

impl Requirements {
    /// Empty set
    pub const fn none() -> Self {
        Self(0)
    }

    /// Set containing a single subsystem
    pub const fn of(id: SubsystemId) -> Self {
        Self(id.bit())
    }

    /// This set plus one subsystem
    pub const fn with(self, id: SubsystemId) -> Self {
        Self(self.0 | id.bit())
    }

    /// Union of two sets
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check if the two sets share any subsystem
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Check if a subsystem is in the set
    pub const fn contains(self, id: SubsystemId) -> bool {
        self.0 & id.bit() != 0
    }

    /// Check if the set is empty
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of subsystems in the set
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate the subsystems in the set, lowest index first
    pub fn iter(self) -> impl Iterator<Item = SubsystemId> {
        (0..MAX_SUBSYSTEMS as u8)
            .filter(move |i| self.0 & (1 << i) != 0)
            .map(SubsystemId)
    }
}

impl From<SubsystemId> for Requirements {
    fn from(id: SubsystemId) -> Self {
        Self::of(id)
    }
}

impl FromIterator<SubsystemId> for Requirements {
    fn from_iter<I: IntoIterator<Item = SubsystemId>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}

impl fmt::Debug for Requirements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(SubsystemId::index)).finish()
    }
}

/// Capability of a hardware resource group
pub trait Subsystem {
    /// Name for logging
    fn name(&self) -> &'static str;

    /// Housekeeping hook, run once per tick regardless of which command
    /// holds the subsystem
    ///
    /// Must not schedule or cancel commands.
    fn periodic(&mut self) {}
}

/// Application context that owns the subsystem objects
pub trait Subsystems {
    /// Look up a subsystem by the handle it was registered under
    fn subsystem_mut(&mut self, id: SubsystemId) -> Option<&mut dyn Subsystem>;
}
