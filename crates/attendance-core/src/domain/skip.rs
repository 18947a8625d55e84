//! Administrative skip overrides.
//!
//! An active override grants a user full cumulative credit for an event and
//! removes the event's session results from consideration for that user.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::error::{AttendanceError, Result};
use crate::domain::ids::{EventId, UserId};

/// Override state for one (user, event) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipOverride {
    pub user_id: UserId,
    pub event_id: EventId,
    pub active: bool,
}

impl SkipOverride {
    pub fn inactive(user_id: UserId, event_id: EventId) -> Self {
        Self {
            user_id,
            event_id,
            active: false,
        }
    }

    pub fn granted(user_id: UserId, event_id: EventId) -> Self {
        Self {
            user_id,
            event_id,
            active: true,
        }
    }

    /// Activate the override.
    ///
    /// Activating an override that is already active is a conflict the
    /// caller must surface; it is never a silent no-op.
    pub fn activate(&mut self) -> Result<()> {
        if self.active {
            return Err(AttendanceError::SkipAlreadyActive {
                user_id: self.user_id,
                event_id: self.event_id,
            });
        }
        self.active = true;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.active = false;
    }
}

/// Lookup set of the active overrides in a snapshot of override records.
#[derive(Debug, Clone, Default)]
pub struct SkipOverrides {
    active: HashSet<(UserId, EventId)>,
}

impl SkipOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, user_id: UserId, event_id: EventId) -> bool {
        self.active.contains(&(user_id, event_id))
    }

    /// Users holding an active override for `event_id`.
    pub fn users_for(&self, event_id: EventId) -> impl Iterator<Item = UserId> + '_ {
        self.active
            .iter()
            .filter(move |(_, e)| *e == event_id)
            .map(|(u, _)| *u)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl<'a> FromIterator<&'a SkipOverride> for SkipOverrides {
    fn from_iter<I: IntoIterator<Item = &'a SkipOverride>>(iter: I) -> Self {
        Self {
            active: iter
                .into_iter()
                .filter(|o| o.active)
                .map(|o| (o.user_id, o.event_id))
                .collect(),
        }
    }
}

impl FromIterator<SkipOverride> for SkipOverrides {
    fn from_iter<I: IntoIterator<Item = SkipOverride>>(iter: I) -> Self {
        Self {
            active: iter
                .into_iter()
                .filter(|o| o.active)
                .map(|o| (o.user_id, o.event_id))
                .collect(),
        }
    }
}
