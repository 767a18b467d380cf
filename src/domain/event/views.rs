//! Read models returned by event queries.

use serde::{Deserialize, Serialize};

use crate::domain::directory::UserContact;
use crate::domain::foundation::{EventGuid, EventId};

use super::{Event, MemberRole, MembershipTransition};

/// Identity of a freshly created event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEvent {
    pub id: EventId,
    pub guid: EventGuid,
}

/// An event with its creator and attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    pub event: Event,
    pub creator: UserContact,
    pub attending: usize,
}

/// An event seen from one member's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEvent {
    pub event: Event,
    pub role: MemberRole,
}

impl UserEvent {
    pub fn participating(&self) -> bool {
        self.role == MemberRole::Participant
    }
}

/// An event together with the contacts of all its members.
///
/// Returned by update and delete so members can be notified; for delete it
/// is taken before the rows are removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSnapshot {
    pub event: Event,
    pub members: Vec<UserContact>,
}

/// Outcome of adding a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedEvent {
    pub event: Event,
    pub member: UserContact,
    pub transition: MembershipTransition,
}
