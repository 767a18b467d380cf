//! Event module - events and their Participant/Watcher membership.
//!
//! An event is owned either by a campaign or by a single user. Members join
//! as participants (counted against `max_attendees`) or as watchers
//! (unbounded). A user never holds both roles on the same event.

mod errors;
#[allow(clippy::module_inception)]
mod event;
mod membership;
mod views;

pub use errors::EventError;
pub use event::{Event, EventOwner, EventPatch, FieldPatch, NewEvent};
pub use membership::{EventMembership, MemberRole, MembershipTransition, ParticipantRef};
pub use views::{CreatedEvent, EventDetails, EventSnapshot, JoinedEvent, UserEvent};
