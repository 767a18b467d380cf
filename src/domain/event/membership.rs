//! Participant/Watcher membership of a single event.
//!
//! Each user holds at most one role per event, so the two sets are disjoint
//! by construction: membership is a map from user to role, and joining with
//! the other role is a single transition of that entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{EventGuid, UserId, ValidationError};

use super::EventError;

/// Role a user holds in an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// Attending; counted against capacity.
    Participant,
    /// Following; never capacity-limited.
    Watcher,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Participant => "participant",
            MemberRole::Watcher => "watcher",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "participant" => Ok(MemberRole::Participant),
            "watcher" => Ok(MemberRole::Watcher),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown member role '{}'", other),
            )),
        }
    }
}

/// How a participant is identified by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantRef {
    Id(UserId),
    Email(String),
}

impl fmt::Display for ParticipantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantRef::Id(id) => write!(f, "{}", id),
            ParticipantRef::Email(email) => f.write_str(email),
        }
    }
}

/// Result of a successful join: the role before and after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipTransition {
    pub user: UserId,
    pub previous: Option<MemberRole>,
    pub current: MemberRole,
}

impl MembershipTransition {
    /// True when the user switched from the other role.
    pub fn migrated(&self) -> bool {
        matches!(self.previous, Some(prev) if prev != self.current)
    }
}

/// Membership of one event with its capacity rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMembership {
    event: EventGuid,
    max_attendees: Option<i32>,
    members: BTreeMap<UserId, MemberRole>,
}

impl EventMembership {
    pub fn new(event: EventGuid, max_attendees: Option<i32>) -> Self {
        Self {
            event,
            max_attendees,
            members: BTreeMap::new(),
        }
    }

    /// Rebuilds membership from stored rows.
    pub fn from_members(
        event: EventGuid,
        max_attendees: Option<i32>,
        members: impl IntoIterator<Item = (UserId, MemberRole)>,
    ) -> Self {
        Self {
            event,
            max_attendees,
            members: members.into_iter().collect(),
        }
    }

    pub fn set_max_attendees(&mut self, max_attendees: Option<i32>) {
        self.max_attendees = max_attendees;
    }

    pub fn role_of(&self, user: UserId) -> Option<MemberRole> {
        self.members.get(&user).copied()
    }

    pub fn participants(&self) -> Vec<UserId> {
        self.with_role(MemberRole::Participant)
    }

    pub fn watchers(&self) -> Vec<UserId> {
        self.with_role(MemberRole::Watcher)
    }

    /// Everyone with any role, in user id order.
    pub fn members(&self) -> impl Iterator<Item = (UserId, MemberRole)> + '_ {
        self.members.iter().map(|(user, role)| (*user, *role))
    }

    pub fn participant_count(&self) -> usize {
        self.members
            .values()
            .filter(|role| **role == MemberRole::Participant)
            .count()
    }

    pub fn is_full(&self) -> bool {
        match self.max_attendees {
            Some(max) => self.participant_count() >= max.max(0) as usize,
            None => false,
        }
    }

    /// Makes `user` a participant, moving them out of the watchers if needed.
    pub fn add_participant(&mut self, user: UserId) -> Result<MembershipTransition, EventError> {
        let previous = self.role_of(user);
        if previous == Some(MemberRole::Participant) {
            return Err(EventError::already_member(self.event, user, MemberRole::Participant));
        }
        if self.is_full() {
            return Err(EventError::already_full(self.event, self.max_attendees.unwrap_or(0)));
        }
        self.members.insert(user, MemberRole::Participant);
        Ok(MembershipTransition {
            user,
            previous,
            current: MemberRole::Participant,
        })
    }

    /// Makes `user` a watcher, moving them out of the participants if needed.
    pub fn add_watcher(&mut self, user: UserId) -> Result<MembershipTransition, EventError> {
        let previous = self.role_of(user);
        if previous == Some(MemberRole::Watcher) {
            return Err(EventError::already_member(self.event, user, MemberRole::Watcher));
        }
        self.members.insert(user, MemberRole::Watcher);
        Ok(MembershipTransition {
            user,
            previous,
            current: MemberRole::Watcher,
        })
    }

    /// Removes `user` if they hold `role`. Returns whether anything changed.
    pub fn remove(&mut self, user: UserId, role: MemberRole) -> bool {
        if self.role_of(user) == Some(role) {
            self.members.remove(&user);
            true
        } else {
            false
        }
    }

    fn with_role(&self, role: MemberRole) -> Vec<UserId> {
        self.members
            .iter()
            .filter(|(_, r)| **r == role)
            .map(|(user, _)| *user)
            .collect()
    }
}
