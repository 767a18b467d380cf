//! Event repository port.
//!
//! Storage for events and their membership. Every mutating method is one
//! atomic unit: capacity and duplicate checks are evaluated in the same
//! transaction (or under the same lock) as the write they guard, and a
//! Watcher/Participant switch is a single update of the member's role.
//!
//! Errors are `DomainError`s built from `EventError`, so callers can convert
//! back with `EventError::from`.

use crate::domain::directory::UserContact;
use crate::domain::event::{
    CreatedEvent, Event, EventDetails, EventPatch, EventSnapshot, JoinedEvent,
    MembershipTransition, NewEvent, ParticipantRef, UserEvent,
};
use crate::domain::foundation::{CampaignGuid, DomainError, EventGuid, UserId};
use async_trait::async_trait;

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Inserts the event and the creator's initial membership together.
    ///
    /// # Errors
    ///
    /// - `CampaignNotFound` if the owning campaign does not exist
    /// - `UserNotFound` if the creator does not exist
    async fn create(&self, event: &NewEvent) -> Result<CreatedEvent, DomainError>;

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// - `EventNotFound`
    /// - `CampaignNotFound` when re-pointing to a missing campaign
    /// - `IncorrectEventType` when re-pointing a personal event
    /// - `CapacityBelowParticipants`
    async fn update(&self, event: EventGuid, patch: &EventPatch) -> Result<EventSnapshot, DomainError>;

    /// Deletes the event with its membership and publication.
    ///
    /// Returns the event and its members as they were before deletion.
    async fn delete(&self, event: EventGuid) -> Result<EventSnapshot, DomainError>;

    /// Adds a participant, moving them out of the watchers if needed.
    ///
    /// # Errors
    ///
    /// - `EventNotFound`, `UserNotFound`
    /// - `EventAlreadyFull`, `DuplicateKey`
    async fn add_participant(
        &self,
        event: EventGuid,
        who: &ParticipantRef,
    ) -> Result<JoinedEvent, DomainError>;

    /// Removes a participant. Returns `false` if they were not participating.
    async fn remove_participant(
        &self,
        event: EventGuid,
        who: &ParticipantRef,
    ) -> Result<bool, DomainError>;

    /// Adds a watcher, moving them out of the participants if needed.
    async fn add_watcher(
        &self,
        event: EventGuid,
        user: UserId,
    ) -> Result<MembershipTransition, DomainError>;

    /// Removes a watcher. Returns `false` if they were not watching.
    async fn remove_watcher(&self, event: EventGuid, user: UserId) -> Result<bool, DomainError>;

    /// Resolves a participant reference against the user directory.
    async fn resolve_user(&self, who: &ParticipantRef) -> Result<Option<UserContact>, DomainError>;

    /// Returns `None` if the event does not exist.
    async fn find(&self, event: EventGuid) -> Result<Option<EventDetails>, DomainError>;

    async fn participants(&self, event: EventGuid) -> Result<Vec<UserContact>, DomainError>;

    async fn watchers(&self, event: EventGuid) -> Result<Vec<UserContact>, DomainError>;

    /// Events the user participates in or watches.
    async fn events_for_user(&self, user: UserId) -> Result<Vec<UserEvent>, DomainError>;

    async fn campaign_events(&self, campaign: CampaignGuid) -> Result<Vec<EventDetails>, DomainError>;

    /// Personal events owned by `user`.
    async fn personal_events(&self, user: UserId) -> Result<Vec<Event>, DomainError>;
}
