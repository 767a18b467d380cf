//! EventRegistry - events and their Participant/Watcher membership.
//!
//! Validates input before touching storage, delegates every mutation to a
//! single atomic repository call, and queues notifications only after the
//! change is committed. Authorization is the caller's job (see
//! `application::authorization`).

use std::sync::Arc;

use crate::domain::directory::UserContact;
use crate::domain::event::{
    CreatedEvent, Event, EventDetails, EventError, EventPatch, EventSnapshot, MembershipTransition,
    NewEvent, ParticipantRef, UserEvent,
};
use crate::domain::foundation::{CampaignGuid, EventGuid, UserId, ValidationError};
use crate::domain::notification::{Notification, NotificationKind, NotifyOptions};
use crate::ports::{EventRepository, NotificationQueue};

pub struct EventRegistry {
    events: Arc<dyn EventRepository>,
    notifications: Arc<dyn NotificationQueue>,
}

impl EventRegistry {
    pub fn new(events: Arc<dyn EventRepository>, notifications: Arc<dyn NotificationQueue>) -> Self {
        Self {
            events,
            notifications,
        }
    }

    /// Creates an event together with the creator's first membership.
    pub async fn create_event(&self, event: NewEvent) -> Result<CreatedEvent, EventError> {
        event.validate()?;

        let created = self.events.create(&event).await?;
        tracing::info!(
            event_guid = %created.guid,
            creator = %event.creator,
            campaign = ?event.owner,
            "event created"
        );
        Ok(created)
    }

    /// Applies a partial update and optionally notifies all members.
    pub async fn update_event(
        &self,
        event: EventGuid,
        patch: EventPatch,
        notify: NotifyOptions,
    ) -> Result<Event, EventError> {
        patch.validate()?;

        let snapshot = self.events.update(event, &patch).await?;
        tracing::info!(event_guid = %event, "event updated");

        self.notify_members(&snapshot, notify, |e| NotificationKind::EventUpdated {
            event_guid: e.guid,
            event_name: e.name.clone(),
        });
        Ok(snapshot.event)
    }

    /// Deletes an event, its membership and its publication.
    pub async fn delete_event(&self, event: EventGuid, notify: NotifyOptions) -> Result<(), EventError> {
        let snapshot = self.events.delete(event).await?;
        tracing::info!(
            event_guid = %event,
            members = snapshot.members.len(),
            "event deleted"
        );

        self.notify_members(&snapshot, notify, |e| NotificationKind::EventDeleted {
            event_name: e.name.clone(),
        });
        Ok(())
    }

    /// Adds a participant. A current watcher is moved, not duplicated.
    pub async fn add_participant(
        &self,
        event: EventGuid,
        who: ParticipantRef,
        notify: NotifyOptions,
    ) -> Result<MembershipTransition, EventError> {
        validate_participant_ref(&who)?;

        let joined = self.events.add_participant(event, &who).await?;
        tracing::info!(
            event_guid = %event,
            user_id = %joined.member.user_id,
            migrated = joined.transition.migrated(),
            "participant added"
        );

        let kind = NotificationKind::AddedToEvent {
            event_guid: joined.event.guid,
            event_name: joined.event.name.clone(),
        };
        if let Some(message) = Notification::with_options(joined.member, kind, notify) {
            self.notifications.enqueue(message);
        }
        Ok(joined.transition)
    }

    /// Returns whether the user was participating.
    pub async fn remove_participant(&self, event: EventGuid, who: ParticipantRef) -> Result<bool, EventError> {
        validate_participant_ref(&who)?;

        let removed = self.events.remove_participant(event, &who).await?;
        tracing::info!(event_guid = %event, participant = %who, removed, "participant removed");
        Ok(removed)
    }

    /// Adds a watcher. A current participant is moved, not duplicated.
    pub async fn add_watcher(&self, event: EventGuid, user: UserId) -> Result<MembershipTransition, EventError> {
        let transition = self.events.add_watcher(event, user).await?;
        tracing::info!(
            event_guid = %event,
            user_id = %user,
            migrated = transition.migrated(),
            "watcher added"
        );
        Ok(transition)
    }

    /// Returns whether the user was watching.
    pub async fn remove_watcher(&self, event: EventGuid, user: UserId) -> Result<bool, EventError> {
        let removed = self.events.remove_watcher(event, user).await?;
        tracing::info!(event_guid = %event, user_id = %user, removed, "watcher removed");
        Ok(removed)
    }

    /// Looks up the user behind a participant reference.
    pub async fn resolve_participant(&self, who: &ParticipantRef) -> Result<UserContact, EventError> {
        validate_participant_ref(who)?;
        self.events
            .resolve_user(who)
            .await?
            .ok_or_else(|| EventError::user_not_found(who))
    }

    pub async fn get_event(&self, event: EventGuid) -> Result<EventDetails, EventError> {
        self.events
            .find(event)
            .await?
            .ok_or_else(|| EventError::not_found(event))
    }

    pub async fn get_creator(&self, event: EventGuid) -> Result<UserContact, EventError> {
        Ok(self.get_event(event).await?.creator)
    }

    pub async fn get_participants(&self, event: EventGuid) -> Result<Vec<UserContact>, EventError> {
        Ok(self.events.participants(event).await?)
    }

    pub async fn get_watchers(&self, event: EventGuid) -> Result<Vec<UserContact>, EventError> {
        Ok(self.events.watchers(event).await?)
    }

    pub async fn get_user_events(&self, user: UserId) -> Result<Vec<UserEvent>, EventError> {
        Ok(self.events.events_for_user(user).await?)
    }

    pub async fn get_campaign_events(&self, campaign: CampaignGuid) -> Result<Vec<EventDetails>, EventError> {
        Ok(self.events.campaign_events(campaign).await?)
    }

    pub async fn get_personal_events(&self, user: UserId) -> Result<Vec<Event>, EventError> {
        Ok(self.events.personal_events(user).await?)
    }

    fn notify_members(
        &self,
        snapshot: &EventSnapshot,
        notify: NotifyOptions,
        kind: impl Fn(&Event) -> NotificationKind,
    ) {
        if !notify.is_any() {
            return;
        }
        for member in &snapshot.members {
            if let Some(message) = Notification::with_options(member.clone(), kind(&snapshot.event), notify) {
                self.notifications.enqueue(message);
            }
        }
    }
}

fn validate_participant_ref(who: &ParticipantRef) -> Result<(), ValidationError> {
    match who {
        ParticipantRef::Email(email) if email.trim().is_empty() => {
            Err(ValidationError::empty_field("email"))
        }
        ParticipantRef::Email(email) if !email.contains('@') => {
            Err(ValidationError::invalid_format("email", "missing @"))
        }
        _ => Ok(()),
    }
}
