//! EventRepository over the in-memory state.

use async_trait::async_trait;

use crate::domain::directory::UserContact;
use crate::domain::event::{
    CreatedEvent, Event, EventDetails, EventError, EventMembership, EventOwner, EventPatch,
    EventSnapshot, JoinedEvent, MemberRole, MembershipTransition, NewEvent, ParticipantRef,
    UserEvent,
};
use crate::domain::foundation::{CampaignGuid, DomainError, EventGuid, EventId, UserId};
use crate::ports::EventRepository;

use super::{InMemoryStore, State, StoredEvent};

impl State {
    fn stored(&self, event: EventGuid) -> Result<&StoredEvent, DomainError> {
        self.events
            .get(&event)
            .ok_or_else(|| EventError::not_found(event).into())
    }

    fn stored_mut(&mut self, event: EventGuid) -> Result<&mut StoredEvent, DomainError> {
        self.events
            .get_mut(&event)
            .ok_or_else(|| EventError::not_found(event).into())
    }

    fn lookup(&self, who: &ParticipantRef) -> Option<&UserContact> {
        match who {
            ParticipantRef::Id(user) => self.user(*user),
            ParticipantRef::Email(email) => self.user_by_email(email),
        }
    }

    fn resolve(&self, who: &ParticipantRef) -> Result<UserContact, DomainError> {
        self.lookup(who)
            .cloned()
            .ok_or_else(|| EventError::user_not_found(who).into())
    }

    fn require_user(&self, user: UserId) -> Result<(), DomainError> {
        match self.user(user) {
            Some(_) => Ok(()),
            None => Err(EventError::user_not_found(user).into()),
        }
    }

    fn details(&self, stored: &StoredEvent) -> Result<EventDetails, DomainError> {
        let creator = self
            .user(stored.event.creator)
            .cloned()
            .ok_or_else(|| DomainError::from(EventError::user_not_found(stored.event.creator)))?;
        Ok(EventDetails {
            event: stored.event.clone(),
            creator,
            attending: stored.membership.participant_count(),
        })
    }

    fn member_contacts(&self, membership: &EventMembership) -> Vec<UserContact> {
        self.contacts(membership.members().map(|(user, _)| user))
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn create(&self, new: &NewEvent) -> Result<CreatedEvent, DomainError> {
        let mut guard = self.state();
        let state = &mut *guard;

        if let EventOwner::Campaign(campaign) = new.owner {
            if state.campaign(campaign).is_none() {
                return Err(EventError::campaign_not_found(campaign).into());
            }
        }
        state.require_user(new.creator)?;

        let event = Event {
            id: EventId::from_raw(state.last_event_id + 1),
            guid: EventGuid::new(),
            name: new.name.trim().to_string(),
            description: new.description.clone(),
            location: new.location.clone(),
            start_time: new.start_time,
            end_time: new.end_time,
            max_attendees: new.max_attendees,
            is_open_join: new.is_open_join,
            creator: new.creator,
            owner: new.owner,
        };

        let mut membership = EventMembership::new(event.guid, event.max_attendees);
        let (creator, role) = new.creator_membership();
        match role {
            MemberRole::Participant => membership.add_participant(creator)?,
            MemberRole::Watcher => membership.add_watcher(creator)?,
        };

        let created = CreatedEvent {
            id: event.id,
            guid: event.guid,
        };
        state.last_event_id = created.id.value();
        state.events.insert(created.guid, StoredEvent { event, membership });
        Ok(created)
    }

    async fn update(&self, event: EventGuid, patch: &EventPatch) -> Result<EventSnapshot, DomainError> {
        let mut guard = self.state();
        let state = &mut *guard;

        state.stored(event)?;
        if let Some(campaign) = patch.campaign {
            if state.campaign(campaign).is_none() {
                return Err(EventError::campaign_not_found(campaign).into());
            }
        }

        let stored = state.stored_mut(event)?;
        let mut updated = stored.event.clone();
        updated.apply_patch(patch, stored.membership.participant_count())?;
        stored.membership.set_max_attendees(updated.max_attendees);
        stored.event = updated;

        let stored = state.stored(event)?;
        Ok(EventSnapshot {
            event: stored.event.clone(),
            members: state.member_contacts(&stored.membership),
        })
    }

    async fn delete(&self, event: EventGuid) -> Result<EventSnapshot, DomainError> {
        let mut guard = self.state();
        let state = &mut *guard;

        let removed = state
            .events
            .remove(&event)
            .ok_or_else(|| DomainError::from(EventError::not_found(event)))?;
        state.publications.remove(&event);

        Ok(EventSnapshot {
            members: state.member_contacts(&removed.membership),
            event: removed.event,
        })
    }

    async fn add_participant(
        &self,
        event: EventGuid,
        who: &ParticipantRef,
    ) -> Result<JoinedEvent, DomainError> {
        let mut guard = self.state();
        let state = &mut *guard;

        state.stored(event)?;
        let member = state.resolve(who)?;

        let stored = state.stored_mut(event)?;
        let transition = stored.membership.add_participant(member.user_id)?;
        Ok(JoinedEvent {
            event: stored.event.clone(),
            member,
            transition,
        })
    }

    async fn remove_participant(&self, event: EventGuid, who: &ParticipantRef) -> Result<bool, DomainError> {
        let mut guard = self.state();
        let state = &mut *guard;

        state.stored(event)?;
        let member = state.resolve(who)?;
        Ok(state
            .stored_mut(event)?
            .membership
            .remove(member.user_id, MemberRole::Participant))
    }

    async fn add_watcher(&self, event: EventGuid, user: UserId) -> Result<MembershipTransition, DomainError> {
        let mut guard = self.state();
        let state = &mut *guard;

        state.stored(event)?;
        state.require_user(user)?;
        Ok(state.stored_mut(event)?.membership.add_watcher(user)?)
    }

    async fn remove_watcher(&self, event: EventGuid, user: UserId) -> Result<bool, DomainError> {
        Ok(self
            .state()
            .stored_mut(event)?
            .membership
            .remove(user, MemberRole::Watcher))
    }

    async fn resolve_user(&self, who: &ParticipantRef) -> Result<Option<UserContact>, DomainError> {
        Ok(self.state().lookup(who).cloned())
    }

    async fn find(&self, event: EventGuid) -> Result<Option<EventDetails>, DomainError> {
        let state = self.state();
        state
            .events
            .get(&event)
            .map(|stored| state.details(stored))
            .transpose()
    }

    async fn participants(&self, event: EventGuid) -> Result<Vec<UserContact>, DomainError> {
        let state = self.state();
        let stored = state.stored(event)?;
        Ok(state.contacts(stored.membership.participants()))
    }

    async fn watchers(&self, event: EventGuid) -> Result<Vec<UserContact>, DomainError> {
        let state = self.state();
        let stored = state.stored(event)?;
        Ok(state.contacts(stored.membership.watchers()))
    }

    async fn events_for_user(&self, user: UserId) -> Result<Vec<UserEvent>, DomainError> {
        let state = self.state();
        state.require_user(user)?;

        let mut events: Vec<UserEvent> = state
            .events
            .values()
            .filter_map(|stored| {
                stored.membership.role_of(user).map(|role| UserEvent {
                    event: stored.event.clone(),
                    role,
                })
            })
            .collect();
        events.sort_by_key(|entry| entry.event.id);
        Ok(events)
    }

    async fn campaign_events(&self, campaign: CampaignGuid) -> Result<Vec<EventDetails>, DomainError> {
        let state = self.state();
        if state.campaign(campaign).is_none() {
            return Err(EventError::campaign_not_found(campaign).into());
        }

        let mut events = state
            .events
            .values()
            .filter(|stored| stored.event.belongs_to(campaign))
            .map(|stored| state.details(stored))
            .collect::<Result<Vec<_>, _>>()?;
        events.sort_by_key(|details| details.event.id);
        Ok(events)
    }

    async fn personal_events(&self, user: UserId) -> Result<Vec<Event>, DomainError> {
        let state = self.state();
        state.require_user(user)?;

        let mut events: Vec<Event> = state
            .events
            .values()
            .filter(|stored| stored.event.owner == EventOwner::Personal(user))
            .map(|stored| stored.event.clone())
            .collect();
        events.sort_by_key(|event| event.id);
        Ok(events)
    }
}
