use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::fields::blank_as_none;
use super::kind::EntityKind;
use super::people::User;
use super::reference::{Ref, RelationPath};
use super::traits::Entity;
use super::validation::{validate_club, validate_event, validate_event_ticket};

/// Approval workflow state of a club.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClubState {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl FromStr for ClubState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ClubState::Pending),
            "approved" => Ok(ClubState::Approved),
            "rejected" => Ok(ClubState::Rejected),
            other => Err(ValidationError::invalid("state", other)),
        }
    }
}

/// Approval workflow state of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventState {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl FromStr for EventState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EventState::Pending),
            "approved" => Ok(EventState::Approved),
            "rejected" => Ok(EventState::Rejected),
            "cancelled" => Ok(EventState::Cancelled),
            other => Err(ValidationError::invalid("state", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(default)]
    pub state: ClubState,
    #[serde(default)]
    pub leaders: Vec<Ref<User>>,
    #[serde(default)]
    pub members: Vec<Ref<User>>,
    /// Free-form club details (meeting times, room, ...).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl Club {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            state: ClubState::default(),
            leaders: Vec::new(),
            members: Vec::new(),
            details: serde_json::Value::Null,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_leader(mut self, user_id: impl Into<String>) -> Self {
        self.leaders.push(Ref::Id(user_id.into()));
        self
    }

    pub fn with_member(mut self, user_id: impl Into<String>) -> Self {
        self.members.push(Ref::Id(user_id.into()));
        self
    }

    /// Parses and assigns a workflow state.
    pub fn set_state(&mut self, state: &str) -> Result<(), ValidationError> {
        self.state = state.parse()?;
        Ok(())
    }

    /// Adds a member, returning false if they already belong to the club.
    pub fn add_member(&mut self, user_id: &str) -> bool {
        if self.members.iter().any(|m| m.refers_to(user_id)) {
            return false;
        }
        self.members.push(Ref::from(user_id));
        true
    }

    /// Removes a member, returning false if they were not a member.
    pub fn remove_member(&mut self, user_id: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| !m.refers_to(user_id));
        self.members.len() != before
    }
}

impl Entity for Club {
    const KIND: EntityKind = EntityKind::Club;
    const RELATIONS: &'static [RelationPath] = &[
        RelationPath::new("leaders", EntityKind::User),
        RelationPath::new("members", EntityKind::User),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_club(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub state: EventState,
    pub host: Ref<User>,
    #[serde(default)]
    pub attendees: Vec<Ref<User>>,
}

impl Event {
    pub fn new(
        title: impl Into<String>,
        host_id: impl Into<String>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            location: None,
            starts_at,
            ends_at,
            state: EventState::default(),
            host: Ref::Id(host_id.into()),
            attendees: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_attendee(mut self, user_id: impl Into<String>) -> Self {
        self.attendees.push(Ref::Id(user_id.into()));
        self
    }

    /// Parses and assigns a workflow state.
    pub fn set_state(&mut self, state: &str) -> Result<(), ValidationError> {
        self.state = state.parse()?;
        Ok(())
    }
}

impl Entity for Event {
    const KIND: EntityKind = EntityKind::Event;
    const RELATIONS: &'static [RelationPath] = &[
        RelationPath::new("host", EntityKind::User),
        RelationPath::new("attendees", EntityKind::User),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_event(self)
    }
}

const TICKET_EVENT_RELATIONS: &[RelationPath] = &[RelationPath::new("host", EntityKind::User)];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTicket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub event: Ref<Event>,
    pub holder: Ref<User>,
    pub issued_at: DateTime<Utc>,
    #[serde(default)]
    pub redeemed: bool,
}

impl EventTicket {
    pub fn new(
        event_id: impl Into<String>,
        holder_id: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            event: Ref::Id(event_id.into()),
            holder: Ref::Id(holder_id.into()),
            issued_at,
            redeemed: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Marks the ticket as used. Returns false if it was already redeemed.
    pub fn redeem(&mut self) -> bool {
        !std::mem::replace(&mut self.redeemed, true)
    }
}

impl Entity for EventTicket {
    const KIND: EntityKind = EntityKind::EventTicket;
    const RELATIONS: &'static [RelationPath] = &[
        RelationPath::new("event", EntityKind::Event).with_nested(TICKET_EVENT_RELATIONS),
        RelationPath::new("holder", EntityKind::User),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_event_ticket(self)
    }
}
