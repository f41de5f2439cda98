use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::fields::blank_as_none;
use super::kind::EntityKind;
use super::people::User;
use super::reference::{Ref, RelationPath};
use super::traits::Entity;
use super::validation::{validate_blackboard, validate_chat, validate_message};

/// Publication state of a blackboard post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlackboardState {
    #[default]
    Draft,
    Published,
    Archived,
}

impl FromStr for BlackboardState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(BlackboardState::Draft),
            "published" => Ok(BlackboardState::Published),
            "archived" => Ok(BlackboardState::Archived),
            other => Err(ValidationError::invalid("state", other)),
        }
    }
}

/// A notice pinned to the school blackboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blackboard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub state: BlackboardState,
    pub author: Ref<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Blackboard {
    pub fn new(title: impl Into<String>, author_id: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            body: String::new(),
            tags: Vec::new(),
            state: BlackboardState::default(),
            author: Ref::Id(author_id.into()),
            published_at: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Parses and assigns a publication state.
    ///
    /// Moving to `published` stamps `published_at` the first time.
    pub fn set_state(&mut self, state: &str, now: DateTime<Utc>) -> Result<(), ValidationError> {
        self.state = state.parse()?;
        if self.state == BlackboardState::Published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
        Ok(())
    }
}

impl Entity for Blackboard {
    const KIND: EntityKind = EntityKind::Blackboard;
    const RELATIONS: &'static [RelationPath] = &[RelationPath::new("author", EntityKind::User)];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_blackboard(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Direct,
    #[default]
    Group,
}

const CHAT_MESSAGE_RELATIONS: &[RelationPath] = &[RelationPath::new("sender", EntityKind::User)];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: ChatKind,
    #[serde(default)]
    pub participants: Vec<Ref<User>>,
    #[serde(default)]
    pub messages: Vec<Ref<Message>>,
}

impl Chat {
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            kind: ChatKind::Group,
            participants: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn direct(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            id: None,
            name: None,
            kind: ChatKind::Direct,
            participants: vec![Ref::Id(first.into()), Ref::Id(second.into())],
            messages: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_participant(mut self, user_id: impl Into<String>) -> Self {
        self.participants.push(Ref::Id(user_id.into()));
        self
    }

    pub fn with_message(mut self, message_id: impl Into<String>) -> Self {
        self.messages.push(Ref::Id(message_id.into()));
        self
    }

    pub fn is_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p.refers_to(user_id))
    }
}

impl Entity for Chat {
    const KIND: EntityKind = EntityKind::Chat;
    const RELATIONS: &'static [RelationPath] = &[
        RelationPath::new("participants", EntityKind::User),
        RelationPath::new("messages", EntityKind::Message).with_nested(CHAT_MESSAGE_RELATIONS),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_chat(self)
    }
}

/// An emoji reaction left on a message by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub emoji: String,
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollAnswer {
    pub text: String,
    /// Ids of the users who picked this answer.
    #[serde(default)]
    pub votes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub question: String,
    pub answers: Vec<PollAnswer>,
    #[serde(default)]
    pub multiple_choice: bool,
}

impl Poll {
    pub fn new<I, S>(question: impl Into<String>, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            question: question.into(),
            answers: answers
                .into_iter()
                .map(|text| PollAnswer {
                    text: text.into(),
                    votes: Vec::new(),
                })
                .collect(),
            multiple_choice: false,
        }
    }

    pub fn total_votes(&self) -> usize {
        self.answers.iter().map(|a| a.votes.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Id of the chat this message was posted in.
    pub chat: String,
    pub sender: Ref<User>,
    #[serde(default)]
    pub text: String,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll: Option<Poll>,
}

impl Message {
    pub fn new(
        chat_id: impl Into<String>,
        sender_id: impl Into<String>,
        text: impl Into<String>,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            chat: chat_id.into(),
            sender: Ref::Id(sender_id.into()),
            text: text.into(),
            sent_at,
            reactions: Vec::new(),
            poll: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_poll(mut self, poll: Poll) -> Self {
        self.poll = Some(poll);
        self
    }

    /// Adds a reaction. Returns false if the user already reacted with this emoji.
    pub fn add_reaction(&mut self, user_id: &str, emoji: &str) -> bool {
        let exists = self
            .reactions
            .iter()
            .any(|r| r.user == user_id && r.emoji == emoji);
        if exists {
            return false;
        }
        self.reactions.push(Reaction {
            emoji: emoji.to_string(),
            user: user_id.to_string(),
        });
        true
    }

    /// Removes a reaction. Returns false if there was nothing to remove.
    pub fn remove_reaction(&mut self, user_id: &str, emoji: &str) -> bool {
        let before = self.reactions.len();
        self.reactions
            .retain(|r| !(r.user == user_id && r.emoji == emoji));
        self.reactions.len() != before
    }

    /// Records a vote for the answer at `answer`.
    ///
    /// Single-choice polls move an existing vote of the same user.
    pub fn vote(&mut self, answer: usize, user_id: &str) -> Result<(), ValidationError> {
        let poll = self.poll_mut()?;
        if answer >= poll.answers.len() {
            return Err(ValidationError::OutOfRange {
                field: "answer",
                value: answer.to_string(),
            });
        }
        if !poll.multiple_choice {
            for other in poll.answers.iter_mut() {
                other.votes.retain(|voter| voter != user_id);
            }
        }
        let votes = &mut poll.answers[answer].votes;
        if !votes.iter().any(|voter| voter == user_id) {
            votes.push(user_id.to_string());
        }
        Ok(())
    }

    /// Withdraws a vote. Returns `Ok(false)` if the user had not voted for it.
    pub fn unvote(&mut self, answer: usize, user_id: &str) -> Result<bool, ValidationError> {
        let poll = self.poll_mut()?;
        let Some(entry) = poll.answers.get_mut(answer) else {
            return Err(ValidationError::OutOfRange {
                field: "answer",
                value: answer.to_string(),
            });
        };
        let before = entry.votes.len();
        entry.votes.retain(|voter| voter != user_id);
        Ok(entry.votes.len() != before)
    }

    fn poll_mut(&mut self) -> Result<&mut Poll, ValidationError> {
        self.poll
            .as_mut()
            .ok_or_else(|| ValidationError::invalid("poll", "message has no poll"))
    }
}

impl Entity for Message {
    const KIND: EntityKind = EntityKind::Message;
    const RELATIONS: &'static [RelationPath] = &[RelationPath::new("sender", EntityKind::User)];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_message(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sent_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 3, 14, 0, 0).unwrap()
    }

    fn poll_message() -> Message {
        Message::new("ch1", "u1", "Where do we meet?", sent_at())
            .with_poll(Poll::new("Room?", ["A101", "B202", "Library"]))
    }

    #[test]
    fn test_reactions_are_unique_per_user_and_emoji() {
        let mut message = Message::new("ch1", "u1", "hello", sent_at());

        assert!(message.add_reaction("u2", "👍"));
        assert!(!message.add_reaction("u2", "👍"));
        assert!(message.add_reaction("u3", "👍"));
        assert!(message.add_reaction("u2", "🎉"));
        assert_eq!(message.reactions.len(), 3);

        assert!(message.remove_reaction("u2", "👍"));
        assert!(!message.remove_reaction("u2", "👍"));
        assert_eq!(message.reactions.len(), 2);
    }

    #[test]
    fn test_single_choice_vote_moves() {
        let mut message = poll_message();

        message.vote(0, "u2").unwrap();
        message.vote(2, "u2").unwrap();

        let poll = message.poll.as_ref().unwrap();
        assert!(poll.answers[0].votes.is_empty());
        assert_eq!(poll.answers[2].votes, vec!["u2".to_string()]);
        assert_eq!(poll.total_votes(), 1);
    }

    #[test]
    fn test_multiple_choice_vote_accumulates() {
        let mut message = poll_message();
        message.poll.as_mut().unwrap().multiple_choice = true;

        message.vote(0, "u2").unwrap();
        message.vote(1, "u2").unwrap();
        message.vote(1, "u2").unwrap();

        assert_eq!(message.poll.as_ref().unwrap().total_votes(), 2);
    }

    #[test]
    fn test_vote_out_of_range() {
        let mut message = poll_message();
        let err = message.vote(7, "u2").unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "answer", .. }));
    }

    #[test]
    fn test_vote_without_poll() {
        let mut message = Message::new("ch1", "u1", "no poll here", sent_at());
        assert!(message.vote(0, "u2").is_err());
        assert!(message.unvote(0, "u2").is_err());
    }

    #[test]
    fn test_unvote() {
        let mut message = poll_message();
        message.vote(1, "u2").unwrap();

        assert_eq!(message.unvote(1, "u2"), Ok(true));
        assert_eq!(message.unvote(1, "u2"), Ok(false));
    }

    #[test]
    fn test_blackboard_publish_stamps_time() {
        let mut post = Blackboard::new("Sports day", "u1");
        post.set_state("published", sent_at()).unwrap();

        assert_eq!(post.state, BlackboardState::Published);
        assert_eq!(post.published_at, Some(sent_at()));
        assert!(post.set_state("deleted", sent_at()).is_err());
    }

    #[test]
    fn test_direct_chat_participants() {
        let chat = Chat::direct("u1", "u2");
        assert_eq!(chat.kind, ChatKind::Direct);
        assert!(chat.is_participant("u2"));
        assert!(!chat.is_participant("u3"));
    }
}
