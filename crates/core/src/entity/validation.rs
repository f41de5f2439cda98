//! Pure validation functions, run at the create/update boundary.

use super::academics::{Class, Course, Grade, Subject};
use super::activities::{Club, Event, EventTicket};
use super::error::ValidationError;
use super::messaging::{Blackboard, Chat, ChatKind, Message};
use super::people::{School, SetupAccount, User};
use super::reference::Ref;
use super::traits::Entity;

const MAX_NAME_LENGTH: usize = 100;
const MAX_TITLE_LENGTH: usize = 200;
const MAX_MESSAGE_LENGTH: usize = 4000;

fn require(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn require_email(field: &'static str, email: &str) -> Result<(), ValidationError> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(ValidationError::invalid(field, email));
    }
    Ok(())
}

fn require_reference<T: Entity>(field: &'static str, reference: &Ref<T>) -> Result<(), ValidationError> {
    match reference.id() {
        Some(id) if !id.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::Empty { field }),
    }
}

fn require_references<T: Entity>(
    field: &'static str,
    references: &[Ref<T>],
) -> Result<(), ValidationError> {
    references
        .iter()
        .try_for_each(|reference| require_reference(field, reference))
}

pub fn validate_school(school: &School) -> Result<(), ValidationError> {
    require("name", &school.name, MAX_NAME_LENGTH)
}

pub fn validate_user(user: &User) -> Result<(), ValidationError> {
    require("firstName", &user.first_name, MAX_NAME_LENGTH)?;
    if user.last_name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "lastName",
            max: MAX_NAME_LENGTH,
        });
    }
    if let Some(email) = &user.email {
        require_email("email", email)?;
    }
    if let Some(school) = &user.school {
        require_reference("school", school)?;
    }
    require_references("classes", &user.classes)
}

pub fn validate_setup_account(account: &SetupAccount) -> Result<(), ValidationError> {
    require("firstName", &account.first_name, MAX_NAME_LENGTH)?;
    require_email("email", &account.email)?;
    require_reference("school", &account.school)
}

pub fn validate_class(class: &Class) -> Result<(), ValidationError> {
    require("name", &class.name, MAX_NAME_LENGTH)?;
    if !(1..=13).contains(&class.grade_level) {
        return Err(ValidationError::OutOfRange {
            field: "gradeLevel",
            value: class.grade_level.to_string(),
        });
    }
    require_references("teachers", &class.teachers)?;
    require_references("students", &class.students)
}

pub fn validate_subject(subject: &Subject) -> Result<(), ValidationError> {
    require("name", &subject.name, MAX_NAME_LENGTH)
}

pub fn validate_course(course: &Course) -> Result<(), ValidationError> {
    require("name", &course.name, MAX_NAME_LENGTH)?;
    require_reference("subject", &course.subject)?;
    require_reference("class", &course.school_class)?;
    require_references("teachers", &course.teachers)
}

pub fn validate_grade(grade: &Grade) -> Result<(), ValidationError> {
    if !(Grade::MIN_VALUE..=Grade::MAX_VALUE).contains(&grade.value) {
        return Err(ValidationError::OutOfRange {
            field: "value",
            value: grade.value.to_string(),
        });
    }
    if grade.weight.is_nan() || grade.weight <= 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "weight",
            value: grade.weight.to_string(),
        });
    }
    require_reference("student", &grade.student)?;
    require_reference("course", &grade.course)
}

pub fn validate_blackboard(post: &Blackboard) -> Result<(), ValidationError> {
    require("title", &post.title, MAX_TITLE_LENGTH)?;
    if post.tags.iter().any(|tag| tag.trim().is_empty()) {
        return Err(ValidationError::Empty { field: "tags" });
    }
    require_reference("author", &post.author)
}

pub fn validate_club(club: &Club) -> Result<(), ValidationError> {
    require("name", &club.name, MAX_NAME_LENGTH)?;
    require_references("leaders", &club.leaders)?;
    require_references("members", &club.members)
}

pub fn validate_event(event: &Event) -> Result<(), ValidationError> {
    require("title", &event.title, MAX_TITLE_LENGTH)?;
    if event.ends_at < event.starts_at {
        return Err(ValidationError::invalid(
            "endsAt",
            "end must be after or equal to start",
        ));
    }
    require_reference("host", &event.host)?;
    require_references("attendees", &event.attendees)
}

pub fn validate_event_ticket(ticket: &EventTicket) -> Result<(), ValidationError> {
    require_reference("event", &ticket.event)?;
    require_reference("holder", &ticket.holder)
}

pub fn validate_chat(chat: &Chat) -> Result<(), ValidationError> {
    if chat.kind == ChatKind::Direct && chat.participants.len() != 2 {
        return Err(ValidationError::invalid(
            "participants",
            format!("direct chats need 2 participants, got {}", chat.participants.len()),
        ));
    }
    if let Some(name) = &chat.name {
        require("name", name, MAX_NAME_LENGTH)?;
    }
    require_references("participants", &chat.participants)?;
    require_references("messages", &chat.messages)
}

pub fn validate_message(message: &Message) -> Result<(), ValidationError> {
    if message.chat.trim().is_empty() {
        return Err(ValidationError::Empty { field: "chat" });
    }
    require_reference("sender", &message.sender)?;
    match &message.poll {
        Some(poll) => {
            require("poll.question", &poll.question, MAX_TITLE_LENGTH)?;
            if poll.answers.is_empty() {
                return Err(ValidationError::Empty {
                    field: "poll.answers",
                });
            }
            if poll.answers.iter().any(|a| a.text.trim().is_empty()) {
                return Err(ValidationError::Empty {
                    field: "poll.answers",
                });
            }
        }
        None => require("text", &message.text, MAX_MESSAGE_LENGTH)?,
    }
    if message.text.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "text",
            max: MAX_MESSAGE_LENGTH,
        });
    }
    Ok(())
}
