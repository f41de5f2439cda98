mod academics;
mod activities;
mod error;
mod fields;
mod kind;
mod messaging;
mod people;
mod reference;
mod traits;
mod validation;

pub use academics::{weighted_average, Class, Course, Grade, Subject};
pub use activities::{Club, ClubState, Event, EventState, EventTicket};
pub use error::ValidationError;
pub use kind::EntityKind;
pub use messaging::{
    Blackboard, BlackboardState, Chat, ChatKind, Message, Poll, PollAnswer, Reaction,
};
pub use people::{School, SetupAccount, User, UserRole};
pub use reference::{Ref, RelationPath};
pub use traits::Entity;
pub use validation::{
    validate_blackboard, validate_chat, validate_class, validate_club, validate_course,
    validate_event, validate_event_ticket, validate_grade, validate_message, validate_school,
    validate_setup_account, validate_subject, validate_user,
};
