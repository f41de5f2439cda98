use chrono::{Duration, Utc};

use schoolhub_core::entity::{
    Blackboard, Chat, Class, Club, ClubState, Course, Entity, Event, EventState, EventTicket,
    Grade, Message, Poll, School, SetupAccount, Subject, User, UserRole,
};
use schoolhub_core::storage::{to_document, DocumentStore, StoreError};

/// Inserts a small demo school into `store`.
///
/// Dates are spread around the current day. Ids are fixed and readable
/// (`u-ada`, `class-5a`, ...) so the records can be looked up by hand.
pub async fn seed_demo_school<S>(store: &S) -> Result<(), StoreError>
where
    S: DocumentStore + ?Sized,
{
    let now = Utc::now();
    let today = now.date_naive();
    let school = "school-riverside";

    insert(
        store,
        School::new("Riverside Elementary")
            .with_id(school)
            .with_address("12 River Road"),
    )
    .await?;

    // People
    insert(
        store,
        User::new("Grace")
            .with_id("u-grace")
            .with_last_name("Hopper")
            .with_email("grace@riverside.example")
            .with_role(UserRole::Teacher)
            .with_school(school)
            .with_class("class-5a"),
    )
    .await?;
    insert(
        store,
        User::new("Alan")
            .with_id("u-alan")
            .with_last_name("Turing")
            .with_email("alan@riverside.example")
            .with_role(UserRole::Teacher)
            .with_school(school)
            .with_class("class-5b"),
    )
    .await?;
    for (id, first, last, class) in [
        ("u-ada", "Ada", "Lovelace", "class-5a"),
        ("u-charles", "Charles", "Babbage", "class-5a"),
        ("u-edsger", "Edsger", "Dijkstra", "class-5b"),
        ("u-barbara", "Barbara", "Liskov", "class-5b"),
    ] {
        insert(
            store,
            User::new(first)
                .with_id(id)
                .with_last_name(last)
                .with_birthday(today - Duration::days(11 * 365))
                .with_school(school)
                .with_class(class),
        )
        .await?;
    }
    insert(
        store,
        SetupAccount::new(
            "Margaret",
            "margaret@riverside.example",
            school,
            now + Duration::days(7),
        )
        .with_id("setup-margaret"),
    )
    .await?;

    // Classes and courses
    insert(
        store,
        Class::new("5a", 5)
            .with_id("class-5a")
            .with_teacher("u-grace")
            .with_student("u-ada")
            .with_student("u-charles"),
    )
    .await?;
    insert(
        store,
        Class::new("5b", 5)
            .with_id("class-5b")
            .with_teacher("u-alan")
            .with_student("u-edsger")
            .with_student("u-barbara"),
    )
    .await?;
    insert(
        store,
        Subject::new("Mathematics")
            .with_id("subject-math")
            .with_short_name("MA")
            .with_color("#3B82F6"),
    )
    .await?;
    insert(
        store,
        Subject::new("English")
            .with_id("subject-english")
            .with_short_name("EN")
            .with_color("#F59E0B"),
    )
    .await?;
    insert(
        store,
        Course::new("Mathematics 5a", "subject-math", "class-5a")
            .with_id("course-math-5a")
            .with_teacher("u-grace"),
    )
    .await?;
    insert(
        store,
        Course::new("English 5b", "subject-english", "class-5b")
            .with_id("course-english-5b")
            .with_teacher("u-alan"),
    )
    .await?;

    // Grades
    for (id, value, student, course, days_ago) in [
        ("grade-1", 1.5, "u-ada", "course-math-5a", 14),
        ("grade-2", 2.0, "u-charles", "course-math-5a", 14),
        ("grade-3", 2.5, "u-edsger", "course-english-5b", 7),
        ("grade-4", 1.0, "u-barbara", "course-english-5b", 7),
    ] {
        insert(
            store,
            Grade::new(value, today - Duration::days(days_ago), student, course)
                .with_id(id)
                .with_description("Written test"),
        )
        .await?;
    }

    // Activities
    let mut chess = Club::new("Chess Club")
        .with_id("club-chess")
        .with_description("Tuesdays after lunch in room 4")
        .with_leader("u-ada")
        .with_member("u-charles")
        .with_member("u-edsger");
    chess.state = ClubState::Approved;
    insert(store, chess).await?;
    insert(
        store,
        Club::new("Robotics")
            .with_id("club-robotics")
            .with_leader("u-barbara"),
    )
    .await?;

    let fair_start = now + Duration::days(10);
    let mut fair = Event::new(
        "Science Fair",
        "u-grace",
        fair_start,
        fair_start + Duration::hours(4),
    )
    .with_id("event-science-fair")
    .with_location("Main hall")
    .with_attendee("u-ada")
    .with_attendee("u-edsger");
    fair.state = EventState::Approved;
    insert(store, fair).await?;
    for (id, holder) in [("ticket-ada", "u-ada"), ("ticket-edsger", "u-edsger")] {
        insert(
            store,
            EventTicket::new("event-science-fair", holder, now).with_id(id),
        )
        .await?;
    }

    // Communication
    insert(
        store,
        Blackboard::new("Parents' evening", "u-grace")
            .with_id("post-parents-evening")
            .with_body("Thursday at 6pm in the main hall.")
            .with_tag("events"),
    )
    .await?;
    insert(
        store,
        Message::new(
            "chat-5a",
            "u-grace",
            "Remember your calculators tomorrow!",
            now - Duration::hours(3),
        )
        .with_id("msg-calculators"),
    )
    .await?;
    insert(
        store,
        Message::new("chat-5a", "u-ada", "Trip destination?", now - Duration::hours(2))
            .with_id("msg-trip-poll")
            .with_poll(Poll::new("Where should we go?", ["Museum", "Zoo", "Planetarium"])),
    )
    .await?;
    insert(
        store,
        Chat::group("Class 5a")
            .with_id("chat-5a")
            .with_participant("u-grace")
            .with_participant("u-ada")
            .with_participant("u-charles")
            .with_message("msg-calculators")
            .with_message("msg-trip-poll"),
    )
    .await?;
    insert(
        store,
        Chat::direct("u-alan", "u-barbara").with_id("chat-alan-barbara"),
    )
    .await?;

    Ok(())
}

async fn insert<S, E>(store: &S, record: E) -> Result<(), StoreError>
where
    S: DocumentStore + ?Sized,
    E: Entity,
{
    let document = to_document(&record)?;
    store
        .create_document(E::KIND, document)
        .await?
        .ok_or_else(|| {
            StoreError::QueryFailed(format!(
                "{} {} was rejected",
                E::KIND,
                record.id().unwrap_or("(new)")
            ))
        })?;
    Ok(())
}
