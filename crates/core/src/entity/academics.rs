use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::fields::blank_as_none;
use super::kind::EntityKind;
use super::people::User;
use super::reference::{Ref, RelationPath};
use super::traits::Entity;
use super::validation::{validate_class, validate_course, validate_grade, validate_subject};

/// A school class (homeroom) with its teachers and students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub grade_level: u8,
    #[serde(default)]
    pub teachers: Vec<Ref<User>>,
    #[serde(default)]
    pub students: Vec<Ref<User>>,
}

impl Class {
    pub fn new(name: impl Into<String>, grade_level: u8) -> Self {
        Self {
            id: None,
            name: name.into(),
            grade_level,
            teachers: Vec::new(),
            students: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_teacher(mut self, user_id: impl Into<String>) -> Self {
        self.teachers.push(Ref::Id(user_id.into()));
        self
    }

    pub fn with_student(mut self, user_id: impl Into<String>) -> Self {
        self.students.push(Ref::Id(user_id.into()));
        self
    }
}

impl Entity for Class {
    const KIND: EntityKind = EntityKind::Class;
    const RELATIONS: &'static [RelationPath] = &[
        RelationPath::new("teachers", EntityKind::User),
        RelationPath::new("students", EntityKind::User),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_class(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub short_name: Option<String>,
    /// Accent color (CSS color value).
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<String>,
}

impl Subject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            short_name: None,
            color: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl Entity for Subject {
    const KIND: EntityKind = EntityKind::Subject;
    const RELATIONS: &'static [RelationPath] = &[];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_subject(self)
    }
}

/// A subject taught to one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub subject: Ref<Subject>,
    #[serde(rename = "class")]
    pub school_class: Ref<Class>,
    #[serde(default)]
    pub teachers: Vec<Ref<User>>,
}

impl Course {
    pub fn new(
        name: impl Into<String>,
        subject_id: impl Into<String>,
        class_id: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            subject: Ref::Id(subject_id.into()),
            school_class: Ref::Id(class_id.into()),
            teachers: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_teacher(mut self, user_id: impl Into<String>) -> Self {
        self.teachers.push(Ref::Id(user_id.into()));
        self
    }
}

impl Entity for Course {
    const KIND: EntityKind = EntityKind::Course;
    const RELATIONS: &'static [RelationPath] = &[
        RelationPath::new("subject", EntityKind::Subject),
        RelationPath::new("class", EntityKind::Class),
        RelationPath::new("teachers", EntityKind::User),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_course(self)
    }
}

const GRADE_COURSE_RELATIONS: &[RelationPath] =
    &[RelationPath::new("subject", EntityKind::Subject)];

fn default_weight() -> f32 {
    1.0
}

/// A mark a student received in a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub value: f32,
    #[serde(default = "default_weight")]
    pub weight: f32,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    pub issued_on: NaiveDate,
    pub student: Ref<User>,
    pub course: Ref<Course>,
}

impl Grade {
    /// Lowest and highest mark on the grading scale.
    pub const MIN_VALUE: f32 = 1.0;
    pub const MAX_VALUE: f32 = 6.0;

    pub fn new(
        value: f32,
        issued_on: NaiveDate,
        student_id: impl Into<String>,
        course_id: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            value,
            weight: default_weight(),
            description: None,
            issued_on,
            student: Ref::Id(student_id.into()),
            course: Ref::Id(course_id.into()),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Entity for Grade {
    const KIND: EntityKind = EntityKind::Grade;
    const RELATIONS: &'static [RelationPath] = &[
        RelationPath::new("student", EntityKind::User),
        RelationPath::new("course", EntityKind::Course).with_nested(GRADE_COURSE_RELATIONS),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_grade(self)
    }
}

/// Weighted average of a set of grades, `None` when there is nothing to average.
pub fn weighted_average(grades: &[Grade]) -> Option<f32> {
    let total_weight: f32 = grades.iter().map(|g| g.weight).sum();
    if grades.is_empty() || total_weight <= 0.0 {
        return None;
    }
    let sum: f32 = grades.iter().map(|g| g.value * g.weight).sum();
    Some(sum / total_weight)
}
