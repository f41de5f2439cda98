use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::academics::Class;
use super::error::ValidationError;
use super::fields::{blank_as_none, lenient_date};
use super::kind::EntityKind;
use super::reference::{Ref, RelationPath};
use super::traits::Entity;
use super::validation::{validate_school, validate_setup_account, validate_user};

/// The role a person has within a school.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Teacher,
    Parent,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Teacher => "teacher",
            UserRole::Parent => "parent",
            UserRole::Admin => "admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(UserRole::Student),
            "teacher" => Ok(UserRole::Teacher),
            "parent" => Ok(UserRole::Parent),
            "admin" => Ok(UserRole::Admin),
            other => Err(ValidationError::invalid("role", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<String>,
    /// Free-form school settings.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl School {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            address: None,
            details: serde_json::Value::Null,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets a specific ID for this school (useful for seeding and tests).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl Entity for School {
    const KIND: EntityKind = EntityKind::School;
    const RELATIONS: &'static [RelationPath] = &[];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_school(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub birthday: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<Ref<School>>,
    #[serde(default)]
    pub classes: Vec<Ref<Class>>,
}

impl User {
    pub fn new(first_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: String::new(),
            email: None,
            role: UserRole::default(),
            birthday: None,
            school: None,
            classes: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = last_name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_birthday(mut self, birthday: NaiveDate) -> Self {
        self.birthday = Some(birthday);
        self
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_school(mut self, school_id: impl Into<String>) -> Self {
        self.school = Some(Ref::Id(school_id.into()));
        self
    }

    pub fn with_class(mut self, class_id: impl Into<String>) -> Self {
        self.classes.push(Ref::Id(class_id.into()));
        self
    }

    /// Display name, "First Last" or just the first name.
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    /// Parses and assigns a role, rejecting values outside the declared set.
    pub fn set_role(&mut self, role: &str) -> Result<(), ValidationError> {
        self.role = role.parse()?;
        Ok(())
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;
    const RELATIONS: &'static [RelationPath] = &[
        RelationPath::new("school", EntityKind::School),
        RelationPath::new("classes", EntityKind::Class),
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_user(self)
    }
}

/// A pending account invitation, completed by the invitee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    pub school: Ref<School>,
    pub expires_at: DateTime<Utc>,
}

impl SetupAccount {
    pub fn new(
        first_name: impl Into<String>,
        email: impl Into<String>,
        school_id: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: String::new(),
            email: email.into(),
            role: UserRole::default(),
            school: Ref::Id(school_id.into()),
            expires_at,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns true once the invitation can no longer be completed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl Entity for SetupAccount {
    const KIND: EntityKind = EntityKind::SetupAccount;
    const RELATIONS: &'static [RelationPath] = &[RelationPath::new("school", EntityKind::School)];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_setup_account(self)
    }
}
