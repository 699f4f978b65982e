//! Person records as supplied by the data source.
//!
//! A person carries:
//! - A stable unique identifier
//! - Display strings (names, dates, gender, photo)
//! - Relationship edges: partners (ordered, first is primary), children and
//!   optionally parents

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable person identifier.
///
/// Mirrors the id of the upstream record. Wraps a `String` so the ids the
/// renderer hands back (clicks, search matches) need no translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub String);

impl PersonId {
    /// Create a new PersonId.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw string value.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for PersonId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<PersonId> for String {
    #[inline]
    fn from(id: PersonId) -> Self {
        id.0
    }
}

/// Kind of relationship a reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    Partner,
    Child,
    Parent,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Partner => "partner",
            Self::Child => "child",
            Self::Parent => "parent",
        })
    }
}

/// One person record.
///
/// Read-only from the chart's point of view. Unknown JSON keys are ignored
/// and `null` optional values are treated as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maiden_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Ordered partners; the first one is displayed next to the person.
    #[serde(default, alias = "partnerId")]
    pub partner_ids: Vec<PersonId>,
    #[serde(default)]
    pub children_ids: Vec<PersonId>,
    #[serde(default)]
    pub parents_ids: Vec<PersonId>,
}

impl Person {
    /// Create a record with only an id and names set.
    pub fn new(id: impl Into<PersonId>, first_name: &str, last_name: &str) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            maiden_name: None,
            birth_date: None,
            death_date: None,
            gender: None,
            photo: None,
            partner_ids: Vec::new(),
            children_ids: Vec::new(),
            parents_ids: Vec::new(),
        }
    }

    /// Builder: append partners.
    pub fn with_partners<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PersonId>,
    {
        self.partner_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Builder: append children.
    pub fn with_children<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PersonId>,
    {
        self.children_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Builder: append declared parents.
    pub fn with_parents<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PersonId>,
    {
        self.parents_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// The partner displayed next to this person, if any.
    #[inline]
    pub fn primary_partner_id(&self) -> Option<&PersonId> {
        self.partner_ids.first()
    }

    /// A missing death date means the person is alive.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.death_date.is_none()
    }

    /// "First Last", trimmed when either part is empty.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    /// Uppercase first letters of first and last name.
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .next()
            .into_iter()
            .chain(self.last_name.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    #[inline]
    pub fn has_child(&self, id: &PersonId) -> bool {
        self.children_ids.contains(id)
    }
}

/// Parse a JSON array of person records.
pub fn parse_people(json: &str) -> crate::Result<Vec<Person>> {
    Ok(serde_json::from_str(json)?)
}
