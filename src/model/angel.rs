use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fields an angel document can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Attribute {
    Id,
    Sex,
    Age,
    ShoeSize,
    ClothesSize,
    ShirtSize,
    PantSize,
    Wish,
    Book,
    Special,
    Status,
    Missing,
    Location,
}

impl Attribute {
    pub const ALL: [Attribute; 13] = [
        Attribute::Id,
        Attribute::Sex,
        Attribute::Age,
        Attribute::ShoeSize,
        Attribute::ClothesSize,
        Attribute::ShirtSize,
        Attribute::PantSize,
        Attribute::Wish,
        Attribute::Book,
        Attribute::Special,
        Attribute::Status,
        Attribute::Missing,
        Attribute::Location,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::Id => "ID",
            Attribute::Sex => "SEX",
            Attribute::Age => "AGE",
            Attribute::ShoeSize => "SHOE_SIZE",
            Attribute::ClothesSize => "CLOTHES_SIZE",
            Attribute::ShirtSize => "SHIRT_SIZE",
            Attribute::PantSize => "PANT_SIZE",
            Attribute::Wish => "WISH",
            Attribute::Book => "BOOK",
            Attribute::Special => "SPECIAL",
            Attribute::Status => "STATUS",
            Attribute::Missing => "MISSING",
            Attribute::Location => "LOCATION",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(['-', ' '], "_").to_ascii_uppercase();
        Attribute::ALL
            .into_iter()
            .find(|attribute| attribute.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownAttribute(s.to_string()))
    }
}

/// Progress of an angel through distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    NotStarted,
    Awaiting,
    Hold,
    Complete,
    Pull,
    Out,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::NotStarted,
        Status::Awaiting,
        Status::Hold,
        Status::Complete,
        Status::Pull,
        Status::Out,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::NotStarted => "NOT_STARTED",
            Status::Awaiting => "AWAITING",
            Status::Hold => "HOLD",
            Status::Complete => "COMPLETE",
            Status::Pull => "PULL",
            Status::Out => "OUT",
        }
    }

    /// Whether an angel may move from `self` to `next`.
    ///
    /// Every item must be off hold before an angel can be completed.
    pub fn check_transition(self, next: Status) -> Result<(), ModelError> {
        match (self, next) {
            (Status::Hold, Status::Complete) => Err(ModelError::HoldBlocksComplete),
            _ => Ok(()),
        }
    }

    /// Angels marked for pulling must be confirmed before any change.
    pub fn requires_confirmation(self) -> bool {
        self == Status::Pull
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(['-', ' '], "_").to_ascii_uppercase();
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),

    #[error("unknown status '{0}'")]
    UnknownStatus(String),

    #[error("angel document has no ID")]
    MissingId,

    #[error("angel is on hold; clear the hold before marking it complete")]
    HoldBlocksComplete,
}

/// One gift recipient, stored as a flat attribute document.
///
/// Ids are a numeric family number followed by a member letter (`12A`,
/// `12B`), so every angel of a family shares the id minus its last char.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Attribute, String>",
    into = "BTreeMap<Attribute, String>"
)]
pub struct Angel {
    attributes: BTreeMap<Attribute, String>,
}

impl Angel {
    /// A new angel that has not started distribution.
    pub fn new(id: impl Into<String>) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(Attribute::Id, id.into());
        attributes.insert(Attribute::Status, Status::NotStarted.to_string());
        Self { attributes }
    }

    pub fn with(mut self, attribute: Attribute, value: impl Into<String>) -> Self {
        self.set(attribute, value);
        self
    }

    pub fn id(&self) -> &str {
        self.attributes
            .get(&Attribute::Id)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// The id without its member letter.
    pub fn family(&self) -> &str {
        let id = self.id();
        match id.char_indices().last() {
            Some((last, _)) => &id[..last],
            None => id,
        }
    }

    pub fn get(&self, attribute: Attribute) -> Option<&str> {
        self.attributes.get(&attribute).map(String::as_str)
    }

    /// Set an attribute. The id is fixed once created and is left untouched.
    pub fn set(&mut self, attribute: Attribute, value: impl Into<String>) {
        if attribute != Attribute::Id {
            self.attributes.insert(attribute, value.into());
        }
    }

    pub fn status(&self) -> Option<Status> {
        self.get(Attribute::Status)?.parse().ok()
    }

    pub fn attributes(&self) -> impl Iterator<Item = (Attribute, &str)> {
        self.attributes
            .iter()
            .map(|(attribute, value)| (*attribute, value.as_str()))
    }

    /// Entries of a list attribute such as `WISH`, `BOOK`, `SPECIAL` or
    /// `MISSING`.
    pub fn items(&self, attribute: Attribute) -> Vec<String> {
        self.get(attribute).map(split_items).unwrap_or_default()
    }

    /// What still has to be found before a held angel can be completed.
    pub fn missing(&self) -> Vec<String> {
        self.items(Attribute::Missing)
    }
}

/// List attributes are stored as one value with `;` between entries.
pub const ITEM_SEPARATOR: &str = ";";

pub fn split_items(value: &str) -> Vec<String> {
    value
        .split(ITEM_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_items<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| item.as_ref().trim())
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(ITEM_SEPARATOR)
}

impl TryFrom<BTreeMap<Attribute, String>> for Angel {
    type Error = ModelError;

    fn try_from(attributes: BTreeMap<Attribute, String>) -> Result<Self, Self::Error> {
        match attributes.get(&Attribute::Id) {
            Some(id) if !id.trim().is_empty() => Ok(Self { attributes }),
            _ => Err(ModelError::MissingId),
        }
    }
}

impl From<Angel> for BTreeMap<Attribute, String> {
    fn from(angel: Angel) -> Self {
        angel.attributes
    }
}

/// Order ids numerically: a longer id is the larger one, equal lengths
/// compare character by character. Assumes no leading zeros.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Ord for Angel {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_ids(self.id(), other.id())
    }
}

impl PartialOrd for Angel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
