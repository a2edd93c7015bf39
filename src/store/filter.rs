use crate::model::{Angel, Attribute, Status};

/// Selection criteria for [`RecordStore::query`](super::RecordStore::query).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criteria {
    All,

    /// Every member of a family: the prefix followed by exactly one char.
    IdFamily(String),

    /// Case-insensitive substring match on one attribute. An exact search on
    /// the id matches the whole family instead.
    Keyword {
        attribute: Attribute,
        needle: String,
        exact: bool,
    },

    Status(Status),

    And(Vec<Criteria>),
}

impl Criteria {
    pub fn matches(&self, angel: &Angel) -> bool {
        match self {
            Criteria::All => true,
            Criteria::IdFamily(prefix) => is_family_member(angel.id(), prefix),
            Criteria::Keyword {
                attribute: Attribute::Id,
                needle,
                exact: true,
            } => is_family_member(angel.id(), needle.trim()),
            Criteria::Keyword {
                attribute,
                needle,
                exact,
            } => match angel.get(*attribute) {
                Some(value) if *exact => value.eq_ignore_ascii_case(needle.trim()),
                Some(value) => value
                    .to_lowercase()
                    .contains(&needle.trim().to_lowercase()),
                None => false,
            },
            Criteria::Status(status) => angel.status() == Some(*status),
            Criteria::And(all) => all.iter().all(|criteria| criteria.matches(angel)),
        }
    }
}

fn is_family_member(id: &str, prefix: &str) -> bool {
    !prefix.is_empty()
        && id
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.chars().count() == 1)
}

/// A query: criteria plus an optional cap on returned documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub criteria: Criteria,
    pub limit: Option<usize>,
}

impl Filter {
    pub fn all() -> Self {
        Criteria::All.into()
    }

    pub fn family(prefix: impl Into<String>) -> Self {
        Criteria::IdFamily(prefix.into()).into()
    }

    pub fn keyword(attribute: Attribute, needle: impl Into<String>, exact: bool) -> Self {
        Criteria::Keyword {
            attribute,
            needle: needle.into(),
            exact,
        }
        .into()
    }

    pub fn status(status: Status) -> Self {
        Criteria::Status(status).into()
    }

    /// Narrow this filter with further criteria.
    pub fn and(self, other: Criteria) -> Self {
        let criteria = match self.criteria {
            Criteria::And(mut all) => {
                all.push(other);
                Criteria::And(all)
            }
            Criteria::All => other,
            existing => Criteria::And(vec![existing, other]),
        };
        Self {
            criteria,
            limit: self.limit,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, angel: &Angel) -> bool {
        self.criteria.matches(angel)
    }
}

impl From<Criteria> for Filter {
    fn from(criteria: Criteria) -> Self {
        Self {
            criteria,
            limit: None,
        }
    }
}
