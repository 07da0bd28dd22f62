//! Bibliographic record and its column set

use std::fmt;

use crate::normalize::normalize_opt;

/// One column of the corpus table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Authors,
    Date,
    Doi,
    Keywords,
    Abstract,
    Journal,
    /// PubMed ID, the one identifier accepted besides DOI
    SecondaryId,
    /// Provenance tag (source database name)
    Database,
}

impl Field {
    /// All fields in table column order.
    pub const ALL: [Field; 9] = [
        Self::Title,
        Self::Authors,
        Self::Date,
        Self::Doi,
        Self::Keywords,
        Self::Abstract,
        Self::Journal,
        Self::SecondaryId,
        Self::Database,
    ];

    /// Column header in the tab-delimited corpus table
    pub fn header(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Authors => "Authors",
            Self::Date => "Date",
            Self::Doi => "DOI",
            Self::Keywords => "Keywords",
            Self::Abstract => "Abstract",
            Self::Journal => "Journal",
            Self::SecondaryId => "PubMed ID",
            Self::Database => "Database",
        }
    }

    /// Parse a header, accepting the underscore spelling of the PubMed column.
    pub fn from_header(name: &str) -> Option<Self> {
        let name = name.trim();
        if name == "PubMed_ID" {
            return Some(Self::SecondaryId);
        }
        Self::ALL.into_iter().find(|f| f.header() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// One bibliographic entry.
///
/// Every field is optional: a blank value and an absent one are the same
/// thing ("missing"). Use [`Record::set`] to keep blanks out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Record {
    pub title: Option<String>,
    /// "Firstname Lastname" entries joined by commas
    pub authors: Option<String>,
    /// Free text, not guaranteed parseable
    pub date: Option<String>,
    pub doi: Option<String>,
    pub keywords: Option<String>,
    pub abstract_text: Option<String>,
    pub journal: Option<String>,
    pub secondary_id: Option<String>,
    pub database: Option<String>,
}

impl Record {
    pub fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Title => &self.title,
            Field::Authors => &self.authors,
            Field::Date => &self.date,
            Field::Doi => &self.doi,
            Field::Keywords => &self.keywords,
            Field::Abstract => &self.abstract_text,
            Field::Journal => &self.journal,
            Field::SecondaryId => &self.secondary_id,
            Field::Database => &self.database,
        }
    }

    pub fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Authors => &mut self.authors,
            Field::Date => &mut self.date,
            Field::Doi => &mut self.doi,
            Field::Keywords => &mut self.keywords,
            Field::Abstract => &mut self.abstract_text,
            Field::Journal => &mut self.journal,
            Field::SecondaryId => &mut self.secondary_id,
            Field::Database => &mut self.database,
        }
    }

    /// Non-blank value of `field`
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field)
            .as_deref()
            .filter(|v| !v.trim().is_empty())
    }

    /// Store `value`, or clear the field if it is blank.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        *self.slot_mut(field) = (!value.trim().is_empty()).then_some(value);
    }

    /// Builder form of [`Record::set`]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn is_missing(&self, field: Field) -> bool {
        self.get(field).is_none()
    }

    /// Graph/dedup key: normalized DOI, else normalized PubMed ID.
    pub fn identifier(&self) -> Option<String> {
        normalize_opt(self.get(Field::Doi)).or_else(|| normalize_opt(self.get(Field::SecondaryId)))
    }

    /// Author names in order
    pub fn author_list(&self) -> Vec<&str> {
        self.get(Field::Authors)
            .map(|a| a.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_header(field.header()), Some(field));
        }
        assert_eq!(Field::from_header("PubMed_ID"), Some(Field::SecondaryId));
        assert_eq!(Field::from_header("Year"), None);
    }

    #[test]
    fn blank_values_are_missing() {
        let mut r = Record::default().with(Field::Title, "Motor learning");
        r.set(Field::Abstract, "   ");
        assert!(r.is_missing(Field::Abstract));
        assert_eq!(r.abstract_text, None);
        assert_eq!(r.get(Field::Title), Some("Motor learning"));

        // Blank written directly into the struct is still missing
        r.journal = Some(String::new());
        assert!(r.is_missing(Field::Journal));
    }

    #[test]
    fn identifier_prefers_doi() {
        let r = Record::default()
            .with(Field::Doi, "10.1/ABC")
            .with(Field::SecondaryId, "12345");
        assert_eq!(r.identifier().as_deref(), Some("10.1/abc"));

        let r = Record::default().with(Field::SecondaryId, " 12345 ");
        assert_eq!(r.identifier().as_deref(), Some("12345"));

        assert_eq!(Record::default().identifier(), None);
    }

    #[test]
    fn author_list_splits_on_commas() {
        let r = Record::default().with(Field::Authors, "Ada Lovelace, Charles Babbage,");
        assert_eq!(r.author_list(), vec!["Ada Lovelace", "Charles Babbage"]);
    }
}
