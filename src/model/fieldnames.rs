use crate::model::cell::ReservedColumn;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

/// The reason a header row was rejected.
#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct HeaderError(String);

impl Display for HeaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl StdError for HeaderError {}

/// The ordered, duplicate-free column names of a ledger. The first two are always `Description`
/// and `Date`; the rest are contributors in the order they joined.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Fieldnames {
    headers: Vec<String>,
    header_map: HashMap<String, usize>,
}

impl Default for Fieldnames {
    fn default() -> Self {
        let headers: Vec<String> = ReservedColumn::ALL
            .iter()
            .map(|c| c.as_header_str().to_string())
            .collect();
        let header_map = index(&headers);
        Self {
            headers,
            header_map,
        }
    }
}

impl Fieldnames {
    /// Validates a header row read from a backing file.
    pub fn new<S, I>(headers: I) -> Result<Self, HeaderError>
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        let headers: Vec<String> = headers.into_iter().map(|s| s.into()).collect();

        for (ix, reserved) in ReservedColumn::ALL.iter().enumerate() {
            let name = reserved.as_header_str();
            match headers.iter().position(|h| h == name) {
                None => return Err(HeaderError(format!("missing column '{name}'"))),
                Some(found) if found != ix => {
                    return Err(HeaderError(format!(
                        "column '{name}' is at position {}, expected {}",
                        found + 1,
                        ix + 1
                    )))
                }
                Some(_) => {}
            }
        }

        let header_map = index(&headers);
        if header_map.len() != headers.len() {
            return Err(HeaderError(String::from("encountered a duplicate column")));
        }

        Ok(Self {
            headers,
            header_map,
        })
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.header_map.contains_key(name.as_ref())
    }

    pub fn index_of(&self, name: impl AsRef<str>) -> Option<usize> {
        self.header_map.get(name.as_ref()).copied()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The contributor columns, i.e. everything after `Description` and `Date`.
    pub fn contributors(&self) -> &[String] {
        &self.headers[ReservedColumn::ALL.len()..]
    }

    /// Appends a column. Returns `false` if it was already present.
    pub(crate) fn push(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.header_map.insert(name.clone(), self.headers.len());
        self.headers.push(name);
        true
    }
}

fn index(headers: &[String]) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(ix, h)| (h.to_owned(), ix))
        .collect()
}

impl Serialize for Fieldnames {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.headers.len()))?;
        for header in &self.headers {
            seq.serialize_element(header)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let f = Fieldnames::default();
        assert_eq!(f.headers(), ["Description", "Date"]);
        assert!(f.contributors().is_empty());
    }

    #[test]
    fn test_new() {
        let f = Fieldnames::new(["Description", "Date", "Alice", "Bob"]).unwrap();
        assert_eq!(f.len(), 4);
        assert_eq!(f.contributors(), ["Alice", "Bob"]);
        assert_eq!(f.index_of("Bob"), Some(3));
    }

    #[test]
    fn test_new_missing_reserved() {
        let err = Fieldnames::new(["Foo", "Bar"]).unwrap_err();
        assert_eq!(err.to_string(), "missing column 'Description'");
        assert!(Fieldnames::new(["Description", "Alice"]).is_err());
    }

    #[test]
    fn test_new_reserved_out_of_order() {
        assert!(Fieldnames::new(["Date", "Description", "Alice"]).is_err());
        assert!(Fieldnames::new(["Alice", "Description", "Date"]).is_err());
    }

    #[test]
    fn test_new_duplicate() {
        let err = Fieldnames::new(["Description", "Date", "Alice", "Alice"]).unwrap_err();
        assert_eq!(err.to_string(), "encountered a duplicate column");
    }

    #[test]
    fn test_push() {
        let mut f = Fieldnames::default();
        assert!(f.push("Alice"));
        assert!(!f.push("Alice"));
        assert!(!f.push("Date"));
        assert_eq!(f.headers(), ["Description", "Date", "Alice"]);
    }

    #[test]
    fn test_serialize() {
        let f = Fieldnames::new(["Description", "Date", "Alice"]).unwrap();
        assert_eq!(
            serde_json::to_string(&f).unwrap(),
            r#"["Description","Date","Alice"]"#
        );
    }
}
