//! Form submissions and the add/edit/delete actions they drive.
//!
//! This is the caller side of the record store: it turns submitted field
//! values into a [`Record`] shaped by the collection schema, then performs
//! the requested mutation and reports what happened.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::record::Record;
use crate::schema::Collection;
use crate::storage::RecordStore;

/// Raw field values as submitted by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    values: HashMap<String, String>,
}

impl FormData {
    /// Create an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a submitted value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    /// Get a submitted value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Parse `name=value` assignments into a form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAssignment`] if an assignment has no `=` or an
    /// empty name.
    pub fn from_assignments<I, S>(assignments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut form = Self::new();
        for assignment in assignments {
            let (name, value) = parse_assignment(assignment.as_ref())?;
            form.insert(name, value);
        }
        Ok(form)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = Self::new();
        for (field, value) in iter {
            form.insert(field, value);
        }
        form
    }
}

/// Split a `name=value` assignment. The value may itself contain `=`.
///
/// # Errors
///
/// Returns [`Error::InvalidAssignment`] if there is no `=` or the name is empty.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(Error::InvalidAssignment(raw.to_string())),
    }
}

/// Shape a submission into a record for `collection`.
///
/// Every schema field is taken from the form with surrounding whitespace
/// trimmed. Absent fields fall back to their default; fields the form has
/// but the schema doesn't are ignored.
///
/// # Errors
///
/// Returns [`Error::MissingField`] if a required field was not submitted.
pub fn build_record(collection: Collection, form: &FormData) -> Result<Record> {
    let mut record = Record::new();
    for field in collection.fields() {
        let value = match form.get(field.name) {
            Some(value) => value.trim(),
            None => field
                .default
                .fallback()
                .ok_or(Error::MissingField {
                    collection: collection.key(),
                    field: field.name,
                })?,
        };
        record.set(field.name, value);
    }
    Ok(record)
}

/// The mutation a submission asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Append a new record.
    Add,
    /// Replace the record at a position.
    Edit {
        /// Position as submitted; may be negative.
        index: i64,
    },
    /// Remove the record at a position.
    Delete {
        /// Position as submitted; may be negative.
        index: i64,
    },
}

impl Action {
    /// Build an action from its submitted name and optional index.
    ///
    /// A missing action name means `add`, matching the forms' default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIndex`] if `edit`/`delete` come without an
    /// integer index, and [`Error::UnknownAction`] for anything else.
    pub fn from_form(action: Option<&str>, index: Option<&str>) -> Result<Self> {
        let parse_index = || -> Result<i64> {
            let raw = index.unwrap_or("");
            raw.trim()
                .parse::<i64>()
                .map_err(|_| Error::invalid_index(raw))
        };

        match action.map_or("add", str::trim) {
            "add" => Ok(Self::Add),
            "edit" => Ok(Self::Edit {
                index: parse_index()?,
            }),
            "delete" => Ok(Self::Delete {
                index: parse_index()?,
            }),
            other => Err(Error::UnknownAction(other.to_string())),
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Self::Add => "added",
            Self::Edit { .. } => "updated",
            Self::Delete { .. } => "deleted",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Edit { index } => write!(f, "edit #{index}"),
            Self::Delete { index } => write!(f, "delete #{index}"),
        }
    }
}

impl FromStr for Action {
    type Err = Error;

    /// Parse `add`, `edit:<index>` or `delete:<index>`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((action, index)) => Self::from_form(Some(action), Some(index)),
            None => Self::from_form(Some(s), None),
        }
    }
}

/// What an action did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Whether the collection was changed.
    pub applied: bool,
    /// Confirmation text for the user.
    pub message: String,
}

/// Perform `action` on `collection` with the submitted `form`.
///
/// An edit or delete whose index does not name an existing record (including
/// negative indexes) changes nothing and returns an outcome with
/// `applied == false`.
///
/// # Errors
///
/// Returns an error if the form is missing a required field or the store
/// fails.
pub fn apply(
    store: &RecordStore,
    collection: Collection,
    action: Action,
    form: &FormData,
) -> Result<Outcome> {
    let key = collection.key();
    let schema = collection.schema();
    debug!("Applying {} to {}", action, key);

    let applied = match action {
        Action::Add => {
            let record = build_record(collection, form)?;
            store.append(key, &record, &schema)?;
            true
        }
        Action::Edit { index } => {
            let record = build_record(collection, form)?;
            match usize::try_from(index) {
                Ok(index) => store.update(key, index, record, &schema)?,
                Err(_) => false,
            }
        }
        Action::Delete { index } => match usize::try_from(index) {
            Ok(index) => store.delete(key, index, &schema)?,
            Err(_) => false,
        },
    };

    let message = if applied {
        format!("{} {} successfully!", collection.label(), action.verb())
    } else {
        let index = match action {
            Action::Edit { index } | Action::Delete { index } => index,
            Action::Add => 0,
        };
        warn!("No record at position {} in {}", index, key);
        format!("No {} at position {}.", collection.label().to_lowercase(), index)
    };

    Ok(Outcome { applied, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> (tempfile::TempDir, RecordStore) {
        crate::logging::init_test_logging();
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = RecordStore::open(dir.path()).expect("failed to open test store");
        (dir, store)
    }

    fn department(sno: &str, name: &str) -> FormData {
        [("sno", sno), ("department_name", name)].into_iter().collect()
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("name=Ganga").unwrap(),
            ("name".to_string(), "Ganga".to_string())
        );
        assert_eq!(
            parse_assignment("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_assignment("sno=").unwrap(),
            ("sno".to_string(), String::new())
        );
    }

    #[test]
    fn test_parse_assignment_invalid() {
        assert!(matches!(
            parse_assignment("novalue"),
            Err(Error::InvalidAssignment(_))
        ));
        assert!(matches!(
            parse_assignment("=5"),
            Err(Error::InvalidAssignment(_))
        ));
    }

    #[test]
    fn test_from_assignments() {
        let form = FormData::from_assignments(["male=10", "female=12"]).unwrap();
        assert_eq!(form.get("male"), Some("10"));
        assert_eq!(form.get("female"), Some("12"));
        assert_eq!(form.get("total"), None);
    }

    #[test]
    fn test_build_record_trims_and_orders() {
        let form: FormData = [
            ("department_name", "  Physics "),
            ("sno", " 1"),
            ("unrelated", "x"),
        ]
        .into_iter()
        .collect();

        let record = build_record(Collection::Departments, &form).unwrap();
        assert_eq!(
            record.fields().collect::<Vec<_>>(),
            vec!["sno", "department_name"]
        );
        assert_eq!(record.get("sno"), Some("1"));
        assert_eq!(record.get("department_name"), Some("Physics"));
        assert_eq!(record.get("unrelated"), None);
    }

    #[test]
    fn test_build_record_missing_required() {
        let form: FormData = [("male", "10"), ("female", "12")].into_iter().collect();
        let err = build_record(Collection::NssEnrollment, &form).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                collection: "nss_enrollment",
                field: "total"
            }
        ));
    }

    #[test]
    fn test_build_record_defaults() {
        let form: FormData = [("category", "UG")].into_iter().collect();
        let record = build_record(Collection::StudentEnrollment, &form).unwrap();

        assert_eq!(record.len(), 20);
        assert_eq!(record.get("sno"), Some(""));
        assert_eq!(record.get("category"), Some("UG"));
        assert_eq!(record.get("general_male"), Some("0"));
        assert_eq!(record.get("total_transgender"), Some("0"));
    }

    #[test]
    fn test_action_from_form() {
        assert_eq!(Action::from_form(None, None).unwrap(), Action::Add);
        assert_eq!(
            Action::from_form(Some("edit"), Some("2")).unwrap(),
            Action::Edit { index: 2 }
        );
        assert_eq!(
            Action::from_form(Some("delete"), Some("-1")).unwrap(),
            Action::Delete { index: -1 }
        );
    }

    #[test]
    fn test_action_from_form_errors() {
        assert!(matches!(
            Action::from_form(Some("edit"), None),
            Err(Error::InvalidIndex(_))
        ));
        assert!(matches!(
            Action::from_form(Some("delete"), Some("two")),
            Err(Error::InvalidIndex(_))
        ));
        assert!(matches!(
            Action::from_form(Some("archive"), None),
            Err(Error::UnknownAction(_))
        ));
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("add".parse::<Action>().unwrap(), Action::Add);
        assert_eq!(
            "edit:3".parse::<Action>().unwrap(),
            Action::Edit { index: 3 }
        );
        assert_eq!(
            "delete:0".parse::<Action>().unwrap(),
            Action::Delete { index: 0 }
        );
    }

    #[test]
    fn test_apply_add_edit_delete() {
        let (_dir, store) = create_test_store();
        let collection = Collection::Departments;

        let outcome = apply(&store, collection, Action::Add, &department("1", "Physics")).unwrap();
        assert!(outcome.applied);
        assert_eq!(outcome.message, "Department added successfully!");
        apply(&store, collection, Action::Add, &department("2", "Chemistry")).unwrap();

        let outcome = apply(
            &store,
            collection,
            Action::Edit { index: 1 },
            &department("2", "Biochemistry"),
        )
        .unwrap();
        assert!(outcome.applied);
        assert_eq!(outcome.message, "Department updated successfully!");

        let records = store.read("departments").unwrap();
        assert_eq!(records[1].get("department_name"), Some("Biochemistry"));

        let outcome = apply(
            &store,
            collection,
            Action::Delete { index: 0 },
            &FormData::new(),
        )
        .unwrap();
        assert!(outcome.applied);
        assert_eq!(outcome.message, "Department deleted successfully!");

        let records = store.read("departments").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("sno"), Some("2"));
    }

    #[test]
    fn test_apply_out_of_range_reports_not_applied() {
        let (_dir, store) = create_test_store();
        let collection = Collection::Hostels;

        let outcome = apply(
            &store,
            collection,
            Action::Delete { index: 0 },
            &FormData::new(),
        )
        .unwrap();
        assert!(!outcome.applied);
        assert_eq!(outcome.message, "No hostel at position 0.");
    }

    #[test]
    fn test_apply_negative_index_is_noop() {
        let (_dir, store) = create_test_store();
        let collection = Collection::Departments;
        apply(&store, collection, Action::Add, &department("1", "Physics")).unwrap();

        let outcome = apply(
            &store,
            collection,
            Action::Edit { index: -1 },
            &department("9", "Nope"),
        )
        .unwrap();
        assert!(!outcome.applied);

        let outcome = apply(
            &store,
            collection,
            Action::Delete { index: -1 },
            &FormData::new(),
        )
        .unwrap();
        assert!(!outcome.applied);
        assert_eq!(store.read("departments").unwrap().len(), 1);
    }

    #[test]
    fn test_apply_add_missing_required_writes_nothing() {
        let (_dir, store) = create_test_store();
        let form: FormData = [("sno", "1")].into_iter().collect();

        let err = apply(&store, Collection::Departments, Action::Add, &form).unwrap_err();
        assert!(err.is_input_error());
        assert!(!store.exists("departments"));
    }

    #[test]
    fn test_delete_does_not_need_fields() {
        let (_dir, store) = create_test_store();
        let collection = Collection::Hostels;
        let form: FormData = [
            ("sno", "1"),
            ("name", "Ganga"),
            ("type", "Boys"),
            ("capacity", "100"),
            ("students_residing", "90"),
        ]
        .into_iter()
        .collect();
        apply(&store, collection, Action::Add, &form).unwrap();

        let outcome = apply(
            &store,
            collection,
            Action::Delete { index: 0 },
            &FormData::new(),
        )
        .unwrap();
        assert!(outcome.applied);
        assert_eq!(outcome.message, "Hostel deleted successfully!");
    }
}
