//! Dashboard counts derived from the stored collections.

use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::record::Record;
use crate::schema::Collection;
use crate::storage::RecordStore;

/// Fields summed to get a head count from a category-count record.
const TOTAL_FIELDS: [&str; 3] = ["total_male", "total_female", "total_transgender"];

/// Staff type that counts towards faculty members.
const TEACHING_STAFF: &str = "teaching";

/// Headline numbers shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Students across all enrollment records.
    pub total_students: i64,
    /// Teaching staff across all staff records.
    pub faculty_members: i64,
    /// Number of programme records.
    pub active_programmes: usize,
    /// Number of department records.
    pub departments: usize,
}

impl DashboardStats {
    /// Compute the dashboard from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the backing files cannot be read.
    pub fn compute(store: &RecordStore) -> Result<Self> {
        let students = store.read(Collection::StudentEnrollment.key())?;
        let staff = store.read(Collection::StaffInfo.key())?;
        let programmes = store.read(Collection::Programmes.key())?;
        let departments = store.read(Collection::Departments.key())?;

        let faculty = staff
            .iter()
            .filter(|record| {
                record
                    .get("staff_type")
                    .is_some_and(|t| t.eq_ignore_ascii_case(TEACHING_STAFF))
            })
            .map(head_count)
            .fold(0, i64::saturating_add);

        Ok(Self {
            total_students: students
                .iter()
                .map(head_count)
                .fold(0, i64::saturating_add),
            faculty_members: faculty,
            active_programmes: programmes.len(),
            departments: departments.len(),
        })
    }
}

/// Sum of the total columns of one record.
///
/// Missing or empty values count as zero. Values are added in column order;
/// a non-numeric value, or one that would overflow the sum, stops the sum for
/// that record.
fn head_count(record: &Record) -> i64 {
    let mut sum: i64 = 0;
    for field in TOTAL_FIELDS {
        let raw = record.get(field).unwrap_or("").trim();
        if raw.is_empty() {
            continue;
        }
        let Ok(value) = raw.parse::<i64>() else {
            warn!("Ignoring non-numeric {} value '{}'", field, raw);
            break;
        };
        let Some(next) = sum.checked_add(value) else {
            warn!("Ignoring {} value '{}': head count overflows", field, raw);
            break;
        };
        sum = next;
    }
    sum
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

    fn totals(male: &str, female: &str, transgender: &str) -> Record {
        Record::from_pairs([
            ("total_male", male),
            ("total_female", female),
            ("total_transgender", transgender),
        ])
    }

    fn staff(staff_type: &str, male: &str, female: &str) -> Record {
        let mut record = totals(male, female, "0");
        record.set("staff_type", staff_type);
        record
    }

    #[test]
    fn test_empty_store() {
        let (_dir, store) = create_test_store();
        let stats = DashboardStats::compute(&store).unwrap();
        assert_eq!(stats, DashboardStats::default());
    }

    #[test]
    fn test_head_count() {
        assert_eq!(head_count(&totals("10", "12", "1")), 23);
        assert_eq!(head_count(&totals("", "5", "")), 5);
        assert_eq!(head_count(&Record::new()), 0);
    }

    #[test]
    fn test_head_count_stops_at_bad_value() {
        assert_eq!(head_count(&totals("10", "many", "3")), 10);
        assert_eq!(head_count(&totals("1.5", "2", "3")), 0);
    }

    #[test]
    fn test_head_count_stops_on_overflow() {
        let max = i64::MAX.to_string();
        assert_eq!(head_count(&totals(&max, "1", "0")), i64::MAX);
        assert_eq!(head_count(&totals("-5", &i64::MIN.to_string(), "7")), -5);
    }

    #[test]
    fn test_compute_large_totals_saturate() {
        let (_dir, store) = create_test_store();
        let max = i64::MAX.to_string();
        store
            .write(
                Collection::StudentEnrollment.key(),
                &[totals(&max, "1", "0"), totals("10", "0", "0")],
                &Collection::StudentEnrollment.schema(),
            )
            .unwrap();

        let stats = DashboardStats::compute(&store).unwrap();
        assert_eq!(stats.total_students, i64::MAX);
    }

    #[test]
    fn test_compute() {
        let (_dir, store) = create_test_store();
        let enrollment = Collection::StudentEnrollment.schema();
        store
            .write(
                Collection::StudentEnrollment.key(),
                &[totals("100", "120", "2"), totals("50", "", "0")],
                &enrollment,
            )
            .unwrap();

        let staff_schema = Collection::StaffInfo.schema();
        store
            .write(
                Collection::StaffInfo.key(),
                &[
                    staff("Teaching", "20", "25"),
                    staff("non-teaching", "40", "30"),
                    staff("TEACHING", "5", "5"),
                ],
                &staff_schema,
            )
            .unwrap();

        let programmes = Collection::Programmes.schema();
        for sno in ["1", "2", "3"] {
            store
                .append(
                    Collection::Programmes.key(),
                    &Record::from_pairs([("sno", sno)]),
                    &programmes,
                )
                .unwrap();
        }

        let departments = Collection::Departments.schema();
        store
            .append(
                Collection::Departments.key(),
                &Record::from_pairs([("sno", "1"), ("department_name", "Physics")]),
                &departments,
            )
            .unwrap();

        let stats = DashboardStats::compute(&store).unwrap();
        assert_eq!(stats.total_students, 272);
        assert_eq!(stats.faculty_members, 55);
        assert_eq!(stats.active_programmes, 3);
        assert_eq!(stats.departments, 1);
    }

    #[test]
    fn test_serialize() {
        let stats = DashboardStats {
            total_students: 10,
            faculty_members: 2,
            active_programmes: 3,
            departments: 4,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"total_students\":10"));
        assert!(json.contains("\"departments\":4"));
    }
}
