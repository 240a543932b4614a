//! Collections and their field lists.
//!
//! Each collection maps 1:1 to a storage key and a backing `<key>.csv` file.
//! The field list is the schema passed to the store on every write.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How a field is filled when a form submission leaves it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// The field must be submitted.
    Required,
    /// Free text, defaults to an empty string.
    Text,
    /// A head count, defaults to `"0"`.
    Count,
}

impl FieldDefault {
    /// The value used when the field is absent, if any.
    #[must_use]
    pub fn fallback(self) -> Option<&'static str> {
        match self {
            Self::Required => None,
            Self::Text => Some(""),
            Self::Count => Some("0"),
        }
    }
}

/// A named field of a collection schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Column name as stored in the header row.
    pub name: &'static str,
    /// What to store when the field is not submitted.
    pub default: FieldDefault,
}

const fn required(name: &'static str) -> Field {
    Field {
        name,
        default: FieldDefault::Required,
    }
}

const fn text(name: &'static str) -> Field {
    Field {
        name,
        default: FieldDefault::Text,
    }
}

const fn count(name: &'static str) -> Field {
    Field {
        name,
        default: FieldDefault::Count,
    }
}

/// Reservation category × gender head counts, followed by the totals.
macro_rules! category_counts {
    ($($lead:expr),* $(,)?) => {
        &[
            $($lead,)*
            count("general_male"),
            count("general_female"),
            count("general_transgender"),
            count("ews_male"),
            count("ews_female"),
            count("ews_transgender"),
            count("sc_male"),
            count("sc_female"),
            count("sc_transgender"),
            count("st_male"),
            count("st_female"),
            count("st_transgender"),
            count("obc_male"),
            count("obc_female"),
            count("obc_transgender"),
            count("total_male"),
            count("total_female"),
            count("total_transgender"),
        ]
    };
}

const NSS_ENROLLMENT: &[Field] = &[required("male"), required("female"), required("total")];

const HOSTELS: &[Field] = &[
    required("sno"),
    required("name"),
    required("type"),
    required("capacity"),
    required("students_residing"),
];

const DEPARTMENTS: &[Field] = &[required("sno"), required("department_name")];

const PROGRAMMES: &[Field] = &[
    text("sno"),
    text("level"),
    text("program_name"),
    text("year_of_start"),
    text("course_duration"),
    text("entry_qualification"),
    text("medium_instruction"),
    text("sanctioned_intake"),
    text("approved_intake_ews"),
    text("approved_intake_sc"),
    text("approved_intake_st"),
    text("approved_intake_obc"),
    text("approved_intake_general"),
    text("approved_intake_total"),
];

const STUDENT_ENROLLMENT: &[Field] = category_counts![text("sno"), text("category")];

const EXAMINATION_RESULTS: &[Field] = category_counts![
    text("sno"),
    text("prog"),
    text("year"),
    text("month"),
    text("category"),
];

const PLACEMENT: &[Field] = &[
    count("male_placed"),
    count("female_placed"),
    count("total_placed"),
    count("median_salary"),
];

const STAFF_INFO: &[Field] =
    category_counts![text("staff_type"), text("category"), text("subcategory")];

const SCHOLARSHIPS: &[Field] = category_counts![text("scholarship_scheme"), text("category")];

/// One of the fixed record categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// National Service Scheme enrollment counts.
    NssEnrollment,
    /// Hostels and their occupancy.
    Hostels,
    /// Academic departments.
    Departments,
    /// Programmes offered and their intake.
    Programmes,
    /// Student enrollment by category.
    StudentEnrollment,
    /// Examination results by category.
    ExaminationResults,
    /// Placement outcomes.
    Placement,
    /// Teaching and non-teaching staff by category.
    StaffInfo,
    /// Scholarship beneficiaries by category.
    Scholarships,
}

impl Collection {
    /// Every collection, in menu order.
    pub const ALL: [Collection; 9] = [
        Self::NssEnrollment,
        Self::Hostels,
        Self::Departments,
        Self::Programmes,
        Self::StudentEnrollment,
        Self::ExaminationResults,
        Self::Placement,
        Self::StaffInfo,
        Self::Scholarships,
    ];

    /// The storage key, which is also the backing file stem.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::NssEnrollment => "nss_enrollment",
            Self::Hostels => "hostels",
            Self::Departments => "departments",
            Self::Programmes => "programmes",
            Self::StudentEnrollment => "student_enrollment",
            Self::ExaminationResults => "examination_results",
            Self::Placement => "placement",
            Self::StaffInfo => "staff_info",
            Self::Scholarships => "scholarships",
        }
    }

    /// Name used in confirmation messages, e.g. "Hostel added successfully!".
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NssEnrollment => "Record",
            Self::Hostels => "Hostel",
            Self::Departments => "Department",
            Self::Programmes => "Programme",
            Self::StudentEnrollment => "Enrollment record",
            Self::ExaminationResults => "Result record",
            Self::Placement => "Placement record",
            Self::StaffInfo => "Staff record",
            Self::Scholarships => "Scholarship record",
        }
    }

    /// Fields of this collection, in header order.
    #[must_use]
    pub fn fields(self) -> &'static [Field] {
        match self {
            Self::NssEnrollment => NSS_ENROLLMENT,
            Self::Hostels => HOSTELS,
            Self::Departments => DEPARTMENTS,
            Self::Programmes => PROGRAMMES,
            Self::StudentEnrollment => STUDENT_ENROLLMENT,
            Self::ExaminationResults => EXAMINATION_RESULTS,
            Self::Placement => PLACEMENT,
            Self::StaffInfo => STAFF_INFO,
            Self::Scholarships => SCHOLARSHIPS,
        }
    }

    /// Field names in header order, as passed to the store.
    #[must_use]
    pub fn schema(self) -> Vec<&'static str> {
        self.fields().iter().map(|field| field.name).collect()
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().trim_end_matches(".csv");
        Self::ALL
            .into_iter()
            .find(|collection| collection.key() == key)
            .ok_or_else(|| Error::unknown_collection(s))
    }
}
