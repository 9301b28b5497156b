//! Plain destination rows and how they are derived from a [`SourceRecord`].

use std::hash::Hash;

use crate::types::{SourceRecord, SurrogateId, Table, Value};

/// A row that can be written to a destination table.
pub trait TableRow {
    /// Table the row belongs to.
    const TABLE: Table;

    /// Converts the row into values ordered like [`Table::columns`].
    fn into_values(self) -> Vec<Value>;
}

/// A deduplicated lookup entity.
///
/// The descriptive fields of a lookup row are its natural key, so the row type doubles as
/// the key: two rows are the same entity exactly when all fields are equal, compared
/// literally.
pub trait LookupEntity: TableRow + Clone + Eq + Hash {
    /// Derives the entity's natural key from a source record.
    fn from_record(record: &SourceRecord) -> Self;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegLocation {
    pub reg_name: String,
    pub area_name: String,
    pub ter_name: String,
    pub ter_type_name: String,
}

impl TableRow for RegLocation {
    const TABLE: Table = Table::RegisterLocations;

    fn into_values(self) -> Vec<Value> {
        vec![
            self.reg_name.into(),
            self.area_name.into(),
            self.ter_name.into(),
            self.ter_type_name.into(),
        ]
    }
}

impl LookupEntity for RegLocation {
    fn from_record(record: &SourceRecord) -> Self {
        Self {
            reg_name: record.reg_name.clone(),
            area_name: record.area_name.clone(),
            ter_name: record.ter_name.clone(),
            ter_type_name: record.ter_type_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EducationInstitution {
    pub eo_name: String,
    pub eo_type_name: String,
    pub eo_reg_name: String,
    pub eo_area_name: String,
    pub eo_ter_name: String,
    pub eo_parent: String,
}

impl TableRow for EducationInstitution {
    const TABLE: Table = Table::EducationInstitutions;

    fn into_values(self) -> Vec<Value> {
        vec![
            self.eo_name.into(),
            self.eo_type_name.into(),
            self.eo_reg_name.into(),
            self.eo_area_name.into(),
            self.eo_ter_name.into(),
            self.eo_parent.into(),
        ]
    }
}

impl LookupEntity for EducationInstitution {
    fn from_record(record: &SourceRecord) -> Self {
        Self {
            eo_name: record.eo_name.clone(),
            eo_type_name: record.eo_type_name.clone(),
            eo_reg_name: record.eo_reg_name.clone(),
            eo_area_name: record.eo_area_name.clone(),
            eo_ter_name: record.eo_ter_name.clone(),
            eo_parent: record.eo_parent.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestCenter {
    pub ukr_pt_name: String,
    pub ukr_pt_reg_name: String,
    pub ukr_pt_area_name: String,
    pub ukr_pt_ter_name: String,
}

impl TableRow for TestCenter {
    const TABLE: Table = Table::TestCenters;

    fn into_values(self) -> Vec<Value> {
        vec![
            self.ukr_pt_name.into(),
            self.ukr_pt_reg_name.into(),
            self.ukr_pt_area_name.into(),
            self.ukr_pt_ter_name.into(),
        ]
    }
}

impl LookupEntity for TestCenter {
    fn from_record(record: &SourceRecord) -> Self {
        Self {
            ukr_pt_name: record.ukr_pt_name.clone(),
            ukr_pt_reg_name: record.ukr_pt_reg_name.clone(),
            ukr_pt_area_name: record.ukr_pt_area_name.clone(),
            ukr_pt_ter_name: record.ukr_pt_ter_name.clone(),
        }
    }
}

/// A participant ready to be written, with both lookups already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
    pub out_id: String,
    pub birth: String,
    pub sex_type_name: String,
    pub reg_type_name: String,
    pub class_profile_name: String,
    pub class_lang_name: String,
    pub reg_location_id: SurrogateId,
    pub edu_institution_id: SurrogateId,
}

impl NewParticipant {
    pub fn from_record(
        record: &SourceRecord,
        reg_location_id: SurrogateId,
        edu_institution_id: SurrogateId,
    ) -> Self {
        Self {
            out_id: record.out_id.clone(),
            birth: record.birth.clone(),
            sex_type_name: record.sex_type_name.clone(),
            reg_type_name: record.reg_type_name.clone(),
            class_profile_name: record.class_profile_name.clone(),
            class_lang_name: record.class_lang_name.clone(),
            reg_location_id,
            edu_institution_id,
        }
    }
}

impl TableRow for NewParticipant {
    const TABLE: Table = Table::Participants;

    fn into_values(self) -> Vec<Value> {
        vec![
            self.out_id.into(),
            self.birth.into(),
            self.sex_type_name.into(),
            self.reg_type_name.into(),
            self.class_profile_name.into(),
            self.class_lang_name.into(),
            self.reg_location_id.into(),
            self.edu_institution_id.into(),
        ]
    }
}

/// A test result ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTestResult {
    pub participant_id: SurrogateId,
    pub test_center_id: SurrogateId,
    pub ukr_test: String,
    pub ukr_test_status: String,
    pub ukr_ball100: String,
    pub ukr_ball12: String,
    pub ukr_ball: String,
}

impl NewTestResult {
    pub fn from_record(
        record: &SourceRecord,
        participant_id: SurrogateId,
        test_center_id: SurrogateId,
    ) -> Self {
        Self {
            participant_id,
            test_center_id,
            ukr_test: record.ukr_test.clone(),
            ukr_test_status: record.ukr_test_status.clone(),
            ukr_ball100: record.ukr_ball100.clone(),
            ukr_ball12: record.ukr_ball12.clone(),
            ukr_ball: record.ukr_ball.clone(),
        }
    }
}

impl TableRow for NewTestResult {
    const TABLE: Table = Table::TestResults;

    fn into_values(self) -> Vec<Value> {
        vec![
            self.participant_id.into(),
            self.test_center_id.into(),
            self.ukr_test.into(),
            self.ukr_test_status.into(),
            self.ukr_ball100.into(),
            self.ukr_ball12.into(),
            self.ukr_ball.into(),
        ]
    }
}
