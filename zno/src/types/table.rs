use std::fmt;
use std::str::FromStr;

use crate::error::{ErrorKind, ZnoError};
use crate::types::SurrogateId;
use crate::zno_error;

/// Name of the surrogate key column every destination table carries.
pub const ID_COLUMN: &str = "id";

/// How a destination column is stored and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Free text, stored verbatim.
    Text,
    /// Surrogate id of a row in another table.
    Reference(Table),
}

/// A non-id column of a destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Whether no two rows may share a value in this column.
    pub unique: bool,
}

impl Column {
    const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Text,
            unique: false,
        }
    }

    const fn unique_text(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Text,
            unique: true,
        }
    }

    const fn reference(name: &'static str, table: Table) -> Self {
        Self {
            name,
            kind: ColumnKind::Reference(table),
            unique: false,
        }
    }
}

const REGISTER_LOCATION_COLUMNS: &[Column] = &[
    Column::text("reg_name"),
    Column::text("area_name"),
    Column::text("ter_name"),
    Column::text("ter_type_name"),
];

const EDUCATION_INSTITUTION_COLUMNS: &[Column] = &[
    Column::text("eo_name"),
    Column::text("eo_type_name"),
    Column::text("eo_reg_name"),
    Column::text("eo_area_name"),
    Column::text("eo_ter_name"),
    Column::text("eo_parent"),
];

const TEST_CENTER_COLUMNS: &[Column] = &[
    Column::text("ukr_pt_name"),
    Column::text("ukr_pt_reg_name"),
    Column::text("ukr_pt_area_name"),
    Column::text("ukr_pt_ter_name"),
];

const PARTICIPANT_COLUMNS: &[Column] = &[
    Column::unique_text("out_id"),
    Column::text("birth"),
    Column::text("sex_type_name"),
    Column::text("reg_type_name"),
    Column::text("class_profile_name"),
    Column::text("class_lang_name"),
    Column::reference("reg_location_id", Table::RegisterLocations),
    Column::reference("edu_institution_id", Table::EducationInstitutions),
];

const TEST_RESULT_COLUMNS: &[Column] = &[
    Column::reference("participant_id", Table::Participants),
    Column::reference("test_center_id", Table::TestCenters),
    Column::text("ukr_test"),
    Column::text("ukr_test_status"),
    Column::text("ukr_ball100"),
    Column::text("ukr_ball12"),
    Column::text("ukr_ball"),
];

/// The tables of the normalized destination schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    RegisterLocations,
    EducationInstitutions,
    TestCenters,
    Participants,
    TestResults,
}

impl Table {
    /// All tables, referenced tables before the tables referencing them.
    pub const ALL: [Table; 5] = [
        Table::RegisterLocations,
        Table::EducationInstitutions,
        Table::TestCenters,
        Table::Participants,
        Table::TestResults,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::RegisterLocations => "register_locations",
            Table::EducationInstitutions => "education_institutions",
            Table::TestCenters => "ukr_test_centers",
            Table::Participants => "participants",
            Table::TestResults => "ukr_test_results",
        }
    }

    /// Returns the non-id columns in storage order.
    pub fn columns(&self) -> &'static [Column] {
        match self {
            Table::RegisterLocations => REGISTER_LOCATION_COLUMNS,
            Table::EducationInstitutions => EDUCATION_INSTITUTION_COLUMNS,
            Table::TestCenters => TEST_CENTER_COLUMNS,
            Table::Participants => PARTICIPANT_COLUMNS,
            Table::TestResults => TEST_RESULT_COLUMNS,
        }
    }

    /// Looks up a non-id column by name.
    pub fn column(&self, name: &str) -> Option<(usize, &'static Column)> {
        self.columns()
            .iter()
            .enumerate()
            .find(|(_, column)| column.name == name)
    }

    /// Column names including [`ID_COLUMN`], as shown to console users.
    pub fn field_names(&self) -> Vec<&'static str> {
        std::iter::once(ID_COLUMN)
            .chain(self.columns().iter().map(|column| column.name))
            .collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = ZnoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|table| table.name() == s)
            .ok_or_else(|| zno_error!(ErrorKind::ValidationError, "Unknown table", s))
    }
}

/// A single stored value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Text(value) => write!(f, "{value:?}"),
            Value::Integer(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<SurrogateId> for Value {
    fn from(value: SurrogateId) -> Self {
        Value::Integer(value.into_inner())
    }
}

/// A stored destination row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: SurrogateId,
    /// Values of [`Table::columns`], in the same order.
    pub values: Vec<Value>,
}

impl Record {
    /// Returns the value of a column of `table`, including [`ID_COLUMN`].
    pub fn get(&self, table: Table, column: &str) -> Option<Value> {
        if column == ID_COLUMN {
            return Some(self.id.into());
        }

        let (index, _) = table.column(column)?;
        self.values.get(index).cloned()
    }
}

/// An exact-match filter on one column; a list of conditions is a conjunction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: &'static str,
    pub value: Value,
}

impl Condition {
    pub fn new(column: &'static str, value: impl Into<Value>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_parse_from_their_names() {
        for table in Table::ALL {
            assert_eq!(table.name().parse::<Table>().unwrap(), table);
        }
        assert!("Ukr".parse::<Table>().is_err());
    }

    #[test]
    fn references_point_to_earlier_tables() {
        for (position, table) in Table::ALL.iter().enumerate() {
            for column in table.columns() {
                if let ColumnKind::Reference(target) = column.kind {
                    let target_position = Table::ALL.iter().position(|t| *t == target).unwrap();
                    assert!(target_position < position, "{table}.{}", column.name);
                }
            }
        }
    }

    #[test]
    fn only_out_id_is_unique() {
        let unique: Vec<_> = Table::ALL
            .iter()
            .flat_map(|table| table.columns())
            .filter(|column| column.unique)
            .map(|column| column.name)
            .collect();

        assert_eq!(unique, vec!["out_id"]);
    }

    #[test]
    fn record_get_reads_id_and_columns() {
        let record = Record {
            id: SurrogateId::new(7),
            values: vec![
                "Kyiv".into(),
                "Kyiv city".into(),
                "Kyiv".into(),
                "City".into(),
            ],
        };

        assert_eq!(
            record.get(Table::RegisterLocations, "id"),
            Some(Value::Integer(7))
        );
        assert_eq!(
            record.get(Table::RegisterLocations, "ter_type_name"),
            Some(Value::Text("City".to_string()))
        );
        assert_eq!(record.get(Table::RegisterLocations, "eo_name"), None);
    }
}
