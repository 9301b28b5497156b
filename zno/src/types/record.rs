use serde::Deserialize;

/// Staging table holding the flat dataset.
pub const STAGING_TABLE: &str = "ukr_source_records";

/// Staging column names, in the order returned by [`SourceRecord::fields`].
pub const SOURCE_COLUMNS: [&str; 25] = [
    "out_id",
    "birth",
    "sex_type_name",
    "reg_name",
    "area_name",
    "ter_name",
    "reg_type_name",
    "ter_type_name",
    "class_profile_name",
    "class_lang_name",
    "eo_name",
    "eo_type_name",
    "eo_reg_name",
    "eo_area_name",
    "eo_ter_name",
    "eo_parent",
    "ukr_test",
    "ukr_test_status",
    "ukr_ball100",
    "ukr_ball12",
    "ukr_ball",
    "ukr_pt_name",
    "ukr_pt_reg_name",
    "ukr_pt_area_name",
    "ukr_pt_ter_name",
];

/// One registrant of the flat open-data export.
///
/// Carries the attributes of every destination entity at once. Records are read-only
/// input of a migration run; fields are kept exactly as read, empty strings included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, sqlx::FromRow)]
pub struct SourceRecord {
    #[serde(rename = "OUTID")]
    pub out_id: String,
    #[serde(rename = "Birth")]
    pub birth: String,
    #[serde(rename = "SexTypeName")]
    pub sex_type_name: String,
    #[serde(rename = "RegName")]
    pub reg_name: String,
    #[serde(rename = "AREANAME")]
    pub area_name: String,
    #[serde(rename = "TERNAME")]
    pub ter_name: String,
    #[serde(rename = "RegTypeName")]
    pub reg_type_name: String,
    #[serde(rename = "TerTypeName")]
    pub ter_type_name: String,
    #[serde(rename = "ClassProfileNAME")]
    pub class_profile_name: String,
    #[serde(rename = "ClassLangName")]
    pub class_lang_name: String,
    #[serde(rename = "EONAME")]
    pub eo_name: String,
    #[serde(rename = "EOTypeName")]
    pub eo_type_name: String,
    #[serde(rename = "EORegName")]
    pub eo_reg_name: String,
    #[serde(rename = "EOAreaName")]
    pub eo_area_name: String,
    #[serde(rename = "EOTerName")]
    pub eo_ter_name: String,
    #[serde(rename = "EOParent")]
    pub eo_parent: String,
    #[serde(rename = "UkrTest")]
    pub ukr_test: String,
    #[serde(rename = "UkrTestStatus")]
    pub ukr_test_status: String,
    #[serde(rename = "UkrBall100")]
    pub ukr_ball100: String,
    #[serde(rename = "UkrBall12")]
    pub ukr_ball12: String,
    #[serde(rename = "UkrBall")]
    pub ukr_ball: String,
    #[serde(rename = "UkrPTName")]
    pub ukr_pt_name: String,
    #[serde(rename = "UkrPTRegName")]
    pub ukr_pt_reg_name: String,
    #[serde(rename = "UkrPTAreaName")]
    pub ukr_pt_area_name: String,
    #[serde(rename = "UkrPTTerName")]
    pub ukr_pt_ter_name: String,
}

impl SourceRecord {
    /// Returns every field in [`SOURCE_COLUMNS`] order.
    pub fn fields(&self) -> [&str; 25] {
        [
            self.out_id.as_str(),
            self.birth.as_str(),
            self.sex_type_name.as_str(),
            self.reg_name.as_str(),
            self.area_name.as_str(),
            self.ter_name.as_str(),
            self.reg_type_name.as_str(),
            self.ter_type_name.as_str(),
            self.class_profile_name.as_str(),
            self.class_lang_name.as_str(),
            self.eo_name.as_str(),
            self.eo_type_name.as_str(),
            self.eo_reg_name.as_str(),
            self.eo_area_name.as_str(),
            self.eo_ter_name.as_str(),
            self.eo_parent.as_str(),
            self.ukr_test.as_str(),
            self.ukr_test_status.as_str(),
            self.ukr_ball100.as_str(),
            self.ukr_ball12.as_str(),
            self.ukr_ball.as_str(),
            self.ukr_pt_name.as_str(),
            self.ukr_pt_reg_name.as_str(),
            self.ukr_pt_area_name.as_str(),
            self.ukr_pt_ter_name.as_str(),
        ]
    }
}
