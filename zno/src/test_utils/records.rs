use crate::types::SourceRecord;

/// Builds a complete record whose lookups are derived from `reg_name` and `eo_name`.
///
/// Every record shares a single test center, so references are easy to predict.
pub fn record(out_id: &str, reg_name: &str, eo_name: &str) -> SourceRecord {
    SourceRecord {
        out_id: out_id.to_string(),
        birth: "2002".to_string(),
        sex_type_name: "жіноча".to_string(),
        reg_name: reg_name.to_string(),
        area_name: format!("{reg_name} area"),
        ter_name: reg_name.to_string(),
        reg_type_name: "Випускник загальноосвітнього навчального закладу 2019 року".to_string(),
        ter_type_name: "місто".to_string(),
        class_profile_name: "Універсальний".to_string(),
        class_lang_name: "українська".to_string(),
        eo_name: eo_name.to_string(),
        eo_type_name: "середня загальноосвітня школа".to_string(),
        eo_reg_name: reg_name.to_string(),
        eo_area_name: format!("{reg_name} area"),
        eo_ter_name: reg_name.to_string(),
        eo_parent: format!("{reg_name} education department"),
        ukr_test: "Українська мова і література".to_string(),
        ukr_test_status: "Зараховано".to_string(),
        ukr_ball100: "168,0".to_string(),
        ukr_ball12: "9".to_string(),
        ukr_ball: "56".to_string(),
        ukr_pt_name: "PT1".to_string(),
        ukr_pt_reg_name: "Kyiv".to_string(),
        ukr_pt_area_name: "Kyiv area".to_string(),
        ukr_pt_ter_name: "Kyiv".to_string(),
    }
}

/// A record registered in Kyiv.
pub fn kyiv_record(out_id: &str, eo_name: &str) -> SourceRecord {
    record(out_id, "Kyiv", eo_name)
}
