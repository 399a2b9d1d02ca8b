//! Declarative flat-to-nested field table
//!
//! Each entry names one target path in the nested record, the flat source key
//! it reads (if any), and the coercion applied to the value. Entries are
//! independent of one another; adding a field is a one-line table edit.

/// Value coercion applied to a single source value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Copy the value unchanged, including `null`
    Passthrough,
    /// Best-effort numeric coercion; anything unparseable becomes `null`
    Number,
    /// Keep the date part of an ISO-8601 timestamp string
    Date,
    /// The value when truthy, otherwise the given text
    DefaultText(&'static str),
    /// Textual form of the value, `null` when falsy
    Text,
    /// Always `null`; no source key is read
    Null,
}

/// One row of the field table
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    /// Target path in the nested record
    pub path: &'static [&'static str],
    /// Flat source key, `None` for constant fields
    pub source: Option<&'static str>,
    pub transform: Transform,
}

const fn field(
    path: &'static [&'static str],
    source: &'static str,
    transform: Transform,
) -> FieldMapping {
    FieldMapping {
        path,
        source: Some(source),
        transform,
    }
}

const fn constant(path: &'static [&'static str], transform: Transform) -> FieldMapping {
    FieldMapping {
        path,
        source: None,
        transform,
    }
}

use Transform::{Date, DefaultText, Number, Passthrough, Text};

/// Mapping from the source's flat keys to the nested permit record
pub const FIELD_MAP: &[FieldMapping] = &[
    // permit
    field(&["permit", "number"], "permit_number", Passthrough),
    field(&["permit", "type"], "permit type", Passthrough),
    field(&["permit", "type_desc"], "permit_type_desc", Passthrough),
    field(&["permit", "class_mapped"], "permit_class_mapped", Passthrough),
    field(&["permit", "class"], "permit_class", Passthrough),
    field(&["permit", "work_class"], "work_class", Passthrough),
    field(&["permit", "condominium"], "condominium", Passthrough),
    field(&["permit", "master_number"], "master permit number", Passthrough),
    field(&["permit", "link"], "link", Passthrough),
    field(
        &["permit", "certificate_of_occupancy"],
        "certificate_of_occupancy",
        Passthrough,
    ),
    field(&["permit", "issue_method"], "issue_method", Passthrough),
    // project
    field(&["project", "name"], "permit_location", Passthrough),
    field(&["project", "description"], "description", Passthrough),
    field(&["project", "tcad_id"], "tcad_id", Passthrough),
    field(&["project", "legal_description"], "legal_description", Passthrough),
    // dates
    field(&["dates", "applied"], "applieddate", Date),
    field(&["dates", "issued"], "issue_date", Date),
    field(&["dates", "day_issued"], "day_issued", Passthrough),
    field(&["dates", "calendar_year"], "calendar_year_issued", Passthrough),
    field(&["dates", "fiscal_year"], "fiscal_year_issued", Passthrough),
    field(&["dates", "status"], "status date", Date),
    field(&["dates", "completed"], "completed_date", Date),
    field(&["dates", "expires"], "expiresdate", Date),
    // status / flags
    field(&["status", "current"], "status_current", Passthrough),
    field(&["flags", "issued_last_30"], "issued_in_last_30_days", Passthrough),
    // area
    field(&["area", "existing"], "total_existing_building_sqft", Number),
    field(&["area", "remodel"], "remodel_repair_sqft", Number),
    field(&["area", "addition"], "total_new_add_sqft", Number),
    field(&["area", "lot"], "total_lot_sq_ft", Number),
    // building
    field(&["building", "num_floors"], "number_of_floors", Number),
    field(&["building", "housing_units"], "housing_units", Number),
    // valuation
    field(&["valuation", "total_job"], "total_job_valuation", Number),
    field(&["valuation", "remodel_total"], "total_valuation_remodel", Number),
    field(&["valuation", "building"], "building_valuation", Number),
    field(
        &["valuation", "building_remodel"],
        "building_valuation_remodel",
        Number,
    ),
    field(&["valuation", "electrical"], "electrical_valuation", Number),
    field(
        &["valuation", "electrical_remodel"],
        "electrical_valuation_remodel",
        Number,
    ),
    field(&["valuation", "mechanical"], "mechanical_valuation", Number),
    field(
        &["valuation", "mechanical_remodel"],
        "mechanical_valuation_remodel",
        Number,
    ),
    field(&["valuation", "plumbing"], "plumbing_valuation", Number),
    field(
        &["valuation", "plumbing_remodel"],
        "plumbing_valuation_remodel",
        Number,
    ),
    field(&["valuation", "medgas"], "medgas_valuation", Number),
    field(&["valuation", "medgas_remodel"], "medgas_valuation_remodel", Number),
    // coordinates
    field(&["coordinates", "latitude"], "latitude", Number),
    field(&["coordinates", "longitude"], "longitude", Number),
    // location
    field(&["location", "council_district"], "council_district", Passthrough),
    field(&["location", "jurisdiction"], "jurisdiction", Passthrough),
    field(&["location", "description"], "location", Passthrough),
    constant(&["location", "geo"], Transform::Null),
    field(
        &["location", "original", "street_address"],
        "original_address1",
        Passthrough,
    ),
    field(&["location", "original", "city"], "original_city", Passthrough),
    field(
        &["location", "original", "state"],
        "original_state",
        DefaultText("TX"),
    ),
    field(&["location", "original", "zip"], "original_zip", Text),
    // contractor
    field(&["contractor", "trade"], "contractor_trade", Passthrough),
    field(
        &["contractor", "company_name"],
        "contractor_company_name",
        Passthrough,
    ),
    field(&["contractor", "name"], "contractor_full_name", Passthrough),
    field(&["contractor", "phone"], "contractor_phone", Passthrough),
    field(
        &["contractor", "address", "street"],
        "contractor_address1",
        Passthrough,
    ),
    field(
        &["contractor", "address", "unit"],
        "contractor_address2",
        Passthrough,
    ),
    field(&["contractor", "address", "city"], "contractor_city", Passthrough),
    field(&["contractor", "address", "zip"], "contractor_zip", Passthrough),
    // applicant
    field(&["applicant", "full_name"], "applicant_full_name", Passthrough),
    field(&["applicant", "organization"], "applicant_org", Passthrough),
    field(&["applicant", "phone"], "applicant_phone", Passthrough),
    field(
        &["applicant", "address", "street"],
        "applicant_address1",
        Passthrough,
    ),
    field(
        &["applicant", "address", "unit"],
        "applicant_address2",
        Passthrough,
    ),
    field(&["applicant", "address", "city"], "applicant_city", Passthrough),
    field(&["applicant", "address", "zip"], "applicantzip", Passthrough),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::SECTIONS;
    use std::collections::HashSet;

    #[test]
    fn test_target_paths_are_unique() {
        let mut seen = HashSet::new();
        for mapping in FIELD_MAP {
            assert!(seen.insert(mapping.path), "duplicate path {:?}", mapping.path);
        }
    }

    #[test]
    fn test_every_path_starts_with_a_section() {
        for mapping in FIELD_MAP {
            assert!(SECTIONS.contains(&mapping.path[0]), "{:?}", mapping.path);
        }
    }

    #[test]
    fn test_only_geo_is_constant() {
        let constants: Vec<_> = FIELD_MAP.iter().filter(|m| m.source.is_none()).collect();
        assert_eq!(constants.len(), 1);
        assert_eq!(constants[0].path, &["location", "geo"]);
    }
}
