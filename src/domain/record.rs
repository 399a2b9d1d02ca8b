//! Permit record schema
//!
//! [`RawRecord`] is the flat object returned by the open-data API. [`PermitRecord`]
//! is the nested schema a clean record must satisfy. Every leaf is optional except
//! `permit.number`; sections that are missing or `null` deserialize to their
//! all-`null` default, and unknown keys are ignored.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One flat record as produced by the data source
pub type RawRecord = Map<String, Value>;

/// Top-level section names, in serialization order
pub const SECTIONS: [&str; 12] = [
    "permit",
    "project",
    "dates",
    "status",
    "flags",
    "area",
    "building",
    "valuation",
    "coordinates",
    "location",
    "contractor",
    "applicant",
];

/// A validated, nested building-permit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermitRecord {
    pub permit: Permit,
    #[serde(default, deserialize_with = "null_as_default")]
    pub project: Project,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dates: Dates,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: Status,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flags: Flags,
    #[serde(default, deserialize_with = "null_as_default")]
    pub area: Area,
    #[serde(default, deserialize_with = "null_as_default")]
    pub building: Building,
    #[serde(default, deserialize_with = "null_as_default")]
    pub valuation: Valuation,
    #[serde(default, deserialize_with = "null_as_default")]
    pub coordinates: Coordinates,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: Location,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contractor: Contractor,
    #[serde(default, deserialize_with = "null_as_default")]
    pub applicant: Applicant,
}

impl PermitRecord {
    /// The record's natural identifier
    pub fn number(&self) -> &str {
        &self.permit.number
    }
}

/// Permit identification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permit {
    /// Permit number (required, non-empty)
    pub number: String,
    #[serde(default, rename = "type")]
    pub permit_type: Option<Value>,
    #[serde(default)]
    pub type_desc: Option<Value>,
    #[serde(default)]
    pub class_mapped: Option<Value>,
    #[serde(default, rename = "class")]
    pub permit_class: Option<Value>,
    #[serde(default)]
    pub work_class: Option<Value>,
    #[serde(default)]
    pub condominium: Option<Value>,
    #[serde(default)]
    pub master_number: Option<Value>,
    #[serde(default)]
    pub link: Option<Value>,
    #[serde(default)]
    pub certificate_of_occupancy: Option<Value>,
    #[serde(default)]
    pub issue_method: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: Option<Value>,
    pub description: Option<Value>,
    pub tcad_id: Option<Value>,
    pub legal_description: Option<Value>,
}

/// Permit dates; timestamped values are truncated to their date part by the mapper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dates {
    pub applied: Option<Value>,
    pub issued: Option<Value>,
    pub day_issued: Option<Value>,
    pub calendar_year: Option<Value>,
    pub fiscal_year: Option<Value>,
    pub status: Option<Value>,
    pub completed: Option<Value>,
    pub expires: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    pub current: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flags {
    pub issued_last_30: Option<Value>,
}

/// Square footage figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Area {
    pub existing: Option<Value>,
    pub remodel: Option<Value>,
    pub addition: Option<Value>,
    pub lot: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Building {
    pub num_floors: Option<Value>,
    pub housing_units: Option<Value>,
}

/// Job valuation figures in dollars
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Valuation {
    pub total_job: Option<Value>,
    pub remodel_total: Option<Value>,
    pub building: Option<Value>,
    pub building_remodel: Option<Value>,
    pub electrical: Option<Value>,
    pub electrical_remodel: Option<Value>,
    pub mechanical: Option<Value>,
    pub mechanical_remodel: Option<Value>,
    pub plumbing: Option<Value>,
    pub plumbing_remodel: Option<Value>,
    pub medgas: Option<Value>,
    pub medgas_remodel: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub council_district: Option<Value>,
    pub jurisdiction: Option<Value>,
    pub description: Option<Value>,
    /// Reserved for a geocoded point; never populated by the pipeline
    pub geo: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub original: OriginalAddress,
}

/// Site address as originally filed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginalAddress {
    pub street_address: Option<Value>,
    pub city: Option<Value>,
    pub state: Option<Value>,
    pub zip: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contractor {
    pub trade: Option<Value>,
    pub company_name: Option<Value>,
    pub name: Option<Value>,
    pub phone: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub address: Address,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Applicant {
    pub full_name: Option<Value>,
    pub organization: Option<Value>,
    pub phone: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub address: Address,
}

/// Mailing address for contractors and applicants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: Option<Value>,
    pub unit: Option<Value>,
    pub city: Option<Value>,
    pub zip: Option<Value>,
}

/// Treat an explicit `null` section the same as a missing one
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
