//! Feature schema and feature builder
//!
//! Turns the raw form selections into the numeric record the model was
//! trained on. The field order is owned by the model artifact's
//! [`FeatureSchema`]; [`FeatureVector::to_row`] lays the values out in that
//! order.

use crate::encoder::CategoricalEncoder;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema version understood by this build
pub const SCHEMA_VERSION: u32 = 1;

/// Reference year the shipped model computes vehicle age against
pub const DEFAULT_REFERENCE_YEAR: i32 = 2023;

/// One model input column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    Company,
    Year,
    KmsDriven,
    FuelType,
    Age,
}

impl FeatureName {
    pub const ALL: [FeatureName; 5] = [
        FeatureName::Company,
        FeatureName::Year,
        FeatureName::KmsDriven,
        FeatureName::FuelType,
        FeatureName::Age,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureName::Company => "company",
            FeatureName::Year => "year",
            FeatureName::KmsDriven => "kms_driven",
            FeatureName::FuelType => "fuel_type",
            FeatureName::Age => "age",
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Versioned column layout shared with the export pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub fields: Vec<FeatureName>,
}

impl Default for FeatureSchema {
    /// `company, year, kms_driven, fuel_type, age`
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            fields: FeatureName::ALL.to_vec(),
        }
    }
}

impl FeatureSchema {
    pub fn width(&self) -> usize {
        self.fields.len()
    }

    /// Every feature exactly once, at a supported version
    pub fn validate(&self) -> Result<()> {
        if self.version != SCHEMA_VERSION {
            return Err(Error::SchemaMismatch(format!(
                "unsupported schema version {} (expected {})",
                self.version, SCHEMA_VERSION
            )));
        }
        for name in FeatureName::ALL {
            let count = self.fields.iter().filter(|f| **f == name).count();
            if count != 1 {
                return Err(Error::SchemaMismatch(format!(
                    "field '{}' appears {} times in schema (expected once)",
                    name, count
                )));
            }
        }
        if self.fields.len() != FeatureName::ALL.len() {
            return Err(Error::SchemaMismatch(format!(
                "schema has {} fields (expected {})",
                self.fields.len(),
                FeatureName::ALL.len()
            )));
        }
        Ok(())
    }
}

/// Raw selections from the form, before encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarQuery {
    pub company: String,
    pub fuel_type: String,
    pub year: i32,
    pub kms_driven: u64,
}

/// Encoded model input for one prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureVector {
    pub company_code: i64,
    pub year: i64,
    pub kms_driven: i64,
    pub fuel_code: i64,
    pub age: i64,
}

impl FeatureVector {
    pub fn get(&self, name: FeatureName) -> i64 {
        match name {
            FeatureName::Company => self.company_code,
            FeatureName::Year => self.year,
            FeatureName::KmsDriven => self.kms_driven,
            FeatureName::FuelType => self.fuel_code,
            FeatureName::Age => self.age,
        }
    }

    /// Values in `schema` field order
    pub fn to_row(&self, schema: &FeatureSchema) -> Vec<f64> {
        schema
            .fields
            .iter()
            .map(|name| self.get(*name) as f64)
            .collect()
    }
}

/// Maps a [`CarQuery`] to a [`FeatureVector`]
///
/// Borrows the encoders; holds no state between calls.
#[derive(Debug, Clone, Copy)]
pub struct FeatureBuilder<'a> {
    company: &'a CategoricalEncoder,
    fuel_type: &'a CategoricalEncoder,
    reference_year: i32,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(
        company: &'a CategoricalEncoder,
        fuel_type: &'a CategoricalEncoder,
        reference_year: i32,
    ) -> Self {
        Self {
            company,
            fuel_type,
            reference_year,
        }
    }

    /// Encode categories and derive `age = reference_year - year`
    ///
    /// Year and kilometers pass through unchanged; no clamping.
    pub fn build(&self, query: &CarQuery) -> Result<FeatureVector> {
        let company_code = self.company.encode(&query.company)?;
        let fuel_code = self.fuel_type.encode(&query.fuel_type)?;
        let kms_driven = i64::try_from(query.kms_driven).map_err(|_| {
            Error::InvalidInput(format!("kms_driven {} is too large", query.kms_driven))
        })?;

        Ok(FeatureVector {
            company_code,
            year: i64::from(query.year),
            kms_driven,
            fuel_code,
            age: i64::from(self.reference_year) - i64::from(query.year),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoders() -> (CategoricalEncoder, CategoricalEncoder) {
        let company = CategoricalEncoder::new(
            "company",
            ["Audi", "Hyundai", "Maruti", "Toyota"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap();
        let fuel = CategoricalEncoder::new(
            "fuel_type",
            ["Diesel", "LPG", "Petrol"].iter().map(|s| s.to_string()).collect(),
        )
        .unwrap();
        (company, fuel)
    }

    fn query(company: &str, fuel: &str, year: i32, kms: u64) -> CarQuery {
        CarQuery {
            company: company.to_string(),
            fuel_type: fuel.to_string(),
            year,
            kms_driven: kms,
        }
    }

    #[test]
    fn test_age_for_every_year_in_range() {
        let (company, fuel) = encoders();
        let builder = FeatureBuilder::new(&company, &fuel, DEFAULT_REFERENCE_YEAR);
        for year in 1990..=2023 {
            let fv = builder.build(&query("Toyota", "Diesel", year, 1234)).unwrap();
            assert_eq!(fv.age, 2023 - i64::from(year));
            assert_eq!(fv.year, i64::from(year));
            assert_eq!(fv.kms_driven, 1234);
        }
    }

    #[test]
    fn test_boundary_years_and_zero_kms() {
        let (company, fuel) = encoders();
        let builder = FeatureBuilder::new(&company, &fuel, DEFAULT_REFERENCE_YEAR);

        let oldest = builder.build(&query("Audi", "LPG", 1990, 0)).unwrap();
        assert_eq!(oldest.age, 33);
        assert_eq!(oldest.kms_driven, 0);

        let newest = builder.build(&query("Audi", "LPG", 2023, 0)).unwrap();
        assert_eq!(newest.age, 0);
    }

    #[test]
    fn test_maruti_petrol_2015() {
        let (company, fuel) = encoders();
        let builder = FeatureBuilder::new(&company, &fuel, DEFAULT_REFERENCE_YEAR);
        let fv = builder.build(&query("Maruti", "Petrol", 2015, 50000)).unwrap();
        assert_eq!(
            fv,
            FeatureVector {
                company_code: 2,
                year: 2015,
                kms_driven: 50000,
                fuel_code: 2,
                age: 8,
            }
        );
    }

    #[test]
    fn test_codes_are_stable_across_calls() {
        let (company, fuel) = encoders();
        let builder = FeatureBuilder::new(&company, &fuel, DEFAULT_REFERENCE_YEAR);
        for name in company.vocabulary() {
            let first = builder.build(&query(name, "Petrol", 2010, 1)).unwrap();
            let second = builder.build(&query(name, "Petrol", 2010, 1)).unwrap();
            assert_eq!(first.company_code, company.encode(name).unwrap());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_unknown_company_is_out_of_vocabulary() {
        let (company, fuel) = encoders();
        let builder = FeatureBuilder::new(&company, &fuel, DEFAULT_REFERENCE_YEAR);
        let err = builder.build(&query("Tesla", "Petrol", 2020, 10)).unwrap_err();
        assert!(matches!(err, Error::OutOfVocabulary { ref encoder, .. } if encoder == "company"));
    }

    #[test]
    fn test_unknown_fuel_is_out_of_vocabulary() {
        let (company, fuel) = encoders();
        let builder = FeatureBuilder::new(&company, &fuel, DEFAULT_REFERENCE_YEAR);
        let err = builder.build(&query("Audi", "Electric", 2020, 10)).unwrap_err();
        assert!(matches!(err, Error::OutOfVocabulary { ref encoder, .. } if encoder == "fuel_type"));
    }

    #[test]
    fn test_reference_year_is_not_clamped() {
        let (company, fuel) = encoders();
        let builder = FeatureBuilder::new(&company, &fuel, 2020);
        let fv = builder.build(&query("Audi", "Diesel", 2023, 5)).unwrap();
        assert_eq!(fv.age, -3);
    }

    #[test]
    fn test_to_row_follows_schema_order() {
        let fv = FeatureVector {
            company_code: 1,
            year: 2015,
            kms_driven: 50000,
            fuel_code: 2,
            age: 8,
        };
        assert_eq!(
            fv.to_row(&FeatureSchema::default()),
            vec![1.0, 2015.0, 50000.0, 2.0, 8.0]
        );

        let reordered = FeatureSchema {
            version: SCHEMA_VERSION,
            fields: vec![
                FeatureName::Age,
                FeatureName::FuelType,
                FeatureName::KmsDriven,
                FeatureName::Year,
                FeatureName::Company,
            ],
        };
        assert_eq!(fv.to_row(&reordered), vec![8.0, 2.0, 50000.0, 2015.0, 1.0]);
    }

    #[test]
    fn test_schema_validation() {
        assert!(FeatureSchema::default().validate().is_ok());

        let missing = FeatureSchema {
            version: SCHEMA_VERSION,
            fields: vec![FeatureName::Company, FeatureName::Year],
        };
        assert!(matches!(missing.validate(), Err(Error::SchemaMismatch(_))));

        let duplicated = FeatureSchema {
            version: SCHEMA_VERSION,
            fields: vec![
                FeatureName::Company,
                FeatureName::Year,
                FeatureName::KmsDriven,
                FeatureName::FuelType,
                FeatureName::Age,
                FeatureName::Age,
            ],
        };
        assert!(duplicated.validate().is_err());

        let future = FeatureSchema {
            version: 2,
            ..FeatureSchema::default()
        };
        assert!(future.validate().is_err());
    }

    #[test]
    fn test_schema_rejects_unknown_field_name() {
        let parsed: std::result::Result<FeatureSchema, _> =
            serde_json::from_str(r#"{"version": 1, "fields": ["company", "colour"]}"#);
        assert!(parsed.is_err());
    }
}
