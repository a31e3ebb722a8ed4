//! Upload form validation.

use crate::model::file::{PayPeriod, PAY_PERIODS_PER_YEAR};
use crate::service::{FormField, ServiceError, ServiceResult};
use serde::Deserialize;
use std::path::PathBuf;

/// Raw upload fields as typed into the Upload view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadForm {
    /// Path of the document to upload.
    pub source: String,
    pub location: String,
    pub year: String,
    pub pay_period: String,
}

/// Upload fields after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidUpload {
    pub source: PathBuf,
    /// Final path component of `source`; becomes part of the stored name.
    pub original_name: String,
    pub location: String,
    pub year: i32,
    pub pay_period: PayPeriod,
}

impl UploadForm {
    /// Checks that every field is filled and well-formed.
    ///
    /// # Errors
    /// - `ValidationIncomplete` listing every blank field.
    /// - `InvalidField` for a non-numeric year, a pay period outside 1-26, or
    ///   a source path without a file name.
    pub fn validate(&self) -> ServiceResult<ValidUpload> {
        let fields = [
            (FormField::Source, self.source.as_str()),
            (FormField::Location, self.location.as_str()),
            (FormField::Year, self.year.as_str()),
            (FormField::PayPeriod, self.pay_period.as_str()),
        ];
        let missing: Vec<FormField> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();
        if !missing.is_empty() {
            return Err(ServiceError::ValidationIncomplete(missing));
        }

        let source = PathBuf::from(self.source.trim());
        let original_name = source
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                ServiceError::invalid(FormField::Source, "path does not name a file")
            })?;

        let year = self
            .year
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|year| (1..=9999).contains(year))
            .ok_or_else(|| {
                ServiceError::invalid(FormField::Year, format!("`{}` is not a year", self.year))
            })?;

        let pay_period = self
            .pay_period
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(PayPeriod::new)
            .ok_or_else(|| {
                ServiceError::invalid(
                    FormField::PayPeriod,
                    format!(
                        "`{}` is not between 1 and {PAY_PERIODS_PER_YEAR}",
                        self.pay_period
                    ),
                )
            })?;

        Ok(ValidUpload {
            source,
            original_name,
            location: self.location.trim().to_string(),
            year,
            pay_period,
        })
    }
}
