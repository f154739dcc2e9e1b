use std::str::FromStr;

use serde::Deserialize;

use crate::secret::Secret;

#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    strum_macros::EnumString,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    strum_macros::EnumString,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum HardwareSpecs {
    Basic,
    High,
}

#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    strum_macros::EnumString,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum DataClassification {
    Low,
    Medium,
    High,
}

#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    strum_macros::EnumString,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Criticality {
    Low,
    Medium,
    High,
}

/// The raw submission form, one field per input. Every field defaults so a
/// partially filled post still deserializes; checkboxes post the literal
/// value `true` and fall back to `false` when absent.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FormSubmission {
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub long_app_name: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub hardware_specs: String,
    #[serde(default)]
    pub data_classification: String,
    #[serde(default)]
    pub compliance_pci: bool,
    #[serde(default)]
    pub compliance_gdpr: bool,
    #[serde(default)]
    pub business_owner: String,
    #[serde(default)]
    pub criticality: String,
    #[serde(default)]
    pub admin_pass: String,
}

/// A validated submission, consumed once by the materializer.
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub app_name: Box<str>,
    pub long_app_name: Box<str>,
    pub environment: Environment,
    pub hardware_specs: HardwareSpecs,
    pub data_classification: DataClassification,
    pub compliance_pci: bool,
    pub compliance_gdpr: bool,
    pub business_owner: Box<str>,
    pub criticality: Criticality,
    pub admin_pass: Secret,
}

fn required_field(
    errors: &mut Vec<Box<str>>,
    label: &str,
    value: &str,
) -> Box<str> {
    let value = value.trim();
    if value.is_empty() {
        errors.push(format!("{label} is required.").into());
    }
    value.into()
}

fn choice_field<T: FromStr>(
    errors: &mut Vec<Box<str>>,
    label: &str,
    value: &str,
    choices: &str,
) -> Option<T> {
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            if value.is_empty() {
                errors.push(format!("{label} is required.").into());
            } else {
                errors.push(
                    format!("{label} must be one of: {choices}.").into(),
                );
            }
            None
        },
    }
}

impl FormSubmission {
    /// Check required fields and choice membership. All problems are
    /// collected so the form can be re-rendered with the full list.
    pub fn validate(&self) -> Result<SubmissionRecord, Vec<Box<str>>> {
        let mut errors: Vec<Box<str>> = Vec::new();

        let app_name = required_field(&mut errors, "App name", &self.app_name);
        let long_app_name =
            required_field(&mut errors, "Long app name", &self.long_app_name);
        let business_owner = required_field(
            &mut errors,
            "Business owner",
            &self.business_owner,
        );
        let admin_pass =
            required_field(&mut errors, "Admin password", &self.admin_pass);

        let environment = choice_field::<Environment>(
            &mut errors,
            "Environment",
            &self.environment,
            "dev, prod",
        );
        let hardware_specs = choice_field::<HardwareSpecs>(
            &mut errors,
            "Hardware specs",
            &self.hardware_specs,
            "basic, high",
        );
        let data_classification = choice_field::<DataClassification>(
            &mut errors,
            "Data classification",
            &self.data_classification,
            "low, medium, high",
        );
        let criticality = choice_field::<Criticality>(
            &mut errors,
            "Criticality",
            &self.criticality,
            "low, medium, high",
        );

        match (environment, hardware_specs, data_classification, criticality)
        {
            (
                Some(environment),
                Some(hardware_specs),
                Some(data_classification),
                Some(criticality),
            ) if errors.is_empty() => Ok(SubmissionRecord {
                app_name,
                long_app_name,
                environment,
                hardware_specs,
                data_classification,
                compliance_pci: self.compliance_pci,
                compliance_gdpr: self.compliance_gdpr,
                business_owner,
                criticality,
                admin_pass: Secret::new(admin_pass),
            }),
            _ => Err(errors),
        }
    }
}
