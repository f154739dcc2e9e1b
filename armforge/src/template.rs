use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::{app_config::AppConfigProvider, form::SubmissionRecord};

/// The `parameters.<key>.value` leaves a submission overwrites.
pub const PARAMETER_KEYS: [&str; 10] = [
    "appName",
    "longAppName",
    "environment",
    "hardwareSpecs",
    "dataClassification",
    "compliancePCI",
    "complianceGDPR",
    "businessOwner",
    "criticality",
    "adminPass",
];

/// The static parameter-file skeleton. Verified on load: a skeleton without
/// all expected parameter leaves is rejected before the server starts.
pub struct Skeleton {
    doc: Value,
}

impl Skeleton {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let doc: Value =
            serde_json::from_str(raw).context("skeleton is not valid JSON")?;

        let Some(parameters) = doc.get("parameters").and_then(Value::as_object)
        else {
            anyhow::bail!("skeleton has no `parameters` object");
        };
        for key in PARAMETER_KEYS {
            let has_value_leaf = parameters
                .get(key)
                .and_then(Value::as_object)
                .is_some_and(|p| p.contains_key("value"));
            if !has_value_leaf {
                anyhow::bail!(
                    "skeleton parameter `{key}` is missing its `value` leaf"
                );
            }
        }

        Ok(Self { doc })
    }

    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path).await.with_context(|| {
            format!("could not read skeleton: {}", path.display())
        })?;
        Self::parse(&raw)
            .with_context(|| format!("invalid skeleton: {}", path.display()))
    }

    /// Copy the record into the parameter leaves and stamp a fresh filename.
    /// Everything outside the ten known leaves is left untouched. The admin
    /// password is written as its digest marker, never as plaintext.
    pub fn materialize(&self, record: &SubmissionRecord) -> GeneratedDocument {
        let mut doc = self.doc.clone();
        {
            let parameters = doc
                .get_mut("parameters")
                .and_then(Value::as_object_mut)
                .expect("verified by Skeleton::parse");
            let mut set = |key: &str, value: Value| {
                parameters[key]["value"] = value;
            };

            set("appName", record.app_name.as_ref().into());
            set("longAppName", record.long_app_name.as_ref().into());
            set("environment", record.environment.to_string().into());
            set("hardwareSpecs", record.hardware_specs.to_string().into());
            set(
                "dataClassification",
                record.data_classification.to_string().into(),
            );
            set("compliancePCI", record.compliance_pci.into());
            set("complianceGDPR", record.compliance_gdpr.into());
            set("businessOwner", record.business_owner.as_ref().into());
            set("criticality", record.criticality.to_string().into());
            set("adminPass", record.admin_pass.digest_marker().into());
        }

        GeneratedDocument {
            filename: generate_filename(chrono::Local::now().date_naive()),
            doc,
        }
    }
}

/// Where request handling gets its skeleton from.
#[derive(Clone)]
pub enum SkeletonSource {
    /// Loaded once at startup and shared across requests.
    Cached(Arc<Skeleton>),
    /// Re-read on every submission so the file can be edited live.
    Reload(Arc<PathBuf>),
}

impl SkeletonSource {
    /// Load and verify the skeleton. Failure here is fatal; the server never
    /// starts without a usable template.
    pub async fn init(
        config: &impl AppConfigProvider,
        path: &Path,
    ) -> anyhow::Result<Self> {
        let skeleton = Skeleton::load(path).await?;
        Ok(if config.is_dev_mode() {
            tracing::debug!(
                path = %path.display(),
                "Dev mode: skeleton will be re-read on every submission."
            );
            Self::Reload(Arc::new(path.to_path_buf()))
        } else {
            Self::Cached(Arc::new(skeleton))
        })
    }

    pub async fn get(&self) -> anyhow::Result<Arc<Skeleton>> {
        match self {
            Self::Cached(skeleton) => Ok(Arc::clone(skeleton)),
            Self::Reload(path) => Ok(Arc::new(Skeleton::load(path).await?)),
        }
    }
}

/// A materialized parameter file. Identity is the generated filename; the
/// document is written once and never mutated again.
pub struct GeneratedDocument {
    filename: Box<str>,
    doc: Value,
}

impl GeneratedDocument {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn document(&self) -> &Value {
        &self.doc
    }

    /// Pretty-printed body (4-space indent, trailing newline), the shape
    /// deployment tooling expects to pick up.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(1024);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser =
            serde_json::Serializer::with_formatter(&mut body, formatter);
        self.doc
            .serialize(&mut ser)
            .expect("JSON document serialization cannot fail");
        body.push(b'\n');
        body
    }
}

/// `{YYYY_MM_DD}_ARM_{7 hex chars}.json`, the random suffix drawn from a v4
/// UUID. Collisions are left to the suffix entropy.
pub fn generate_filename(date: NaiveDate) -> Box<str> {
    let uid = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_ARM_{}.json", date.format("%Y_%m_%d"), &uid[..7]).into()
}

/// Whether a name could have been produced by [`generate_filename`]. The
/// confirmation page rejects everything else.
pub fn is_generated_name(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".json") else {
        return false;
    };
    let stem = stem.as_bytes();
    if stem.len() != 22 {
        return false;
    }
    let (date, rest) = stem.split_at(10);
    let (tag, suffix) = rest.split_at(5);

    tag == b"_ARM_" &&
        date.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'_',
            _ => b.is_ascii_digit(),
        }) &&
        suffix
            .iter()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(b))
}
