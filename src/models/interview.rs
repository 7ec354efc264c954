use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{Error, Result};
use crate::store::Document;

pub const INTERVIEWS_COLLECTION: &str = "interviews";

/// One step of an interview process. Owned by its interview, no id of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Interview fields as the user enters them; everything except `id` and `createdAt`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_salary_range", skip_on_field_errors = false))]
pub struct InterviewDraft {
    #[validate(custom(function = "not_blank"))]
    pub company: String,
    #[serde(
        default,
        deserialize_with = "empty_link_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(url)]
    pub vacancy_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hr_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_telegram: Option<String>,
    #[serde(
        default,
        rename = "contactWhatsApp",
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary_from: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary_to: Option<Decimal>,
    #[serde(default)]
    #[validate(nested)]
    pub stages: Vec<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl InterviewDraft {
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: InterviewDraft,
}

impl Interview {
    pub fn from_document(doc: Document) -> Result<Self> {
        let details: InterviewDraft = serde_json::from_value(doc.data)?;
        Ok(Self {
            id: doc.id,
            created_at: doc.created_at,
            details,
        })
    }
}

/// Partial update. An absent field is left alone; for the optional fields an
/// explicit `null` clears the stored value (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterviewPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank"))]
    pub company: Option<String>,
    /// `""` clears the link as well.
    #[serde(
        default,
        deserialize_with = "patch_link",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub vacancy_link: Option<Option<String>>,
    #[serde(
        default,
        with = "serde_with::rust::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub hr_name: Option<Option<String>>,
    #[serde(
        default,
        with = "serde_with::rust::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub contact_telegram: Option<Option<String>>,
    #[serde(
        default,
        rename = "contactWhatsApp",
        with = "serde_with::rust::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub contact_whatsapp: Option<Option<String>>,
    #[serde(
        default,
        with = "serde_with::rust::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub contact_phone: Option<Option<String>>,
    #[serde(
        default,
        with = "patch_salary",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>)]
    pub salary_from: Option<Option<Decimal>>,
    #[serde(
        default,
        with = "patch_salary",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>)]
    pub salary_to: Option<Option<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub stages: Option<Vec<Stage>>,
    #[serde(
        default,
        with = "serde_with::rust::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub result: Option<Option<String>>,
}

impl InterviewPatch {
    pub fn stages(stages: Vec<Stage>) -> Self {
        Self {
            stages: Some(stages),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns `draft` with the supplied fields overwritten or cleared.
    pub fn apply_to(&self, draft: &InterviewDraft) -> InterviewDraft {
        fn set<T: Clone>(target: &mut Option<T>, change: &Option<Option<T>>) {
            if let Some(value) = change {
                *target = value.clone();
            }
        }

        let mut merged = draft.clone();
        if let Some(company) = &self.company {
            merged.company = company.clone();
        }
        set(&mut merged.vacancy_link, &self.vacancy_link);
        set(&mut merged.hr_name, &self.hr_name);
        set(&mut merged.contact_telegram, &self.contact_telegram);
        set(&mut merged.contact_whatsapp, &self.contact_whatsapp);
        set(&mut merged.contact_phone, &self.contact_phone);
        set(&mut merged.salary_from, &self.salary_from);
        set(&mut merged.salary_to, &self.salary_to);
        if let Some(stages) = &self.stages {
            merged.stages = stages.clone();
        }
        set(&mut merged.result, &self.result);
        merged
    }

    /// Top-level document fields carried by this patch; cleared fields map to `null`.
    pub fn to_fields(&self) -> Result<Map<String, JsonValue>> {
        match serde_json::to_value(self)? {
            JsonValue::Object(fields) => Ok(fields),
            other => Err(Error::Internal(format!(
                "interview patch serialized to non-object: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InterviewOrder {
    #[default]
    Newest,
    Oldest,
}

impl InterviewOrder {
    pub fn sort(self, items: &mut [Interview]) {
        match self {
            InterviewOrder::Newest => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            InterviewOrder::Oldest => items.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }
    }
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some(Cow::Borrowed("must not be blank"));
        return Err(err);
    }
    Ok(())
}

fn empty_link_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let link = Option::<String>::deserialize(deserializer)?;
    Ok(link.filter(|link| !link.trim().is_empty()))
}

fn patch_link<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    empty_link_as_none(deserializer).map(Some)
}

/// `Option<Option<Decimal>>` as a JSON number, `null` or an absent key.
mod patch_salary {
    use super::*;

    pub fn serialize<S>(
        value: &Option<Option<Decimal>>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(salary) => rust_decimal::serde::float_option::serialize(salary, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> std::result::Result<Option<Option<Decimal>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        rust_decimal::serde::float_option::deserialize(deserializer).map(Some)
    }
}

fn validate_salary_range(draft: &InterviewDraft) -> std::result::Result<(), ValidationError> {
    if let (Some(from), Some(to)) = (draft.salary_from, draft.salary_to) {
        if from > to {
            let mut err = ValidationError::new("salary_range");
            err.message = Some(Cow::Borrowed("salaryFrom must not exceed salaryTo"));
            err.add_param(Cow::Borrowed("salaryFrom"), &from.to_string());
            err.add_param(Cow::Borrowed("salaryTo"), &to.to_string());
            return Err(err);
        }
    }
    Ok(())
}
