/// Wire and view types exchanged with the inference backend.
/// Field names follow the backend's JSON exactly.

use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Selected file
// ---------------------------------------------------------------------------

/// An image picked or dropped by the user, held only for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Only `image/*` uploads are forwarded to the backend.
    pub fn is_image(&self) -> bool {
        self.content_type
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
    }

    /// Inline `data:` URL used for the uploaded-image preview.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

// ---------------------------------------------------------------------------
// Analysis result (POST /analyze)
// ---------------------------------------------------------------------------

/// Response of `POST /analyze`.
///
/// Every field is optional: partial payloads render whatever they carry, and
/// empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub blip_report: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_report: Option<StructuredReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReport {
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub biological_causes: Option<String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub pathological_analysis: Option<String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub environmental_factors: Option<String>,
}

impl AnalysisResult {
    pub fn has_diagnosis(&self) -> bool {
        self.diagnosis.is_some()
    }

    /// The structured report, if at least one of its parts is present.
    pub fn report(&self) -> Option<&StructuredReport> {
        self.structured_report.as_ref().filter(|r| !r.is_empty())
    }

    /// Encode for a hidden form field so follow-up forms can re-render this result.
    pub fn to_hidden_field(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Inverse of [`AnalysisResult::to_hidden_field`]. Blank input means "no analysis yet".
    pub fn from_hidden_field(raw: &str) -> crate::Result<Option<Self>> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(raw)?))
    }
}

impl StructuredReport {
    pub fn is_empty(&self) -> bool {
        self.biological_causes.is_none()
            && self.pathological_analysis.is_none()
            && self.environmental_factors.is_none()
    }
}

// ---------------------------------------------------------------------------
// Chat (POST /chat)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

/// Response body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub answer: String,
}

/// A question together with the answer the backend gave for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatAnswer {
    pub question: String,
    pub answer: String,
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
