// src/analysis/result.rs
use serde::Deserialize;
use serde_json::Value;

// Backends may send findings either as bullet text or as a ready-made list
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Findings {
    Text(String),
    List(Vec<String>),
}

impl Default for Findings {
    fn default() -> Self {
        Findings::Text(String::new())
    }
}

#[derive(Deserialize)]
struct ResultFields {
    #[serde(rename = "fileName", default)]
    file_name: Option<String>,
    #[serde(default)]
    findings: Findings,
    #[serde(default)]
    confidence: Option<String>,
    #[serde(default)]
    disclaimer: String,
}

// The payload is kept exactly as received so the chat context preserves the
// backend's key order, nulls and any fields not modelled here
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(try_from = "Value")]
pub struct AnalysisResult {
    pub file_name: Option<String>,
    pub findings: Findings,
    pub confidence: Option<String>,
    pub disclaimer: String,
    raw: Value,
}

impl TryFrom<Value> for AnalysisResult {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let fields = ResultFields::deserialize(&raw)?;
        Ok(Self {
            file_name: fields.file_name,
            findings: fields.findings,
            confidence: fields.confidence,
            disclaimer: fields.disclaimer,
            raw,
        })
    }
}

impl AnalysisResult {
    pub fn findings_list(&self) -> Vec<String> {
        super::parse_findings(&self.findings)
    }

    /// Confidence text, if the backend supplied a non-empty value.
    pub fn confidence_text(&self) -> Option<&str> {
        self.confidence
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// The analysis context forwarded with every chat question: the backend
    /// payload pretty-printed as JSON with two-space indentation.
    pub fn to_context(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_payload() {
        let body = r#"{
            "fileName": "chest.png",
            "findings": "The model predicts the class: Pneumonia.",
            "confidence": "91.20%",
            "disclaimer": "This is an AI-generated analysis from your custom-trained model."
        }"#;

        let result: AnalysisResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.file_name.as_deref(), Some("chest.png"));
        assert_eq!(
            result.findings,
            Findings::Text("The model predicts the class: Pneumonia.".to_string())
        );
        assert_eq!(result.confidence_text(), Some("91.20%"));
    }

    #[test]
    fn accepts_structured_findings() {
        let body = r#"{"findings": ["Opacity", "Effusion"], "disclaimer": "d"}"#;
        let result: AnalysisResult = serde_json::from_str(body).unwrap();
        assert_eq!(
            result.findings,
            Findings::List(vec!["Opacity".to_string(), "Effusion".to_string()])
        );
        assert_eq!(result.confidence_text(), None);
    }

    #[test]
    fn blank_confidence_is_treated_as_missing() {
        let body = r#"{"findings": "x", "confidence": "  ", "disclaimer": "d"}"#;
        let result: AnalysisResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.confidence_text(), None);
    }

    #[test]
    fn rejects_unreadable_findings() {
        assert!(serde_json::from_str::<AnalysisResult>(r#"{"findings": 42}"#).is_err());
    }

    #[test]
    fn context_matches_backend_payload_order_and_nulls() {
        let body = r#"{"zeta": 1, "findings": "x", "confidence": null, "disclaimer": "d", "alpha": "vgg16"}"#;
        let result: AnalysisResult = serde_json::from_str(body).unwrap();

        assert_eq!(result.confidence, None);
        assert_eq!(
            result.to_context(),
            "{\n  \"zeta\": 1,\n  \"findings\": \"x\",\n  \"confidence\": null,\n  \"disclaimer\": \"d\",\n  \"alpha\": \"vgg16\"\n}"
        );
    }
}
