use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    AnalyzeWebsite,
    DetectTech,
    ExtractServices,
    GenerateDescription,
    AutomationRuleFired,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::AnalyzeWebsite => "analyze_website",
            AuditAction::DetectTech => "detect_tech",
            AuditAction::ExtractServices => "extract_services",
            AuditAction::GenerateDescription => "generate_description",
            AuditAction::AutomationRuleFired => "automation_rule_fired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub entity_type: String,
    pub entity_id: Uuid,
    pub action: AuditAction,
    pub details: String,
}

impl AuditEntry {
    pub fn company(company_id: Uuid, action: AuditAction, details: impl Into<String>) -> Self {
        AuditEntry {
            entity_type: "company".to_string(),
            entity_id: company_id,
            action,
            details: details.into(),
        }
    }
}
