use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetTemplate {
    #[default]
    Enrolled,
    Waitlist,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetPreference {
    pub template: WidgetTemplate,
    #[serde(default)]
    pub custom_text: String,
    #[serde(default = "default_animate")]
    pub animate: bool,
}

impl Default for WidgetPreference {
    fn default() -> Self {
        Self {
            template: WidgetTemplate::default(),
            custom_text: String::new(),
            animate: default_animate(),
        }
    }
}

fn default_animate() -> bool {
    true
}

/// Rendered widget as served to the embed script.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetPayload {
    pub id: String,
    pub count: u64,
    pub text: String,
    pub animate: bool,
}
