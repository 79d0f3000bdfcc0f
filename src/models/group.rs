use serde::{Deserialize, Serialize};

use crate::config::CourseRegistry;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub course_key: String,
    #[serde(rename = "groupName")]
    pub display_name: String,
    /// Group id on the MailerLite side.
    #[serde(rename = "groupId")]
    pub provider_group_id: String,
}

/// Body of `POST /api/groups`. Every field is optional on the wire so that
/// a missing one is reported as a validation error instead of a 422.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroupRequest {
    pub id: Option<String>,
    pub course_key: Option<String>,
    pub group_name: Option<String>,
    pub group_id: Option<String>,
}

impl NewGroupRequest {
    /// Checks required fields and the course credential. Id uniqueness is
    /// enforced by the store, under its lock.
    pub fn validate(self, courses: &CourseRegistry) -> Result<Group, AppError> {
        let (Some(id), Some(course_key), Some(group_name), Some(group_id)) = (
            non_blank(self.id),
            non_blank(self.course_key),
            non_blank(self.group_name),
            non_blank(self.group_id),
        ) else {
            return Err(AppError::BadRequest("Missing required fields".to_string()));
        };

        if !is_url_safe(&id) {
            return Err(AppError::BadRequest(format!(
                "Group id '{}' must contain only letters, digits, '_' or '-'",
                id
            )));
        }

        if !is_numeric_id(&group_id) {
            return Err(AppError::BadRequest(format!(
                "MailerLite group id '{}' must be numeric",
                group_id
            )));
        }

        let course = courses
            .get(&course_key)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown course: {}", course_key)))?;

        if !course.has_credential() {
            return Err(AppError::BadRequest(format!(
                "No API key configured for course: {}",
                course_key
            )));
        }

        Ok(Group {
            id,
            course_key,
            display_name: group_name,
            provider_group_id: group_id,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_url_safe(id: &str) -> bool {
    id.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// MailerLite group ids are plain integers.
pub fn is_numeric_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CourseConfig;

    fn registry() -> CourseRegistry {
        CourseRegistry::new(vec![
            CourseConfig::new("k1", "Course One", "secret"),
            CourseConfig::new("k2", "Course Two", ""),
        ])
    }

    fn request(id: &str, course_key: &str) -> NewGroupRequest {
        NewGroupRequest {
            id: Some(id.to_string()),
            course_key: Some(course_key.to_string()),
            group_name: Some("Cohort February".to_string()),
            group_id: Some("111".to_string()),
        }
    }

    #[test]
    fn test_validate_accepts_complete_request() {
        let group = request("k1_cohort", "k1").validate(&registry()).unwrap();
        assert_eq!(group.id, "k1_cohort");
        assert_eq!(group.course_key, "k1");
        assert_eq!(group.display_name, "Cohort February");
        assert_eq!(group.provider_group_id, "111");
    }

    #[test]
    fn test_validate_rejects_missing_field() {
        let mut req = request("a", "k1");
        req.group_id = Some("   ".to_string());
        assert!(matches!(req.validate(&registry()), Err(AppError::BadRequest(_))));

        let mut req = request("a", "k1");
        req.group_name = None;
        assert!(matches!(req.validate(&registry()), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_course() {
        let err = request("a", "nope").validate(&registry()).unwrap_err();
        assert!(err.to_string().contains("Unknown course"));
    }

    #[test]
    fn test_validate_rejects_course_without_credential() {
        let err = request("a", "k2").validate(&registry()).unwrap_err();
        assert!(err.to_string().contains("No API key"));
    }

    #[test]
    fn test_validate_rejects_unsafe_id() {
        let err = request("a b/c", "k1").validate(&registry()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_validate_rejects_non_numeric_provider_id() {
        for provider_id in ["1?x=y", "../me", "12/34", "abc"] {
            let mut req = request("a", "k1");
            req.group_id = Some(provider_id.to_string());
            let err = req.validate(&registry()).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "accepted {}", provider_id);
        }
    }

    #[test]
    fn test_group_wire_format() {
        let group = request("a", "k1").validate(&registry()).unwrap();
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "a",
                "courseKey": "k1",
                "groupName": "Cohort February",
                "groupId": "111"
            })
        );
    }
}
