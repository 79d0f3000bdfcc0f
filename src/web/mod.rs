pub mod widget;

use crate::config::CourseRegistry;

const ADMIN_PAGE: &str = include_str!("admin.html");

/// Admin page with the course list inlined for the course picker.
pub fn admin_page(courses: &CourseRegistry) -> String {
    let courses = serde_json::to_string(&courses.summaries())
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/");
    ADMIN_PAGE.replace("__COURSES__", &courses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CourseConfig;

    #[test]
    fn test_admin_page_lists_courses_without_keys() {
        let courses = CourseRegistry::new(vec![
            CourseConfig::new("k1", "Course </script>", "secret"),
        ]);
        let html = admin_page(&courses);
        assert!(html.contains("\"key\":\"k1\""));
        assert!(html.contains("Course <\\/script>"));
        assert!(!html.contains("secret"));
        assert!(!html.contains("__COURSES__"));
    }
}
