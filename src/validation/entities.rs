//! Validators for the v1 entity controllers.

use crate::validation::{ValidatorRegistry, Validator};

/// Build the registry with every v1 validator.
pub fn registry() -> ValidatorRegistry {
    let mut registry = ValidatorRegistry::new();
    registry
        .register("v1", "programs", None, programs)
        .register("v1", "solutions", None, solutions)
        .register("v1", "tasks", None, tasks)
        .register("v1", "certificates", None, certificates)
        .register("v1", "observations", None, observations)
        .register("v1", "configurations", None, configurations)
        .register("v1", "library", Some("categories"), library_categories);
    registry
}

/// Values a document `status` may be filtered on.
pub const STATUSES: &[&str] = &["active", "inactive", "draft", "published", "completed"];

/// Rules every entity shares: methods addressing one document need a
/// well-formed `_id`; `list` only filters on known statuses.
fn document_rules(method: &str, validator: &mut Validator<'_>, label: &str) {
    match method {
        "update" | "details" | "delete" | "download" => {
            validator
                .id()
                .exists(&format!("{} id is required.", label))
                .is_id(&format!("{} id is invalid.", label));
        }
        "list" => {
            validator
                .query("status")
                .is_in(STATUSES, &format!("{} status is invalid.", label));
        }
        _ => {}
    }
}

fn programs(method: &str, validator: &mut Validator<'_>) {
    if method == "create" {
        validator
            .body("name")
            .exists("Program name is required.")
            .not_empty("Program name is required.");
        validator
            .body("externalId")
            .exists("Program externalId is required.")
            .not_empty("Program externalId is required.");
    }
    document_rules(method, validator, "Program");
}

fn solutions(method: &str, validator: &mut Validator<'_>) {
    if method == "create" {
        validator
            .body("name")
            .exists("Solution name is required.")
            .not_empty("Solution name is required.");
        validator
            .body("programId")
            .exists("Program id is required.")
            .is_id("Program id is invalid.");
        validator.body("type").is_in(
            &["improvementProject", "observation", "survey"],
            "Solution type is invalid.",
        );
    }
    document_rules(method, validator, "Solution");
}

fn tasks(method: &str, validator: &mut Validator<'_>) {
    if method == "create" {
        validator
            .body("title")
            .exists("Title is required.")
            .not_empty("Title is required.");
        validator
            .body("type")
            .is_in(&["simple", "content", "observation"], "Task type is invalid.");
    }
    document_rules(method, validator, "Task");
}

fn certificates(method: &str, validator: &mut Validator<'_>) {
    if method == "create" {
        validator
            .body("name")
            .exists("Certificate name is required.")
            .not_empty("Certificate name is required.");
    }
    document_rules(method, validator, "Certificate");
}

fn observations(method: &str, validator: &mut Validator<'_>) {
    if method == "create" {
        validator
            .body("solutionId")
            .exists("Solution id is required.")
            .is_id("Solution id is invalid.");
    }
    document_rules(method, validator, "Observation");
}

fn configurations(method: &str, validator: &mut Validator<'_>) {
    if method == "create" {
        validator
            .body("code")
            .exists("Configuration code is required.")
            .not_empty("Configuration code is required.");
    }
    document_rules(method, validator, "Configuration");
}

fn library_categories(method: &str, validator: &mut Validator<'_>) {
    if method == "create" {
        validator
            .body("externalId")
            .exists("Category externalId is required.")
            .not_empty("Category externalId is required.");
        validator
            .body("name")
            .exists("Category name is required.")
            .not_empty("Category name is required.");
    }
    document_rules(method, validator, "Category");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::http::ApiRequest;
    use crate::routing::RouteDescriptor;

    fn run(descriptor: RouteDescriptor, body: serde_json::Value) -> Vec<String> {
        let registry = registry();
        let request = ApiRequest::for_test(descriptor.clone(), body);
        let validate = registry.get(&descriptor).expect("validator registered");
        let mut validator = Validator::new(&request);
        validate(&descriptor.method, &mut validator);
        validator.finish().iter().map(|e| e.message.clone()).collect()
    }

    #[test]
    fn test_task_create_requires_title() {
        let messages = run(
            RouteDescriptor::new("v1", "tasks", None, "create", None),
            json!({ "description": "no title" }),
        );
        assert_eq!(messages, vec!["Title is required."]);
    }

    #[test]
    fn test_task_create_accepts_title() {
        let messages = run(
            RouteDescriptor::new("v1", "tasks", None, "create", None),
            json!({ "title": "Plant trees", "type": "simple" }),
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn test_details_requires_well_formed_id() {
        let messages = run(
            RouteDescriptor::new("v1", "programs", None, "details", Some("42")),
            json!({}),
        );
        assert_eq!(messages, vec!["Program id is invalid."]);

        let messages = run(
            RouteDescriptor::new("v1", "programs", None, "details", None),
            json!({}),
        );
        assert_eq!(messages, vec!["Program id is required."]);
    }

    #[test]
    fn test_download_requires_well_formed_id() {
        let messages = run(
            RouteDescriptor::new("v1", "certificates", None, "download", Some("../etc")),
            json!({}),
        );
        assert_eq!(messages, vec!["Certificate id is invalid."]);
    }

    #[test]
    fn test_list_status_filter_is_checked() {
        let descriptor = RouteDescriptor::new("v1", "tasks", None, "list", None);
        let registry = registry();
        let validate = registry.get(&descriptor).expect("validator registered");

        let mut request = ApiRequest::for_test(descriptor.clone(), json!({}));
        request.query.insert("status".into(), "archived".into());
        let mut validator = Validator::new(&request);
        validate("list", &mut validator);
        let errors = validator.finish();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.iter().next().unwrap().param, "status");

        request.query.insert("status".into(), "active".into());
        let mut validator = Validator::new(&request);
        validate("list", &mut validator);
        assert!(validator.finish().is_empty());
    }

    #[test]
    fn test_list_without_filters_passes() {
        let messages = run(
            RouteDescriptor::new("v1", "solutions", None, "list", None),
            json!(null),
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn test_library_categories_file_validator() {
        let messages = run(
            RouteDescriptor::new("v1", "library", Some("categories"), "create", None),
            json!({ "name": "Health" }),
        );
        assert_eq!(messages, vec!["Category externalId is required."]);
    }
}
