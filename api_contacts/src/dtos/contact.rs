use common::validation::NAME_REGEX;
use db::dtos::contact::{ContactFilter, ContactPatch};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateContactRequest {
    #[validate(regex(path = *NAME_REGEX, message = "must contain only letters and spaces"))]
    pub name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub phone: String,
    #[serde(default)]
    pub favorite: bool,
}

/// Partial update of the contact details. Unknown fields (`favorite`
/// included) are rejected and at least one field must be present.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateContactRequest {
    #[validate(regex(path = *NAME_REGEX, message = "must contain only letters and spaces"))]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "is required"))]
    pub phone: Option<String>,
}

impl From<UpdateContactRequest> for ContactPatch {
    fn from(req: UpdateContactRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
        }
    }
}

/// `{}` flips the flag.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FavoriteRequest {
    pub favorite: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub favorite: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl From<ListQuery> for ContactFilter {
    fn from(query: ListQuery) -> Self {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let page = query.page.unwrap_or(1).max(1);
        Self {
            favorite: query.favorite,
            limit,
            offset: (page - 1) * limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, None, 20, 0)]
    #[case(Some(3), Some(10), 10, 20)]
    #[case(Some(0), Some(1000), MAX_PAGE_SIZE, 0)]
    #[case(Some(-2), Some(-5), 1, 0)]
    fn list_query_becomes_bounded_filter(
        #[case] page: Option<i64>,
        #[case] limit: Option<i64>,
        #[case] expected_limit: i64,
        #[case] expected_offset: i64,
    ) {
        let filter = ContactFilter::from(ListQuery {
            favorite: None,
            page,
            limit,
        });
        assert_eq!(filter.limit, expected_limit);
        assert_eq!(filter.offset, expected_offset);
    }

    #[test]
    fn create_request_rules() {
        let valid = CreateContactRequest {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone: "555-0100".to_string(),
            favorite: false,
        };
        assert!(valid.validate().is_ok());

        let bad_name = CreateContactRequest {
            name: "Jane99".to_string(),
            ..valid
        };
        let errors = bad_name.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[rstest]
    #[case(r#"{"name":"Jane","nickname":"J"}"#)]
    #[case(r#"{"favorite":true}"#)]
    fn update_request_rejects_unknown_fields(#[case] body: &str) {
        assert!(serde_json::from_str::<UpdateContactRequest>(body).is_err());
    }

    #[test]
    fn create_request_rejects_unknown_fields() {
        let parsed: Result<CreateContactRequest, _> = serde_json::from_str(
            r#"{"name":"Jane","email":"jane@x.com","phone":"1","nickname":"J"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn update_request_with_one_field_is_a_patch() {
        let parsed: UpdateContactRequest = serde_json::from_str(r#"{"phone":"1"}"#).unwrap();
        assert!(parsed.validate().is_ok());
        assert!(!ContactPatch::from(parsed).is_empty());
    }
}
