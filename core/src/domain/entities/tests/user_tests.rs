//! Unit tests for the user identity

use uuid::Uuid;

use crate::domain::entities::user::{User, ROLE_USER};

#[test]
fn test_user_always_has_base_role() {
    let user = User::new(Uuid::new_v4(), "ana@school.test", vec!["ROLE_TEACHER".to_string()]);
    assert_eq!(user.roles, vec!["ROLE_TEACHER".to_string(), ROLE_USER.to_string()]);

    let user = User::new(Uuid::new_v4(), "bo@school.test", vec![ROLE_USER.to_string()]);
    assert_eq!(user.roles, vec![ROLE_USER.to_string()]);
}

#[test]
fn test_subject_claims_from_user() {
    let id = Uuid::new_v4();
    let user = User::new(id, "ana@school.test", vec!["ROLE_SECRETARY".to_string()]);

    let claims = user.subject_claims();
    assert_eq!(claims.sub, id.to_string());
    assert_eq!(claims.email, "ana@school.test");
    assert_eq!(claims.roles, user.roles);
    assert_eq!(user.subject_identifier(), "ana@school.test");
}
