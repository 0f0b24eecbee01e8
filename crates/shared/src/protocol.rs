use serde::{Deserialize, Serialize};

/// Body of `POST /api/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

/// Body of `PUT /api/users/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
}

pub fn users_route() -> &'static str {
    "/api/users"
}

pub fn user_route(id: crate::domain::UserId) -> String {
    format!("{}/{}", users_route(), id.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{User, UserId},
        error::{ApiError, ErrorCode},
    };

    #[test]
    fn user_id_serializes_as_bare_integer() {
        let user = User {
            id: UserId(5),
            name: "A".to_string(),
            email: "a@x.com".to_string(),
        };
        let json = serde_json::to_value(&user).expect("json");
        assert_eq!(
            json,
            serde_json::json!({ "id": 5, "name": "A", "email": "a@x.com" })
        );
    }

    #[test]
    fn error_code_uses_snake_case() {
        let err = ApiError::new(ErrorCode::NotFound, "user not found");
        let json = serde_json::to_string(&err).expect("json");
        assert!(json.contains("\"not_found\""), "unexpected json: {json}");
    }

    #[test]
    fn user_route_includes_id() {
        assert_eq!(user_route(UserId(42)), "/api/users/42");
    }
}
