use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims for access tokens.
///
/// The store id is the tenant scope of every authenticated request; handlers
/// take it from here and never from client input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Store user ID (subject claim)
    pub sub: String,
    /// Store user's email address
    pub email: String,
    /// Store the user belongs to
    pub store_id: i64,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "7".to_string(),
            email: "owner@shop.test".to_string(),
            store_id: 42,
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"7""#));
        assert!(serialized.contains(r#""store_id":42"#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"9","email":"clerk@shop.test","store_id":3,"exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "9");
        assert_eq!(claims.store_id, 3);
        assert_eq!(claims.exp, 9999999999);
    }
}
