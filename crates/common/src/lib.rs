pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_type_ok() {
        let s = types::Status::ok();
        assert_eq!(s.status, "OK");
        assert_eq!(serde_json::to_value(&s).unwrap(), serde_json::json!({"status": "OK"}));
    }

    #[test]
    fn error_body_shape() {
        let body = types::ErrorBody::new("Not found");
        assert_eq!(serde_json::to_value(&body).unwrap(), serde_json::json!({"error": "Not found"}));
    }
}
