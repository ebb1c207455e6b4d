//! Login request bodies.

use serde::{Deserialize, Serialize};

/// `POST /Netease/Auth/4399`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Login4399Request {
    pub account: String,
    pub password: String,
    /// Empty when no captcha was requested.
    #[serde(default)]
    pub captcha: String,
}

/// `POST /Netease/Auth/SAuth`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSAuthRequest {
    pub sauth: String,
}

/// `POST /Netease/Auth/Official`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOfficialRequest {
    pub account: String,
    pub password: String,
    #[serde(rename = "deviceID", default)]
    pub device_id: String,
    #[serde(rename = "deviceKey", default)]
    pub device_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_official_uses_server_field_names() {
        let body = LoginOfficialRequest {
            account: "a@163.com".to_string(),
            password: "secret".to_string(),
            device_id: "dev".to_string(),
            device_key: String::new(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "account": "a@163.com",
                "password": "secret",
                "deviceID": "dev",
                "deviceKey": ""
            })
        );
    }

    #[test]
    fn test_4399_captcha_defaults_to_empty() {
        let body: Login4399Request =
            serde_json::from_value(json!({ "account": "u", "password": "p" })).unwrap();
        assert_eq!(body.captcha, "");
    }
}
