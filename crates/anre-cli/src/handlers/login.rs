//! Login command handler.
//!
//! Sends the credentials to the running server and prints its raw answer.

use anre_runtime::ProxyApiClient;
use anre_runtime::api::{Login4399Request, LoginOfficialRequest, LoginSAuthRequest};

use crate::commands::LoginMethod;
use crate::error::CliError;

pub async fn execute(port: u16, method: LoginMethod) -> Result<(), CliError> {
    let client = ProxyApiClient::new(port)?;

    let answer = match method {
        LoginMethod::FourThreeNineNine {
            account,
            password,
            captcha,
        } => {
            client
                .login_4399(&Login4399Request {
                    account,
                    password,
                    captcha,
                })
                .await?
        }
        LoginMethod::Sauth { sauth } => client.login_sauth(&LoginSAuthRequest { sauth }).await?,
        LoginMethod::Official {
            account,
            password,
            device_id,
            device_key,
        } => {
            client
                .login_official(&LoginOfficialRequest {
                    account,
                    password,
                    device_id,
                    device_key,
                })
                .await?
        }
    };

    let pretty = serde_json::to_string_pretty(&answer).map_err(|e| CliError::Core(e.to_string()))?;
    println!("{pretty}");
    Ok(())
}
