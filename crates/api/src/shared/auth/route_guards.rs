use super::policy::{Policy, Role};
use crate::error::FestivoError;
use actix_web::HttpRequest;
use festivo_domain::ID;
use std::str::FromStr;
use tracing::warn;

const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLES_HEADER: &str = "x-user-roles";

fn parse_roles(header_value: &str) -> Vec<Role> {
    header_value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| match Role::from_str(part) {
            Ok(role) => Some(role),
            Err(()) => {
                warn!("Skipping unrecognized role in {}: {}", USER_ROLES_HEADER, part);
                None
            }
        })
        .collect()
}

/// Protect a route with the identity headers set by the authentication
/// gateway. Returns the caller id together with the `Policy` derived
/// from their roles.
pub fn protect_route(http_req: &HttpRequest) -> Result<(ID, Policy), FestivoError> {
    let user_id = http_req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            FestivoError::Unauthorized(format!(
                "Missing or malformed `{}` header on the request",
                USER_ID_HEADER
            ))
        })?;
    let user_id = ID::from_str(user_id)
        .map_err(|e| FestivoError::Unauthorized(e.to_string()))?;

    let roles = http_req
        .headers()
        .get(USER_ROLES_HEADER)
        .and_then(|header| header.to_str().ok())
        .map(parse_roles)
        .unwrap_or_default();

    Ok((user_id, Policy::new(roles)))
}
