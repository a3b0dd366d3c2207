use crate::error::FestivoError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use festivo_api_structs::get_reward::*;
use festivo_domain::{Reward, ID};
use festivo_infra::Context;

pub async fn get_reward_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, FestivoError> {
    let (_user_id, policy) = protect_route(&http_req)?;

    let usecase = GetRewardUseCase {
        reward_id: path_params.reward_id.clone(),
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|reward| HttpResponse::Ok().json(APIResponse::new(reward)))
        .map_err(FestivoError::from)
}

#[derive(Debug)]
pub struct GetRewardUseCase {
    pub reward_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for FestivoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reward_id) => {
                Self::NotFound(format!("The reward with id: {}, was not found.", reward_id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRewardUseCase {
    type Response = Reward;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReward";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .rewards
            .find(&self.reward_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reward_id.clone()))
    }
}

impl PermissionBoundary for GetRewardUseCase {
    fn permissions(&self) -> Vec<Permission> {
        Vec::new()
    }
}
