use crate::error::FestivoError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use festivo_api_structs::get_my_reward_requests::*;
use festivo_domain::{RewardRequest, ID};
use festivo_infra::Context;

pub async fn get_my_reward_requests_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, FestivoError> {
    let (user_id, policy) = protect_route(&http_req)?;

    let usecase = GetMyRewardRequestsUseCase {
        user_id,
        event_id: query_params.event_id.clone(),
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|requests| HttpResponse::Ok().json(APIResponse::new(requests)))
        .map_err(FestivoError::from)
}

#[derive(Debug)]
pub struct GetMyRewardRequestsUseCase {
    pub user_id: ID,
    pub event_id: Option<ID>,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for FestivoError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetMyRewardRequestsUseCase {
    type Response = Vec<RewardRequest>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetMyRewardRequests";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        Ok(ctx
            .repos
            .reward_requests
            .find_by_user(&self.user_id, self.event_id.as_ref())
            .await)
    }
}

impl PermissionBoundary for GetMyRewardRequestsUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::ViewOwnRewardRequests]
    }
}
