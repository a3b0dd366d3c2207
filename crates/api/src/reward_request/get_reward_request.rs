use crate::error::FestivoError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use festivo_api_structs::get_reward_request::*;
use festivo_domain::{RewardRequest, ID};
use festivo_infra::Context;

pub async fn get_reward_request_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, FestivoError> {
    let (user_id, policy) = protect_route(&http_req)?;

    let usecase = GetRewardRequestUseCase {
        request_id: path_params.request_id.clone(),
        user_id,
        can_view_all: policy.authorize(&[Permission::ViewAllRewardRequests]),
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|request| HttpResponse::Ok().json(APIResponse::new(request)))
        .map_err(FestivoError::from)
}

#[derive(Debug)]
pub struct GetRewardRequestUseCase {
    pub request_id: ID,
    pub user_id: ID,
    /// Whether the caller may read requests belonging to other users
    pub can_view_all: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    NotOwner,
}

impl From<UseCaseError> for FestivoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(request_id) => Self::NotFound(format!(
                "The reward request with id: {}, was not found.",
                request_id
            )),
            UseCaseError::NotOwner => {
                Self::Forbidden("Only the requesting user can view this reward request".into())
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRewardRequestUseCase {
    type Response = RewardRequest;

    type Error = UseCaseError;

    const NAME: &'static str = "GetRewardRequest";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let request = ctx
            .repos
            .reward_requests
            .find(&self.request_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.request_id.clone()))?;

        if request.user_id != self.user_id && !self.can_view_all {
            return Err(UseCaseError::NotOwner);
        }

        Ok(request)
    }
}

impl PermissionBoundary for GetRewardRequestUseCase {
    fn permissions(&self) -> Vec<Permission> {
        Vec::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Utc;

    #[actix_web::main]
    #[test]
    async fn owner_reads_own_request() {
        let ctx = Context::create_inmemory();
        let owner = ID::new();
        let request = RewardRequest::new(owner.clone(), ID::new(), ID::new(), None, Utc::now());
        ctx.repos.reward_requests.insert(&request).await.unwrap();

        let mut usecase = GetRewardRequestUseCase {
            request_id: request.id.clone(),
            user_id: owner,
            can_view_all: false,
        };
        assert_eq!(usecase.execute(&ctx).await.unwrap().id, request.id);
    }

    #[actix_web::main]
    #[test]
    async fn stranger_is_refused_but_a_viewer_is_not() {
        let ctx = Context::create_inmemory();
        let request = RewardRequest::new(ID::new(), ID::new(), ID::new(), None, Utc::now());
        ctx.repos.reward_requests.insert(&request).await.unwrap();

        let mut usecase = GetRewardRequestUseCase {
            request_id: request.id.clone(),
            user_id: ID::new(),
            can_view_all: false,
        };
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::NotOwner
        );

        let mut usecase = GetRewardRequestUseCase {
            request_id: request.id.clone(),
            user_id: ID::new(),
            can_view_all: true,
        };
        assert!(usecase.execute(&ctx).await.is_ok());
    }

    #[actix_web::main]
    #[test]
    async fn unknown_request_is_not_found() {
        let ctx = Context::create_inmemory();
        let mut usecase = GetRewardRequestUseCase {
            request_id: ID::new(),
            user_id: ID::new(),
            can_view_all: true,
        };
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::NotFound(usecase.request_id.clone())
        );
    }
}
