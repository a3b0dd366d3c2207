use crate::error::FestivoError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use festivo_api_structs::get_reward_requests::*;
use festivo_domain::{RewardRequest, RewardRequestStatus, ID};
use festivo_infra::{Context, RewardRequestQuery};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

pub async fn get_reward_requests_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, FestivoError> {
    let (_user_id, policy) = protect_route(&http_req)?;

    let page = query_params.page.unwrap_or(1);
    let limit = query_params.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let usecase = GetRewardRequestsUseCase {
        page,
        limit,
        event_id: query_params.event_id.clone(),
        user_id: query_params.user_id.clone(),
        status: query_params.status,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|page_res| {
            HttpResponse::Ok().json(APIResponse::new(
                page_res.requests,
                page_res.total,
                page,
                limit,
            ))
        })
        .map_err(FestivoError::from)
}

#[derive(Debug)]
pub struct GetRewardRequestsUseCase {
    pub page: u64,
    pub limit: i64,
    pub event_id: Option<ID>,
    pub user_id: Option<ID>,
    pub status: Option<RewardRequestStatus>,
}

#[derive(Debug)]
pub struct RequestsPage {
    pub requests: Vec<RewardRequest>,
    pub total: u64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidPagination,
    StorageError,
}

impl From<UseCaseError> for FestivoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidPagination => Self::BadClientData(format!(
                "The page must be at least 1 and the limit between 1 and {}",
                MAX_PAGE_SIZE
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRewardRequestsUseCase {
    type Response = RequestsPage;

    type Error = UseCaseError;

    const NAME: &'static str = "GetRewardRequests";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        if self.page < 1 || self.limit < 1 || self.limit > MAX_PAGE_SIZE {
            return Err(UseCaseError::InvalidPagination);
        }

        let query = RewardRequestQuery {
            event_id: self.event_id.clone(),
            user_id: self.user_id.clone(),
            status: self.status,
        };
        let skip = (self.page - 1) * self.limit as u64;

        let (requests, total) = ctx
            .repos
            .reward_requests
            .find_paginated(&query, skip, self.limit)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(RequestsPage { requests, total })
    }
}

impl PermissionBoundary for GetRewardRequestsUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::ViewAllRewardRequests]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, Utc};

    fn browse_all() -> GetRewardRequestsUseCase {
        GetRewardRequestsUseCase {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            event_id: None,
            user_id: None,
            status: None,
        }
    }

    async fn seed_requests(ctx: &Context, count: usize) -> Vec<RewardRequest> {
        let now = Utc::now();
        let mut requests = Vec::new();
        for i in 0..count {
            let request = RewardRequest::new(
                ID::new(),
                ID::new(),
                ID::new(),
                None,
                now - Duration::minutes(i as i64),
            );
            ctx.repos.reward_requests.insert(&request).await.unwrap();
            requests.push(request);
        }
        requests
    }

    #[actix_web::main]
    #[test]
    async fn pages_through_requests_newest_first() {
        let ctx = Context::create_inmemory();
        let requests = seed_requests(&ctx, 5).await;

        let mut usecase = browse_all();
        usecase.limit = 2;
        let page = usecase.execute(&ctx).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.requests.len(), 2);
        assert_eq!(page.requests[0].id, requests[0].id);

        let mut usecase = browse_all();
        usecase.page = 3;
        usecase.limit = 2;
        let page = usecase.execute(&ctx).await.unwrap();
        assert_eq!(page.requests.len(), 1);
        assert_eq!(page.requests[0].id, requests[4].id);
    }

    #[actix_web::main]
    #[test]
    async fn filters_by_user_and_status() {
        let ctx = Context::create_inmemory();
        seed_requests(&ctx, 3).await;

        let user = ID::new();
        let now = Utc::now();
        let mut completed = RewardRequest::new(user.clone(), ID::new(), ID::new(), None, now);
        ctx.repos.reward_requests.insert(&completed).await.unwrap();
        completed
            .resolve(RewardRequestStatus::Completed, None, &ID::new(), now)
            .unwrap();
        ctx.repos
            .reward_requests
            .transition(&completed, RewardRequestStatus::Pending)
            .await
            .unwrap();

        let mut usecase = browse_all();
        usecase.user_id = Some(user);
        let page = usecase.execute(&ctx).await.unwrap();
        assert_eq!(page.total, 1);

        let mut usecase = browse_all();
        usecase.status = Some(RewardRequestStatus::Completed);
        let page = usecase.execute(&ctx).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.requests[0].id, completed.id);

        let mut usecase = browse_all();
        usecase.status = Some(RewardRequestStatus::Failed);
        assert_eq!(usecase.execute(&ctx).await.unwrap().total, 0);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_out_of_range_pagination() {
        let ctx = Context::create_inmemory();

        let mut usecase = browse_all();
        usecase.page = 0;
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::InvalidPagination
        );

        let mut usecase = browse_all();
        usecase.limit = MAX_PAGE_SIZE + 1;
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::InvalidPagination
        );
    }
}
