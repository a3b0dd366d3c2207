use crate::error::FestivoError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use festivo_api_structs::update_reward_request_status::*;
use festivo_domain::{RewardRequest, RewardRequestStatus, StatusTransitionError, ID};
use festivo_infra::{Context, StockDecrementOutcome, TransitionOutcome};
use tracing::warn;

pub async fn update_reward_request_status_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, FestivoError> {
    let (user_id, policy) = protect_route(&http_req)?;

    let body = body.0;
    let usecase = UpdateRewardRequestStatusUseCase {
        request_id: path_params.request_id.clone(),
        target: body.status,
        reason: body.reason,
        processor_id: user_id,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|request| HttpResponse::Ok().json(APIResponse::new(request)))
        .map_err(FestivoError::from)
}

#[derive(Debug)]
pub struct UpdateRewardRequestStatusUseCase {
    pub request_id: ID,
    pub target: RewardRequestStatus,
    pub reason: Option<String>,
    pub processor_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    Transition(StatusTransitionError),
    StockDepleted(ID),
    RewardGone(ID),
    ConcurrentTransition(ID),
    StorageError,
}

impl From<UseCaseError> for FestivoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(request_id) => Self::NotFound(format!(
                "The reward request with id: {}, was not found.",
                request_id
            )),
            UseCaseError::Transition(e @ StatusTransitionError::TerminalState { .. }) => {
                Self::Conflict(e.to_string())
            }
            UseCaseError::Transition(e @ StatusTransitionError::InvalidTarget { .. }) => {
                Self::BadClientData(e.to_string())
            }
            UseCaseError::StockDepleted(request_id) => Self::Conflict(format!(
                "The reward stock was depleted before the request with id: {}, could be completed. The request was marked as failed.",
                request_id
            )),
            UseCaseError::RewardGone(request_id) => Self::Conflict(format!(
                "The reward was removed before the request with id: {}, could be completed. The request was marked as failed.",
                request_id
            )),
            UseCaseError::ConcurrentTransition(request_id) => Self::Conflict(format!(
                "The reward request with id: {}, was processed concurrently by another operator. No changes were applied.",
                request_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateRewardRequestStatusUseCase {
    type Response = RewardRequest;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateRewardRequestStatus";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let mut request = ctx
            .repos
            .reward_requests
            .find(&self.request_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.request_id.clone()))?;

        request
            .can_transition_to(self.target)
            .map_err(UseCaseError::Transition)?;

        // The guard above ran against a snapshot. The conditional write
        // below only lands while the stored record still holds this
        // status, so a concurrent advance cannot be overwritten.
        let prior_status = request.status;

        let now = ctx.sys.get_utc_datetime();
        if self.target == RewardRequestStatus::Completed {
            // Completion pays out, so it must win the stock race first. A
            // losing attempt is redirected to FAILED before the conflict is
            // reported, so the audit trail records the attempt.
            let outcome = ctx
                .repos
                .rewards
                .decrement_stock(&request.reward_id)
                .await
                .map_err(|_| UseCaseError::StorageError)?;

            match outcome {
                StockDecrementOutcome::Ok => {
                    request
                        .resolve(self.target, self.reason.clone(), &self.processor_id, now)
                        .map_err(UseCaseError::Transition)?;
                    request.record_payout(now);
                }
                StockDecrementOutcome::OutOfStock => {
                    warn!(
                        "Reward request {} lost the stock race, marking it failed",
                        request.id
                    );
                    request.fail("Stock depleted during payout".into(), &self.processor_id, now);
                    persist_transition(ctx, &request, prior_status).await?;
                    return Err(UseCaseError::StockDepleted(request.id));
                }
                StockDecrementOutcome::NotFound => {
                    request.fail(
                        "Reward was removed before payout".into(),
                        &self.processor_id,
                        now,
                    );
                    persist_transition(ctx, &request, prior_status).await?;
                    return Err(UseCaseError::RewardGone(request.id));
                }
            }

            if let Err(e) = persist_transition(ctx, &request, prior_status).await {
                // another operator advanced the request first, give the
                // decremented unit back
                if let Err(e) = ctx.repos.rewards.restore_stock(&request.reward_id).await {
                    warn!("Failed to restore a reward stock unit: {:?}", e);
                }
                return Err(e);
            }
            return Ok(request);
        }

        request
            .resolve(self.target, self.reason.clone(), &self.processor_id, now)
            .map_err(UseCaseError::Transition)?;
        persist_transition(ctx, &request, prior_status).await?;

        Ok(request)
    }
}

async fn persist_transition(
    ctx: &Context,
    request: &RewardRequest,
    expected: RewardRequestStatus,
) -> Result<(), UseCaseError> {
    match ctx
        .repos
        .reward_requests
        .transition(request, expected)
        .await
    {
        Ok(TransitionOutcome::Applied) => Ok(()),
        Ok(TransitionOutcome::StaleStatus) => {
            Err(UseCaseError::ConcurrentTransition(request.id.clone()))
        }
        Err(_) => Err(UseCaseError::StorageError),
    }
}

impl PermissionBoundary for UpdateRewardRequestStatusUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::ProcessRewardRequests]
    }
}
