use super::verify_conditions::{verify_event_conditions, ConditionCheckError};
use crate::error::FestivoError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use festivo_api_structs::create_reward_request::*;
use festivo_domain::{RewardRequest, ID};
use festivo_infra::{Context, InsertClaimError};
use tracing::error;

pub async fn create_reward_request_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, FestivoError> {
    let (user_id, policy) = protect_route(&http_req)?;

    let body = body.0;
    let usecase = CreateRewardRequestUseCase {
        user_id,
        event_id: body.event_id,
        reward_id: body.reward_id,
        user_memo: body.user_memo,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|request| HttpResponse::Created().json(APIResponse::new(request)))
        .map_err(FestivoError::from)
}

#[derive(Debug)]
pub struct CreateRewardRequestUseCase {
    pub user_id: ID,
    pub event_id: ID,
    pub reward_id: ID,
    pub user_memo: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    EventNotFound(ID),
    RewardNotFound(ID),
    EventNotLive,
    RewardDepleted,
    ConditionsNotMet(String),
    DuplicateRequest,
    ActivitySourceUnavailable(String),
    StorageError,
}

impl From<UseCaseError> for FestivoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EventNotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
            UseCaseError::RewardNotFound(reward_id) => Self::NotFound(format!(
                "The reward with id: {}, was not found for this event.",
                reward_id
            )),
            UseCaseError::EventNotLive => {
                Self::BadClientData("The event is not accepting reward requests right now".into())
            }
            UseCaseError::RewardDepleted => {
                Self::Conflict("The reward stock is depleted".into())
            }
            UseCaseError::ConditionsNotMet(reason) => Self::ConditionsNotMet(reason),
            UseCaseError::DuplicateRequest => Self::Conflict(
                "An active request for this event and reward already exists".into(),
            ),
            UseCaseError::ActivitySourceUnavailable(e) => Self::UpstreamUnavailable(e),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateRewardRequestUseCase {
    type Response = RewardRequest;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateRewardRequest";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::EventNotFound(self.event_id.clone()))?;

        let now = ctx.sys.get_utc_datetime();
        if !event.is_live_at(&now) {
            return Err(UseCaseError::EventNotLive);
        }

        let reward = ctx
            .repos
            .rewards
            .find_in_event(&self.reward_id, &self.event_id)
            .await
            .ok_or_else(|| UseCaseError::RewardNotFound(self.reward_id.clone()))?;

        // Early precheck only. The authoritative stock check is the
        // conditional decrement when the request completes.
        if reward.is_depleted() {
            return Err(UseCaseError::RewardDepleted);
        }

        if let Err(e) = verify_event_conditions(&self.user_id, &event.conditions, ctx).await {
            return match e {
                ConditionCheckError::Unmet(reason) => {
                    // The failed attempt is recorded as a terminal REJECTED
                    // request so operators can audit it later.
                    let rejected = RewardRequest::new_rejected(
                        self.user_id.clone(),
                        self.event_id.clone(),
                        self.reward_id.clone(),
                        self.user_memo.clone(),
                        reason.clone(),
                        now,
                    );
                    if let Err(e) = ctx.repos.reward_requests.insert(&rejected).await {
                        error!("Unable to record rejected reward request: {:?}", e);
                    }
                    Err(UseCaseError::ConditionsNotMet(reason))
                }
                ConditionCheckError::Upstream(e) => {
                    Err(UseCaseError::ActivitySourceUnavailable(e.to_string()))
                }
            };
        }

        let request = RewardRequest::new(
            self.user_id.clone(),
            self.event_id.clone(),
            self.reward_id.clone(),
            self.user_memo.clone(),
            now,
        );

        match ctx.repos.reward_requests.insert(&request).await {
            Ok(()) => Ok(request),
            Err(InsertClaimError::DuplicateClaim) => Err(UseCaseError::DuplicateRequest),
            Err(InsertClaimError::Storage(_)) => Err(UseCaseError::StorageError),
        }
    }
}

impl PermissionBoundary for CreateRewardRequestUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::RequestReward]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, Utc};
    use festivo_domain::{
        Event, EventCondition, EventStatus, Reward, RewardRequestStatus, RewardType,
    };
    use festivo_infra::{
        ActivityProviderError, IUserActivityProvider, InMemoryUserActivityProvider,
    };
    use std::sync::Arc;

    struct DownActivityProvider;

    #[async_trait::async_trait]
    impl IUserActivityProvider for DownActivityProvider {
        async fn login_streak(&self, _: &ID) -> Result<i64, ActivityProviderError> {
            Err(ActivityProviderError("timeout".into()))
        }
        async fn friend_invitation_count(&self, _: &ID) -> Result<i64, ActivityProviderError> {
            Err(ActivityProviderError("timeout".into()))
        }
        async fn has_cleared_quest(&self, _: &ID, _: &str) -> Result<bool, ActivityProviderError> {
            Err(ActivityProviderError("timeout".into()))
        }
        async fn total_purchase_amount(&self, _: &ID) -> Result<i64, ActivityProviderError> {
            Err(ActivityProviderError("timeout".into()))
        }
    }

    struct TestContext {
        ctx: Context,
        provider: Arc<InMemoryUserActivityProvider>,
        event: Event,
        reward: Reward,
        user: ID,
    }

    async fn setup(conditions: Vec<EventCondition>, stock: Option<i64>) -> TestContext {
        let mut ctx = Context::create_inmemory();
        let provider = Arc::new(InMemoryUserActivityProvider::new());
        ctx.activity = provider.clone();

        let now = Utc::now();
        let event = Event {
            id: Default::default(),
            title: "Login festival".into(),
            description: None,
            start_date: now - Duration::hours(1),
            end_date: now + Duration::days(7),
            status: EventStatus::Active,
            conditions,
            created_by: Default::default(),
            deleted_at: None,
            created: now,
            updated: now,
        };
        ctx.repos.events.insert(&event).await.unwrap();

        let reward = Reward {
            id: Default::default(),
            event_id: event.id.clone(),
            name: "1000 points".into(),
            reward_type: RewardType::Point,
            quantity: 1000,
            details: None,
            stock,
            created_by: Default::default(),
            created: now,
            updated: now,
        };
        ctx.repos.rewards.insert(&reward).await.unwrap();

        TestContext {
            ctx,
            provider,
            event,
            reward,
            user: ID::new(),
        }
    }

    fn usecase_for(t: &TestContext) -> CreateRewardRequestUseCase {
        CreateRewardRequestUseCase {
            user_id: t.user.clone(),
            event_id: t.event.id.clone(),
            reward_id: t.reward.id.clone(),
            user_memo: None,
        }
    }

    #[actix_web::main]
    #[test]
    async fn creates_pending_request_when_conditions_hold() {
        let t = setup(
            vec![EventCondition::LoginStreak {
                value: 3,
                description: None,
            }],
            Some(10),
        )
        .await;
        t.provider.add_login_streak(&t.user, 5);

        let request = usecase_for(&t).execute(&t.ctx).await.unwrap();
        assert_eq!(request.status, RewardRequestStatus::Pending);
        assert_eq!(request.user_id, t.user);
        assert!(request.processed_at.is_none());
    }

    #[actix_web::main]
    #[test]
    async fn unmet_conditions_record_a_rejected_request() {
        let t = setup(
            vec![EventCondition::LoginStreak {
                value: 7,
                description: None,
            }],
            None,
        )
        .await;
        t.provider.add_login_streak(&t.user, 2);

        let res = usecase_for(&t).execute(&t.ctx).await;
        assert!(matches!(res, Err(UseCaseError::ConditionsNotMet(_))));

        // the rejection is kept for auditing
        let requests = t
            .ctx
            .repos
            .reward_requests
            .find_by_user(&t.user, None)
            .await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].status, RewardRequestStatus::Rejected);
        assert!(requests[0].failure_reason.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn rejected_attempts_do_not_block_a_retry() {
        let t = setup(
            vec![EventCondition::QuestClear {
                value: "raid".into(),
                description: None,
            }],
            None,
        )
        .await;

        let res = usecase_for(&t).execute(&t.ctx).await;
        assert!(matches!(res, Err(UseCaseError::ConditionsNotMet(_))));

        // the user clears the quest and tries again
        t.provider.add_cleared_quest(&t.user, "raid");
        let request = usecase_for(&t).execute(&t.ctx).await.unwrap();
        assert_eq!(request.status, RewardRequestStatus::Pending);
    }

    #[actix_web::main]
    #[test]
    async fn duplicate_active_request_conflicts() {
        let t = setup(Vec::new(), None).await;

        assert!(usecase_for(&t).execute(&t.ctx).await.is_ok());
        let res = usecase_for(&t).execute(&t.ctx).await;
        assert!(matches!(res, Err(UseCaseError::DuplicateRequest)));
    }

    #[actix_web::main]
    #[test]
    async fn inactive_or_out_of_window_event_is_refused() {
        let t = setup(Vec::new(), None).await;
        let mut event = t.event.clone();
        event.status = EventStatus::Inactive;
        t.ctx.repos.events.save(&event).await.unwrap();

        let res = usecase_for(&t).execute(&t.ctx).await;
        assert!(matches!(res, Err(UseCaseError::EventNotLive)));

        event.status = EventStatus::Active;
        event.start_date = Utc::now() + Duration::days(1);
        event.end_date = Utc::now() + Duration::days(2);
        t.ctx.repos.events.save(&event).await.unwrap();

        let res = usecase_for(&t).execute(&t.ctx).await;
        assert!(matches!(res, Err(UseCaseError::EventNotLive)));
    }

    #[actix_web::main]
    #[test]
    async fn depleted_stock_is_refused_up_front() {
        let t = setup(Vec::new(), Some(0)).await;
        let res = usecase_for(&t).execute(&t.ctx).await;
        assert!(matches!(res, Err(UseCaseError::RewardDepleted)));
    }

    #[actix_web::main]
    #[test]
    async fn reward_must_belong_to_the_event() {
        let t = setup(Vec::new(), None).await;
        let mut usecase = usecase_for(&t);
        usecase.reward_id = ID::new();

        let res = usecase.execute(&t.ctx).await;
        assert!(matches!(res, Err(UseCaseError::RewardNotFound(_))));
    }

    #[actix_web::main]
    #[test]
    async fn unavailable_activity_source_is_surfaced_without_a_record() {
        let mut t = setup(
            vec![EventCondition::LoginStreak {
                value: 1,
                description: None,
            }],
            None,
        )
        .await;
        t.ctx.activity = Arc::new(DownActivityProvider);

        let res = usecase_for(&t).execute(&t.ctx).await;
        assert!(matches!(
            res,
            Err(UseCaseError::ActivitySourceUnavailable(_))
        ));

        // no request of any status is written for an unreached verdict
        let requests = t
            .ctx
            .repos
            .reward_requests
            .find_by_user(&t.user, None)
            .await;
        assert!(requests.is_empty());
    }
}
