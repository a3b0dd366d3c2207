use festivo_domain::{EventCondition, ID};
use festivo_infra::{ActivityProviderError, Context};
use tracing::warn;

#[derive(Debug)]
pub enum ConditionCheckError {
    /// The user does not satisfy one of the conditions. The string names
    /// the first failing condition.
    Unmet(String),
    /// The activity source could not answer, so no verdict was reached
    Upstream(ActivityProviderError),
}

/// Evaluates an event's conditions in list order against the user's
/// activity facts. All conditions must hold, evaluation stops at the
/// first failure.
pub async fn verify_event_conditions(
    user_id: &ID,
    conditions: &[EventCondition],
    ctx: &Context,
) -> Result<(), ConditionCheckError> {
    for condition in conditions {
        match condition {
            EventCondition::LoginStreak { value, .. } => {
                let streak = ctx
                    .activity
                    .login_streak(user_id)
                    .await
                    .map_err(ConditionCheckError::Upstream)?;
                if streak < *value {
                    return Err(ConditionCheckError::Unmet(format!(
                        "A login streak of {} days is required, the current streak is {}",
                        value, streak
                    )));
                }
            }
            EventCondition::FriendInvitation { value, .. } => {
                let invitations = ctx
                    .activity
                    .friend_invitation_count(user_id)
                    .await
                    .map_err(ConditionCheckError::Upstream)?;
                if invitations < *value {
                    return Err(ConditionCheckError::Unmet(format!(
                        "{} friend invitations are required, {} were sent",
                        value, invitations
                    )));
                }
            }
            EventCondition::QuestClear { value, .. } => {
                let cleared = ctx
                    .activity
                    .has_cleared_quest(user_id, value)
                    .await
                    .map_err(ConditionCheckError::Upstream)?;
                if !cleared {
                    return Err(ConditionCheckError::Unmet(format!(
                        "The quest {} has not been cleared",
                        value
                    )));
                }
            }
            EventCondition::MinimumPurchase { value, .. } => {
                let total = ctx
                    .activity
                    .total_purchase_amount(user_id)
                    .await
                    .map_err(ConditionCheckError::Upstream)?;
                if total < *value {
                    return Err(ConditionCheckError::Unmet(format!(
                        "A purchase total of at least {} is required, the current total is {}",
                        value, total
                    )));
                }
            }
            EventCondition::AlwaysTrue { .. } => {}
            // Unrecognized condition documents fail closed: nobody gets a
            // reward through a condition this service cannot evaluate.
            EventCondition::Unknown => {
                warn!("Refusing to evaluate an unrecognized condition type");
                return Err(ConditionCheckError::Unmet(
                    "The event has a condition this service does not recognize".into(),
                ));
            }
        }
    }

    Ok(())
}
