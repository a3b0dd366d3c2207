use super::auth::{Permission, Policy};
use crate::error::FestivoError;
use festivo_infra::Context;
use std::fmt::Debug;
use tracing::error;

#[async_trait::async_trait(?Send)]
pub trait UseCase: Debug {
    type Response;
    type Error;

    const NAME: &'static str;

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error>;
}

/// Restrict what `Permission`s are needed for a caller
/// to be able to execute the `UseCase`
pub trait PermissionBoundary: UseCase {
    fn permissions(&self) -> Vec<Permission>;
}

#[derive(Debug)]
pub enum UseCaseErrorContainer<T: Debug> {
    Unauthorized(String),
    UseCase(T),
}

impl<T: Debug + Into<FestivoError>> From<UseCaseErrorContainer<T>> for FestivoError {
    fn from(e: UseCaseErrorContainer<T>) -> Self {
        match e {
            // the caller is identified but lacks the role
            UseCaseErrorContainer::Unauthorized(e) => Self::Forbidden(e),
            UseCaseErrorContainer::UseCase(e) => e.into(),
        }
    }
}

#[tracing::instrument(name = "Executing usecase with policy", skip(usecase, policy, ctx), fields(usecase = U::NAME))]
pub async fn execute_with_policy<U>(
    usecase: U,
    policy: &Policy,
    ctx: &Context,
) -> Result<U::Response, UseCaseErrorContainer<U::Error>>
where
    U: PermissionBoundary,
    U::Error: Debug,
{
    let required_permissions = usecase.permissions();
    if !policy.authorize(&required_permissions) {
        return Err(UseCaseErrorContainer::Unauthorized(format!(
            "Caller is not permitted to perform some or all of these actions: {:?}",
            required_permissions
        )));
    }

    execute(usecase, ctx)
        .await
        .map_err(UseCaseErrorContainer::UseCase)
}

#[tracing::instrument(name = "Executing usecase", skip(usecase, ctx), fields(usecase = U::NAME))]
pub async fn execute<U>(mut usecase: U, ctx: &Context) -> Result<U::Response, U::Error>
where
    U: UseCase,
    U::Error: Debug,
{
    let res = usecase.execute(ctx).await;

    if let Err(e) = &res {
        error!("Use case error: {:?}", e);
    }

    res
}
