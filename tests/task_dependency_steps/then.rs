//! Then steps for task dependency BDD scenarios.

use super::world::{DependencyWorld, run_async};
use taskboard::tracking::{
    domain::{TaskStatus, TrackingDomainError},
    ports::{Constraint, StoreError},
    services::TrackingServiceError,
};
use rstest_bdd_macros::then;

#[then("the dependency is recorded")]
fn dependency_recorded(world: &DependencyWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_dependency_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing dependency result"))?;

    if let Err(err) = result {
        return Err(eyre::eyre!("expected dependency to be recorded, got {err}"));
    }
    Ok(())
}

#[then("the dependency is rejected as a self dependency")]
fn rejected_as_self_dependency(world: &DependencyWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_dependency_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing dependency result"))?;

    if !matches!(
        result,
        Err(TrackingServiceError::Domain(
            TrackingDomainError::SelfDependency(_)
        ))
    ) {
        return Err(eyre::eyre!("expected SelfDependency error, got {result:?}"));
    }
    Ok(())
}

#[then("the dependency is rejected as a duplicate")]
fn rejected_as_duplicate(world: &DependencyWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_dependency_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing dependency result"))?;

    if !matches!(
        result,
        Err(TrackingServiceError::Store(StoreError::ConstraintViolation(
            Constraint::DuplicateDependency
        )))
    ) {
        return Err(eyre::eyre!(
            "expected DuplicateDependency error, got {result:?}"
        ));
    }
    Ok(())
}

#[then(r#"the number of blockers of task "{title}" is {count:usize}"#)]
fn blocker_count(
    world: &DependencyWorld,
    title: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&title)?;
    let blockers = run_async(world.service.blockers_of(task_id))?;

    if blockers.len() != count {
        return Err(eyre::eyre!(
            "expected {count} blockers of {title:?}, found {}",
            blockers.len()
        ));
    }
    Ok(())
}

#[then("the status change is rejected because nothing blocks the task")]
fn rejected_without_blockers(world: &DependencyWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_status_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing status change result"))?;

    if !matches!(result, Err(TrackingServiceError::NoBlockers(_))) {
        return Err(eyre::eyre!("expected NoBlockers error, got {result:?}"));
    }
    Ok(())
}

#[then(r#"task "{title}" has status "{status}""#)]
fn task_has_status(
    world: &DependencyWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&title)?;
    let task = run_async(world.service.task(task_id))?
        .ok_or_else(|| eyre::eyre!("task {title:?} no longer exists"))?;
    let expected = TaskStatus::from(status.as_str());

    if task.status() != &expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            task.status()
        ));
    }
    Ok(())
}
