//! When steps for task dependency BDD scenarios.

use super::world::{DependencyWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskboard::tracking::domain::TaskStatus;

#[when(r#"task "{blocker}" is recorded as blocking task "{blocked}""#)]
fn record_dependency(
    world: &mut DependencyWorld,
    blocker: String,
    blocked: String,
) -> Result<(), eyre::Report> {
    let blocker_id = world.task_id(&blocker)?;
    let blocked_id = world.task_id(&blocked)?;
    let result = run_async(world.service.add_dependency(blocker_id, blocked_id));
    world.last_dependency_result = Some(result);
    Ok(())
}

#[when(r#"task "{title}" is deleted"#)]
fn delete_task(world: &mut DependencyWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&title)?;
    let removed = run_async(world.service.delete_task(task_id)).wrap_err("delete task")?;
    if !removed {
        return Err(eyre::eyre!("task {title:?} was not deleted"));
    }
    world.tasks.remove(&title);
    Ok(())
}

#[when(r#"task "{title}" is moved to status "{status}""#)]
fn move_to_status(
    world: &mut DependencyWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&title)?;
    let result = run_async(
        world
            .service
            .change_status(task_id, TaskStatus::from(status.as_str())),
    );
    world.last_status_result = Some(result);
    Ok(())
}
