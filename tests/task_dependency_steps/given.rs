//! Given steps for task dependency BDD scenarios.

use super::world::{DependencyWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::tracking::domain::NewTask;

#[given(r#"a task titled "{title}""#)]
fn task_titled(world: &mut DependencyWorld, title: String) -> Result<(), eyre::Report> {
    let task = run_async(world.service.create_task(NewTask::new(title.clone())))
        .wrap_err("create task for dependency scenario")?;
    world.tasks.insert(title, task.id());
    Ok(())
}

#[given(r#"task "{blocker}" blocks task "{blocked}""#)]
fn task_blocks_task(
    world: &mut DependencyWorld,
    blocker: String,
    blocked: String,
) -> Result<(), eyre::Report> {
    let blocker_id = world.task_id(&blocker)?;
    let blocked_id = world.task_id(&blocked)?;
    run_async(world.service.add_dependency(blocker_id, blocked_id))
        .wrap_err("record dependency in scenario setup")?;
    Ok(())
}
