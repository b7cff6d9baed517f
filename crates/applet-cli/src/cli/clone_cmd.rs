use super::*;
pub(super) fn handle_clone_tasks(
    args: CloneTasksArgs,
    client: &mut RpcClient,
) -> anyhow::Result<()> {
    match args.command {
        CloneTasksCommands::List => {
            let tasks = client.get_clone_tasks().context("list clone tasks")?;
            if tasks.is_empty() {
                println!("No download tasks.");
            }
            for task in &tasks {
                println!("{}", clone_task_line(task));
            }
        }
        CloneTasksCommands::Count => {
            let count = client
                .get_clone_tasks_count()
                .context("count clone tasks")?;
            println!("{count}");
        }
        CloneTasksCommands::Cancel(args) => {
            client
                .cancel_clone_task(&args.repo_id)
                .context("Failed to cancel this task")?;
            println!("Cancelled {}", args.repo_id);
        }
        CloneTasksCommands::Remove(args) => {
            client
                .remove_clone_task(&args.repo_id)
                .context("Failed to remove this task")?;
            println!("Removed {}", args.repo_id);
        }
    }
    Ok(())
}
