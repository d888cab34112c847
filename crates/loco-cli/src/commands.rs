use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

use loco_hooks::{execute_hooks, HookConfig, HookEvent, HookInput};
use loco_planner::{format_plan, PlanStore};
use loco_skills::{AgentRegistry, LayerSet, SkillRegistry};
use loco_telemetry::{generate_report, CostProfile};

use crate::config::config_dir;

fn layers_for(project_root: &Path) -> LayerSet {
    let global = config_dir().ok();
    LayerSet::for_project(project_root, global.as_deref())
}

pub fn list_skills(project_root: &Path) -> Result<()> {
    let layers = layers_for(project_root);
    let mut registry = SkillRegistry::new();
    registry.discover(&layers);

    if registry.is_empty() {
        println!("No skills found");
        return Ok(());
    }

    for skill in registry.get_all() {
        println!("{:<30} [{}] {}", skill.name(), skill.source, skill.description());
    }
    Ok(())
}

pub fn list_agents(project_root: &Path) -> Result<()> {
    let layers = layers_for(project_root);
    let mut registry = AgentRegistry::new();
    registry.discover(&layers);

    if registry.is_empty() {
        println!("No agents found");
        return Ok(());
    }

    for agent in registry.get_all() {
        let tools = agent.tools();
        let tools = if tools.is_empty() {
            "all tools".to_string()
        } else {
            tools.join(", ")
        };
        println!("{:<30} [{}] {} ({})", agent.name(), agent.source, agent.description(), tools);
    }
    Ok(())
}

pub fn list_hooks(project_root: &Path) -> Result<()> {
    let layers = layers_for(project_root);
    let config = HookConfig::load(&layers);

    if config.is_empty() {
        println!("No hooks configured");
        return Ok(());
    }

    for event in [
        HookEvent::PreToolUse,
        HookEvent::PostToolUse,
        HookEvent::SessionStart,
        HookEvent::SessionEnd,
    ] {
        let hooks = config.hooks_for(event, None);
        if hooks.is_empty() {
            continue;
        }
        println!("{}:", event.as_str());
        for hook in hooks {
            let matcher = hook.matcher.as_deref().unwrap_or("*");
            println!("  [{matcher}] {} (timeout {}s)", hook.command, hook.timeout_secs);
        }
    }
    Ok(())
}

pub async fn run_session_hooks(project_root: &Path, event: HookEvent) -> Result<()> {
    let layers = layers_for(project_root);
    let config = HookConfig::load(&layers);
    let hooks = config.hooks_for(event, None);

    if hooks.is_empty() {
        println!("No hooks configured for {}", event.as_str());
        return Ok(());
    }

    let input = HookInput {
        event,
        tool_name: None,
        tool_input: None,
        tool_output: None,
        cwd: project_root,
    };

    let results = execute_hooks(&hooks, &input).await;
    for (hook, result) in hooks.iter().zip(results) {
        let status = if result.success { "ok" } else { "failed" };
        println!("{status}: {} (exit {})", hook.command, result.exit_code);
        if !result.stderr.trim().is_empty() {
            println!("  stderr: {}", result.stderr.trim());
        }
    }
    Ok(())
}

fn plan_store() -> Result<PlanStore> {
    PlanStore::new(config_dir()?.join("plans"))
}

pub fn list_plans() -> Result<()> {
    let store = plan_store()?;
    let plans = store.list();

    if plans.is_empty() {
        println!("No plans saved");
        return Ok(());
    }

    for plan in plans {
        let (completed, total) = plan.progress();
        println!("{}  {:>2}/{:<2}  {}", plan.id, completed, total, plan.task);
    }
    Ok(())
}

pub fn show_plan(id: &str) -> Result<()> {
    let store = plan_store()?;
    match store.load(id)? {
        Some(plan) => {
            println!("{}", format_plan(&plan));
            Ok(())
        }
        None => bail!("Plan '{}' not found", id),
    }
}

pub fn commit_prompt(project_root: &Path) -> Result<()> {
    if !loco_git::is_git_repo(project_root) {
        bail!("Not a git repository: {}", project_root.display());
    }

    // Prefer staged changes; fall back to everything
    let diff = loco_git::staged_diff(project_root)
        .or_else(|| loco_git::combined_diff(project_root))
        .context("No changes to commit")?;

    info!("Building commit prompt from {} bytes of diff", diff.len());
    println!("{}", loco_git::prompt::commit_message_prompt(&diff));
    Ok(())
}

pub fn pr_prompt(project_root: &Path, base_branch: &str) -> Result<()> {
    if !loco_git::is_git_repo(project_root) {
        bail!("Not a git repository: {}", project_root.display());
    }

    let branch = loco_git::current_branch(project_root).context("Not on a branch")?;
    let commits = loco_git::commit_history(project_root, base_branch, 50);
    let diff = loco_git::branch_diff(project_root, base_branch).unwrap_or_default();

    if commits.is_empty() && diff.is_empty() {
        bail!("No changes against '{}'", base_branch);
    }

    println!(
        "{}",
        loco_git::prompt::pr_description_prompt(&branch, base_branch, &commits, &diff)
    );
    Ok(())
}

pub fn usage_report(path: &Path) -> Result<()> {
    let profile = CostProfile::load(path)?;
    println!("{}", generate_report(&profile));
    Ok(())
}
