//! Kanban hand-off driver CLI
//!
//! The `kanban` command plays tool calls against the kanban core without a
//! model in the loop.
//!
//! ## Commands
//!
//! - `roles`: Show registered roles, hand-off targets and tool catalogs
//! - `demo`: Play the authentication-feature coordination scenario
//! - `run`: Play a JSON script of tool calls against one session

mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kanban_core::{
    roles::is_open_template, KanbanConfig, MemorySessionStore, RoleRouter, SessionId, METRICS,
};
use tracing::{info, Level};

use crate::script::{demo_script, run_script, Script, ScriptReport};

#[derive(Parser)]
#[command(name = "kanban")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Shared task board and role hand-off driver", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true, env = "KANBAN_LOG_JSON")]
    json: bool,

    /// Priority for tasks created without one
    #[arg(long, global = true, env = "KANBAN_DEFAULT_PRIORITY")]
    default_priority: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show registered roles and the tools each one sees
    Roles,

    /// Play the built-in coordination scenario
    Demo {
        /// Print the final session payload as JSON
        #[arg(long)]
        emit_payload: bool,
    },

    /// Play a JSON script of tool calls
    Run {
        /// Script file (`{"seed": [...], "steps": [...]}`)
        script: PathBuf,

        /// Session id (default: the script's `session_id`, else random)
        #[arg(short, long)]
        session: Option<String>,

        /// Print the final session payload as JSON
        #[arg(long)]
        emit_payload: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    kanban_core::init_tracing(cli.json, level);

    let mut config = KanbanConfig::from_env().context("Failed to load kanban configuration")?;
    if let Some(priority) = cli.default_priority {
        config = config.with_default_priority(priority);
        config
            .validate()
            .context("Invalid --default-priority value")?;
    }

    match cli.command {
        Commands::Roles => cmd_roles(&config),
        Commands::Demo { emit_payload } => {
            cmd_run(&config, demo_script(), None, emit_payload).await
        }
        Commands::Run {
            script,
            session,
            emit_payload,
        } => {
            let script = Script::from_path(&script)?;
            cmd_run(&config, script, session, emit_payload).await
        }
    }
}

fn cmd_roles(config: &KanbanConfig) -> Result<()> {
    let router: RoleRouter = config.router()?;

    println!("Initial role: {}", router.active_role());
    for role in router.roles() {
        let Some(template) = router.template(role) else {
            continue;
        };
        println!();
        println!("{role}");
        println!("  {}", template.description);
        if is_open_template(template) {
            println!("  hands off to: any registered role");
        } else {
            let targets: Vec<String> = router
                .permitted_targets(role)?
                .iter()
                .map(ToString::to_string)
                .collect();
            println!("  hands off to: {}", targets.join(", "));
        }
        println!("  tools:");
        for tool in router.tools_for(role)? {
            println!("    - {}: {}", tool.name, tool.description);
        }
    }
    Ok(())
}

async fn cmd_run(
    config: &KanbanConfig,
    script: Script,
    session: Option<String>,
    emit_payload: bool,
) -> Result<()> {
    let session_id = session
        .or_else(|| script.session_id.clone())
        .map(SessionId::new)
        .unwrap_or_else(SessionId::generate);
    info!(session_id = %session_id, steps = script.steps.len(), "running script");

    let store = MemorySessionStore::new(config.clone());
    let report = run_script(&store, script, session_id).await?;
    print_report(&report);

    if emit_payload {
        let json = serde_json::to_string_pretty(&report.payload)
            .context("Failed to serialize session payload")?;
        println!("{json}");
    }

    METRICS.flush();
    Ok(())
}

fn print_report(report: &ScriptReport) {
    println!("=== Session {} ===", report.session_id);
    for step in &report.steps {
        let marker = if step.ok { "" } else { " (failed)" };
        println!();
        println!("[{}] {}{}", step.role, step.tool, marker);
        println!("{}", step.text.trim_end());
    }
    println!();
    println!(
        "=== Done: {} steps, active role {} ===",
        report.steps.len(),
        report
            .payload
            .current_agent
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    );
}
