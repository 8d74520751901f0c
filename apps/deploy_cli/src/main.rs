use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{
    config::{load_settings_from, DEFAULT_SETTINGS_FILE},
    DeployController, DeployOutcome, HttpDeployTransport, Navigator,
};
use shared::{domain::Project, protocol::DeployRequest};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Print or deploy the demo project")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the request body that would be sent.
    Payload(ProjectArgs),
    /// Submit the project to the deployment service.
    Deploy {
        #[command(flatten)]
        project: ProjectArgs,
        #[arg(long)]
        endpoint: Option<String>,
        #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
        config: PathBuf,
    },
}

#[derive(ClapArgs, Debug)]
struct ProjectArgs {
    /// Replace a seed file with the contents of a local file: `pages/index.js=./index.js`.
    #[arg(long = "set", value_name = "PATH=FILE")]
    overrides: Vec<String>,
}

struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, url: &str) {
        println!("{url}");
    }
}

fn build_project(args: &ProjectArgs) -> Result<Project> {
    let mut project = Project::seed();
    for entry in &args.overrides {
        let Some((path, source)) = entry.split_once('=') else {
            bail!("expected PATH=FILE, got '{entry}'");
        };
        let content = fs::read_to_string(source)
            .with_context(|| format!("failed to read '{source}' for {path}"))?;
        project = project.set(path, content)?;
    }
    Ok(project)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    match args.command {
        Command::Payload(project) => {
            let project = build_project(&project)?;
            println!("{}", DeployRequest::from_project(&project).to_body());
        }
        Command::Deploy {
            project,
            endpoint,
            config,
        } => {
            let project = build_project(&project)?;
            let mut settings = load_settings_from(&config)?;
            if let Some(endpoint) = endpoint {
                settings.endpoint = endpoint;
            }

            let transport = HttpDeployTransport::new(&settings)?;
            let controller = DeployController::new(Arc::new(transport), Arc::new(PrintNavigator));
            match controller.submit(&project).await {
                DeployOutcome::Redirecting(_) => {}
                DeployOutcome::Failed(message) => bail!("{message}."),
                other => bail!("deploy ended in unexpected state {other:?}"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    #[test]
    fn overrides_replace_seed_files_in_place() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let source = env::temp_dir().join(format!("deploy_cli_override_{suffix}.js"));
        fs::write(&source, "module.exports = () => 42;").expect("write source");

        let project = build_project(&ProjectArgs {
            overrides: vec![format!("api/date.js={}", source.display())],
        })
        .expect("project");

        assert_eq!(project.get("api/date.js"), Some("module.exports = () => 42;"));
        assert_eq!(
            project.paths().collect::<Vec<_>>(),
            Project::seed().paths().collect::<Vec<_>>()
        );
        fs::remove_file(source).expect("cleanup");
    }

    #[test]
    fn rejects_unknown_paths_and_bad_syntax() {
        let err = build_project(&ProjectArgs {
            overrides: vec!["no-equals".to_string()],
        })
        .expect_err("syntax");
        assert!(err.to_string().contains("PATH=FILE"));

        let source = env::temp_dir().join("deploy_cli_unknown_path.txt");
        fs::write(&source, "x").expect("write source");
        let err = build_project(&ProjectArgs {
            overrides: vec![format!("README.md={}", source.display())],
        })
        .expect_err("unknown path");
        assert!(err.to_string().contains("unknown file path"));
        let _ = fs::remove_file(source);
    }
}
