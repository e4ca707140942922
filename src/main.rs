//! @ai:module:intent CLI for PR summarization and prompt evaluation
//! @ai:module:layer presentation

use anyhow::Result;
use clap::{Parser, Subcommand};
use pr_summary::{
    config::{Credentials, SummaryConfig},
    dataset::{self, Breakdown, DatasetBuilder},
    github::GitHubClient,
    logging,
    notify::SlackNotifier,
    prompts::PromptVersion,
    report::{collect_result_files, JsonReporter, MarkdownReporter, ReportGenerator, RESULTS_FILE},
    runner::{CompletionClient, EvaluationRunner, MockCompletionClient, OpenAiClient, SummaryGenerator},
    summarize::{self, SummarizeOutcome},
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const MAX_LISTED_ISSUES: usize = 10;

#[derive(Parser)]
#[command(name = "pr-summary")]
#[command(about = "Summarize merged pull requests and evaluate prompt variations")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file (defaults to ./pr-summary.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the pull request merged by the current workflow event and post it to Slack
    Summarize,

    /// Build a test dataset from merged pull requests
    BuildDataset {
        /// Repository in format owner/repo
        repo: String,

        /// Maximum number of recent pull requests to consider
        #[arg(long, default_value = "50")]
        limit: usize,

        /// Specific pull request numbers (comma-separated)
        #[arg(long, value_delimiter = ',')]
        pr_numbers: Vec<u64>,

        /// Output file
        #[arg(short, long, default_value = "test_dataset.json")]
        output: PathBuf,

        /// GitHub token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        github_token: Option<String>,
    },

    /// Run prompt versions over a test dataset
    Evaluate {
        /// Path to test dataset JSON file
        dataset: PathBuf,

        /// Use only the first N test cases
        #[arg(long)]
        sample_size: Option<usize>,

        /// Prompt versions to test (comma-separated)
        #[arg(long, default_value = "default")]
        prompt_versions: String,

        /// Export HTML forms for human review
        #[arg(long)]
        export_human_review: bool,

        /// Output directory
        #[arg(short, long, default_value = "evaluation_results")]
        output: PathBuf,

        /// Use canned completions instead of calling the API
        #[arg(long)]
        dry_run: bool,

        /// OpenAI API key
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        openai_api_key: Option<String>,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Maximum tokens override
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Temperature override
        #[arg(long)]
        temperature: Option<f32>,

        /// Maximum diff characters included in prompts
        #[arg(long)]
        max_diff_length: Option<usize>,
    },

    /// Compare prompt versions across results files or directories
    Compare {
        /// Results files, or directories searched for evaluation_results.json
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output file for the comparison report
        #[arg(short, long, default_value = "prompt_comparison.md")]
        output: PathBuf,
    },

    /// Validate a test dataset
    Validate {
        /// Path to test dataset JSON file
        dataset: PathBuf,
    },

    /// List available prompt versions
    Prompts,

    /// Check credential formats, optionally sending a test message to Slack
    CheckCredentials {
        /// Post a test message to the configured webhook
        #[arg(long)]
        ping: bool,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "pr-summary.toml")]
        output: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match SummaryConfig::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    config.logging.debug |= cli.verbose;
    let _guard = logging::init(&config.logging);

    match dispatch(cli.command, config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(command: Commands, mut config: SummaryConfig) -> Result<ExitCode> {
    match command {
        Commands::Summarize => run_summarize(&config).await,
        Commands::BuildDataset {
            repo,
            limit,
            pr_numbers,
            output,
            github_token,
        } => build_dataset(&config, &repo, limit, &pr_numbers, &output, github_token).await,
        Commands::Evaluate {
            dataset,
            sample_size,
            prompt_versions,
            export_human_review,
            output,
            dry_run,
            openai_api_key,
            model,
            max_tokens,
            temperature,
            max_diff_length,
        } => {
            if let Some(model) = model {
                config.api.model = model;
            }
            if let Some(max_tokens) = max_tokens {
                config.api.max_tokens = max_tokens;
            }
            if let Some(temperature) = temperature {
                config.api.temperature = temperature;
            }
            if let Some(max_diff_length) = max_diff_length {
                config.api.max_diff_length = max_diff_length;
            }

            evaluate(
                &config,
                EvaluateArgs {
                    dataset,
                    sample_size,
                    prompt_versions,
                    export_human_review,
                    output,
                    dry_run,
                    openai_api_key,
                },
            )
            .await
        }
        Commands::Compare { paths, output } => compare(&paths, &output),
        Commands::Validate { dataset } => validate(&dataset),
        Commands::Prompts => {
            list_prompts();
            Ok(ExitCode::SUCCESS)
        }
        Commands::CheckCredentials { ping } => check_credentials(&config, ping).await,
        Commands::Init { output } => {
            SummaryConfig::default().save(&output)?;
            println!("Configuration saved to {}", output.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// @ai:intent Single-shot flow driven by the workflow environment
/// @ai:effects fs:read, network
async fn run_summarize(config: &SummaryConfig) -> Result<ExitCode> {
    match summarize::run(config, &Credentials::from_env()).await {
        Ok(SummarizeOutcome::Skipped) => Ok(ExitCode::SUCCESS),
        Ok(SummarizeOutcome::Posted { pr_number, .. }) => {
            println!("Summarized PR #{pr_number}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!("Fatal error in summarize: {:#}", e);
            Err(e)
        }
    }
}

/// @ai:intent Build and save a dataset, then print its breakdown
/// @ai:effects network, fs:write
async fn build_dataset(
    config: &SummaryConfig,
    repo: &str,
    limit: usize,
    pr_numbers: &[u64],
    output: &Path,
    github_token: Option<String>,
) -> Result<ExitCode> {
    let credentials = Credentials::new(github_token, None, None);
    let token = credentials.require_github_token()?;

    if pr_numbers.is_empty() {
        println!("Building dataset from {repo} (limit: {limit})");
    } else {
        println!("Building dataset from {repo} with specific PRs: {pr_numbers:?}");
    }

    let client = GitHubClient::new(&config.github.api_url, token)?;
    let test_cases = DatasetBuilder::new(client)
        .build(repo, limit, Some(pr_numbers))
        .await;

    if test_cases.is_empty() {
        println!("No test cases created");
        return Ok(ExitCode::FAILURE);
    }

    dataset::save(&test_cases, output)?;
    println!("Created dataset with {} test cases", test_cases.len());
    println!("Saved to: {}", output.display());
    println!();
    println!("Dataset breakdown:");
    println!("{}", Breakdown::of(&test_cases));

    Ok(ExitCode::SUCCESS)
}

struct EvaluateArgs {
    dataset: PathBuf,
    sample_size: Option<usize>,
    prompt_versions: String,
    export_human_review: bool,
    output: PathBuf,
    dry_run: bool,
    openai_api_key: Option<String>,
}

/// @ai:intent Validate inputs, then evaluate with the real or the canned client
/// @ai:effects network, fs:read, fs:write
async fn evaluate(config: &SummaryConfig, args: EvaluateArgs) -> Result<ExitCode> {
    let credentials = Credentials::new(None, args.openai_api_key.clone(), None);
    config.validate(&credentials)?;

    let versions = parse_versions(&args.prompt_versions)?;

    if args.dry_run {
        tracing::info!("Running in dry-run mode");
        evaluate_with(MockCompletionClient::dry_run(), config, &versions, &args).await
    } else {
        let api_key = credentials.require_openai_api_key()?;
        let client = OpenAiClient::new(&config.api.base_url, api_key)?;
        evaluate_with(client, config, &versions, &args).await
    }
}

fn parse_versions(raw: &str) -> Result<Vec<PromptVersion>> {
    let versions = raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(PromptVersion::get)
        .collect::<Result<Vec<_>, _>>()?;

    if versions.is_empty() {
        anyhow::bail!("At least one prompt version is required");
    }
    Ok(versions)
}

async fn evaluate_with<C: CompletionClient>(
    client: C,
    config: &SummaryConfig,
    versions: &[PromptVersion],
    args: &EvaluateArgs,
) -> Result<ExitCode> {
    let mut test_cases = dataset::load(&args.dataset)?;
    if let Some(n) = args.sample_size.filter(|&n| n < test_cases.len()) {
        println!("Using sample of {n} test cases");
        test_cases.truncate(n);
    }

    let names: Vec<&str> = versions.iter().map(|v| v.as_str()).collect();
    println!("Running evaluation on {} test cases", test_cases.len());
    println!("Testing {} prompt versions: {:?}", versions.len(), names);

    let mut runner = EvaluationRunner::new(SummaryGenerator::new(client, config.api.clone()));
    let run = runner.run(&test_cases, versions).await;

    ReportGenerator::new().generate_all(&run, &args.output)?;

    if args.export_human_review {
        let review_dir = args.output.join("human_evaluation");
        runner.export_for_human_review(&run, &test_cases, &review_dir)?;
        println!("Human evaluation forms exported to: {}", review_dir.display());
    }

    println!("Evaluation complete. Results saved to: {}", args.output.display());
    println!("Report: {}", args.output.join("evaluation_report.md").display());
    Ok(ExitCode::SUCCESS)
}

/// @ai:intent Pool results from several runs and write the comparison report
/// @ai:effects fs:read, fs:write
fn compare(paths: &[PathBuf], output: &Path) -> Result<ExitCode> {
    let files = collect_result_files(paths);
    if files.is_empty() {
        anyhow::bail!("At least one results file required (no {RESULTS_FILE} found)");
    }

    let reporter = JsonReporter::new();
    let runs = files
        .iter()
        .map(|path| reporter.load(path))
        .collect::<Result<Vec<_>>>()?;

    MarkdownReporter::new().write_comparison(&runs, output)?;
    println!("Compared {} results files", runs.len());
    println!("Comparison report saved to: {}", output.display());
    Ok(ExitCode::SUCCESS)
}

/// @ai:intent Print dataset issues and statistics
/// @ai:post exit code 1 when any issue was found
/// @ai:effects fs:read
fn validate(path: &Path) -> Result<ExitCode> {
    let test_cases = dataset::load(path)?;
    println!("Validating dataset: {}", path.display());
    println!("Total test cases: {}", test_cases.len());

    let issues = dataset::find_issues(&test_cases);
    let code = if issues.is_empty() {
        println!();
        println!("Dataset validation passed!");
        ExitCode::SUCCESS
    } else {
        println!();
        println!("Found {} issues:", issues.len());
        for issue in issues.iter().take(MAX_LISTED_ISSUES) {
            println!("  - {issue}");
        }
        if issues.len() > MAX_LISTED_ISSUES {
            println!("  ... and {} more", issues.len() - MAX_LISTED_ISSUES);
        }
        ExitCode::FAILURE
    };

    println!();
    println!("Dataset statistics:");
    println!("{}", Breakdown::of(&test_cases));
    Ok(code)
}

fn list_prompts() {
    println!("Available prompt versions:");
    for version in PromptVersion::ALL {
        let meta = version.describe();
        println!();
        println!("{}: {}", version, meta.description);
        println!("  focus: {}, style: {}, length: {}", meta.focus, meta.style, meta.length);
    }
}

/// @ai:intent Report which credentials are present and whether they look valid
/// @ai:effects env:read, network
async fn check_credentials(config: &SummaryConfig, ping: bool) -> Result<ExitCode> {
    let credentials = Credentials::from_env();

    let presence = [
        ("GITHUB_TOKEN", credentials.github_token.is_some()),
        ("OPENAI_API_KEY", credentials.openai_api_key.is_some()),
        ("SLACK_WEBHOOK", credentials.slack_webhook.is_some()),
    ];
    for (name, present) in presence {
        println!("{:<16} {}", name, if present { "set" } else { "missing" });
    }

    let problems = credentials.format_problems();
    for problem in &problems {
        println!("Problem: {problem}");
    }

    if ping {
        let webhook = credentials.require_slack_webhook()?;
        SlackNotifier::new(webhook, config.slack.channel.clone())?
            .ping()
            .await?;
        println!("Slack test message sent");
    }

    if problems.is_empty() {
        println!("Credential check passed");
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
