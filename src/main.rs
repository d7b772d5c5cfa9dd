//! Remote Fix KPI dashboard binary.
//!
//! Loads the baseline and current periods, compares one KPI, weights the
//! root causes with AHP, evaluates any what-if changes, and optionally
//! answers a question. Results go to stdout; logs go to stderr.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use secrecy::Secret;

use remote_fix_kpi::adapters::ai::{OpenAIConfig, OpenAIProvider};
use remote_fix_kpi::adapters::data::{CsvDatasetSource, PowerBiConfig, PowerBiDatasetSource};
use remote_fix_kpi::application::handlers::{
    baseline_judgments, AnalyzeCriteriaCommand, AnalyzeCriteriaHandler, AskAssistantCommand,
    AskAssistantHandler, CompareKpiCommand, CompareKpiHandler, LoadDatasetsCommand,
    LoadDatasetsHandler, SuggestPreprocessingCommand, SuggestPreprocessingHandler, WhatIfCommand,
    WhatIfHandler, WhatIfScenario,
};
use remote_fix_kpi::application::{NarrationService, NarrationSettings, Narrative};
use remote_fix_kpi::config::{AppConfig, DataSourceKind, LogConfig, LogFormat};
use remote_fix_kpi::domain::foundation::{DomainError, ErrorCode};
use remote_fix_kpi::domain::kpi::ProfileOptions;
use remote_fix_kpi::ports::DatasetSource;

/// Quarterly KPI comparison with AHP root-cause weighting
#[derive(Parser, Debug)]
#[command(name = "remote-fix-kpi", version)]
#[command(about = "Compare remote-fix KPIs across two periods and weight root causes with AHP")]
struct Cli {
    /// KPI column to compare (default: first numeric column of the current period)
    #[arg(long)]
    kpi: Option<String>,

    /// Histogram bins for the KPI comparison
    #[arg(long)]
    bins: Option<usize>,

    /// Set one baseline root-cause judgment on the 1-9 scale, as "A|B|value" (repeatable)
    #[arg(long = "compare", value_name = "A|B|VALUE")]
    compare: Vec<String>,

    /// Replace one root-cause judgment, as "A|B|value" (repeatable)
    #[arg(long = "what-if", value_name = "A|B|VALUE")]
    what_if: Vec<String>,

    /// Question for the assistant
    #[arg(long)]
    question: Option<String>,

    /// Ask for preprocessing suggestions on the current period
    #[arg(long)]
    suggest_preprocessing: bool,

    /// Skip all AI narration
    #[arg(long)]
    no_narration: bool,

    /// Dataset source (overrides configuration)
    #[arg(long, value_enum)]
    source: Option<SourceArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceArg {
    Csv,
    #[value(name = "powerbi")]
    PowerBi,
}

impl From<SourceArg> for DataSourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Csv => DataSourceKind::Csv,
            SourceArg::PowerBi => DataSourceKind::PowerBi,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    apply_overrides(&mut config, &cli);

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        return ExitCode::FAILURE;
    }

    init_tracing(&config.log);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = %e.code, "{}", e.message);
            eprintln!("{}", e.message);
            ExitCode::FAILURE
        }
    }
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(source) = cli.source {
        config.data.source = source.into();
    }
    if let Some(bins) = cli.bins {
        config.dashboard.histogram_bins = bins;
    }
    if let Some(kpi) = &cli.kpi {
        config.dashboard.default_kpi = Some(kpi.clone());
    }
}

fn init_tracing(log: &LogConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(log.env_filter())
        .with_writer(std::io::stderr);

    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn build_narration(config: &AppConfig, disabled: bool) -> Result<NarrationService, DomainError> {
    let key = match &config.ai.openai_api_key {
        Some(key) if !disabled && config.ai.has_openai() => key.clone(),
        _ => {
            tracing::info!(no_narration = disabled, "Narration disabled");
            return Ok(NarrationService::disabled());
        }
    };

    let provider = OpenAIProvider::new(
        OpenAIConfig::from_secret(key)
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    )
    .map_err(|e| DomainError::new(ErrorCode::AIProviderError, e.to_string()))?;

    Ok(NarrationService::new(
        Arc::new(provider),
        NarrationSettings {
            max_tokens: config.ai.max_tokens,
            temperature: config.ai.temperature,
        },
    ))
}

fn build_source(config: &AppConfig) -> Result<Arc<dyn DatasetSource>, DomainError> {
    let data = &config.data;
    match data.source {
        DataSourceKind::Csv => {
            let source = match &data.base_dir {
                Some(dir) => CsvDatasetSource::new().with_base_dir(dir),
                None => CsvDatasetSource::new(),
            };
            Ok(Arc::new(source))
        }
        DataSourceKind::PowerBi => {
            let dataset_id = data.powerbi_dataset_id.clone().unwrap_or_default();
            let token = data
                .powerbi_access_token
                .clone()
                .unwrap_or_else(|| Secret::new(String::new()));
            let source = PowerBiDatasetSource::new(
                PowerBiConfig::new(dataset_id, token)
                    .with_base_url(&data.powerbi_base_url)
                    .with_timeout(data.timeout()),
            )?;
            Ok(Arc::new(source))
        }
    }
}

async fn run(cli: Cli, config: AppConfig) -> Result<(), DomainError> {
    let narrate = !cli.no_narration;
    let narration = build_narration(&config, cli.no_narration)?;
    let source = build_source(&config)?;

    // Periods
    let loaded = LoadDatasetsHandler::new(source, narration.clone())
        .handle(LoadDatasetsCommand {
            baseline: config.data.baseline_period(),
            current: config.data.current_period(),
            profile: ProfileOptions {
                sample_size: config.dashboard.profile_sample_size,
            },
            narrate,
        })
        .await?;

    for overview in [&loaded.baseline, &loaded.current] {
        println!("== {} ==", overview.dataset.period());
        println!("{}", overview.profile);
        print_narrative("Summary", overview.summary.as_ref());
    }
    print_narrative("Profile insights", loaded.profile_explanation.as_ref());

    if cli.suggest_preprocessing && narrate {
        let suggestions = SuggestPreprocessingHandler::new(narration.clone())
            .handle(SuggestPreprocessingCommand {
                dataset: loaded.current.dataset.clone(),
            })
            .await?;
        print_narrative("Preprocessing suggestions", Some(&suggestions));
    }

    // KPI comparison
    let compared = CompareKpiHandler::new(narration.clone())
        .handle(CompareKpiCommand {
            baseline: loaded.baseline.dataset.clone(),
            current: loaded.current.dataset.clone(),
            kpi: config.dashboard.default_kpi.clone(),
            bins: config.dashboard.histogram_bins,
            narrate,
        })
        .await;

    match compared {
        Ok(result) => {
            println!("== KPI ==");
            println!("{}", result.comparison);
            print_narrative("KPI insights", result.narrative.as_ref());
        }
        // KPI problems do not stop the root-cause analysis.
        Err(e) if matches!(e.code, ErrorCode::KpiNotFound | ErrorCode::KpiNotNumeric) => {
            println!("{}", e.message);
        }
        Err(e) => return Err(e),
    }

    // Root causes
    println!("== Root-cause weights (AHP) ==");
    let baseline_set = baseline_judgments(&cli.compare)?;
    let analyzed = AnalyzeCriteriaHandler::new(narration.clone())
        .handle(AnalyzeCriteriaCommand {
            comparisons: baseline_set.clone(),
            narrate,
        })
        .await;

    let report = match analyzed {
        Ok(result) => {
            println!("{}", result.report);
            print_narrative("AHP insights", result.narrative.as_ref());

            if !cli.what_if.is_empty() {
                let scenarios = cli
                    .what_if
                    .iter()
                    .map(|spec| WhatIfScenario::from_change(spec, &baseline_set))
                    .collect::<Result<Vec<_>, _>>()?;

                let swept = WhatIfHandler::new(narration.clone())
                    .handle(WhatIfCommand {
                        baseline: Arc::new(result.analysis),
                        scenarios,
                        narrate,
                    })
                    .await?;

                for outcome in &swept.outcomes {
                    println!("-- What if: {} --", outcome.label);
                    match &outcome.result {
                        Ok(comparison) => println!("{}", comparison),
                        Err(err) => println!("{}", err),
                    }
                    print_narrative("What-if insights", outcome.narrative.as_ref());
                }
            }
            Some(result.report)
        }
        Err(e) if e.code == ErrorCode::InconsistentJudgments => {
            println!("{}", e.message);
            None
        }
        Err(e) => return Err(e),
    };

    // Assistant
    if let Some(question) = cli.question {
        let answer = AskAssistantHandler::new(narration)
            .handle(AskAssistantCommand {
                question,
                baseline_summary: loaded.baseline.summary_text(),
                current_summary: loaded.current.summary_text(),
                report,
            })
            .await?;
        println!("== Assistant ==");
        println!("{}", answer.text);
    }

    Ok(())
}

fn print_narrative(heading: &str, narrative: Option<&Narrative>) {
    if let Some(narrative) = narrative {
        println!("{}:\n{}\n", heading, narrative.text);
    }
}
