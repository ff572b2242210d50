use crate::infra::{build_engine, build_orchestrator, read_json_file};
use clap::Args;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use trolley_ai::config::{AppConfig, DecisionConfig};
use trolley_ai::dilemma::{
    decide_batch, AgeGroup, AggregateScenario, ComparisonRequest, ComparisonResult,
    DecisionMode, DecisionResult, Flag, FlagOverrides, HeadCount, Person, Role, Roster,
    Scenario, TrackId, WeightOverrides,
};
use trolley_ai::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct ScenarioArgs {
    /// JSON file holding the scenario
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Classifier model to use instead of TROLLEY_MODEL_PATH
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV of aggregate scenarios (t1_children .. t2_elders, optional mode)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Where to write decision rows (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Classifier model to use instead of TROLLEY_MODEL_PATH
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Classifier model to include in the comparison
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Record a manual choice (1 or 2) against the demo comparison
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub(crate) manual_choice: Option<u8>,
}

fn decision_config(model: Option<PathBuf>) -> Result<DecisionConfig, AppError> {
    let mut decision = AppConfig::load()?.decision;
    if model.is_some() {
        decision.model_path = model;
    }
    Ok(decision)
}

pub(crate) fn run_decide(args: ScenarioArgs) -> Result<(), AppError> {
    let ScenarioArgs { file, model } = args;
    let engine = build_engine(&decision_config(model)?);
    let scenario: Scenario = read_json_file(&file)?;

    let result = engine.decide(&scenario);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub(crate) fn run_compare(args: ScenarioArgs) -> Result<(), AppError> {
    let ScenarioArgs { file, model } = args;
    let orchestrator = build_orchestrator(&decision_config(model)?);
    let request: ComparisonRequest = read_json_file(&file)?;

    let comparison = orchestrator.compare(&request);
    println!("{}", serde_json::to_string_pretty(&comparison)?);
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let BatchArgs {
        input,
        output,
        model,
    } = args;
    let engine = build_engine(&decision_config(model)?);
    let reader = BufReader::new(File::open(&input)?);

    let summary = match &output {
        Some(path) => decide_batch(&engine, reader, File::create(path)?)?,
        None => decide_batch(&engine, reader, io::stdout().lock())?,
    };

    let mut stderr = io::stderr().lock();
    writeln!(
        stderr,
        "Decided {} scenarios from {} (track 1: {}, track 2: {})",
        summary.rows,
        input.display(),
        summary.track1_chosen,
        summary.track2_chosen
    )?;
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        model,
        manual_choice,
    } = args;
    let orchestrator = build_orchestrator(&decision_config(model)?);

    println!("Trolley dilemma demo");
    println!("\nAggregate scenario: 2 children vs 1 child + 2 adults");
    let track1 = HeadCount::new(2, 0, 0);
    let track2 = HeadCount::new(1, 2, 0);
    for mode in [DecisionMode::Normal, DecisionMode::ChildrenFirst, DecisionMode::Ml] {
        let scenario = AggregateScenario::new(track1, track2, mode.clone());
        render_decision(mode.label(), &orchestrator.engine().decide_aggregate(&scenario));
    }

    println!("\nRoster scenario");
    let request = demo_request(manual_choice.and_then(|choice| TrackId::from_index(choice.into())));
    render_roster("Track 1", &request.track1);
    render_roster("Track 2", &request.track2);

    let comparison = orchestrator.compare(&request);
    render_comparison(&comparison);
    Ok(())
}

fn demo_request(manual_choice: Option<TrackId>) -> ComparisonRequest {
    let track1 = Roster::new(vec![
        Person::new(Some(AgeGroup::Child), Some(Role::Student), [Flag::Innocent]),
        Person::new(Some(AgeGroup::Adult), Some(Role::Doctor), [Flag::SavesLives]),
    ]);
    let track2 = Roster::new(vec![
        Person::new(Some(AgeGroup::Elder), Some(Role::Retired), []),
        Person::new(
            Some(AgeGroup::Adult),
            Some(Role::Criminal),
            [Flag::Guilty, Flag::LawBreaker],
        ),
        Person::new(Some(AgeGroup::Young), Some(Role::Pregnant), [Flag::Pregnant]),
    ]);

    let mut request = ComparisonRequest::new(track1, track2);
    request.custom_rules = Some(WeightOverrides {
        flag: FlagOverrides {
            guilty: Some(-5),
            ..FlagOverrides::default()
        },
        ..WeightOverrides::default()
    });
    request.manual_choice = manual_choice;
    request
}

fn render_roster(label: &str, roster: &Roster) {
    println!("- {label}:");
    for person in roster.people() {
        let flags: Vec<_> = person.flags().map(Flag::label).collect();
        println!(
            "    {} / {} [{}]",
            person.age().map_or("unset", AgeGroup::label),
            person.role().map_or("unset", Role::label),
            flags.join(", ")
        );
    }
}

fn render_decision(label: &str, result: &DecisionResult) {
    println!(
        "- {label}: sacrifice track {} ({:?})",
        result.chosen_track, result.rule
    );
    println!("    {}", result.reason);
}

fn render_comparison(comparison: &ComparisonResult) {
    println!("\nStrategy comparison");
    for (strategy, result) in &comparison.results {
        render_decision(strategy.label(), result);
    }

    if let Some(choice) = comparison.manual.manual_choice {
        println!("\nManual choice: track {choice}");
        for (strategy, agrees) in &comparison.manual.agreements {
            let verdict = if *agrees { "agrees" } else { "disagrees" };
            println!("- {strategy} {verdict}");
        }
    }

    let stats = &comparison.stats;
    match stats.agreement_rate {
        Some(rate) => println!(
            "\nAgreement: {} of {} manual decisions ({:.0}%)",
            stats.total_ai_agreements,
            stats.total_manual_decisions,
            rate * 100.0
        ),
        None => println!("\nAgreement: no manual decisions recorded"),
    }
}
