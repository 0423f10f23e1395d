mod common;

use assert2::{check, let_assert};
use buffbot::command::{self, Command, Reply, Request};
use buffbot::format::{Outcome, render_block};
use buffbot::search::{IndelRatio, Resolver, SortDirection, SortOrder, Source};
use buffbot::{LoadError, SourceTables};
use common::{CHANNEL, TablesWorkspace, large_workspace, tables_workspace};
use rstest::rstest;

fn request(argument: &str) -> Request<'_> {
    Request {
        invoker: "tester",
        channel_id: CHANNEL,
        is_direct: false,
        argument,
    }
}

async fn run(workspace: &TablesWorkspace, command: Command, argument: &str) -> Reply {
    command::handle(&workspace.config, command, request(argument))
        .await
        .expect("tables should load")
}

/// (title line, effect line) for each rendered entry.
fn rendered_entries(text: &str) -> Vec<(String, String)> {
    let lines: Vec<&str> = text.lines().collect();
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.starts_with("**Nutrient: ") || line.starts_with("**Effect: "))
        .map(|(i, title)| (title.to_string(), lines[i + 3].to_string()))
        .collect()
}

fn title_key(title: &str) -> String {
    let inner = title.trim_start_matches("**").trim_end_matches("**");
    let (_, key) = inner.split_once(": ").expect("title has a source label");
    key.to_string()
}

fn effect_number(effect_line: &str) -> i64 {
    let token = effect_line
        .trim_start_matches("- Effect: ")
        .split_whitespace()
        .next()
        .unwrap();
    buffbot::search::parse_effect_value(token).unwrap()
}

// --- Outcome properties ---

#[rstest]
#[tokio::test]
async fn resolution_is_deterministic(tables_workspace: TablesWorkspace) {
    let first = run(&tables_workspace, Command::Buff, "iron").await;
    let second = run(&tables_workspace, Command::Buff, "iron").await;
    check!(first == second);
}

#[rstest]
#[tokio::test]
async fn descending_values_never_increase(tables_workspace: TablesWorkspace) {
    let reply = run(&tables_workspace, Command::Buff, "iron").await;
    let values: Vec<i64> = rendered_entries(&reply.text)
        .iter()
        .map(|(_, effect)| effect_number(effect))
        .collect();
    check!(values == [1200, 50, 15, 15, 5]);
    check!(values.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[rstest]
#[tokio::test]
async fn ascending_values_never_decrease(tables_workspace: TablesWorkspace) {
    let reply = run(&tables_workspace, Command::BuffNeg, "iron").await;
    let values: Vec<i64> = rendered_entries(&reply.text)
        .iter()
        .map(|(_, effect)| effect_number(effect))
        .collect();
    check!(values.windows(2).all(|pair| pair[0] <= pair[1]));
    check!(reply.text.starts_with("__Command__: **/buffneg iron**"));
}

#[rstest]
#[tokio::test]
async fn alphabetical_keys_never_decrease(tables_workspace: TablesWorkspace) {
    let reply = run(&tables_workspace, Command::BuffAlpha, "o").await;
    let keys: Vec<String> = rendered_entries(&reply.text)
        .iter()
        .map(|(title, _)| title_key(title).to_lowercase())
        .collect();
    check!(keys.len() > 3);
    check!(keys.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[rstest]
#[tokio::test]
async fn no_duplicate_identities(tables_workspace: TablesWorkspace) {
    let tables = SourceTables::load(&tables_workspace.config).await.unwrap();
    let resolution =
        Resolver::new(&tables, IndelRatio, 80).resolve("o", SortOrder::default());

    let mut identities: Vec<String> = resolution
        .matches
        .iter()
        .map(|m| match m.source {
            Source::Nutrient => m.key.to_lowercase(),
            Source::Effect => m.nutrient.to_lowercase(),
        })
        .collect();
    let total = identities.len();
    identities.sort();
    identities.dedup();
    check!(identities.len() == total);
}

// --- Truncation ---

#[rstest]
#[tokio::test]
async fn large_result_is_truncated_with_summary(large_workspace: TablesWorkspace) {
    let reply = run(&large_workspace, Command::Buff, "iron").await;
    let shown = rendered_entries(&reply.text).len();

    check!(reply.text.chars().count() <= 1900);
    check!(shown < 60);
    check!(reply.text.ends_with(&format!("\n{} out of 60 items shown", shown)));
    check!(reply.private, "more than six entries are private");
}

#[rstest]
#[tokio::test]
async fn small_result_has_no_summary(tables_workspace: TablesWorkspace) {
    let reply = run(&tables_workspace, Command::Buff, "iron").await;
    check!(!reply.text.contains("items shown"));
    check!(!reply.private);
}

#[rstest]
#[case(400)]
#[case(900)]
#[case(1900)]
#[tokio::test]
async fn truncation_respects_any_budget(large_workspace: TablesWorkspace, #[case] budget: usize) {
    let tables = SourceTables::load(&large_workspace.config).await.unwrap();
    let resolution = Resolver::new(&tables, IndelRatio, 80)
        .resolve("iron", SortOrder::by_value(SortDirection::Descending));
    let_assert!(
        Outcome::Found(block) = render_block("/buff iron", "iron", &resolution.matches, budget)
    );
    check!(block.text.chars().count() <= budget);
    check!(block.shown <= block.total);
    check!(block.text.contains("items shown") == (block.shown < block.total));
}

// --- Examples ---

#[tokio::test]
async fn single_nutrient_example() {
    let workspace = TablesWorkspace::new(
        r#"{"Iron Root": {"nutrient": "Iron", "duration": "10 minutes", "effect": "+15% Health"}}"#,
        "{}",
    );
    let tables = SourceTables::load(&workspace.config).await.unwrap();
    let resolution = Resolver::new(&tables, IndelRatio, 80).resolve("iron", SortOrder::default());

    let_assert!([found] = resolution.matches.as_slice());
    check!(found.parsed_value == 15);
    check!(found.source == Source::Nutrient);

    let reply = run(&workspace, Command::Buff, "iron").await;
    check!(reply.text.contains("**Nutrient: Iron Root**\n"));
}

#[rstest]
#[case("")]
#[case("   ")]
#[tokio::test]
async fn empty_query_is_no_match(tables_workspace: TablesWorkspace, #[case] query: &str) {
    let reply = run(&tables_workspace, Command::Buff, query).await;
    check!(
        reply
            == Reply::private(format!(
                "No matches found for '{}'. Try adjusting your search term.",
                query
            ))
    );
}

#[rstest]
#[tokio::test]
async fn malformed_subrecord_is_skipped(tables_workspace: TablesWorkspace) {
    let tables = SourceTables::load(&tables_workspace.config).await.unwrap();
    let resolution = Resolver::new(&tables, IndelRatio, 80).resolve("toxic", SortOrder::default());

    let_assert!([found] = resolution.matches.as_slice());
    check!(found.effect == "-20 Health");
    check!(resolution.skipped.len() == 1);

    let reply = run(&tables_workspace, Command::Buff, "toxic").await;
    check!(reply.text.contains("**Effect: Toxic**"));
    check!(!reply.text.contains("Venom"));
}

#[rstest]
#[tokio::test]
async fn fuzzy_match_without_substring(tables_workspace: TablesWorkspace) {
    let reply = run(&tables_workspace, Command::Buff, "Radiashun Shield").await;
    check!(reply.text.contains("**Effect: Radiation Shield**"));
    check!(reply.text.starts_with("__Command__: **/buff Radiashun Shield**"));
}

// --- Failures ---

#[rstest]
#[tokio::test]
async fn corrupt_table_is_fatal(tables_workspace: TablesWorkspace) {
    tables_workspace.create_file("effects.json", "{ not json");
    let result = command::handle(&tables_workspace.config, Command::Buff, request("iron")).await;
    let_assert!(Err(LoadError::Parse { table: "effect", .. }) = result);
}

#[rstest]
#[tokio::test]
async fn missing_table_is_fatal(tables_workspace: TablesWorkspace) {
    std::fs::remove_file(tables_workspace.path().join("nutrients.json")).unwrap();
    let result = command::handle(&tables_workspace.config, Command::Buff, request("iron")).await;
    let_assert!(Err(LoadError::NotFound { table: "nutrient", .. }) = result);
}
