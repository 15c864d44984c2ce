use clap::Parser;
use hinagata::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// --- Recipe File Format ---
// A recipe file is either a list of anonymous documents or an object mapping
// recipe ids to documents.

#[derive(Deserialize)]
#[serde(untagged)]
enum RecipeFile {
    Named(BTreeMap<String, Document>),
    List(Vec<Document>),
}

impl RecipeFile {
    fn into_entries(self) -> Vec<(Option<ResourceId>, Document)> {
        match self {
            RecipeFile::List(documents) => documents.into_iter().map(|d| (None, d)).collect(),
            RecipeFile::Named(documents) => documents
                .into_iter()
                .map(|(id, document)| {
                    let id = ResourceId::parse(&id).unwrap_or_else(|e| {
                        exit_with_error(&format!("Invalid recipe id '{}': {}", id, e))
                    });
                    (Some(id), document)
                })
                .collect(),
        }
    }
}

/// Load recipe schemas, then parse, construct and re-serialize recipes
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the schema definitions JSON file
    schemas_path: String,
    /// Optional path to a recipes JSON file to load
    recipes_path: Option<String>,

    /// Optional path to a settings JSON file
    #[arg(short, long)]
    settings: Option<String>,

    /// Keep a pristine copy of every parsed document
    #[arg(short, long)]
    debug: bool,

    /// Stop at the first malformed recipe
    #[arg(long)]
    fail_fast: bool,

    /// Print every schema with its constructor table
    #[arg(long)]
    describe: bool,

    /// Build one recipe from positional arguments given as a JSON array
    #[arg(long, num_args = 2, value_names = ["TYPE", "ARGS_JSON"])]
    construct: Option<Vec<String>>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. Settings ---
    let settings = match &cli.settings {
        Some(path) => Settings::from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to read settings '{}': {}", path, e))
        }),
        None => Settings::default(),
    };
    let settings = Settings {
        debug_info: settings.debug_info || cli.debug,
        fail_fast: settings.fail_fast || cli.fail_fast,
    };

    // --- 2. Schema Registration ---
    let definitions = definitions_from_file(&cli.schemas_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load schemas from '{}': {}",
            cli.schemas_path, e
        ))
    });
    let (registry, errors) =
        SchemaRegistry::from_definitions(definitions, &ComponentRegistry::new(), settings);
    for (type_id, error) in &errors {
        eprintln!("Schema '{}' was not registered: {}", type_id, error);
    }
    println!("Registered {} recipe types", registry.len());

    if cli.describe {
        describe(&registry);
    }

    // --- 3. Construction ---
    if let Some(args) = &cli.construct {
        construct(&registry, &args[0], &args[1]);
    }

    // --- 4. Loading ---
    if let Some(recipes_path) = &cli.recipes_path {
        load(&registry, recipes_path);
    }

    println!("\nDone in {:?}", total_start.elapsed());
    if !errors.is_empty() {
        std::process::exit(1);
    }
}

fn describe(registry: &SchemaRegistry) {
    let mut type_ids: Vec<_> = registry.type_ids().collect();
    type_ids.sort_unstable();

    for type_id in type_ids {
        let Some(schema) = registry.get(type_id) else {
            continue;
        };
        println!("\n{}: {}", type_id, schema);
        for (arity, constructor) in schema.constructors().iter() {
            let origin = if constructor.is_custom() { "custom" } else { "auto" };
            println!("  {} -> {} [{}]", arity, constructor.describe(schema), origin);
        }
    }
}

fn construct(registry: &SchemaRegistry, type_id: &str, args_json: &str) {
    let args: Vec<serde_json::Value> = serde_json::from_str(args_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Arguments must be a JSON array: {}", e)));

    match registry.construct(type_id, args) {
        Ok(record) => {
            println!("\nConstructed {}", record);
            print_document(&record.to_document());
        }
        Err(e) => exit_with_error(&format!("Failed to construct '{}': {}", type_id, e)),
    }
}

fn load(registry: &SchemaRegistry, recipes_path: &str) {
    let load_start = Instant::now();
    let content = fs::read_to_string(recipes_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read recipes file '{}': {}",
            recipes_path, e
        ))
    });
    let file: RecipeFile = serde_json::from_str(&content)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse recipes JSON: {}", e)));

    let report = registry.load(file.into_entries());
    let load_duration = load_start.elapsed();

    println!("\n--- Loaded Recipes ---");
    for record in &report.records {
        println!("{}", record);
        print_document(&record.to_document());
    }

    if !report.is_clean() {
        println!("\n--- Failures ---");
        for failure in &report.failures {
            match &failure.id {
                Some(id) => println!("'{}': {}", id, failure.error),
                None => println!("#{}: {}", failure.index, failure.error),
            }
        }
    }

    println!(
        "\n{} loaded, {} failed in {:?}",
        report.records.len(),
        report.failures.len(),
        load_duration
    );
}

fn print_document(document: &Document) {
    match serde_json::to_string_pretty(document) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize document: {}", e),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
