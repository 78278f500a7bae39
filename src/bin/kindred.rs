//! Kindred CLI: birthplace and occupation analysis over a GEDCOM file.
//!
//! Usage:
//!   kindred ancestors <file> <root> [--from Y] [--to Y] [--relations]
//!   kindred birthplaces <file> [--root ID]
//!   kindred places add <place> [--county C] [--nation N]

use clap::{Args, Parser, Subcommand, ValueEnum};
use kindred::{
    AncestorQuery, ConfigError, ConfigPaths, ConfigStore, FieldExtractor, FieldKind, GedcomParser,
    IndividualId, KindredApi, PersonSearch, PlaceHierarchy, SortOrder, YearRange,
};
use kindred::extract::MAX_FIELD_DEPTH;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "kindred",
    version,
    about = "Birthplace and occupation analysis for family trees"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Directory holding places.json and occupations.json
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    /// Deepest nested note level searched for values
    #[arg(long, global = true, default_value_t = MAX_FIELD_DEPTH)]
    max_depth: usize,
}

/// How far and how wide an ancestor walk goes
#[derive(Args, Clone, Default)]
struct WalkArgs {
    /// Earliest birth year kept
    #[arg(long)]
    from: Option<i32>,
    /// Latest birth year kept
    #[arg(long)]
    to: Option<i32>,
    /// Drop individuals with no birth year when a range is given
    #[arg(long)]
    exclude_undated: bool,
    /// Include siblings, spouses and children of ancestors
    #[arg(long)]
    relations: bool,
    /// Maximum parent generations to climb
    #[arg(long)]
    generations: Option<usize>,
}

#[derive(Args, Clone, Default)]
struct ScopeArgs {
    /// Restrict to this individual's ancestors
    #[arg(long)]
    root: Option<String>,
    #[command(flatten)]
    walk: WalkArgs,
}

impl WalkArgs {
    fn query(&self, root: &str) -> AncestorQuery {
        let mut years = YearRange::between(self.from, self.to);
        if self.exclude_undated {
            years = years.exclude_undated();
        }
        let query = AncestorQuery::from(root)
            .years(years)
            .with_relations(self.relations);
        match self.generations {
            Some(n) => query.max_generations(n),
            None => query,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List an individual's direct ancestors by generation
    Ancestors {
        /// GEDCOM file
        file: PathBuf,
        /// Root individual, e.g. @I1@
        root: String,
        #[command(flatten)]
        walk: WalkArgs,
    },
    /// Show the raw birthplace or occupation values found for one individual
    Extract {
        file: PathBuf,
        id: String,
        /// birthplace or occupation
        #[arg(long, default_value = "birthplace")]
        kind: FieldKind,
    },
    /// Birthplace report
    Birthplaces {
        file: PathBuf,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Occupation report
    Occupations {
        file: PathBuf,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Find individuals by name
    Search {
        file: PathBuf,
        name: String,
        /// Match the whole name
        #[arg(long)]
        exact: bool,
        #[arg(long)]
        born_from: Option<i32>,
        #[arg(long)]
        born_to: Option<i32>,
        #[arg(long)]
        died_from: Option<i32>,
        #[arg(long)]
        died_to: Option<i32>,
        #[arg(long, value_enum, default_value_t = SortArg::Birth)]
        sort: SortArg,
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Data-quality checks: negative ages and unlinked individuals
    Check {
        file: PathBuf,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Classify one place string against the configuration
    ClassifyPlace { text: String },
    /// Classify one occupation string against the configuration
    ClassifyOccupation { text: String },
    /// Inspect or extend the place configuration
    Places {
        #[command(subcommand)]
        action: PlacesAction,
    },
}

#[derive(Subcommand)]
enum PlacesAction {
    /// Print the place hierarchy
    List,
    /// Register a place under a county or directly under a nation
    Add {
        place: String,
        #[arg(long)]
        county: Option<String>,
        #[arg(long)]
        nation: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Birth,
    BirthDesc,
    Name,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Birth => SortOrder::BirthAscending,
            SortArg::BirthDesc => SortOrder::BirthDescending,
            SortArg::Name => SortOrder::Name,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn load_config(dir: Option<&Path>) -> ConfigStore {
    let paths = match dir {
        Some(dir) => ConfigPaths::in_dir(dir),
        None => ConfigPaths::default_location(),
    };
    let load = ConfigStore::load(paths);
    for problem in &load.problems {
        match problem {
            // A first run has no config yet
            ConfigError::Load { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {}
            other => eprintln!("Warning: {}", other),
        }
    }
    load.store
}

fn open_api(
    file: &Path,
    config: ConfigStore,
    extractor: FieldExtractor,
    scope: &ScopeArgs,
) -> Result<KindredApi, String> {
    let graph = GedcomParser::new()
        .parse_file(file)
        .map_err(|e| format!("cannot read '{}': {}", file.display(), e))?;
    let mut api = KindredApi::new(graph, config).with_extractor(extractor);
    if let Some(root) = &scope.root {
        api.set_scope(scope.walk.query(root)).map_err(|e| e.to_string())?;
    }
    Ok(api)
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn year(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "?".to_string())
}

fn cmd_ancestors(api: &KindredApi, root: &str, walk: &WalkArgs, json: bool) -> i32 {
    let set = match api.walk(walk.query(root)) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if json {
        return print_json(&set);
    }

    let describe = |id: &IndividualId| match api.graph().individual(id) {
        Some(person) => format!("{:<10} {} (b. {})", id, person.display_name(), year(person.birth_year())),
        None => id.to_string(),
    };
    for (generation, members) in set.generations.iter().enumerate() {
        if members.is_empty() {
            continue;
        }
        println!("Generation {}", generation);
        for id in members {
            println!("  {}", describe(id));
        }
    }
    if !set.relations.is_empty() {
        println!("Relations");
        for id in &set.relations {
            println!("  {}", describe(id));
        }
    }
    for cycle in &set.cycles {
        eprintln!("Warning: {} is listed as an ancestor of itself via {}", cycle.ancestor, cycle.descendant);
    }
    println!("{} individuals", set.len());
    0
}

fn cmd_extract(api: &KindredApi, id: &str, kind: FieldKind, json: bool) -> i32 {
    let extraction = match api.extract_fields(&IndividualId::from(id), kind) {
        Ok(extraction) => extraction,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if json {
        return print_json(&extraction);
    }
    if extraction.is_empty() {
        println!("No {} values found for {}", kind, id);
    }
    for field in &extraction.fields {
        match field.year {
            Some(y) => println!("{:<20} {} [{}]", field.tag, field.value, y),
            None => println!("{:<20} {}", field.tag, field.value),
        }
    }
    if extraction.truncated {
        eprintln!("Warning: nesting too deep; some fields were skipped");
    }
    0
}

fn cmd_birthplaces(api: &KindredApi, json: bool) -> i32 {
    let report = api.birthplace_report();
    if json {
        return print_json(&report);
    }

    println!(
        "{} individuals, {} classified, {} unclassified, {} without a birthplace",
        report.individuals,
        report.classified_count(),
        report.unclassified_count(),
        report.missing.len()
    );
    for (nation, tally) in &report.nations {
        println!("\n{} ({})", nation, tally.total);
        for (name, entry) in &tally.entries {
            let marker = if entry.direct { "" } else { " [county]" };
            println!("  {}{} ({})", name, marker, entry.total);
            for (place, count) in &entry.places {
                println!("    {:<32} {:>5}", place, count);
            }
            if entry.unlisted > 0 {
                println!("    {:<32} {:>5}", "(unlisted place)", entry.unlisted);
            }
        }
        if tally.nation_only > 0 {
            println!("  {:<34} {:>5}", "(nation only)", tally.nation_only);
        }
    }
    if !report.unclassified.is_empty() {
        println!("\nUnclassified");
        for (text, count) in &report.unclassified {
            println!("  {:<34} {:>5}", text, count);
        }
    }
    if !report.fuzzy.is_empty() {
        println!("\nFuzzy matches");
        for m in &report.fuzzy {
            println!("  {}: '{}' -> {}", m.person.name, m.value, m.classified_as);
        }
    }
    if !report.multiple.is_empty() {
        println!("\nMultiple birthplaces");
        for m in &report.multiple {
            println!("  {}: {}", m.person.name, m.values.join("; "));
        }
    }
    0
}

fn cmd_occupations(api: &KindredApi, json: bool) -> i32 {
    let report = api.occupation_report();
    if json {
        return print_json(&report);
    }

    println!(
        "{} individuals, {} with an occupation",
        report.individuals, report.with_occupation
    );
    for (group, tally) in &report.groups {
        println!("\n{} ({})", group, tally.total);
        for (variant, count) in &tally.variants {
            println!("  {:<34} {:>5}", variant, count);
        }
    }
    if !report.unclassified.is_empty() {
        println!("\nUnclassified");
        for (text, count) in &report.unclassified {
            println!("  {:<34} {:>5}", text, count);
        }
    }
    0
}

fn cmd_search(api: &KindredApi, search: &PersonSearch, json: bool) -> i32 {
    let results = api.search(search);
    if json {
        return print_json(&results);
    }
    if results.is_empty() {
        println!("No individuals match '{}'", search.name);
        return 0;
    }
    println!("{:<10}  {:<32}  {:>6}  {:>6}", "ID", "NAME", "BORN", "DIED");
    println!("{}", "-".repeat(60));
    for person in &results {
        println!(
            "{:<10}  {:<32}  {:>6}  {:>6}",
            person.id,
            person.name,
            year(person.birth_year),
            year(person.death_year)
        );
    }
    0
}

fn cmd_check(api: &KindredApi, json: bool) -> i32 {
    let negative = api.negative_ages();
    let orphans = api.orphans();
    if json {
        return print_json(&serde_json::json!({
            "negative_ages": negative,
            "orphans": orphans,
        }));
    }

    if negative.is_empty() {
        println!("No individuals with negative ages.");
    } else {
        println!("Negative ages ({})", negative.len());
        for anomaly in &negative {
            println!(
                "  {:<10} {:<32} born {} died {} (age {})",
                anomaly.person.id, anomaly.person.name, anomaly.born, anomaly.died, anomaly.age
            );
        }
    }
    if orphans.is_empty() {
        println!("No individuals without family links.");
    } else {
        println!("Without family links ({})", orphans.len());
        for person in &orphans {
            println!("  {:<10} {}", person.id, person.name);
        }
    }
    0
}

fn cmd_classify_place(config: ConfigStore, text: &str, json: bool) -> i32 {
    let api = KindredApi::new(Default::default(), config);
    let result = api.classify_place(text);
    if json {
        return print_json(&result);
    }
    if !result.class.is_classified() {
        println!("Unclassified: {}", text);
        return 0;
    }
    let mut flags = Vec::new();
    if result.fuzzy {
        flags.push("fuzzy");
    }
    if !result.listed {
        flags.push("partial");
    }
    if flags.is_empty() {
        println!("{}", result.class);
    } else {
        println!("{} [{}]", result.class, flags.join(", "));
    }
    0
}

fn cmd_classify_occupation(config: ConfigStore, text: &str, json: bool) -> i32 {
    let api = KindredApi::new(Default::default(), config);
    let class = api.classify_occupation(text);
    if json {
        return print_json(&class);
    }
    if class.is_classified() {
        println!("{}", class.display_name());
    } else {
        println!("Unclassified: {}", text);
    }
    0
}

fn cmd_places_list(places: &PlaceHierarchy, json: bool) -> i32 {
    if json {
        return print_json(places);
    }
    if places.is_empty() {
        println!("No places configured.");
        return 0;
    }

    let nations: std::collections::BTreeSet<&String> = places
        .nation_counties
        .keys()
        .chain(places.nation_places.keys())
        .collect();
    for nation in nations {
        println!("{}", nation);
        for county in places.nation_counties.get(nation).into_iter().flatten() {
            println!("  {} [county]", county);
            for (place, details) in places.county_places.get(county).into_iter().flatten() {
                let extra = details.local2_places.len() + details.known_streets.len();
                if extra > 0 {
                    println!("    {} (+{} localities)", place, extra);
                } else {
                    println!("    {}", place);
                }
            }
        }
        for place in places.nation_places.get(nation).into_iter().flatten() {
            println!("  {}", place);
        }
    }
    0
}

fn cmd_places_add(config: &ConfigStore, place: &str, county: Option<&str>, nation: Option<&str>) -> i32 {
    let updated = match config.with_place(place, county, nation) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if let Err(e) = updated.save_places() {
        eprintln!("Error: {}", e);
        return 1;
    }
    let under = county.or(nation).unwrap_or_default();
    println!("Registered '{}' under {}", place, under);
    0
}

fn with_api(
    file: &Path,
    config: ConfigStore,
    extractor: FieldExtractor,
    scope: &ScopeArgs,
    run: impl FnOnce(&KindredApi) -> i32,
) -> i32 {
    match open_api(file, config, extractor, scope) {
        Ok(api) => run(&api),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config_dir.as_deref());
    let json = cli.json;
    let extractor = FieldExtractor::new().with_max_depth(cli.max_depth);

    let code = match cli.command {
        Commands::Ancestors { file, root, walk } => {
            with_api(&file, config, extractor, &ScopeArgs::default(), |api| {
                cmd_ancestors(api, &root, &walk, json)
            })
        }
        Commands::Extract { file, id, kind } => {
            with_api(&file, config, extractor, &ScopeArgs::default(), |api| cmd_extract(api, &id, kind, json))
        }
        Commands::Birthplaces { file, scope } => {
            with_api(&file, config, extractor, &scope, |api| cmd_birthplaces(api, json))
        }
        Commands::Occupations { file, scope } => {
            with_api(&file, config, extractor, &scope, |api| cmd_occupations(api, json))
        }
        Commands::Search {
            file,
            name,
            exact,
            born_from,
            born_to,
            died_from,
            died_to,
            sort,
            limit,
            scope,
        } => {
            let mut search = PersonSearch::new(name)
                .born_between(born_from, born_to)
                .died_between(died_from, died_to)
                .order(sort.into());
            if exact {
                search = search.exact();
            }
            if let Some(limit) = limit {
                search = search.limit(limit);
            }
            with_api(&file, config, extractor, &scope, |api| cmd_search(api, &search, json))
        }
        Commands::Check { file, scope } => with_api(&file, config, extractor, &scope, |api| cmd_check(api, json)),
        Commands::ClassifyPlace { text } => cmd_classify_place(config, &text, json),
        Commands::ClassifyOccupation { text } => cmd_classify_occupation(config, &text, json),
        Commands::Places { action } => match action {
            PlacesAction::List => cmd_places_list(config.places(), json),
            PlacesAction::Add {
                place,
                county,
                nation,
            } => cmd_places_add(&config, &place, county.as_deref(), nation.as_deref()),
        },
    };
    std::process::exit(code);
}
