use anyhow::Result;
use std::env;

use meal_arena::{
    create_meal, get_meal_by_name, rank, ArenaError, BattleArena, Difficulty, SortKey, SqliteStore,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("init") => run_init()?,
        Some("seed") => run_seed()?,
        Some("battle") if args.len() >= 4 => run_battle(&args[2], &args[3])?,
        Some("leaderboard") => run_leaderboard(args.get(2).map(String::as_str))?,
        _ => print_usage(),
    }

    Ok(())
}

fn db_path() -> String {
    env::var("MEAL_ARENA_DB").unwrap_or_else(|_| "meal_arena.db".to_string())
}

fn print_usage() {
    println!("Meal Arena v{}", meal_arena::VERSION);
    println!();
    println!("Usage:");
    println!("  meal-arena init                       Create the database");
    println!("  meal-arena seed                       Insert a sample catalog");
    println!("  meal-arena battle <name1> <name2>     Stage two meals and fight");
    println!("  meal-arena leaderboard [sort]         Show rankings");
    println!("                                        (wins | win_ratio | battles_fought)");
    println!();
    println!("Database file comes from MEAL_ARENA_DB (default: meal_arena.db)");
}

fn run_init() -> Result<()> {
    SqliteStore::open(db_path())?;
    println!("✓ Database initialized: {}", db_path());
    Ok(())
}

fn run_seed() -> Result<()> {
    let mut store = SqliteStore::open(db_path())?;

    let samples = [
        ("Tacos al Pastor", "Mexican", 11.5, Difficulty::Low),
        ("Margherita Pizza", "Italian", 14.0, Difficulty::Low),
        ("Pad Thai", "Thai", 13.0, Difficulty::Med),
        ("Tonkotsu Ramen", "Japanese", 16.5, Difficulty::Med),
        ("Beef Wellington", "British", 38.0, Difficulty::High),
        ("Coq au Vin", "French", 27.0, Difficulty::High),
    ];

    for (name, cuisine, price, difficulty) in samples {
        match create_meal(&mut store, name, cuisine, price, difficulty) {
            Ok(meal) => println!("✓ Seeded {} (id {})", meal.name, meal.id),
            Err(ArenaError::Validation(msg)) => println!("- Skipped {}: {}", name, msg),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn run_battle(first_name: &str, second_name: &str) -> Result<()> {
    let mut store = SqliteStore::open(db_path())?;
    let mut arena = BattleArena::new();

    let first = get_meal_by_name(&store, first_name)?;
    let second = get_meal_by_name(&store, second_name)?;
    arena.prep_combatant(&store, first.id)?;
    arena.prep_combatant(&store, second.id)?;

    let mut rng = rand::thread_rng();
    let outcome = arena.battle(&mut store, &mut rng)?;

    println!("⚔️  {} vs {}", first.name, second.name);
    println!(
        "🏆 {} wins  ({:.1} vs {:.1}, p = {:.3})",
        outcome.winner.name, outcome.winner_score, outcome.loser_score, outcome.win_probability
    );

    Ok(())
}

fn run_leaderboard(sort: Option<&str>) -> Result<()> {
    let key: SortKey = sort.unwrap_or("wins").parse()?;
    let store = SqliteStore::open(db_path())?;
    let entries = rank(&store, key)?;

    if entries.is_empty() {
        println!("No battles fought yet.");
        return Ok(());
    }

    for (place, entry) in entries.iter().enumerate() {
        println!(
            "{:>2}. {:<24} {:>3} wins / {:>3} battles  ({:.1}%)",
            place + 1,
            entry.meal.name,
            entry.stats.wins,
            entry.stats.battles,
            entry.win_ratio * 100.0
        );
    }

    Ok(())
}
