//! Utility to save a user profile from the command line
//! Usage: cargo run --bin set_profile -- <user_id> <weight> <weight_unit> <height> <height_unit> [gender]

use bmt::config::Config;
use bmt::db::Database;
use bmt::tools::profile;

const USAGE: &str =
    "Usage: set_profile <user_id> <weight> <weight_unit> <height> <height_unit> [gender]";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 5 {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let config = Config::from_env()?;
    println!("Database path: {}", config.database_path.display());

    let database = Database::open(&config.database_path)?;

    let saved = profile::save_profile(
        &database,
        &args[0],
        &args[1],
        &args[2],
        &args[3],
        &args[4],
        args.get(5).map(|s| s.as_str()),
    )?;

    println!("Profile saved:");
    println!("  User: {}", saved.profile.user_id);
    println!(
        "  Weight: {} {}",
        saved.profile.weight,
        saved.profile.weight_unit.as_str()
    );
    println!(
        "  Height: {} {}",
        saved.profile.height,
        saved.profile.height_unit.as_str()
    );
    println!("  Gender: {}", saved.profile.gender.as_str());
    println!("  BMI: {:.1} ({})", saved.bmi.bmi, saved.bmi.category);
    println!("  {}", saved.description);

    Ok(())
}
