//! Recompute BMI from stored profiles and append a fresh BMI record for each
//! Usage: cargo run --bin recalculate_bmi -- [user_id]

use bmt::bmi::BmiResult;
use bmt::config::Config;
use bmt::db::Database;
use bmt::models::{BmiRecord, BmiRecordCreate, UserProfile};
use bmt::tools::normalize_user_id;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let user_id = std::env::args()
        .nth(1)
        .map(|id| normalize_user_id(&id))
        .transpose()?;

    let config = Config::from_env()?;
    println!("Database: {}", config.database_path.display());

    let database = Database::open(&config.database_path)?;

    database.with_conn(|conn| {
        let profiles: Vec<UserProfile> = match &user_id {
            Some(id) => UserProfile::get_by_user(conn, id)?.into_iter().collect(),
            None => UserProfile::list_all(conn)?,
        };

        if profiles.is_empty() {
            println!("No profiles found");
            return Ok(());
        }
        println!("Found {} profile(s)", profiles.len());

        for profile in &profiles {
            let previous = BmiRecord::latest(conn, &profile.user_id)?;

            let Some(result) = BmiResult::calculate(profile.weight_value(), profile.height_value())
            else {
                println!("\nUser {}: BMI could not be calculated, skipped", profile.user_id);
                continue;
            };

            let record =
                BmiRecord::create(conn, &BmiRecordCreate::from_result(&profile.user_id, &result))?;

            println!("\nUser: {}", profile.user_id);
            match previous {
                Some(old) => println!("  Old BMI: {:.1} ({})", old.bmi, old.category),
                None => println!("  Old BMI: none"),
            }
            println!("  New BMI: {:.1} ({})", record.bmi, record.category);
        }

        Ok(())
    })?;

    Ok(())
}
