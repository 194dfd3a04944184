use data_loader::DataIndex;
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));

    println!("Loading user data from {}...\n", data_dir.display());

    let start = Instant::now();
    let index = DataIndex::load_from_dir(&data_dir)
        .expect("Failed to load data directory");
    let elapsed = start.elapsed();

    let (users, records, ratings) = index.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Users: {}", users);
    println!("History records: {}", records);
    println!("Ratings: {}", ratings);
    println!("\nPerformance: {:.0} records/second",
             (records + ratings) as f64 / elapsed.as_secs_f64());
}
