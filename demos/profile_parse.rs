use serde::Deserialize;
use std::collections::HashMap;
use std::hint::black_box;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
struct Address {
    city: String,
    street: String,
    postcode: String,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
struct QueryParams {
    id: u8,
    name: String,
    phone: u32,
    address: Address,
    user_ids: Vec<u8>,
}

const COMPLEX_QUERY: &str = "id=42&name=Acme&phone=12345&address[city]=Carrot+City&\
                             address[street]=Special-Street*+No.+11&address[postcode]=12345&\
                             user_ids[0]=1&user_ids[1]=2&user_ids[2]=3&user_ids[3]=4";

fn main() {
    let profile_duration = Duration::from_secs(30); // Run for 30 seconds
    println!("Profiling parsing for {:?}...", profile_duration);

    match std::env::args().nth(1).as_deref() {
        Some("tree") => profile_tree_timed(profile_duration),
        Some("typed") => profile_typed_timed(profile_duration),
        Some("mixed") => profile_mixed_workload(profile_duration),
        _ => {
            println!("Usage: cargo run --release --example profile_parse [tree|typed|mixed]");
            println!("Defaulting to mixed workload...");
            profile_mixed_workload(profile_duration);
        }
    }
}

fn report(label: &str, count: u64, elapsed: Duration) {
    println!("Completed {} {} in {:?}", count, label, elapsed);
    println!("Average: {:?} per operation", elapsed / count.max(1) as u32);
}

fn profile_tree_timed(duration: Duration) {
    println!("Running tree building profile...");

    let start = Instant::now();
    let mut count = 0u64;

    while start.elapsed() < duration {
        // Run in batches to reduce timing overhead
        for _ in 0..1000 {
            let _ = php_qs::parse_str(black_box(COMPLEX_QUERY)).unwrap();
            count += 1;
        }
    }

    report("tree parses", count, start.elapsed());
}

fn profile_typed_timed(duration: Duration) {
    println!("Running typed deserialization profile...");

    let start = Instant::now();
    let mut count = 0u64;

    while start.elapsed() < duration {
        for _ in 0..1000 {
            let _: QueryParams = php_qs::from_str(black_box(COMPLEX_QUERY)).unwrap();
            count += 1;
        }
    }

    report("deserializations", count, start.elapsed());
}

fn profile_mixed_workload(duration: Duration) {
    println!("Running mixed workload profile...");

    let map_query = "key1=value1&key2=value2&key3=value3&key4=value4&key5=value5";
    let conflict_query = "a=1&a[]=2&a[5]=3&a[k]=4&a[]=5&b[x][]=1&b[x][y]=2";

    let start = Instant::now();
    let mut map_count = 0u64;
    let mut conflict_count = 0u64;
    let mut complex_count = 0u64;

    while start.elapsed() < duration {
        for _ in 0..100 {
            let _: HashMap<String, String> = php_qs::from_str(black_box(map_query)).unwrap();
            map_count += 1;
        }

        for _ in 0..100 {
            let _ = php_qs::parse_str(black_box(conflict_query)).unwrap();
            conflict_count += 1;
        }

        for _ in 0..100 {
            let _: QueryParams = php_qs::from_str(black_box(COMPLEX_QUERY)).unwrap();
            complex_count += 1;
        }
    }

    let elapsed = start.elapsed();
    let total = map_count + conflict_count + complex_count;

    println!("\nProfile complete:");
    println!("Total operations: {}", total);
    println!("- HashMap: {}", map_count);
    println!("- Conflicts: {}", conflict_count);
    println!("- Complex: {}", complex_count);
    report("operations", total, elapsed);
}
