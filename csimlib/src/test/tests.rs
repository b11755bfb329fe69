use std::error::Error;
use std::env;
use std::fs::{self, File};
use std::io::BufReader;
use crate::config::Representation;
use crate::io::get_reader;
use crate::simulator::{SimulationResult, Simulator};
use crate::util::get_configs;

#[test]
fn run_all_examples() -> Result<(), Box<dyn Error>> {
    let cases = get_configs()?;
    assert!(!cases.is_empty(), "No fixture outputs found");
    for test in cases {
        println!("Running test for {}", test.name);
        // Read expected output
        let expected_output_file = File::open(&test.output)?;
        let expected_output: SimulationResult = serde_json::from_reader(BufReader::new(expected_output_file))?;
        for representation in [Representation::Linked, Representation::Timestamp] {
            let mut config = test.config.clone();
            config.representation = representation;
            let mut simulator = Simulator::new(&config)?;
            let trace_file = File::open(&test.trace)?;
            let result = simulator.simulate(get_reader(trace_file)?)?;
            assert_eq!(*result, expected_output, "{} with {representation:?}", test.name);
            println!("Success for {} ({representation:?}), time: {}", test.name, simulator.get_execution_time().as_nanos() as f64 / 1e9);
        }
    }
    Ok(())
}

#[test]
fn trailing_chatter_ends_the_trace() -> Result<(), Box<dyn Error>> {
    let case = get_configs()?
        .into_iter()
        .find(|case| case.name == "output-mixed-s4-E4-b4.json")
        .ok_or("Missing the mixed fixture")?;
    let mut simulator = Simulator::new(&case.config)?;
    simulator.simulate(get_reader(File::open(&case.trace)?)?)?;
    assert_eq!(simulator.get_stopped_at(), Some(402));
    assert_eq!(simulator.get_records_applied(), 400);
    Ok(())
}

#[test]
fn empty_trace_file() -> Result<(), Box<dyn Error>> {
    let path = env::temp_dir().join(format!("csimlib-empty-{}.trace", std::process::id()));
    File::create(&path)?;
    let mut simulator = Simulator::new(&crate::config::CacheConfig::new(4, 1, 4))?;
    let result = *simulator.simulate(get_reader(File::open(&path)?)?)?;
    fs::remove_file(&path)?;
    assert_eq!(result, SimulationResult::default());
    assert_eq!(simulator.get_stopped_at(), None);
    assert_eq!(simulator.get_records_applied(), 0);
    Ok(())
}
