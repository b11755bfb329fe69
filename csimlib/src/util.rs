use std::error::Error;
use std::fs;
use std::path::PathBuf;
use regex::Regex;
use crate::config::CacheConfig;

/// Fixture traces shipped with the library
pub const TRACE_FILES_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/traces");
/// Expected results for the fixture traces, one file per trace and geometry
pub const EXPECTED_OUTPUTS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/expected");

pub struct TestCasePaths {
    pub name: String,
    pub config: CacheConfig,
    pub trace: PathBuf,
    pub output: PathBuf,
}

/// Finds every expected output file, named `output-<trace>-s<S>-E<E>-b<B>.json`, along with the
/// trace and geometry it was produced from
pub fn get_configs() -> Result<Vec<TestCasePaths>, Box<dyn Error>> {
    let mut out = Vec::new();
    let output_pattern = Regex::new(r"^output-(?P<trace>[0-9a-zA-Z_]+)-s(?P<s>[0-9]+)-E(?P<e>[0-9]+)-b(?P<b>[0-9]+)\.json$")?;
    let mut files = fs::read_dir(EXPECTED_OUTPUTS_PATH)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| output_pattern.is_match(name))
        .collect::<Vec<_>>();
    files.sort();
    for file_name in files {
        let tokens = output_pattern.captures(&file_name).ok_or("Couldn't parse the file name".to_string())?;
        let trace = tokens.name("trace").ok_or("Couldn't get the trace from the output file name".to_string())?.as_str();
        let config = CacheConfig::new(
            tokens.name("s").ok_or("Missing s".to_string())?.as_str().parse()?,
            tokens.name("e").ok_or("Missing E".to_string())?.as_str().parse()?,
            tokens.name("b").ok_or("Missing b".to_string())?.as_str().parse()?,
        );
        out.push(TestCasePaths {
            name: file_name.clone(),
            config,
            trace: PathBuf::from(format!("{TRACE_FILES_PATH}/{trace}.trace")),
            output: PathBuf::from(format!("{EXPECTED_OUTPUTS_PATH}/{file_name}")),
        })
    }
    Ok(out)
}
