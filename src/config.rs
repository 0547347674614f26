// ⚙️ Configuration - command line arguments and logging setup shared by both binaries

use crate::context::DataPaths;
use crate::loader::{DEFAULT_GDP_PATH, DEFAULT_HOUSING_PATH};
use clap::Args;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Locations of the two input tables
#[derive(Debug, Clone, Args)]
pub struct DataArgs {
    /// Wide GDP table (one column per year)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_GDP_PATH)]
    pub gdp: PathBuf,

    /// Housing table (one row per country and year)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_HOUSING_PATH)]
    pub housing: PathBuf,
}

impl From<DataArgs> for DataPaths {
    fn from(args: DataArgs) -> Self {
        DataPaths {
            gdp: args.gdp,
            housing: args.housing,
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
///
/// Stderr keeps log lines off the terminal dashboard's stdout screen.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (e.g. in tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        data: DataArgs,
    }

    #[test]
    fn test_defaults_point_at_original_file_names() {
        let cli = TestCli::parse_from(["test"]);
        let paths: DataPaths = cli.data.into();

        assert_eq!(paths, DataPaths::default());
    }

    #[test]
    fn test_paths_can_be_overridden() {
        let cli = TestCli::parse_from(["test", "--gdp", "/data/gdp.csv", "--housing", "h.csv"]);

        assert_eq!(cli.data.gdp, PathBuf::from("/data/gdp.csv"));
        assert_eq!(cli.data.housing, PathBuf::from("h.csv"));
    }
}
