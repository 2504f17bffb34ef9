//! Command-line interface.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// JSON configuration file; built-in Toronto defaults are used if missing
    #[arg(long, default_value = "config.json", env = "SOLAR_EFFICIENCY_CONFIG")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve {
        /// Overrides the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the observation for one local clock time ("YYYY-MM-DD HH:MM:SS")
    Observe {
        timestamp: String,
    },
    /// Print observations across one day
    Sweep {
        date: NaiveDate,
        /// Minutes between observations (1-720)
        #[arg(long, default_value_t = 60)]
        step: u32,
    },
    /// Retrieve power telemetry and print the integrated energy
    Energy {
        /// First day (defaults to the installation date)
        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,
        /// Last day, inclusive (defaults to the last update)
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,
        /// Year, or a month when given alone and <= 12
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        day: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_optional() {
        let args = Args::try_parse_from(["solar-efficiency"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.config, "config.json");
    }

    #[test]
    fn observe_takes_a_timestamp() {
        let args = Args::try_parse_from(["solar-efficiency", "observe", "2020-06-21 12:00:00"]).unwrap();
        assert!(matches!(args.command, Some(Command::Observe { ref timestamp }) if timestamp == "2020-06-21 12:00:00"));
    }

    #[test]
    fn energy_range_needs_both_ends() {
        assert!(Args::try_parse_from(["solar-efficiency", "energy", "--start", "2020-06-01"]).is_err());
        let args = Args::try_parse_from([
            "solar-efficiency", "energy", "--start", "2020-06-01", "--end", "2020-06-30", "--year", "2020",
        ])
        .unwrap();
        match args.command {
            Some(Command::Energy { start, end, year, .. }) => {
                assert_eq!(start, NaiveDate::from_ymd_opt(2020, 6, 1));
                assert_eq!(end, NaiveDate::from_ymd_opt(2020, 6, 30));
                assert_eq!(year, Some(2020));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
