use std::process::exit;

use chrono::{Duration, Local};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use maxsplit::connect::{ConnectClient, ConnectConfig, FilterOptions};
use maxsplit::destinations::{
    DirectDestinationSet, DirectDestinationsClient, DirectDestinationsConfig,
};
use maxsplit::domain::Station;
use maxsplit::report::{joint_line, proposal_line, should_display, should_display_joint};
use maxsplit::search::{
    ConnectionComposer, DayFetcher, Pacing, SearchOptions, SplitLeg, ViaOutcome,
};
use maxsplit::stations::{
    AutocompleteClient, AutocompleteConfig, LocationsClient, LocationsConfig, StationError,
    StationResolver,
};

/// Search free-travel-card itineraries, splitting the journey in two when
/// no direct itinerary exists.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Departure station name
    departure: String,

    /// Arrival station name
    arrival: String,

    /// How many days from today
    #[arg(short = 't', long, default_value_t = 1)]
    timedelta: i64,

    /// Number of days to search
    #[arg(short = 'p', long, default_value_t = 1)]
    period: u32,

    /// Search direct itineraries only
    #[arg(short = 'd', long)]
    direct_only: bool,

    /// Only show night-train proposals that still have berths
    #[arg(short = 'b', long)]
    berth_only: bool,

    /// Force the connection station for the split search
    #[arg(long, value_name = "NAME")]
    via: Option<String>,

    /// Show transporter and train number on each line
    #[arg(short = 'l', long)]
    long: bool,

    /// Only show results
    #[arg(short = 'q', long)]
    quiet: bool,

    /// More detail about skipped records and pagination
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{message}");
    exit(1);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "maxsplit=debug"
    } else if cli.quiet {
        "maxsplit=warn"
    } else {
        "maxsplit=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Get credentials from environment
    let cookie = std::env::var("SNCFCONNECT_COOKIE").unwrap_or_else(|_| {
        eprintln!("Warning: SNCFCONNECT_COOKIE not set. Searches will fail.");
        String::new()
    });
    let card_number = std::env::var("TGVMAX_CARD_NUMBER").unwrap_or_else(|_| {
        eprintln!("Warning: TGVMAX_CARD_NUMBER not set. Searches will fail.");
        String::new()
    });

    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Interrupted");
            exit(1);
        }
    });

    let connect = match ConnectClient::new(ConnectConfig::new(&cookie, &card_number)) {
        Ok(client) => client,
        Err(error) => fail(format!("Cannot create booking client: {error}")),
    };
    let resolver = match build_resolver() {
        Ok(resolver) => resolver,
        Err(error) => fail(format!("Cannot create station resolver: {error}")),
    };

    let departure = resolve_station(&resolver, &cli.departure).await;
    let arrival = resolve_station(&resolver, &cli.arrival).await;
    let (Some(departure_code), Some(arrival_code)) = (departure.code, arrival.code) else {
        // resolve() always attaches a code; this is unreachable in practice
        fail("Station resolution left a station without a code");
    };

    let options = SearchOptions {
        via: cli.via.clone(),
        berth_only: cli.berth_only,
        long_display: cli.long,
        direct_only: cli.direct_only,
        max_duration_minutes: 0,
    };

    // The split search needs each endpoint's direct destinations; skip
    // the two graph fetches entirely in direct-only mode.
    let (departure_set, arrival_set) = if options.direct_only {
        (empty_set(&departure), empty_set(&arrival))
    } else {
        (
            fetch_destinations(&departure).await,
            fetch_destinations(&arrival).await,
        )
    };

    let pacing = Pacing::polite();
    let fetcher = DayFetcher::new(&connect, &pacing, FilterOptions::default());
    let composer = ConnectionComposer::new(fetcher.clone(), &resolver);

    let start = Local::now().date_naive() + Duration::days(cli.timedelta);
    let mut max_duration_minutes = options.max_duration_minutes;

    for day_offset in 0..i64::from(cli.period) {
        let day = start + Duration::days(day_offset);
        println!("{}", day.format("%A %d %B %Y"));

        if !cli.quiet {
            println!(
                "Direct journey from {} to {}",
                departure.name, arrival.name
            );
        }

        let direct = match fetcher
            .fetch_day(&departure_code, &arrival_code, day, max_duration_minutes)
            .await
        {
            Ok(result) => result,
            Err(error) => fail(error),
        };
        max_duration_minutes = direct.max_duration_minutes;

        if cli.verbose {
            println!(
                "{} duplicates removed, {} malformed records skipped",
                direct.duplicates_removed, direct.skipped
            );
        }

        let mut shown = 0;
        for proposal in &direct.proposals {
            if should_display(proposal, options.berth_only) {
                println!("{}", proposal_line(proposal, options.long_display));
                shown += 1;
            }
        }
        if shown == 0 && !cli.quiet {
            println!("No direct itinerary");
        }

        if options.direct_only {
            continue;
        }

        if !cli.quiet {
            println!(
                "Let's try to split the journey from {} to {}",
                departure.name, arrival.name
            );
        }

        let split = composer
            .search_splits(
                &departure,
                &departure_code,
                &arrival,
                &arrival_code,
                &departure_set,
                &arrival_set,
                day,
                options.via.as_deref(),
                max_duration_minutes,
            )
            .await;
        max_duration_minutes = split.max_duration_minutes;

        for outcome in &split.outcomes {
            report_outcome(outcome, &options, cli.quiet);
        }
    }
}

fn build_resolver() -> Result<StationResolver, StationError> {
    let autocomplete = AutocompleteClient::new(AutocompleteConfig::default())?;
    let locations = LocationsClient::new(LocationsConfig::default())?;
    Ok(StationResolver::new(autocomplete, locations))
}

async fn resolve_station(resolver: &StationResolver, name: &str) -> Station {
    match resolver.resolve(name).await {
        Ok(station) => station,
        Err(StationError::NotFound(name)) => {
            fail(format!("Station not found: {name}"));
        }
        Err(error) => fail(format!("Cannot resolve station {name}: {error}")),
    }
}

/// Fetch a station's direct destinations, degrading to an empty set when
/// the graph does not know the station. The split search then only tries
/// the hub fallback.
async fn fetch_destinations(station: &Station) -> DirectDestinationSet {
    let client = match DirectDestinationsClient::new(DirectDestinationsConfig::default()) {
        Ok(client) => client,
        Err(error) => fail(format!("Cannot create destinations client: {error}")),
    };
    match client.fetch(station).await {
        Ok(set) => set,
        Err(error) => {
            eprintln!(
                "Warning: no direct destinations for {}: {error}",
                station.name
            );
            empty_set(station)
        }
    }
}

fn empty_set(station: &Station) -> DirectDestinationSet {
    DirectDestinationSet {
        station: station.clone(),
        destinations: std::collections::HashMap::new(),
    }
}

fn report_outcome(outcome: &ViaOutcome, options: &SearchOptions, quiet: bool) {
    match outcome {
        ViaOutcome::Found { via, itineraries } => {
            if !quiet {
                println!("Via {}:", via.name);
            }
            for joint in itineraries {
                if should_display_joint(joint, options.berth_only) {
                    println!("{}", joint_line(joint, options.long_display));
                }
            }
        }
        ViaOutcome::LegNotFound { via, leg } => {
            if !quiet {
                let half = match leg {
                    SplitLeg::Outward => "first",
                    SplitLeg::Onward => "second",
                };
                println!("Via {}: no itinerary for the {half} leg", via.name);
            }
        }
        ViaOutcome::Incompatible { via } => {
            if !quiet {
                println!("Via {}: legs found but none connect in time", via.name);
            }
        }
    }
}
