use std::time::Instant;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};

use ranktrack_core::models::{Device, LocationInput, RankingRequest, RankingResponse};
use ranktrack_core::validate::validate_request;
use ranktrack_dataforseo::DataForSeoClient;
use ranktrack_geocode::GeocodeClient;

#[derive(Debug, Parser)]
#[command(name = "ranktrack-cli")]
#[command(about = "One-shot rank checks from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one ranking check and print the response JSON.
    Check {
        #[arg(long)]
        keyword: String,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        pincode: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long, value_enum, default_value_t = DeviceArg::Desktop)]
        device: DeviceArg,
        #[arg(long, default_value = "en")]
        language: String,
        /// Defaults to the configured default depth when omitted.
        #[arg(long)]
        depth: Option<u32>,
    },
    /// Probe provider reachability and print the report.
    Status,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DeviceArg {
    Desktop,
    Mobile,
}

impl From<DeviceArg> for Device {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Desktop => Device::Desktop,
            DeviceArg::Mobile => Device::Mobile,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = ranktrack_core::load_app_config()?;

    let geocode = GeocodeClient::from_config(&config)?;
    let dataforseo = DataForSeoClient::new(
        config.dataforseo_base_url(),
        &config.dataforseo_login,
        &config.dataforseo_password,
        config.request_timeout_secs,
        config.max_depth,
        &config.user_agent,
    )?;

    match cli.command {
        Commands::Check {
            keyword,
            address,
            pincode,
            city,
            country,
            device,
            language,
            depth,
        } => {
            let request = RankingRequest {
                keyword,
                location: LocationInput {
                    address,
                    pincode,
                    city,
                    country,
                },
                device: device.into(),
                language_code: language,
                depth,
            };
            let response =
                run_check(&config, &geocode, &dataforseo, &request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Status => {
            let (dataforseo_ok, geocoding) =
                tokio::join!(dataforseo.test_connection(), geocode.probe_all());
            let report = serde_json::json!({
                "dataforseo": match dataforseo_ok {
                    Ok(ok) => serde_json::json!({ "reachable": ok }),
                    Err(e) => serde_json::json!({ "reachable": false, "error": e.to_string() }),
                },
                "geocoding": geocoding,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// The same validate → geocode → rank → assemble flow the server runs,
/// without the HTTP layer.
async fn run_check(
    config: &ranktrack_core::AppConfig,
    geocode: &GeocodeClient,
    dataforseo: &DataForSeoClient,
    request: &RankingRequest,
) -> anyhow::Result<RankingResponse> {
    let started = Instant::now();
    let valid = validate_request(request, config.default_depth, config.max_depth)?;

    let location = geocode.resolve(&valid.location).await?;
    tracing::info!(
        latitude = location.latitude,
        longitude = location.longitude,
        provider = %location.provider,
        "location resolved"
    );

    let outcome = dataforseo
        .fetch_rankings(
            &valid.keyword,
            &location,
            valid.device,
            &valid.language_code,
            valid.depth,
        )
        .await?;

    Ok(RankingResponse {
        keyword: valid.keyword,
        location,
        device: valid.device,
        language_code: valid.language_code,
        depth: valid.depth,
        organic_results: outcome.organic,
        maps_results: outcome.maps,
        warnings: outcome.warnings,
        check_date: Utc::now(),
        processing_time_seconds: started.elapsed().as_secs_f64(),
    })
}
