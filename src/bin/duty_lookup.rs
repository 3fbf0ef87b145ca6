//! Command-line lookup of on-duty pharmacies
//!
//! Usage: duty_lookup [PLZ] [STATE] [LIMIT] [--geocode] [--fix-data]
//!
//! Prints the result list as pretty JSON. With `--geocode` each record is
//! enriched with Nominatim coordinates; `--fix-data` additionally lets the
//! geocoder correct the parsed address fields.

use anyhow::Result;

use notdienst_finder::infrastructure::config::AppConfig;
use notdienst_finder::{
    init_logging_with_config, DutyRequest, EnrichOptions, GeocodeResolver, PharmacyFinder,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let flags: Vec<&String> = args.iter().filter(|a| a.starts_with("--")).collect();
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    let plz = positional.first().map(|s| s.as_str()).unwrap_or("14467");
    let state = positional.get(1).map(|s| s.as_str()).unwrap_or("Brandenburg");
    let limit = positional.get(2).and_then(|s| s.parse::<usize>().ok());
    let geocode = flags.iter().any(|f| *f == "--geocode" || *f == "--fix-data");
    let fix_data = flags.iter().any(|f| *f == "--fix-data");

    let config = AppConfig::default();
    init_logging_with_config(&config.logging)?;

    let finder = PharmacyFinder::with_config(&config)?;

    let mut request = DutyRequest::new(plz, state);
    if let Some(limit) = limit {
        request = request.with_limit(limit);
    }

    let mut pharmacies = finder.find_duty_pharmacies(&request).await?;

    if geocode {
        let resolver = GeocodeResolver::new(&config.geocoding)?;
        let options = EnrichOptions {
            overwrite_cache: false,
            fix_data,
        };
        for pharmacy in &mut pharmacies {
            resolver.ensure_geocoded(pharmacy, options).await;
        }
    }

    println!("{}", serde_json::to_string_pretty(&pharmacies)?);
    Ok(())
}
