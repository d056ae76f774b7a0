use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use season_sos::sleeper::parse_season_dump_json;
use season_sos::{SeasonConfig, compute_season};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/sleeper_season.json"));

    let config = SeasonConfig::from_env();
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("unable to read {}", path.display()))?;
    let input = parse_season_dump_json(&raw, &config)?;
    let report = compute_season(&input, &config);

    println!("Season: {} weeks, {} teams", report.weeks, report.teams.len());
    println!("League average points: {:.2}", report.league_average_points);
    println!();
    println!(
        "{:<20} {:>7} {:>8} {:>8} {:>7} {:>7} {:>7} {:>7}",
        "Team", "W-L-D", "PF", "PA", "OR%", "OOR%", "BCS", "Luck"
    );
    for (id, s) in report.standings() {
        println!(
            "{:<20} {:>7} {:>8.2} {:>8.2} {:>7.2} {:>7.2} {:>7.2} {:>7.3}",
            report.team_name(id),
            format!("{}-{}-{}", s.wins, s.losses, s.draws),
            s.points_for,
            s.points_against,
            s.opp_win_pct,
            s.opp_opp_win_pct,
            s.bcs_sos,
            s.luck_factor,
        );
    }
    let avg = report.league_average_row();
    println!(
        "{:<20} {:>7} {:>8.2} {:>8.2} {:>7.2} {:>7.2} {:>7.2} {:>7.3}",
        "League Average",
        "",
        avg.points_for,
        avg.points_against,
        avg.opp_win_pct,
        avg.opp_opp_win_pct,
        avg.bcs_sos,
        avg.luck_factor,
    );

    println!();
    println!("Weekly results:");
    for (id, slots) in &report.slots {
        let row: String = slots
            .iter()
            .map(|slot| slot.result.map(|r| r.as_char()).unwrap_or('-'))
            .collect();
        println!("{:<20} {row}", report.team_name(*id));
    }

    if !report.anomalies.is_empty() {
        println!();
        println!("Data warnings: {}", report.anomalies.len());
        for anomaly in report.anomalies.iter().take(10) {
            println!("  - {anomaly}");
        }
    }

    Ok(())
}
