//! Output
//!
//! Text rendering of rate tables and JSON snapshot files. Rates are rounded
//! here, at the presentation boundary, never inside the market.

use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use fx_events::{MarketSnapshot, RateMatrix};

use crate::market::Market;
use crate::noise::NoiseSource;

/// Decimal places shown in rate tables
pub const DISPLAY_DECIMALS: u32 = 4;

/// Renders a rate matrix as an aligned text table.
///
/// Rows are base currencies, columns are quote currencies.
pub fn render_rate_table(matrix: &RateMatrix, decimals: u32) -> String {
    let rounded = matrix.rounded(decimals);
    let precision = decimals as usize;
    let cells: Vec<Vec<String>> = rounded
        .rows()
        .map(|(_, row)| row.iter().map(|r| format!("{:.*}", precision, r)).collect())
        .collect();

    let code_width = matrix.codes().iter().map(String::len).max().unwrap_or(0);
    let cell_width = cells
        .iter()
        .flatten()
        .map(String::len)
        .chain(matrix.codes().iter().map(String::len))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = write!(out, "{:code_width$}", "");
    for code in matrix.codes() {
        let _ = write!(out, "  {:>cell_width$}", code);
    }
    out.push('\n');

    for ((code, _), row) in rounded.rows().zip(&cells) {
        let _ = write!(out, "{:<code_width$}", code);
        for cell in row {
            let _ = write!(out, "  {:>cell_width$}", cell);
        }
        out.push('\n');
    }
    out
}

/// Renders the current rates with a round heading.
pub fn display_rates<N: NoiseSource>(market: &Market<N>) -> String {
    format!(
        "--- ROUND {} EXCHANGE RATES ---\n{}",
        market.round(),
        render_rate_table(market.exchange_rates(), DISPLAY_DECIMALS)
    )
}

/// Renders the end-of-run summary: every currency's strength and last
/// change, then the strongest and weakest currency.
pub fn render_summary(snapshot: &MarketSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- FINAL STRENGTHS (ROUND {}) ---", snapshot.round);
    for currency in &snapshot.currencies {
        let change = match currency.last_change() {
            Some(change) => format!("{:+.2}%", change * 100.0),
            None => "unchanged".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<4} {:>14.*}  {}",
            currency.code,
            DISPLAY_DECIMALS as usize,
            currency.strength,
            change
        );
    }
    if let (Some(strongest), Some(weakest)) = (snapshot.strongest(), snapshot.weakest()) {
        let _ = writeln!(out, "Strongest: {} ({})", strongest.code, strongest.name);
        let _ = writeln!(out, "Weakest: {} ({})", weakest.code, weakest.name);
    }
    out
}

/// Strength history of one currency, for charting
#[derive(Debug, Clone, Serialize)]
pub struct StrengthSeries<'a> {
    pub code: &'a str,
    pub history: &'a [f64],
}

/// Writes snapshots to an output directory at a fixed round interval
#[derive(Debug)]
pub struct SnapshotWriter {
    output_dir: PathBuf,
    snapshot_interval: u64,
    snapshot_count: u64,
}

impl SnapshotWriter {
    pub fn new(output_dir: impl Into<PathBuf>, snapshot_interval: u64) -> Self {
        Self {
            output_dir: output_dir.into(),
            snapshot_interval: snapshot_interval.max(1),
            snapshot_count: 0,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Whether a periodic snapshot is due after `round`. The final round is
    /// left to the end-of-run snapshot so its file is written once.
    pub fn should_snapshot(&self, round: u64, final_round: u64) -> bool {
        round < final_round && round % self.snapshot_interval == 0
    }

    pub fn snapshot_count(&self) -> u64 {
        self.snapshot_count
    }

    /// Writes `snapshots/round_NNNNNN.json` and overwrites `current_state.json`.
    pub fn write(&mut self, snapshot: &MarketSnapshot) -> std::io::Result<PathBuf> {
        let dir = self.output_dir.join("snapshots");
        fs::create_dir_all(&dir)?;

        let json = snapshot.to_json_pretty()?;
        let path = dir.join(format!("round_{:06}.json", snapshot.round));
        fs::write(&path, &json)?;
        fs::write(self.output_dir.join("current_state.json"), &json)?;
        self.snapshot_count += 1;
        Ok(path)
    }

    /// Writes every currency's strength history to `strength_history.json`.
    pub fn write_strength_history<N: NoiseSource>(&self, market: &Market<N>) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let series: Vec<StrengthSeries<'_>> = market
            .strength_histories()
            .into_iter()
            .map(|(code, history)| StrengthSeries { code, history })
            .collect();

        let path = self.output_dir.join("strength_history.json");
        write_json(&series, &path)?;
        Ok(path)
    }
}

fn write_json<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarketConfig;
    use crate::noise::MidpointNoise;
    use uuid::Uuid;

    fn market() -> Market<MidpointNoise> {
        let mut market = Market::with_noise(MarketConfig::default(), MidpointNoise);
        market.add_currency("USD", "US Dollar", 1.0);
        market.add_currency("EUR", "Euro", 1.1);
        market.add_currency("JPY", "Japanese Yen", 0.009);
        market.calculate_exchange_rates().unwrap();
        market
    }

    #[test]
    fn test_rate_table_rounds_to_four_places() {
        let table = render_rate_table(market().exchange_rates(), DISPLAY_DECIMALS);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("USD") && lines[0].contains("JPY"));
        assert!(lines[1].starts_with("USD"));
        assert!(lines[1].contains("1.1000"));
        assert!(lines[2].contains("0.9091"));
        assert!(lines[3].contains("122.2222"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(render_rate_table(&RateMatrix::empty(), 4), "\n");
    }

    #[test]
    fn test_display_rates_heading() {
        let text = display_rates(&market());
        assert!(text.starts_with("--- ROUND 0 EXCHANGE RATES ---\n"));
    }

    #[test]
    fn test_summary_names_extremes() {
        let mut market = Market::with_noise(MarketConfig::default(), MidpointNoise);
        market.add_currency("USD", "US Dollar", 1.0);
        market.add_currency("GBP", "British Pound", 1.3);
        market.add_currency("JPY", "Japanese Yen", 0.009);
        market.calculate_exchange_rates().unwrap();
        market.apply_market_event("Rally", &["USD".to_string()], (0.1, 0.1)).unwrap();

        let summary = render_summary(&market.snapshot(Uuid::new_v4(), "simulation_end"));
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines[0], "--- FINAL STRENGTHS (ROUND 0) ---");
        assert!(lines[1].starts_with("USD") && lines[1].ends_with("+10.00%"));
        assert!(lines[2].ends_with("unchanged"));
        assert_eq!(lines[4], "Strongest: GBP (British Pound)");
        assert_eq!(lines[5], "Weakest: JPY (Japanese Yen)");
    }

    #[test]
    fn test_snapshot_interval() {
        let writer = SnapshotWriter::new("unused", 5);
        assert!(writer.should_snapshot(0, 20));
        assert!(!writer.should_snapshot(3, 20));
        assert!(writer.should_snapshot(10, 20));
    }

    #[test]
    fn test_final_round_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = SnapshotWriter::new(dir.path(), 5);
        let market = market();
        let run_id = Uuid::new_v4();

        for round in 1..=10 {
            if writer.should_snapshot(round, 10) {
                writer.write(&market.snapshot(run_id, "periodic")).unwrap();
            }
        }
        writer.write(&market.snapshot(run_id, "simulation_end")).unwrap();

        assert!(!writer.should_snapshot(10, 10));
        assert_eq!(writer.snapshot_count(), 2);
    }

    #[test]
    fn test_write_snapshot_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = SnapshotWriter::new(dir.path(), 1);
        let market = market();

        let path = writer.write(&market.snapshot(Uuid::new_v4(), "test")).unwrap();
        assert!(path.ends_with("snapshots/round_000000.json"));
        assert!(dir.path().join("current_state.json").exists());
        assert_eq!(writer.snapshot_count(), 1);

        let content = fs::read_to_string(&path).unwrap();
        let parsed = MarketSnapshot::from_json(&content).unwrap();
        assert_eq!(parsed.currencies.len(), 3);
    }

    #[test]
    fn test_write_strength_history() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path(), 1);

        let path = writer.write_strength_history(&market()).unwrap();
        let content = fs::read_to_string(path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(parsed[0]["code"], "USD");
        assert_eq!(parsed[2]["history"][0], 0.009);
    }
}
