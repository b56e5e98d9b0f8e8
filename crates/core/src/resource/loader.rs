use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::{
    columns::{ColumnLookup, HeaderStrategy, TITLE_COLUMN},
    fetch::CsvSource,
    normalize::normalize_row,
};
use crate::{
    catalog::Catalog, error::CatalogError, models::GameRecord, report::LoadReport,
    slug::SlugRegistry,
};

/// Outcome of a background load, delivered over a channel.
#[derive(Debug)]
pub enum LoadEvent {
    /// The catalog is ready.
    Loaded {
        /// Fully normalised dataset.
        catalog: Catalog,
        /// What was loaded and from where.
        report: LoadReport,
    },
    /// The load failed; no partial catalog exists.
    Failed(CatalogError),
}

/// Records produced by one ingestion pass plus its bookkeeping.
#[derive(Debug, Clone)]
pub struct Ingested {
    /// Records in sheet order with ids `1..=n`.
    pub records: Vec<GameRecord>,
    /// Index of the header row.
    pub header_index: usize,
    /// Data rows after the header.
    pub rows_scanned: usize,
    /// Rows dropped for lacking a title.
    pub rows_rejected: usize,
}

/// Split CSV text into jagged rows of cells. Blank lines are skipped.
pub fn parse_table(text: &str) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
            Err(err) => warn!("Skipping malformed catalog CSV row: {err}"),
        }
    }
    rows
}

/// Index of the first row whose first cell is exactly `anchor`.
pub fn locate_header(rows: &[Vec<String>], anchor: &'static str) -> Result<usize, CatalogError> {
    rows.iter()
        .position(|row| row.first().map(String::as_str) == Some(anchor))
        .ok_or(CatalogError::HeaderNotFound { anchor })
}

/// Run the full pipeline over raw CSV text with a fresh slug registry.
pub fn ingest(text: &str, strategy: HeaderStrategy) -> Result<Ingested, CatalogError> {
    let rows = parse_table(text);
    let header_index = locate_header(&rows, TITLE_COLUMN)?;
    let header_row = &rows[header_index];
    let data_rows = &rows[header_index + 1..];

    let mut slugs = SlugRegistry::new();
    let mut records = Vec::new();
    for row in data_rows {
        let lookup = ColumnLookup::build(strategy, header_row, row);
        let Some(game) = normalize_row(&lookup) else {
            continue;
        };
        let slug = slugs.assign(&game.title);
        let id = records.len() as u32 + 1;
        records.push(GameRecord::new(id, slug, game));
    }

    let rows_scanned = data_rows.len();
    debug!(header_index, rows_scanned, kept = records.len(), "Catalog rows normalised");
    Ok(Ingested {
        rows_rejected: rows_scanned - records.len(),
        records,
        header_index,
        rows_scanned,
    })
}

/// Fetches and ingests the catalog from a [`CsvSource`].
pub struct CatalogLoader<S> {
    source: S,
    strategy: HeaderStrategy,
}

impl<S: CsvSource> CatalogLoader<S> {
    /// Loader using the discovered header row.
    pub fn new(source: S) -> Self {
        Self::with_strategy(source, HeaderStrategy::default())
    }

    /// Loader with an explicit header strategy.
    pub fn with_strategy(source: S, strategy: HeaderStrategy) -> Self {
        Self { source, strategy }
    }

    /// Fetch once and build the catalog. Either everything loads or nothing does.
    pub async fn load(&self) -> Result<(Catalog, LoadReport), CatalogError> {
        let location = self.source.describe();
        info!(source = %location, strategy = ?self.strategy, "Loading catalog");
        let text = self.source.fetch().await?;
        let fetched_at = Utc::now();
        let ingested = ingest(&text, self.strategy)?;

        let report = LoadReport {
            source: location,
            fetched_at,
            header_index: ingested.header_index,
            rows_scanned: ingested.rows_scanned,
            rows_rejected: ingested.rows_rejected,
            records: ingested.records.len(),
        };
        info!(
            records = report.records,
            rejected = report.rows_rejected,
            "Catalog loaded"
        );
        Ok((Catalog::from_records(ingested.records), report))
    }

    /// Load and send the outcome. A closed channel means the consumer went
    /// away; the result is dropped.
    pub async fn run(self, sender: mpsc::Sender<LoadEvent>) {
        let event = match self.load().await {
            Ok((catalog, report)) => LoadEvent::Loaded { catalog, report },
            Err(err) => {
                error!(%err, "Catalog load failed");
                LoadEvent::Failed(err)
            }
        };
        if sender.send(event).await.is_err() {
            debug!("Catalog consumer gone; discarding load result");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::GameStatus, resource::InlineSource};
    use anyhow::Result;

    const SHEET: &str = "\
Venezuela Juega,,,
Última revisión: octubre,,,

Título del videojuego,Plataforma(s),Estado actual,Motor
VA-11 Hall-A: Cyberpunk Bartender Action,\"PC, PS4\",Publicado,GameMaker
,PC,Publicado,Unity
Night Reverie,PC,,
Night Reverie,Switch,Pausado,
";

    #[test]
    fn parse_table_keeps_jagged_rows_and_quotes() {
        let rows = parse_table("a,b\n\n\"x, y\",\"he said \"\"hi\"\"\",z\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["a", "b"]);
        assert_eq!(rows[1], vec!["x, y", "he said \"hi\"", "z"]);
    }

    #[test]
    fn header_is_found_after_banner_rows() -> Result<()> {
        let rows = parse_table(SHEET);
        assert_eq!(locate_header(&rows, TITLE_COLUMN)?, 2);
        Ok(())
    }

    #[test]
    fn header_must_match_exactly() {
        let rows = parse_table(" Título del videojuego,Motor\nSample,Godot\n");
        let err = locate_header(&rows, TITLE_COLUMN).expect_err("padded anchor");
        assert!(matches!(err, CatalogError::HeaderNotFound { .. }));
    }

    #[test]
    fn ingest_normalises_and_deduplicates() -> Result<()> {
        let ingested = ingest(SHEET, HeaderStrategy::Discovered)?;
        assert_eq!(ingested.rows_scanned, 4);
        assert_eq!(ingested.rows_rejected, 1);

        let slugs: Vec<&str> = ingested.records.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec![
                "va-11-hall-a-cyberpunk-bartender-action",
                "night-reverie",
                "night-reverie-1"
            ]
        );
        let ids: Vec<u32> = ingested.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let first = &ingested.records[0];
        assert_eq!(first.game.platform, vec!["PC", "PS4"]);
        assert_eq!(first.game.status, GameStatus::Released);
        assert_eq!(ingested.records[1].game.status, GameStatus::InDevelopment);
        assert_eq!(ingested.records[1].game.engine, "No especificado");
        assert_eq!(ingested.records[2].game.status, GameStatus::OnHold);
        Ok(())
    }

    #[test]
    fn discovered_headers_tolerate_reordering() -> Result<()> {
        let text = "Título del videojuego,Motor,Nueva columna,Plataforma(s)\nSample,Godot,x,PC\n";
        let ingested = ingest(text, HeaderStrategy::Discovered)?;
        assert_eq!(ingested.records[0].game.engine, "Godot");
        assert_eq!(ingested.records[0].game.platform, vec!["PC"]);

        let legacy = ingest(text, HeaderStrategy::Legacy)?;
        assert_eq!(legacy.records[0].game.platform, vec!["Godot"]);
        Ok(())
    }

    #[test]
    fn missing_header_yields_no_records() {
        let err = ingest("Nombre,Motor\nSample,Godot\n", HeaderStrategy::Discovered)
            .expect_err("no anchor");
        assert!(matches!(err, CatalogError::HeaderNotFound { .. }));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn loader_sends_loaded_event() -> Result<()> {
        let loader = CatalogLoader::new(InlineSource::new("inline", SHEET));
        let (tx, mut rx) = mpsc::channel(1);
        loader.run(tx).await;

        match rx.recv().await {
            Some(LoadEvent::Loaded { catalog, report }) => {
                assert_eq!(catalog.records().len(), 3);
                assert_eq!(report.records, 3);
                assert_eq!(report.rows_rejected, 1);
                assert_eq!(report.header_index, 2);
                assert_eq!(report.source, "inline");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn loader_reports_missing_header() -> Result<()> {
        let loader = CatalogLoader::new(InlineSource::new("inline", "a,b\n1,2\n"));
        let (tx, mut rx) = mpsc::channel(1);
        loader.run(tx).await;

        match rx.recv().await {
            Some(LoadEvent::Failed(CatalogError::HeaderNotFound { anchor })) => {
                assert_eq!(anchor, TITLE_COLUMN);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn loader_tolerates_dropped_receiver() {
        let loader = CatalogLoader::new(InlineSource::new("inline", SHEET));
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        loader.run(tx).await;
    }
}
