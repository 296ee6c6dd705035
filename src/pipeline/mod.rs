//! Stream pipeline from raw products to CSV rows
//!
//! Four stages run as separate tasks joined by unbounded channels:
//!
//! ```text
//! items -> filter -> type -> serialize -> sink
//! ```
//!
//! Each stage handles one item at a time, so row order matches arrival order at the
//! filter and ranks are assigned in that same order. The pipeline finishes once the
//! item channel is closed and every stage has drained.

mod rank;
mod stages;

pub use rank::RankCounter;
pub use stages::{NotabilityFilter, ProductTyper};

use crate::output::CsvSink;
use crate::product::{Product, RawProduct};
use crate::ScrapeError;
use std::io::Write;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;

/// Item counts after the pipeline has drained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Raw products read from the item channel
    pub received: u64,
    /// Products that passed the notability filter
    pub kept: u64,
    /// Rows appended to the sink
    pub written: u64,
}

/// The configured stages, ready to be attached to an item channel
#[derive(Debug, Clone)]
pub struct Pipeline {
    filter: NotabilityFilter,
    typer: ProductTyper,
}

impl Pipeline {
    pub fn new(filter: NotabilityFilter, typer: ProductTyper) -> Self {
        Self { filter, typer }
    }

    /// Starts every stage and returns a handle resolving once the sink has flushed
    pub fn spawn<W>(
        self,
        items: UnboundedReceiver<RawProduct>,
        sink: CsvSink<W>,
    ) -> JoinHandle<Result<PipelineReport, ScrapeError>>
    where
        W: Write + Send + 'static,
    {
        let (kept_tx, kept_rx) = mpsc::unbounded_channel();
        let (typed_tx, typed_rx) = mpsc::unbounded_channel();
        let (rows_tx, rows_rx) = mpsc::unbounded_channel();

        tracing::info!("Pipeline started");

        let filter = tokio::spawn(filter_stage(self.filter, items, kept_tx));
        let typer = tokio::spawn(type_stage(self.typer, kept_rx, typed_tx));
        let serializer = tokio::spawn(serialize_stage(typed_rx, rows_tx));
        let writer = tokio::spawn(sink_stage(rows_rx, sink));

        tokio::spawn(async move {
            // Join the sink first: if it fails, upstream stages stop on their next send
            let written = writer.await??;
            let (received, kept) = filter.await?;
            typer.await?;
            serializer.await?;

            let report = PipelineReport {
                received,
                kept,
                written,
            };
            tracing::info!(
                "Pipeline finished: {} received, {} kept, {} written",
                report.received,
                report.kept,
                report.written
            );
            Ok::<_, ScrapeError>(report)
        })
    }
}

/// Returns (received, kept)
async fn filter_stage(
    filter: NotabilityFilter,
    mut items: UnboundedReceiver<RawProduct>,
    kept: mpsc::UnboundedSender<RawProduct>,
) -> (u64, u64) {
    let mut received = 0;
    let mut passed = 0;

    while let Some(raw) = items.recv().await {
        received += 1;
        if !filter.keep(&raw) {
            continue;
        }
        if kept.send(raw).is_err() {
            break;
        }
        passed += 1;
    }

    (received, passed)
}

async fn type_stage(
    typer: ProductTyper,
    mut kept: UnboundedReceiver<RawProduct>,
    typed: mpsc::UnboundedSender<Product>,
) {
    while let Some(raw) = kept.recv().await {
        if typed.send(typer.type_product(raw)).is_err() {
            break;
        }
    }
}

async fn serialize_stage(
    mut typed: UnboundedReceiver<Product>,
    rows: mpsc::UnboundedSender<String>,
) {
    while let Some(product) = typed.recv().await {
        if rows.send(product.to_csv_row()).is_err() {
            break;
        }
    }
}

async fn sink_stage<W: Write>(
    mut rows: UnboundedReceiver<String>,
    mut sink: CsvSink<W>,
) -> Result<u64, ScrapeError> {
    while let Some(row) = rows.recv().await {
        if let Err(e) = sink.write_row(&row) {
            tracing::error!("Failed to write CSV row: {}", e);
            return Err(e.into());
        }
    }

    let written = sink.rows();
    sink.finish()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::PriceParser;
    use crate::product::CSV_HEADER;
    use std::io;
    use std::time::Duration;
    use tempfile::TempDir;

    fn pipeline(ranks: RankCounter) -> Pipeline {
        Pipeline::new(
            NotabilityFilter::new(100),
            ProductTyper::new("noon", PriceParser::new("AED").unwrap(), ranks),
        )
    }

    fn raw(id: usize, best_seller: bool, rating: &str) -> RawProduct {
        RawProduct {
            title: format!("Product {}", id),
            categories: "ElectronicsCables".to_string(),
            selling_price: "AED 10.00".to_string(),
            product_url: format!("https://www.noon.com/p/{}", id),
            brand: "Acme".to_string(),
            rating: Some(rating.to_string()),
            is_best_seller: best_seller,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_pipeline_writes_notable_products_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.csv");
        let ranks = RankCounter::new();

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = pipeline(ranks.clone()).spawn(rx, CsvSink::open(&path).unwrap());

        tx.send(raw(1, true, "4.53")).unwrap();
        tx.send(raw(2, false, "4.550")).unwrap();
        tx.send(raw(3, false, "4.5250")).unwrap();
        tx.send(raw(4, true, "")).unwrap();
        drop(tx);

        let report = handle.await.unwrap().unwrap();
        assert_eq!(
            report,
            PipelineReport {
                received: 4,
                kept: 3,
                written: 3,
            }
        );
        assert_eq!(ranks.assigned(), 3);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].contains("/p/1,") && lines[1].ends_with(",1"));
        assert!(lines[2].contains("/p/3,") && lines[2].ends_with(",2"));
        assert!(lines[3].contains("/p/4,") && lines[3].ends_with(",3"));
    }

    #[tokio::test]
    async fn test_empty_channel_writes_header_only() {
        let (tx, rx) = mpsc::unbounded_channel::<RawProduct>();
        drop(tx);

        let sink = CsvSink::new(Vec::new()).unwrap();
        let report = pipeline(RankCounter::new())
            .spawn(rx, sink)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(report, PipelineReport::default());
    }

    #[tokio::test]
    async fn test_many_products_keep_arrival_order() {
        let ranks = RankCounter::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = pipeline(ranks.clone()).spawn(rx, CsvSink::new(Vec::new()).unwrap());

        for id in 0..200 {
            tx.send(raw(id, true, "")).unwrap();
        }
        drop(tx);

        let report = handle.await.unwrap().unwrap();
        assert_eq!(report.written, 200);
        assert_eq!(ranks.assigned(), 200);
    }

    /// Accepts the header, then refuses every write
    struct BrokenWriter {
        accepted: bool,
    }

    impl Write for BrokenWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.accepted {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.accepted = true;
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_sink_failure_is_reported() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = CsvSink::new(BrokenWriter { accepted: false }).unwrap();
        let handle = pipeline(RankCounter::new()).spawn(rx, sink);

        tx.send(raw(1, true, "")).unwrap();

        // Fails on the first row while the item channel is still open
        let result = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(ScrapeError::Io(_))));
        drop(tx);
    }

    #[tokio::test]
    async fn test_rows_on_disk_while_channel_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.csv");

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = pipeline(RankCounter::new()).spawn(rx, CsvSink::open(&path).unwrap());

        for id in 0..20 {
            tx.send(raw(id, true, "")).unwrap();
        }

        let mut rows_on_disk = 0;
        for _ in 0..100 {
            let text = std::fs::read_to_string(&path).unwrap();
            rows_on_disk = text.lines().filter(|line| *line != CSV_HEADER).count();
            if rows_on_disk == 20 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(rows_on_disk, 20);

        drop(tx);
        assert_eq!(handle.await.unwrap().unwrap().written, 20);
    }
}
