//! Ordered, append-only holding area for finished charts.

use crate::viz::Chart;

/// Charts in generation order, waiting for the document sink.
#[derive(Debug, Default)]
pub struct FigureCollector {
    charts: Vec<Chart>,
}

impl FigureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(&mut self, chart: Chart) {
        log::debug!("collected page {}: {:?}", self.charts.len() + 1, chart.title);
        self.charts.push(chart);
    }

    /// Hand every chart over in collection order, leaving the collector empty.
    pub fn drain(&mut self) -> Vec<Chart> {
        std::mem::take(&mut self.charts)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chart> {
        self.charts.iter()
    }
}
