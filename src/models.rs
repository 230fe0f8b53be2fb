use serde::Serialize;

/// One row of the source CSV. Built once at load time, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub country: String,
    pub region: String,
    pub total_cases: u64,
    pub total_deaths: u64,
}

/// The parsed dataset, in source order. Shared read-only across all scenes.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Which measure a scene plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Cases,
    Deaths,
}

impl Measure {
    pub fn of(self, record: &Record) -> u64 {
        match self {
            Measure::Cases => record.total_cases,
            Measure::Deaths => record.total_deaths,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Measure::Cases => "Total cases",
            Measure::Deaths => "Total deaths",
        }
    }
}

/// One bar of a derived chart: a categorical key, the plotted value, and an
/// optional tooltip body for interactive scenes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    pub label: String,
    pub value: u64,
    pub tip: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SceneDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub interactive: bool,
    pub annotated: bool,
}

#[derive(Debug, Serialize)]
pub struct SceneResponse {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub svg: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub records: usize,
    pub regions: usize,
    pub total_cases: u64,
    pub total_deaths: u64,
}
